//! Terminal detection (C2): decide once, at construction, whether a sink
//! renders ANSI color. Any wrapping writer (multi-writer, buffer, pipe) is
//! non-TTY; only a direct file handle whose descriptor is attached to a
//! terminal qualifies. [`crate::logging::Sink`] calls these at construction
//! and caches the answer — it is never re-evaluated afterwards.

use std::fs::File;
use std::io::IsTerminal;

#[must_use]
pub fn file_is_tty(file: &File) -> bool {
    file.is_terminal()
}

#[must_use]
pub fn stdout_is_tty() -> bool {
    std::io::stdout().is_terminal()
}

#[must_use]
pub fn stderr_is_tty() -> bool {
    std::io::stderr().is_terminal()
}
