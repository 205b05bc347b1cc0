//! Sinks (§4.2, §5): an output destination plus the mutual-exclusion guard
//! that serializes writes to it so records are atomic at record granularity.

use crate::logging::terminal;
use std::fs::File;
use std::io::{self, Write};
use std::sync::Mutex;

/// A byte-oriented output destination. `write_line` must write the full
/// record atomically with respect to any other writer of this sink — the
/// sink itself provides the mutual exclusion via an internal guard, so
/// callers never need their own locking.
pub trait Sink: Send + Sync {
    /// Write one already-terminated line (the caller includes the trailing
    /// newline). Returns an error on I/O failure; callers count but never
    /// propagate these (§7).
    fn write_line(&self, bytes: &[u8]) -> io::Result<()>;

    /// Whether this sink renders ANSI color. Decided once at construction.
    fn is_tty(&self) -> bool;
}

/// A sink backed by a raw [`std::io::Write`] implementor, guarded by a
/// single mutex so concurrent writers never interleave bytes (the "sink
/// guard" of spec §4.6/§5).
pub struct GuardedSink<W: Write + Send> {
    writer: Mutex<W>,
    tty: bool,
}

impl<W: Write + Send> GuardedSink<W> {
    #[must_use]
    pub fn new(writer: W, tty: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            tty,
        }
    }
}

impl<W: Write + Send> Sink for GuardedSink<W> {
    fn write_line(&self, bytes: &[u8]) -> io::Result<()> {
        // A poisoned mutex means a prior writer panicked mid-write; recover
        // the lock rather than propagating a poison panic into every caller.
        let mut guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        guard.write_all(bytes)?;
        guard.flush()
    }

    fn is_tty(&self) -> bool {
        self.tty
    }
}

/// Build a sink from stdout.
#[must_use]
pub fn stdout_sink() -> GuardedSink<io::Stdout> {
    GuardedSink::new(io::stdout(), terminal::stdout_is_tty())
}

/// Build a sink from stderr.
#[must_use]
pub fn stderr_sink() -> GuardedSink<io::Stderr> {
    GuardedSink::new(io::stderr(), terminal::stderr_is_tty())
}

/// Build a sink from an already-open file handle.
#[must_use]
pub fn file_sink(file: File) -> GuardedSink<File> {
    let tty = terminal::file_is_tty(&file);
    GuardedSink::new(file, tty)
}

/// Build a sink over an in-memory buffer (never a TTY). Useful for tests
/// and for callers that want to inspect rendered output programmatically.
#[must_use]
pub fn buffer_sink() -> GuardedSink<Vec<u8>> {
    GuardedSink::new(Vec::new(), false)
}

impl GuardedSink<Vec<u8>> {
    /// Snapshot of everything written so far.
    #[must_use]
    pub fn contents(&self) -> Vec<u8> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
