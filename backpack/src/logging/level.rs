//! Severity levels (C1): a totally ordered enum with case-insensitive
//! parsing, a short display tag, an ANSI color for terminal rendering,
//! and an atomically-updatable holder used as a logger's current threshold.

use std::sync::atomic::{AtomicU8, Ordering};

/// Log severity, ordered from least to most severe.
///
/// `Ord`/`PartialOrd` give the threshold comparison used on every call's
/// fast path: a record is emitted only if `record.level >= threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Notice = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl Level {
    /// Parse a level from a string. Matching is case-insensitive and exact
    /// (no prefix matching). Unknown values yield `None` — used by callers
    /// (e.g. the remote level service) that must retain their current
    /// level rather than silently falling back to INFO on a typo.
    #[must_use]
    pub fn try_parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "NOTICE" => Some(Self::Notice),
            "WARN" | "WARNING" => Some(Self::Warn),
            "ERROR" => Some(Self::Error),
            "FATAL" => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Parse a level from a string. Matching is case-insensitive and exact
    /// (no prefix matching). Unknown values yield `Level::Info`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        Self::try_parse(s).unwrap_or(Self::Info)
    }

    /// Four-letter display tag, e.g. `"INFO"`.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Debug => "DEBU",
            Self::Info => "INFO",
            Self::Notice => "NOTI",
            Self::Warn => "WARN",
            Self::Error => "ERRO",
            Self::Fatal => "FATA",
        }
    }

    /// Lower-case name, as used in the structured encoder's `level` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Notice => "notice",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }

    /// ANSI color code used only in terminal (pretty) rendering.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Debug => "\x1b[36m",  // cyan
            Self::Info => "\x1b[34m",   // blue
            Self::Notice => "\x1b[35m", // magenta
            Self::Warn => "\x1b[33m",   // yellow
            Self::Error => "\x1b[31m",  // red
            Self::Fatal => "\x1b[41m",  // red background
        }
    }

    /// True when a record at `self` should be emitted under `threshold`.
    #[must_use]
    pub fn allows(self, threshold: Self) -> bool {
        self >= threshold
    }

    const fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Debug,
            1 => Self::Info,
            2 => Self::Notice,
            3 => Self::Warn,
            4 => Self::Error,
            _ => Self::Fatal,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// The single piece of shared mutable state in the whole pipeline (§5):
/// a logger's current threshold, read on every call and written only by
/// [`crate::logging::RemoteLevelService`] or an explicit `ChangeLevel`.
///
/// Reads and writes are `Ordering::SeqCst`: cheap at this frequency, and it
/// removes any need to reason about weaker orderings for a single word that
/// changes a handful of times over a process lifetime.
#[derive(Debug)]
pub struct AtomicLevel(AtomicU8);

impl AtomicLevel {
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self(AtomicU8::new(level as u8))
    }

    #[must_use]
    pub fn load(&self) -> Level {
        Level::from_u8(self.0.load(Ordering::SeqCst))
    }

    pub fn store(&self, level: Level) {
        self.0.store(level as u8, Ordering::SeqCst);
    }

    /// Store `level` and return the previous value, for transition logging.
    pub fn swap(&self, level: Level) -> Level {
        Level::from_u8(self.0.swap(level as u8, Ordering::SeqCst))
    }
}

impl Clone for AtomicLevel {
    fn clone(&self) -> Self {
        Self::new(self.load())
    }
}
