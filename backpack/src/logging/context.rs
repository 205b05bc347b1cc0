//! Context logger (C8): an immutable wrapper around a base logger that
//! attaches the active trace id to every call.

use crate::logging::logger::Log;
use crate::logging::record::is_valid_trace_id;
use crate::logging::{Level, Message};
use crate::tracer::Tracer;
use std::sync::Arc;

/// Wraps any [`Log`] implementor (a [`crate::logging::Logger`] or a
/// [`crate::logging::AsyncLogger`]) with a trace id captured once at
/// construction. A new `ContextLogger` is built per request/operation
/// context (spec §4.8) rather than mutated in place.
pub struct ContextLogger<L: Log + ?Sized> {
    inner: Arc<L>,
    trace_id: Option<String>,
}

impl<L: Log + ?Sized> ContextLogger<L> {
    /// Looks up the trace id via `tracer` and keeps it only if it is
    /// present and valid (32 hex chars, not all zero).
    #[must_use]
    pub fn new(inner: Arc<L>, tracer: &dyn Tracer) -> Self {
        Self::with_trace_id(inner, tracer.trace_id())
    }

    /// Attaches an already-known trace id (e.g. parsed from an
    /// `x-gofr-traceid` header) instead of reading it from a [`Tracer`].
    #[must_use]
    pub fn with_trace_id(inner: Arc<L>, trace_id: Option<String>) -> Self {
        let trace_id = trace_id.filter(|id| is_valid_trace_id(id));
        Self { inner, trace_id }
    }

    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn debug(&self, message: impl Into<Message>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl Into<Message>) {
        self.log(Level::Info, message);
    }

    pub fn notice(&self, message: impl Into<Message>) {
        self.log(Level::Notice, message);
    }

    pub fn warn(&self, message: impl Into<Message>) {
        self.log(Level::Warn, message);
    }

    pub fn error(&self, message: impl Into<Message>) {
        self.log(Level::Error, message);
    }

    /// Terminates the process once the FATAL record has been written —
    /// `flush` blocks until an asynchronous `inner` logger's drain worker
    /// has caught up, so exit can never race the write (§9).
    pub fn fatal(&self, message: impl Into<Message>) -> ! {
        self.inner.log(Level::Fatal, message.into(), self.trace_id.as_deref());
        self.inner.flush();
        std::process::exit(1);
    }

    pub fn change_level(&self, level: Level) {
        self.inner.change_level(level);
    }

    fn log(&self, level: Level, message: impl Into<Message>) {
        self.inner.log(level, message.into(), self.trace_id.as_deref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::logger::{Encoding, Logger};
    use crate::logging::sink::buffer_sink;
    use crate::tracer::FixedTracer;

    #[test]
    fn valid_trace_id_is_attached_to_every_record() {
        let buffer = Arc::new(buffer_sink());
        let logger = Arc::new(Logger::new(buffer.clone(), buffer.clone(), Encoding::Structured, Level::Debug));
        let ctx = ContextLogger::new(logger, &FixedTracer(Some("a".repeat(32))));
        ctx.info("hello");
        let out = String::from_utf8(buffer.contents()).unwrap();
        assert!(out.contains(&format!("\"trace_id\":\"{}\"", "a".repeat(32))));
    }

    #[test]
    fn all_zero_trace_id_is_treated_as_absent() {
        let buffer = Arc::new(buffer_sink());
        let logger = Arc::new(Logger::new(buffer.clone(), buffer.clone(), Encoding::Structured, Level::Debug));
        let ctx = ContextLogger::new(logger, &FixedTracer(Some("0".repeat(32))));
        assert_eq!(ctx.trace_id(), None);
        ctx.info("hello");
        let out = String::from_utf8(buffer.contents()).unwrap();
        assert!(!out.contains("trace_id"));
    }

    #[test]
    fn no_trace_id_behaves_like_the_base_logger() {
        let buffer = Arc::new(buffer_sink());
        let logger = Arc::new(Logger::new(buffer.clone(), buffer.clone(), Encoding::Structured, Level::Debug));
        let ctx = ContextLogger::new(logger, &FixedTracer(None));
        ctx.info("hello");
        let out = String::from_utf8(buffer.contents()).unwrap();
        assert!(!out.contains("trace_id"));
    }
}
