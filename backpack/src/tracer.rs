//! Tracer interface (§6): read-only access to the active distributed trace
//! id. The core uses it only to read the trace id from the current
//! context — starting spans is a tracing-ecosystem concern, not this
//! crate's.

use std::cell::RefCell;

/// Adjacent interface consumed by [`crate::logging::ContextLogger`].
pub trait Tracer: Send + Sync {
    /// The active trace id, if any, as a 32-character hex string.
    /// Validity (length, hex, non-zero) is checked by the caller, not here.
    fn trace_id(&self) -> Option<String>;
}

thread_local! {
    static CURRENT_TRACE_ID: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// RAII guard that makes a trace id the "current" one for this thread for
/// as long as it is held, mirroring how `tracing::Span::entered()` scopes
/// a span to the calling thread. Middleware (`crate::http`) enters one of
/// these around the handler call so [`TracingTracer`] can read it back.
pub struct TraceIdScope {
    previous: Option<String>,
}

impl TraceIdScope {
    #[must_use]
    pub fn enter(trace_id: impl Into<String>) -> Self {
        let previous = CURRENT_TRACE_ID.with(|cell| cell.replace(Some(trace_id.into())));
        Self { previous }
    }
}

impl Drop for TraceIdScope {
    fn drop(&mut self) {
        CURRENT_TRACE_ID.with(|cell| *cell.borrow_mut() = self.previous.take());
    }
}

/// Reads the trace id entered via the nearest enclosing [`TraceIdScope`]
/// on the current thread. Outside of any scope (or when no trace is
/// present), behavior is identical to the base logger (spec §4.8).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTracer;

impl Tracer for TracingTracer {
    fn trace_id(&self) -> Option<String> {
        CURRENT_TRACE_ID.with(|cell| cell.borrow().clone())
    }
}

/// A fixed trace id, useful for tests and for call sites that already
/// have one in hand (e.g. extracted from an `x-gofr-traceid` header).
#[derive(Debug, Clone)]
pub struct FixedTracer(pub Option<String>);

impl Tracer for FixedTracer {
    fn trace_id(&self) -> Option<String> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_tracer_returns_its_configured_id() {
        let tracer = FixedTracer(Some("a".repeat(32)));
        assert_eq!(tracer.trace_id(), Some("a".repeat(32)));
    }

    #[test]
    fn fixed_tracer_with_no_id_returns_none() {
        let tracer = FixedTracer(None);
        assert_eq!(tracer.trace_id(), None);
    }

    #[test]
    fn tracing_tracer_outside_any_scope_returns_none() {
        assert_eq!(TracingTracer.trace_id(), None);
    }

    #[test]
    fn tracing_tracer_reads_the_entered_scope() {
        let _scope = TraceIdScope::enter("b".repeat(32));
        assert_eq!(TracingTracer.trace_id(), Some("b".repeat(32)));
    }

    #[test]
    fn scope_restores_previous_value_on_drop() {
        let _outer = TraceIdScope::enter("a".repeat(32));
        {
            let _inner = TraceIdScope::enter("b".repeat(32));
            assert_eq!(TracingTracer.trace_id(), Some("b".repeat(32)));
        }
        assert_eq!(TracingTracer.trace_id(), Some("a".repeat(32)));
    }
}
