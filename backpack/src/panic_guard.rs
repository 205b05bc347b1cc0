//! Top-level panic recovery (§4.10 adjacent): a thin wrapper around
//! `std::panic::catch_unwind` that turns an unwinding panic into a
//! [`PanicLog`] record at ERROR instead of letting it cross a request or
//! job boundary silently.

use crate::logging::logger::{Log, LogExt};
use crate::logging::record::PanicLog;
use std::panic::{self, AssertUnwindSafe};

/// Runs `f`, catching any panic and reporting it through `logger` as a
/// [`PanicLog`] at ERROR before re-propagating `None` to the caller.
/// Intended for the outermost frame of a request handler or background
/// job — not a substitute for handling expected errors with `Result`.
pub fn guard<T>(logger: &dyn Log, f: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            let error = panic_message(&payload);
            logger.error(PanicLog { error, stack_trace: std::backtrace::Backtrace::force_capture().to_string() });
            None
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic payload was not a string".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::logger::{Encoding, Logger};
    use crate::logging::sink::buffer_sink;
    use crate::logging::Level;
    use std::sync::Arc;

    #[test]
    fn successful_call_returns_its_value_and_logs_nothing() {
        let buffer = Arc::new(buffer_sink());
        let logger = Logger::new(buffer.clone(), buffer.clone(), Encoding::Structured, Level::Debug);
        let result = guard(&logger, || 1 + 1);
        assert_eq!(result, Some(2));
        assert!(buffer.contents().is_empty());
    }

    #[test]
    fn panicking_call_returns_none_and_logs_at_error() {
        let buffer = Arc::new(buffer_sink());
        let logger = Logger::new(buffer.clone(), buffer.clone(), Encoding::Structured, Level::Debug);
        let result: Option<()> = guard(&logger, || panic!("boom"));
        assert_eq!(result, None);
        let out = String::from_utf8(buffer.contents()).unwrap();
        assert!(out.contains("\"level\":\"error\""));
        assert!(out.contains("boom"));
    }
}
