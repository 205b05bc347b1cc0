//! Process-wide logger singleton. An optional convenience shell around
//! [`Log`] — every other module in this crate takes a logger as an
//! explicit argument and never reaches for this global itself (spec §9:
//! "the process-wide convenience constructor is an optional outer shell,
//! not the core").

use crate::logging::logger::Log;
use once_cell::sync::OnceCell;
use std::sync::Arc;

static LOGGER: OnceCell<Arc<dyn Log>> = OnceCell::new();

/// Installs the process-wide logger. Only the first call takes effect;
/// later calls are silently ignored, matching the teacher's
/// set-once-wins `OnceCell` usage.
pub fn set_global(logger: Arc<dyn Log>) {
    let _ = LOGGER.set(logger);
}

/// Retrieves the process-wide logger.
///
/// # Panics
/// Panics if [`set_global`] has not been called yet.
#[must_use]
pub fn global() -> Arc<dyn Log> {
    LOGGER.get().cloned().expect("backpack::logging::global: no logger installed; call set_global first")
}

/// `true` once [`set_global`] has installed a logger.
#[must_use]
pub fn is_initialized() -> bool {
    LOGGER.get().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::logger::{Encoding, Logger};
    use crate::logging::sink::buffer_sink;
    use crate::logging::Level;
    use serial_test::serial;

    #[test]
    #[serial]
    fn second_set_global_is_ignored() {
        let buffer = Arc::new(buffer_sink());
        let first = Arc::new(Logger::new(buffer.clone(), buffer.clone(), Encoding::Structured, Level::Info));
        set_global(first);
        assert!(is_initialized());

        let other_buffer = Arc::new(buffer_sink());
        let second = Arc::new(Logger::new(other_buffer.clone(), other_buffer.clone(), Encoding::Structured, Level::Info));
        set_global(second);

        use crate::logging::logger::LogExt;
        global().info("routed through the first installed logger");
        assert!(!buffer.contents().is_empty());
        assert!(other_buffer.contents().is_empty());
    }
}
