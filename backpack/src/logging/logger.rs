//! Synchronous logger (C6): level-gated record construction and dispatch
//! to the pretty or structured encoder under a sink-exclusive guard.

use crate::logging::{
    AtomicLevel, Filter, Level, Message, NoopFilter, Record, Sink, encoder, pretty, sink,
};
use anyhow::Context as _;
use std::path::Path;
use std::sync::Arc;

/// Which encoder a [`Logger`] renders through. One encoder per sink, per
/// spec's non-goal of multiple simultaneous encodings for the same record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Pretty,
    Structured,
}

/// The `Logger` interface consumed by every adapter (§6): level-gated
/// dispatch with an optional trace id attached per call. Implemented by
/// both [`Logger`] and [`crate::logging::AsyncLogger`] so
/// [`crate::logging::ContextLogger`] can wrap either one.
pub trait Log: Send + Sync {
    fn log(&self, level: Level, message: Message, trace_id: Option<&str>);
    fn current_level(&self) -> Level;
    fn change_level(&self, level: Level);

    /// Blocks until every record enqueued so far has been written. The
    /// synchronous [`Logger`] writes inline and has nothing to wait for;
    /// [`crate::logging::AsyncLogger`] overrides this to drain its queue.
    fn flush(&self) {}
}

/// Ergonomic per-level wrappers over [`Log::log`], blanket-implemented for
/// every logger so callers don't have to spell out `Level::Info` etc. at
/// every call site. Rust's `format!()` already covers the variadic/
/// formatted split the spec's `Debug`/`Debugf` pairs exist for, so there is
/// one method per level rather than two.
pub trait LogExt: Log {
    fn debug(&self, message: impl Into<Message>) {
        self.log(Level::Debug, message.into(), None);
    }

    fn info(&self, message: impl Into<Message>) {
        self.log(Level::Info, message.into(), None);
    }

    fn notice(&self, message: impl Into<Message>) {
        self.log(Level::Notice, message.into(), None);
    }

    fn warn(&self, message: impl Into<Message>) {
        self.log(Level::Warn, message.into(), None);
    }

    fn error(&self, message: impl Into<Message>) {
        self.log(Level::Error, message.into(), None);
    }

    /// Logs at FATAL and terminates the process with a non-zero exit code
    /// once the triggering sink write has returned (§9: termination must
    /// not race the write). For an asynchronous logger, `flush` blocks
    /// until the drain worker has written the FATAL record before this
    /// call exits the process.
    fn fatal(&self, message: impl Into<Message>) -> ! {
        self.log(Level::Fatal, message.into(), None);
        self.flush();
        std::process::exit(1);
    }
}

impl<T: Log + ?Sized> LogExt for T {}

/// The synchronous logger (C6). Holds the only piece of shared mutable
/// state in the pipeline — the current level threshold — plus the two
/// sinks, the active encoder, and the field filter.
pub struct Logger {
    threshold: AtomicLevel,
    normal: Arc<dyn Sink>,
    error: Arc<dyn Sink>,
    encoding: Encoding,
    filter: Arc<dyn Filter>,
    gofr_version: Option<String>,
    diagnostics: Arc<dyn Sink>,
}

impl Logger {
    #[must_use]
    pub fn new(normal: Arc<dyn Sink>, error: Arc<dyn Sink>, encoding: Encoding, level: Level) -> Self {
        Self {
            threshold: AtomicLevel::new(level),
            normal,
            error,
            encoding,
            filter: Arc::new(NoopFilter),
            gofr_version: None,
            diagnostics: Arc::new(sink::stderr_sink()),
        }
    }

    /// A logger over stdout/stderr, as most services construct their
    /// default logger.
    #[must_use]
    pub fn stdout(encoding: Encoding, level: Level) -> Self {
        Self::new(Arc::new(sink::stdout_sink()), Arc::new(sink::stderr_sink()), encoding, level)
    }

    /// A logger over a single append-mode file used for both normal and
    /// error output. Fails at construction if the file cannot be opened
    /// (§7: "if the configured normal sink is invalid at construction,
    /// construction fails with a descriptive error").
    pub fn to_file(path: impl AsRef<Path>, encoding: Encoding, level: Level) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        let file_sink: Arc<dyn Sink> = Arc::new(sink::file_sink(file));
        Ok(Self::new(Arc::clone(&file_sink), file_sink, encoding, level))
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn with_gofr_version(mut self, version: impl Into<String>) -> Self {
        self.gofr_version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_diagnostics_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.diagnostics = sink;
        self
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.threshold.load()
    }

    /// Only [`Query`](crate::logging::Message::Query) messages carry a
    /// free-form structured payload (`args`); masking runs on that payload
    /// exactly once, before encoding (spec §4.3/§8).
    pub(crate) fn mask(&self, message: Message) -> Message {
        match message {
            Message::Query(mut q) => {
                if let Some(args) = q.args.take() {
                    q.args = Some(self.filter.apply(args));
                }
                Message::Query(q)
            }
            other => other,
        }
    }

    pub(crate) fn gofr_version(&self) -> Option<&str> {
        self.gofr_version.as_deref()
    }

    /// Render and write an already-built record. Shared by the
    /// synchronous fast path and by [`crate::logging::AsyncLogger`]'s
    /// drain worker, which constructs records on the producer side and
    /// only needs this half of the pipeline.
    pub(crate) fn write_record(&self, record: &Record) {
        #[cfg(feature = "tracing-bridge")]
        crate::logging::tracing_bridge::bridge(record);

        let target: &Arc<dyn Sink> = if record.level >= Level::Error { &self.error } else { &self.normal };
        match self.encoding {
            Encoding::Pretty => {
                let mut line = pretty::render(record, target.is_tty());
                line.push('\n');
                if let Err(e) = target.write_line(line.as_bytes()) {
                    self.report_internal_error(&e);
                }
            }
            Encoding::Structured => {
                let buf = encoder::encode_line(record);
                if let Err(e) = target.write_line(&buf) {
                    self.report_internal_error(&e);
                }
                encoder::return_buffer(buf);
            }
        }
    }

    /// Sink write failures are never surfaced to callers (§7); they go to
    /// the fallback diagnostics sink instead of back through this same
    /// pipeline, so a broken sink can't recursively log about itself.
    fn report_internal_error(&self, e: &std::io::Error) {
        let line = format!("backpack logging: sink write failed: {e}\n");
        let _ = self.diagnostics.write_line(line.as_bytes());
    }
}

impl Log for Logger {
    fn log(&self, level: Level, message: Message, trace_id: Option<&str>) {
        if !level.allows(self.threshold.load()) {
            return;
        }
        let message = self.mask(message);
        let mut record = Record::new(level, message);
        if let Some(id) = trace_id {
            record = record.with_trace_id(id.to_string());
        }
        if let Some(version) = &self.gofr_version {
            record = record.with_gofr_version(version.clone());
        }
        self.write_record(&record);
        if level == Level::Fatal {
            std::process::exit(1);
        }
    }

    fn current_level(&self) -> Level {
        self.threshold.load()
    }

    fn change_level(&self, level: Level) {
        self.threshold.store(level);
    }
}
