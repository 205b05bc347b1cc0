//! The logging spine: a [`Record`] model, a pluggable [`Sink`]/[`Filter`]
//! pair, pretty and structured encoders, and the synchronous/asynchronous
//! loggers built on top of them.

pub mod async_logger;
pub mod context;
pub mod encoder;
pub mod global;
pub mod logger;
pub mod mask;
pub mod pretty;
pub mod record;
pub mod remote;
pub mod sink;
pub mod terminal;
#[cfg(feature = "tracing-bridge")]
pub mod tracing_bridge;

pub use async_logger::{AsyncLogger, OverflowPolicy};
pub use context::ContextLogger;
pub use level::{AtomicLevel, Level};
pub use logger::{Encoding, Log, LogExt, Logger};
pub use mask::{FieldMasker, Filter, NoopFilter};
pub use record::{Message, PanicLog, QueryLog, Record, RequestLog, is_valid_trace_id};
pub use remote::RemoteLevelService;
pub use sink::Sink;

mod level;
