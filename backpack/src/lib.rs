//! Structured logging, request/query observability, and remote
//! log-level plumbing for services.
//!
//! The crate has no process-wide requirement: [`logging::Logger`] and
//! [`logging::AsyncLogger`] are constructed explicitly and passed down
//! through your own call graph. [`logging::global`] exists only as an
//! optional convenience for code that would rather reach for a singleton.

pub mod config;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod panic_guard;
pub mod query;
pub mod tracer;

pub use logging::{AsyncLogger, ContextLogger, Level, Log, LogExt, Logger};
