//! Query-log emitter (C11): the contract every datasource adapter
//! implements to report a primitive operation (exec, query, mutation,
//! fetch, publish, subscribe) as a structured record.

use crate::logging::logger::{Log, LogExt};
use crate::logging::{Level, QueryLog};
use std::time::Instant;

/// Backend tags used by the pretty form's colored prefix (spec §4.11).
pub const ORACLE: &str = "ORACLE";
pub const DGRAPH: &str = "DGRAPH";
pub const ELASTIC: &str = "ELASTIC";
pub const PINECONE: &str = "PINECONE";

/// Wraps a primitive datasource call with start-time capture and
/// duration measurement, then emits a [`QueryLog`] at DEBUG on success or
/// ERROR on failure. Adapters supply their own backend tag and build the
/// `target` string however best describes the operation (SQL text, a
/// GraphQL document, a key, a topic name, …). `correlation_id` is the
/// enclosing request's correlation id, when the call runs inside one —
/// pass `None` for calls with no enclosing request (a background job, a
/// startup migration).
///
/// ```
/// # use backpack::query::time_operation;
/// # use backpack::logging::{Logger, logger::Encoding, Level};
/// # use std::sync::Arc;
/// # let logger = Logger::stdout(Encoding::Structured, Level::Debug);
/// let result: Result<i32, String> = time_operation(
///     &logger,
///     backpack::query::DGRAPH,
///     "query",
///     "{ me { name } }",
///     None,
///     None,
///     || Ok(42),
/// );
/// assert_eq!(result, Ok(42));
/// ```
pub fn time_operation<T, E: std::fmt::Display>(
    logger: &dyn Log,
    backend: &str,
    operation: &str,
    target: &str,
    args: Option<serde_json::Value>,
    correlation_id: Option<&str>,
    call: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    let start = Instant::now();
    let result = call();
    let duration_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

    let query_log = QueryLog {
        backend: backend.to_string(),
        operation: operation.to_string(),
        target: target.to_string(),
        duration_us,
        args,
        correlation_id: correlation_id.map(str::to_string),
    };

    match &result {
        Ok(_) => logger.log(Level::Debug, query_log.into(), correlation_id),
        Err(e) => {
            let mut failed = query_log;
            failed.target = format!("{} (failed: {e})", failed.target);
            logger.log(Level::Error, failed.into(), correlation_id);
        }
    }

    result
}
