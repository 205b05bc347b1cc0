//! Basic service logging
//!
//! Demonstrates the synchronous logger: plain messages, a request log,
//! a query log with masked arguments, and a level change taking effect
//! immediately.
//!
//! Run with:
//!   cargo run --example basic-service-logging

use backpack::logging::logger::Encoding;
use backpack::logging::{FieldMasker, Level, LogExt, Logger, QueryLog, RequestLog};
use backpack::query::{self, ORACLE};
use std::sync::Arc;

fn main() {
    let logger = Logger::stdout(Encoding::Pretty, Level::Debug)
        .with_filter(Arc::new(FieldMasker::new(["password", "token"])));

    logger.info("service starting up");
    logger.debug("config loaded from environment");

    logger.info(RequestLog {
        correlation_id: "a".repeat(32),
        method: "GET".into(),
        uri: "/users/42".into(),
        status: 200,
        response_time_us: 3_214,
        start_time: chrono::Utc::now(),
    });

    logger.info(QueryLog {
        backend: ORACLE.to_string(),
        operation: "SELECT".into(),
        target: "SELECT * FROM users WHERE id = ?".into(),
        duration_us: 842,
        args: Some(serde_json::json!({"id": 42, "password": "hunter2"})),
        correlation_id: Some("a".repeat(32)),
    });

    let result: Result<i32, &str> = query::time_operation(
        &logger,
        ORACLE,
        "SELECT",
        "SELECT count(*) FROM orders",
        None,
        None,
        || Ok(17),
    );
    logger.info(format!("order count = {}", result.unwrap()));

    logger.change_level(Level::Warn);
    logger.info("suppressed at WARN threshold");
    logger.warn("this one still gets through");
}
