//! Async and context logging
//!
//! Demonstrates the bounded async logger, a per-request `ContextLogger`
//! carrying a trace id through a handler, and the panic guard catching a
//! handler panic as a structured record instead of unwinding further.
//!
//! Run with:
//!   cargo run --example async-and-context-logging

use backpack::logging::logger::Encoding;
use backpack::logging::{AsyncLogger, ContextLogger, Level, LogExt, Logger, OverflowPolicy};
use backpack::panic_guard;
use backpack::tracer::FixedTracer;
use std::sync::Arc;
use std::time::Duration;

fn handle_request(logger: &ContextLogger<AsyncLogger>, should_panic: bool) {
    logger.info("handling request");
    if should_panic {
        panic!("handler blew up mid-request");
    }
    logger.info("request handled");
}

fn main() {
    let base = Arc::new(Logger::stdout(Encoding::Pretty, Level::Debug));
    let async_logger = Arc::new(AsyncLogger::new(base, 1024, OverflowPolicy::DropNewest));

    let trace_id = "f".repeat(32);
    let ctx = ContextLogger::new(async_logger.clone(), &FixedTracer(Some(trace_id)));

    handle_request(&ctx, false);

    panic_guard::guard(async_logger.as_ref(), || handle_request(&ctx, true));

    async_logger.close(Duration::from_secs(2));
    println!("dropped during this run: {}", async_logger.dropped_count());
}
