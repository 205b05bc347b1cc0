//! Request-log middleware contract (C10): the shape every HTTP or RPC
//! adapter conforms to when reporting an inbound call. This module is a
//! thin, framework-agnostic contract — wiring it into a specific HTTP or
//! gRPC server is adapter code and out of scope (spec §1).

use crate::logging::logger::Log;
use crate::logging::record::is_valid_trace_id;
use crate::logging::{Level, RequestLog};
use crate::tracer::TraceIdScope;
use chrono::Utc;
use std::time::Instant;
use uuid::Uuid;

/// Incoming metadata key carrying the propagated trace id (spec §4.10).
pub const TRACE_ID_HEADER: &str = "x-gofr-traceid";
/// Incoming metadata key carrying the propagated span id (spec §4.10).
pub const SPAN_ID_HEADER: &str = "x-gofr-spanid";

/// Status threshold above which a request-log record is emitted at ERROR
/// instead of INFO.
const ERROR_STATUS_THRESHOLD: u16 = 500;

/// Mints a fresh 32-hex-character correlation id, for requests that
/// arrive with no propagated trace id to reuse.
#[must_use]
pub fn mint_correlation_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Pre-handler state: start time plus the correlation id this request
/// will be logged under, established before the handler runs so it is
/// available even if the handler panics (spec §4.10: "runs on all exit
/// paths including panic").
pub struct RequestSpan {
    start: Instant,
    start_time: chrono::DateTime<Utc>,
    correlation_id: String,
    _trace_scope: Option<TraceIdScope>,
}

impl RequestSpan {
    /// Begins tracking a request. `incoming_trace_id` is whatever was
    /// extracted from [`TRACE_ID_HEADER`]/[`SPAN_ID_HEADER`] (or
    /// equivalent gRPC metadata); when absent or invalid, a new
    /// correlation id is minted instead.
    #[must_use]
    pub fn begin(incoming_trace_id: Option<&str>) -> Self {
        let correlation_id = incoming_trace_id
            .filter(|id| is_valid_trace_id(id))
            .map(str::to_string)
            .unwrap_or_else(mint_correlation_id);
        let trace_scope = Some(TraceIdScope::enter(correlation_id.clone()));

        Self {
            start: Instant::now(),
            start_time: Utc::now(),
            correlation_id,
            _trace_scope: trace_scope,
        }
    }

    #[must_use]
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Post-handler for an HTTP request: builds the request-log record
    /// and emits it at INFO, or ERROR when `status >= 500` or the handler
    /// panicked.
    pub fn finish_http(self, logger: &dyn Log, method: &str, uri: &str, status: u16, handler_panicked: bool) {
        self.finish(logger, method, uri, status, handler_panicked);
    }

    /// Post-handler for an RPC call: the method name replaces the URI and
    /// the gRPC status code replaces the HTTP status code.
    pub fn finish_rpc(self, logger: &dyn Log, method: &str, grpc_status: u16, handler_panicked: bool) {
        self.finish(logger, method, method, grpc_status, handler_panicked);
    }

    fn finish(self, logger: &dyn Log, method: &str, uri: &str, status: u16, handler_panicked: bool) {
        let response_time_us = u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX);
        let record = RequestLog {
            correlation_id: self.correlation_id.clone(),
            method: method.to_string(),
            uri: uri.to_string(),
            status,
            response_time_us,
            start_time: self.start_time,
        };
        let level = if handler_panicked || status >= ERROR_STATUS_THRESHOLD {
            Level::Error
        } else {
            Level::Info
        };
        logger.log(level, record.into(), Some(&self.correlation_id));
    }
}
