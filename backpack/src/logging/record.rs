//! The record model (C1): an immutable log event carrying a level, a
//! capture-time timestamp, a typed message payload, and an optional trace id.

use crate::logging::Level;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// HTTP/RPC request-log message (C10). The status-code field drives color
/// selection in pretty rendering; `status == 0` represents an RPC success
/// with no natural HTTP-style status.
#[derive(Debug, Clone, Serialize)]
pub struct RequestLog {
    pub correlation_id: String,
    pub method: String,
    pub uri: String,
    pub status: u16,
    pub response_time_us: u64,
    pub start_time: DateTime<Utc>,
}

impl RequestLog {
    /// 2xx/3xx/4xx/5xx bucket color; `0` (RPC success) renders as 2xx green.
    #[must_use]
    pub fn status_color(&self) -> &'static str {
        match self.status {
            0 | 200..=299 => "\x1b[32m", // green
            300..=399 => "\x1b[33;5m",   // orange-ish (approximated)
            400..=499 => "\x1b[33m",     // yellow
            500..=599 => "\x1b[31m",     // red
            _ => "",
        }
    }
}

/// Datasource query-log message (C11). `args` passes through the field
/// masker before this record is encoded. `correlation_id` carries the
/// enclosing request's correlation id when the query runs inside one
/// (pretty rendering shows it, or blank when the call has no enclosing
/// request — spec §4.4).
#[derive(Debug, Clone, Serialize)]
pub struct QueryLog {
    pub backend: String,
    pub operation: String,
    pub target: String,
    pub duration_us: u64,
    pub args: Option<serde_json::Value>,
    pub correlation_id: Option<String>,
}

/// Panic-log message, always emitted at ERROR by the top-level recovery
/// wrapper (`crate::panic_guard`).
#[derive(Debug, Clone, Serialize)]
pub struct PanicLog {
    pub error: String,
    pub stack_trace: String,
}

/// The record's message payload. New variants can be added without breaking
/// existing consumers: the encoder and pretty printer dispatch on variant
/// and fall back to `Text` rendering for anything unrecognized by a given
/// consumer version would not compile against an enum addition in Rust, but
/// within this crate every dispatch site is exhaustive by construction.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Message {
    Text(String),
    Request(RequestLog),
    Query(QueryLog),
    Panic(PanicLog),
    Error(String),
}

impl From<String> for Message {
    fn from(s: String) -> Self {
        Message::Text(s)
    }
}

impl From<&str> for Message {
    fn from(s: &str) -> Self {
        Message::Text(s.to_string())
    }
}

impl From<RequestLog> for Message {
    fn from(r: RequestLog) -> Self {
        Message::Request(r)
    }
}

impl From<QueryLog> for Message {
    fn from(q: QueryLog) -> Self {
        Message::Query(q)
    }
}

impl From<PanicLog> for Message {
    fn from(p: PanicLog) -> Self {
        Message::Panic(p)
    }
}

/// An immutable log event. Once constructed, nothing about a `Record` is
/// rewritten — the timestamp is captured at construction and never touched
/// again, even if the record sits in an async logger's queue for a while.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub timestamp: DateTime<Utc>,
    pub message: Message,
    pub trace_id: Option<String>,
    pub gofr_version: Option<String>,
}

impl Record {
    #[must_use]
    pub fn new(level: Level, message: impl Into<Message>) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            message: message.into(),
            trace_id: None,
            gofr_version: None,
        }
    }

    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    #[must_use]
    pub fn with_gofr_version(mut self, version: impl Into<String>) -> Self {
        self.gofr_version = Some(version.into());
        self
    }
}

/// A 32-hex-character trace id is valid when present and not all zeros
/// (spec §8: "Trace id present but all-zero: treated as absent").
#[must_use]
pub fn is_valid_trace_id(id: &str) -> bool {
    id.len() == 32 && id.chars().all(|c| c.is_ascii_hexdigit()) && !id.chars().all(|c| c == '0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_trace_id_is_invalid() {
        assert!(!is_valid_trace_id(&"0".repeat(32)));
    }

    #[test]
    fn wrong_length_trace_id_is_invalid() {
        assert!(!is_valid_trace_id("abc123"));
    }

    #[test]
    fn valid_hex_trace_id_is_accepted() {
        assert!(is_valid_trace_id(&"a".repeat(32)));
    }

    #[test]
    fn non_hex_characters_are_rejected() {
        let mut id = "a".repeat(31);
        id.push('g');
        assert!(!is_valid_trace_id(&id));
    }

    #[test]
    fn request_log_status_buckets() {
        let mk = |status: u16| RequestLog {
            correlation_id: "x".into(),
            method: "GET".into(),
            uri: "/".into(),
            status,
            response_time_us: 1,
            start_time: Utc::now(),
        };
        assert_eq!(mk(0).status_color(), "\x1b[32m");
        assert_eq!(mk(201).status_color(), "\x1b[32m");
        assert_eq!(mk(404).status_color(), "\x1b[33m");
        assert_eq!(mk(500).status_color(), "\x1b[31m");
    }
}
