//! Pretty printer (C4): human-readable, single-line rendering of a record.
//!
//! `<level-tag-colored> [HH:MM:SS] <body>`, with the body dispatching on the
//! message variant. Color is suppressed (but layout preserved) when the
//! target sink is not a TTY.

use crate::logging::{Message, Record};

const RESET: &str = "\x1b[0m";

fn colorize(tty: bool, color: &str, text: &str) -> String {
    if tty {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}

fn clean_target(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render one record as a single pretty line, without a trailing newline.
#[must_use]
pub fn render(record: &Record, tty: bool) -> String {
    let time = record.timestamp.format("%H:%M:%S");
    let level_tag = colorize(tty, record.level.color(), record.level.tag());
    let body = render_body(&record.message, tty);
    format!("{level_tag} [{time}] {body}")
}

fn render_body(message: &Message, tty: bool) -> String {
    match message {
        Message::Text(s) | Message::Error(s) => s.clone(),
        Message::Request(r) => {
            let status = colorize(tty, r.status_color(), &r.status.to_string());
            format!(
                "{} {:>8}µs {} {}",
                status, r.response_time_us, r.method, r.uri
            )
        }
        Message::Query(q) => {
            let backend = colorize(tty, "\x1b[36m", &q.backend);
            let correlation_id = q.correlation_id.as_deref().unwrap_or("");
            format!(
                "{} {} {:>8}µs {} {}",
                correlation_id,
                backend,
                q.duration_us,
                q.operation,
                clean_target(&q.target)
            )
        }
        Message::Panic(p) => format!("{}\n{}", p.error, p.stack_trace),
    }
}
