//! Optional bridge into the ambient `tracing` ecosystem (feature
//! `tracing-bridge`): every record this crate emits is also turned into a
//! `tracing` event, so a service that already runs a `tracing_subscriber`
//! subscriber sees these records through it too, without switching its
//! own instrumentation over to this crate's types.

use crate::logging::{Level, Message, Record};

/// Re-emits `record` as a `tracing` event at the matching level. A no-op
/// if nothing is subscribed — `tracing`'s callsite cache makes the check
/// itself nearly free.
pub fn bridge(record: &Record) {
    let text = render_text(&record.message);
    let trace_id = record.trace_id.as_deref().unwrap_or_default();
    match record.level {
        Level::Debug => tracing::debug!(trace_id, "{text}"),
        Level::Info | Level::Notice => tracing::info!(trace_id, "{text}"),
        Level::Warn => tracing::warn!(trace_id, "{text}"),
        Level::Error => tracing::error!(trace_id, "{text}"),
        Level::Fatal => tracing::error!(trace_id, fatal = true, "{text}"),
    }
}

fn render_text(message: &Message) -> String {
    match message {
        Message::Text(s) | Message::Error(s) => s.clone(),
        Message::Request(r) => format!("{} {} -> {}", r.method, r.uri, r.status),
        Message::Query(q) => format!("{} {} {}", q.backend, q.operation, q.target),
        Message::Panic(p) => p.error.clone(),
    }
}

/// Installs a `tracing_subscriber` `fmt` subscriber honoring `RUST_LOG`,
/// for services that want bridged events rendered without bringing their
/// own subscriber. Idempotent: a subscriber already installed by the host
/// wins and this call is silently ignored.
pub fn init_ambient_subscriber() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::record::QueryLog;

    #[test]
    fn render_text_covers_every_message_variant() {
        assert_eq!(render_text(&Message::Text("hi".into())), "hi");
        assert_eq!(
            render_text(&Message::Query(QueryLog {
                backend: "ORACLE".into(),
                operation: "SELECT".into(),
                target: "users".into(),
                duration_us: 1,
                args: None,
                correlation_id: None,
            })),
            "ORACLE SELECT users"
        );
    }

    #[test]
    fn bridge_does_not_panic_without_a_subscriber() {
        bridge(&Record::new(Level::Info, "no subscriber installed"));
    }
}
