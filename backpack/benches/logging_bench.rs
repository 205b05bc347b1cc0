//! Hot-path benchmarks for the pieces every `log()` call runs through:
//! structured encoding, the smart line parser, pretty rendering, and
//! field masking.

use backpack::logging::{Level, QueryLog, Record, RequestLog};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn plain_message_record() -> Record {
    Record::new(Level::Info, "user connected count=3 ratio=1.5 admin=true elapsed=120ms")
}

fn request_log_record() -> Record {
    Record::new(
        Level::Info,
        RequestLog {
            correlation_id: "a".repeat(32),
            method: "GET".into(),
            uri: "/users/42/orders".into(),
            status: 200,
            response_time_us: 4123,
            start_time: chrono::Utc::now(),
        },
    )
}

fn query_log_with_nested_args() -> Record {
    Record::new(
        Level::Debug,
        QueryLog {
            backend: "ORACLE".into(),
            operation: "SELECT".into(),
            target: "SELECT * FROM users WHERE id = ?".into(),
            duration_us: 812,
            args: Some(serde_json::json!({
                "id": 42,
                "password": "hunter2",
                "nested": {"token": "abc123", "ok": true},
            })),
            correlation_id: Some("a".repeat(32)),
        },
    )
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_line");
    group.bench_function("plain_message_with_kv_tokens", |b| {
        let record = plain_message_record();
        b.iter(|| {
            let buf = backpack::logging::encoder::encode_line(black_box(&record));
            backpack::logging::encoder::return_buffer(buf);
        });
    });
    group.bench_function("request_log", |b| {
        let record = request_log_record();
        b.iter(|| {
            let buf = backpack::logging::encoder::encode_line(black_box(&record));
            backpack::logging::encoder::return_buffer(buf);
        });
    });
    group.finish();
}

fn bench_pretty(c: &mut Criterion) {
    let mut group = c.benchmark_group("pretty_render");
    group.bench_function("request_log", |b| {
        let record = request_log_record();
        b.iter(|| backpack::logging::pretty::render(black_box(&record), true));
    });
    group.finish();
}

fn bench_mask(c: &mut Criterion) {
    use backpack::logging::{FieldMasker, Filter};

    let mut group = c.benchmark_group("field_masker");
    group.bench_function("nested_query_args", |b| {
        let masker = FieldMasker::new(["password", "token"]);
        let record = query_log_with_nested_args();
        let args = match record.message {
            backpack::logging::Message::Query(q) => q.args.unwrap(),
            _ => unreachable!(),
        };
        b.iter(|| masker.apply(black_box(args.clone())));
    });
    group.finish();
}

criterion_group!(benches, bench_encode, bench_pretty, bench_mask);
criterion_main!(benches);
