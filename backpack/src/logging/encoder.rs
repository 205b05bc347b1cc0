//! Structured encoder (C5): one JSON object per record, terminated by a
//! newline. Includes the "smart line parser" that extracts `key=value`
//! tokens out of free-form string messages, and a pooled byte buffer that
//! bounds steady-state memory by discarding oversized buffers instead of
//! returning them to the pool.

use crate::logging::{Level, Message, Record};
use serde_json::{Map, Value};
use std::cell::RefCell;

/// Buffers larger than this are dropped rather than recycled, so one
/// adversarially large record doesn't permanently inflate the pool (§4.5, §9).
pub const MAX_POOLED_BUFFER_BYTES: usize = 64 * 1024;

thread_local! {
    static BUFFER_POOL: RefCell<Vec<Vec<u8>>> = const { RefCell::new(Vec::new()) };
}

/// A pool-backed byte buffer. Obtained via [`take_buffer`]; return it with
/// [`return_buffer`] once its bytes have been written to a sink. Dropping it
/// without returning it (e.g. on an early-return error path) simply forgoes
/// recycling — never a correctness problem, only a missed reuse.
pub struct PooledBuffer(Vec<u8>);

impl std::ops::Deref for PooledBuffer {
    type Target = Vec<u8>;
    fn deref(&self) -> &Vec<u8> {
        &self.0
    }
}

impl std::ops::DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.0
    }
}

/// Borrow a buffer from the pool, clearing any leftover bytes.
#[must_use]
pub fn take_buffer() -> PooledBuffer {
    let mut buf = BUFFER_POOL.with(|p| p.borrow_mut().pop()).unwrap_or_default();
    buf.clear();
    PooledBuffer(buf)
}

/// Return a buffer to the pool unless it has grown past
/// [`MAX_POOLED_BUFFER_BYTES`], in which case it is released to the
/// allocator instead, bounding steady-state pool memory under adversarial
/// input sizes (§9).
pub fn return_buffer(buf: PooledBuffer) {
    if buf.0.capacity() <= MAX_POOLED_BUFFER_BYTES {
        BUFFER_POOL.with(|p| p.borrow_mut().push(buf.0));
    }
}

#[cfg(test)]
pub(crate) fn pool_len() -> usize {
    BUFFER_POOL.with(|p| p.borrow().len())
}

/// Encode one record as a JSON line (including the trailing `\n`) into a
/// pooled buffer, which the caller must return with [`return_buffer`] after
/// writing its bytes to the target sink.
#[must_use]
pub fn encode_line(record: &Record) -> PooledBuffer {
    let mut out = take_buffer();
    let mut obj = Map::with_capacity(6);
    obj.insert("level".into(), Value::String(record.level.as_str().into()));
    obj.insert(
        "time".into(),
        Value::String(record.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true)),
    );
    if let Some(id) = &record.trace_id {
        obj.insert("trace_id".into(), Value::String(id.clone()));
    }
    if let Some(v) = &record.gofr_version {
        obj.insert("gofr_version".into(), Value::String(v.clone()));
    }

    match &record.message {
        Message::Text(s) | Message::Error(s) => {
            apply_smart_line(s, &mut obj);
        }
        other => {
            obj.insert(
                "message".into(),
                serde_json::to_value(other).unwrap_or(Value::Null),
            );
        }
    }

    let value = Value::Object(obj);
    match serde_json::to_writer(&mut *out, &value) {
        Ok(()) => out.push(b'\n'),
        Err(e) => {
            out.clear();
            let placeholder = serde_json::json!({
                "level": record.level.as_str(),
                "message": format!("<encoding failed: {e}>"),
            });
            // A placeholder can only fail to serialize if allocation itself
            // fails; at that point there is nothing left to do.
            let _ = serde_json::to_writer(&mut *out, &placeholder);
            out.push(b'\n');
        }
    }
    out
}

/// The smart line parser: extract `key=value` tokens from a free-form
/// string into typed top-level fields, leaving the remaining prose as
/// `message`. If the payload contains no `=`, it is the fast path: emitted
/// verbatim as `message` with no tokenizing work at all.
fn apply_smart_line(line: &str, obj: &mut Map<String, Value>) {
    if !line.contains('=') {
        obj.insert("message".into(), Value::String(line.to_string()));
        return;
    }

    let mut remainder_tokens = Vec::new();
    let mut rest_message = Vec::new();

    for token in tokenize(line) {
        match token.split_once('=') {
            Some((key, raw_value)) if is_field_name(key) => {
                remainder_tokens.push((key.to_string(), parse_value(raw_value)));
            }
            _ => rest_message.push(token),
        }
    }

    if remainder_tokens.is_empty() {
        obj.insert("message".into(), Value::String(line.to_string()));
        return;
    }

    for (k, v) in remainder_tokens {
        obj.insert(k, v);
    }
    obj.insert("message".into(), Value::String(rest_message.join(" ")));
}

/// Splits on whitespace like `str::split_whitespace`, except a `"…"` span
/// is kept as one token even when it contains interior spaces — so
/// `name="Alice Smith"` tokenizes to `[name="Alice Smith"]`, not
/// `[name="Alice, Smith"]`. An unterminated quote runs to the end of the
/// line rather than panicking.
fn tokenize(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let len = bytes.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < len {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len {
            break;
        }
        let start = i;
        let mut in_quotes = false;
        while i < len {
            match bytes[i] {
                b'"' => {
                    in_quotes = !in_quotes;
                    i += 1;
                }
                b if b.is_ascii_whitespace() && !in_quotes => break,
                _ => i += 1,
            }
        }
        tokens.push(&line[start..i]);
    }

    tokens
}

fn is_field_name(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_value(raw: &str) -> Value {
    // Quoted values become strings outright.
    if let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    {
        return Value::String(inner.to_string());
    }

    // A trailing time unit (ns/us/ms/s/m/h) makes this a duration: keep it
    // as a string tagged with its unit rather than silently losing meaning
    // by converting to a bare number.
    for unit in ["ns", "us", "ms", "s", "m", "h"] {
        if let Some(num) = raw.strip_suffix(unit)
            && !num.is_empty()
            && num.chars().all(|c| c.is_ascii_digit() || c == '.')
        {
            return Value::String(raw.to_string());
        }
    }

    if let Ok(b) = raw.parse::<bool>() {
        return Value::Bool(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = raw.parse::<f64>()
        && let Some(n) = serde_json::Number::from_f64(f)
    {
        return Value::Number(n);
    }
    Value::String(raw.to_string())
}
