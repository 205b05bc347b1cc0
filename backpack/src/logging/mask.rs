//! Field masker / filter (C3): a pluggable, name-based redaction pass run
//! exactly once on a record's payload before it reaches the encoder.

use serde_json::Value;
use std::collections::HashSet;

/// Applies a redaction transform to a record's structured payload.
/// Implementors must produce a copy — the input is never mutated — and
/// must be idempotent-safe to call exactly once per record (callers are
/// responsible for the "exactly once" part; see `Logger::log_record`).
pub trait Filter: Send + Sync {
    fn apply(&self, payload: Value) -> Value;
}

/// The default filter: a configurable, case-sensitive set of field names to
/// mask. Traverses nested objects and arrays; a leaf whose key is in the
/// set is replaced (strings become a run of `*` of the same length, numbers
/// become zero, everything else — bool, null — is left intact). The filter
/// inspects field *names* only, never values.
pub struct FieldMasker {
    fields: HashSet<String>,
    enabled: bool,
}

impl FieldMasker {
    #[must_use]
    pub fn new(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            enabled: true,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            fields: HashSet::new(),
            enabled: true,
        }
    }

    /// Toggle masking globally. When disabled, `apply` is the identity
    /// function (spec §4.3).
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn mask_leaf(value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String("*".repeat(s.chars().count())),
            Value::Number(_) => Value::Number(0.into()),
            other => other.clone(),
        }
    }

    fn walk(&self, value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let mut out = serde_json::Map::with_capacity(map.len());
                for (k, v) in map {
                    if self.fields.contains(&k) {
                        out.insert(k, Self::mask_leaf(&v));
                    } else {
                        out.insert(k, self.walk(v));
                    }
                }
                Value::Object(out)
            }
            Value::Array(items) => Value::Array(items.into_iter().map(|v| self.walk(v)).collect()),
            other => other,
        }
    }
}

impl Filter for FieldMasker {
    fn apply(&self, payload: Value) -> Value {
        if !self.enabled {
            return payload;
        }
        self.walk(payload)
    }
}

/// A filter that never redacts anything — the identity transform, used when
/// no masking configuration is supplied.
pub struct NoopFilter;

impl Filter for NoopFilter {
    fn apply(&self, payload: Value) -> Value {
        payload
    }
}
