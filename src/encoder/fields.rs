use serde_json::{Map, Value};
use std::fmt;
use tracing::field::{Field, Visit};

use crate::redaction;

/// Attributes of a record, in the order they were recorded.
#[derive(Debug, Default)]
pub(crate) struct Attributes {
    entries: Vec<(String, Value)>,
}

impl Attributes {
    /// Insert or overwrite in place, keeping first-seen order.
    pub(crate) fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Merge a span's fields, as stored by `JsonFields`.
    pub(crate) fn extend_from_json(&mut self, stored: &str) {
        if stored.is_empty() {
            return;
        }
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(stored) {
            self.extend_map(map);
        }
    }

    fn extend_map(&mut self, map: Map<String, Value>) {
        for (key, value) in map {
            self.insert(key, scrubbed(value));
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// Registered secrets are matched against the raw text, before JSON escaping
fn scrubbed(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(redaction::scrub(&s).into_owned()),
        other => other,
    }
}

/// Collects an event's message and fields.
#[derive(Default)]
pub(crate) struct EventVisitor {
    pub(crate) message: Option<String>,
    pub(crate) attributes: Attributes,
}

impl EventVisitor {
    fn record(&mut self, field: &Field, value: Value) {
        let name = field.name();
        let value = scrubbed(value);
        if name == "message" {
            self.message = Some(match value {
                Value::String(s) => s,
                other => other.to_string(),
            });
        } else if !name.starts_with("log.") {
            self.attributes
                .insert(name.strip_prefix("r#").unwrap_or(name), value);
        }
    }
}

impl Visit for EventVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        let value = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string()));
        self.record(field, value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, Value::from(value));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field, Value::from(format!("{value:?}")));
    }
}
