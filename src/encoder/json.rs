use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Cow;
use std::fmt::{self, Write};

use super::{Attributes, Record};
use crate::config::FieldKeys;

struct JsonRecord<'a> {
    keys: &'a FieldKeys,
    record: &'a Record,
}

impl Serialize for JsonRecord<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let JsonRecord { keys, record } = self;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(&keys.level_key, record.level.as_str())?;
        map.serialize_entry(&keys.time_key, &record.time)?;
        if let Some(caller) = &record.caller {
            map.serialize_entry(&keys.caller_key, caller)?;
        }
        map.serialize_entry(&keys.message_key, &record.message)?;
        for (key, value) in record.attributes.iter() {
            map.serialize_entry(&attribute_key(keys, key), value)?;
        }
        if let Some(trace) = &record.stacktrace {
            map.serialize_entry(&keys.stacktrace_key, trace)?;
        }
        map.end()
    }
}

/// Attributes named like a fixed field are moved under `fields.` so each
/// key appears once per line.
fn attribute_key<'k>(keys: &FieldKeys, key: &'k str) -> Cow<'k, str> {
    let fixed = [
        &keys.level_key,
        &keys.time_key,
        &keys.caller_key,
        &keys.message_key,
        &keys.stacktrace_key,
    ];
    if fixed.iter().any(|name| name.as_str() == key) {
        Cow::Owned(format!("fields.{key}"))
    } else {
        Cow::Borrowed(key)
    }
}

/// Serializes attributes as a JSON object, in recorded order.
pub(crate) struct AttributesObject<'a>(pub(crate) &'a Attributes);

impl Serialize for AttributesObject<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.0.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

pub(crate) fn write(writer: &mut impl Write, keys: &FieldKeys, record: &Record) -> fmt::Result {
    let line = serde_json::to_string(&JsonRecord { keys, record }).map_err(|_| fmt::Error)?;
    writeln!(writer, "{line}")
}
