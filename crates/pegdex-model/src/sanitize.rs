//! Flattening of raw records into a diagnostic blob.
//!
//! Extracted entities keep a copy of their originating record for debugging.
//! The copy is flattened so it is always representable as plain JSON:
//! primitives are kept, lists become arrays of primitives or strings, and
//! anything else is stringified.

use std::collections::BTreeMap;

use serde_json::{Number, Value};

use crate::value::{RawRecord, RawValue};

/// Sanitized copy of a raw record.
pub type RawData = BTreeMap<String, Value>;

/// Sanitizes every field of `record`.
pub fn sanitize_record(record: &RawRecord) -> RawData {
    record
        .iter()
        .map(|(name, value)| (name.clone(), sanitize_value(value)))
        .collect()
}

/// Sanitizes a single top-level field value.
pub fn sanitize_value(value: &RawValue) -> Value {
    match value {
        RawValue::List(items) => Value::Array(items.iter().map(flatten_item).collect()),
        other => flatten_item(other),
    }
}

/// Keeps primitives, stringifies everything else.
fn flatten_item(value: &RawValue) -> Value {
    match value {
        RawValue::Null => Value::Null,
        RawValue::Bool(b) => Value::Bool(*b),
        RawValue::Int(i) => Value::Number((*i).into()),
        RawValue::String(s) => Value::String(s.clone()),
        RawValue::Float(x) => Number::from_f64(*x)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(x.to_string())),
        other => Value::String(other.to_string()),
    }
}
