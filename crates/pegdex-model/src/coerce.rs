//! Defensive conversions over [`RawValue`].
//!
//! Every helper is a pure function returning `Option<T>`: a value that cannot
//! be converted yields `None`, never a panic. Callers pick their own default.

use crate::value::RawValue;

/// Field name suffixes that mark a value as semantically integral.
pub const INTEGRAL_FIELD_SUFFIXES: &[&str] = &["Level", "Count"];

/// Converts a value to an integer.
///
/// Floats are rounded to the nearest integer; strings are parsed as an
/// integer first and as a float (then rounded) second.
pub fn to_int(value: &RawValue) -> Option<i64> {
    match value {
        RawValue::Int(i) => Some(*i),
        RawValue::Float(x) => float_to_int(*x),
        RawValue::Bool(b) => Some(*b as i64),
        RawValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_to_int))
        }
        _ => None,
    }
}

/// Converts a value to a float.
pub fn to_float(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Float(x) if x.is_finite() => Some(*x),
        RawValue::Int(i) => Some(*i as f64),
        RawValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        RawValue::String(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
        _ => None,
    }
}

/// Converts a value to a boolean.
///
/// Numbers are true when non-zero; strings accept `true/false`, `yes/no`
/// and `1/0` in any case.
pub fn to_bool(value: &RawValue) -> Option<bool> {
    match value {
        RawValue::Bool(b) => Some(*b),
        RawValue::Int(i) => Some(*i != 0),
        RawValue::Float(x) => Some(*x != 0.0),
        RawValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Converts a scalar value to a string. Lists, records and references
/// return `None`; use `to_string()` on the value to stringify those.
pub fn to_string(value: &RawValue) -> Option<String> {
    match value {
        RawValue::String(s) => Some(s.clone()),
        RawValue::Int(i) => Some(i.to_string()),
        RawValue::Float(x) => Some(x.to_string()),
        RawValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Returns a non-empty, trimmed string.
pub fn to_non_empty_string(value: &RawValue) -> Option<String> {
    to_string(value)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Returns true if the field name denotes an integral quantity.
pub fn is_integral_field(name: &str) -> bool {
    INTEGRAL_FIELD_SUFFIXES.iter().any(|s| name.ends_with(s))
}

/// Coerces a numeric field according to its name.
///
/// Integral fields (`...Level`, `...Count`) prefer integer representations
/// and round floats to the nearest integer; continuous fields keep float
/// precision.
pub fn field_number(name: &str, value: &RawValue) -> Option<f64> {
    if is_integral_field(name) {
        to_int(value).map(|i| i as f64)
    } else {
        to_float(value)
    }
}

fn float_to_int(x: f64) -> Option<i64> {
    if !x.is_finite() || x.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(x.round() as i64)
}
