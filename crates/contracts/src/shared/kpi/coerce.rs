//! Field-level coercion rules for untrusted KPI payloads.
//!
//! Every loosely-typed value that crosses into `KpiPayloadSafe` goes through
//! one of these functions. None of them fail: a value that cannot be read as
//! the requested kind degrades to a neutral default (`0`, `""`, empty list).

use serde_json::Value;

/// Coerce any JSON value to a finite number.
///
/// - numbers are used as-is
/// - strings are trimmed and parsed (`""` is `0`)
/// - booleans become `1` / `0`
/// - everything else, and every parse that does not yield a finite number, is `0`
pub fn coerce_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_number_text(s),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => 0.0,
    };

    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Same as [`coerce_number`] for a field that may be missing.
pub fn coerce_number_opt(value: Option<&Value>) -> f64 {
    value.map(coerce_number).unwrap_or(0.0)
}

fn parse_number_text(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    // f64::from_str accepts "inf"/"nan"; both fall through to 0 in the caller.
    trimmed.parse::<f64>().unwrap_or(0.0)
}

/// Coerce any JSON value to its display text.
///
/// `null` becomes `""`, strings are kept, numbers print in their shortest
/// form (`5.0` prints as `5`), arrays and objects are serialized as JSON.
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(u)) => u.to_string(),
            _ => number_text(n.as_f64().unwrap_or(0.0)),
        },
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}

/// Same as [`coerce_string`] for a field that may be missing.
pub fn coerce_string_opt(value: Option<&Value>) -> String {
    value.map(coerce_string).unwrap_or_default()
}

/// `Some(text)` when the field is present, not null and not blank.
pub fn coerce_optional_string(value: Option<&Value>) -> Option<String> {
    let text = coerce_string_opt(value);
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Borrow the elements of a JSON array; anything that is not an array reads as empty.
pub fn coerce_array(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    }
}

/// Shortest text for a float: integral values print without a fraction.
pub fn number_text(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}
