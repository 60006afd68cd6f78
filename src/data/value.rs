//! Loose scalar semantics
//!
//! Spreadsheet cells arrive as a mix of strings, numbers and booleans. These
//! helpers compare and classify them the way a dynamically typed spreadsheet
//! API would: `"3"` equals `3`, `true` equals `1`, and empty values are falsy.

use serde_json::Value as JsonValue;
use std::cmp::Ordering;

/// Whether a cell counts as present for inference purposes.
///
/// Absent, null, `0`, `""` and `false` are all falsy.
pub fn is_truthy(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => false,
        Some(JsonValue::Bool(b)) => *b,
        Some(JsonValue::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(JsonValue::String(s)) => !s.is_empty(),
        Some(JsonValue::Array(_)) | Some(JsonValue::Object(_)) => true,
    }
}

/// Numeric reading of a scalar. `None` stands for "not a number".
pub fn to_number(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Null => Some(0.0),
        JsonValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => string_to_number(s),
        JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

fn string_to_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
        }
    }

    // f64::from_str also accepts "inf" and "nan", which are not numbers here
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }

    trimmed.parse::<f64>().ok()
}

fn is_compound(value: &JsonValue) -> bool {
    matches!(value, JsonValue::Array(_) | JsonValue::Object(_))
}

/// Loose equality between two cells, absent and null being the same thing.
pub fn loose_eq(a: Option<&JsonValue>, b: Option<&JsonValue>) -> bool {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => true,
        (None, _) | (_, None) => false,
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => x == y,
        (Some(JsonValue::Bool(x)), Some(JsonValue::Bool(y))) => x == y,
        (Some(x), Some(y)) if is_compound(x) || is_compound(y) => x == y,
        (Some(x), Some(y)) => match (to_number(x), to_number(y)) {
            (Some(p), Some(q)) => p == q,
            _ => false,
        },
    }
}

/// A non-negative integer written in canonical form.
///
/// Strings must read back identically after parsing (no sign, no leading
/// zeros, no fraction, no exponent, no whitespace). Numbers must have no
/// fractional part. Both are bounded to the 32-bit signed range.
pub fn is_normal_integer(value: &JsonValue) -> bool {
    match value {
        JsonValue::String(s) => match s.parse::<i32>() {
            Ok(n) => n >= 0 && n.to_string() == *s,
            Err(_) => false,
        },
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => f.fract() == 0.0 && (0.0..=i32::MAX as f64).contains(&f),
            None => false,
        },
        _ => false,
    }
}

/// Render a cell the way it would print in a description or a String field.
pub fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                format_float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        JsonValue::Array(_) | JsonValue::Object(_) => value.to_string(),
    }
}

pub(crate) fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

fn sort_rank(value: Option<&JsonValue>) -> u8 {
    match value {
        None | Some(JsonValue::Null) => 0,
        Some(JsonValue::Bool(_)) | Some(JsonValue::Number(_)) => 1,
        Some(JsonValue::String(_)) => 2,
        Some(JsonValue::Array(_)) | Some(JsonValue::Object(_)) => 3,
    }
}

/// Total order over cells used by the `sort` arguments.
///
/// Numbers (and booleans as 0/1) compare numerically, strings by UTF-16
/// code units. Mixed columns rank null, then numbers, then strings.
pub fn compare_sort_keys(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    let (rank_a, rank_b) = (sort_rank(a), sort_rank(b));
    if rank_a != rank_b {
        return rank_a.cmp(&rank_b);
    }

    match (a, b) {
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => {
            x.encode_utf16().cmp(y.encode_utf16())
        }
        (Some(x), Some(y)) if rank_a == 1 => {
            let p = to_number(x).unwrap_or(0.0);
            let q = to_number(y).unwrap_or(0.0);
            p.partial_cmp(&q).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
        _ => Ordering::Equal,
    }
}
