//! Lenient conversions from parsed YAML values to Rust scalars.
//!
//! Every function returns `None` when the value cannot be converted; the
//! typed getters of [`RawSource`](crate::RawSource) turn that into the
//! type's zero value.
//!
//! | Target | Accepts |
//! |--------|---------|
//! | `String` | strings, numbers, booleans |
//! | `bool` | booleans, `1/t/true/0/f/false` strings, numbers (non-zero is true) |
//! | integers | integers, floats (truncated), numeric strings (`0x`/`0o`/`0b`, `"3.0"`), booleans |
//! | `f64` | numbers, numeric strings, booleans |
//! | `Duration` | Go-style strings (`1m30s`), bare numbers as nanoseconds |
//! | `Vec<String>` | sequences of scalars, whitespace-separated strings |

use std::time::Duration;

use num_traits::ToPrimitive;
use serde_json::{Number, Value};

use super::duration::parse_duration;

/// Converts to a string. Floats print without a trailing `.0`.
#[must_use]
pub fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),

        Value::Number(n) => Some(number_to_string(n)),

        Value::Bool(b) => Some(b.to_string()),

        _ => None,
    }
}

fn number_to_string(n: &Number) -> String {
    if n.is_f64() {
        n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
    } else {
        n.to_string()
    }
}

/// Converts to a boolean.
#[must_use]
pub fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),

        Value::Number(n) => n.as_f64().map(|f| f != 0.0),

        Value::String(s) => match s.trim() {
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),

            "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),

            _ => None,
        },

        _ => None,
    }
}

/// Converts to a 64-bit signed integer.
#[must_use]
pub fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().and_then(|u| u.to_i64()))
            .or_else(|| n.as_f64().and_then(|f| f.trunc().to_i64())),

        Value::String(s) => parse_int(s),

        Value::Bool(b) => Some(i64::from(*b)),

        _ => None,
    }
}

/// Converts to a 32-bit signed integer; out-of-range values yield `None`.
#[must_use]
pub fn to_i32(value: &Value) -> Option<i32> {
    to_i64(value).and_then(|n| n.to_i32())
}

/// Converts to a 64-bit float.
#[must_use]
pub fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),

        Value::String(s) => s.trim().parse::<f64>().ok(),

        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),

        _ => None,
    }
}

/// Converts to a [`Duration`].
///
/// Strings containing a unit letter are parsed as Go-style durations;
/// any other number (or numeric string) counts nanoseconds.
#[must_use]
pub fn to_duration(value: &Value) -> Option<Duration> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(Duration::from_nanos)
            .or_else(|| n.as_f64().and_then(|f| f.to_u64()).map(Duration::from_nanos)),

        Value::String(s) => {
            let s = s.trim();
            if s.contains(['n', 's', 'u', 'µ', 'μ', 'm', 'h']) {
                parse_duration(s)
            } else {
                parse_int(s)
                    .and_then(|n| n.to_u64())
                    .map(Duration::from_nanos)
            }
        }

        _ => None,
    }
}

/// Converts to a list of strings.
#[must_use]
pub fn to_string_slice(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| to_string(item).unwrap_or_else(|| item.to_string()))
                .collect(),
        ),

        Value::String(s) => Some(s.split_whitespace().map(str::to_string).collect()),

        _ => None,
    }
}

/// Parses an integer string, accepting radix prefixes and a zero fraction.
fn parse_int(s: &str) -> Option<i64> {
    let s = trim_zero_decimal(s.trim());
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let (radix, digits) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        _ => (10, digits),
    };

    if digits.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = i128::from_str_radix(&digits.replace('_', ""), radix).ok()?;
    let signed = if negative { -magnitude } else { magnitude };
    signed.to_i64()
}

/// `"3.00"` becomes `"3"`; anything else is returned untouched.
fn trim_zero_decimal(s: &str) -> &str {
    match s.split_once('.') {
        Some((whole, frac))
            if !whole.is_empty() && !frac.is_empty() && frac.bytes().all(|b| b == b'0') =>
        {
            whole
        }

        _ => s,
    }
}
