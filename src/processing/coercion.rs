//! Value coercion used by ordering and aggregation.
//!
//! Two numeric readings exist and they are deliberately different:
//!
//! - [`parse_float`] reads a leading numeric prefix (`"12px"` is `12`). Ordering uses it.
//! - [`numeric_value`] requires the whole (trimmed) value to be a number. Aggregation uses it to
//!   decide which elements to skip.
//!
//! Each ordering/aggregation call classifies values once ([`classify`], [`SortKey::of`]) and then
//! dispatches on the tag instead of re-inspecting the raw value per comparison.

use std::cmp::Ordering;

use crate::types::Value;

/// Coarse classification of a value for comparator/accumulator selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A number, or text that is entirely a number.
    Numeric,
    /// A boolean.
    Boolean,
    /// Any other text.
    Text,
    /// Null, records and sequences.
    Other,
}

/// Classify a value. See [`ValueKind`].
pub fn classify(value: &Value) -> ValueKind {
    match value {
        Value::Bool(_) => ValueKind::Boolean,
        v if numeric_value(v).is_some() => ValueKind::Numeric,
        Value::Utf8(_) => ValueKind::Text,
        _ => ValueKind::Other,
    }
}

/// Leading-prefix numeric parse.
///
/// Numbers parse as themselves (NaN does not parse). Text parses its longest numeric prefix after
/// leading whitespace, including `Infinity`. A sequence parses the text it renders to (so `[5]`
/// is `5`). Booleans, null and records never parse.
pub fn parse_float(value: &Value) -> Option<f64> {
    match value {
        Value::Int64(v) => Some(*v as f64),
        Value::Float64(v) if v.is_nan() => None,
        Value::Float64(v) => Some(*v),
        Value::Utf8(s) => scan_number(s.trim_start()).map(|(n, _)| n),
        Value::List(_) => scan_number(text_of(value).trim_start()).map(|(n, _)| n),
        Value::Null | Value::Bool(_) | Value::Record(_) => None,
    }
}

/// Strict numeric reading: numbers (except NaN) and text that is entirely one number.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Int64(v) => Some(*v as f64),
        Value::Float64(v) if v.is_nan() => None,
        Value::Float64(v) => Some(*v),
        Value::Utf8(s) => {
            let trimmed = s.trim();
            match scan_number(trimmed) {
                Some((n, used)) if used == trimmed.len() => Some(n),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Integer truncation of [`numeric_value`], saturating at the `i64` bounds.
pub fn integer_value(value: &Value) -> Option<i64> {
    numeric_value(value).map(|n| n.trunc() as i64)
}

/// Text rendering of a value as a dynamic host would print it.
///
/// Whole floats print without a fractional part, non-finite floats print as `NaN`/`Infinity`,
/// sequences join their elements with `,` (nulls render empty), and records render as JSON.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Int64(v) => v.to_string(),
        Value::Float64(v) => float_text(*v),
        Value::Bool(v) => v.to_string(),
        Value::Utf8(s) => s.clone(),
        Value::Record(_) => value.to_json().to_string(),
        Value::List(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => text_of(other),
            })
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn float_text(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        let text = if v > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if v == 0.0 {
        "0".to_string()
    } else {
        v.to_string()
    }
}

/// Scan a number at the start of `s`. Returns the value and the number of bytes consumed.
fn scan_number(s: &str) -> Option<(f64, usize)> {
    let bytes = s.as_bytes();
    let mut i = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    if s[i..].starts_with("Infinity") {
        let n = if negative { f64::NEG_INFINITY } else { f64::INFINITY };
        return Some((n, i + "Infinity".len()));
    }

    let mantissa_start = i;
    let mut digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        let dot = i;
        i += 1;
        let mut frac_digits = 0;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            frac_digits += 1;
        }
        if digits == 0 && frac_digits == 0 {
            i = dot;
        }
        digits += frac_digits;
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    let parsed: f64 = s[mantissa_start..i].parse().ok()?;
    Some((if negative { -parsed } else { parsed }, i))
}

/// Precomputed ordering key for one element of an ordering call.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Numeric(f64),
    /// Upper-cased text, compared case-insensitively.
    Text(String),
}

impl SortKey {
    /// Numeric when [`parse_float`] succeeds, otherwise the upper-cased text rendering.
    pub fn of(value: &Value) -> Self {
        match parse_float(value) {
            Some(n) => Self::Numeric(n),
            None => Self::Text(text_of(value).to_uppercase()),
        }
    }

    /// Total order over keys: numbers ascending, then text ascending. Numbers sort before text.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Numeric(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Numeric(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, integer_value, numeric_value, parse_float, text_of, SortKey, ValueKind};
    use crate::types::Value;
    use std::cmp::Ordering;

    #[test]
    fn parse_float_reads_leading_prefix() {
        assert_eq!(parse_float(&Value::from("12px")), Some(12.0));
        assert_eq!(parse_float(&Value::from("  -3.5e2xyz")), Some(-350.0));
        assert_eq!(parse_float(&Value::from(".5")), Some(0.5));
        assert_eq!(parse_float(&Value::from("1e")), Some(1.0));
        assert_eq!(parse_float(&Value::from("-Infinity")), Some(f64::NEG_INFINITY));
        assert_eq!(parse_float(&Value::from("abc")), None);
        assert_eq!(parse_float(&Value::from(".")), None);
        assert_eq!(parse_float(&Value::from("")), None);
    }

    #[test]
    fn parse_float_rejects_non_text_non_numbers() {
        assert_eq!(parse_float(&Value::Bool(true)), None);
        assert_eq!(parse_float(&Value::Null), None);
        assert_eq!(parse_float(&Value::record([("a", 1)])), None);
        assert_eq!(parse_float(&Value::Float64(f64::NAN)), None);
        assert_eq!(parse_float(&Value::list([5])), Some(5.0));
        assert_eq!(parse_float(&Value::List(vec![])), None);
    }

    #[test]
    fn numeric_value_requires_whole_text() {
        assert_eq!(numeric_value(&Value::from(" 42 ")), Some(42.0));
        assert_eq!(numeric_value(&Value::from("42abc")), None);
        assert_eq!(numeric_value(&Value::from("")), None);
        assert_eq!(numeric_value(&Value::Bool(true)), None);
        assert_eq!(numeric_value(&Value::Float64(2.5)), Some(2.5));
    }

    #[test]
    fn integer_value_truncates_toward_zero() {
        assert_eq!(integer_value(&Value::Float64(-3.7)), Some(-3));
        assert_eq!(integer_value(&Value::from("12.9")), Some(12));
    }

    #[test]
    fn classify_tags_values() {
        assert_eq!(classify(&Value::Int64(1)), ValueKind::Numeric);
        assert_eq!(classify(&Value::from("7")), ValueKind::Numeric);
        assert_eq!(classify(&Value::Bool(false)), ValueKind::Boolean);
        assert_eq!(classify(&Value::from("seven")), ValueKind::Text);
        assert_eq!(classify(&Value::Null), ValueKind::Other);
        assert_eq!(classify(&Value::List(vec![])), ValueKind::Other);
    }

    #[test]
    fn text_of_matches_host_rendering() {
        assert_eq!(text_of(&Value::Float64(1.0)), "1");
        assert_eq!(text_of(&Value::Float64(-0.0)), "0");
        assert_eq!(text_of(&Value::Float64(f64::INFINITY)), "Infinity");
        assert_eq!(text_of(&Value::list([Value::Int64(1), Value::Null, Value::from("x")])), "1,,x");
        assert_eq!(text_of(&Value::record([("a", 1)])), r#"{"a":1}"#);
    }

    #[test]
    fn sort_keys_order_numbers_before_text() {
        let n = SortKey::of(&Value::Int64(100));
        let t = SortKey::of(&Value::from("apple"));
        assert_eq!(n.compare(&t), Ordering::Less);
        assert_eq!(t.compare(&n), Ordering::Greater);
        assert_eq!(
            SortKey::of(&Value::from("apple")).compare(&SortKey::of(&Value::from("APPLE"))),
            Ordering::Equal
        );
    }
}
