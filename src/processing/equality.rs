//! Structural and shallow equality between [`Value`]s.
//!
//! Structural equality answers "would these two values serialize to the same JSON text": it is
//! deep and order-sensitive (record field order and sequence order both matter), integers and
//! floats with the same value are equal, and non-finite floats are equal to `null`.

use crate::types::Value;

/// Deep, order-sensitive equality used by `contains`, `distinct`, grouping and the set operators.
pub fn structural_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int64(x), Value::Int64(y)) => x == y,
        (Value::Int64(x), Value::Float64(y)) | (Value::Float64(y), Value::Int64(x)) => {
            y.is_finite() && *x as f64 == *y
        }
        (Value::Float64(x), Value::Float64(y)) if x.is_finite() && y.is_finite() => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Utf8(x), Value::Utf8(y)) => x == y,
        (Value::Record(x), Value::Record(y)) => {
            x.len() == y.len()
                && x.iter()
                    .zip(y)
                    .all(|((kx, vx), (ky, vy))| kx == ky && structural_eq(vx, vy))
        }
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(vx, vy)| structural_eq(vx, vy))
        }
        _ => renders_null(a) && renders_null(b),
    }
}

fn renders_null(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Float64(f) => !f.is_finite(),
        _ => false,
    }
}

/// Positional, non-deep equality used by `sequence_equal`.
///
/// Scalars compare by value (numbers numerically, so `NaN` never equals anything). Records and
/// sequences are never shallowly equal: elements owned by a pipeline share no identity with
/// elements of another sequence.
pub fn shallow_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Utf8(x), Value::Utf8(y)) => x == y,
        (Value::Int64(x), Value::Int64(y)) => x == y,
        (Value::Int64(_) | Value::Float64(_), Value::Int64(_) | Value::Float64(_)) => {
            a.as_f64() == b.as_f64()
        }
        _ => false,
    }
}

/// `true` if any element of `haystack` is structurally equal to `needle`.
pub fn contains_structural(haystack: &[Value], needle: &Value) -> bool {
    haystack.iter().any(|v| structural_eq(v, needle))
}

#[cfg(test)]
mod tests {
    use super::{contains_structural, shallow_eq, structural_eq};
    use crate::types::Value;

    #[test]
    fn numbers_compare_across_int_and_float() {
        assert!(structural_eq(&Value::Int64(1), &Value::Float64(1.0)));
        assert!(!structural_eq(&Value::Int64(1), &Value::from("1")));
        assert!(!structural_eq(&Value::Int64(1), &Value::Bool(true)));
    }

    #[test]
    fn non_finite_floats_equal_null() {
        assert!(structural_eq(&Value::Float64(f64::NAN), &Value::Null));
        assert!(structural_eq(&Value::Float64(f64::NAN), &Value::Float64(f64::INFINITY)));
        assert!(!structural_eq(&Value::Float64(f64::NAN), &Value::Int64(0)));
    }

    #[test]
    fn records_are_field_order_sensitive() {
        let a = Value::record([("k", 1), ("v", 2)]);
        let b = Value::record([("k", 1), ("v", 2)]);
        let swapped = Value::record([("v", 2), ("k", 1)]);
        assert!(structural_eq(&a, &b));
        assert!(!structural_eq(&a, &swapped));
    }

    #[test]
    fn sequences_are_deep_and_order_sensitive() {
        let a = Value::list([Value::list([1, 2]), Value::from("x")]);
        let b = Value::list([Value::list([1, 2]), Value::from("x")]);
        let c = Value::list([Value::list([2, 1]), Value::from("x")]);
        assert!(structural_eq(&a, &b));
        assert!(!structural_eq(&a, &c));
    }

    #[test]
    fn shallow_eq_never_matches_composites() {
        assert!(shallow_eq(&Value::Int64(2), &Value::Float64(2.0)));
        assert!(!shallow_eq(&Value::Float64(f64::NAN), &Value::Float64(f64::NAN)));
        assert!(!shallow_eq(&Value::list([1]), &Value::list([1])));
        assert!(!shallow_eq(&Value::Int64(1), &Value::from("1")));
        assert!(shallow_eq(&Value::Null, &Value::Null));
    }

    #[test]
    fn contains_structural_searches_slice() {
        let hay = vec![Value::record([("a", 1)]), Value::from("b")];
        assert!(contains_structural(&hay, &Value::record([("a", 1)])));
        assert!(!contains_structural(&hay, &Value::record([("a", 2)])));
        assert!(!contains_structural(&[], &Value::Null));
    }
}
