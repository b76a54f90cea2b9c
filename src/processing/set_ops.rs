//! Set operations over sequences under structural equality.
//!
//! All of these keep first-seen order. Values are never hashed: membership is a linear scan with
//! [`structural_eq`], so the cost is quadratic in the worst case.

use super::equality::{contains_structural, structural_eq};
use crate::types::Value;

/// Keep only the first occurrence of each structurally-equal value.
pub fn distinct(values: Vec<Value>) -> Vec<Value> {
    let mut unique: Vec<Value> = Vec::with_capacity(values.len());
    for v in values {
        if !contains_structural(&unique, &v) {
            unique.push(v);
        }
    }
    unique
}

/// `left` followed by `right`, de-duplicated.
pub fn union(mut left: Vec<Value>, right: Vec<Value>) -> Vec<Value> {
    left.extend(right);
    distinct(left)
}

/// Elements of `left` with no structural match in `right`.
pub fn except(left: Vec<Value>, right: &[Value]) -> Vec<Value> {
    left.into_iter()
        .filter(|v| !contains_structural(right, v))
        .collect()
}

/// Elements of `left` with at least one structural match in `right`. Duplicates in `left` are
/// kept.
pub fn intersect(left: Vec<Value>, right: &[Value]) -> Vec<Value> {
    left.into_iter()
        .filter(|v| right.iter().any(|r| structural_eq(v, r)))
        .collect()
}
