//! Ordering of sequences.
//!
//! The comparator is chosen once per call:
//!
//! - If the first element is text, the whole sequence sorts lexically by its text rendering and
//!   any selector is ignored.
//! - Otherwise each element gets a [`SortKey`] from the selector output (or the raw value): a
//!   number when it numerically parses, else upper-cased text. Numbers sort before text.
//!
//! Sorting is stable. Descending order is the reversed comparator, so equal keys keep their
//! relative order in both directions.

use std::cmp::Ordering;

use super::coercion::{text_of, SortKey};
use crate::types::Value;

/// Sort direction for [`sort_values`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Ascending => ord,
            Self::Descending => ord.reverse(),
        }
    }
}

/// Sort `values` in place. See the module docs for the comparator rules.
pub fn sort_values<F>(values: &mut Vec<Value>, selector: Option<F>, direction: SortDirection)
where
    F: FnMut(&Value) -> Value,
{
    if values.is_empty() {
        return;
    }

    if matches!(values[0], Value::Utf8(_)) {
        let mut keyed: Vec<(String, Value)> =
            values.drain(..).map(|v| (text_of(&v), v)).collect();
        keyed.sort_by(|(a, _), (b, _)| direction.apply(a.cmp(b)));
        values.extend(keyed.into_iter().map(|(_, v)| v));
        return;
    }

    let mut keyed: Vec<(SortKey, Value)> = match selector {
        Some(mut select) => values.drain(..).map(|v| (SortKey::of(&select(&v)), v)).collect(),
        None => values.drain(..).map(|v| (SortKey::of(&v), v)).collect(),
    };
    keyed.sort_by(|(a, _), (b, _)| direction.apply(a.compare(b)));
    values.extend(keyed.into_iter().map(|(_, v)| v));
}
