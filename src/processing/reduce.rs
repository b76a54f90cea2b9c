//! Aggregation over a sequence of [`Value`]s.
//!
//! Built-in reductions skip elements that are not numeric-parseable (see
//! [`super::coercion::numeric_value`]). Two behaviors here are kept on purpose even though they
//! surprise: `Min`/`Max` are seeded at `0`, and [`aggregate`] maps a falsy final result to `0`.

use super::coercion::{classify, integer_value, numeric_value, ValueKind};
use crate::types::Value;

/// Built-in reduction operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all elements (numeric or not).
    Count,
    /// Floating-point sum of numeric elements.
    Sum,
    /// Integer sum of numeric elements, each truncated toward zero first.
    SumInteger,
    /// Integer minimum, seeded at `0`. While the accumulator is `0` only a positive value
    /// replaces it; after that any smaller value does, negatives included.
    Min,
    /// Integer maximum, seeded at `0`.
    Max,
    /// Mean of numeric elements; `NaN` when there are none.
    Average,
}

/// Reduce `values` with a built-in [`ReduceOp`].
///
/// - `Count`, `SumInteger`, `Min` and `Max` return [`Value::Int64`].
/// - `Sum` and `Average` return [`Value::Float64`].
pub fn reduce(values: &[Value], op: ReduceOp) -> Value {
    match op {
        ReduceOp::Count => Value::from(values.len()),
        ReduceOp::Sum => Value::Float64(values.iter().filter_map(numeric_value).sum()),
        ReduceOp::SumInteger => Value::Int64(
            values
                .iter()
                .filter_map(integer_value)
                .fold(0_i64, i64::saturating_add),
        ),
        ReduceOp::Min => Value::Int64(seeded_min(values)),
        ReduceOp::Max => Value::Int64(seeded_max(values)),
        ReduceOp::Average => {
            let (total, n) = values
                .iter()
                .filter_map(numeric_value)
                .fold((0.0_f64, 0_usize), |(t, n), v| (t + v, n + 1));
            Value::Float64(total / n as f64)
        }
    }
}

fn seeded_min(values: &[Value]) -> i64 {
    let mut acc = 0_i64;
    for v in values.iter().filter_map(integer_value) {
        if acc == 0 {
            if v > 0 {
                acc = v;
            }
        } else if v < acc {
            acc = v;
        }
    }
    acc
}

fn seeded_max(values: &[Value]) -> i64 {
    values
        .iter()
        .filter_map(integer_value)
        .fold(0_i64, |acc, v| acc.max(v))
}

/// Seed derived from the first element when the caller supplies none: `0` for numbers, `false`
/// for booleans, empty text for everything else.
pub fn default_seed(first: &Value) -> Value {
    match classify(first) {
        ValueKind::Numeric => Value::Int64(0),
        ValueKind::Boolean => Value::Bool(false),
        ValueKind::Text | ValueKind::Other => Value::Utf8(String::new()),
    }
}

/// Left fold of `combine(accumulator, element)` over `values`.
///
/// The accumulator starts at `seed`, or at [`default_seed`] of the first element. An empty
/// sequence yields the seed (or `0` without one). A falsy final result (`false`, `""`, `0`,
/// `NaN`, null) is returned as `Int64(0)`.
pub fn aggregate<F, R>(values: &[Value], mut combine: F, seed: Option<Value>) -> Value
where
    F: FnMut(Value, &Value) -> R,
    R: Into<Value>,
{
    let start = match seed {
        Some(s) => s,
        None => match values.first() {
            Some(first) => default_seed(first),
            None => return Value::Int64(0),
        },
    };

    let result = values.iter().fold(start, |acc, v| combine(acc, v).into());
    if result.is_truthy() {
        result
    } else {
        Value::Int64(0)
    }
}
