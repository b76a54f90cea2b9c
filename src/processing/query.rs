//! The chainable query pipeline.
//!
//! A [`Query`] exclusively owns one buffer (`Vec<Value>`). Every operator reads the buffer,
//! replaces it eagerly, and returns `&mut Self` so calls chain. Nothing is lazy and nothing is
//! shared: the source is copied (or moved) in at construction, and the only way to observe the
//! buffer from outside is through the terminal accessors.
//!
//! ## Error policy
//!
//! Callback-taking operators never fail. Operators that take another sequence as an operand
//! (`union`, `except`, `intersect`, `zip`, `sequence_equal`) return
//! [`QueryError::InvalidOperand`] when that operand is not a [`Value::List`], leaving the buffer
//! untouched.

use rand::Rng;
use rand::seq::SliceRandom;

use super::equality::{contains_structural, shallow_eq};
use super::grouping;
use super::ordering::{sort_values, SortDirection};
use super::reduce::{self, ReduceOp};
use super::set_ops;
use crate::error::{QueryError, QueryResult};
use crate::execution::{QueryEvent, QueryOptions};
use crate::types::{GroupEntry, Value};

/// Wrap `source` in a new [`Query`] with default options.
///
/// Fails with [`QueryError::InvalidInput`] if `source` is null or not a sequence.
pub fn create_query(source: impl Into<Value>) -> QueryResult<Query> {
    Query::new(source)
}

/// Like [`create_query`], with explicit [`QueryOptions`].
pub fn create_query_with(source: impl Into<Value>, options: QueryOptions) -> QueryResult<Query> {
    Query::with_options(source, options)
}

/// A stateful, chainable query over an owned sequence of [`Value`]s.
///
/// Single-owner by construction: operators take `&mut self`, so no other handle can observe the
/// buffer while an operator runs.
#[derive(Debug, Clone, Default)]
pub struct Query {
    items: Vec<Value>,
    options: QueryOptions,
}

impl Query {
    /// Construct from a sequence value. See [`create_query`].
    pub fn new(source: impl Into<Value>) -> QueryResult<Self> {
        Self::with_options(source, QueryOptions::default())
    }

    /// Construct from a sequence value with explicit options.
    pub fn with_options(source: impl Into<Value>, options: QueryOptions) -> QueryResult<Self> {
        match source.into() {
            Value::List(items) => Ok(Self::from_vec_with(items, options)),
            Value::Null => Err(QueryError::invalid_input("undefined sequence")),
            other => Err(QueryError::invalid_input(format!(
                "expected a sequence, found {}",
                other.type_name()
            ))),
        }
    }

    /// Construct from an owned vector. Infallible.
    pub fn from_vec(items: Vec<Value>) -> Self {
        Self::from_vec_with(items, QueryOptions::default())
    }

    /// Construct from a borrowed slice, copying it.
    pub fn from_slice(items: &[Value]) -> Self {
        Self::from_vec(items.to_vec())
    }

    fn from_vec_with(items: Vec<Value>, options: QueryOptions) -> Self {
        tracing::debug!(len = items.len(), "query created");
        options.emit(QueryEvent::Created { len: items.len() });
        Self { items, options }
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    fn applied(&self, operator: &'static str, input_len: usize) {
        let output_len = self.items.len();
        tracing::trace!(operator, input_len, output_len, "query operator applied");
        self.options.emit(QueryEvent::OperatorApplied {
            operator,
            input_len,
            output_len,
        });
    }

    fn sequence_operand(&self, operator: &'static str, operand: Value) -> QueryResult<Vec<Value>> {
        match operand {
            Value::List(items) => Ok(items),
            other => {
                let found = other.type_name();
                tracing::debug!(operator, found, "sequence operand rejected");
                self.options.emit(QueryEvent::OperandRejected { operator, found });
                Err(QueryError::invalid_operand(
                    operator,
                    format!("expected a sequence, found {found}"),
                ))
            }
        }
    }

    // ---------------------------------------------------------------------------------------
    // Terminal extraction
    // ---------------------------------------------------------------------------------------

    /// Live handle to the buffer.
    ///
    /// This is not a copy: changes made through the handle are seen by later operators on the
    /// same query. Clone the vector if you need an isolated result.
    pub fn to_sequence(&mut self) -> &mut Vec<Value> {
        &mut self.items
    }

    /// Consume the query and return the buffer.
    pub fn into_sequence(self) -> Vec<Value> {
        self.items
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // ---------------------------------------------------------------------------------------
    // Filtering & projection
    // ---------------------------------------------------------------------------------------

    /// Keep elements for which `predicate(value, index)` holds, in order.
    #[doc(alias = "where")]
    pub fn filter<F>(&mut self, mut predicate: F) -> &mut Self
    where
        F: FnMut(&Value, usize) -> bool,
    {
        let input_len = self.items.len();
        let mut index = 0;
        self.items.retain(|v| {
            let keep = predicate(v, index);
            index += 1;
            keep
        });
        self.applied("filter", input_len);
        self
    }

    /// Replace every element with `transform(value, index)`.
    pub fn select<F, R>(&mut self, mut transform: F) -> &mut Self
    where
        F: FnMut(&Value, usize) -> R,
        R: Into<Value>,
    {
        let input_len = self.items.len();
        self.items = self
            .items
            .iter()
            .enumerate()
            .map(|(i, v)| transform(v, i).into())
            .collect();
        self.applied("select", input_len);
        self
    }

    /// Flatten sequence elements one level, projecting each inner element.
    ///
    /// `transform` receives the inner value and its index across the whole flattened output.
    /// Elements that are not sequences are dropped.
    pub fn select_many<F, R>(&mut self, mut transform: F) -> &mut Self
    where
        F: FnMut(&Value, usize) -> R,
        R: Into<Value>,
    {
        let input_len = self.items.len();
        let mut flattened: Vec<Value> = Vec::new();
        for inner in self.items.iter().filter_map(Value::as_list) {
            for v in inner {
                let index = flattened.len();
                flattened.push(transform(v, index).into());
            }
        }
        self.items = flattened;
        self.applied("select_many", input_len);
        self
    }

    /// Call `action(value, index)` for each element. The buffer is unchanged.
    pub fn for_each<F>(&mut self, mut action: F) -> &mut Self
    where
        F: FnMut(&Value, usize),
    {
        for (i, v) in self.items.iter().enumerate() {
            action(v, i);
        }
        self
    }

    // ---------------------------------------------------------------------------------------
    // Windowing
    // ---------------------------------------------------------------------------------------

    /// Drop the first `n` elements, but only when the buffer is longer than `n`.
    ///
    /// When `n >= len` the buffer is left as is rather than emptied.
    pub fn skip(&mut self, n: usize) -> &mut Self {
        let input_len = self.items.len();
        if n > 0 && input_len > n {
            self.items.drain(..n);
        }
        self.applied("skip", input_len);
        self
    }

    /// Keep the first `n` elements, under the same `len > n` guard as [`Self::skip`].
    pub fn take(&mut self, n: usize) -> &mut Self {
        let input_len = self.items.len();
        if n > 0 && input_len > n {
            self.items.truncate(n);
        }
        self.applied("take", input_len);
        self
    }

    fn leading_run<F>(&self, mut predicate: F) -> usize
    where
        F: FnMut(&Value) -> bool,
    {
        self.items.iter().take_while(|&v| predicate(v)).count()
    }

    /// `skip` the leading run of elements satisfying `predicate`.
    pub fn skip_while<F>(&mut self, predicate: F) -> &mut Self
    where
        F: FnMut(&Value) -> bool,
    {
        let n = self.leading_run(predicate);
        self.skip(n)
    }

    /// `take` the leading run of elements satisfying `predicate`.
    pub fn take_while<F>(&mut self, predicate: F) -> &mut Self
    where
        F: FnMut(&Value) -> bool,
    {
        let n = self.leading_run(predicate);
        self.take(n)
    }

    /// 1-based paging with the configured default page size (10 unless overridden).
    pub fn page(&mut self, page_number: usize) -> &mut Self {
        let size = self.options.page_size();
        self.page_with_size(page_number, size)
    }

    /// `skip((page_number - 1) * page_size)` then `take(page_size)`.
    ///
    /// No bounds validation: pages past the end fall through the skip/take guards. Page `0`
    /// behaves like page `1`.
    pub fn page_with_size(&mut self, page_number: usize, page_size: usize) -> &mut Self {
        if self.items.is_empty() {
            return self;
        }
        self.skip(page_number.saturating_sub(1).saturating_mul(page_size))
            .take(page_size)
    }

    // ---------------------------------------------------------------------------------------
    // Ordering
    // ---------------------------------------------------------------------------------------

    /// Sort ascending by the raw values. See [`super::ordering`] for the comparator rules.
    pub fn order_by(&mut self) -> &mut Self {
        self.sort(None::<fn(&Value) -> Value>, SortDirection::Ascending, "order_by")
    }

    /// Sort ascending by `selector(value)`.
    pub fn order_by_key<F, K>(&mut self, mut selector: F) -> &mut Self
    where
        F: FnMut(&Value) -> K,
        K: Into<Value>,
    {
        self.sort(
            Some(|v: &Value| -> Value { selector(v).into() }),
            SortDirection::Ascending,
            "order_by",
        )
    }

    /// Sort descending by the raw values.
    pub fn order_by_descending(&mut self) -> &mut Self {
        self.sort(
            None::<fn(&Value) -> Value>,
            SortDirection::Descending,
            "order_by_descending",
        )
    }

    /// Sort descending by `selector(value)`.
    pub fn order_by_descending_key<F, K>(&mut self, mut selector: F) -> &mut Self
    where
        F: FnMut(&Value) -> K,
        K: Into<Value>,
    {
        self.sort(
            Some(|v: &Value| -> Value { selector(v).into() }),
            SortDirection::Descending,
            "order_by_descending",
        )
    }

    fn sort<F>(
        &mut self,
        selector: Option<F>,
        direction: SortDirection,
        operator: &'static str,
    ) -> &mut Self
    where
        F: FnMut(&Value) -> Value,
    {
        let input_len = self.items.len();
        sort_values(&mut self.items, selector, direction);
        self.applied(operator, input_len);
        self
    }

    /// Shuffle the buffer with the thread-local RNG.
    pub fn shuffle(&mut self) -> &mut Self {
        self.shuffle_with(&mut rand::thread_rng())
    }

    /// Shuffle the buffer with a caller-supplied RNG.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        let input_len = self.items.len();
        self.items.shuffle(rng);
        self.applied("shuffle", input_len);
        self
    }

    /// Reverse the buffer in place.
    pub fn reverse(&mut self) -> &mut Self {
        let input_len = self.items.len();
        self.items.reverse();
        self.applied("reverse", input_len);
        self
    }

    /// Replace the buffer with the integers `start..=end`.
    ///
    /// No-op when `end <= start`.
    pub fn range(&mut self, start: i64, end: i64) -> &mut Self {
        if end <= start {
            return self;
        }
        let input_len = self.items.len();
        self.items = (start..=end).map(Value::Int64).collect();
        self.applied("range", input_len);
        self
    }

    // ---------------------------------------------------------------------------------------
    // Set operations
    // ---------------------------------------------------------------------------------------

    /// Keep the first occurrence of each structurally-equal value.
    pub fn distinct(&mut self) -> &mut Self {
        let input_len = self.items.len();
        self.items = set_ops::distinct(std::mem::take(&mut self.items));
        self.applied("distinct", input_len);
        self
    }

    /// Append `other`, then [`Self::distinct`].
    pub fn union(&mut self, other: impl Into<Value>) -> QueryResult<&mut Self> {
        let other = self.sequence_operand("union", other.into())?;
        let input_len = self.items.len();
        self.items = set_ops::union(std::mem::take(&mut self.items), other);
        self.applied("union", input_len);
        Ok(self)
    }

    /// Keep elements with no structural match in `other`.
    pub fn except(&mut self, other: impl Into<Value>) -> QueryResult<&mut Self> {
        let other = self.sequence_operand("except", other.into())?;
        let input_len = self.items.len();
        self.items = set_ops::except(std::mem::take(&mut self.items), &other);
        self.applied("except", input_len);
        Ok(self)
    }

    /// Keep elements with at least one structural match in `other`.
    pub fn intersect(&mut self, other: impl Into<Value>) -> QueryResult<&mut Self> {
        let other = self.sequence_operand("intersect", other.into())?;
        let input_len = self.items.len();
        self.items = set_ops::intersect(std::mem::take(&mut self.items), &other);
        self.applied("intersect", input_len);
        Ok(self)
    }

    /// `true` if some element is structurally equal to `value`.
    pub fn contains(&self, value: impl Into<Value>) -> bool {
        contains_structural(&self.items, &value.into())
    }

    /// Same length and shallow-equal at every position. Two empty sequences are equal.
    ///
    /// Records and lists are never shallow-equal (see [`shallow_eq`]), including against a copy
    /// of this very buffer: `q.sequence_equal(q.as_slice().to_vec())` is `false` once the buffer
    /// holds a record or a list. Use [`Self::contains`] or [`structural_eq`] for deep comparison.
    ///
    /// [`structural_eq`]: super::equality::structural_eq
    pub fn sequence_equal(&self, other: impl Into<Value>) -> QueryResult<bool> {
        let other = self.sequence_operand("sequence_equal", other.into())?;
        Ok(self.items.len() == other.len()
            && self.items.iter().zip(&other).all(|(a, b)| shallow_eq(a, b)))
    }

    // ---------------------------------------------------------------------------------------
    // Grouping
    // ---------------------------------------------------------------------------------------

    /// Replace the buffer with one group per distinct key, in first-seen key order.
    ///
    /// Each element becomes a [`GroupEntry`] rendered as a record; read them back with
    /// [`Self::groups`].
    pub fn group_by<F, K>(&mut self, key_selector: F) -> &mut Self
    where
        F: FnMut(&Value) -> K,
        K: Into<Value>,
    {
        let input_len = self.items.len();
        self.items = grouping::group_by(&self.items, key_selector)
            .into_iter()
            .map(Value::from)
            .collect();
        self.applied("group_by", input_len);
        self
    }

    /// The buffer read as groups. Elements that are not groups are skipped.
    pub fn groups(&self) -> Vec<GroupEntry> {
        self.items.iter().filter_map(GroupEntry::from_value).collect()
    }

    // ---------------------------------------------------------------------------------------
    // Aggregation
    // ---------------------------------------------------------------------------------------

    /// Sum of numeric-parseable elements: `Int64` of truncated values when `as_integer`,
    /// otherwise `Float64`.
    pub fn sum(&self, as_integer: bool) -> Value {
        let op = if as_integer { ReduceOp::SumInteger } else { ReduceOp::Sum };
        reduce::reduce(&self.items, op)
    }

    /// Integer minimum seeded at `0`. The first positive value replaces the seed, and from then
    /// on any smaller value wins, so `[3, -1]` reports `-1` while `[-5, -2]` reports `0`.
    pub fn min(&self) -> i64 {
        reduce::reduce(&self.items, ReduceOp::Min).as_i64().unwrap_or(0)
    }

    /// Integer maximum seeded at `0`: an all-negative buffer reports `0`.
    pub fn max(&self) -> i64 {
        reduce::reduce(&self.items, ReduceOp::Max).as_i64().unwrap_or(0)
    }

    /// Mean of numeric-parseable elements, `NaN` if there are none.
    pub fn average(&self) -> f64 {
        reduce::reduce(&self.items, ReduceOp::Average)
            .as_f64()
            .unwrap_or(f64::NAN)
    }

    /// Fold `combine(accumulator, element)` over the buffer. See [`reduce::aggregate`].
    pub fn aggregate<F, R>(&self, combine: F, seed: Option<Value>) -> Value
    where
        F: FnMut(Value, &Value) -> R,
        R: Into<Value>,
    {
        reduce::aggregate(&self.items, combine, seed)
    }

    // ---------------------------------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------------------------------

    pub fn first(&self) -> Option<&Value> {
        self.items.first()
    }

    /// Narrow the buffer with `predicate`, then return its first element.
    pub fn first_where<F>(&mut self, mut predicate: F) -> Option<&Value>
    where
        F: FnMut(&Value) -> bool,
    {
        self.filter(|v, _| predicate(v));
        self.items.first()
    }

    pub fn last(&self) -> Option<&Value> {
        self.items.last()
    }

    /// Narrow the buffer with `predicate`, then return its last element.
    pub fn last_where<F>(&mut self, mut predicate: F) -> Option<&Value>
    where
        F: FnMut(&Value) -> bool,
    {
        self.filter(|v, _| predicate(v));
        self.items.last()
    }

    /// The sole element, or `None` when the buffer holds zero or several.
    pub fn single(&self) -> Option<&Value> {
        match self.items.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Narrow the buffer with `predicate`, then [`Self::single`].
    pub fn single_where<F>(&mut self, mut predicate: F) -> Option<&Value>
    where
        F: FnMut(&Value) -> bool,
    {
        self.filter(|v, _| predicate(v));
        self.single()
    }

    pub fn element_at(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Narrow the buffer with `predicate`, then count what is left.
    pub fn count_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Value) -> bool,
    {
        self.filter(|v, _| predicate(v)).len()
    }

    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&Value) -> bool,
    {
        self.items.iter().any(predicate)
    }

    /// `true` when every element satisfies `predicate`. An empty buffer returns `false`.
    pub fn all<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&Value) -> bool,
    {
        !self.items.is_empty() && self.items.iter().all(predicate)
    }

    /// Index of the first element satisfying `predicate`.
    pub fn index_of<F>(&self, predicate: F) -> Option<usize>
    where
        F: FnMut(&Value) -> bool,
    {
        self.items.iter().position(predicate)
    }

    /// Index of the last element satisfying `predicate`.
    pub fn last_index_of<F>(&self, predicate: F) -> Option<usize>
    where
        F: FnMut(&Value) -> bool,
    {
        self.items.iter().rposition(predicate)
    }

    /// Every index whose element satisfies `predicate`, ascending.
    pub fn all_indexes_of<F>(&self, mut predicate: F) -> Vec<usize>
    where
        F: FnMut(&Value) -> bool,
    {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, v)| predicate(*v))
            .map(|(i, _)| i)
            .collect()
    }

    // ---------------------------------------------------------------------------------------
    // Pairwise
    // ---------------------------------------------------------------------------------------

    /// Pair elements positionally with `other` and replace each pair with
    /// `combine(other_value, buffer_value)`.
    ///
    /// Buffer elements past the end of `other` are dropped. Note the argument order: the
    /// operand's element comes first.
    pub fn zip<F, R>(&mut self, other: impl Into<Value>, mut combine: F) -> QueryResult<&mut Self>
    where
        F: FnMut(&Value, &Value) -> R,
        R: Into<Value>,
    {
        let other = self.sequence_operand("zip", other.into())?;
        if self.items.is_empty() {
            return Ok(self);
        }
        let input_len = self.items.len();
        self.items = other
            .iter()
            .zip(self.items.iter())
            .map(|(o, v)| combine(o, v).into())
            .collect();
        self.applied("zip", input_len);
        Ok(self)
    }
}
