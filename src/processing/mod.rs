//! The query pipeline and the utilities it is built from.
//!
//! [`Query`] is the entrypoint: it owns one buffer of [`crate::types::Value`]s and exposes the
//! chainable operators. The supporting modules are usable on their own over plain slices:
//!
//! - [`coercion`]: numeric/text coercion and per-call value classification
//! - [`equality`]: structural (deep) and shallow equality
//! - [`ordering`]: the ordering comparator
//! - [`set_ops`]: `distinct`/`union`/`except`/`intersect` under structural equality
//! - [`grouping`]: partitioning by a projected key
//! - [`reduce()`]/[`aggregate()`]: built-in reductions and the general fold
//!
//! ## Example: filter → project → order → aggregate
//!
//! ```rust
//! use rust_array_query::processing::create_query;
//! use rust_array_query::types::Value;
//!
//! # fn main() -> Result<(), rust_array_query::QueryError> {
//! let mut q = create_query(vec![5, 3, 8, 1, 3])?;
//! q.filter(|v, _| v.as_i64().is_some_and(|n| n > 1))
//!     .distinct()
//!     .order_by_descending();
//! assert_eq!(q.as_slice(), &[Value::Int64(8), Value::Int64(5), Value::Int64(3)]);
//! assert_eq!(q.sum(true), Value::Int64(16));
//! # Ok(())
//! # }
//! ```

pub mod coercion;
pub mod equality;
pub mod grouping;
pub mod ordering;
pub mod query;
pub mod reduce;
pub mod set_ops;

pub use ordering::SortDirection;
pub use query::{create_query, create_query_with, Query};
pub use reduce::{aggregate, reduce, ReduceOp};
