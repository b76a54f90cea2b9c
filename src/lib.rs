//! `rust-array-query` is a small library for running chainable, LINQ-style queries over an
//! in-memory sequence of dynamically-typed [`types::Value`]s.
//!
//! The primary entrypoint is [`processing::create_query`], which wraps a sequence in a
//! [`processing::Query`]. Every operator rewrites the query's buffer eagerly and returns the
//! query again, so calls chain.
//!
//! ## What a query can do
//!
//! - **Filter/project**: `filter`, `select`, `select_many`, `for_each`
//! - **Window**: `skip`, `take`, `skip_while`, `take_while`, `page`
//! - **Order**: `order_by`, `order_by_descending` (plus `_key` variants), `reverse`, `shuffle`
//! - **Set operations** under structural equality: `distinct`, `union`, `except`, `intersect`,
//!   `contains`, `sequence_equal`
//! - **Group**: `group_by`
//! - **Aggregate**: `sum`, `min`, `max`, `average`, `aggregate`
//! - **Look up**: `first`, `last`, `single`, `element_at`, `count`, `any`, `all`, `index_of`,
//!   `last_index_of`, `all_indexes_of`
//! - **Pair**: `zip`
//!
//! ## Quick example
//!
//! ```rust
//! use rust_array_query::processing::create_query;
//! use rust_array_query::types::Value;
//!
//! # fn main() -> Result<(), rust_array_query::QueryError> {
//! let people = Value::list([
//!     Value::record([("name", Value::from("Ada")), ("age", Value::from(36))]),
//!     Value::record([("name", Value::from("Bob")), ("age", Value::from(19))]),
//!     Value::record([("name", Value::from("Cy")), ("age", Value::from(52))]),
//! ]);
//!
//! let mut q = create_query(people)?;
//! q.filter(|p, _| p.get("age").and_then(Value::as_i64).is_some_and(|a| a >= 21))
//!     .order_by_descending_key(|p: &Value| p.get("age").cloned().unwrap_or_default())
//!     .select(|p, _| p.get("name").cloned().unwrap_or_default());
//!
//! assert_eq!(q.as_slice(), &[Value::from("Cy"), Value::from("Ada")]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Sources from JSON
//!
//! [`types::Value`] deserializes from any JSON document (record field order is kept), so a
//! JSON array can be queried directly:
//!
//! ```rust
//! use rust_array_query::processing::create_query;
//! use rust_array_query::types::Value;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source: Value = serde_json::from_str(r#"[{"id": 2}, {"id": 1}, {"id": 2}]"#)?;
//! let mut q = create_query(source)?;
//! q.distinct().order_by_key(|r: &Value| r.get("id").cloned());
//! assert_eq!(q.len(), 2);
//! assert_eq!(q.first().and_then(|r| r.get("id")), Some(&Value::Int64(1)));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`processing`]: the query pipeline and its coercion/equality/ordering/set utilities
//! - [`types`]: the value model
//! - [`execution`]: query configuration and operator observers
//! - [`registry`]: process-wide named factory registration
//! - [`error`]: error types

pub mod error;
pub mod execution;
pub mod processing;
pub mod registry;
pub mod types;

pub use error::{QueryError, QueryResult};
