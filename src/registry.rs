//! Process-wide, name-keyed registry of query factories.
//!
//! Hosts that want one well-known accessor (the classic `qA`) call [`register_default`] at
//! startup and later resolve it with [`lookup`]. Registration is idempotent: a name that is
//! already taken keeps its first factory.
//!
//! ```rust
//! use rust_array_query::registry::{lookup, register_default, DEFAULT_NAME};
//! use rust_array_query::types::Value;
//!
//! # fn main() -> Result<(), rust_array_query::QueryError> {
//! register_default();
//! let factory = lookup(DEFAULT_NAME).expect("registered above");
//! let q = factory(Value::list([1, 2, 3]))?;
//! assert_eq!(q.len(), 3);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::error::QueryResult;
use crate::processing::{create_query, Query};
use crate::types::Value;

/// Signature of a registered factory.
pub type QueryFactory = fn(Value) -> QueryResult<Query>;

/// Name [`register_default`] registers under.
pub const DEFAULT_NAME: &str = "qA";

fn registry() -> MutexGuard<'static, HashMap<String, QueryFactory>> {
    static REGISTRY: OnceLock<Mutex<HashMap<String, QueryFactory>>> = OnceLock::new();
    // The map is never left half-written, so a poisoned lock is still usable.
    REGISTRY
        .get_or_init(|| Mutex::new(HashMap::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Register `factory` under `name` unless the name is taken.
///
/// Returns `true` if this call performed the registration.
pub fn register_if_absent(name: &str, factory: QueryFactory) -> bool {
    let mut map = registry();
    if map.contains_key(name) {
        tracing::debug!(name, "factory already registered; keeping existing");
        return false;
    }
    map.insert(name.to_owned(), factory);
    tracing::debug!(name, "factory registered");
    true
}

/// Resolve a registered factory.
pub fn lookup(name: &str) -> Option<QueryFactory> {
    registry().get(name).copied()
}

/// Register [`create_query`] under [`DEFAULT_NAME`].
pub fn register_default() -> bool {
    register_if_absent(DEFAULT_NAME, create_query_from_value)
}

fn create_query_from_value(source: Value) -> QueryResult<Query> {
    create_query(source)
}
