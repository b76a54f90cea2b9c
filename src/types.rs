//! Core data model types for the query pipeline.
//!
//! The pipeline imposes no schema: every element is a dynamically-typed [`Value`] drawn from a
//! closed set of variants, and operators interpret values heuristically at call time.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

/// A single dynamically-typed element flowing through a [`crate::processing::Query`].
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum Value {
    /// Missing/empty value. Also the null-equivalent returned by lookups on the JSON surface.
    #[default]
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Structured record. Field order is insertion order and is significant for equality.
    Record(Vec<(String, Value)>),
    /// Nested sequence.
    List(Vec<Value>),
}

impl Value {
    /// Build a record from `(name, value)` pairs, keeping their order.
    pub fn record<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Record(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a list from anything convertible into values.
    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Integer view. Floats with no fractional part are accepted.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            Self::Float64(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    /// Float view of either numeric variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int64(v) => Some(*v as f64),
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&[(String, Value)]> {
        match self {
            Self::Record(fields) => Some(fields.as_slice()),
            _ => None,
        }
    }

    /// Look up a record field by name. Returns `None` for non-records and missing fields.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_record()?
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| v)
    }

    /// Falsiness as the dynamic hosts define it: `null`, `false`, `0`, `NaN` and empty text are
    /// falsy; everything else (including empty lists and records) is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Int64(v) => *v != 0,
            Self::Float64(v) => *v != 0.0 && !v.is_nan(),
            Self::Bool(v) => *v,
            Self::Utf8(s) => !s.is_empty(),
            Self::Record(_) | Self::List(_) => true,
        }
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Int64(_) => "integer",
            Self::Float64(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Utf8(_) => "text",
            Self::Record(_) => "record",
            Self::List(_) => "sequence",
        }
    }

    /// Convert into a `serde_json` value. Non-finite floats become JSON `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Int64(v) => serde_json::Value::from(*v),
            Self::Float64(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Bool(v) => serde_json::Value::Bool(*v),
            Self::Utf8(s) => serde_json::Value::String(s.clone()),
            Self::Record(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Int64(v) => serializer.serialize_i64(*v),
            Self::Float64(v) if v.is_finite() => serializer.serialize_f64(*v),
            Self::Float64(_) => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Utf8(s) => serializer.serialize_str(s),
            Self::Record(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int64(i),
                None => n.as_f64().map(Self::Float64).unwrap_or(Self::Null),
            },
            serde_json::Value::String(s) => Self::Utf8(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Record(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int64(i64::from(v))
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        i64::try_from(v)
            .map(Self::Int64)
            .unwrap_or(Self::Float64(v as f64))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Utf8(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Utf8(v)
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

/// One partition produced by [`crate::processing::Query::group_by`].
///
/// Once grouping runs, each buffer element is a group rendered as a record with the fields
/// `key` and `items`, so downstream operators keep working on plain [`Value`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupEntry {
    /// Projected key shared by every item in the group.
    pub key: Value,
    /// Members of the group, in their original relative order.
    pub items: Vec<Value>,
}

impl GroupEntry {
    pub fn new(key: impl Into<Value>, items: Vec<Value>) -> Self {
        Self {
            key: key.into(),
            items,
        }
    }

    /// Read a group back out of a record value with `key` and `items` fields.
    pub fn from_value(value: &Value) -> Option<Self> {
        let key = value.get("key")?.clone();
        let items = value.get("items")?.as_list()?.to_vec();
        Some(Self { key, items })
    }
}

impl From<GroupEntry> for Value {
    fn from(group: GroupEntry) -> Self {
        Value::Record(vec![
            ("key".to_string(), group.key),
            ("items".to_string(), Value::List(group.items)),
        ])
    }
}
