//! Records, field operations, and queries.
//!
//! Records are JSON objects. Backends store them whole and implement
//! field-level updates as a read-modify-write that is atomic per record.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::keys;

/// A JSON-like record.
pub type Record = serde_json::Map<String, Value>;

/// A record together with its path, as returned by queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Full path of the record.
    pub path: String,
    /// Record contents.
    pub data: Record,
}

impl Document {
    /// The last path segment (the document ID).
    #[must_use]
    pub fn id(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }

    /// Decode the record into a typed value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the record does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        from_record(self.data.clone())
    }
}

/// Encode a typed value as a record.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if `value` does not serialize to a JSON object.
pub fn to_record<T: Serialize>(value: &T) -> Result<Record> {
    match serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// Decode a record into a typed value.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if the record does not match `T`.
pub fn from_record<T: DeserializeOwned>(record: Record) -> Result<T> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| StoreError::Serialization(e.to_string()))
}

/// A single-field change applied by `Store::update`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Overwrite the field.
    Set(Value),
    /// Append each value not already present. A missing or non-array field
    /// becomes an array.
    ArrayUnion(Vec<Value>),
    /// Remove every element equal to one of the values. A missing or
    /// non-array field becomes an empty array.
    ArrayRemove(Vec<Value>),
    /// Remove the field.
    Delete,
}

impl FieldOp {
    /// Union with a single value.
    pub fn union(value: impl Into<Value>) -> Self {
        Self::ArrayUnion(vec![value.into()])
    }

    /// Remove a single value.
    pub fn remove(value: impl Into<Value>) -> Self {
        Self::ArrayRemove(vec![value.into()])
    }
}

/// Apply `ops` to `record` in order.
///
/// Union and remove are idempotent, and they commute with each other when
/// applied to distinct values.
pub fn apply_field_ops(record: &mut Record, ops: &[(String, FieldOp)]) {
    for (field, op) in ops {
        match op {
            FieldOp::Set(value) => {
                record.insert(field.clone(), value.clone());
            }
            FieldOp::ArrayUnion(values) => {
                let slot = record
                    .entry(field.clone())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if !slot.is_array() {
                    *slot = Value::Array(Vec::new());
                }
                if let Value::Array(items) = slot {
                    for value in values {
                        if !items.contains(value) {
                            items.push(value.clone());
                        }
                    }
                }
            }
            FieldOp::ArrayRemove(values) => {
                let slot = record
                    .entry(field.clone())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(items) = slot {
                    items.retain(|item| !values.contains(item));
                } else {
                    *slot = Value::Array(Vec::new());
                }
            }
            FieldOp::Delete => {
                record.remove(field);
            }
        }
    }
}

/// An equality filter on a top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Field name.
    pub field: String,
    /// Required value.
    pub value: Value,
}

impl Filter {
    fn matches(&self, record: &Record) -> bool {
        record.get(&self.field) == Some(&self.value)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Ordering applied to query results.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    /// Field name.
    pub field: String,
    /// Direction.
    pub direction: Direction,
}

/// A query over the direct children of one collection.
///
/// Without an explicit order, results come back in path order.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Collection path.
    pub collection: String,
    /// All filters must match.
    pub filters: Vec<Filter>,
    /// Optional ordering.
    pub order_by: Option<OrderBy>,
    /// Optional maximum number of results.
    pub limit: Option<usize>,
}

impl Query {
    /// Query every document in `collection`.
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    /// Require `field == value`.
    #[must_use]
    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Order by `field`.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    /// Return at most `limit` documents.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `record` passes every filter.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.filters.iter().all(|f| f.matches(record))
    }

    /// Sort and truncate documents that already passed [`Query::matches`].
    ///
    /// Input is expected in path order; ties keep that order.
    #[must_use]
    pub fn finish(&self, mut docs: Vec<Document>) -> Vec<Document> {
        if let Some(order) = &self.order_by {
            docs.sort_by(|a, b| {
                let ord = compare_values(a.data.get(&order.field), b.data.get(&order.field));
                match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }
        if let Some(limit) = self.limit {
            docs.truncate(limit);
        }
        docs
    }

    /// Check that the collection path is well formed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidPath` otherwise.
    pub fn validate(&self) -> Result<()> {
        keys::validate_collection_path(&self.collection)
    }
}

/// Order two optional field values.
///
/// Missing values sort first. RFC 3339 timestamps compare chronologically,
/// numbers numerically, everything else by its JSON text.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (
                x.parse::<DateTime<Utc>>(),
                y.parse::<DateTime<Utc>>(),
            ) {
                (Ok(x), Ok(y)) => x.cmp(&y),
                _ => x.cmp(y),
            }
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}
