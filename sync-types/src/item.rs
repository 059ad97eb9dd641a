//! List items and the values they are ordered by.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

use crate::{FieldName, ItemId};

/// A record of the paginated resource.
///
/// Apart from `id`, fields are kept as raw JSON. The engine only ever reads
/// the id and the field named by the active order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable unique identifier.
    pub id: ItemId,
    /// Every other field of the record.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    /// Create an item with no fields besides its id.
    pub fn new(id: impl Into<ItemId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Set a field (builder style).
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Raw JSON value of a field, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Value of `key` usable for ordering.
    ///
    /// Returns `None` when the field is missing or is not a number or a
    /// string. The key `id` orders by the identifier itself.
    pub fn sort_value(&self, key: &FieldName) -> Option<SortValue<'_>> {
        match self.fields.get(key.as_str()) {
            Some(Value::Number(n)) => SortValue::from_number(n),
            Some(Value::String(s)) => Some(SortValue::Text(s)),
            Some(_) => None,
            None if key.as_str() == "id" => Some(match &self.id {
                ItemId::Int(v) => SortValue::Int(*v),
                ItemId::Text(v) => SortValue::Text(v),
            }),
            None => None,
        }
    }
}

/// An orderable field value.
///
/// Numbers compare numerically and strings lexicographically, which orders
/// RFC 3339 timestamps chronologically. When a field mixes both kinds,
/// numbers sort before strings. Integers compare exactly, so nanosecond
/// timestamps beyond 2^53 stay distinct.
#[derive(Debug, Clone, Copy)]
pub enum SortValue<'a> {
    /// Signed integer (ratings, calories, epoch timestamps).
    Int(i64),
    /// Unsigned integer above `i64::MAX`.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// Textual value (ISO timestamps, names).
    Text(&'a str),
}

impl SortValue<'_> {
    fn from_number(n: &serde_json::Number) -> Option<Self> {
        n.as_i64()
            .map(Self::Int)
            .or_else(|| n.as_u64().map(Self::UInt))
            .or_else(|| n.as_f64().map(Self::Float))
    }

    fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int(v) => Some(v as f64),
            Self::UInt(v) => Some(v as f64),
            Self::Float(v) => Some(v),
            Self::Text(_) => None,
        }
    }
}

impl Ord for SortValue<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::UInt(a), Self::UInt(b)) => a.cmp(b),
            // UInt only holds values above i64::MAX
            (Self::Int(_), Self::UInt(_)) => Ordering::Less,
            (Self::UInt(_), Self::Int(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Text(_), _) => Ordering::Greater,
            (_, Self::Text(_)) => Ordering::Less,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            },
        }
    }
}

impl PartialOrd for SortValue<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortValue<'_> {}
