//! Identity and pagination token types for pagesync.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable unique identifier of a list item.
///
/// Servers hand out either integer or string identifiers, so both JSON
/// shapes are accepted. Two ids are equal only if they have the same shape
/// and value (`1` and `"1"` are different items).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    /// Integer identifier.
    Int(i64),
    /// String identifier.
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

impl fmt::Debug for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "ItemId({v})"),
            Self::Text(v) => write!(f, "ItemId({v:?})"),
        }
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Parses `42` as an integer id and anything else as a string id.
impl FromStr for ItemId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(Self::Int)
            .unwrap_or_else(|_| Self::Text(s.to_string())))
    }
}

/// Opaque continuation token handed out by the server.
///
/// The client never interprets a cursor; it only echoes the last one it
/// received to ask for the following page.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a token received from the server.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, as sent back on the next request.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cursor({:?})", self.0)
    }
}

/// Name of an orderable item field, e.g. `createdAt` or `rating`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
    /// Create a field name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The field name as it appears in item JSON and in the `order` query.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
