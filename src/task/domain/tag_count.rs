//! Tag frequency records produced by aggregation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Number of occurrences of one tag value across a collection.
///
/// Serializes with the tag under `_id`, matching the group key naming of
/// document-store aggregation output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    #[serde(rename = "_id")]
    tag: Value,
    count: u64,
}

impl TagCount {
    /// Creates a tag count record.
    #[must_use]
    pub const fn new(tag: Value, count: u64) -> Self {
        Self { tag, count }
    }

    /// Returns the grouped tag value.
    #[must_use]
    pub const fn tag(&self) -> &Value {
        &self.tag
    }

    /// Returns the tag as text when it is a string.
    #[must_use]
    pub fn tag_str(&self) -> Option<&str> {
        self.tag.as_str()
    }

    /// Returns the number of unwound entries carrying the tag.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }
}
