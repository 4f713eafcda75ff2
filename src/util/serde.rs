//! Shared serializable identifiers and value types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Request identifier, unique and increasing in submission order.
pub type RequestId = u64;
/// Resource identifier, assigned at fleet construction.
pub type ResourceId = u64;
/// Allocation identifier, unique and increasing in bind order.
pub type AllocationId = u64;
/// Milliseconds since the Unix epoch.
pub type TimestampMs = u128;

/// Type tag a resource carries and a request requires (e.g. `ICU_BED`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceType(String);

impl ResourceType {
    /// Build a type tag, trimming surrounding whitespace.
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self(tag.as_ref().trim().to_string())
    }

    /// Borrow the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the tag is empty after trimming.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceType {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for ResourceType {
    fn from(tag: String) -> Self {
        Self::new(tag)
    }
}
