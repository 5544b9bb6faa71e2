//! Free-form metadata attached to canonical messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Open string-keyed annotations carried by a message.
///
/// Providers use metadata to record which backend event produced a message,
/// tool names, tool arguments, and similar details. Keys are kept in sorted
/// order so serialised output is stable.
///
/// # Examples
///
/// ```
/// use maestro::message::domain::MessageMetadata;
/// use serde_json::json;
///
/// let metadata = MessageMetadata::new()
///     .with("sdk_type", "tool_use")
///     .with("tool_input", json!({"path": "src/lib.rs"}));
/// assert_eq!(metadata.get_str("sdk_type"), Some("tool_use"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageMetadata(BTreeMap<String, Value>);

impl MessageMetadata {
    /// Creates empty metadata.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds an entry, replacing any previous value under `key`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Adds an entry only when `value` is present.
    #[must_use]
    pub fn with_optional(self, key: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(present) => self.with(key, present),
            None => self,
        }
    }

    /// Returns the raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the value under `key` when it is a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns `true` if no entries are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}
