//! Committed property content
//!
//! A displayer hands over its edited value as an ordered list of key/value
//! pairs. One property may contribute several keys (composite widgets), and
//! the same key may appear more than once.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One key/value pair of committed content
#[derive(Debug, Clone, PartialEq)]
pub struct ContentEntry {
    pub key: String,
    pub value: Value,
}

/// Ordered key/value pairs committed by a single property
///
/// On the wire this is an array of objects, e.g. `[{"a": 1}, {"b": 2, "c": 3}]`.
/// Objects are flattened in order, keys within an object keep their order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Map<String, Value>>", into = "Vec<Map<String, Value>>")]
pub struct Content {
    entries: Vec<ContentEntry>,
}

impl Content {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.push(ContentEntry {
            key: key.into(),
            value: value.into(),
        });
    }

    pub fn entries(&self) -> &[ContentEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|e| (e.key.as_str(), &e.value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Content {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut content = Content::new();
        for (key, value) in iter {
            content.push(key, value);
        }
        content
    }
}

impl From<Vec<Map<String, Value>>> for Content {
    fn from(objects: Vec<Map<String, Value>>) -> Self {
        objects.into_iter().flatten().collect()
    }
}

impl From<Content> for Vec<Map<String, Value>> {
    fn from(content: Content) -> Self {
        content
            .entries
            .into_iter()
            .map(|entry| {
                let mut object = Map::new();
                object.insert(entry.key, entry.value);
                object
            })
            .collect()
    }
}
