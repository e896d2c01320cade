//! Merging committed property content into one entry update
//!
//! A key contributed once keeps its scalar value. A key contributed several
//! times (by several properties, or twice by one) becomes an array of all
//! contributions in property-then-content order.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::model::{EntryEditState, EntryId};

/// Aggregated values of an entry, in first-contribution order
pub type Values = Map<String, Value>;

/// One consolidated save for an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryUpdate {
    pub entry_id: EntryId,
    pub values: Values,
}

impl EntryUpdate {
    /// JSON body posted to the entry resource: `{"values": {...}}`
    pub fn request_body(&self) -> Value {
        json!({ "values": self.values })
    }
}

/// Merge a single contribution into `values`
pub fn merge_value(values: &mut Values, key: &str, value: Value) {
    match values.get_mut(key) {
        None => {
            values.insert(key.to_string(), value);
        }
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
    }
}

/// Aggregate the committed content of every property of an entry
pub fn aggregate(entry: &EntryEditState) -> Values {
    let mut values = Values::new();
    for content in entry.properties.values().filter_map(|p| p.content.as_ref()) {
        for (key, value) in content.iter() {
            merge_value(&mut values, key, value.clone());
        }
    }
    values
}
