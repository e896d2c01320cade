//! Model types for the edit coordinator
//!
//! Holds the per-entry, per-property edit state. Everything here is
//! transient: nothing survives a restart.

pub mod content;

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use content::{Content, ContentEntry};

/// Default quiet period after the last commit on an entry before it is flushed
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Stable identifier of an entry (a table row)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

/// Identifier of an editable property (a table column) within an entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub String);

macro_rules! string_id {
    ($name:ident) => {
        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(EntryId);
string_id!(PropertyId);

/// Edit state of one property of one entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyState {
    /// The property's editor is open
    pub editing: bool,
    /// Content was committed and not flushed yet
    pub to_save: bool,
    /// Last committed content
    pub content: Option<Content>,
}

impl PropertyState {
    pub fn is_settled(&self) -> bool {
        !self.editing && self.to_save
    }
}

/// Edit state of one entry
///
/// Properties are kept in the order they were first touched, which is the
/// order their content is aggregated in.
#[derive(Debug, Clone, Default)]
pub struct EntryEditState {
    pub properties: IndexMap<PropertyId, PropertyState>,
    /// Bumped on every commit; a debounce timer only flushes the revision it was armed for
    pub revision: u64,
}

impl EntryEditState {
    /// True when every property is closed and has content waiting to be saved
    pub fn is_settled(&self) -> bool {
        self.properties.values().all(PropertyState::is_settled)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Forget all property states, ready for the next editing round
    pub fn reset(&mut self) {
        self.properties.clear();
    }
}

/// All in-flight edits, keyed by entry
#[derive(Debug, Clone)]
pub struct EditModel {
    pub entries: HashMap<EntryId, EntryEditState>,
    pub debounce: Duration,
}

impl Default for EditModel {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl EditModel {
    pub fn new(debounce: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            debounce,
        }
    }

    pub fn entry(&self, entry_id: &EntryId) -> Option<&EntryEditState> {
        self.entries.get(entry_id)
    }

    pub fn property(&self, entry_id: &EntryId, property_id: &PropertyId) -> Option<&PropertyState> {
        self.entries.get(entry_id)?.properties.get(property_id)
    }

    /// Entries that still hold property state (open or unflushed edits)
    pub fn pending_entries(&self) -> impl Iterator<Item = &EntryId> {
        self.entries
            .iter()
            .filter(|(_, state)| !state.is_empty())
            .map(|(id, _)| id)
    }

    pub fn entry_mut_or_default(&mut self, entry_id: &EntryId) -> &mut EntryEditState {
        self.entries.entry(entry_id.clone()).or_default()
    }
}
