//! Errors raised by the edit coordinator

use crate::model::{EntryId, PropertyId};

/// Errors from applying an edit event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Cancel or commit for a property that was never started in the current editing round
    NoActiveEditSession {
        entry_id: EntryId,
        property_id: PropertyId,
    },
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::NoActiveEditSession {
                entry_id,
                property_id,
            } => write!(
                f,
                "no active edit session for property '{}' of entry '{}'",
                property_id, entry_id
            ),
        }
    }
}

impl std::error::Error for EditError {}
