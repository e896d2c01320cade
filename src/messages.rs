//! Message types for the Elm-style architecture
//!
//! All edit state changes flow through these message types.

use crate::model::{Content, EntryId, PropertyId};

/// Edit lifecycle events emitted by property displayers
#[derive(Debug, Clone, PartialEq)]
pub enum EditMsg {
    /// The property's editor was opened
    Start {
        entry_id: EntryId,
        property_id: PropertyId,
    },
    /// The editor was closed without saving
    Cancel {
        entry_id: EntryId,
        property_id: PropertyId,
    },
    /// The editor was closed and its content should be saved
    Save {
        entry_id: EntryId,
        property_id: PropertyId,
        content: Content,
    },
}

impl EditMsg {
    pub fn entry_id(&self) -> &EntryId {
        match self {
            EditMsg::Start { entry_id, .. }
            | EditMsg::Cancel { entry_id, .. }
            | EditMsg::Save { entry_id, .. } => entry_id,
        }
    }

    pub fn property_id(&self) -> &PropertyId {
        match self {
            EditMsg::Start { property_id, .. }
            | EditMsg::Cancel { property_id, .. }
            | EditMsg::Save { property_id, .. } => property_id,
        }
    }
}

/// Debounce timer messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushMsg {
    /// The debounce window for this entry elapsed without a newer commit
    Due { entry_id: EntryId, revision: u64 },
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Edit(EditMsg),
    Flush(FlushMsg),
}

impl From<EditMsg> for Msg {
    fn from(msg: EditMsg) -> Self {
        Msg::Edit(msg)
    }
}

impl From<FlushMsg> for Msg {
    fn from(msg: FlushMsg) -> Self {
        Msg::Flush(msg)
    }
}
