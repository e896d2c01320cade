//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use std::time::Duration;

use crate::aggregate::EntryUpdate;
use crate::model::EntryId;

/// Side effects requested by `update`
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cmd {
    #[default]
    None,
    /// (Re)arm the entry's debounce timer
    /// After `delay`, sends Msg::Flush(FlushMsg::Due) with the same revision
    ScheduleFlush {
        entry_id: EntryId,
        revision: u64,
        delay: Duration,
    },
    /// Hand the consolidated values to the persistence sink
    SetValues(EntryUpdate),
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    pub fn is_none(&self) -> bool {
        match self {
            Cmd::None => true,
            Cmd::Batch(cmds) => cmds.iter().all(Cmd::is_none),
            _ => false,
        }
    }
}
