//! Debounced flush update handlers

use crate::aggregate::{aggregate, EntryUpdate};
use crate::commands::Cmd;
use crate::messages::FlushMsg;
use crate::model::EditModel;

/// Handle debounce timer expiry for an entry
pub fn update_flush(model: &mut EditModel, msg: FlushMsg) -> Option<Cmd> {
    match msg {
        FlushMsg::Due { entry_id, revision } => {
            let entry = match model.entries.get_mut(&entry_id) {
                Some(e) => e,
                None => {
                    tracing::warn!("update_flush: entry {} not found for Due", entry_id);
                    return None;
                }
            };

            // Skip if the entry was committed again since this timer was armed
            if entry.revision != revision {
                tracing::debug!(
                    "Skipping stale flush for {}: entry revision {} != timer revision {}",
                    entry_id,
                    entry.revision,
                    revision
                );
                return None;
            }

            if entry.is_empty() {
                return None;
            }

            // A property still open (or cancelled without content) holds the entry back
            // until its own commit re-arms the timer
            if !entry.is_settled() {
                tracing::debug!(
                    "Entry {} not settled at rev {}, waiting for remaining properties",
                    entry_id,
                    revision
                );
                return None;
            }

            let values = aggregate(entry);
            entry.reset();

            tracing::info!(
                "Flushing entry {} ({} values, rev {})",
                entry_id,
                values.len(),
                revision
            );

            Some(Cmd::SetValues(EntryUpdate { entry_id, values }))
        }
    }
}
