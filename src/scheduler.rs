//! Per-entry debounce timers
//!
//! At most one pending flush per entry. Arming a timer for an entry that
//! already has one replaces it, which is how a new commit restarts the
//! debounce window.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::model::EntryId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingFlush {
    due_at: Instant,
    revision: u64,
    /// Arming order, breaks ties between timers due at the same instant
    seq: u64,
}

#[derive(Debug, Default)]
pub struct FlushTimers {
    pending: HashMap<EntryId, PendingFlush>,
    next_seq: u64,
}

impl FlushTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the flush timer of an entry
    pub fn arm(&mut self, entry_id: EntryId, revision: u64, delay: Duration, now: Instant) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let previous = self.pending.insert(
            entry_id,
            PendingFlush {
                due_at: now + delay,
                revision,
                seq,
            },
        );
        if let Some(previous) = previous {
            tracing::trace!("Replaced pending flush for rev {}", previous.revision);
        }
    }

    pub fn cancel(&mut self, entry_id: &EntryId) -> bool {
        self.pending.remove(entry_id).is_some()
    }

    pub fn is_armed(&self, entry_id: &EntryId) -> bool {
        self.pending.contains_key(entry_id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest instant at which a timer fires
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|p| p.due_at).min()
    }

    /// Remove and return every timer due at `now`, earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<(EntryId, u64)> {
        let mut due: Vec<(EntryId, PendingFlush)> = Vec::new();
        self.pending.retain(|entry_id, pending| {
            if pending.due_at <= now {
                due.push((entry_id.clone(), *pending));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(_, p)| (p.due_at, p.seq));
        due.into_iter().map(|(id, p)| (id, p.revision)).collect()
    }
}
