//! The edit coordinator
//!
//! Owns the edit model and the per-entry debounce timers, feeds edit events
//! through [`update`], and executes the resulting commands against the host.
//! Everything runs on the caller's thread; [`EditBus`] only queues events for
//! [`EditCoordinator::run`].

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SendError, Sender};
use std::time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};
use crate::commands::Cmd;
use crate::config::CoordinatorConfig;
use crate::error::EditError;
use crate::host::{EntryResolver, ValuesSink};
use crate::messages::{EditMsg, FlushMsg, Msg};
use crate::model::{Content, EditModel, PropertyId};
use crate::scheduler::FlushTimers;
use crate::update::update;

pub struct EditCoordinator<R, S, C = SystemClock> {
    model: EditModel,
    timers: FlushTimers,
    resolver: R,
    sink: S,
    clock: C,
}

impl<R: EntryResolver, S: ValuesSink> EditCoordinator<R, S, SystemClock> {
    pub fn new(resolver: R, sink: S, debounce: Duration) -> Self {
        Self::with_clock(resolver, sink, SystemClock, debounce)
    }

    pub fn from_config(resolver: R, sink: S, config: &CoordinatorConfig) -> Self {
        Self::new(resolver, sink, config.debounce())
    }

    /// Blocking event loop
    ///
    /// Processes queued events in emission order and fires timers as their
    /// deadlines pass. Returns once every [`EditBus`] is dropped and no
    /// timer is left.
    pub fn run(mut self, rx: Receiver<EditMsg>) -> Self {
        loop {
            self.poll();

            let msg = match self.timers.next_deadline() {
                Some(deadline) => {
                    let timeout = deadline.saturating_duration_since(self.clock.now());
                    match rx.recv_timeout(timeout) {
                        Ok(msg) => msg,
                        Err(RecvTimeoutError::Timeout) => continue,
                        Err(RecvTimeoutError::Disconnected) => {
                            std::thread::sleep(timeout);
                            continue;
                        }
                    }
                }
                None => match rx.recv() {
                    Ok(msg) => msg,
                    Err(_) => break,
                },
            };

            if let Err(e) = self.dispatch(msg) {
                tracing::warn!("Rejected edit event: {}", e);
            }
        }

        let pending = self.model.pending_entries().count();
        if pending > 0 {
            tracing::warn!("Event loop stopped with {} entries still being edited", pending);
        }
        self
    }
}

impl<R: EntryResolver, S: ValuesSink, C: Clock> EditCoordinator<R, S, C> {
    pub fn with_clock(resolver: R, sink: S, clock: C, debounce: Duration) -> Self {
        Self {
            model: EditModel::new(debounce),
            timers: FlushTimers::new(),
            resolver,
            sink,
            clock,
        }
    }

    /// A property's editor was opened
    pub fn start(&mut self, entry: &R::Entry, property_id: impl Into<PropertyId>) {
        let msg = EditMsg::Start {
            entry_id: self.resolver.entry_id(entry),
            property_id: property_id.into(),
        };
        if let Err(e) = self.dispatch(msg) {
            tracing::error!("Start rejected: {}", e);
        }
    }

    /// A property's editor was closed without saving
    pub fn cancel(
        &mut self,
        entry: &R::Entry,
        property_id: impl Into<PropertyId>,
    ) -> Result<(), EditError> {
        self.dispatch(EditMsg::Cancel {
            entry_id: self.resolver.entry_id(entry),
            property_id: property_id.into(),
        })
    }

    /// A property's editor was closed with content to save
    pub fn commit(
        &mut self,
        entry: &R::Entry,
        property_id: impl Into<PropertyId>,
        content: Content,
    ) -> Result<(), EditError> {
        self.dispatch(EditMsg::Save {
            entry_id: self.resolver.entry_id(entry),
            property_id: property_id.into(),
            content,
        })
    }

    /// Apply an event whose entry is already resolved
    pub fn dispatch(&mut self, msg: EditMsg) -> Result<(), EditError> {
        if let Some(cmd) = update(&mut self.model, Msg::Edit(msg))? {
            self.process_cmd(cmd);
        }
        Ok(())
    }

    /// Fire every timer due now
    ///
    /// Returns the number of entries handed to the sink.
    pub fn poll(&mut self) -> usize {
        let now = self.clock.now();
        let mut flushed = 0;
        for (entry_id, revision) in self.timers.take_due(now) {
            match update(&mut self.model, Msg::Flush(FlushMsg::Due { entry_id, revision })) {
                Ok(Some(cmd)) => flushed += self.process_cmd(cmd),
                Ok(None) => {}
                Err(e) => tracing::warn!("Flush rejected: {}", e),
            }
        }
        flushed
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn model(&self) -> &EditModel {
        &self.model
    }

    pub fn timers(&self) -> &FlushTimers {
        &self.timers
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Execute a command, returning how many updates reached the sink
    fn process_cmd(&mut self, cmd: Cmd) -> usize {
        match cmd {
            Cmd::None => 0,
            Cmd::ScheduleFlush {
                entry_id,
                revision,
                delay,
            } => {
                self.timers.arm(entry_id, revision, delay, self.clock.now());
                0
            }
            Cmd::SetValues(update) => {
                let entry_id = update.entry_id.clone();
                // The entry is already reset, a failed save is only reported
                if let Err(e) = self.sink.set_values(update) {
                    tracing::warn!("Failed to save entry {}: {:#}", entry_id, e);
                }
                1
            }
            Cmd::Batch(cmds) => cmds.into_iter().map(|c| self.process_cmd(c)).sum(),
        }
    }
}

/// Cloneable handle that queues edit events for [`EditCoordinator::run`]
///
/// Entries are resolved on the sending side, so displayers can pass their
/// row objects directly.
pub struct EditBus<R> {
    resolver: R,
    tx: Sender<EditMsg>,
}

impl<R: Clone> Clone for EditBus<R> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            tx: self.tx.clone(),
        }
    }
}

/// Create a bus and the receiver to hand to [`EditCoordinator::run`]
pub fn channel<R: EntryResolver>(resolver: R) -> (EditBus<R>, Receiver<EditMsg>) {
    let (tx, rx) = mpsc::channel();
    (EditBus { resolver, tx }, rx)
}

impl<R: EntryResolver> EditBus<R> {
    pub fn start(
        &self,
        entry: &R::Entry,
        property_id: impl Into<PropertyId>,
    ) -> Result<(), SendError<EditMsg>> {
        self.tx.send(EditMsg::Start {
            entry_id: self.resolver.entry_id(entry),
            property_id: property_id.into(),
        })
    }

    pub fn cancel(
        &self,
        entry: &R::Entry,
        property_id: impl Into<PropertyId>,
    ) -> Result<(), SendError<EditMsg>> {
        self.tx.send(EditMsg::Cancel {
            entry_id: self.resolver.entry_id(entry),
            property_id: property_id.into(),
        })
    }

    pub fn commit(
        &self,
        entry: &R::Entry,
        property_id: impl Into<PropertyId>,
        content: Content,
    ) -> Result<(), SendError<EditMsg>> {
        self.tx.send(EditMsg::Save {
            entry_id: self.resolver.entry_id(entry),
            property_id: property_id.into(),
            content,
        })
    }
}
