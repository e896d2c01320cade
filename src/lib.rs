//! cellsync - inline edit coordination for tabular records
//!
//! Several properties of one entry (a table row) can be edited independently,
//! but the entry is saved once, with the content of every property edited in
//! the same round. The state machine follows the Elm Architecture:
//! [`messages`] feed [`update`], which returns [`commands`] that the
//! [`coordinator`] executes against its timers and host.

pub mod aggregate;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod coordinator;
pub mod error;
pub mod host;
pub mod messages;
pub mod model;
pub mod replay;
pub mod scheduler;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use aggregate::{EntryUpdate, Values};
pub use clock::{Clock, ManualClock, SystemClock};
pub use commands::Cmd;
pub use config::CoordinatorConfig;
pub use coordinator::{channel, EditBus, EditCoordinator};
pub use error::EditError;
pub use host::{EntryResolver, IdResolver, JsonEntryResolver, ValuesSink};
pub use messages::{EditMsg, Msg};
pub use model::{Content, EditModel, EntryId, PropertyId};
