//! Update functions for the Elm-style architecture
//!
//! All edit state transformations flow through these functions. They never
//! touch timers or the sink themselves; side effects come back as [`Cmd`]s.

mod edit;
mod flush;

use crate::commands::Cmd;
use crate::error::EditError;
use crate::messages::Msg;
use crate::model::EditModel;

#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use edit::update_edit;
pub use flush::update_flush;

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
/// In release builds, it's a direct dispatch with zero overhead.
#[inline]
pub fn update(model: &mut EditModel, msg: Msg) -> Result<Option<Cmd>, EditError> {
    #[cfg(debug_assertions)]
    {
        update_traced(model, msg)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(model, msg)
    }
}

/// Inner update logic (no tracing)
fn update_inner(model: &mut EditModel, msg: Msg) -> Result<Option<Cmd>, EditError> {
    match msg {
        Msg::Edit(m) => update_edit(model, m),
        Msg::Flush(m) => Ok(update_flush(model, m)),
    }
}

/// Traced update wrapper (debug builds only)
#[cfg(debug_assertions)]
fn update_traced(model: &mut EditModel, msg: Msg) -> Result<Option<Cmd>, EditError> {
    let msg_name = msg_type_name(&msg);
    let _span = span!(Level::DEBUG, "update", msg = %msg_name).entered();
    debug!(target: "message", msg = %msg_name, "processing");

    let result = update_inner(model, msg);
    if let Err(ref e) = result {
        debug!(target: "message", error = %e, "rejected");
    }
    result
}

/// Get a display name for a message type
///
/// Content payloads are left out to keep log lines short.
#[cfg(debug_assertions)]
fn msg_type_name(msg: &Msg) -> String {
    use crate::messages::{EditMsg, FlushMsg};

    match msg {
        Msg::Edit(EditMsg::Start {
            entry_id,
            property_id,
        }) => format!("Edit::Start({}, {})", entry_id, property_id),
        Msg::Edit(EditMsg::Cancel {
            entry_id,
            property_id,
        }) => format!("Edit::Cancel({}, {})", entry_id, property_id),
        Msg::Edit(EditMsg::Save {
            entry_id,
            property_id,
            content,
        }) => format!(
            "Edit::Save({}, {}, {} entries)",
            entry_id,
            property_id,
            content.len()
        ),
        Msg::Flush(FlushMsg::Due { entry_id, revision }) => {
            format!("Flush::Due({}, rev {})", entry_id, revision)
        }
    }
}
