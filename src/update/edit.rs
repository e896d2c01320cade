//! Edit lifecycle update handlers

use crate::commands::Cmd;
use crate::error::EditError;
use crate::messages::EditMsg;
use crate::model::{Content, EditModel, EntryId, PropertyId, PropertyState};

/// Handle start/cancel/save events for a property
pub fn update_edit(model: &mut EditModel, msg: EditMsg) -> Result<Option<Cmd>, EditError> {
    match msg {
        EditMsg::Start {
            entry_id,
            property_id,
        } => {
            let entry = model.entry_mut_or_default(&entry_id);
            entry.properties.entry(property_id).or_default().editing = true;
            Ok(None)
        }

        EditMsg::Cancel {
            entry_id,
            property_id,
        } => {
            // Content committed earlier in this round survives a cancelled re-open
            let state = existing_property(model, &entry_id, &property_id)?;
            state.editing = false;
            Ok(None)
        }

        EditMsg::Save {
            entry_id,
            property_id,
            content,
        } => commit(model, entry_id, property_id, content).map(Some),
    }
}

fn commit(
    model: &mut EditModel,
    entry_id: EntryId,
    property_id: PropertyId,
    content: Content,
) -> Result<Cmd, EditError> {
    let state = existing_property(model, &entry_id, &property_id)?;
    state.editing = false;
    state.to_save = true;
    state.content = Some(content);

    let delay = model.debounce;
    let entry = model.entry_mut_or_default(&entry_id);
    entry.revision += 1;
    let revision = entry.revision;

    tracing::debug!(
        "update_edit: {} committed on {}, flush scheduled for rev {}",
        property_id,
        entry_id,
        revision
    );

    Ok(Cmd::ScheduleFlush {
        entry_id,
        revision,
        delay,
    })
}

fn existing_property<'a>(
    model: &'a mut EditModel,
    entry_id: &EntryId,
    property_id: &PropertyId,
) -> Result<&'a mut PropertyState, EditError> {
    model
        .entries
        .get_mut(entry_id)
        .and_then(|entry| entry.properties.get_mut(property_id))
        .ok_or_else(|| EditError::NoActiveEditSession {
            entry_id: entry_id.clone(),
            property_id: property_id.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(model: &mut EditModel, entry: &str, property: &str) {
        update_edit(
            model,
            EditMsg::Start {
                entry_id: entry.into(),
                property_id: property.into(),
            },
        )
        .unwrap();
    }

    fn save(model: &mut EditModel, entry: &str, property: &str, content: Content) -> Cmd {
        update_edit(
            model,
            EditMsg::Save {
                entry_id: entry.into(),
                property_id: property.into(),
                content,
            },
        )
        .unwrap()
        .unwrap()
    }

    #[test]
    fn test_start_creates_editing_state() {
        let mut model = EditModel::default();
        start(&mut model, "r1", "title");
        let state = model.property(&"r1".into(), &"title".into()).unwrap();
        assert!(state.editing);
        assert!(!state.to_save);
        assert!(state.content.is_none());
    }

    #[test]
    fn test_save_schedules_flush_with_bumped_revision() {
        let mut model = EditModel::default();
        start(&mut model, "r1", "title");
        let first = save(&mut model, "r1", "title", Content::new().with("title", "a"));
        start(&mut model, "r1", "title");
        let second = save(&mut model, "r1", "title", Content::new().with("title", "b"));

        assert!(matches!(first, Cmd::ScheduleFlush { revision: 1, .. }));
        match second {
            Cmd::ScheduleFlush {
                entry_id,
                revision,
                delay,
            } => {
                assert_eq!(entry_id, EntryId::from("r1"));
                assert_eq!(revision, 2);
                assert_eq!(delay, model.debounce);
            }
            other => panic!("Expected ScheduleFlush, got {:?}", other),
        }
    }

    #[test]
    fn test_repeated_start_then_save_settles() {
        let mut model = EditModel::default();
        for _ in 0..3 {
            start(&mut model, "r1", "title");
        }
        save(&mut model, "r1", "title", Content::new().with("title", "x"));
        let state = model.property(&"r1".into(), &"title".into()).unwrap();
        assert!(!state.editing);
        assert!(state.to_save);
        assert_eq!(state.content, Some(Content::new().with("title", "x")));
    }

    #[test]
    fn test_cancel_keeps_committed_content() {
        let mut model = EditModel::default();
        start(&mut model, "r1", "title");
        save(&mut model, "r1", "title", Content::new().with("title", "x"));
        start(&mut model, "r1", "title");
        update_edit(
            &mut model,
            EditMsg::Cancel {
                entry_id: "r1".into(),
                property_id: "title".into(),
            },
        )
        .unwrap();

        let state = model.property(&"r1".into(), &"title".into()).unwrap();
        assert!(state.is_settled());
        assert_eq!(state.content, Some(Content::new().with("title", "x")));
    }

    #[test]
    fn test_cancel_without_start_is_rejected() {
        let mut model = EditModel::default();
        let err = update_edit(
            &mut model,
            EditMsg::Cancel {
                entry_id: "r1".into(),
                property_id: "title".into(),
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            EditError::NoActiveEditSession {
                entry_id: "r1".into(),
                property_id: "title".into(),
            }
        );
        assert!(model.entry(&"r1".into()).is_none());
    }

    #[test]
    fn test_save_for_unstarted_property_leaves_entry_untouched() {
        let mut model = EditModel::default();
        start(&mut model, "r1", "title");
        let result = update_edit(
            &mut model,
            EditMsg::Save {
                entry_id: "r1".into(),
                property_id: "other".into(),
                content: Content::new(),
            },
        );
        assert!(result.is_err());
        let entry = model.entry(&"r1".into()).unwrap();
        assert_eq!(entry.properties.len(), 1);
        assert_eq!(entry.revision, 0);
    }
}
