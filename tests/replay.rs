//! Script replay tests

use std::time::Duration;

use cellsync::replay::{run_replay, ReplayOptions, Script};
use cellsync::{CoordinatorConfig, EntryId};
use serde_json::{json, Value};

fn options() -> ReplayOptions {
    ReplayOptions::from(&CoordinatorConfig::default())
}

fn replay_lines(script: &str, options: &ReplayOptions) -> (Vec<Value>, cellsync::replay::ReplayReport) {
    let script = Script::parse(script).unwrap();
    let mut out = Vec::new();
    let report = run_replay(&script, options, &mut out).unwrap();
    let lines = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    (lines, report)
}

const TWO_FIELDS: &str = r#"
events:
  - { at_ms: 0,   event: start,  entry: { id: r1 }, property: f1 }
  - { at_ms: 10,  event: commit, entry: { id: r1 }, property: f1, content: [{ a: 1 }] }
  - { at_ms: 50,  event: start,  entry: { id: r1 }, property: f2 }
  - { at_ms: 210, event: commit, entry: { id: r1 }, property: f2, content: [{ b: 2 }] }
"#;

#[test]
fn test_replay_flushes_after_last_commit() {
    let (lines, report) = replay_lines(TWO_FIELDS, &options());

    assert_eq!(report.events, 4);
    assert_eq!(report.flushes, 1);
    assert_eq!(report.rejected, 0);
    assert!(report.pending_entries.is_empty());
    assert_eq!(
        lines,
        vec![json!({ "atMs": 710, "entryId": "r1", "values": { "a": 1, "b": 2 } })]
    );
}

#[test]
fn test_replay_fires_timers_between_events() {
    let script = r#"
events:
  - { at_ms: 0,    event: start,  entry: { id: r1 }, property: f1 }
  - { at_ms: 0,    event: commit, entry: { id: r1 }, property: f1, content: [{ a: 1 }] }
  - { at_ms: 2000, event: start,  entry: { id: r1 }, property: f1 }
  - { at_ms: 2100, event: commit, entry: { id: r1 }, property: f1, content: [{ a: 2 }] }
"#;
    let (lines, report) = replay_lines(script, &options());

    assert_eq!(report.flushes, 2);
    assert_eq!(lines[0]["atMs"], json!(500));
    assert_eq!(lines[0]["values"], json!({ "a": 1 }));
    assert_eq!(lines[1]["atMs"], json!(2600));
    assert_eq!(lines[1]["values"], json!({ "a": 2 }));
}

#[test]
fn test_replay_uses_configured_id_property_and_debounce() {
    let script = r#"
events:
  - { event: start,  entry: { "doc.fullName": Main.WebHome }, property: tags }
  - { event: commit, entry: { "doc.fullName": Main.WebHome }, property: tags,
      content: [{ tag: a }, { tag: b }] }
"#;
    let options = ReplayOptions {
        debounce: Duration::from_millis(100),
        id_property: "doc.fullName".to_string(),
        strict: false,
    };
    let (lines, _) = replay_lines(script, &options);

    assert_eq!(
        lines,
        vec![json!({ "atMs": 100, "entryId": "Main.WebHome", "values": { "tag": ["a", "b"] } })]
    );
}

#[test]
fn test_replay_counts_rejected_events_and_pending_entries() {
    let script = r#"
events:
  - { at_ms: 0,  event: cancel, entry: { id: r1 }, property: f1 }
  - { at_ms: 10, event: start,  entry: { id: r2 }, property: f1 }
"#;
    let (lines, report) = replay_lines(script, &options());

    assert!(lines.is_empty());
    assert_eq!(report.rejected, 1);
    assert_eq!(report.pending_entries, vec![EntryId::from("r2")]);
}

#[test]
fn test_strict_replay_stops_at_rejected_event() {
    let script = Script::parse(
        r#"
events:
  - { at_ms: 5, event: commit, entry: { id: r1 }, property: f1, content: [] }
"#,
    )
    .unwrap();
    let mut options = options();
    options.strict = true;

    let err = run_replay(&script, &options, Vec::new()).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Event #0 at 5 ms rejected"), "got: {}", message);
    assert!(message.contains("no active edit session"));
}

#[test]
fn test_load_script_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.yaml");
    std::fs::write(&path, TWO_FIELDS).unwrap();

    let script = Script::load(&path).unwrap();
    assert_eq!(script.events.len(), 4);
    assert!(Script::load(&dir.path().join("missing.yaml")).is_err());
}
