//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::time::Duration;

use cellsync::{Content, EditCoordinator, EntryUpdate, IdResolver, ManualClock};
use serde_json::Value;

pub const DEBOUNCE_MS: u64 = 500;

pub type TestCoordinator = EditCoordinator<IdResolver, Vec<EntryUpdate>, ManualClock>;

/// Coordinator on a manual clock with the default 500ms debounce window
pub fn test_coordinator() -> TestCoordinator {
    EditCoordinator::with_clock(
        IdResolver,
        Vec::new(),
        ManualClock::new(),
        Duration::from_millis(DEBOUNCE_MS),
    )
}

/// Move the clock forward and fire whatever is due
pub fn advance(coord: &mut TestCoordinator, ms: u64) -> usize {
    coord.clock().advance(Duration::from_millis(ms));
    coord.poll()
}

/// Content with a single key
pub fn content(key: &str, value: impl Into<Value>) -> Content {
    Content::new().with(key, value)
}

/// Start then immediately commit a property
pub fn edit(coord: &mut TestCoordinator, entry: &str, property: &str, content: Content) {
    coord.start(entry, property);
    coord.commit(entry, property, content).unwrap();
}

/// Values of the nth flushed update as a JSON object
pub fn flushed_values(coord: &TestCoordinator, index: usize) -> Value {
    Value::Object(coord.sink()[index].values.clone())
}
