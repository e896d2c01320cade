//! Scripted replay of edit events
//!
//! A script lists edit events with their offsets in milliseconds. The replay
//! drives a coordinator on a [`ManualClock`], firing debounce timers at their
//! exact deadlines between events, and writes every flush as a JSON line.
//!
//! ```yaml
//! events:
//!   - { at_ms: 0,   event: start,  entry: { id: r1 }, property: title }
//!   - { at_ms: 120, event: commit, entry: { id: r1 }, property: title, content: [{ title: Hello }] }
//! ```

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::aggregate::EntryUpdate;
use crate::clock::{Clock, ManualClock};
use crate::config::CoordinatorConfig;
use crate::coordinator::EditCoordinator;
use crate::host::{EntryResolver, JsonEntryResolver, ValuesSink};
use crate::model::{Content, EntryId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Start,
    Cancel,
    Commit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptEvent {
    #[serde(default)]
    pub at_ms: u64,
    pub event: EventKind,
    pub entry: Value,
    pub property: String,
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub events: Vec<ScriptEvent>,
}

impl Script {
    /// Parse a YAML (or JSON) script
    pub fn parse(source: &str) -> anyhow::Result<Self> {
        let script: Script = serde_yaml::from_str(source).context("Invalid replay script")?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("In script {}", path.display()))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let mut last = 0;
        for (index, event) in self.events.iter().enumerate() {
            if event.at_ms < last {
                bail!(
                    "Event #{} at {} ms comes before the previous event at {} ms",
                    index,
                    event.at_ms,
                    last
                );
            }
            if event.event == EventKind::Commit && event.content.is_none() {
                bail!("Commit event #{} has no content", index);
            }
            last = event.at_ms;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub debounce: Duration,
    pub id_property: String,
    /// Abort on the first rejected event instead of skipping it
    pub strict: bool,
}

impl From<&CoordinatorConfig> for ReplayOptions {
    fn from(config: &CoordinatorConfig) -> Self {
        Self {
            debounce: config.debounce(),
            id_property: config.id_property.clone(),
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub events: usize,
    pub flushes: usize,
    pub rejected: usize,
    /// Entries left with open or unflushed edits when the script ended
    pub pending_entries: Vec<EntryId>,
}

/// One output line
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlushRecord<'a> {
    at_ms: u64,
    #[serde(flatten)]
    update: &'a EntryUpdate,
}

struct ReplaySink<W: Write> {
    writer: W,
    clock: ManualClock,
}

impl<W: Write> ValuesSink for ReplaySink<W> {
    fn set_values(&mut self, update: EntryUpdate) -> anyhow::Result<()> {
        let record = FlushRecord {
            at_ms: self.clock.elapsed().as_millis() as u64,
            update: &update,
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(self.writer)?;
        Ok(())
    }
}

type ReplayCoordinator<W> = EditCoordinator<JsonEntryResolver, ReplaySink<W>, ManualClock>;

/// Fire every timer due up to `at`, each at its own deadline
fn advance_to<R: EntryResolver, S: ValuesSink>(
    coord: &mut EditCoordinator<R, S, ManualClock>,
    at: std::time::Instant,
) -> usize {
    let mut flushed = 0;
    while let Some(deadline) = coord.next_deadline() {
        if deadline > at {
            break;
        }
        coord.clock().set(deadline);
        flushed += coord.poll();
    }
    coord.clock().set(at);
    flushed
}

/// Replay a script, writing one JSON line per flush to `writer`
pub fn run_replay<W: Write>(
    script: &Script,
    options: &ReplayOptions,
    writer: W,
) -> anyhow::Result<ReplayReport> {
    script.validate()?;

    let clock = ManualClock::new();
    let sink = ReplaySink {
        writer,
        clock: clock.clone(),
    };
    let mut coord: ReplayCoordinator<W> = EditCoordinator::with_clock(
        JsonEntryResolver::new(options.id_property.clone()),
        sink,
        clock.clone(),
        options.debounce,
    );
    let mut report = ReplayReport::default();

    for (index, event) in script.events.iter().enumerate() {
        let at = clock.origin() + Duration::from_millis(event.at_ms);
        report.flushes += advance_to(&mut coord, at);

        let property = event.property.as_str();
        let result = match event.event {
            EventKind::Start => {
                coord.start(&event.entry, property);
                Ok(())
            }
            EventKind::Cancel => coord.cancel(&event.entry, property),
            EventKind::Commit => coord.commit(
                &event.entry,
                property,
                event.content.clone().unwrap_or_default(),
            ),
        };

        if let Err(e) = result {
            if options.strict {
                return Err(anyhow::Error::new(e)
                    .context(format!("Event #{} at {} ms rejected", index, event.at_ms)));
            }
            tracing::warn!("Skipping event #{} at {} ms: {}", index, event.at_ms, e);
            report.rejected += 1;
        }
        report.events += 1;
    }

    // Let every remaining debounce window run out
    while let Some(deadline) = coord.next_deadline() {
        coord.clock().set(deadline);
        report.flushes += coord.poll();
    }

    let mut pending: Vec<EntryId> = coord.model().pending_entries().cloned().collect();
    pending.sort();
    report.pending_entries = pending;

    let mut sink = coord.into_sink();
    sink.writer.flush().context("Failed to flush replay output")?;

    tracing::info!(
        "Replayed {} events at {:?}: {} flushes, {} rejected",
        report.events,
        clock.now() - clock.origin(),
        report.flushes,
        report.rejected
    );
    Ok(report)
}
