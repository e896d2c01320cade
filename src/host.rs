//! Host collaborators of the coordinator
//!
//! The coordinator needs two things from its host: a way to turn an entry
//! (whatever the host uses to represent a row) into a stable [`EntryId`], and
//! a sink that persists the consolidated values of an entry.

use std::io::Write;

use anyhow::Context;
use serde_json::Value;

use crate::aggregate::EntryUpdate;
use crate::model::EntryId;

/// Resolves host entries to stable identifiers
pub trait EntryResolver {
    type Entry: ?Sized;

    fn entry_id(&self, entry: &Self::Entry) -> EntryId;
}

/// Persists consolidated entry values
///
/// Errors are reported back to the caller for logging only: the coordinator
/// has already reset the entry by the time the sink runs.
pub trait ValuesSink {
    fn set_values(&mut self, update: EntryUpdate) -> anyhow::Result<()>;
}

/// Entries are their own identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct IdResolver;

impl EntryResolver for IdResolver {
    type Entry = str;

    fn entry_id(&self, entry: &str) -> EntryId {
        EntryId::from(entry)
    }
}

/// Resolves JSON rows by reading one of their properties
#[derive(Debug, Clone)]
pub struct JsonEntryResolver {
    pub id_property: String,
}

impl JsonEntryResolver {
    pub fn new(id_property: impl Into<String>) -> Self {
        Self {
            id_property: id_property.into(),
        }
    }
}

impl EntryResolver for JsonEntryResolver {
    type Entry = Value;

    fn entry_id(&self, entry: &Value) -> EntryId {
        match entry.get(&self.id_property) {
            Some(Value::String(id)) => EntryId(id.clone()),
            Some(id @ (Value::Number(_) | Value::Bool(_))) => EntryId(id.to_string()),
            _ => {
                tracing::warn!(
                    "Entry has no usable '{}' property, using the row itself as id",
                    self.id_property
                );
                EntryId(entry.to_string())
            }
        }
    }
}

/// Records every update, mostly useful in tests
impl ValuesSink for Vec<EntryUpdate> {
    fn set_values(&mut self, update: EntryUpdate) -> anyhow::Result<()> {
        self.push(update);
        Ok(())
    }
}

/// Adapts a closure into a sink
pub struct FnSink<F>(pub F);

impl<F> ValuesSink for FnSink<F>
where
    F: FnMut(EntryUpdate) -> anyhow::Result<()>,
{
    fn set_values(&mut self, update: EntryUpdate) -> anyhow::Result<()> {
        (self.0)(update)
    }
}

/// Shape of each line written by [`JsonLinesSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFormat {
    /// `{"entryId": ..., "values": {...}}`
    #[default]
    Update,
    /// `{"values": {...}}`, the entry resource request body
    RequestBody,
}

/// Writes one JSON document per update
pub struct JsonLinesSink<W: Write> {
    writer: W,
    format: LineFormat,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W, format: LineFormat) -> Self {
        Self { writer, format }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ValuesSink for JsonLinesSink<W> {
    fn set_values(&mut self, update: EntryUpdate) -> anyhow::Result<()> {
        let line = match self.format {
            LineFormat::Update => serde_json::to_string(&update)?,
            LineFormat::RequestBody => update.request_body().to_string(),
        };
        writeln!(self.writer, "{}", line)
            .with_context(|| format!("Failed to write update for entry {}", update.entry_id))?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Values;
    use serde_json::json;

    fn update(entry: &str) -> EntryUpdate {
        let mut values = Values::new();
        values.insert("a".to_string(), json!(1));
        EntryUpdate {
            entry_id: entry.into(),
            values,
        }
    }

    #[test]
    fn test_json_resolver_reads_string_and_number_ids() {
        let resolver = JsonEntryResolver::new("doc.fullName");
        assert_eq!(
            resolver.entry_id(&json!({ "doc.fullName": "Main.WebHome" })),
            EntryId::from("Main.WebHome")
        );
        assert_eq!(
            resolver.entry_id(&json!({ "doc.fullName": 42 })),
            EntryId::from("42")
        );
    }

    #[test]
    fn test_json_resolver_falls_back_to_row_text() {
        let resolver = JsonEntryResolver::new("id");
        assert_eq!(
            resolver.entry_id(&json!({ "name": "x" })),
            EntryId::from(r#"{"name":"x"}"#)
        );
    }

    #[test]
    fn test_json_lines_sink_formats() {
        let mut sink = JsonLinesSink::new(Vec::new(), LineFormat::Update);
        sink.set_values(update("r1")).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "{\"entryId\":\"r1\",\"values\":{\"a\":1}}\n");

        let mut sink = JsonLinesSink::new(Vec::new(), LineFormat::RequestBody);
        sink.set_values(update("r1")).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "{\"values\":{\"a\":1}}\n");
    }

    #[test]
    fn test_fn_sink_propagates_errors() {
        let mut sink = FnSink(|_update: EntryUpdate| -> anyhow::Result<()> {
            anyhow::bail!("backend down")
        });
        let err = sink.set_values(update("r1")).unwrap_err();
        assert_eq!(err.to_string(), "backend down");
    }
}
