//! JSON backup format.
//!
//! ```json
//! {
//!   "format_version": "1.0",
//!   "calendar_name": "My Calendar",
//!   "exported_at": "2024-12-01T10:00:00+01:00",
//!   "events": [
//!     { "name": "Winterferien", "start_date": "2024-12-23", "end_date": "2025-01-06", "all_day": true }
//!   ]
//! }
//! ```
//!
//! No other properties are allowed at either level.

use std::path::Path;

use chrono::Local;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{CalStoreError, CalStoreResult};
use crate::event::{Event, NewEvent};
use crate::ingest::ingest;
use crate::store::EventStore;

pub const FORMAT_VERSION: &str = "1.0";

/// Top-level keys an import refuses to go without.
const REQUIRED_KEYS: [&str; 2] = ["format_version", "events"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarDocument {
    pub format_version: String,
    #[serde(default)]
    pub calendar_name: Option<String>,
    #[serde(default)]
    pub exported_at: Option<String>,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventRecord {
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_all_day")]
    pub all_day: bool,
}

fn default_all_day() -> bool {
    true
}

impl From<&Event> for EventRecord {
    fn from(event: &Event) -> Self {
        EventRecord {
            name: event.name.clone(),
            start_date: event.start.to_string(),
            end_date: event.end.to_string(),
            all_day: event.all_day,
        }
    }
}

impl From<&EventRecord> for NewEvent {
    fn from(record: &EventRecord) -> Self {
        NewEvent::new(
            record.name.clone(),
            record.start_date.clone(),
            record.end_date.clone(),
            record.all_day,
        )
    }
}

impl CalendarDocument {
    /// Snapshot of `events` stamped with the current local time.
    pub fn new(calendar_name: &str, events: &[Event]) -> Self {
        CalendarDocument {
            format_version: FORMAT_VERSION.to_string(),
            calendar_name: Some(calendar_name.to_string()),
            exported_at: Some(Local::now().to_rfc3339()),
            events: events.iter().map(EventRecord::from).collect(),
        }
    }

    /// Parse an import document.
    ///
    /// Missing `format_version` or `events` is reported by name. The values of
    /// `format_version`, `calendar_name` and `exported_at` are not checked.
    pub fn parse(content: &str) -> CalStoreResult<Self> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| CalStoreError::InvalidFormat(format!("not valid JSON: {e}")))?;

        let object = value
            .as_object()
            .ok_or_else(|| CalStoreError::InvalidFormat("expected a JSON object".into()))?;

        for key in REQUIRED_KEYS {
            if !object.contains_key(key) {
                return Err(CalStoreError::InvalidFormat(format!(
                    "missing required field `{key}`"
                )));
            }
        }

        serde_json::from_value(value).map_err(|e| CalStoreError::InvalidFormat(e.to_string()))
    }
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Write every stored event to `path` as a JSON backup.
///
/// Returns the number of events written.
pub fn export_json(store: &EventStore, path: &Path, calendar_name: &str) -> CalStoreResult<usize> {
    let events = store.scan_all()?;
    let document = CalendarDocument::new(calendar_name, &events);

    let content = serde_json::to_string_pretty(&document)
        .map_err(|e| CalStoreError::Encoding(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| {
        CalStoreError::Encoding(format!("Failed to write {}: {}", path.display(), e))
    })?;

    info!(
        "event=export_json module=interchange status=ok count={} path={}",
        events.len(),
        path.display()
    );
    Ok(events.len())
}

/// Import a JSON backup from `path`.
///
/// Every event is validated before the first insert, so a document with a
/// malformed event imports nothing. Duplicates are skipped and counted.
/// Any other failure stops the import; events already inserted stay.
pub fn import_json(store: &mut EventStore, path: &Path) -> CalStoreResult<ImportSummary> {
    let content = std::fs::read_to_string(path)?;
    let document = CalendarDocument::parse(&content)?;

    let new_events: Vec<NewEvent> = document.events.iter().map(NewEvent::from).collect();
    for (index, event) in new_events.iter().enumerate() {
        event.validate().map_err(|e| {
            CalStoreError::InvalidFormat(format!("event #{} ('{}'): {}", index + 1, event.name, e))
        })?;
    }

    let mut summary = ImportSummary::default();
    for event in &new_events {
        match ingest(store, event) {
            Ok(_) => summary.imported += 1,
            Err(CalStoreError::DuplicateEvent { .. }) => {
                debug!(
                    "event=import_skip module=interchange status=duplicate name={}",
                    event.name
                );
                summary.skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    info!(
        "event=import_json module=interchange status=ok imported={} skipped={} path={}",
        summary.imported,
        summary.skipped,
        path.display()
    );
    Ok(summary)
}
