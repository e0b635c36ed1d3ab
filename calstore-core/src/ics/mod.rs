//! iCalendar export.
//!
//! Stored events are rendered into a single VCALENDAR per RFC 5545, suitable
//! for publishing as a subscribable feed.

mod generate;

use std::path::Path;

use log::info;

use crate::error::{CalStoreError, CalStoreResult};
use crate::store::EventStore;

pub use generate::generate_ics;

/// Calendar-level fields written into every exported document.
#[derive(Debug, Clone)]
pub struct CalendarMetadata {
    /// Human-readable calendar name (X-WR-CALNAME)
    pub calendar_name: String,
    /// Product identifier (PRODID)
    pub product_id: String,
}

/// Write every stored event to `path` as an .ics document.
///
/// Returns the number of events written. A failed write may leave a partial
/// file behind.
pub fn export_ics(
    store: &EventStore,
    path: &Path,
    metadata: &CalendarMetadata,
) -> CalStoreResult<usize> {
    let events = store.scan_all()?;
    let content = generate_ics(&events, metadata)?;

    std::fs::write(path, content).map_err(|e| {
        CalStoreError::Encoding(format!("Failed to write {}: {}", path.display(), e))
    })?;

    info!(
        "event=export_ics module=ics status=ok count={} path={}",
        events.len(),
        path.display()
    );
    Ok(events.len())
}
