//! Core types for calstore.
//!
//! This crate holds everything the `calstore` CLI works with:
//! - `identifier` derives the dedup key that gives an event its identity
//! - `store` persists events in SQLite behind a uniqueness constraint
//! - `ingest` is the only sanctioned way to create an event
//! - `ics` and `interchange` translate stored events to and from files

pub mod config;
pub mod error;
pub mod event;
pub mod ics;
pub mod identifier;
pub mod ingest;
pub mod interchange;
pub mod store;

pub use config::CalstoreConfig;
pub use error::{CalStoreError, CalStoreResult};
pub use event::{Event, EventDate, NewEvent, ValidatedEvent};
pub use ics::{CalendarMetadata, export_ics};
pub use ingest::ingest;
pub use interchange::{CalendarDocument, ImportSummary, export_json, import_json};
pub use store::EventStore;
