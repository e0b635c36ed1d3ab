//! Error types for calstore.

use thiserror::Error;

/// Errors that can occur in calstore operations.
///
/// `DuplicateEvent` is the expected, recoverable outcome of adding an event
/// that already exists. Everything else aborts the current operation.
#[derive(Error, Debug)]
pub enum CalStoreError {
    #[error("Event already exists: {name} ({start_date} to {end_date})")]
    DuplicateEvent {
        name: String,
        start_date: String,
        end_date: String,
    },

    #[error("Invalid import format: {0}")]
    InvalidFormat(String),

    #[error("Invalid event: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CalStoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, CalStoreError::DuplicateEvent { .. })
    }
}

/// Result type alias for calstore operations.
pub type CalStoreResult<T> = Result<T, CalStoreError>;
