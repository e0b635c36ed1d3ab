pub mod add_event;
pub mod config;
pub mod events;
pub mod export;
pub mod export_json;
pub mod import_json;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calstore_core::{CalendarMetadata, CalstoreConfig, EventStore};

/// Settings every command needs, resolved once per invocation.
pub struct Settings {
    pub config: CalstoreConfig,
    /// Config file the settings came from, if it is known.
    pub config_path: Option<PathBuf>,
    pub database: PathBuf,
}

impl Settings {
    pub fn load(config_path: Option<&Path>, database: Option<PathBuf>) -> Result<Self> {
        let (config, config_path) = match config_path {
            Some(path) => (CalstoreConfig::load_from(path)?, Some(path.to_path_buf())),
            None => (CalstoreConfig::load()?, CalstoreConfig::config_path().ok()),
        };

        let database = database.unwrap_or_else(|| config.database_path());

        Ok(Settings {
            config,
            config_path,
            database,
        })
    }

    /// Open the store for the duration of one command.
    pub fn open_store(&self) -> Result<EventStore> {
        EventStore::open(&self.database)
            .with_context(|| format!("Failed to open database {}", self.database.display()))
    }

    pub fn metadata(&self) -> CalendarMetadata {
        CalendarMetadata {
            calendar_name: self.config.calendar_name.clone(),
            product_id: self.config.product_id.clone(),
        }
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
