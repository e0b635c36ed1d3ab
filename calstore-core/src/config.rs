//! calstore configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalStoreError, CalStoreResult};

static DEFAULT_DATABASE_PATH: &str = "~/.local/share/calstore/events.db";
static DEFAULT_CALENDAR_NAME: &str = "My Calendar";
static DEFAULT_PRODUCT_ID: &str = "-//calstore//calstore//EN";

fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}

fn default_calendar_name() -> String {
    DEFAULT_CALENDAR_NAME.to_string()
}

fn default_product_id() -> String {
    DEFAULT_PRODUCT_ID.to_string()
}

/// Configuration at ~/.config/calstore/config.toml
///
/// Every key can be overridden with a `CALSTORE_` environment variable,
/// e.g. `CALSTORE_DATABASE_PATH`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CalstoreConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Name written into JSON exports and the iCalendar feed.
    #[serde(default = "default_calendar_name")]
    pub calendar_name: String,

    /// PRODID of exported iCalendar documents.
    #[serde(default = "default_product_id")]
    pub product_id: String,
}

impl Default for CalstoreConfig {
    fn default() -> Self {
        CalstoreConfig {
            database_path: default_database_path(),
            calendar_name: default_calendar_name(),
            product_id: default_product_id(),
        }
    }
}

impl CalstoreConfig {
    pub fn config_path() -> CalStoreResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalStoreError::Config("Could not determine config directory".into()))?
            .join("calstore");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default config path, writing a commented default file
    /// on first run.
    pub fn load() -> CalStoreResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from `path` (which may be missing) plus `CALSTORE_*` overrides.
    pub fn load_from(path: &Path) -> CalStoreResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("CALSTORE"))
            .build()
            .map_err(|e| CalStoreError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalStoreError::Config(e.to_string()))
    }

    /// Database path with `~` expanded.
    pub fn database_path(&self) -> PathBuf {
        let full_path_str =
            shellexpand::tilde(&self.database_path.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// Effective configuration as TOML, for display.
    pub fn to_toml(&self) -> CalStoreResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalStoreError::Config(e.to_string()))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalStoreResult<()> {
        let contents = format!(
            "\
# calstore configuration

# Where events are stored:
# database_path = \"{}\"

# Calendar name used in exports:
# calendar_name = \"{}\"

# PRODID of exported .ics files:
# product_id = \"{}\"
",
            DEFAULT_DATABASE_PATH, DEFAULT_CALENDAR_NAME, DEFAULT_PRODUCT_ID
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalStoreError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalStoreError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CalstoreConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.calendar_name, DEFAULT_CALENDAR_NAME);
        assert_eq!(config.product_id, DEFAULT_PRODUCT_ID);
    }

    #[test]
    fn test_default_config_file_parses_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        CalstoreConfig::create_default_config(&path).unwrap();

        let config = CalstoreConfig::load_from(&path).unwrap();
        assert_eq!(config.database_path, default_database_path());
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "calendar_name = \"Schulferien\"\ndatabase_path = \"/tmp/ferien.db\"\n",
        )
        .unwrap();

        let config = CalstoreConfig::load_from(&path).unwrap();
        assert_eq!(config.calendar_name, "Schulferien");
        assert_eq!(config.database_path(), PathBuf::from("/tmp/ferien.db"));
        assert_eq!(config.product_id, DEFAULT_PRODUCT_ID);
    }

    #[test]
    fn test_to_toml_round_trips() {
        let config = CalstoreConfig::default();
        let rendered = config.to_toml().unwrap();
        let parsed: CalstoreConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
