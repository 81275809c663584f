//! Store options and the TOML configuration file

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{config_error, io_error, Result};

pub const DEFAULT_FEED_TABLE: &str = "feeds";
pub const DEFAULT_LINK_TABLE: &str = "links";
pub const DEFAULT_DRIVER: &str = "sqlite";
pub const DEFAULT_DATABASE_PATH: &str = "feedstore.db";

/// Options accepted by [`crate::Store::new`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    pub feed_table_name: String,
    pub link_table_name: String,
    /// Selects the SQL dialect; empty means `sqlite`
    pub driver_name: String,
    /// Create missing tables when the store is constructed
    pub automigrate: bool,
    /// Echo every generated statement at info level
    pub debug: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            feed_table_name: DEFAULT_FEED_TABLE.to_string(),
            link_table_name: DEFAULT_LINK_TABLE.to_string(),
            driver_name: DEFAULT_DRIVER.to_string(),
            automigrate: true,
            debug: false,
        }
    }
}

impl StoreOptions {
    pub fn with_feed_table_name(mut self, name: impl Into<String>) -> Self {
        self.feed_table_name = name.into();
        self
    }

    pub fn with_link_table_name(mut self, name: impl Into<String>) -> Self {
        self.link_table_name = name.into();
        self
    }

    pub fn with_driver_name(mut self, name: impl Into<String>) -> Self {
        self.driver_name = name.into();
        self
    }

    pub fn with_automigrate(mut self, automigrate: bool) -> Self {
        self.automigrate = automigrate;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}

/// Contents of a `feedstore.toml` file
///
/// ```toml
/// database_path = "data/feeds.db"
///
/// [store]
/// feed_table_name = "feeds"
/// link_table_name = "links"
/// debug = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    #[serde(default)]
    pub store: StoreOptions,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            store: StoreOptions::default(),
        }
    }
}

impl StoreConfig {
    /// # Errors
    ///
    /// Returns an `ERR_CONFIG` error when the text is not valid TOML for this
    /// shape.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| config_error(format!("invalid config: {}", e)))
    }

    /// # Errors
    ///
    /// Returns an `ERR_IO` error when the file cannot be read and
    /// `ERR_CONFIG` when it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| io_error("config_load", e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded store config");
        Ok(config)
    }
}
