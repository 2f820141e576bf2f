//! Picker settings, read from a JSON file. Every field has a default.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::search::SearchMode;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Parsed-facet memo size, in item names.
    pub parse_cache_capacity: usize,
    /// Search mode a new session starts in.
    pub default_search_mode: SearchMode,
    /// SQLite file for persisted pick lists. None keeps them in memory.
    pub selection_db_path: Option<PathBuf>,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Emit log lines as JSON objects.
    pub log_json: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            parse_cache_capacity: 4096,
            default_search_mode: SearchMode::Plain,
            selection_db_path: None,
            log_filter: "sitestock=info".to_string(),
            log_json: false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config IO error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl PickerConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Falls back to defaults when the file is missing or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load_from_file(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "config load failed, using defaults");
            Self::default()
        })
    }
}
