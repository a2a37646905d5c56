//! File configuration.
//!
//! ```toml
//! [indexer]
//! lowercase = true
//! strip_html = true
//!
//! [search]
//! match_all_terms = true
//! max_results = 50
//!
//! [sessions]
//! archive_delay_days = 30
//! ```
//!
//! Every table and key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use catalog_types::{IndexerConfig, SearchConfig, SessionConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config text is not valid TOML for [`CatalogConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// All catalog settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// `[indexer]` table: search string construction.
    pub indexer: IndexerConfig,
    /// `[search]` table: catalog lookups.
    pub search: SearchConfig,
    /// `[sessions]` table: session lifecycle tasks.
    pub sessions: SessionConfig,
}

impl CatalogConfig {
    /// Parses TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    /// Reads `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
