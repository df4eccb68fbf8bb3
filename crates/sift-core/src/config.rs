//! Engine and store configuration.
//!
//! Configuration is plain `serde` data with per-field defaults, so a TOML
//! file only needs to name what differs from the defaults:
//!
//! ```toml
//! [engine]
//! url = "http://search.internal:9200"
//!
//! [store]
//! index_name = "places"
//! type_name = "place"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default number of hits returned by a paged search.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of hits requested per scroll round.
pub const SCROLL_BATCH_SIZE: usize = 100;

/// How long the engine keeps a scroll cursor alive between rounds.
pub const SCROLL_LIFETIME: &str = "1m";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiftConfig {
    /// Engine connection settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Index identity and paging settings.
    #[serde(default)]
    pub store: StoreConfig,
}

impl SiftConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Invalid configuration: {e}")))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("Failed to load {}: {e}", path.display())))?;
        log::debug!(
            "Loaded configuration from {} (index '{}')",
            path.display(),
            config.store.index_name
        );
        Ok(config)
    }
}

/// Engine connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the engine's REST endpoint.
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Index identity and paging settings for a `SearchStore`.
///
/// The identity fields are fixed for the lifetime of the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Index the store reads and writes.
    #[serde(default)]
    pub index_name: String,

    /// Document type within the index.
    #[serde(default = "default_type_name")]
    pub type_name: String,

    /// Default `size` for paged searches.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Hits requested per scroll round.
    #[serde(default = "default_scroll_batch_size")]
    pub scroll_batch_size: usize,

    /// Scroll cursor lifetime, in engine time units (e.g. `1m`).
    #[serde(default = "default_scroll_lifetime")]
    pub scroll_lifetime: String,
}

fn default_type_name() -> String {
    "_doc".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_scroll_batch_size() -> usize {
    SCROLL_BATCH_SIZE
}

fn default_scroll_lifetime() -> String {
    SCROLL_LIFETIME.to_string()
}

impl StoreConfig {
    /// Create a store configuration for an index and type with default paging.
    pub fn new(index_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            type_name: type_name.into(),
            ..Default::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            index_name: String::new(),
            type_name: default_type_name(),
            page_size: default_page_size(),
            scroll_batch_size: default_scroll_batch_size(),
            scroll_lifetime: default_scroll_lifetime(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
