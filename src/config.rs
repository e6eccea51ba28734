//! Configuration for tasklist.
//!
//! Settings come from an optional YAML file, `.tasklist/config.yaml` inside the
//! store path unless another file is named on the command line. Every field
//! has a default, so an empty or partial file is fine.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::notify::DEFAULT_NOTICE_MS;
use crate::query::DEFAULT_PAGE_SIZE;
use crate::storage::{Backend, STORE_DIR};
use crate::store::DEFAULT_KEY;

/// Config file name inside the store directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// User settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Storage backend for the task collection.
    pub backend: Backend,

    /// Storage key holding the serialized tasks.
    pub storage_key: String,

    /// Tasks shown per page.
    pub page_size: usize,

    /// How long notices stay visible, in milliseconds.
    pub notice_ms: i64,

    /// Whether to color terminal output.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            storage_key: DEFAULT_KEY.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            notice_ms: DEFAULT_NOTICE_MS,
            color: true,
        }
    }
}

impl Config {
    /// Default config file location for a store path.
    pub fn default_path(store_path: &Path) -> PathBuf {
        store_path.join(STORE_DIR).join(CONFIG_FILE)
    }

    /// Load config from `path`, falling back to defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self =
            serde_yaml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::info!(path = ?path, "Loaded config");
        Ok(config)
    }
}

/// Default store location: the user's data directory, else the current directory.
pub fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("tasklist"))
        .unwrap_or_else(|| PathBuf::from("."))
}
