//! Configuration loading from disk.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::config::entry::Entry;

/// One section of the config file.
pub type Section = HashMap<String, Entry>;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to unmarshal config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Both sections of a config file, parsed together.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigSnapshot {
    pub basic: Section,
    pub advanced: Section,
}

impl ConfigSnapshot {
    /// Parse a snapshot from YAML text.
    ///
    /// An empty document yields an empty snapshot.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Read and parse a YAML config file.
pub fn load_snapshot(path: &Path) -> Result<ConfigSnapshot, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ConfigSnapshot::from_yaml(&content)
}
