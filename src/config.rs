use crate::error::{Result, TrellisError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which storage backend a [`crate::Trellis`] is built on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Data directory for the file backend
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: PathBuf::from(".trellis"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Treat "Done" and "done" as the same title when checking duplicates
    pub case_insensitive_titles: bool,
}

/// Top-level configuration, usually read from `config.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrellisConfig {
    pub storage: StorageConfig,
    pub columns: ColumnConfig,
}

impl TrellisConfig {
    pub const FILE_NAME: &'static str = "config.toml";

    /// Parses a TOML document; missing sections fall back to defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| TrellisError::ConfigError(e.to_string()))
    }

    /// Loads the configuration file at `path`
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            TrellisError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads `path` when it exists, otherwise returns the defaults
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path).await
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}
