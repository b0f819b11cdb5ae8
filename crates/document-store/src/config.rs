use crate::error::{DocumentStoreError, Result};
use ragcore_vector_store::BackendKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a document store instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters of context shared between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Vector index backend variant; fixed once the store is constructed
    #[serde(default = "default_backend")]
    pub backend: BackendKind,

    /// Directory holding the backend's durable snapshots
    #[serde(default = "default_persist_directory")]
    pub persist_directory: PathBuf,
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_backend() -> BackendKind {
    BackendKind::Incremental
}

fn default_persist_directory() -> PathBuf {
    PathBuf::from("data/vectordb")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            backend: default_backend(),
            persist_directory: default_persist_directory(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&raw)
            .map_err(|e| DocumentStoreError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(DocumentStoreError::InvalidConfig(
                "chunk_size must be > 0".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(DocumentStoreError::InvalidConfig(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}
