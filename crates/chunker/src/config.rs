use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for recursive text splitting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitterConfig {
    /// Maximum chunk size in characters (hard limit, must be > 0)
    pub chunk_size: usize,

    /// Number of characters shared between consecutive chunks
    /// (must be strictly smaller than `chunk_size`)
    pub chunk_overlap: usize,

    /// Break-point candidates tried in order before a hard character cut.
    /// Earlier separators are preferred: paragraph, line, sentence, word.
    #[serde(default = "default_separators")]
    pub separators: Vec<String>,
}

fn default_separators() -> Vec<String> {
    vec![
        "\n\n".to_string(),
        "\n".to_string(),
        ". ".to_string(),
        " ".to_string(),
    ]
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            separators: default_separators(),
        }
    }
}

impl SplitterConfig {
    /// Create a config with explicit size and overlap, default separators
    #[must_use]
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            separators: default_separators(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(ChunkerError::invalid_config("chunk_size must be > 0"));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(ChunkerError::invalid_config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.separators.iter().any(String::is_empty) {
            return Err(ChunkerError::invalid_config(
                "separators must be non-empty strings",
            ));
        }

        Ok(())
    }
}
