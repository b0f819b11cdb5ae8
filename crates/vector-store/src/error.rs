use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorStoreError>;

#[derive(Error, Debug)]
pub enum VectorStoreError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Unsupported backend type: {0}")]
    UnsupportedBackend(String),

    #[error("Operation not supported by this backend: {0}")]
    UnsupportedOperation(String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("{0}")]
    Other(String),
}

impl VectorStoreError {
    /// Create an embedding error
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create an unsupported-operation error
    pub fn unsupported(op: impl Into<String>) -> Self {
        Self::UnsupportedOperation(op.into())
    }
}
