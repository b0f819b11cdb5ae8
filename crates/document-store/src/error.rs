use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocumentStoreError>;

#[derive(Error, Debug)]
pub enum DocumentStoreError {
    #[error("Chunker error: {0}")]
    Chunker(#[from] ragcore_chunker::ChunkerError),

    #[error("Vector store error: {0}")]
    VectorStore(#[from] ragcore_vector_store::VectorStoreError),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Failed to load {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("top_k must be greater than zero")]
    InvalidTopK,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DocumentStoreError {
    /// Create a load error for `path`
    pub fn load(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
