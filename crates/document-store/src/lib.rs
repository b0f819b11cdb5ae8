//! # Ragcore Document Store
//!
//! Document ingestion and retrieval orchestration for RAG.
//!
//! ## Pipeline
//!
//! ```text
//! Content / File
//!     │
//!     ├──> Loader Registry (by extension)
//!     │      └─> Raw text
//!     │
//!     ├──> Text Splitter (overlapping chunks)
//!     │
//!     ├──> Embedding Provider (batch)
//!     │
//!     └──> Vector Index Backend
//!            └─> (doc_id, chunk_id) tagged entries
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use ragcore_document_store::{DocumentStore, StoreConfig};
//! use ragcore_vector_store::{HashEmbedder, Metadata};
//! use std::sync::Arc;
//!
//! fn main() -> ragcore_document_store::Result<()> {
//!     let store = DocumentStore::new(StoreConfig::default(), Arc::new(HashEmbedder::default()))?;
//!
//!     let doc_id = store.add_document("document body...", Metadata::new())?;
//!     let results = store.search("body", 5)?;
//!     store.delete_document(&doc_id)?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod loader;
mod store;

pub use config::StoreConfig;
pub use error::{DocumentStoreError, Result};
pub use loader::{DocumentLoader, LoaderRegistry};
pub use store::{ChunkRecord, DocumentStore};

// Re-export vector store types callers interact with
pub use ragcore_vector_store::{
    BackendCapabilities, BackendKind, EmbeddingProvider, HashEmbedder, Metadata, MetadataValue,
    SearchResult,
};
