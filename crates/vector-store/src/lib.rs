//! # Ragcore Vector Store
//!
//! Vector indexing and similarity search for document chunks.
//!
//! ## Features
//!
//! - **Pluggable backends** behind one trait with capability flags
//! - **Incremental backend** with in-place add/delete
//! - **Rebuild backend** that reconstructs on delete (append-only otherwise)
//! - **Persistent storage** with atomic JSON snapshots
//! - **One score convention**: cosine similarity, higher is better
//!
//! ## Architecture
//!
//! ```text
//! IndexEntry[] (content, metadata, vector)
//!     │
//!     ├──> IncrementalBackend ── entries.json
//!     │
//!     └──> RebuildBackend ────── index.json + documents.json
//!              │
//!              └─> delete = filter survivors, rebuild, swap
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use ragcore_vector_store::{
//!     open_backend, BackendKind, EmbeddingProvider, HashEmbedder, IndexEntry, Metadata,
//! };
//!
//! fn main() -> ragcore_vector_store::Result<()> {
//!     let embedder = HashEmbedder::default();
//!     let backend = open_backend(BackendKind::Incremental, "data/vectordb", embedder.dimension())?;
//!
//!     let vector = embedder.embed_one("some chunk text")?;
//!     backend.add(vec![IndexEntry {
//!         content: "some chunk text".to_string(),
//!         metadata: Metadata::new(),
//!         vector,
//!     }])?;
//!
//!     let query = embedder.embed_one("chunk")?;
//!     for result in backend.search(&query, 5)? {
//!         println!("{:.3}: {}", result.score, result.content);
//!     }
//!     Ok(())
//! }
//! ```

mod backend;
mod embeddings;
mod error;
mod incremental;
mod persist;
mod rebuild;
mod types;

pub use backend::{open_backend, BackendCapabilities, BackendKind, VectorIndexBackend};
pub use embeddings::{cosine_similarity, EmbeddingProvider, HashEmbedder};
pub use error::{Result, VectorStoreError};
pub use incremental::IncrementalBackend;
pub use rebuild::RebuildBackend;
pub use types::{IndexEntry, Metadata, MetadataFilter, MetadataValue, SearchResult};
