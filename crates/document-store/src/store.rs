use crate::config::StoreConfig;
use crate::error::{DocumentStoreError, Result};
use crate::loader::LoaderRegistry;
use ragcore_chunker::{SplitterConfig, TextSplitter};
use ragcore_vector_store::{
    open_backend, BackendCapabilities, EmbeddingProvider, IndexEntry, Metadata, MetadataFilter,
    SearchResult, VectorIndexBackend, VectorStoreError,
};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// One indexed chunk as seen through full enumeration
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkRecord {
    pub content: String,
    pub metadata: Metadata,
}

/// Orchestrates chunking, embedding, id assignment and index mutation.
///
/// A document is the unit of external addressing: `add_document` /
/// `add_file` create one, `delete_document` destroys it with all its
/// chunks. Documents are never partially updated; model edits as delete
/// plus re-add.
pub struct DocumentStore {
    splitter: TextSplitter,
    embedder: Arc<dyn EmbeddingProvider>,
    backend: Box<dyn VectorIndexBackend>,
    loaders: LoaderRegistry,
}

impl DocumentStore {
    /// Construct a store from configuration and an embedding provider.
    ///
    /// Opens (or creates) the configured backend under
    /// `config.persist_directory`; an existing snapshot with a different
    /// vector dimension fails here, not at query time.
    pub fn new(config: StoreConfig, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        config.validate()?;
        let splitter = TextSplitter::new(SplitterConfig::new(
            config.chunk_size,
            config.chunk_overlap,
        ))?;
        let backend = open_backend(
            config.backend,
            &config.persist_directory,
            embedder.dimension(),
        )?;

        log::info!("Document store initialized ({})", config.backend.as_str());
        Ok(Self {
            splitter,
            embedder,
            backend,
            loaders: LoaderRegistry::with_defaults(),
        })
    }

    /// Capability flags of the underlying backend
    #[must_use]
    pub fn backend_capabilities(&self) -> BackendCapabilities {
        self.backend.capabilities()
    }

    /// Add a document; returns its generated id once the backend has
    /// confirmed the add.
    pub fn add_document(&self, content: &str, metadata: Metadata) -> Result<String> {
        self.ingest(content, metadata)
    }

    /// Add a file, resolving a loader by extension.
    ///
    /// Supported extensions: txt, pdf, csv, xlsx, xls, md, html, htm.
    /// Anything else fails with an unsupported-file-type error before the
    /// index is touched. `source` and `filename` metadata are added.
    pub fn add_file(&self, path: impl AsRef<Path>, mut metadata: Metadata) -> Result<String> {
        let path = path.as_ref();
        let content = self.loaders.load(path)?;

        metadata.insert("source".to_string(), path.display().to_string().into());
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        metadata.insert("filename".to_string(), filename.into());

        let doc_id = self.ingest(&content, metadata)?;
        log::info!("Added file {filename} with ID: {doc_id}");
        Ok(doc_id)
    }

    /// Search for chunks similar to `query`; `top_k` must be positive
    pub fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        if top_k == 0 {
            return Err(DocumentStoreError::InvalidTopK);
        }
        let query_vector = self.embedder.embed_one(query)?;
        Ok(self.backend.search(&query_vector, top_k)?)
    }

    /// Delete a document and all of its chunks.
    ///
    /// Returns false only when the backend reports the operation
    /// unsupported. Deleting an id with no chunks is a successful no-op.
    pub fn delete_document(&self, doc_id: &str) -> Result<bool> {
        let filter = MetadataFilter::new().with("doc_id", doc_id);
        match self.backend.delete(&filter) {
            Ok(removed) => {
                log::info!("Deleted document {doc_id} ({removed} chunks)");
                Ok(true)
            }
            Err(VectorStoreError::UnsupportedOperation(op)) => {
                log::warn!("Backend cannot delete ({op})");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Enumerate every indexed chunk
    pub fn get_all_documents(&self) -> Result<Vec<ChunkRecord>> {
        Ok(self
            .backend
            .list()?
            .into_iter()
            .map(|entry| ChunkRecord {
                content: entry.content,
                metadata: entry.metadata,
            })
            .collect())
    }

    /// Shared chunk → embed → index pipeline
    fn ingest(&self, content: &str, mut metadata: Metadata) -> Result<String> {
        let doc_id = Uuid::new_v4().to_string();
        metadata.insert("doc_id".to_string(), doc_id.clone().into());

        let texts: Vec<String> = self.splitter.split(content).map(str::to_string).collect();
        if texts.is_empty() {
            log::warn!("Document {doc_id} produced no chunks");
            return Ok(doc_id);
        }

        let vectors = self.embedder.embed_many(&texts)?;
        let entries: Vec<IndexEntry> = texts
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(chunk_id, (text, vector))| {
                let mut chunk_metadata = metadata.clone();
                chunk_metadata.insert("chunk_id".to_string(), chunk_id.into());
                IndexEntry {
                    content: text,
                    metadata: chunk_metadata,
                    vector,
                }
            })
            .collect();

        let chunk_count = entries.len();
        self.backend.add(entries)?;
        log::info!("Added document with ID: {doc_id}, chunks: {chunk_count}");
        Ok(doc_id)
    }
}
