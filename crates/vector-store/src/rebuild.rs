use crate::backend::{check_dimension, rank_entries, BackendCapabilities, VectorIndexBackend};
use crate::error::{Result, VectorStoreError};
use crate::persist::{read_json, write_json_atomic};
use crate::types::{IndexEntry, Metadata, MetadataFilter, SearchResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

const INDEX_FILE_NAME: &str = "index.json";
const DOCUMENTS_FILE_NAME: &str = "documents.json";

/// Append-only index backend; deletion rebuilds the whole structure.
///
/// `add` appends in memory and rewrites both snapshot files wholesale.
/// `delete` collects the surviving entries and reconstructs the index from
/// them, which is O(total entries) per call; choose the incremental backend
/// when deletions are frequent. The live index sits behind an `Arc` that is
/// swapped only after the replacement is fully built, so concurrent readers
/// observe either the pre- or post-rebuild index, never a partial one.
#[derive(Debug)]
pub struct RebuildBackend {
    dimension: usize,
    index_path: PathBuf,
    documents_path: PathBuf,
    inner: RwLock<Arc<Vec<IndexEntry>>>,
}

/// Ordered document record persisted alongside the vector index
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentRecord {
    content: String,
    metadata: Metadata,
}

impl RebuildBackend {
    /// Open the backend under `dir`, loading existing snapshots if present
    pub fn open(dir: impl AsRef<Path>, dimension: usize) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let index_path = dir.join(INDEX_FILE_NAME);
        let documents_path = dir.join(DOCUMENTS_FILE_NAME);

        let vectors: Vec<Vec<f32>> = read_json(&index_path)?.unwrap_or_default();
        let documents: Vec<DocumentRecord> = read_json(&documents_path)?.unwrap_or_default();
        if vectors.len() != documents.len() {
            return Err(VectorStoreError::CorruptSnapshot(format!(
                "index holds {} vectors but document list holds {} records",
                vectors.len(),
                documents.len()
            )));
        }

        let entries: Vec<IndexEntry> = documents
            .into_iter()
            .zip(vectors)
            .map(|(record, vector)| IndexEntry {
                content: record.content,
                metadata: record.metadata,
                vector,
            })
            .collect();
        for entry in &entries {
            check_dimension(dimension, &entry.vector)?;
        }
        log::info!("Loaded {} entries from {:?}", entries.len(), index_path);

        Ok(Self {
            dimension,
            index_path,
            documents_path,
            inner: RwLock::new(Arc::new(entries)),
        })
    }

    /// Rewrite both snapshot files wholesale
    fn persist(&self, entries: &[IndexEntry]) -> Result<()> {
        let vectors: Vec<&Vec<f32>> = entries.iter().map(|e| &e.vector).collect();
        let documents: Vec<DocumentRecord> = entries
            .iter()
            .map(|e| DocumentRecord {
                content: e.content.clone(),
                metadata: e.metadata.clone(),
            })
            .collect();
        write_json_atomic(&self.index_path, &vectors)?;
        write_json_atomic(&self.documents_path, &documents)?;
        Ok(())
    }

    /// Grab the current index snapshot without holding the lock
    fn snapshot(&self) -> Arc<Vec<IndexEntry>> {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl VectorIndexBackend for RebuildBackend {
    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            supports_incremental_delete: false,
        }
    }

    fn add(&self, entries: Vec<IndexEntry>) -> Result<()> {
        if entries.is_empty() {
            log::warn!("No entries to add");
            return Ok(());
        }
        for entry in &entries {
            check_dimension(self.dimension, &entry.vector)?;
        }

        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        // Append onto a fresh copy; the empty index initializes the same way
        let mut next: Vec<IndexEntry> = guard.as_ref().clone();
        let added = entries.len();
        next.extend(entries);

        // Persist first so memory never runs ahead of the durable snapshot
        self.persist(&next)?;
        *guard = Arc::new(next);
        log::debug!("Added {added} entries, total {}", guard.len());
        Ok(())
    }

    fn delete(&self, filter: &MetadataFilter) -> Result<usize> {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let survivors: Vec<IndexEntry> = guard
            .iter()
            .filter(|entry| !filter.matches(&entry.metadata))
            .cloned()
            .collect();
        let removed = guard.len() - survivors.len();
        if removed == 0 {
            return Ok(0);
        }

        log::info!("Rebuilding index: {removed} removed, {} survive", survivors.len());
        self.persist(&survivors)?;
        *guard = Arc::new(survivors);
        Ok(removed)
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        check_dimension(self.dimension, query)?;
        let snapshot = self.snapshot();
        Ok(rank_entries(&snapshot, query, k))
    }

    fn list(&self) -> Result<Vec<IndexEntry>> {
        Ok(self.snapshot().as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn entry(doc_id: &str, chunk_id: usize, vector: Vec<f32>) -> IndexEntry {
        let mut metadata = Metadata::new();
        metadata.insert("doc_id".to_string(), doc_id.into());
        metadata.insert("chunk_id".to_string(), chunk_id.into());
        IndexEntry {
            content: format!("{doc_id}:{chunk_id}"),
            metadata,
            vector,
        }
    }

    #[test]
    fn test_add_initializes_then_appends() {
        let dir = TempDir::new().unwrap();
        let backend = RebuildBackend::open(dir.path(), 2).unwrap();

        backend.add(vec![entry("a", 0, vec![1.0, 0.0])]).unwrap();
        backend.add(vec![entry("b", 0, vec![0.0, 1.0])]).unwrap();

        let contents: Vec<String> = backend
            .list()
            .unwrap()
            .into_iter()
            .map(|e| e.content)
            .collect();
        assert_eq!(contents, vec!["a:0", "b:0"]);
    }

    #[test]
    fn test_delete_rebuilds_from_survivors() {
        let dir = TempDir::new().unwrap();
        let backend = RebuildBackend::open(dir.path(), 2).unwrap();
        backend
            .add(vec![
                entry("a", 0, vec![1.0, 0.0]),
                entry("b", 0, vec![0.0, 1.0]),
                entry("a", 1, vec![1.0, 1.0]),
            ])
            .unwrap();

        let removed = backend
            .delete(&MetadataFilter::new().with("doc_id", "a"))
            .unwrap();
        assert_eq!(removed, 2);

        let contents: Vec<String> = backend
            .list()
            .unwrap()
            .into_iter()
            .map(|e| e.content)
            .collect();
        assert_eq!(contents, vec!["b:0"]);

        // Survivors still searchable after the swap
        let results = backend.search(&[0.0, 1.0], 5).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "b:0");
    }

    #[test]
    fn test_delete_nonexistent_is_noop() {
        let dir = TempDir::new().unwrap();
        let backend = RebuildBackend::open(dir.path(), 2).unwrap();
        backend.add(vec![entry("a", 0, vec![1.0, 0.0])]).unwrap();

        assert_eq!(
            backend
                .delete(&MetadataFilter::new().with("doc_id", "missing"))
                .unwrap(),
            0
        );
        assert_eq!(backend.list().unwrap().len(), 1);
    }

    #[test]
    fn test_persists_both_files_and_reloads() {
        let dir = TempDir::new().unwrap();
        {
            let backend = RebuildBackend::open(dir.path(), 2).unwrap();
            backend
                .add(vec![entry("a", 0, vec![1.0, 0.0]), entry("a", 1, vec![0.0, 1.0])])
                .unwrap();
        }
        assert!(dir.path().join(INDEX_FILE_NAME).exists());
        assert!(dir.path().join(DOCUMENTS_FILE_NAME).exists());

        let backend = RebuildBackend::open(dir.path(), 2).unwrap();
        assert_eq!(backend.list().unwrap().len(), 2);
    }

    #[test]
    fn test_out_of_sync_snapshots_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(INDEX_FILE_NAME), "[[1.0, 0.0]]").unwrap();
        std::fs::write(dir.path().join(DOCUMENTS_FILE_NAME), "[]").unwrap();

        let err = RebuildBackend::open(dir.path(), 2).unwrap_err();
        assert!(matches!(err, VectorStoreError::CorruptSnapshot(_)));
    }

    #[test]
    fn test_readers_see_old_snapshot_during_rebuild() {
        let dir = TempDir::new().unwrap();
        let backend = RebuildBackend::open(dir.path(), 2).unwrap();
        backend
            .add(vec![entry("a", 0, vec![1.0, 0.0]), entry("b", 0, vec![0.0, 1.0])])
            .unwrap();

        // A snapshot taken before the delete keeps the full view
        let before = backend.snapshot();
        backend
            .delete(&MetadataFilter::new().with("doc_id", "a"))
            .unwrap();
        assert_eq!(before.len(), 2);
        assert_eq!(backend.list().unwrap().len(), 1);
    }
}
