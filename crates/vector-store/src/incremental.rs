use crate::backend::{check_dimension, rank_entries, BackendCapabilities, VectorIndexBackend};
use crate::error::Result;
use crate::persist::{read_json, write_json_atomic};
use crate::types::{IndexEntry, MetadataFilter, SearchResult};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

const SNAPSHOT_FILE_NAME: &str = "entries.json";

/// Index backend with in-place add and delete.
///
/// Entries live in insertion order in memory; the full snapshot is persisted
/// after every mutating call. Deletion removes exactly the entries matching
/// the filter and preserves the relative order of survivors.
pub struct IncrementalBackend {
    dimension: usize,
    snapshot_path: PathBuf,
    entries: RwLock<Vec<IndexEntry>>,
}

impl IncrementalBackend {
    /// Open the backend under `dir`, loading an existing snapshot if present
    pub fn open(dir: impl AsRef<Path>, dimension: usize) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let snapshot_path = dir.join(SNAPSHOT_FILE_NAME);

        let entries: Vec<IndexEntry> = read_json(&snapshot_path)?.unwrap_or_default();
        for entry in &entries {
            check_dimension(dimension, &entry.vector)?;
        }
        log::info!("Loaded {} entries from {:?}", entries.len(), snapshot_path);

        Ok(Self {
            dimension,
            snapshot_path,
            entries: RwLock::new(entries),
        })
    }

    fn persist(&self, entries: &[IndexEntry]) -> Result<()> {
        write_json_atomic(&self.snapshot_path, &entries)
    }
}

impl VectorIndexBackend for IncrementalBackend {
    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            supports_incremental_delete: true,
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
            .entries
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let prior_len = guard.len();
        guard.extend(entries);

        // Memory commits only together with the durable snapshot
        if let Err(err) = self.persist(&guard) {
            guard.truncate(prior_len);
            return Err(err);
        }
        log::debug!("Added {} entries, total {}", guard.len() - prior_len, guard.len());
        Ok(())
    }

    fn delete(&self, filter: &MetadataFilter) -> Result<usize> {
        let mut guard = self
            .entries
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

        self.persist(&survivors)?;
        *guard = survivors;
        log::debug!("Deleted {removed} entries, {} remain", guard.len());
        Ok(removed)
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        check_dimension(self.dimension, query)?;
        let guard = self
            .entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(rank_entries(&guard, query, k))
    }

    fn list(&self) -> Result<Vec<IndexEntry>> {
        let guard = self
            .entries
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(guard.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VectorStoreError;
    use crate::types::Metadata;
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
    fn test_add_and_search() {
        let dir = TempDir::new().unwrap();
        let backend = IncrementalBackend::open(dir.path(), 2).unwrap();

        backend
            .add(vec![entry("a", 0, vec![1.0, 0.0]), entry("a", 1, vec![0.0, 1.0])])
            .unwrap();

        let results = backend.search(&[1.0, 0.0], 1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].content, "a:0");
        assert!((results[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_delete_removes_only_matches_and_keeps_order() {
        let dir = TempDir::new().unwrap();
        let backend = IncrementalBackend::open(dir.path(), 2).unwrap();
        backend
            .add(vec![
                entry("a", 0, vec![1.0, 0.0]),
                entry("b", 0, vec![0.0, 1.0]),
                entry("a", 1, vec![1.0, 1.0]),
                entry("c", 0, vec![0.5, 0.5]),
            ])
            .unwrap();

        let removed = backend
            .delete(&MetadataFilter::new().with("doc_id", "a"))
            .unwrap();
        assert_eq!(removed, 2);

        let remaining: Vec<String> = backend
            .list()
            .unwrap()
            .into_iter()
            .map(|e| e.content)
            .collect();
        assert_eq!(remaining, vec!["b:0", "c:0"]);
    }

    #[test]
    fn test_delete_nonexistent_is_noop() {
        let dir = TempDir::new().unwrap();
        let backend = IncrementalBackend::open(dir.path(), 2).unwrap();
        backend.add(vec![entry("a", 0, vec![1.0, 0.0])]).unwrap();

        let removed = backend
            .delete(&MetadataFilter::new().with("doc_id", "missing"))
            .unwrap();
        assert_eq!(removed, 0);
        assert_eq!(backend.list().unwrap().len(), 1);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let backend = IncrementalBackend::open(dir.path(), 2).unwrap();
            backend.add(vec![entry("a", 0, vec![1.0, 0.0])]).unwrap();
        }
        let backend = IncrementalBackend::open(dir.path(), 2).unwrap();
        assert_eq!(backend.list().unwrap().len(), 1);
        assert_eq!(backend.list().unwrap()[0].content, "a:0");
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let dir = TempDir::new().unwrap();
        let backend = IncrementalBackend::open(dir.path(), 3).unwrap();

        let err = backend.add(vec![entry("a", 0, vec![1.0, 0.0])]).unwrap_err();
        assert!(matches!(err, VectorStoreError::InvalidDimension { .. }));
        assert!(backend.list().unwrap().is_empty());

        let err = backend.search(&[1.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, VectorStoreError::InvalidDimension { .. }));
    }

    #[test]
    fn test_reopen_with_wrong_dimension_fails() {
        let dir = TempDir::new().unwrap();
        {
            let backend = IncrementalBackend::open(dir.path(), 2).unwrap();
            backend.add(vec![entry("a", 0, vec![1.0, 0.0])]).unwrap();
        }
        assert!(IncrementalBackend::open(dir.path(), 3).is_err());
    }

    #[test]
    fn test_add_empty_batch_is_noop() {
        let dir = TempDir::new().unwrap();
        let backend = IncrementalBackend::open(dir.path(), 2).unwrap();
        backend.add(Vec::new()).unwrap();
        assert!(backend.list().unwrap().is_empty());
        // No snapshot written for a no-op
        assert!(!dir.path().join(SNAPSHOT_FILE_NAME).exists());
    }
}
