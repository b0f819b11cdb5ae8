use crate::embeddings::cosine_similarity;
use crate::error::{Result, VectorStoreError};
use crate::incremental::IncrementalBackend;
use crate::rebuild::RebuildBackend;
use crate::types::{IndexEntry, MetadataFilter, SearchResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// What a backend can do beyond the shared contract.
///
/// Callers inspect capabilities instead of branching on a backend name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendCapabilities {
    /// True when `delete` removes entries in place; false when every delete
    /// reconstructs the whole index from survivors (O(total entries)).
    pub supports_incremental_delete: bool,
}

/// Closed set of index backend variants; fixed at construction time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-place add/delete, snapshot persisted after every mutation
    Incremental,
    /// Append-only in memory; delete rebuilds from surviving entries
    Rebuild,
}

impl BackendKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incremental => "incremental",
            Self::Rebuild => "rebuild",
        }
    }
}

impl FromStr for BackendKind {
    type Err = VectorStoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "incremental" => Ok(Self::Incremental),
            "rebuild" => Ok(Self::Rebuild),
            other => Err(VectorStoreError::UnsupportedBackend(other.to_string())),
        }
    }
}

/// Polymorphic vector index.
///
/// Scores returned by `search` are cosine similarity, higher is better, for
/// every backend; callers never see a backend-specific distance. All methods
/// are safe under concurrent use: `search` and `list` take shared access,
/// `add` and `delete` exclusive access.
pub trait VectorIndexBackend: Send + Sync {
    /// Capability flags for this backend
    fn capabilities(&self) -> BackendCapabilities;

    /// Add entries to the index and persist. Adding an empty batch is a
    /// no-op.
    fn add(&self, entries: Vec<IndexEntry>) -> Result<()>;

    /// Remove every entry matching `filter`; returns how many were removed.
    /// A filter matching nothing succeeds with 0.
    fn delete(&self, filter: &MetadataFilter) -> Result<usize>;

    /// Return the `k` best matches for `query`, ordered by non-increasing
    /// score, ties broken by insertion order.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>>;

    /// Enumerate every entry in insertion order
    fn list(&self) -> Result<Vec<IndexEntry>>;
}

/// Open (or create) a backend of the given kind under `dir`.
///
/// Existing snapshots are loaded and validated against `dimension`; a
/// mismatch is a configuration error at open time, not at query time.
pub fn open_backend(
    kind: BackendKind,
    dir: impl AsRef<Path>,
    dimension: usize,
) -> Result<Box<dyn VectorIndexBackend>> {
    log::info!(
        "Opening {} vector index at {:?} (dimension {})",
        kind.as_str(),
        dir.as_ref(),
        dimension
    );
    match kind {
        BackendKind::Incremental => Ok(Box::new(IncrementalBackend::open(dir, dimension)?)),
        BackendKind::Rebuild => Ok(Box::new(RebuildBackend::open(dir, dimension)?)),
    }
}

/// Brute-force ranking shared by both backends.
///
/// The stable sort keeps insertion order for equal scores.
pub(crate) fn rank_entries(entries: &[IndexEntry], query: &[f32], k: usize) -> Vec<SearchResult> {
    let mut results: Vec<SearchResult> = entries
        .iter()
        .map(|entry| SearchResult {
            content: entry.content.clone(),
            metadata: entry.metadata.clone(),
            score: cosine_similarity(query, &entry.vector),
        })
        .collect();

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(k);
    results
}

/// Reject a vector whose length differs from the index dimension
pub(crate) fn check_dimension(expected: usize, vector: &[f32]) -> Result<()> {
    if vector.len() != expected {
        return Err(VectorStoreError::InvalidDimension {
            expected,
            actual: vector.len(),
        });
    }
    Ok(())
}
