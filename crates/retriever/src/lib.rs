//! # Ragcore Retriever
//!
//! Thin query facade over the document store: applies a default result
//! count and renders ranked chunks into a single context string for
//! downstream prompting.

use ragcore_document_store::{DocumentStore, SearchResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;
use thiserror::Error;

/// Sentinel returned when a query matches nothing
pub const NO_RESULTS_MESSAGE: &str = "No relevant information found.";

pub type Result<T> = std::result::Result<T, RetrieverError>;

#[derive(Error, Debug)]
pub enum RetrieverError {
    #[error("Document store error: {0}")]
    DocumentStore(#[from] ragcore_document_store::DocumentStoreError),
}

/// Retriever configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Result count applied when a call does not specify one
    pub top_k: usize,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Query facade over an explicitly owned document store handle
pub struct Retriever {
    store: Arc<DocumentStore>,
    config: RetrieverConfig,
}

impl Retriever {
    #[must_use]
    pub fn new(store: Arc<DocumentStore>, config: RetrieverConfig) -> Self {
        log::info!("Document retriever initialized (default top_k {})", config.top_k);
        Self { store, config }
    }

    /// Retrieve chunks relevant to `query`, applying the configured
    /// default when `top_k` is None
    pub fn retrieve(&self, query: &str, top_k: Option<usize>) -> Result<Vec<SearchResult>> {
        let top_k = top_k.unwrap_or(self.config.top_k);
        let results = self.store.search(query, top_k)?;
        log::debug!("Retrieved {} chunks for query: {query}", results.len());
        Ok(results)
    }

    /// Retrieve and render results for inclusion in a prompt.
    ///
    /// Returns [`NO_RESULTS_MESSAGE`] when nothing matches; never an empty
    /// string and never an error for zero matches.
    pub fn retrieve_and_format(&self, query: &str, top_k: Option<usize>) -> Result<String> {
        let results = self.retrieve(query, top_k)?;
        if results.is_empty() {
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }

        let mut blocks = Vec::with_capacity(results.len());
        for (i, result) in results.iter().enumerate() {
            let source = result
                .metadata
                .get("source")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown");
            let mut block = String::new();
            let _ = writeln!(
                block,
                "Document {} (Source: {source}, Relevance: {:.2}):",
                i + 1,
                result.score
            );
            let _ = writeln!(block, "{}", result.content);
            blocks.push(block);
        }
        Ok(blocks.join("\n"))
    }
}
