//! Index a few documents and retrieve formatted context for a query.
//!
//! Run with: `cargo run --example quickstart`

use ragcore_document_store::{DocumentStore, HashEmbedder, Metadata, StoreConfig};
use ragcore_retriever::{Retriever, RetrieverConfig};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let dir = tempfile::tempdir()?;
    let config = StoreConfig {
        persist_directory: dir.path().to_path_buf(),
        ..StoreConfig::default()
    };
    let store = Arc::new(DocumentStore::new(
        config,
        Arc::new(HashEmbedder::default()),
    )?);

    let mut metadata = Metadata::new();
    metadata.insert("source".to_string(), "handbook/remote-work.txt".into());
    store.add_document(
        "Employees may work remotely up to three days per week. \
         Remote days must be agreed with the team lead in advance.",
        metadata,
    )?;

    let mut metadata = Metadata::new();
    metadata.insert("source".to_string(), "handbook/expenses.txt".into());
    store.add_document(
        "Travel expenses are reimbursed within thirty days of filing a report.",
        metadata,
    )?;

    let retriever = Retriever::new(store, RetrieverConfig::default());
    let context = retriever.retrieve_and_format("how many remote days are allowed?", Some(2))?;
    println!("{context}");

    Ok(())
}
