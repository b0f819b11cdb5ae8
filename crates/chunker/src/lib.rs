//! # Ragcore Chunker
//!
//! Recursive character splitting for retrieval-augmented generation.
//!
//! ## Philosophy
//!
//! The splitter produces bounded, overlapping text fragments that:
//! - Cover the source text from start to end with no gaps
//! - Carry a fixed amount of trailing context into the next chunk
//! - Break on natural boundaries (paragraph, line, sentence, word) before
//!   resorting to hard character cuts
//!
//! ## Example
//!
//! ```rust
//! use ragcore_chunker::{SplitterConfig, TextSplitter};
//!
//! let splitter = TextSplitter::new(SplitterConfig::new(100, 20)).unwrap();
//! for chunk in splitter.split("some long document text...") {
//!     println!("{} chars", chunk.chars().count());
//! }
//! ```

mod config;
mod error;
mod splitter;

pub use config::SplitterConfig;
pub use error::{ChunkerError, Result};
pub use splitter::{SplitIter, TextSplitter};
