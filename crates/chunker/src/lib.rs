// ABOUTME: Library entry point for the DOM-aware HTML chunker.
// ABOUTME: Re-exports Chunker, ChunkOptions, the pipeline entry point and the chunk/merge passes.

//! Pagechunk chunker - splits HTML documents into size-bounded text chunks.
//!
//! The pipeline parses a document, drops `script`/`style`/`noscript` subtrees, walks the
//! tree emitting the largest whole-subtree texts that fit the budget, and then
//! greedily packs the undersized pieces back together.
//!
//! # Example
//!
//! ```
//! use pagechunk_chunker::chunk_and_strip_html;
//!
//! let chunks = chunk_and_strip_html("<html><body><p>hi there</p></body></html>", 200);
//! assert_eq!(chunks.len(), 1);
//! assert!(chunks[0].starts_with("hi there"));
//! ```

pub mod chunk;
pub mod dom;
pub mod merge;
pub mod options;
pub mod pipeline;

pub use crate::chunk::chunk_element;
pub use crate::dom::text::{extract_text, ExtractedText, LINKS_MARKER, MAX_LINK_LEN};
pub use crate::merge::merge_chunks;
pub use crate::options::{ChunkOptions, Chunker, ChunkerBuilder, DEFAULT_MAX_SIZE};
pub use crate::pipeline::chunk_and_strip_html;

/// Length of a string in characters, the unit every budget is measured in.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
