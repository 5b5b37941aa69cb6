// ABOUTME: End-to-end HTML chunking: parse, strip non-content elements, chunk the tree, merge.
// ABOUTME: Free-function entry point using default link and strip settings.

use crate::options::{ChunkOptions, Chunker};

/// Split `raw_html` into chunks of at most `max_size` characters.
///
/// `script`, `style` and `noscript` subtrees are removed first. Chunks follow document
/// order; the only chunks over budget are single leaf elements whose own text
/// is already larger than `max_size`.
pub fn chunk_and_strip_html(raw_html: &str, max_size: usize) -> Vec<String> {
    Chunker::new(ChunkOptions::new(max_size)).chunk_html(raw_html)
}
