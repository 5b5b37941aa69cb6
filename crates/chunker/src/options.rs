// ABOUTME: Chunking configuration (ChunkOptions) and the Chunker that applies it.
// ABOUTME: ChunkerBuilder provides a fluent API for budget, link length and stripped tags.

use scraper::Html;
use tracing::debug;

use crate::chunk::chunk_element;
use crate::dom::strip::{strip_elements, DEFAULT_STRIP_TAGS};
use crate::dom::text::MAX_LINK_LEN;
use crate::merge::merge_chunks;

/// Default chunk budget in characters.
pub const DEFAULT_MAX_SIZE: usize = 2000;

/// Configuration for a chunking run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkOptions {
    /// Soft ceiling on chunk length, in characters.
    pub max_size: usize,
    /// Longest href kept in a chunk's link list.
    pub max_link_len: usize,
    /// Elements removed before any text is extracted.
    pub strip_tags: Vec<String>,
}

impl ChunkOptions {
    /// Options with the given budget and default link/strip settings.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            ..Self::default()
        }
    }
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            max_link_len: MAX_LINK_LEN,
            strip_tags: DEFAULT_STRIP_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Splits HTML documents into chunks according to its options.
#[derive(Debug, Clone, Default)]
pub struct Chunker {
    opts: ChunkOptions,
}

impl Chunker {
    /// Create a new ChunkerBuilder for fluent configuration.
    pub fn builder() -> ChunkerBuilder {
        ChunkerBuilder::new()
    }

    pub fn new(opts: ChunkOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &ChunkOptions {
        &self.opts
    }

    /// Parse `raw_html`, drop the stripped tags, chunk the tree and merge.
    ///
    /// Malformed markup is recovered by the parser and never fails.
    pub fn chunk_html(&self, raw_html: &str) -> Vec<String> {
        let mut doc = Html::parse_document(raw_html);
        let removed = strip_elements(&mut doc, &self.opts.strip_tags);

        let pieces = chunk_element(doc.tree.root(), &self.opts);
        let piece_count = pieces.len();
        let merged = merge_chunks(pieces, self.opts.max_size);

        debug!(
            input_len = raw_html.len(),
            stripped = removed,
            pieces = piece_count,
            chunks = merged.len(),
            max_size = self.opts.max_size,
            "chunked html document"
        );
        merged
    }
}

/// Builder for constructing Chunker instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ChunkerBuilder {
    opts: ChunkOptions,
}

impl ChunkerBuilder {
    /// Create a new ChunkerBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: ChunkOptions::default(),
        }
    }

    /// Set the chunk budget in characters.
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.opts.max_size = max_size;
        self
    }

    /// Set the longest href that is still listed.
    pub fn max_link_len(mut self, max_link_len: usize) -> Self {
        self.opts.max_link_len = max_link_len;
        self
    }

    /// Also strip elements with this tag name.
    pub fn strip_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into().to_lowercase();
        if !self.opts.strip_tags.contains(&tag) {
            self.opts.strip_tags.push(tag);
        }
        self
    }

    /// Replace the list of stripped tags.
    pub fn strip_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opts.strip_tags = tags.into_iter().map(|t| t.into().to_lowercase()).collect();
        self
    }

    /// Build the Chunker with the configured options.
    pub fn build(self) -> Chunker {
        Chunker::new(self.opts)
    }
}
