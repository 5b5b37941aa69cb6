// ABOUTME: DOM helpers for the chunker built on scraper's HTML document tree.
// ABOUTME: Groups visible-text/link extraction and removal of non-content subtrees.

//! DOM utilities for chunking.
//!
//! `text` turns a subtree into normalized text plus its short hyperlinks,
//! `strip` removes subtrees (scripts, styles) that must never reach a chunk.

pub mod strip;
pub mod text;

use ego_tree::NodeRef;
use scraper::Node;

/// Iterate the direct child elements of a node, skipping text and comments.
pub fn child_elements<'a>(node: NodeRef<'a, Node>) -> impl Iterator<Item = NodeRef<'a, Node>> {
    node.children().filter(|child| child.value().is_element())
}
