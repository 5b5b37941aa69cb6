// ABOUTME: Visible-text and hyperlink extraction for a DOM subtree.
// ABOUTME: Normalizes layout whitespace and appends a de-duplicated list of short link targets.

use std::collections::{HashMap, HashSet};
use std::fmt;

use ego_tree::iter::Edge;
use ego_tree::{NodeId, NodeRef};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Node;

use crate::char_len;

/// Longest href (in characters) that is still listed after the text.
pub const MAX_LINK_LEN: usize = 120;

/// Label that introduces the link section of an extracted text.
pub const LINKS_MARKER: &str = "Links:";

// Two or more spaces only ever separate layout columns, never words.
static LAYOUT_GAP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Text and links pulled out of one element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedText {
    /// Normalized visible text, one fragment per line.
    pub text: String,
    /// Unique href values no longer than the link limit, in first-seen order.
    pub links: Vec<String>,
}

impl ExtractedText {
    /// True when the element has neither visible text nor eligible links.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.links.is_empty()
    }

    /// Render as `<text>\n\nLinks: <link> <link> ...`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ExtractedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n\n{} {}", self.text, LINKS_MARKER, self.links.join(" "))
    }
}

/// Extract the normalized text and short links of a subtree.
pub fn extract_text(node: NodeRef<'_, Node>, max_link_len: usize) -> ExtractedText {
    TextIndex::build(node).extract(node, max_link_len)
}

/// Concatenate every text node below `node`, in document order.
///
/// Comments, doctypes and attribute values never contribute.
pub fn raw_text(node: NodeRef<'_, Node>) -> String {
    TextIndex::build(node).raw_text(node).to_string()
}

/// Collect the unique `href` targets of anchors below `node`.
///
/// The node itself is not inspected, only its descendants. Targets longer
/// than `max_link_len` characters are dropped.
pub fn collect_links(node: NodeRef<'_, Node>, max_link_len: usize) -> Vec<String> {
    TextIndex::build(node).links(node, max_link_len)
}

#[derive(Debug, Clone, Copy)]
struct Span {
    text_start: usize,
    text_end: usize,
    href_start: usize,
    href_end: usize,
}

/// Text and anchor targets of a subtree, gathered in one document-order pass.
///
/// The text nodes and anchors below any node form a contiguous run in
/// document order, so each node only records where its run starts and ends.
/// Queries for nodes outside the indexed subtree return nothing.
#[derive(Debug)]
pub struct TextIndex<'a> {
    text: String,
    hrefs: Vec<&'a str>,
    spans: HashMap<NodeId, Span>,
}

impl<'a> TextIndex<'a> {
    pub fn build(root: NodeRef<'a, Node>) -> Self {
        let mut text = String::new();
        let mut hrefs = Vec::new();
        let mut spans = HashMap::new();
        let mut open: Vec<(usize, usize)> = Vec::new();

        for edge in root.traverse() {
            match edge {
                Edge::Open(node) => {
                    let text_start = text.len();
                    match node.value() {
                        Node::Text(t) => text.push_str(&**t),
                        Node::Element(el) if el.name() == "a" => {
                            // An anchor's own href belongs to its ancestors only.
                            if let Some(href) = el.attr("href") {
                                hrefs.push(href);
                            }
                        }
                        _ => {}
                    }
                    open.push((text_start, hrefs.len()));
                }
                Edge::Close(node) => {
                    let (text_start, href_start) = open.pop().unwrap_or_default();
                    spans.insert(
                        node.id(),
                        Span {
                            text_start,
                            text_end: text.len(),
                            href_start,
                            href_end: hrefs.len(),
                        },
                    );
                }
            }
        }

        Self { text, hrefs, spans }
    }

    /// Raw (unnormalized) text of `node`'s subtree.
    pub fn raw_text(&self, node: NodeRef<'_, Node>) -> &str {
        self.spans
            .get(&node.id())
            .map_or("", |span| &self.text[span.text_start..span.text_end])
    }

    /// Unique short link targets below `node`, in first-seen order.
    pub fn links(&self, node: NodeRef<'_, Node>, max_link_len: usize) -> Vec<String> {
        let Some(span) = self.spans.get(&node.id()) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        let mut links = Vec::new();
        for &href in &self.hrefs[span.href_start..span.href_end] {
            if char_len(href) > max_link_len {
                continue;
            }
            if seen.insert(href) {
                links.push(href.to_string());
            }
        }
        links
    }

    pub fn extract(&self, node: NodeRef<'_, Node>, max_link_len: usize) -> ExtractedText {
        ExtractedText {
            text: normalize_text(self.raw_text(node)),
            links: self.links(node, max_link_len),
        }
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Strip layout whitespace from raw element text.
///
/// Each line is trimmed and further split on runs of two or more spaces;
/// the non-empty fragments are joined with `\n`.
pub fn normalize_text(raw: &str) -> String {
    let mut fragments: Vec<&str> = Vec::new();
    for line in raw.split(is_line_break) {
        for phrase in LAYOUT_GAP_RE.split(line.trim()) {
            let phrase = phrase.trim();
            if !phrase.is_empty() {
                fragments.push(phrase);
            }
        }
    }
    fragments.join("\n")
}
