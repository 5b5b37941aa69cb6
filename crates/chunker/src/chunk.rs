// ABOUTME: Depth-first element chunker that emits the largest whole-subtree texts fitting the budget.
// ABOUTME: Oversized containers are split into their direct child elements; oversized leaves pass through.

use ego_tree::NodeRef;
use scraper::Node;
use tracing::debug;

use crate::char_len;
use crate::dom::child_elements;
use crate::dom::text::TextIndex;
use crate::options::ChunkOptions;

/// Decompose a subtree into rendered chunks, in document (pre-order) order.
///
/// A subtree whose rendered text fits `max_size` becomes a single chunk and is
/// not descended into. Otherwise each direct child element is chunked in turn.
/// Elements with no visible text and no links contribute nothing.
///
/// An element without child elements whose text is still over budget cannot be
/// split further and is emitted as one oversized chunk rather than truncated.
///
/// The descent keeps its own work stack, so nesting depth is bounded by
/// memory rather than the thread's stack.
pub fn chunk_element(node: NodeRef<'_, Node>, opts: &ChunkOptions) -> Vec<String> {
    let index = TextIndex::build(node);
    let mut chunks = Vec::new();
    let mut pending = vec![node];

    while let Some(current) = pending.pop() {
        let extracted = index.extract(current, opts.max_link_len);
        if extracted.is_empty() {
            continue;
        }

        let rendered = extracted.render();
        let len = char_len(&rendered);
        if len <= opts.max_size {
            chunks.push(rendered);
            continue;
        }

        let children: Vec<_> = child_elements(current).collect();
        if children.is_empty() {
            debug!(
                len,
                max_size = opts.max_size,
                tag = element_name(current),
                "irreducible element exceeds chunk budget"
            );
            chunks.push(rendered);
            continue;
        }

        // Reversed so the first child is popped first.
        pending.extend(children.into_iter().rev());
    }

    chunks
}

fn element_name<'a>(node: NodeRef<'a, Node>) -> &'a str {
    match node.value() {
        Node::Element(el) => el.name(),
        Node::Document => "#document",
        _ => "#node",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scraper::{Html, Selector};

    fn chunks_of(html: &str, css: &str, max_size: usize) -> Vec<String> {
        let doc = Html::parse_document(html);
        let selector = Selector::parse(css).unwrap();
        let el = doc.select(&selector).next().unwrap();
        chunk_element(*el, &ChunkOptions::new(max_size))
    }

    #[test]
    fn fitting_subtree_is_one_chunk() {
        let chunks = chunks_of("<ul><li>one</li><li>two</li></ul>", "ul", 100);
        assert_eq!(chunks, vec!["onetwo\n\nLinks: ".to_string()]);
    }

    #[test]
    fn oversized_container_splits_into_children() {
        // "onetwo\n\nLinks: " is 15 chars; each item alone is 12.
        let chunks = chunks_of("<ul><li>one</li><li>two</li></ul>", "ul", 12);
        assert_eq!(
            chunks,
            vec!["one\n\nLinks: ".to_string(), "two\n\nLinks: ".to_string()]
        );
    }

    #[test]
    fn splits_only_as_deep_as_needed() {
        let html = "<div id=\"root\"><section><p>alpha</p><p>beta</p></section><p>gamma gamma gamma gamma</p></div>";
        let chunks = chunks_of(html, "#root", 20);
        assert_eq!(
            chunks,
            vec![
                "alphabeta\n\nLinks: ".to_string(),
                "gamma gamma gamma gamma\n\nLinks: ".to_string(),
            ]
        );
    }

    #[test]
    fn oversized_leaf_is_kept_whole() {
        let text = "x".repeat(50);
        let chunks = chunks_of(&format!("<p>{text}</p>"), "p", 10);
        assert_eq!(chunks, vec![format!("{text}\n\nLinks: ")]);
    }

    #[test]
    fn empty_elements_are_pruned() {
        assert!(chunks_of("<div>   \n  </div>", "div", 100).is_empty());
        assert!(chunks_of("<div><span> </span><br></div>", "div", 1).is_empty());
    }

    #[test]
    fn empty_children_are_skipped_when_splitting() {
        let chunks = chunks_of("<div><p>aaaa</p><p>  </p><p>bbbb</p></div>", "div", 13);
        assert_eq!(
            chunks,
            vec!["aaaa\n\nLinks: ".to_string(), "bbbb\n\nLinks: ".to_string()]
        );
    }

    #[test]
    fn links_travel_with_their_subtree() {
        let html = r#"<div><p><a href="/a">A</a></p><p><a href="/b">B</a></p></div>"#;
        let chunks = chunks_of(html, "div", 15);
        assert_eq!(
            chunks,
            vec!["A\n\nLinks: /a".to_string(), "B\n\nLinks: /b".to_string()]
        );
    }

    #[test]
    fn sibling_order_is_preserved() {
        let html = "<ol><li>1111</li><li>2222</li><li>3333</li><li>4444</li></ol>";
        let chunks = chunks_of(html, "ol", 13);
        let texts: Vec<&str> = chunks
            .iter()
            .map(|c| c.split("\n\n").next().unwrap())
            .collect();
        assert_eq!(texts, vec!["1111", "2222", "3333", "4444"]);
    }

    #[test]
    fn deep_nesting_does_not_exhaust_the_stack() {
        let depth = 20_000;
        let text = "x".repeat(50);
        let html = format!("{}{}{}", "<div>".repeat(depth), text, "</div>".repeat(depth));
        let doc = Html::parse_document(&html);
        let chunks = chunk_element(doc.tree.root(), &ChunkOptions::new(10));
        assert_eq!(chunks, vec![format!("{text}\n\nLinks: ")]);
    }

    #[test]
    fn deeply_wrapped_sibling_keeps_document_order() {
        let depth = 5_000;
        let html = format!(
            "<section>{}<p>first first</p>{}<p>second second</p></section>",
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        );
        let chunks = chunks_of(&html, "section", 24);
        assert_eq!(
            chunks,
            vec![
                "first first\n\nLinks: ".to_string(),
                "second second\n\nLinks: ".to_string(),
            ]
        );
    }

    #[test]
    fn document_root_can_be_chunked() {
        let doc = Html::parse_document("<title>T</title><p>body</p>");
        let chunks = chunk_element(doc.tree.root(), &ChunkOptions::new(100));
        assert_eq!(chunks, vec!["Tbody\n\nLinks: ".to_string()]);
    }
}
