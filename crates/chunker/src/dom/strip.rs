// ABOUTME: Removal of non-content subtrees (script, style, noscript) from a parsed document.
// ABOUTME: Detaches matching elements in place so later text extraction never sees them.

use ego_tree::NodeId;
use scraper::{Html, Node};

/// Tags whose contents are never page text.
pub const DEFAULT_STRIP_TAGS: &[&str] = &["script", "style", "noscript"];

/// Detach every element whose tag name is in `tags`, including its subtree.
///
/// Returns the number of subtrees removed. Tag names compare
/// case-insensitively; the parser already lowercases HTML tag names.
pub fn strip_elements<S: AsRef<str>>(doc: &mut Html, tags: &[S]) -> usize {
    let doomed: Vec<NodeId> = doc
        .tree
        .root()
        .descendants()
        .filter(|node| match node.value() {
            Node::Element(el) => tags
                .iter()
                .any(|tag| el.name().eq_ignore_ascii_case(tag.as_ref())),
            _ => false,
        })
        .map(|node| node.id())
        .collect();

    for id in &doomed {
        if let Some(mut node) = doc.tree.get_mut(*id) {
            node.detach();
        }
    }
    doomed.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::text::raw_text;

    #[test]
    fn removes_scripts_and_styles() {
        let mut doc = Html::parse_document(
            "<html><head><style>p { color: red }</style><script>var x = 1;</script></head>\
             <body><p>kept</p><script>alert('no')</script></body></html>",
        );
        let removed = strip_elements(&mut doc, DEFAULT_STRIP_TAGS);
        assert_eq!(removed, 3);
        assert_eq!(raw_text(doc.tree.root()), "kept");
    }

    #[test]
    fn noscript_fallbacks_are_removed() {
        let mut doc = Html::parse_document(
            r#"<body><noscript><img src="/pixel.gif"> Enable JavaScript</noscript><p>kept</p></body>"#,
        );
        assert_eq!(strip_elements(&mut doc, DEFAULT_STRIP_TAGS), 1);
        assert_eq!(raw_text(doc.tree.root()), "kept");
    }

    #[test]
    fn custom_tag_list() {
        let mut doc = Html::parse_document("<body><nav>menu</nav><p>body</p></body>");
        strip_elements(&mut doc, &["NAV"]);
        assert_eq!(raw_text(doc.tree.root()), "body");
    }

    #[test]
    fn nothing_to_strip() {
        let mut doc = Html::parse_document("<p>plain</p>");
        assert_eq!(strip_elements(&mut doc, DEFAULT_STRIP_TAGS), 0);
        assert_eq!(raw_text(doc.tree.root()), "plain");
    }
}
