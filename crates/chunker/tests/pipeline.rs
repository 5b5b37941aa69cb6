// ABOUTME: Integration tests for the full chunking pipeline on realistic pages.
// ABOUTME: Checks size contract, document order, link handling and merge idempotence.

use pagechunk_chunker::{char_len, chunk_and_strip_html, merge_chunks, Chunker, LINKS_MARKER};
use pretty_assertions::assert_eq;

fn profile_page(sections: usize) -> String {
    let mut body = String::new();
    for i in 1..=sections {
        body.push_str(&format!(
            r#"<section><h2>Section {i}</h2>
<p>Paragraph {i} describes the account history in plain words.</p>
<ul><li><a href="https://example.test/s{i}/a">first link</a></li>
<li><a href="https://example.test/s{i}/b">second link</a></li></ul></section>
"#
        ));
    }
    format!(
        r#"<!DOCTYPE html>
<html><head><title>Profile</title><style>.x {{ color: red }}</style>
<script>window.tracking = "do not index";</script></head>
<body><nav><a href="/">Home</a>  <a href="/about">About</a></nav>
<main>{body}</main>
<footer>Copyright</footer></body></html>"#
    )
}

#[test]
fn every_chunk_respects_the_budget() {
    let html = profile_page(8);
    let max_size = 300;
    let chunks = chunk_and_strip_html(&html, max_size);

    assert!(chunks.len() > 1, "page should not fit one chunk");
    for chunk in &chunks {
        assert!(
            char_len(chunk) <= max_size,
            "chunk over budget ({}): {:?}",
            char_len(chunk),
            chunk
        );
    }
}

#[test]
fn chunks_follow_document_order() {
    let html = profile_page(8);
    let joined = chunk_and_strip_html(&html, 250).concat();

    let mut last = 0;
    for i in 1..=8 {
        let pos = joined
            .find(&format!("Section {i}"))
            .unwrap_or_else(|| panic!("Section {i} missing"));
        assert!(pos >= last, "Section {i} out of order");
        last = pos;
    }
    assert!(joined.find("Home").unwrap() < joined.find("Section 1").unwrap());
    assert!(joined.find("Copyright").unwrap() > last);
}

#[test]
fn scripts_and_styles_are_removed() {
    let joined = chunk_and_strip_html(&profile_page(3), 200).concat();
    assert!(!joined.contains("tracking"));
    assert!(!joined.contains("color: red"));
}

#[test]
fn links_are_listed_after_text() {
    let chunks = chunk_and_strip_html(&profile_page(1), 10_000);
    assert_eq!(chunks.len(), 1);
    let (text, links) = chunks[0]
        .split_once(&format!("\n\n{LINKS_MARKER} "))
        .unwrap();
    assert!(text.starts_with("Profile"));
    let links: Vec<&str> = links.split(' ').collect();
    assert_eq!(
        links,
        vec![
            "/",
            "/about",
            "https://example.test/s1/a",
            "https://example.test/s1/b",
        ]
    );
}

#[test]
fn long_links_are_dropped() {
    let long = format!("https://example.test/{}", "q".repeat(150));
    let html = format!(r#"<p><a href="{long}">far</a><a href="/near">near</a></p>"#);
    let chunks = chunk_and_strip_html(&html, 1000);
    assert_eq!(chunks, vec!["farnear\n\nLinks: /near".to_string()]);
}

#[test]
fn irreducible_leaf_is_the_only_oversized_chunk() {
    let essay = "word ".repeat(100);
    let html = format!(
        "<body><div><p>short intro</p><p>{essay}</p><p>short outro</p></div></body>"
    );
    let max_size = 80;
    let chunks = chunk_and_strip_html(&html, max_size);

    let oversized: Vec<&String> = chunks.iter().filter(|c| char_len(c) > max_size).collect();
    assert_eq!(oversized.len(), 1);
    assert!(oversized[0].starts_with("word word"));
    assert_eq!(chunks.first().unwrap(), "short intro\n\nLinks: ");
    assert_eq!(chunks.last().unwrap(), "short outro\n\nLinks: ");
}

#[test]
fn zero_budget_emits_every_leaf_alone() {
    let chunks = chunk_and_strip_html("<ul><li>a</li><li>b</li></ul>", 0);
    assert_eq!(
        chunks,
        vec!["a\n\nLinks: ".to_string(), "b\n\nLinks: ".to_string()]
    );
}

#[test]
fn merged_output_is_stable_under_remerge() {
    let max_size = 220;
    let chunks = chunk_and_strip_html(&profile_page(6), max_size);
    assert_eq!(merge_chunks(chunks.clone(), max_size), chunks);
}

#[test]
fn malformed_markup_is_recovered() {
    let chunks = chunk_and_strip_html("<div><p>unclosed <b>bold<p>next</div></span>", 1000);
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].starts_with("unclosed boldnext"));
}

#[test]
fn custom_chunker_strips_navigation() {
    let chunker = Chunker::builder().max_size(10_000).strip_tag("nav").build();
    let chunks = chunker.chunk_html(&profile_page(1));
    assert!(!chunks[0].contains("Home"));
    assert!(!chunks[0].contains("/about"));
}

#[test]
fn deeply_nested_page_is_chunked() {
    let depth = 20_000;
    let text = "x".repeat(50);
    let html = format!("{}{}{}", "<div>".repeat(depth), text, "</div>".repeat(depth));
    let chunks = chunk_and_strip_html(&html, 10);
    assert_eq!(chunks, vec![format!("{text}\n\n{LINKS_MARKER} ")]);
}

#[test]
fn noscript_fallback_markup_never_leaks() {
    let html = r#"<body><noscript><iframe src="https://www.googletagmanager.com/ns.html?id=GTM-X" height="0"></iframe></noscript><p>Article</p></body>"#;
    let chunks = chunk_and_strip_html(html, 2000);
    assert_eq!(chunks, vec!["Article\n\nLinks: ".to_string()]);
}
