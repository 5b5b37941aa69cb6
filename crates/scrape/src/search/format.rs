// ABOUTME: Normalizes search backend JSON into human-readable snippet text.
// ABOUTME: Two renderings: answer-first (joined by blank lines) and a flat digest (joined by spaces).

use serde_json::Value;

/// Fallback text for the answer-first rendering.
pub const NO_RESULTS: &str = "No good results found";
/// Fallback text for the digest rendering.
pub const NO_DIGEST_RESULTS: &str = "No good search result was found";

/// How a search response is turned into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnippetStyle {
    /// Answer box first, then knowledge graph, then results. Memoized per query.
    #[default]
    Answer,
    /// Knowledge graph, results, related questions and searches in one line.
    Digest,
}

impl From<&str> for SnippetStyle {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "digest" => SnippetStyle::Digest,
            _ => SnippetStyle::Answer,
        }
    }
}

/// Render `results` in the given style, reading up to `k` entries under `result_key`.
pub fn format_results(results: &Value, style: SnippetStyle, result_key: &str, k: usize) -> String {
    match style {
        SnippetStyle::Answer => format_answer(results, result_key, k),
        SnippetStyle::Digest => format_digest(results, result_key, k),
    }
}

/// Value present and not null, false, zero, or empty.
fn truthy(value: Option<&Value>) -> Option<&Value> {
    let value = value?;
    let keep = match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    };
    keep.then_some(value)
}

/// Render a scalar the way it reads in prose: strings unquoted, null as empty.
fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn entries<'a>(results: &'a Value, key: &str, k: usize) -> impl Iterator<Item = &'a Value> {
    results
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .take(k)
}

fn attributes(value: &Value) -> impl Iterator<Item = (&String, &Value)> {
    value
        .get("attributes")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
}

fn answer_box(results: &Value) -> Option<String> {
    let answer_box = truthy(results.get("answerBox"))?;
    if let Some(answer) = truthy(answer_box.get("answer")) {
        return Some(text(Some(answer)));
    }
    if let Some(snippet) = truthy(answer_box.get("snippet")) {
        return Some(text(Some(snippet)).replace('\n', " "));
    }
    if let Some(highlighted) = truthy(answer_box.get("snippetHighlighted")) {
        return Some(match highlighted {
            Value::Array(parts) => parts
                .iter()
                .map(|p| text(Some(p)))
                .collect::<Vec<_>>()
                .join(", "),
            other => text(Some(other)),
        });
    }
    None
}

/// Answer-first rendering.
///
/// A usable answer box is returned on its own. Otherwise the knowledge graph
/// summary and attributes come first, followed by each result that carries a
/// snippet as `<title>: <snippet> (link <url>)`.
pub fn format_answer(results: &Value, result_key: &str, k: usize) -> String {
    if let Some(answer) = answer_box(results) {
        return answer;
    }

    let mut snippets = Vec::new();

    if let Some(kg) = truthy(results.get("knowledgeGraph")) {
        let title = text(kg.get("title"));
        if let Some(entity_type) = truthy(kg.get("type")) {
            snippets.push(format!("{}: {}.", title, text(Some(entity_type))));
        }
        if let Some(description) = truthy(kg.get("description")) {
            snippets.push(text(Some(description)));
        }
        for (attribute, value) in attributes(kg) {
            snippets.push(format!("{} {}: {}.", title, attribute, text(Some(value))));
        }
    }

    for result in entries(results, result_key, k) {
        let title = text(result.get("title"));
        if result.get("snippet").is_some() {
            snippets.push(format!(
                "{}: {} (link {})",
                title,
                text(result.get("snippet")),
                text(result.get("link"))
            ));
        }
        for (attribute, value) in attributes(result) {
            snippets.push(format!("{}: {} = {}.", title, attribute, text(Some(value))));
        }
    }

    if snippets.is_empty() {
        return NO_RESULTS.to_string();
    }
    snippets.join("\n\n")
}

/// Flat digest rendering, every snippet joined by a single space.
pub fn format_digest(results: &Value, result_key: &str, k: usize) -> String {
    let mut snippets = Vec::new();

    if let Some(kg) = truthy(results.get("knowledgeGraph")) {
        snippets.push(format!(
            "Knowledge Graph: {} ({}) - {}",
            text(kg.get("title")),
            text(kg.get("type")),
            text(kg.get("description"))
        ));
        for (attribute, value) in attributes(kg) {
            snippets.push(format!("{}: {}", attribute, text(Some(value))));
        }
    }

    for result in entries(results, result_key, k) {
        if let Some(snippet) = truthy(result.get("snippet")) {
            snippets.push(text(Some(snippet)));
        }
        if let Some(title) = truthy(result.get("title")) {
            snippets.push(format!("Title: {}", text(Some(title))));
        }
        if let Some(link) = truthy(result.get("link")) {
            snippets.push(format!("URL: {}", text(Some(link))));
        }
    }

    for item in entries(results, "peopleAlsoAsk", usize::MAX) {
        snippets.push(format!(
            "People Also Ask: {} - {}",
            text(item.get("question")),
            text(item.get("snippet"))
        ));
    }

    for item in entries(results, "relatedSearches", usize::MAX) {
        snippets.push(format!("Related Search: {}", text(item.get("query"))));
    }

    if snippets.is_empty() {
        return NO_DIGEST_RESULTS.to_string();
    }
    snippets.join(" ")
}
