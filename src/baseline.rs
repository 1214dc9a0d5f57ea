//! Baseline extraction.
//!
//! Last-resort extraction targeting text paragraphs and structured
//! metadata. The rules run in order and the first one clearing the
//! 100-character bar wins: JSON-LD `articleBody`, the first `<article>`
//! element, a deduplicated concatenation of quote/code/paragraph
//! elements, the whole body text, and finally the whitespace-normalized
//! full-page text.

use dom_query::Document;
use serde_json::Value;

use crate::clean::basic_cleaning;
use crate::dom;
use crate::patterns::trim_whitespace;
use crate::tree::{Node, Tag};

/// Minimum usable length for each baseline rule.
const MIN_BASELINE_LEN: usize = 100;

/// Recursively find an `articleBody` string in JSON-LD data.
fn find_article_body(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                if key.eq_ignore_ascii_case("articlebody") {
                    if let Value::String(s) = val {
                        return Some(s.clone());
                    }
                }
                if let Some(found) = find_article_body(val) {
                    return Some(found);
                }
            }
            None
        }
        Value::Array(items) => items.iter().find_map(find_article_body),
        _ => None,
    }
}

/// Extract `articleBody` from JSON-LD script tags, flattening embedded
/// markup when present.
#[must_use]
pub fn json_ld_article_body(doc: &Document) -> Option<String> {
    for script in doc.select(r#"script[type="application/ld+json"]"#).nodes() {
        let raw = dom_query::Selection::from(*script).text().trim().to_string();
        if raw.is_empty() || !raw.contains("articleBody") {
            continue;
        }
        let Ok(data) = serde_json::from_str::<Value>(&raw) else {
            continue;
        };
        if let Some(body) = find_article_body(&data) {
            let body = body.trim().to_string();
            if body.is_empty() {
                continue;
            }
            if body.contains("<p>") {
                let inner = Document::from(format!("<div>{body}</div>"));
                return Some(trim_whitespace(&dom::text_content(&inner.select("div"))));
            }
            return Some(body);
        }
    }
    None
}

/// Baseline extraction over a fresh parse of the page.
///
/// Returns the body tree and its text; the text can be empty when even
/// the last fallback finds nothing, which is a discard, not an error.
#[must_use]
pub fn baseline(doc: &Document) -> (Node, String) {
    let mut body = Node::new(Tag::Body);

    // 1. JSON-LD articleBody.
    if let Some(article_body) = json_ld_article_body(doc) {
        if article_body.chars().count() > MIN_BASELINE_LEN {
            body.append(Node::with_text(Tag::P, article_body.clone()));
            return (body, article_body);
        }
    }

    basic_cleaning(doc);

    // 2. First article element with substance.
    let mut article_text = String::new();
    for article in dom::iter_elements(&doc.select("body"), &["article", "story"]) {
        let text = trim_whitespace(&dom::text_content(&article));
        if text.chars().count() > MIN_BASELINE_LEN {
            body.append(Node::with_text(Tag::P, text.clone()));
            if article_text.is_empty() {
                article_text = text;
            } else {
                article_text.push(' ');
                article_text.push_str(&text);
            }
        }
    }
    if !body.children.is_empty() {
        return (body, article_text);
    }

    // 3. Deduplicated quote/code/paragraph scrape.
    let mut seen = std::collections::HashSet::new();
    let mut scraped = String::new();
    for element in dom::iter_elements(
        &doc.select("body"),
        &["blockquote", "code", "p", "pre", "q", "quote"],
    ) {
        if crate::selector::discard::should_discard(&element) {
            continue;
        }
        let entry = trim_whitespace(&dom::text_content(&element));
        if entry.is_empty() || seen.contains(&entry) {
            continue;
        }
        if !scraped.is_empty() {
            scraped.push(' ');
        }
        scraped.push_str(&entry);
        body.append(Node::with_text(Tag::P, entry.clone()));
        seen.insert(entry);
    }
    if scraped.chars().count() > MIN_BASELINE_LEN || !body.children.is_empty() {
        return (body, scraped);
    }

    // 4. Whole body text.
    let body_text = trim_whitespace(&dom::text_content(&doc.select("body")));
    if body_text.chars().count() > MIN_BASELINE_LEN {
        body.append(Node::with_text(Tag::P, body_text.clone()));
        return (body, body_text);
    }

    // 5. Last ditch: whitespace-normalized full page text. May well be
    // empty; an empty result is the discard signal.
    let page_text = trim_whitespace(&dom::text_content(&doc.select("html")));
    if !page_text.is_empty() {
        body.append(Node::with_text(Tag::P, page_text.clone()));
    }
    (body, page_text)
}
