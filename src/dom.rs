//! DOM adapter over `dom_query`.
//!
//! Thin helpers giving the extraction pipeline a uniform vocabulary for
//! reading and pruning the parsed page. The text/tail model lives here:
//! an element's *text* is the character data before its first child
//! element, its *tail* is the character data between its closing tag and
//! the next sibling element. html5ever keeps both as separate text nodes,
//! so these are pure read operations.

pub use dom_query::{Document, NodeId, Selection};
use dom_query::NodeRef;

// === Parsing ===

/// Parse an HTML string into a document.
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Deep-copy a document by reserializing it.
#[must_use]
pub fn clone_document(doc: &Document) -> Document {
    Document::from(doc.html().to_string())
}

// === Node information ===

/// Lowercased tag name of the first node in the selection.
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes()
        .first()
        .and_then(NodeRef::node_name)
        .map(|t| t.to_lowercase())
}

/// Attribute value as an owned string.
#[inline]
#[must_use]
pub fn attr(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|v| v.to_string())
}

/// Class and id of an element joined for keyword matching.
#[must_use]
pub fn class_and_id(sel: &Selection) -> String {
    let class = attr(sel, "class").unwrap_or_default();
    let id = attr(sel, "id").unwrap_or_default();
    if class.is_empty() {
        id
    } else if id.is_empty() {
        class
    } else {
        format!("{class} {id}")
    }
}

/// All attributes of the first node as key/value pairs.
#[must_use]
pub fn attributes(sel: &Selection) -> Vec<(String, String)> {
    sel.nodes()
        .first()
        .map(|node| {
            node.attrs()
                .iter()
                .map(|a| (a.name.local.to_string(), a.value.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

/// Whether the element is a void element (no children possible).
#[must_use]
pub fn is_void_element(sel: &Selection) -> bool {
    const VOID_ELEMENTS: &[&str] = &[
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
        "source", "track", "wbr",
    ];
    tag_name(sel).is_some_and(|t| VOID_ELEMENTS.contains(&t.as_str()))
}

// === Text reading ===

/// Full descendant text of the selection.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> String {
    sel.text().to_string()
}

/// Character count of the trimmed descendant text.
#[must_use]
pub fn text_len(sel: &Selection) -> usize {
    sel.text().trim().chars().count()
}

/// Element text: character data before the first child element.
#[must_use]
pub fn element_text(sel: &Selection) -> String {
    let Some(node) = sel.nodes().first() else {
        return String::new();
    };
    let mut out = String::new();
    for child in node.children() {
        if child.is_element() {
            break;
        }
        if child.is_text() {
            out.push_str(&child.text());
        }
    }
    out
}

/// Element tail: character data between this element's closing tag and
/// the next sibling element.
#[must_use]
pub fn element_tail(sel: &Selection) -> String {
    let Some(node) = sel.nodes().first() else {
        return String::new();
    };
    let mut out = String::new();
    let mut sibling = node.next_sibling();
    while let Some(s) = sibling {
        if s.is_element() {
            break;
        }
        if s.is_text() {
            out.push_str(&s.text());
        }
        sibling = s.next_sibling();
    }
    out
}

// === Navigation ===

/// Direct element children.
#[inline]
#[must_use]
pub fn children<'a>(sel: &Selection<'a>) -> Selection<'a> {
    sel.children()
}

/// Parent element.
#[inline]
#[must_use]
pub fn parent<'a>(sel: &Selection<'a>) -> Selection<'a> {
    sel.parent()
}

/// Next sibling element, skipping text nodes.
#[must_use]
pub fn next_element_sibling<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    sel.nodes().first().and_then(|node| {
        let mut sibling = node.next_sibling();
        while let Some(s) = sibling {
            if s.is_element() {
                return Some(Selection::from(s));
            }
            sibling = s.next_sibling();
        }
        None
    })
}

/// Previous sibling element, skipping text nodes.
#[must_use]
pub fn previous_element_sibling<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    sel.nodes().first().and_then(|node| {
        let mut sibling = node.prev_sibling();
        while let Some(s) = sibling {
            if s.is_element() {
                return Some(Selection::from(s));
            }
            sibling = s.prev_sibling();
        }
        None
    })
}

/// Descendant elements of the selection matching one of the given tag
/// names, in document order. With an empty list, every descendant
/// element is returned.
#[must_use]
pub fn iter_elements<'a>(sel: &Selection<'a>, tags: &[&str]) -> Vec<Selection<'a>> {
    let mut out = Vec::new();
    for root in sel.nodes() {
        for node in root.descendants() {
            if !node.is_element() {
                continue;
            }
            if tags.is_empty() {
                out.push(Selection::from(node));
                continue;
            }
            if let Some(name) = node.node_name() {
                if tags.iter().any(|t| name.eq_ignore_ascii_case(t)) {
                    out.push(Selection::from(node));
                }
            }
        }
    }
    out
}

// === Mutation ===

/// Remove the selected elements (subtree removal; trailing text nodes
/// survive as they are siblings, not children).
#[inline]
pub fn remove(sel: &Selection) {
    sel.remove();
}

/// Remove matching descendant tags while keeping their children.
#[inline]
pub fn strip_tags(sel: &Selection, tags: &[&str]) {
    sel.strip_elements(tags);
}

/// Rename the selected element.
#[inline]
pub fn rename(sel: &Selection, new_tag: &str) {
    sel.rename(new_tag);
}

/// Set an attribute on the selected element.
#[inline]
pub fn set_attr(sel: &Selection, name: &str, value: &str) {
    sel.set_attr(name, value);
}
