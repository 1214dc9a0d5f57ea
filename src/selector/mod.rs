//! Selector infrastructure.
//!
//! Content finding and boilerplate detection are driven by ordered lists
//! of predicate rules evaluated against every element of a subtree in
//! document order. A rule is a plain function so rule sets stay compile-
//! time checked data, not string-keyed tables.

use dom_query::Selection;

pub mod comments;
pub mod content;
pub mod discard;

/// A selector rule testing whether an element matches certain criteria.
pub type Rule = fn(&Selection) -> bool;

/// First descendant (document order) for which the rule holds.
#[must_use]
pub fn query<'a>(root: &Selection<'a>, rule: Rule) -> Option<Selection<'a>> {
    for node in root.select("*").nodes() {
        let sel = Selection::from(*node);
        if rule(&sel) {
            return Some(sel);
        }
    }
    None
}

/// All descendants (document order) for which the rule holds.
#[must_use]
pub fn query_all<'a>(root: &Selection<'a>, rule: Rule) -> Vec<Selection<'a>> {
    let mut matches = Vec::new();
    for node in root.select("*").nodes() {
        let sel = Selection::from(*node);
        if rule(&sel) {
            matches.push(sel);
        }
    }
    matches
}

// === Shared helpers for rule modules ===

/// Lowercased class attribute, empty when absent.
#[must_use]
pub(crate) fn class(sel: &Selection) -> String {
    crate::dom::attr(sel, "class").unwrap_or_default().to_lowercase()
}

/// Lowercased id attribute, empty when absent.
#[must_use]
pub(crate) fn id(sel: &Selection) -> String {
    crate::dom::attr(sel, "id").unwrap_or_default().to_lowercase()
}

/// Lowercased class and id, joined.
#[must_use]
pub(crate) fn class_or_id(sel: &Selection) -> String {
    crate::dom::class_and_id(sel).to_lowercase()
}

/// Lowercased tag name, empty for non-elements.
#[must_use]
pub(crate) fn tag(sel: &Selection) -> String {
    crate::dom::tag_name(sel).unwrap_or_default()
}
