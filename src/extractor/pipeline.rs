//! Main content extraction pipeline.
//!
//! Walks the content-rule cascade over the cleaned document, prunes the
//! selected region, dispatches every remaining element to its handler and
//! assembles the canonical body tree. Falls back to a whole-document
//! recovery scan when the cascade comes up short.

use dom_query::{Document, Selection};

use crate::dom;
use crate::options::ExtractorOptions;
use crate::selector::{self, content::CONTENT_RULES};
use crate::tree::{Node, Tag};

use super::handlers::{
    handle_formatting, handle_image, handle_lists, handle_other_elements, handle_paragraphs,
    handle_quotes, handle_table, handle_titles, hi_rend, is_break_tag, is_heading_tag,
    is_list_tag, is_quote_tag,
};
use super::pruning::{prune_unwanted_sections, strip_non_potential_tags};
use super::state::ExtractionState;

/// Route an element to the handler for its tag kind.
#[must_use]
pub fn handle_text_elem(
    element: &Selection,
    state: &mut ExtractionState,
    options: &ExtractorOptions,
) -> Option<Node> {
    let tag = dom::tag_name(element).unwrap_or_default();

    if is_list_tag(&tag) {
        handle_lists(element, state, options)
    } else if is_quote_tag(&tag) || tag == "code" {
        handle_quotes(element, state, options)
    } else if is_heading_tag(&tag) {
        handle_titles(element, state, options)
    } else if tag == "p" {
        handle_paragraphs(element, state, options)
    } else if is_break_tag(&tag) {
        // A line break whose tail carries text yields a paragraph.
        let tail = crate::patterns::trim_whitespace(&dom::element_tail(element));
        if super::handlers::usable_text(&tail) {
            Some(Node::with_text(Tag::P, tail))
        } else {
            None
        }
    } else if hi_rend(&tag).is_some() || matches!(tag.as_str(), "del" | "s" | "strike" | "span" | "a")
    {
        handle_formatting(element, state, options)
    } else if tag == "table" {
        if state.is_potential_tag("table") {
            handle_table(element, state, options)
        } else {
            None
        }
    } else if tag == "img" {
        if state.is_potential_tag("img") {
            handle_image(element)
        } else {
            None
        }
    } else {
        handle_other_elements(element, state, options)
    }
}

/// Combined paragraph text of a region, used to judge whether the tag
/// vocabulary needs widening.
fn paragraph_text_len(doc: &Document) -> usize {
    doc.select("p")
        .nodes()
        .iter()
        .map(|n| Selection::from(*n).text().trim().chars().count())
        .sum()
}

/// Extract the main content of a page through the selector cascade.
///
/// The document must already be cleaned; the cascade itself never
/// mutates it (all pruning happens on isolated clones), so the recovery
/// scan can reuse it directly.
///
/// Returns the canonical body tree and its flattened text.
#[must_use]
pub fn extract_content(doc: &Document, options: &ExtractorOptions) -> (Node, String) {
    let mut body = Node::new(Tag::Body);

    for (rule_index, rule) in CONTENT_RULES.iter().enumerate() {
        let Some(sub_tree) = selector::query(&doc.select("body"), *rule) else {
            continue;
        };

        // Each pruned region is its own document with its own node ids,
        // so the consumed-node tracking starts fresh per rule, and each
        // rule builds its own candidate body - regions overlap, so
        // accumulating across rules would duplicate content.
        let mut state = ExtractionState::new(options);
        let mut candidate = Node::new(Tag::Body);

        let pruned = prune_unwanted_sections(&sub_tree, state.potential_tags(), options);
        let region = pruned.select("body");
        if dom::children(&region).is_empty() {
            continue;
        }

        // Widen the vocabulary when the region is paragraph-poor.
        let factor = if options.favor_precision() { 1 } else { 3 };
        if paragraph_text_len(&pruned) < options.min_extracted_size * factor {
            state.add_potential_tag("div");
        }

        strip_non_potential_tags(&region, state.potential_tags());

        log::debug!("content rule {rule_index} selected a region");

        for element in dom::iter_elements(&region, &[]) {
            let Some(node) = element.nodes().first().copied() else {
                continue;
            };
            if state.is_done(node.id) {
                continue;
            }
            if let Some(processed) = handle_text_elem(&element, &mut state, options) {
                candidate.append(processed);
            }
            state.mark_done(node.id);
        }

        // Trailing headings and stray links do not end an article.
        while candidate
            .children
            .last()
            .is_some_and(|c| matches!(c.tag, Tag::Head | Tag::Ref))
        {
            candidate.children.pop();
        }

        if candidate.children.len() > 1 {
            body = candidate;
            break;
        }
        // A thin region may still beat an earlier thin one.
        if candidate.iter_text(" ").chars().count() > body.iter_text(" ").chars().count() {
            body = candidate;
        }
    }

    let text = body.iter_text(" ");
    if body.children.is_empty() || text.chars().count() < options.min_extracted_size {
        let (wild_body, wild_text) = recover_wild_text(doc, options);
        if wild_text.chars().count() > text.chars().count() {
            log::debug!("recovery scan beat the selector cascade");
            return (wild_body, wild_text);
        }
    }

    (body, text)
}

/// Recovery scan: walk the whole document (ignoring region boundaries)
/// for paragraph-like elements. In recall mode the net widens to generic
/// containers, line breaks and lists.
#[must_use]
pub fn recover_wild_text(doc: &Document, options: &ExtractorOptions) -> (Node, String) {
    let mut state = ExtractionState::new(options);
    let mut tags: Vec<&str> = vec![
        "blockquote", "pre", "q", "code", "p", "table",
    ];

    if options.favor_recall() {
        state.add_potential_tag("div");
        state.add_potential_tag("br");
        state.add_potential_tag("hr");
        tags.extend(["div", "br", "hr", "ul", "ol", "dl"]);
    }

    let pruned = prune_unwanted_sections(&doc.select("body"), state.potential_tags(), options);
    let region = pruned.select("body");
    strip_non_potential_tags(&region, state.potential_tags());

    let mut body = Node::new(Tag::Body);
    for element in dom::iter_elements(&region, &tags) {
        let Some(node) = element.nodes().first().copied() else {
            continue;
        };
        if state.is_done(node.id) {
            continue;
        }
        if let Some(processed) = handle_text_elem(&element, &mut state, options) {
            body.append(processed);
        }
        state.mark_done(node.id);
    }

    let text = body.iter_text(" ");
    (body, text)
}
