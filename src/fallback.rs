//! Fallback comparison engine.
//!
//! When the primary pass is done (and `fast` is off), the readability
//! scorer runs on an unmodified copy of the page and the two results are
//! compared: the longer extraction wins, with structural tie-breakers for
//! the borderline cases. The baseline extractor is wired in by the
//! orchestrator as the true last resort.

use dom_query::Document;

use crate::dom;
use crate::extractor::pruning::prune_unwanted_nodes;
use crate::extractor::{handle_text_elem, ExtractionState};
use crate::options::ExtractorOptions;
use crate::readability;
use crate::selector::discard;
use crate::tree::{Node, Tag};

/// Convert a readability HTML fragment into the canonical tree through
/// the regular handlers, with generic containers admitted.
#[must_use]
pub fn convert_fragment(html: &str, options: &ExtractorOptions) -> (Node, String) {
    let doc = Document::from(format!("<html><body>{html}</body></html>"));
    let mut state = ExtractionState::new(options);
    state.add_potential_tag("div");

    let region = doc.select("body");
    let mut body = Node::new(Tag::Body);
    for element in dom::iter_elements(&region, &[]) {
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

/// Structure counts used by the comparison heuristics.
fn count_tags(node: &Node, tag: Tag) -> usize {
    let own = usize::from(node.tag == tag);
    own + node
        .children
        .iter()
        .map(|c| count_tags(c, tag))
        .sum::<usize>()
}

fn paragraph_text_len(node: &Node) -> usize {
    let own = if node.tag == Tag::P {
        node.iter_text(" ").chars().count()
    } else {
        0
    };
    own + node
        .children
        .iter()
        .map(paragraph_text_len)
        .sum::<usize>()
}

/// Decide between the primary extraction and the readability candidate.
///
/// The core rule: the strictly longer extraction wins. The borderline
/// cases fall to structural signals - a primary result with no paragraph
/// text or more tables than paragraphs concedes to a substantial
/// candidate, and recall mode concedes to a candidate that found
/// headings the primary pass missed.
#[must_use]
pub fn compare_extraction(
    backup: &Document,
    body: Node,
    text: String,
    options: &ExtractorOptions,
) -> (Node, String) {
    let len_text = text.chars().count();

    // Bypass for recall with plenty of content already.
    if options.favor_recall() && len_text > options.min_extracted_size * 10 {
        return (body, text);
    }

    // Prior cleaning in precision mode only.
    let source_html = if options.favor_precision() {
        let pruned = prune_unwanted_nodes(&backup.select("body"), discard::OVERALL_DISCARD, true);
        pruned.html().to_string()
    } else {
        backup.html().to_string()
    };

    let Some((candidate_html, candidate_text)) = readability::try_readability(&source_html)
    else {
        return (body, text);
    };
    let len_algo = candidate_text.chars().count();
    log::debug!("extracted length: {len_algo} (algorithm) {len_text} (extraction)");

    let min_size = options.min_extracted_size;
    let use_readability = if len_algo == 0 || len_algo == len_text {
        false
    } else if len_text == 0 {
        true
    } else if len_text > 2 * len_algo {
        false
    } else if len_algo > 2 * len_text {
        true
    } else if paragraph_text_len(&body) == 0 && len_algo > min_size * 2 {
        true
    } else if count_tags(&body, Tag::Table) > count_tags(&body, Tag::P)
        && len_algo > min_size * 2
    {
        true
    } else if options.favor_recall()
        && count_tags(&body, Tag::Head) == 0
        && len_algo > len_text
        && candidate_html.contains("<h")
    {
        true
    } else {
        false
    };

    if use_readability {
        log::debug!("using generic algorithm result");
        let (converted, converted_text) = convert_fragment(&candidate_html, options);
        if !converted_text.is_empty() {
            return (converted, converted_text);
        }
    }

    (body, text)
}
