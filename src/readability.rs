//! Readability-style node scoring.
//!
//! An independent extraction algorithm over the raw DOM, used only as a
//! fallback candidate for comparison against the primary pipeline. The
//! approach is the classic arc90 one: remove unlikely candidates, promote
//! misused divs to paragraphs, score paragraph containers by comma count
//! and length with class/id bonuses, scale by link density, then gather
//! the best candidate and its qualifying siblings and sanitize the
//! result.

use std::collections::HashMap;

use dom_query::{Document, NodeId, Selection};

use crate::dom;
use crate::patterns::{
    trim_whitespace, DIV_TO_P_BLOCKERS, DOT_SPACE, NEGATIVE_HINT, OK_MAYBE_CANDIDATE,
    POSITIVE_HINT, UNLIKELY_CANDIDATES, VIDEO_EMBED,
};

/// Paragraphs shorter than this do not feed the scoring pass.
const MIN_TEXT_LENGTH: usize = 25;

/// Results below this length trigger a retry with lenient cleaning.
const RETRY_LENGTH: usize = 250;

/// A scored node: the score plus an index into the DOM arena. The DOM
/// stays owned by the document; candidates never own nodes.
struct Candidate {
    score: f64,
}

type Candidates = HashMap<NodeId, Candidate>;

/// Run the scorer over (a copy of) the page and return the article
/// fragment as serialized HTML plus its flattened text.
#[must_use]
pub fn try_readability(html: &str) -> Option<(String, String)> {
    // Ruthless pass first; if it strips too much, retry leniently.
    for ruthless in [true, false] {
        let doc = Document::from(html);
        doc.select("script, style, noscript").remove();

        if ruthless {
            remove_unlikely_candidates(&doc);
        }
        transform_misused_divs(&doc);

        let candidates = score_paragraphs(&doc);
        let Some(best) = select_best_candidate(&candidates, &doc) else {
            continue;
        };

        let article_html = gather_article(&doc, best, &candidates);
        let article_doc = Document::from(format!(
            "<html><body>{article_html}</body></html>"
        ));
        sanitize(&article_doc);

        let text = trim_whitespace(&dom::text_content(&article_doc.select("body")));
        if ruthless && text.chars().count() < RETRY_LENGTH {
            log::debug!("ruthless readability pass too aggressive, retrying leniently");
            continue;
        }
        let body_html = article_doc.select("body").inner_html().to_string();
        return Some((body_html, text));
    }
    None
}

/// Keyword bonus/penalty over class and id.
fn class_weight(sel: &Selection) -> f64 {
    let mut weight = 0.0;
    for value in [dom::attr(sel, "class"), dom::attr(sel, "id")]
        .into_iter()
        .flatten()
    {
        if value.is_empty() {
            continue;
        }
        if NEGATIVE_HINT.is_match(&value) {
            weight -= 25.0;
        }
        if POSITIVE_HINT.is_match(&value) {
            weight += 25.0;
        }
    }
    weight
}

/// Base score of a container by its tag.
fn tag_score(tag: &str) -> f64 {
    match tag {
        "div" | "article" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" | "aside" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" | "header" | "footer" | "nav" => -5.0,
        _ => 0.0,
    }
}

/// Ratio of anchor text to total text.
fn link_density(sel: &Selection) -> f64 {
    let total = dom::text_len(sel).max(1);
    let linked: usize = sel
        .select("a")
        .nodes()
        .iter()
        .map(|n| Selection::from(*n).text().trim().chars().count())
        .sum();
    linked as f64 / total as f64
}

/// Drop nodes whose class/id marks them as unlikely article content,
/// unless a rescue keyword also matches.
fn remove_unlikely_candidates(doc: &Document) {
    let all = dom::iter_elements(&doc.select("html"), &[]);
    for element in all.into_iter().rev() {
        let tag = dom::tag_name(&element).unwrap_or_default();
        if tag == "html" || tag == "body" {
            continue;
        }
        let attrs = dom::class_and_id(&element);
        if attrs.len() < 2 {
            continue;
        }
        if UNLIKELY_CANDIDATES.is_match(&attrs) && !OK_MAYBE_CANDIDATE.is_match(&attrs) {
            dom::remove(&element);
        }
    }
}

/// Promote text-bearing divs without block children to paragraphs.
fn transform_misused_divs(doc: &Document) {
    let divs = dom::iter_elements(&doc.select("body"), &["div"]);
    for div in divs {
        let inner = div.inner_html();
        if !DIV_TO_P_BLOCKERS.is_match(&inner) {
            dom::rename(&div, "p");
        }
    }
}

/// Score every paragraph's parent and grandparent.
fn score_paragraphs(doc: &Document) -> Candidates {
    let mut candidates: Candidates = HashMap::new();
    let mut order: Vec<NodeId> = Vec::new();

    for paragraph in dom::iter_elements(&doc.select("body"), &["p", "pre", "td"]) {
        let Some(node) = paragraph.nodes().first().copied() else {
            continue;
        };
        let Some(parent) = node.parent().filter(dom_query::NodeRef::is_element) else {
            continue;
        };
        let grandparent = parent.parent().filter(dom_query::NodeRef::is_element);

        let text = paragraph.text().trim().to_string();
        let text_len = text.chars().count();
        if text_len < MIN_TEXT_LENGTH {
            continue;
        }

        for container in std::iter::once(parent).chain(grandparent) {
            candidates.entry(container.id).or_insert_with(|| {
                order.push(container.id);
                let sel = Selection::from(container);
                let tag = dom::tag_name(&sel).unwrap_or_default();
                Candidate {
                    score: class_weight(&sel) + tag_score(&tag),
                }
            });
        }

        let commas = text.matches(',').count() as f64;
        let score = 1.0 + commas + (text_len as f64 / 100.0).min(3.0);

        if let Some(candidate) = candidates.get_mut(&parent.id) {
            candidate.score += score;
        }
        if let Some(gp) = grandparent {
            if let Some(candidate) = candidates.get_mut(&gp.id) {
                candidate.score += score / 2.0;
            }
        }
    }

    // Scale by link density: good content has few links and is mostly
    // unaffected.
    for id in order {
        if let Some(node) = find_node(doc, id) {
            let density = link_density(&Selection::from(node));
            if let Some(candidate) = candidates.get_mut(&id) {
                candidate.score *= 1.0 - density;
            }
        }
    }

    candidates
}

/// Locate a node by its arena id.
fn find_node(doc: &Document, id: NodeId) -> Option<dom_query::NodeRef<'_>> {
    for root in doc.select("html").nodes() {
        for node in root.descendants() {
            if node.id == id {
                return Some(node);
            }
        }
    }
    None
}

fn select_best_candidate(candidates: &Candidates, doc: &Document) -> Option<NodeId> {
    let best = candidates
        .iter()
        .max_by(|a, b| a.1.score.total_cmp(&b.1.score))
        .map(|(id, _)| *id)?;
    // Only meaningful if the node still exists.
    find_node(doc, best).map(|n| n.id)
}

/// Assemble the article: the best candidate plus qualifying siblings
/// (score above 20% of the best, or link-sparse short paragraphs that
/// read like sentences).
fn gather_article(doc: &Document, best: NodeId, candidates: &Candidates) -> String {
    let Some(best_node) = find_node(doc, best) else {
        return String::new();
    };
    let best_score = candidates.get(&best).map_or(0.0, |c| c.score);
    let threshold = (best_score * 0.2).max(10.0);

    let siblings: Vec<dom_query::NodeRef> = match best_node.parent() {
        Some(parent) if parent.is_element() => {
            parent.children().into_iter().filter(|c| c.is_element()).collect()
        }
        _ => vec![best_node],
    };

    let mut out = String::new();
    for sibling in siblings {
        let mut append = sibling.id == best;

        if !append {
            if let Some(candidate) = candidates.get(&sibling.id) {
                append = candidate.score >= threshold;
            }
        }
        if !append {
            let sel = Selection::from(sibling);
            if dom::tag_name(&sel).as_deref() == Some("p") {
                let density = link_density(&sel);
                let content = sel.text().trim().to_string();
                let length = content.chars().count();
                append = (length > 80 && density < 0.25)
                    || (length <= 80 && density == 0.0 && DOT_SPACE.is_match(&content));
            }
        }

        if append {
            out.push_str(&Selection::from(sibling).html());
        }
    }
    out
}

/// Final cleanup of the assembled article: headers with bad weight or
/// density, forms, non-video iframes, and conditionally tables, lists
/// and containers failing content-density rules.
///
/// Runs on the reassembled fragment, so the candidate scores from the
/// source document no longer apply; the class-weight signal carries the
/// weight+score rule alone.
fn sanitize(doc: &Document) {
    let body = doc.select("body");

    let headers = dom::iter_elements(&body, &["h1", "h2", "h3", "h4", "h5", "h6"]);
    for header in headers.into_iter().rev() {
        if class_weight(&header) < 0.0 || link_density(&header) > 0.33 {
            dom::remove(&header);
        }
    }

    doc.select("form, textarea").remove();

    let iframes = dom::iter_elements(&body, &["iframe"]);
    for iframe in iframes.into_iter().rev() {
        let keep = dom::attr(&iframe, "src").is_some_and(|src| VIDEO_EMBED.is_match(&src));
        if !keep {
            dom::remove(&iframe);
        }
    }

    let blocks = dom::iter_elements(
        &body,
        &["table", "ul", "div", "aside", "header", "footer", "section"],
    );
    for element in blocks.into_iter().rev() {
        let weight = class_weight(&element);

        if weight < 0.0 {
            dom::remove(&element);
            continue;
        }

        let full_text = dom::text_content(&element);
        if full_text.matches(',').count() >= 10 {
            continue;
        }

        let tag = dom::tag_name(&element).unwrap_or_default();
        let paragraphs = element.select("p").length();
        let images = element.select("img").length();
        let list_items = element.select("li").length() as i64 - 100;
        let inputs = element.select("input").length();
        let hidden_inputs = element.select(r#"input[type="hidden"]"#).length();
        let embeds = element.select("embed").length();
        let content_length = trim_whitespace(&full_text).chars().count();
        let density = link_density(&element);

        let mut drop = false;
        if paragraphs > 0 && images as f64 > 1.0 + paragraphs as f64 * 1.3 {
            drop = true; // too many images for the text
        } else if list_items > paragraphs as i64 && !matches!(tag.as_str(), "ol" | "ul") {
            drop = true; // more list entries than prose
        } else if (inputs - hidden_inputs) * 3 > paragraphs {
            drop = true; // form chrome
        } else if content_length < MIN_TEXT_LENGTH && (images == 0 || images > 2) {
            drop = true; // too little content
        } else if weight < 25.0 && density > 0.2 {
            drop = true;
        } else if weight >= 25.0 && density > 0.5 {
            drop = true;
        } else if (embeds == 1 && content_length < 75) || embeds > 1 {
            drop = true;
        }

        if drop {
            dom::remove(&element);
        }
    }
}
