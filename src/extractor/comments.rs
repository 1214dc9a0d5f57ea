//! Comment section extraction.
//!
//! Locates the reader-comment container through its own selector cascade,
//! strips the interaction chrome, and feeds the remains through the same
//! handlers as the main content. The result is kept only when it clears
//! the comment size minimum.

use dom_query::Document;

use crate::dom;
use crate::options::ExtractorOptions;
use crate::selector::{self, comments::COMMENT_DISCARD, comments::COMMENT_RULES};
use crate::tree::{Node, Tag};

use super::pipeline::handle_text_elem;
use super::pruning::prune_unwanted_nodes;
use super::state::ExtractionState;

/// Extract the comment section of a page, removing it from the document
/// so the main-content pass does not see it again.
#[must_use]
pub fn extract_comments(doc: &Document, options: &ExtractorOptions) -> (Option<Node>, String) {
    let mut body = Node::new(Tag::Body);
    let mut state = ExtractionState::new(options);

    for rule in COMMENT_RULES {
        let Some(section) = selector::query(&doc.select("body"), *rule) else {
            continue;
        };

        let pruned = prune_unwanted_nodes(&section, COMMENT_DISCARD, false);
        let region = pruned.select("body");

        for element in dom::iter_elements(&region, &["p", "blockquote", "q", "div"]) {
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

        if !body.children.is_empty() {
            // Consume the section so the content pass skips it.
            dom::remove(&section);
            break;
        }
    }

    let text = body.iter_text(" ");
    if text.chars().count() < options.min_extracted_comm_size {
        return (None, String::new());
    }
    (Some(body), text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_comments_from_id_section() {
        let options = ExtractorOptions {
            include_comments: true,
            min_extracted_comm_size: 20,
            ..ExtractorOptions::default()
        };
        let doc = dom::parse(
            r#"<html><body>
            <article><p>Main article text here.</p></article>
            <div id="comments">
                <p>First reader comment with a reasonable amount of text.</p>
                <p>Second reader comment, also reasonably long for a comment.</p>
            </div>
            </body></html>"#,
        );

        let (body, text) = extract_comments(&doc, &options);

        assert!(body.is_some());
        assert!(text.contains("First reader comment"));
        // Consumed from the document.
        assert!(doc.select("#comments").is_empty());
    }

    #[test]
    fn test_short_comment_section_dropped() {
        let options = ExtractorOptions {
            include_comments: true,
            ..ExtractorOptions::default()
        };
        let doc = dom::parse(
            r#"<html><body><div id="comments"><p>Too short.</p></div></body></html>"#,
        );

        let (body, text) = extract_comments(&doc, &options);
        assert!(body.is_none());
        assert!(text.is_empty());
    }

    #[test]
    fn test_no_comment_section() {
        let options = ExtractorOptions::default();
        let doc = dom::parse("<html><body><p>Just an article.</p></body></html>");

        let (body, _) = extract_comments(&doc, &options);
        assert!(body.is_none());
    }
}
