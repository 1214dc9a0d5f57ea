//! Section pruning.
//!
//! Removes boilerplate subtrees from a candidate region before the
//! handlers run: discard rules, link-density deletion with backtracking,
//! table density, and the precision-only passes. Works on a cloned
//! subtree so rejected candidates leave the source document intact.

use std::collections::HashSet;

use dom_query::{Document, Selection};

use crate::dom;
use crate::link_density::{delete_by_link_density, is_link_dense_table};
use crate::options::ExtractorOptions;
use crate::selector::{self, discard, Rule};

/// Clone a subtree into its own document for destructive pruning.
#[must_use]
pub fn isolate_subtree(sub_tree: &Selection) -> Document {
    Document::from(format!(
        "<html><body>{}</body></html>",
        sub_tree.html()
    ))
}

/// Remove all elements matching any of the rules from the tree.
///
/// With `with_backup`, the pass is undone (by returning the original
/// markup) when it would remove more than roughly 6/7 of the text: a
/// discard rule that eats nearly the whole region has misfired.
#[must_use]
pub fn prune_unwanted_nodes(tree: &Selection, rules: &[Rule], with_backup: bool) -> Document {
    let backup_html = if with_backup {
        Some(tree.html().to_string())
    } else {
        None
    };
    let old_len = dom::text_len(tree);

    let doc = isolate_subtree(tree);
    let body = doc.select("body");
    for rule in rules {
        let matches = selector::query_all(&body, *rule);
        for node in matches.into_iter().rev() {
            dom::remove(&node);
        }
    }

    if let Some(backup) = backup_html {
        let new_len = dom::text_len(&doc.select("body"));
        if new_len <= old_len / 7 {
            log::debug!("discard rules removed too much, restoring region");
            return Document::from(format!("<html><body>{backup}</body></html>"));
        }
    }

    doc
}

/// Rule-based deletion of targeted document sections, followed by the
/// link-density passes. Returns the pruned region as its own document.
#[must_use]
pub fn prune_unwanted_sections(
    sub_tree: &Selection,
    potential_tags: &HashSet<String>,
    options: &ExtractorOptions,
) -> Document {
    let doc = prune_unwanted_nodes(sub_tree, discard::OVERALL_DISCARD, true);
    let tree = doc.select("body");

    if !options.include_images {
        prune_in_place(&tree, discard::IMAGE_DISCARD);
    }

    if !options.favor_recall() {
        prune_in_place(&tree, discard::TEASER_DISCARD);
        if options.favor_precision() {
            prune_in_place(&tree, discard::PRECISION_DISCARD);
        }
    }

    // Link density, two passes with backtracking over generic containers.
    for _ in 0..2 {
        delete_by_link_density(&tree, options, true, &["div"]);
        delete_by_link_density(&tree, options, false, &["ul", "ol", "dl"]);
        delete_by_link_density(&tree, options, false, &["p"]);
    }

    if potential_tags.contains("table") || options.favor_precision() {
        let tables = dom::iter_elements(&tree, &["table"]);
        for table in tables.into_iter().rev() {
            if is_link_dense_table(&table) {
                dom::remove(&table);
            }
        }
    }

    if options.favor_precision() {
        // Trailing headings announce sections that were pruned away.
        let children: Vec<_> = dom::children(&tree).nodes().to_vec();
        for node in children.into_iter().rev() {
            let child = Selection::from(node);
            let tag = dom::tag_name(&child).unwrap_or_default();
            if super::handlers::is_heading_tag(&tag) {
                dom::remove(&child);
            } else {
                break;
            }
        }

        delete_by_link_density(
            &tree,
            options,
            false,
            &["h1", "h2", "h3", "h4", "h5", "h6"],
        );
        delete_by_link_density(&tree, options, false, &["blockquote", "pre", "q"]);
    }

    doc
}

fn prune_in_place(tree: &Selection, rules: &[Rule]) {
    for rule in rules {
        let matches = selector::query_all(tree, *rule);
        for node in matches.into_iter().rev() {
            dom::remove(&node);
        }
    }
}

/// Strip markup that is not in the admissible vocabulary before the
/// handlers walk a region: spans always, anchors unless links are
/// admitted.
pub fn strip_non_potential_tags(tree: &Selection, potential_tags: &HashSet<String>) {
    if potential_tags.contains("a") {
        dom::strip_tags(tree, &["span"]);
    } else {
        dom::strip_tags(tree, &["a", "span"]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_tags() -> HashSet<String> {
        ["p", "h1", "h2", "blockquote", "table"]
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }

    #[test]
    fn test_prune_removes_share_widget() {
        let doc = dom::parse(
            r#"<div><p>Article text that should stay.</p><div class="share-buttons">Share</div></div>"#,
        );
        let root = doc.select("div").first();

        let pruned = prune_unwanted_sections(&root, &default_tags(), &ExtractorOptions::default());

        assert!(pruned.select(".share-buttons").is_empty());
        assert!(pruned.select("p").exists());
    }

    #[test]
    fn test_prune_backup_restores_overzealous_pass() {
        // The whole region is one "main" block a rule would remove; the
        // backup check must restore it.
        let doc = dom::parse(
            r#"<div class="region"><aside>Everything lives in an aside for some reason,
            quite a lot of text in fact, all of the text there is.</aside></div>"#,
        );
        let root = doc.select("div.region");

        let pruned = prune_unwanted_nodes(&root, discard::OVERALL_DISCARD, true);
        assert!(!dom::text_content(&pruned.select("body")).trim().is_empty());
    }

    #[test]
    fn test_precision_drops_trailing_heading() {
        let options = ExtractorOptions {
            focus: crate::options::Focus::Precision,
            ..ExtractorOptions::default()
        };
        let doc = dom::parse(
            r#"<div><p>Substantial paragraph of body text that stays in place after pruning
            because it is ordinary article prose of reasonable length.</p>
            <p>Another paragraph with enough words to clear every density limit easily.</p>
            <h2>Trailing heading</h2></div>"#,
        );
        let root = doc.select("div").first();

        let pruned = prune_unwanted_sections(&root, &default_tags(), &options);

        assert_eq!(pruned.select("h2").length(), 0);
        assert!(pruned.select("p").length() >= 1);
    }

    #[test]
    fn test_non_trailing_heading_survives_precision() {
        let options = ExtractorOptions {
            focus: crate::options::Focus::Precision,
            ..ExtractorOptions::default()
        };
        let doc = dom::parse(
            r#"<div><h1>Title</h1><p>Body text following the heading, long enough to stay
            well above all pruning thresholds applied here.</p></div>"#,
        );
        let root = doc.select("div").first();

        let pruned = prune_unwanted_sections(&root, &default_tags(), &options);
        assert!(pruned.select("h1").exists());
    }

    #[test]
    fn test_strip_non_potential_tags() {
        let doc = dom::parse(r##"<div><p>Text <a href="#">link</a> and <span>span</span></p></div>"##);
        let root = doc.select("div");

        strip_non_potential_tags(&root, &default_tags());

        assert!(root.select("a").is_empty());
        assert!(root.select("span").is_empty());
        // Text preserved.
        assert!(dom::text_content(&root).contains("link"));
        assert!(dom::text_content(&root).contains("span"));
    }

    #[test]
    fn test_strip_keeps_links_when_potential() {
        let doc = dom::parse(r##"<div><p>Text <a href="#">link</a></p></div>"##);
        let root = doc.select("div");
        let mut tags = default_tags();
        tags.insert("a".to_string());

        strip_non_potential_tags(&root, &tags);
        assert!(root.select("a").exists());
    }
}
