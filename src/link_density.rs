//! Link density testing.
//!
//! The ratio of anchor-contained text to total text is the main structural
//! signal for navigation boilerplate. The length limits below are
//! empirically tuned and deliberately asymmetric (an element with a
//! following sibling is held to a tighter limit than a trailing one);
//! they should only be changed against a corpus.

use dom_query::Selection;

use crate::dom;
use crate::options::ExtractorOptions;

/// Aggregate statistics over the links of an element.
struct LinkInfo {
    /// Total character count of non-empty link texts.
    text_length: usize,
    /// Links with fewer than 10 characters of text.
    short_links: usize,
    /// Links with any text at all.
    non_empty_links: usize,
}

fn collect_link_info(links: &Selection) -> LinkInfo {
    let mut info = LinkInfo {
        text_length: 0,
        short_links: 0,
        non_empty_links: 0,
    };

    for link in links.iter() {
        let text = link.text();
        let length = text.trim().chars().count();
        if length == 0 {
            continue;
        }
        info.text_length += length;
        if length < 10 {
            info.short_links += 1;
        }
        info.non_empty_links += 1;
    }

    info
}

/// Outcome of a link density probe.
pub struct DensityProbe {
    /// The element contains at least one link with text.
    pub has_links: bool,
    /// The element crosses a density threshold and should go.
    pub is_dense: bool,
}

/// Probe an element for boilerplate-grade link density.
#[must_use]
pub fn probe(element: &Selection, options: &ExtractorOptions) -> DensityProbe {
    let links = element.select("a");
    if links.is_empty() {
        return DensityProbe {
            has_links: false,
            is_dense: false,
        };
    }

    let text_length = dom::text_len(element);

    // Shortcut: a single link carrying nearly all of the text.
    if links.length() == 1 {
        let floor = if options.favor_precision() { 10 } else { 100 };
        if let Some(node) = links.nodes().first() {
            let link_length = Selection::from(*node).text().trim().chars().count();
            if link_length > floor && link_length as f64 > text_length as f64 * 0.9 {
                return DensityProbe {
                    has_links: true,
                    is_dense: true,
                };
            }
        }
    }

    // Length limit under which the density rules apply. Paragraphs are
    // held tighter than generic containers, elements followed by a
    // sibling tighter than trailing ones.
    let tag = dom::tag_name(element).unwrap_or_default();
    let has_next = dom::next_element_sibling(element).is_some();
    let limit = if tag == "p" {
        if has_next {
            30
        } else {
            60
        }
    } else if has_next {
        100
    } else {
        300
    };

    if text_length < limit {
        let info = collect_link_info(&links);

        if info.non_empty_links == 0 {
            return DensityProbe {
                has_links: false,
                is_dense: true,
            };
        }
        if info.text_length as f64 > text_length as f64 * 0.8 {
            return DensityProbe {
                has_links: true,
                is_dense: true,
            };
        }
        if info.non_empty_links > 1
            && info.short_links as f64 / info.non_empty_links as f64 > 0.8
        {
            return DensityProbe {
                has_links: true,
                is_dense: true,
            };
        }
        return DensityProbe {
            has_links: true,
            is_dense: false,
        };
    }

    DensityProbe {
        has_links: collect_link_info(&links).non_empty_links > 0,
        is_dense: false,
    }
}

/// Whether an element should be removed for link density.
#[must_use]
pub fn is_link_dense(element: &Selection, options: &ExtractorOptions) -> bool {
    probe(element, options).is_dense
}

/// Table variant: larger bodies, ratio-only thresholds.
#[must_use]
pub fn is_link_dense_table(table: &Selection) -> bool {
    let links = table.select("a");
    if links.is_empty() {
        return false;
    }

    let text_length = dom::text_len(table);
    if text_length < 200 {
        return false;
    }

    let info = collect_link_info(&links);
    if info.non_empty_links == 0 {
        return true;
    }

    if text_length < 1000 {
        info.text_length as f64 > text_length as f64 * 0.8
    } else {
        info.text_length as f64 > text_length as f64 * 0.5
    }
}

/// Remove descendants of the given tags whose link density marks them as
/// boilerplate. With `backtracking`, elements that merely contain links
/// and little text are removed as well.
pub fn delete_by_link_density(
    sub_tree: &Selection,
    options: &ExtractorOptions,
    backtracking: bool,
    tag_names: &[&str],
) {
    let threshold = if options.favor_precision() { 200 } else { 100 };
    let child_floor = if options.favor_precision() { 1 } else { 3 };

    let mut doomed = Vec::new();
    for element in dom::iter_elements(sub_tree, tag_names) {
        let result = probe(&element, options);
        if result.is_dense {
            doomed.push(element);
        } else if backtracking && result.has_links {
            let text_length = dom::text_len(&element);
            let child_count = dom::children(&element).length();
            if text_length > 0 && text_length < threshold && child_count >= child_floor {
                doomed.push(element);
            }
        }
    }

    for element in doomed.into_iter().rev() {
        dom::remove(&element);
    }
}
