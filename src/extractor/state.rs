//! Extraction state tracking.
//!
//! Tracks which DOM nodes have already been consumed by a handler and
//! which raw tags are currently admissible as content. The tag set starts
//! from the default catalog and is widened by the options (tables, images,
//! links) or by the pipeline when a region turns out to be paragraph-poor.

use std::collections::HashSet;

use dom_query::NodeId;

use crate::clean::TAG_CATALOG;
use crate::options::ExtractorOptions;

/// Per-extraction mutable state shared by the handlers.
pub struct ExtractionState {
    consumed: HashSet<NodeId>,
    potential_tags: HashSet<String>,
}

impl ExtractionState {
    /// New state with the tag vocabulary derived from the options.
    #[must_use]
    pub fn new(options: &ExtractorOptions) -> Self {
        let mut potential_tags: HashSet<String> =
            TAG_CATALOG.iter().map(|s| (*s).to_string()).collect();

        if options.include_tables {
            for tag in ["table", "tr", "th", "td"] {
                potential_tags.insert(tag.to_string());
            }
        }
        if options.include_images {
            potential_tags.insert("img".to_string());
        }
        if options.include_links {
            potential_tags.insert("a".to_string());
        }

        ExtractionState {
            consumed: HashSet::new(),
            potential_tags,
        }
    }

    /// Mark a DOM node as consumed.
    pub fn mark_done(&mut self, id: NodeId) {
        self.consumed.insert(id);
    }

    /// Whether a DOM node has been consumed already.
    #[must_use]
    pub fn is_done(&self, id: NodeId) -> bool {
        self.consumed.contains(&id)
    }

    /// Whether a raw tag is currently admissible.
    #[must_use]
    pub fn is_potential_tag(&self, tag: &str) -> bool {
        self.potential_tags.contains(tag)
    }

    /// Widen the vocabulary with another tag.
    pub fn add_potential_tag(&mut self, tag: &str) {
        self.potential_tags.insert(tag.to_string());
    }

    /// Current vocabulary, for pruning decisions.
    #[must_use]
    pub fn potential_tags(&self) -> &HashSet<String> {
        &self.potential_tags
    }
}
