//! Extraction result types.
//!
//! `Document` bundles the canonical content tree with the metadata fields
//! read from the page and the raw extracted text. Trees are consumed once
//! by the serializer and discarded afterwards.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::options::ExtractorOptions;
use crate::output;
use crate::tree::Node;

/// Metadata fields of an extracted document.
///
/// All fields are optional: pages routinely omit most of them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Metadata {
    /// Page title.
    pub title: Option<String>,
    /// Author name(s).
    pub author: Option<String>,
    /// Canonical or caller-supplied URL.
    pub url: Option<String>,
    /// Hostname derived from `url`.
    pub hostname: Option<String>,
    /// Meta description.
    pub description: Option<String>,
    /// Site name (e.g. from `og:site_name`).
    pub sitename: Option<String>,
    /// Publication or modification date.
    pub date: Option<DateTime<Utc>>,
    /// Content categories.
    pub categories: Vec<String>,
    /// Content tags.
    pub tags: Vec<String>,
    /// License information.
    pub license: Option<String>,
    /// Declared document language.
    pub language: Option<String>,
    /// Main image URL.
    pub image: Option<String>,
    /// Document identifier.
    pub id: Option<String>,
}

/// Result of a successful extraction.
#[derive(Debug, Clone)]
pub struct Document {
    /// Metadata fields read from the page.
    pub metadata: Metadata,
    /// Canonical tree of the main content.
    pub body: Node,
    /// Canonical tree of the comment section, when extracted.
    pub commentsbody: Option<Node>,
    /// Raw extracted text of the main content.
    pub text: String,
    /// Raw extracted text of the comment section.
    pub comments: String,
    /// Simhash hex fingerprint over title and body text.
    pub fingerprint: String,
}

impl Document {
    /// Serialize the document in the format requested by the options.
    #[must_use]
    pub fn serialize(&self, options: &ExtractorOptions) -> String {
        output::serialize(self, options)
    }
}
