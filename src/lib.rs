//! # pith
//!
//! Web content extraction library: strips navigation, advertisements and
//! other boilerplate from arbitrary, often malformed HTML and returns the
//! main content - article text, optionally tables, images, links and the
//! comment section - as a canonical tree serializable to text, Markdown,
//! JSON or XML.
//!
//! ## Quick start
//!
//! ```rust
//! use pith::{extract, ExtractorOptions};
//!
//! let html = r#"<html><head><title>My Article</title></head>
//! <body><article><p>Main content here, repeated long enough to pass the
//! minimum extraction size. Main content here, and some more of it, and
//! still more of the running text of the main article body, which keeps
//! going for a couple of sentences so the thresholds are met.</p>
//! <p>Second paragraph with more article prose to round the sample out,
//! carrying the text over the default size gate comfortably.</p>
//! </article></body></html>"#;
//!
//! let doc = extract(html)?;
//! println!("{}", doc.text);
//! # Ok::<(), pith::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! 1. A selector cascade picks the most plausible content region.
//! 2. Boilerplate is pruned by keyword rules and link density.
//! 3. A tag-dispatch transducer rewrites the region into a small
//!    canonical vocabulary, filtering noise and duplicates.
//! 4. In non-fast mode an independent readability-style scorer runs on
//!    the raw page and the longer extraction wins; a baseline extractor
//!    is the last resort.
//! 5. Sanity limits (size, tree nodes, duplicates, language) turn bad
//!    results into a typed discard instead of partial output.

mod baseline;
mod clean;
mod error;
mod extract;
mod fallback;
mod options;
mod output;
mod readability;

/// DOM adapter over `dom_query` with text/tail reads.
pub mod dom;

/// Canonical intermediate tree shared by all stages.
pub mod tree;

/// Bounded LRU cache used by the dedup engine.
pub mod lru;

/// Simhash fingerprinting and duplicate testing.
pub mod dedup;

/// Selector rules for content, boilerplate and comments.
pub mod selector;

/// Link density heuristics.
pub mod link_density;

/// Element handlers and the extraction pipeline.
pub mod extractor;

/// Metadata reading from meta tags and microdata.
pub mod metadata;

/// Charset detection and transcoding.
pub mod encoding;

/// Compiled patterns and keyword tables.
pub mod patterns;

/// Extraction result types.
pub mod document;

pub use dedup::{content_fingerprint, DedupCache, Simhash};
pub use document::{Document, Metadata};
pub use error::{Error, Result};
pub use options::{ExtractorOptions, Focus, OutputFormat};

/// Extract the main content of an HTML document with default options.
pub fn extract(html: &str) -> Result<Document> {
    extract_with_options(html, &ExtractorOptions::default())
}

/// Extract the main content of an HTML document with custom options.
pub fn extract_with_options(html: &str, options: &ExtractorOptions) -> Result<Document> {
    extract::extract_document(html, options)
}

/// Extract from raw bytes, detecting the character encoding first.
pub fn extract_bytes(html: &[u8]) -> Result<Document> {
    extract_bytes_with_options(html, &ExtractorOptions::default())
}

/// Extract from raw bytes with custom options.
pub fn extract_bytes_with_options(html: &[u8], options: &ExtractorOptions) -> Result<Document> {
    if html.len() < options.min_file_size {
        return Err(Error::EmptyInput);
    }
    let decoded = encoding::transcode_to_utf8(html);
    extract_with_options(&decoded, options)
}
