//! Configuration options for content extraction.
//!
//! `ExtractorOptions` is an immutable per-call snapshot controlling the
//! precision/recall tradeoff, feature toggles and size thresholds. The
//! deduplication cache is carried here as an explicit shared handle so
//! callers (and tests) control its lifetime instead of relying on a
//! module-level singleton.

use std::collections::HashSet;
use std::sync::Arc;

use crate::dedup::DedupCache;

/// Output format of the serialized extraction result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text, paragraphs separated by blank lines.
    #[default]
    Text,
    /// GitHub-flavored Markdown.
    Markdown,
    /// JSON object with metadata and text fields.
    Json,
    /// TEI-flavored XML.
    Xml,
}

/// Extraction focus: which side of the precision/recall tradeoff to favor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Favor correctness: stricter pruning, extract less.
    Precision,
    /// Favor completeness: widened tag vocabulary, extract more.
    Recall,
    /// Default middle ground.
    #[default]
    Balanced,
}

/// Configuration options for content extraction.
///
/// Use `ExtractorOptions::default()` for standard settings and struct
/// update syntax for adjustments:
///
/// ```rust
/// use pith::{ExtractorOptions, Focus};
///
/// let options = ExtractorOptions {
///     focus: Focus::Precision,
///     include_comments: true,
///     ..ExtractorOptions::default()
/// };
/// ```
#[derive(Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct ExtractorOptions {
    /// Serialization target for `Document::serialize`.
    pub format: OutputFormat,

    /// Skip the fallback comparison pass (readability scorer) entirely.
    ///
    /// Default: `false`
    pub fast: bool,

    /// Precision/recall focus of the structural heuristics.
    ///
    /// Default: `Focus::Balanced`
    pub focus: Focus,

    /// Extract the comment section alongside the main content.
    ///
    /// Default: `false`
    pub include_comments: bool,

    /// Preserve inline formatting (bold, italic, ...) in the output tree.
    ///
    /// Default: `false`
    pub include_formatting: bool,

    /// Preserve link targets in extracted content.
    ///
    /// Default: `false`
    pub include_links: bool,

    /// Keep image references.
    ///
    /// Default: `false`
    pub include_images: bool,

    /// Keep table content.
    ///
    /// Default: `true`
    pub include_tables: bool,

    /// Drop repeated paragraphs and duplicate documents via the shared
    /// LRU cache.
    ///
    /// Default: `false`
    pub deduplicate: bool,

    /// Expected document language (ISO 639-1). Documents declaring a
    /// different language are discarded.
    ///
    /// Default: `None`
    pub target_language: Option<String>,

    /// Source URL of the document, used for link resolution and the URL
    /// blacklist check.
    ///
    /// Default: `None`
    pub url: Option<String>,

    /// Author names to reject; a document whose extracted author matches
    /// one of these (case-insensitive substring) loses that author.
    ///
    /// Default: empty
    pub author_blacklist: HashSet<String>,

    /// URLs whose documents are rejected outright.
    ///
    /// Default: empty
    pub url_blacklist: HashSet<String>,

    /// Minimum character count of acceptable extracted content; shorter
    /// results trigger the fallback cascade and are finally discarded.
    ///
    /// Default: `200`
    pub min_extracted_size: usize,

    /// Minimum character count of an acceptable comment section.
    ///
    /// Default: `100`
    pub min_extracted_comm_size: usize,

    /// Minimum size of the serialized output.
    ///
    /// Default: `1`
    pub min_output_size: usize,

    /// Minimum size of the serialized comment output.
    ///
    /// Default: `1`
    pub min_output_comm_size: usize,

    /// Texts at or below this length always pass the duplicate test and
    /// are never cached.
    ///
    /// Default: `100`
    pub min_duplcheck_size: usize,

    /// How many times a text may repeat before being flagged duplicate.
    ///
    /// Default: `2`
    pub max_repetitions: usize,

    /// Inputs below this many bytes are discarded unparsed.
    ///
    /// Default: `10`
    pub min_file_size: usize,

    /// Inputs above this many bytes are discarded unparsed.
    ///
    /// Default: `20_000_000`
    pub max_file_size: usize,

    /// Node-count ceiling for the extracted tree; `None` disables the
    /// guard. Exceeding it fails extraction after one recovery attempt
    /// (stripping inline formatting).
    ///
    /// Default: `None`
    pub max_tree_size: Option<usize>,

    /// Shared repetition counter used by the duplicate tests. Workers
    /// processing documents concurrently should share one instance.
    pub dedup_cache: Arc<DedupCache>,
}

impl ExtractorOptions {
    /// Whether precision heuristics are active.
    #[must_use]
    pub fn favor_precision(&self) -> bool {
        self.focus == Focus::Precision
    }

    /// Whether recall heuristics are active.
    #[must_use]
    pub fn favor_recall(&self) -> bool {
        self.focus == Focus::Recall
    }
}

impl std::fmt::Debug for ExtractorOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorOptions")
            .field("format", &self.format)
            .field("fast", &self.fast)
            .field("focus", &self.focus)
            .field("include_comments", &self.include_comments)
            .field("include_formatting", &self.include_formatting)
            .field("include_links", &self.include_links)
            .field("include_images", &self.include_images)
            .field("include_tables", &self.include_tables)
            .field("deduplicate", &self.deduplicate)
            .field("target_language", &self.target_language)
            .field("url", &self.url)
            .field("min_extracted_size", &self.min_extracted_size)
            .field("max_tree_size", &self.max_tree_size)
            .finish_non_exhaustive()
    }
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        ExtractorOptions {
            format: OutputFormat::Text,
            fast: false,
            focus: Focus::Balanced,
            include_comments: false,
            include_formatting: false,
            include_links: false,
            include_images: false,
            include_tables: true,
            deduplicate: false,
            target_language: None,
            url: None,
            author_blacklist: HashSet::new(),
            url_blacklist: HashSet::new(),
            min_extracted_size: 200,
            min_extracted_comm_size: 100,
            min_output_size: 1,
            min_output_comm_size: 1,
            min_duplcheck_size: 100,
            max_repetitions: 2,
            min_file_size: 10,
            max_file_size: 20_000_000,
            max_tree_size: None,
            dedup_cache: Arc::new(crate::dedup::DedupCache::default()),
        }
    }
}
