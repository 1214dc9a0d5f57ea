//! Error types for pith.
//!
//! Every failure mode of the pipeline reduces to a single discard outcome:
//! the caller receives one of the variants below instead of a partial
//! result. Diagnostic detail is emitted through `log` at the point of
//! failure and is never required to interpret the error.

/// Reason a document was discarded instead of extracted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input was empty or below the minimum byte threshold.
    #[error("input empty or too small")]
    EmptyInput,

    /// Input could not be parsed into a usable DOM, or exceeds the
    /// maximum file size.
    #[error("unparseable input: {0}")]
    Unparseable(String),

    /// The extracted canonical tree exceeds `max_tree_size` even after
    /// stripping inline formatting.
    #[error("extracted tree exceeds maximum size")]
    TreeTooLarge,

    /// Extraction produced less text than `min_extracted_size` /
    /// `min_output_size` after every fallback was exhausted.
    #[error("not enough extracted content")]
    ContentTooShort,

    /// The document (or its whole body) was already seen within the
    /// current processing run.
    #[error("duplicate document")]
    DuplicateDetected,

    /// The document declares a language other than the requested one.
    #[error("document language does not match target")]
    LanguageMismatch,

    /// The document URL is on the caller-supplied blacklist.
    #[error("blacklisted url: {0}")]
    BlacklistedUrl(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
