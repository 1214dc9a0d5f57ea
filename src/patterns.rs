//! Compiled regex patterns and keyword tables for content extraction.
//!
//! All patterns are compiled once at startup using `LazyLock`. The keyword
//! lists and thresholds collected here are empirically tuned configuration
//! data: they are kept together so they can be adjusted against a corpus
//! without touching pipeline logic.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Noise phrase filtering
// =============================================================================

/// Matches standalone UI boilerplate lines: share-button labels, social
/// network names, print/mail actions. A line consisting of one of these
/// words (with optional leading symbols) carries no content.
pub static NOISE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\W*(?:(?:Drucken|E-?Mail|Facebook|Flipboard|Google|Instagram|Linkedin|Mail|PDF|Pinterest|Pocket|Print|Reddit|Teilen|Twitter|Whatsapp|Xing)\W*$|Shar(?:e|ing)\s+(?:on|via|this)\b.*|Jump to comments?\b.*)",
    )
    .expect("NOISE_PHRASE regex")
});

/// Check whether a single line of text is a known noise phrase.
#[must_use]
pub fn is_noise_phrase(line: &str) -> bool {
    NOISE_PHRASE.is_match(line.trim())
}

// =============================================================================
// Readability scorer patterns
// =============================================================================

/// Class/id substrings marking nodes unlikely to hold article content.
pub static UNLIKELY_CANDIDATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)combx|comment|community|disqus|extra|foot|header|menu|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|tweet|twitter",
    )
    .expect("UNLIKELY_CANDIDATES regex")
});

/// Class/id substrings that rescue a node from the unlikely-candidate
/// removal even when the previous pattern matches.
pub static OK_MAYBE_CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)and|article|body|column|main|shadow").expect("OK_MAYBE_CANDIDATE regex")
});

/// Class/id substrings that raise a candidate's score.
pub static POSITIVE_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|main|page|pagination|post|text|blog|story")
        .expect("POSITIVE_HINT regex")
});

/// Class/id substrings that lower a candidate's score.
pub static NEGATIVE_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)button|combx|comment|com-|contact|figure|foot|footer|footnote|form|input|masthead|media|meta|outbrain|promo|related|scroll|shoutbox|sidebar|sponsor|shopping|tags|tool|widget",
    )
    .expect("NEGATIVE_HINT regex")
});

/// Block-level markup that disqualifies a `div` from paragraph promotion.
pub static DIV_TO_P_BLOCKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(?:a|blockquote|dl|div|img|ol|p|pre|table|ul)").expect("DIV_TO_P_BLOCKERS regex")
});

/// Embedded video hosts whose iframes survive the sanitize pass.
pub static VIDEO_EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://(?:www\.)?(?:youtube|vimeo)\.com").expect("VIDEO_EMBED regex")
});

/// Sentence-ending "dot space" pattern used by the sibling gatherer.
pub static DOT_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.( |$)").expect("DOT_SPACE regex"));

// =============================================================================
// Language declaration
// =============================================================================

/// Splits a declared language attribute into two-letter codes.
pub static HTML_LANG_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([a-z]{2})").expect("HTML_LANG_CODE regex"));

// =============================================================================
// Text cleanup
// =============================================================================

/// Runs of whitespace, for normalization to single spaces.
pub static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN regex"));

/// Collapse whitespace runs to single spaces and trim the ends.
#[must_use]
pub fn trim_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned()
}

/// Check whether a string contains any alphanumeric character at all.
#[must_use]
pub fn text_chars_test(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_phrase_matches_share_labels() {
        assert!(is_noise_phrase("Share on Facebook"));
        assert!(is_noise_phrase("Twitter"));
        assert!(is_noise_phrase("  Print  "));
        assert!(is_noise_phrase("» Facebook"));
        assert!(!is_noise_phrase("Printing presses changed the world"));
        assert!(!is_noise_phrase("A paragraph mentioning Twitter in passing"));
    }

    #[test]
    fn unlikely_candidates_respects_rescue_pattern() {
        assert!(UNLIKELY_CANDIDATES.is_match("sidebar-widget"));
        assert!(UNLIKELY_CANDIDATES.is_match("comment-list"));
        assert!(OK_MAYBE_CANDIDATE.is_match("main-sidebar"));
        assert!(!OK_MAYBE_CANDIDATE.is_match("popup"));
    }

    #[test]
    fn trim_whitespace_collapses_runs() {
        assert_eq!(trim_whitespace("  a \n\t b  "), "a b");
    }

    #[test]
    fn text_chars_test_needs_alphanumerics() {
        assert!(text_chars_test("x"));
        assert!(!text_chars_test(" ... !"));
        assert!(!text_chars_test(""));
    }
}
