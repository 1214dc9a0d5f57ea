//! Character encoding detection and transcoding.
//!
//! Byte input is sniffed for a charset declaration and decoded to UTF-8
//! before parsing. Only the leading kilobyte is examined; undeclared
//! input defaults to UTF-8 with lossy replacement of invalid sequences.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>]+)"#).expect("META_CHARSET regex")
});

static CONTENT_TYPE_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#,
    )
    .expect("CONTENT_TYPE_CHARSET regex")
});

/// Detect the declared encoding of an HTML byte stream.
///
/// Checks `<meta charset>` first, then the `Content-Type` meta variant;
/// UTF-8 when neither declares anything usable.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = String::from_utf8_lossy(&html[..html.len().min(1024)]);

    for pattern in [&META_CHARSET, &CONTENT_TYPE_CHARSET] {
        if let Some(label) = pattern.captures(&head).and_then(|c| c.get(1)) {
            if let Some(encoding) = Encoding::for_label(label.as_str().as_bytes()) {
                return encoding;
            }
        }
    }

    UTF_8
}

/// Decode HTML bytes to a UTF-8 string, replacing invalid sequences
/// rather than failing.
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let encoding = detect_encoding(html);
    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }
    let (decoded, _, _) = encoding.decode(html);
    decoded.into_owned()
}
