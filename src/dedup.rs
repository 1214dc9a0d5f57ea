//! Duplicate detection and text similarity.
//!
//! Two cooperating mechanisms live here. The Simhash fingerprinter turns a
//! text into a 64-bit locality-sensitive signature: near-identical inputs
//! land at a small Hamming distance. The duplicate test counts how often a
//! given trimmed text has been seen through a shared, bounded LRU cache
//! and flags it once the count passes `max_repetitions`. The test runs per
//! paragraph inside the element handlers and per document in the
//! orchestrator.

use std::sync::Mutex;

use crate::lru::LruCache;
use crate::options::ExtractorOptions;

/// Default number of tokens a Simhash is computed over.
const SAMPLE_SIZE: usize = 64;

/// Default capacity of a freshly created dedup cache.
pub const DEFAULT_CACHE_SIZE: usize = 4096;

// === Tokenization ===

/// Split input into sampled tokens for hashing.
///
/// Tokens are whitespace-separated words with surrounding punctuation
/// stripped; only fully alphanumeric tokens are kept. A minimum token
/// length filter is relaxed from 4 down to 0 until at least half the
/// sample target is reached, so short texts still produce a usable
/// sample. Texts without word boundaries (e.g. CJK prose) defeat the
/// whitespace pass; when it yields fewer than two tokens the input is
/// split on punctuation runs instead.
#[must_use]
pub fn sample_tokens(input: &str, length: usize) -> Vec<String> {
    let tokens: Vec<&str> = input
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| !token.is_empty() && token.chars().all(char::is_alphanumeric))
        .collect();

    if tokens.len() < 2 {
        return input
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
    }

    let mut sample: Vec<String> = Vec::new();
    for min_len in (0..=4).rev() {
        sample = tokens
            .iter()
            .filter(|t| t.chars().count() > min_len)
            .map(|t| (*t).to_string())
            .collect();
        if sample.len() * 2 >= length {
            return sample;
        }
    }
    sample
}

/// 64-bit FNV-1a digest of a token.
fn token_hash(token: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in token.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

// === Simhash ===

/// Charikar-style locality-sensitive hash of a text.
///
/// Two hashes are comparable only when their bit lengths match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Simhash {
    hash: u64,
    length: u32,
}

impl Simhash {
    /// Fingerprint a text over the default 64-bit width.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self::with_length(input, 64)
    }

    /// Fingerprint a text over the first `length` bits (at most 64).
    #[must_use]
    pub fn with_length(input: &str, length: u32) -> Self {
        let length = length.clamp(1, 64);
        let mut vector = [0_i32; 64];

        for token in sample_tokens(input, SAMPLE_SIZE) {
            let digest = token_hash(&token);
            for (i, slot) in vector.iter_mut().enumerate().take(length as usize) {
                if digest & (1_u64 << i) != 0 {
                    *slot += 1;
                } else {
                    *slot -= 1;
                }
            }
        }

        let mut hash = 0_u64;
        for (i, slot) in vector.iter().enumerate().take(length as usize) {
            if *slot >= 0 {
                hash |= 1_u64 << i;
            }
        }

        Simhash { hash, length }
    }

    /// Rebuild a hash from a stored hexadecimal value.
    #[must_use]
    pub fn from_hex(value: &str) -> Option<Self> {
        u64::from_str_radix(value.trim(), 16)
            .ok()
            .map(|hash| Simhash { hash, length: 64 })
    }

    /// Hexadecimal form, suitable for storage.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("{:x}", self.hash)
    }

    /// Number of differing bits between two hashes of equal length.
    #[must_use]
    pub fn hamming_distance(self, other: Simhash) -> u32 {
        (self.hash ^ other.hash).count_ones()
    }

    /// Similarity in `[0.0, 1.0]`; zero when lengths differ.
    #[must_use]
    pub fn similarity(self, other: Simhash) -> f64 {
        if self.length != other.length {
            return 0.0;
        }
        f64::from(self.length - self.hamming_distance(other)) / f64::from(self.length)
    }
}

/// Simhash hex value over the meaningful bits of a content string.
#[must_use]
pub fn content_fingerprint(content: &str) -> String {
    Simhash::new(content).to_hex()
}

// === Duplicate testing ===

/// Shared, lock-guarded repetition counter.
///
/// One instance is meant to live for a whole batch run and be shared by
/// concurrent per-document workers; the mutex serializes the `get`+`put`
/// sequence that maintains the recency list.
pub struct DedupCache {
    inner: Mutex<LruCache<String, usize>>,
}

impl DedupCache {
    /// Create a cache bounded to `capacity` distinct text entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        DedupCache {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Check a text against the repetition counter.
    ///
    /// Texts at or below `min_duplcheck_size` characters always pass and
    /// are never cached. Otherwise the observed count is looked up: above
    /// `max_repetitions` the text is a duplicate (and the count still
    /// increments); otherwise it is accepted and counted.
    #[must_use]
    pub fn is_duplicate(&self, text: &str, options: &ExtractorOptions) -> bool {
        let test_string = crate::patterns::trim_whitespace(text);
        if test_string.chars().count() <= options.min_duplcheck_size {
            return false;
        }

        let Ok(mut cache) = self.inner.lock() else {
            return false;
        };
        let count = cache.get(&test_string).copied().unwrap_or(0);
        cache.put(test_string, count + 1);
        count > options.max_repetitions
    }

    /// Forget everything seen so far.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.clear();
        }
    }
}

impl Default for DedupCache {
    fn default() -> Self {
        DedupCache::new(DEFAULT_CACHE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "At the gathering of the municipal council the delegates discussed \
the renovation of the old library building and the budget for the coming year, with several \
members voicing concerns about rising construction costs across the region.";

    #[test]
    fn test_sample_tokens_strips_punctuation() {
        let tokens = sample_tokens("Hello, world! (Really.)", 8);
        assert!(tokens.contains(&"Hello".to_string()));
        assert!(tokens.contains(&"world".to_string()));
        assert!(tokens.contains(&"Really".to_string()));
    }

    #[test]
    fn test_sample_tokens_relaxes_length_filter() {
        // A text of only short words still yields a sample.
        let tokens = sample_tokens("an ox is in a box and it naps a lot on dry hay", 64);
        assert!(!tokens.is_empty());
        assert!(tokens.contains(&"ox".to_string()));
    }

    #[test]
    fn test_sample_tokens_punctuation_fallback() {
        // No spaces at all: fall back to splitting on punctuation runs.
        let tokens = sample_tokens("这是一个测试句子，用来验证标点切分。", 64);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_simhash_identity() {
        let hash = Simhash::new(BASE);
        assert_eq!(hash.similarity(hash), 1.0);
        assert_eq!(hash.hamming_distance(hash), 0);
    }

    #[test]
    fn test_simhash_symmetry() {
        let a = Simhash::new(BASE);
        let b = Simhash::new("A completely different piece of text about sailing boats.");
        assert_eq!(a.similarity(b), b.similarity(a));
    }

    #[test]
    fn test_simhash_near_duplicate() {
        let a = Simhash::new(BASE);
        let near = format!("{BASE} The mayor promised to revisit the matter at the next session.");
        let b = Simhash::new(&near);
        assert!(a.similarity(b) > 0.9, "got {}", a.similarity(b));
    }

    #[test]
    fn test_simhash_unrelated_strings() {
        let a = Simhash::new("The stock market closed higher on Tuesday.");
        let b = Simhash::new("Grandmother baked twelve apple pies yesterday.");
        assert!(a.similarity(b) < 0.6, "got {}", a.similarity(b));
    }

    #[test]
    fn test_simhash_length_mismatch() {
        let a = Simhash::with_length(BASE, 64);
        let b = Simhash::with_length(BASE, 32);
        assert_eq!(a.similarity(b), 0.0);
    }

    #[test]
    fn test_fingerprint_roundtrip() {
        let hex = content_fingerprint(BASE);
        let restored = Simhash::from_hex(&hex);
        assert!(restored.is_some());
        assert_eq!(restored.map(Simhash::to_hex), Some(hex));
    }

    #[test]
    fn test_duplicate_test_threshold() {
        let options = ExtractorOptions {
            min_duplcheck_size: 10,
            max_repetitions: 2,
            ..ExtractorOptions::default()
        };
        let cache = DedupCache::new(2);
        let text = "This paragraph is long enough to be checked for duplicates.";

        // Accept, accept, accept, then reject from the fourth sighting on.
        assert!(!cache.is_duplicate(text, &options));
        assert!(!cache.is_duplicate(text, &options));
        assert!(!cache.is_duplicate(text, &options));
        assert!(cache.is_duplicate(text, &options));
        assert!(cache.is_duplicate(text, &options));
    }

    #[test]
    fn test_duplicate_test_short_text_never_cached() {
        let options = ExtractorOptions {
            min_duplcheck_size: 100,
            max_repetitions: 2,
            ..ExtractorOptions::default()
        };
        let cache = DedupCache::new(2);

        for _ in 0..10 {
            assert!(!cache.is_duplicate("short text", &options));
        }
    }
}
