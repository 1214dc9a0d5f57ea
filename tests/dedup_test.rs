//! Fingerprinting and cache properties over the public API.

use pith::dedup::{content_fingerprint, sample_tokens, Simhash};
use pith::lru::LruCache;
use pith::{extract_with_options, ExtractorOptions, OutputFormat};

#[test]
fn lru_eviction_is_exactly_least_recent() {
    let capacity = 8;
    let mut cache: LruCache<String, usize> = LruCache::new(capacity);

    for i in 0..capacity {
        cache.put(format!("key-{i}"), i);
    }
    // Touch everything except key-3, then overflow by one.
    for i in (0..capacity).filter(|i| *i != 3) {
        assert!(cache.get(&format!("key-{i}")).is_some());
    }
    cache.put("overflow".to_string(), 99);

    assert_eq!(cache.get(&"key-3".to_string()), None);
    for i in (0..capacity).filter(|i| *i != 3) {
        assert!(cache.get(&format!("key-{i}")).is_some(), "key-{i} evicted");
    }
}

#[test]
fn simhash_properties() {
    let base = "At the gathering of the municipal council the delegates discussed the \
                renovation of the old library building and the budget for the coming year, \
                with several members voicing concerns about rising construction costs \
                across the region.";

    let h = Simhash::new(base);
    assert_eq!(h.similarity(h), 1.0);

    // Symmetry.
    let other = Simhash::new("An entirely different text on an unrelated topic.");
    assert_eq!(h.similarity(other), other.similarity(h));

    // One extra clause keeps the hashes close.
    let near = format!("{base} The mayor promised to revisit the matter at the next session.");
    assert!(h.similarity(Simhash::new(&near)) > 0.9);

    // Unrelated short strings end up far apart.
    let a = Simhash::new("The stock market closed higher on Tuesday.");
    let b = Simhash::new("Grandmother baked twelve apple pies yesterday.");
    assert!(a.similarity(b) < 0.6);
}

#[test]
fn serialization_roundtrip_preserves_fingerprint() {
    // Serializing the canonical tree to text and re-fingerprinting the
    // serialized form matches fingerprinting the flattened tree text:
    // the tokenizer only sees words, not block separators.
    let html = r#"<html><body><article>
        <h2>Library renovation approved</h2>
        <p>The municipal council approved the renovation of the old library building
        after a long debate about the budget for the coming year and the concerns
        over rising construction costs across the whole region.</p>
        <ul><li>The reading room reopens in spring.</li>
        <li>The archive moves to the basement.</li></ul>
        </article></body></html>"#;

    let options = ExtractorOptions {
        format: OutputFormat::Text,
        ..ExtractorOptions::default()
    };
    let doc = extract_with_options(html, &options).expect("extraction succeeds");

    let flattened = doc.body.iter_text(" ");
    let serialized = doc.serialize(&options);

    assert_eq!(
        content_fingerprint(&serialized),
        content_fingerprint(&flattened)
    );
}

#[test]
fn tokenizer_agrees_across_layouts() {
    // Same words, different whitespace layout: identical samples.
    let a = sample_tokens("one two three four five six seven eight", 64);
    let b = sample_tokens("one\n\ttwo  three\nfour five\tsix   seven eight", 64);
    assert_eq!(a, b);
}

#[test]
fn fingerprints_of_distinct_documents_differ() {
    let doc_a = "A detailed report on municipal water infrastructure maintenance schedules \
                 and the long term funding models behind them.";
    let doc_b = "Recipe collections from the southern coast, featuring grilled vegetables, \
                 olive oil, and slow cooked stews.";
    assert_ne!(content_fingerprint(doc_a), content_fingerprint(doc_b));
}
