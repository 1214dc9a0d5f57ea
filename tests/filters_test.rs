//! Sanity limits: size gates, tree size guard, language, deduplication.

use pith::{extract, extract_with_options, Error, ExtractorOptions};

#[test]
fn short_input_is_discarded() {
    assert!(matches!(extract("<html>"), Err(Error::EmptyInput)));
    assert!(matches!(extract(""), Err(Error::EmptyInput)));
}

#[test]
fn empty_document_discards_without_panicking() {
    // Runs through every fallback down to the baseline's last-ditch
    // full-page text, which is empty - a discard, not an error state.
    let result = extract("<html></html>");
    assert!(matches!(result, Err(Error::ContentTooShort)));
}

#[test]
fn max_tree_size_boundary() {
    let paragraph = "<p>abc</p>";

    let html = format!(
        "<html><body><article>{}</article></body></html>",
        paragraph.repeat(499)
    );
    let options = ExtractorOptions {
        max_tree_size: Some(500),
        ..ExtractorOptions::default()
    };
    assert!(extract_with_options(&html, &options).is_ok());

    let html = format!(
        "<html><body><article>{}</article></body></html>",
        paragraph.repeat(501)
    );
    let options = ExtractorOptions {
        max_tree_size: Some(500),
        ..ExtractorOptions::default()
    };
    assert!(matches!(
        extract_with_options(&html, &options),
        Err(Error::TreeTooLarge)
    ));
}

#[test]
fn max_tree_size_formatting_strip_recovery() {
    // With inline formatting the raw tree is twice as large; stripping
    // formatting is the one recovery attempt before giving up.
    let paragraph = "<p><b>abc</b></p>";

    let html = format!(
        "<html><body><article>{}</article></body></html>",
        paragraph.repeat(499)
    );
    let options = ExtractorOptions {
        include_formatting: true,
        max_tree_size: Some(500),
        ..ExtractorOptions::default()
    };
    assert!(extract_with_options(&html, &options).is_ok());

    let html = format!(
        "<html><body><article>{}</article></body></html>",
        paragraph.repeat(501)
    );
    let options = ExtractorOptions {
        include_formatting: true,
        max_tree_size: Some(500),
        ..ExtractorOptions::default()
    };
    assert!(matches!(
        extract_with_options(&html, &options),
        Err(Error::TreeTooLarge)
    ));
}

#[test]
fn declared_language_mismatch_discards() {
    let html = r#"<html lang="de"><body><article>
        <p>Ein langer Absatz auf Deutsch, der deutlich mehr Text enthaelt als die
        Mindestgroesse verlangt, und der sich ueber mehrere Zeilen erstreckt, damit
        die Extraktion an sich problemlos funktionieren wuerde.</p>
        <p>Noch ein Absatz mit weiterem Text, damit die Gesamtlaenge stimmt und die
        Schwelle sicher ueberschritten wird.</p>
        </article></body></html>"#;

    let options = ExtractorOptions {
        target_language: Some("en".to_string()),
        ..ExtractorOptions::default()
    };
    assert!(matches!(
        extract_with_options(html, &options),
        Err(Error::LanguageMismatch)
    ));

    // Matching declaration extracts fine.
    let options = ExtractorOptions {
        target_language: Some("de".to_string()),
        ..ExtractorOptions::default()
    };
    assert!(extract_with_options(html, &options).is_ok());

    // No declaration at all passes the gate.
    let html_no_lang = html.replace(r#" lang="de""#, "");
    let options = ExtractorOptions {
        target_language: Some("en".to_string()),
        ..ExtractorOptions::default()
    };
    assert!(extract_with_options(&html_no_lang, &options).is_ok());
}

#[test]
fn document_level_deduplication() {
    // Fifty identical short paragraphs: each is below the duplicate-check
    // floor, so only the document-level test counts sightings. The
    // fourth extraction of the same page is rejected.
    let html = format!(
        "<html><body><article>{}</article></body></html>",
        "<p>abcdef</p>".repeat(50)
    );

    let options = ExtractorOptions {
        deduplicate: true,
        ..ExtractorOptions::default()
    };

    assert!(extract_with_options(&html, &options).is_ok());
    assert!(extract_with_options(&html, &options).is_ok());
    assert!(extract_with_options(&html, &options).is_ok());
    assert!(matches!(
        extract_with_options(&html, &options),
        Err(Error::DuplicateDetected)
    ));
}

#[test]
fn paragraph_level_deduplication_inside_document() {
    // One long paragraph repeated many times within a single page: the
    // paragraph-level test keeps the first sightings and drops the rest.
    let paragraph = "This paragraph is well over the minimum duplicate check size and \
                     repeats verbatim throughout the entire page body many times over.";
    let html = format!(
        "<html><body><article>{}</article></body></html>",
        format!("<p>{paragraph}</p>").repeat(20)
    );

    let options = ExtractorOptions {
        deduplicate: true,
        fast: true,
        ..ExtractorOptions::default()
    };
    let doc = extract_with_options(&html, &options).expect("first extraction succeeds");

    let occurrences = doc.text.matches("minimum duplicate check size").count();
    assert_eq!(occurrences, 3, "only max_repetitions + 1 copies survive");
}

#[test]
fn dedup_disabled_keeps_repetitions() {
    let paragraph = "This paragraph is well over the minimum duplicate check size and \
                     repeats verbatim throughout the entire page body many times over.";
    let html = format!(
        "<html><body><article>{}</article></body></html>",
        format!("<p>{paragraph}</p>").repeat(5)
    );

    let options = ExtractorOptions {
        fast: true,
        ..ExtractorOptions::default()
    };
    let doc = extract_with_options(&html, &options).expect("extraction succeeds");
    assert_eq!(doc.text.matches("minimum duplicate check size").count(), 5);
}
