//! Extraction orchestrator.
//!
//! Sequences the whole pipeline for one document: input gates, parsing,
//! metadata, cleaning, comment and content extraction, the fallback
//! cascade, and the final sanity limits. Every failure resolves into a
//! discard-reason `Error`; nothing propagates as a panic.

use dom_query::Document as Dom;

use crate::clean;
use crate::dedup::content_fingerprint;
use crate::document::Document;
use crate::dom;
use crate::error::{Error, Result};
use crate::extractor;
use crate::fallback;
use crate::metadata;
use crate::options::ExtractorOptions;
use crate::patterns::HTML_LANG_CODE;

/// Check declared language information against the target language.
///
/// Only declarations count here: a page without any language information
/// passes. Statistical identification of the extracted text is outside
/// the core.
fn check_html_lang(doc: &Dom, target: &str) -> bool {
    let mut declared = Vec::new();
    if let Some(lang) = dom::attr(&doc.select("html").first(), "lang") {
        declared.push(lang);
    }
    if let Some(content) = dom::attr(
        &doc.select(r#"meta[http-equiv="content-language"]"#).first(),
        "content",
    ) {
        declared.push(content);
    }
    if declared.is_empty() {
        return true;
    }
    declared.iter().any(|value| {
        HTML_LANG_CODE
            .find_iter(value)
            .any(|code| code.as_str().eq_ignore_ascii_case(target))
    })
}

pub(crate) fn extract_document(html: &str, options: &ExtractorOptions) -> Result<Document> {
    if html.len() < options.min_file_size {
        return Err(Error::EmptyInput);
    }
    if html.len() > options.max_file_size {
        return Err(Error::Unparseable("input exceeds maximum file size".to_string()));
    }

    let doc = dom::parse(html);
    if doc.select("html").is_empty() {
        return Err(Error::Unparseable("no document element".to_string()));
    }

    let meta = metadata::extract_metadata(&doc, options);

    for url in [meta.url.as_deref(), options.url.as_deref()].into_iter().flatten() {
        if options.url_blacklist.contains(url) {
            return Err(Error::BlacklistedUrl(url.to_string()));
        }
    }

    if let Some(target) = options.target_language.as_deref() {
        if !check_html_lang(&doc, target) {
            log::debug!("declared language does not match {target}");
            return Err(Error::LanguageMismatch);
        }
    }

    // Backup before cleaning: the fallbacks work on the dirty tree.
    let backup = dom::clone_document(&doc);
    clean::doc_cleaning(&doc, options);

    let (mut commentsbody, mut comments) = if options.include_comments {
        extractor::comments::extract_comments(&doc, options)
    } else {
        (None, String::new())
    };
    if commentsbody.is_some() && comments.chars().count() < options.min_output_comm_size {
        commentsbody = None;
        comments = String::new();
    }

    let (mut body, mut text) = extractor::extract_content(&doc, options);

    if !options.fast {
        let compared = fallback::compare_extraction(&backup, body, text, options);
        body = compared.0;
        text = compared.1;
    }

    if text.chars().count() < options.min_extracted_size {
        log::debug!("content too short ({} chars), trying baseline", text.chars().count());
        let rescue = dom::clone_document(&backup);
        let (baseline_body, baseline_text) = crate::baseline::baseline(&rescue);
        if baseline_text.chars().count() > text.chars().count() {
            body = baseline_body;
            text = baseline_text;
        }
    }

    body.strip_done();

    if let Some(max_size) = options.max_tree_size {
        if body.descendant_count() > max_size {
            // One recovery attempt: drop inline formatting, then give up.
            body.strip_formatting();
            if body.descendant_count() > max_size {
                log::debug!("tree of {} nodes over the limit {max_size}", body.descendant_count());
                return Err(Error::TreeTooLarge);
            }
        }
    }

    let final_len = text.chars().count();
    if final_len < options.min_extracted_size || final_len < options.min_output_size {
        return Err(Error::ContentTooShort);
    }

    let title = meta.title.clone().unwrap_or_default();
    let fingerprint = content_fingerprint(&format!("{title} {text}"));

    if options.deduplicate
        && options
            .dedup_cache
            .is_duplicate(&format!("{title} {text}"), options)
    {
        return Err(Error::DuplicateDetected);
    }

    Ok(Document {
        metadata: meta,
        body,
        commentsbody,
        text,
        comments,
        fingerprint,
    })
}
