//! Metadata reading.
//!
//! Populates the `Document` metadata fields from meta tags, a few
//! microdata conventions and the title element. This is deliberately the
//! lightweight part of the system: field-level heuristics beyond the
//! common conventions stay out of the core.

use chrono::{DateTime, NaiveDate, Utc};
use dom_query::{Document, Selection};

use crate::document::Metadata;
use crate::dom;
use crate::options::ExtractorOptions;
use crate::patterns::trim_whitespace;

fn meta_content(doc: &Document, selector: &str) -> Option<String> {
    let sel = doc.select(selector);
    dom::attr(&sel.first(), "content")
        .map(|v| trim_whitespace(&v))
        .filter(|v| !v.is_empty())
}

fn first_text(doc: &Document, selector: &str) -> Option<String> {
    let sel = doc.select(selector);
    if sel.is_empty() {
        return None;
    }
    let text = trim_whitespace(&sel.first().text());
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parse the date formats that actually occur in date metadata fields.
fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    // Date-only fields are common in article:published_time.
    let date_part = value.get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn extract_title(doc: &Document) -> Option<String> {
    if let Some(title) = meta_content(doc, r#"meta[property="og:title"]"#) {
        return Some(title);
    }
    if let Some(title) = first_text(doc, "head title") {
        // Strip a trailing site-name segment ("Headline | Site").
        for separator in [" | ", " – ", " — ", " :: "] {
            if let Some((head, _)) = title.rsplit_once(separator) {
                return Some(head.trim().to_string());
            }
        }
        return Some(title);
    }
    first_text(doc, "h1")
}

fn extract_author(doc: &Document, options: &ExtractorOptions) -> Option<String> {
    let author = meta_content(doc, r#"meta[name="author"]"#)
        .or_else(|| meta_content(doc, r#"meta[property="article:author"]"#))
        .or_else(|| first_text(doc, r#"[rel="author"], [itemprop="author"]"#))?;

    let lowered = author.to_lowercase();
    if options
        .author_blacklist
        .iter()
        .any(|entry| lowered.contains(&entry.to_lowercase()))
    {
        log::debug!("author suppressed by blacklist: {author}");
        return None;
    }
    Some(author)
}

fn extract_url(doc: &Document, options: &ExtractorOptions) -> Option<String> {
    let canonical = doc.select(r#"link[rel="canonical"]"#);
    dom::attr(&canonical.first(), "href")
        .filter(|href| !href.is_empty())
        .or_else(|| meta_content(doc, r#"meta[property="og:url"]"#))
        .or_else(|| options.url.clone())
}

fn extract_date(doc: &Document) -> Option<DateTime<Utc>> {
    for selector in [
        r#"meta[property="article:published_time"]"#,
        r#"meta[name="date"]"#,
        r#"meta[property="article:modified_time"]"#,
    ] {
        if let Some(value) = meta_content(doc, selector) {
            if let Some(date) = parse_date(&value) {
                return Some(date);
            }
        }
    }
    let time = doc.select("time[datetime]");
    dom::attr(&time.first(), "datetime").and_then(|v| parse_date(&v))
}

fn collect_meta_values(doc: &Document, selector: &str) -> Vec<String> {
    let mut values = Vec::new();
    for node in doc.select(selector).nodes() {
        if let Some(content) = dom::attr(&Selection::from(*node), "content") {
            let content = trim_whitespace(&content);
            if !content.is_empty() && !values.contains(&content) {
                values.push(content);
            }
        }
    }
    values
}

/// Read the metadata fields of a page.
#[must_use]
pub fn extract_metadata(doc: &Document, options: &ExtractorOptions) -> Metadata {
    let url = extract_url(doc, options);
    let hostname = url
        .as_deref()
        .and_then(|u| url::Url::parse(u).ok())
        .and_then(|u| u.host_str().map(str::to_string));

    let language = dom::attr(&doc.select("html").first(), "lang")
        .map(|l| l.chars().take(2).collect::<String>().to_lowercase())
        .filter(|l| l.len() == 2);

    Metadata {
        title: extract_title(doc),
        author: extract_author(doc, options),
        hostname,
        description: meta_content(doc, r#"meta[name="description"]"#)
            .or_else(|| meta_content(doc, r#"meta[property="og:description"]"#)),
        sitename: meta_content(doc, r#"meta[property="og:site_name"]"#),
        date: extract_date(doc),
        categories: collect_meta_values(doc, r#"meta[property="article:section"]"#),
        tags: collect_meta_values(doc, r#"meta[property="article:tag"]"#)
            .into_iter()
            .flat_map(|t| {
                t.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
            })
            .collect(),
        license: dom::attr(&doc.select(r#"link[rel="license"]"#).first(), "href")
            .filter(|l| !l.is_empty()),
        language,
        image: meta_content(doc, r#"meta[property="og:image"]"#),
        id: None,
        url,
    }
}
