//! Document cleaning.
//!
//! Before any region is selected, the DOM is stripped of elements that can
//! never contribute content (scripts, frames, form chrome) and of markup
//! that only wraps text (font, small, spans of table scaffolding). The tag
//! lists are catalog data shared with the handlers.

use std::collections::HashSet;
use std::sync::LazyLock;

use dom_query::{Document, Selection};

use crate::dom;
use crate::options::ExtractorOptions;
use crate::patterns::text_chars_test;

/// Tags removed together with their children during cleaning.
pub static TAGS_TO_CLEAN: &[&str] = &[
    "aside", "embed", "footer", "form", "head", "iframe", "menu", "object", "script",
    "applet", "audio", "canvas", "map", "svg", "video",
    "area", "blink", "button", "datalist", "dialog", "frame", "frameset", "fieldset",
    "link", "input", "label", "legend", "marquee", "math", "menuitem", "nav",
    "noscript", "optgroup", "option", "output", "param", "progress", "rp", "rt",
    "select", "source", "style", "track", "textarea", "time",
];

/// Tags stripped while keeping their children.
pub static TAGS_TO_STRIP: &[&str] = &[
    "abbr", "acronym", "address", "bdi", "bdo", "big", "cite", "data", "dfn", "font",
    "hgroup", "ins", "mark", "meta", "ruby", "small", "template", "wbr",
    "tbody", "tfoot", "thead",
];

/// Tags removed when they end up empty after cleaning.
pub static EMPTY_REMOVABLE_TAGS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "article", "b", "blockquote", "dd", "div", "dt", "em", "h1", "h2", "h3", "h4", "h5",
        "h6", "i", "li", "main", "p", "pre", "q", "section", "span", "strong",
    ]
    .into_iter()
    .collect()
});

/// Default catalog of tags the transducer will consider.
pub static TAG_CATALOG: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "blockquote", "code", "del", "s", "strike",
        "h1", "h2", "h3", "h4", "h5", "h6", "summary",
        "em", "i", "b", "strong", "u", "kbd", "samp", "tt", "var", "sub", "sup",
        "br", "hr", "ul", "ol", "dl", "p", "pre", "q", "details",
    ]
    .into_iter()
    .collect()
});

/// Remove noise elements and strip wrapper markup from a parsed page.
///
/// Figures holding tables or blockquotes are demoted to plain containers
/// first so their content survives the figure removal.
pub fn doc_cleaning(doc: &Document, options: &ExtractorOptions) {
    for figure in dom::iter_elements(&doc.select("body"), &["figure"]) {
        let keeps_table = options.include_tables && figure.select("table").length() > 0;
        let keeps_quote = figure.select("blockquote").length() > 0;
        if keeps_table || keeps_quote {
            dom::rename(&figure, "div");
        }
    }

    let mut clean_tags: Vec<&str> = TAGS_TO_CLEAN.to_vec();
    if !options.include_tables {
        clean_tags.extend(["table", "td", "th", "tr"]);
    }
    if !options.include_images {
        clean_tags.extend(["figure", "picture"]);
    }

    let mut strip_tags: Vec<&str> = TAGS_TO_STRIP.to_vec();
    if !options.include_images {
        strip_tags.push("img");
    }

    let body = doc.select("body");
    dom::strip_tags(&body, &strip_tags);
    doc.select(&clean_tags.join(", ")).remove();

    prune_empty_elements(doc);
}

/// Drop elements from the empty-removable catalog that carry no text and
/// no children. Runs bottom-up so emptied parents go too.
pub fn prune_empty_elements(doc: &Document) {
    let all: Vec<_> = dom::iter_elements(&doc.select("body"), &[]);
    for element in all.into_iter().rev() {
        let Some(tag) = dom::tag_name(&element) else {
            continue;
        };
        if !EMPTY_REMOVABLE_TAGS.contains(tag.as_str()) {
            continue;
        }
        if dom::children(&element).is_empty() && !text_chars_test(&element.text()) {
            dom::remove(&element);
        }
    }
}

/// Basic cleaning used by the baseline extractor: only the sections that
/// would poison a whole-document text scrape.
pub fn basic_cleaning(doc: &Document) {
    doc.select("aside, footer, nav, script, style, noscript").remove();

    let discardable: Vec<Selection> = dom::iter_elements(&doc.select("body"), &["div", "section"])
        .into_iter()
        .filter(|sel| {
            let name = dom::class_and_id(sel).to_lowercase();
            ["footer", "consent", "cookie", "gdpr", "banner", "modal", "popup", "newsletter"]
                .iter()
                .any(|m| name.contains(m))
        })
        .collect();
    for sel in discardable.into_iter().rev() {
        dom::remove(&sel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_cleaning_removes_scripts_and_nav() {
        let doc = dom::parse(
            r#"<html><body><nav>menu</nav><script>var x;</script><p>content</p></body></html>"#,
        );
        doc_cleaning(&doc, &ExtractorOptions::default());

        assert!(doc.select("nav").is_empty());
        assert!(doc.select("script").is_empty());
        assert!(doc.select("p").exists());
    }

    #[test]
    fn test_doc_cleaning_strips_font_keeps_text() {
        let doc = dom::parse("<html><body><p><font>styled</font> text</p></body></html>");
        doc_cleaning(&doc, &ExtractorOptions::default());

        assert!(doc.select("font").is_empty());
        assert!(dom::text_content(&doc.select("p")).contains("styled"));
    }

    #[test]
    fn test_doc_cleaning_tables_toggle() {
        let html = "<html><body><table><tr><td>cell</td></tr></table><p>text</p></body></html>";

        let doc = dom::parse(html);
        doc_cleaning(&doc, &ExtractorOptions::default());
        assert!(doc.select("table").exists());

        let doc = dom::parse(html);
        let options = ExtractorOptions {
            include_tables: false,
            ..ExtractorOptions::default()
        };
        doc_cleaning(&doc, &options);
        assert!(doc.select("table").is_empty());
    }

    #[test]
    fn test_figure_with_table_survives() {
        let doc = dom::parse(
            "<html><body><figure><table><tr><td>kept</td></tr></table></figure></body></html>",
        );
        doc_cleaning(&doc, &ExtractorOptions::default());
        assert!(doc.select("table").exists());
    }

    #[test]
    fn test_prune_empty_elements() {
        let doc = dom::parse("<html><body><div><p></p></div><p>kept</p></body></html>");
        prune_empty_elements(&doc);

        assert_eq!(doc.select("p").length(), 1);
        assert!(doc.select("div").is_empty());
    }

    #[test]
    fn test_basic_cleaning() {
        let doc = dom::parse(
            r#"<html><body><nav>x</nav><div class="cookie-banner">cookies</div><article>body</article></body></html>"#,
        );
        basic_cleaning(&doc);

        assert!(doc.select("nav").is_empty());
        assert!(doc.select(".cookie-banner").is_empty());
        assert!(doc.select("article").exists());
    }
}
