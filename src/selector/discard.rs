//! Boilerplate discard rules.
//!
//! Rules identifying subtrees to remove from a selected content region
//! before transduction: navigation, sharing widgets, related-content
//! teasers, consent banners and the rest of the page furniture. The
//! keyword sets are tuning data; changes belong here, not in the
//! pipeline.

use dom_query::Selection;

use super::{class_or_id, tag, Rule};

/// Rules applied to every candidate region.
pub static OVERALL_DISCARD: &[Rule] = &[structural_boilerplate, named_boilerplate, hidden_element];

/// Rules applied outside recall mode.
pub static TEASER_DISCARD: &[Rule] = &[teaser_block];

/// Extra rules for precision mode.
pub static PRECISION_DISCARD: &[Rule] = &[lead_and_meta_block];

/// Rules removing image containers when images are not wanted.
pub static IMAGE_DISCARD: &[Rule] = &[image_container];

const NAMED_BOILERPLATE: &[&str] = &[
    "footer",
    "nav",
    "navbar",
    "navigation",
    "breadcrumb",
    "menu",
    "sidebar",
    "share",
    "sharing",
    "social",
    "sociable",
    "syndication",
    "related",
    "recommend",
    "more-from",
    "you-may-like",
    "taboola",
    "outbrain",
    "newsletter",
    "subscribe",
    "subscription",
    "signup",
    "sign-up",
    "login",
    "signin",
    "consent",
    "cookie",
    "gdpr",
    "privacy-notice",
    "paywall",
    "subscriber-only",
    "advert",
    "sponsor",
    "promo",
    "banner",
    "popup",
    "modal",
    "widget",
    "byline",
    "author-info",
    "post-meta",
    "entry-meta",
    "meta-info",
    "timestamp",
    "dateline",
    "tag-cloud",
    "tags-list",
    "category-list",
    "filed-under",
    "posted-in",
    "comment",
    "disqus",
    "pagination",
    "pager",
    "print-only",
    "skip-link",
    "copyright",
    "disclaimer",
];

/// Elements whose tag alone marks them as page furniture. Most are
/// already gone after document cleaning; this catches regions selected
/// before cleaning (baseline, readability input).
#[must_use]
pub fn structural_boilerplate(sel: &Selection) -> bool {
    matches!(tag(sel).as_str(), "aside" | "footer" | "nav" | "form")
}

/// Class/id naming conventions for boilerplate sections.
#[must_use]
pub fn named_boilerplate(sel: &Selection) -> bool {
    if !matches!(
        tag(sel).as_str(),
        "div" | "section" | "ul" | "ol" | "dl" | "p" | "span" | "table" | "header" | "footer"
            | "aside"
    ) {
        return false;
    }
    let name = class_or_id(sel);
    if name.len() < 3 {
        return false;
    }
    NAMED_BOILERPLATE.iter().any(|m| name.contains(m))
}

/// Elements hidden from rendering.
#[must_use]
pub fn hidden_element(sel: &Selection) -> bool {
    if crate::dom::attr(sel, "hidden").is_some() {
        return true;
    }
    if crate::dom::attr(sel, "aria-hidden").as_deref() == Some("true") {
        return true;
    }
    crate::dom::attr(sel, "style").is_some_and(|style| {
        let style = style.to_lowercase();
        style.contains("display:none")
            || style.contains("display: none")
            || style.contains("visibility:hidden")
            || style.contains("visibility: hidden")
    })
}

/// Related-content teasers: short promotional excerpts linking elsewhere.
#[must_use]
pub fn teaser_block(sel: &Selection) -> bool {
    if !matches!(tag(sel).as_str(), "div" | "section" | "ul" | "article") {
        return false;
    }
    let name = class_or_id(sel);
    ["teaser", "excerpt-link", "read-more", "more-link", "trending", "popular", "most-read"]
        .iter()
        .any(|m| name.contains(m))
}

/// Lead-in and metadata blocks dropped in precision mode only.
#[must_use]
pub fn lead_and_meta_block(sel: &Selection) -> bool {
    let name = class_or_id(sel);
    ["summary", "lead-in", "standfirst", "article-info", "story-info", "caption", "credit"]
        .iter()
        .any(|m| name.contains(m))
}

/// Figures and image wrappers, removed when images are excluded.
#[must_use]
pub fn image_container(sel: &Selection) -> bool {
    let t = tag(sel);
    if t == "figure" || t == "picture" {
        return true;
    }
    if !matches!(t.as_str(), "div" | "span" | "section") {
        return false;
    }
    let name = class_or_id(sel);
    ["image-container", "img-wrapper", "gallery", "thumbnail", "photo-credit"]
        .iter()
        .any(|m| name.contains(m))
}

/// Whether any overall discard rule flags this element.
#[must_use]
pub fn should_discard(sel: &Selection) -> bool {
    OVERALL_DISCARD.iter().any(|rule| rule(sel))
}
