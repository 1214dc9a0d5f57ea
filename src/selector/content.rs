//! Content region rules.
//!
//! Ordered cascade identifying the main content container of a page, most
//! specific naming conventions first. The first rule yielding a non-empty
//! subtree wins provisionally; the pipeline may still reject it for lack
//! of paragraph text and move on.

use dom_query::Selection;

use super::{class, class_or_id, id, tag, Rule};
use crate::dom;

/// Content selector rules in priority order.
pub static CONTENT_RULES: &[Rule] = &[
    article_body_markers,
    article_element,
    story_and_content_markers,
    generic_content_markers,
    main_element,
];

fn is_container(sel: &Selection) -> bool {
    matches!(
        tag(sel).as_str(),
        "article" | "div" | "main" | "section" | "td"
    )
}

/// Rule 1: explicit article-body naming conventions.
///
/// Matches `itemprop="articleBody"` and the dense cluster of
/// `post-content` / `article-body` / `entry-content` style class and id
/// names used by most CMS themes.
#[must_use]
pub fn article_body_markers(sel: &Selection) -> bool {
    if !is_container(sel) {
        return false;
    }
    if dom::attr(sel, "itemprop").as_deref() == Some("articleBody") {
        return true;
    }

    let class = class(sel);
    let id = id(sel);
    const MARKERS: &[&str] = &[
        "post-content",
        "post_content",
        "postcontent",
        "post-text",
        "post-body",
        "post-entry",
        "entry-content",
        "article-content",
        "article__content",
        "article-body",
        "article__body",
        "articlebody",
        "article-text",
        "articletext",
        "story-body",
        "storybody",
        "story-content",
        "storycontent",
        "content-body",
        "contentbody",
        "blog-content",
        "blog-post-content",
        "text-content",
        "body-text",
        "mw-parser-output",
        "mw-content-text",
    ];
    MARKERS
        .iter()
        .any(|m| class.contains(m) || id.contains(m))
        || class == "post"
        || class == "entry"
}

/// Rule 2: the `<article>` element itself (and `<story>`, used by a few
/// news CMS).
#[must_use]
pub fn article_element(sel: &Selection) -> bool {
    let t = tag(sel);
    t == "article" || t == "story"
}

/// Rule 3: story/article naming and `role="article"`.
#[must_use]
pub fn story_and_content_markers(sel: &Selection) -> bool {
    if !is_container(sel) {
        return false;
    }
    if dom::attr(sel, "role").as_deref() == Some("article") {
        return true;
    }

    let class = class(sel);
    let id = id(sel);
    const MARKERS: &[&str] = &[
        "post-bodycopy",
        "single-content",
        "single-post",
        "main-column",
        "wpb_text_column",
        "section-content",
        "theme-content",
        "field-body",
        "fulltext",
    ];
    MARKERS
        .iter()
        .any(|m| class.contains(m) || id.contains(m))
        || id.starts_with("primary")
        || class.starts_with("article")
        || class == "text"
        || class == "story"
        || id == "article"
        || id == "story"
}

/// Rule 4: generic `content` naming.
#[must_use]
pub fn generic_content_markers(sel: &Selection) -> bool {
    if !is_container(sel) {
        return false;
    }
    let class = class(sel);
    let id = id(sel);
    const MARKERS: &[&str] = &[
        "content-main",
        "content_main",
        "content-body",
        "content__body",
        "main-content",
        "page-content",
    ];
    MARKERS
        .iter()
        .any(|m| class.contains(m) || id.contains(m))
        || id == "content"
        || class == "content"
}

/// Rule 5: `<main>` and `role="main"` landmarks.
#[must_use]
pub fn main_element(sel: &Selection) -> bool {
    if tag(sel) == "main" {
        return true;
    }
    if !is_container(sel) {
        return false;
    }
    dom::attr(sel, "role").as_deref() == Some("main")
        || id(sel).starts_with("main")
        || class(sel).starts_with("main")
}

/// Quick check used outside the cascade: does this element look like a
/// content container at all?
#[must_use]
pub fn looks_like_content(sel: &Selection) -> bool {
    let name = class_or_id(sel);
    ["article", "content", "post", "entry", "story", "text", "body", "main"]
        .iter()
        .any(|m| name.contains(m))
}
