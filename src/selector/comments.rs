//! Comment section rules.
//!
//! A small cascade locating the reader-comment container, plus discard
//! rules for the interaction chrome inside it (reply forms, vote
//! buttons, "log in to comment" prompts).

use dom_query::Selection;

use super::{class_or_id, id, tag, Rule};

/// Comment container rules in priority order.
pub static COMMENT_RULES: &[Rule] = &[comment_id, comment_naming];

/// Rules removing interaction chrome inside a comment container.
pub static COMMENT_DISCARD: &[Rule] = &[comment_chrome];

/// Exact ids used by common comment systems.
#[must_use]
pub fn comment_id(sel: &Selection) -> bool {
    matches!(
        id(sel).as_str(),
        "comments" | "comment-section" | "comment-list" | "disqus_thread" | "respond" | "discussion"
    )
}

/// Class/id naming conventions for comment sections.
#[must_use]
pub fn comment_naming(sel: &Selection) -> bool {
    if !matches!(tag(sel).as_str(), "div" | "section" | "ol" | "ul" | "aside") {
        return false;
    }
    let name = class_or_id(sel);
    ["comments-area", "comment-list", "commentlist", "comments-section", "fb-comments"]
        .iter()
        .any(|m| name.contains(m))
}

/// Reply forms, vote widgets and sign-in prompts inside comments.
#[must_use]
pub fn comment_chrome(sel: &Selection) -> bool {
    let name = class_or_id(sel);
    ["reply", "respond", "comment-form", "vote", "rating", "signin", "login", "report"]
        .iter()
        .any(|m| name.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    #[test]
    fn test_comment_id() {
        let doc = dom::parse(r#"<div id="comments">x</div>"#);
        assert!(comment_id(&doc.select("div")));
        let doc = dom::parse(r#"<div id="content">x</div>"#);
        assert!(!comment_id(&doc.select("div")));
    }

    #[test]
    fn test_comment_naming() {
        let doc = dom::parse(r#"<ol class="commentlist">x</ol>"#);
        assert!(comment_naming(&doc.select("ol")));
    }

    #[test]
    fn test_comment_chrome() {
        let doc = dom::parse(r#"<div class="comment-form">x</div>"#);
        assert!(comment_chrome(&doc.select("div")));
    }
}
