//! Canonical intermediate tree.
//!
//! All extraction stages read and write the same normalized representation:
//! a closed set of tags with owned children. Raw HTML vocabulary is folded
//! into this set by the element handlers; serializers consume it once.
//!
//! ## Text vs tail
//!
//! Nodes follow the text/tail model: `text` is the content before the first
//! child, `tail` is the content following the node's closing tag inside its
//! parent. Preserving tails is what keeps text flow intact when markup is
//! dropped.

/// Closed tag vocabulary of the canonical tree.
///
/// `Done` is a transient tombstone marking nodes already consumed by an
/// earlier stage; it is stripped before the tree reaches a serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Root container of an extraction result.
    Body,
    /// Paragraph.
    P,
    /// Heading (any level, level kept in `rend`).
    Head,
    /// List container (ordered, unordered or definition).
    List,
    /// List item.
    Item,
    /// Block quotation.
    Quote,
    /// Verbatim code block.
    Code,
    /// Table container.
    Table,
    /// Table row.
    Row,
    /// Table cell; header cells carry `role="head"`.
    Cell,
    /// Image reference.
    Graphic,
    /// Hyperlink.
    Ref,
    /// Inline highlighting (bold/italic/underline/monospace, in `rend`).
    Hi,
    /// Struck-through text.
    Del,
    /// Line break.
    Lb,
    /// Tombstone for consumed nodes; never serialized.
    Done,
}

impl Tag {
    /// Canonical serialization name of the tag.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Tag::Body => "body",
            Tag::P => "p",
            Tag::Head => "head",
            Tag::List => "list",
            Tag::Item => "item",
            Tag::Quote => "quote",
            Tag::Code => "code",
            Tag::Table => "table",
            Tag::Row => "row",
            Tag::Cell => "cell",
            Tag::Graphic => "graphic",
            Tag::Ref => "ref",
            Tag::Hi => "hi",
            Tag::Del => "del",
            Tag::Lb => "lb",
            Tag::Done => "done",
        }
    }
}

/// A node of the canonical tree.
///
/// A node appears in exactly one parent's child sequence: children are
/// owned and moved, never aliased, so a node can never become its own
/// ancestor.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Tag kind; every node has one.
    pub tag: Tag,
    /// Rendering hint (`#b`, `#i`, `#u`, `#t`, `h1`..`h6`, `overstrike`).
    pub rend: Option<String>,
    /// Structural role, currently only `head` on header cells.
    pub role: Option<String>,
    /// Link target for `Ref` nodes.
    pub target: Option<String>,
    /// Image source for `Graphic` nodes.
    pub src: Option<String>,
    /// Image alternative text.
    pub alt: Option<String>,
    /// Image title.
    pub title: Option<String>,
    /// Text before the first child.
    pub text: Option<String>,
    /// Text following this node inside its parent.
    pub tail: Option<String>,
    /// Ordered owned children.
    pub children: Vec<Node>,
}

impl Node {
    /// Create an empty node with the given tag.
    #[must_use]
    pub fn new(tag: Tag) -> Self {
        Node {
            tag,
            rend: None,
            role: None,
            target: None,
            src: None,
            alt: None,
            title: None,
            text: None,
            tail: None,
            children: Vec::new(),
        }
    }

    /// Create a node carrying only text.
    #[must_use]
    pub fn with_text(tag: Tag, text: impl Into<String>) -> Self {
        let mut node = Node::new(tag);
        let text = text.into();
        if !text.is_empty() {
            node.text = Some(text);
        }
        node
    }

    /// Append a child, taking ownership.
    pub fn append(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Number of descendant nodes, not counting `self`.
    #[must_use]
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// Whether the subtree carries any alphanumeric text.
    #[must_use]
    pub fn has_content(&self) -> bool {
        fn chars_ok(s: &Option<String>) -> bool {
            s.as_deref()
                .is_some_and(|t| t.chars().any(char::is_alphanumeric))
        }
        if self.tag == Tag::Graphic && self.src.is_some() {
            return true;
        }
        chars_ok(&self.text)
            || chars_ok(&self.tail)
            || self.children.iter().any(Node::has_content)
    }

    /// Flattened text of the subtree, child tails included, joined with
    /// the given separator between text fragments.
    #[must_use]
    pub fn iter_text(&self, separator: &str) -> String {
        let mut parts: Vec<String> = Vec::new();
        self.collect_text(&mut parts);
        parts.join(separator)
    }

    fn collect_text(&self, parts: &mut Vec<String>) {
        if let Some(text) = self.text.as_deref() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }
        for child in &self.children {
            child.collect_text(parts);
            if let Some(tail) = child.tail.as_deref() {
                let trimmed = tail.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
        }
    }

    /// Remove `Done` tombstones from the whole subtree, merging their
    /// tails into the preceding sibling (or the parent text) so no text
    /// is lost.
    pub fn strip_done(&mut self) {
        let mut kept: Vec<Node> = Vec::with_capacity(self.children.len());
        for mut child in self.children.drain(..) {
            child.strip_done();
            if child.tag == Tag::Done {
                if let Some(tail) = child.tail.take() {
                    if !tail.trim().is_empty() {
                        match kept.last_mut() {
                            Some(prev) => append_text(&mut prev.tail, &tail),
                            None => append_text(&mut self.text, &tail),
                        }
                    }
                }
            } else {
                kept.push(child);
            }
        }
        self.children = kept;
    }

    /// Inline every `Hi`/`Del` node into plain text. Used as the single
    /// recovery attempt when the tree exceeds `max_tree_size`.
    pub fn strip_formatting(&mut self) {
        let mut kept: Vec<Node> = Vec::with_capacity(self.children.len());
        for mut child in self.children.drain(..) {
            child.strip_formatting();
            if matches!(child.tag, Tag::Hi | Tag::Del) {
                let mut merged = String::new();
                if let Some(text) = child.text.take() {
                    merged.push_str(&text);
                }
                for grandchild in &child.children {
                    let inner = grandchild.iter_text(" ");
                    if !inner.is_empty() {
                        if !merged.is_empty() {
                            merged.push(' ');
                        }
                        merged.push_str(&inner);
                    }
                }
                if let Some(tail) = child.tail.take() {
                    if !merged.is_empty() && !tail.trim().is_empty() {
                        merged.push(' ');
                    }
                    merged.push_str(tail.trim());
                }
                let merged = merged.trim().to_string();
                if !merged.is_empty() {
                    match kept.last_mut() {
                        Some(prev) => append_text(&mut prev.tail, &merged),
                        None => append_text(&mut self.text, &merged),
                    }
                }
            } else {
                kept.push(child);
            }
        }
        self.children = kept;
    }

    /// Drop a trailing line break child, if any.
    pub fn trim_trailing_break(&mut self) {
        while self
            .children
            .last()
            .is_some_and(|c| c.tag == Tag::Lb && c.tail.as_deref().unwrap_or("").trim().is_empty())
        {
            self.children.pop();
        }
    }
}

fn append_text(slot: &mut Option<String>, extra: &str) {
    let extra = extra.trim();
    if extra.is_empty() {
        return;
    }
    match slot {
        Some(existing) if !existing.trim().is_empty() => {
            existing.push(' ');
            existing.push_str(extra);
        }
        _ => *slot = Some(extra.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(text: &str) -> Node {
        Node::with_text(Tag::P, text)
    }

    #[test]
    fn test_descendant_count() {
        let mut body = Node::new(Tag::Body);
        let mut list = Node::new(Tag::List);
        list.append(Node::with_text(Tag::Item, "one"));
        list.append(Node::with_text(Tag::Item, "two"));
        body.append(list);
        body.append(paragraph("text"));

        assert_eq!(body.descendant_count(), 4);
    }

    #[test]
    fn test_iter_text_includes_tails() {
        let mut p = paragraph("start");
        let mut hi = Node::with_text(Tag::Hi, "bold");
        hi.tail = Some("end".to_string());
        p.append(hi);

        assert_eq!(p.iter_text(" "), "start bold end");
    }

    #[test]
    fn test_strip_done_preserves_tail() {
        let mut body = Node::new(Tag::Body);
        body.append(paragraph("kept"));
        let mut done = Node::new(Tag::Done);
        done.tail = Some("orphan tail".to_string());
        body.append(done);

        body.strip_done();

        assert_eq!(body.children.len(), 1);
        assert_eq!(body.children[0].tail.as_deref(), Some("orphan tail"));
    }

    #[test]
    fn test_strip_formatting_merges_text() {
        let mut p = paragraph("before");
        let mut hi = Node::with_text(Tag::Hi, "emphasis");
        hi.tail = Some("after".to_string());
        p.append(hi);

        p.strip_formatting();

        assert!(p.children.is_empty());
        assert_eq!(p.text.as_deref(), Some("before emphasis after"));
    }

    #[test]
    fn test_has_content_ignores_punctuation() {
        let p = paragraph("!!!");
        assert!(!p.has_content());
        let p = paragraph("ok!");
        assert!(p.has_content());
    }

    #[test]
    fn test_has_content_graphic_with_src() {
        let mut img = Node::new(Tag::Graphic);
        img.src = Some("photo.jpg".to_string());
        assert!(img.has_content());
    }

    #[test]
    fn test_trim_trailing_break() {
        let mut p = paragraph("text");
        p.append(Node::new(Tag::Lb));
        p.trim_trailing_break();
        assert!(p.children.is_empty());

        // A break with tail text stays.
        let mut lb = Node::new(Tag::Lb);
        lb.tail = Some("more".to_string());
        p.append(lb);
        p.trim_trailing_break();
        assert_eq!(p.children.len(), 1);
    }
}
