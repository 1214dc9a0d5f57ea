//! Element handlers: the tag-dispatch transducer.
//!
//! Each handler receives a raw DOM subtree and either returns a canonical
//! node or `None` when the subtree carries nothing usable (whitespace
//! only, noise phrase, flagged duplicate). All text funnels through the
//! noise-phrase filter and, when enabled, the paragraph-level duplicate
//! test before acceptance.

use dom_query::Selection;

use crate::dom;
use crate::options::ExtractorOptions;
use crate::patterns::{is_noise_phrase, text_chars_test, trim_whitespace};
use crate::tree::{Node, Tag};

use super::state::ExtractionState;

/// Raw tags handled as inline highlighting, with their rendition codes.
#[must_use]
pub fn hi_rend(tag: &str) -> Option<&'static str> {
    match tag {
        "b" | "strong" => Some("#b"),
        "i" | "em" => Some("#i"),
        "u" => Some("#u"),
        "tt" | "kbd" | "samp" | "var" => Some("#t"),
        "sub" => Some("#sub"),
        "sup" => Some("#sup"),
        "mark" => Some("#b"),
        _ => None,
    }
}

/// Whether a raw tag is one of the list container tags.
#[must_use]
pub fn is_list_tag(tag: &str) -> bool {
    matches!(tag, "ul" | "ol" | "dl")
}

/// Whether a raw tag is one of the quote/preformatted tags.
#[must_use]
pub fn is_quote_tag(tag: &str) -> bool {
    matches!(tag, "blockquote" | "pre" | "q")
}

/// Whether a raw tag is a heading.
#[must_use]
pub fn is_heading_tag(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "summary")
}

/// Whether a raw tag is a line break.
#[must_use]
pub fn is_break_tag(tag: &str) -> bool {
    matches!(tag, "br" | "hr")
}

// === Text acceptance ===

/// Reject text that is empty, non-alphanumeric or a known noise phrase.
#[must_use]
pub fn usable_text(text: &str) -> bool {
    if !text_chars_test(text) {
        return false;
    }
    !text.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && is_noise_phrase(line)
    })
}

/// Full acceptance test: noise filter plus the duplicate test.
fn accept_text(text: &str, options: &ExtractorOptions) -> bool {
    if !usable_text(text) {
        return false;
    }
    if options.deduplicate && options.dedup_cache.is_duplicate(text, options) {
        log::debug!("dropping repeated segment: {:.60}...", text);
        return false;
    }
    true
}

// === Inline assembly ===

/// Append text to a node under construction: before any child it extends
/// the node text, afterwards the tail of the last child.
fn push_text(target: &mut Node, text: &str) {
    let text = trim_whitespace(text);
    if text.is_empty() {
        return;
    }
    let slot = match target.children.last_mut() {
        Some(last) => &mut last.tail,
        None => &mut target.text,
    };
    match slot {
        Some(existing) => {
            existing.push(' ');
            existing.push_str(&text);
        }
        None => *slot = Some(text),
    }
}

/// Fold the child nodes of a raw element into `target`.
///
/// Links, formatting, images and line breaks become canonical children
/// when the corresponding option admits them and text otherwise; nested
/// lists recurse through the list handler; nested paragraphs are merged
/// into the running text rather than nested (broken markup repair);
/// anything else is flattened to its text.
fn fold_inline(
    element: &Selection,
    target: &mut Node,
    state: &mut ExtractionState,
    options: &ExtractorOptions,
) {
    let Some(root) = element.nodes().first() else {
        return;
    };

    for child in root.children() {
        if child.is_text() {
            push_text(target, &child.text());
            continue;
        }
        if !child.is_element() {
            continue;
        }

        let child_sel = Selection::from(child);
        let tag = dom::tag_name(&child_sel).unwrap_or_default();
        state.mark_done(child.id);

        if let Some(rend) = hi_rend(&tag) {
            if options.include_formatting {
                let mut hi = Node::new(Tag::Hi);
                hi.rend = Some(rend.to_string());
                fold_inline(&child_sel, &mut hi, state, options);
                if hi.has_content() {
                    target.append(hi);
                }
            } else {
                fold_inline(&child_sel, target, state, options);
            }
            continue;
        }

        match tag.as_str() {
            "a" => {
                if options.include_links {
                    let mut link = Node::new(Tag::Ref);
                    link.target = dom::attr(&child_sel, "href")
                        .map(|href| resolve_link(href.trim(), options));
                    fold_inline(&child_sel, &mut link, state, options);
                    if link.has_content() {
                        target.append(link);
                    }
                } else {
                    fold_inline(&child_sel, target, state, options);
                }
            }
            "del" | "s" | "strike" => {
                if options.include_formatting {
                    let mut del = Node::new(Tag::Del);
                    del.rend = Some("overstrike".to_string());
                    fold_inline(&child_sel, &mut del, state, options);
                    if del.has_content() {
                        target.append(del);
                    }
                } else {
                    fold_inline(&child_sel, target, state, options);
                }
            }
            "br" | "hr" => {
                target.append(Node::new(Tag::Lb));
            }
            "img" => {
                if options.include_images {
                    if let Some(graphic) = handle_image(&child_sel) {
                        target.append(graphic);
                    }
                }
            }
            "ul" | "ol" | "dl" => {
                if let Some(list) = handle_lists(&child_sel, state, options) {
                    target.append(list);
                }
            }
            // Erroneous nesting: fold the inner paragraph's text into the
            // running text instead of nesting tags.
            "p" => fold_inline(&child_sel, target, state, options),
            _ => fold_inline(&child_sel, target, state, options),
        }
    }
}

fn resolve_link(href: &str, options: &ExtractorOptions) -> String {
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("data:")
        || href.starts_with("http://")
        || href.starts_with("https://")
    {
        return href.to_string();
    }
    if let Some(rest) = href.strip_prefix("//") {
        return format!("https://{rest}");
    }
    if let Some(base) = options.url.as_deref() {
        if let Ok(base_url) = url::Url::parse(base) {
            if let Ok(absolute) = base_url.join(href) {
                return absolute.to_string();
            }
        }
    }
    href.to_string()
}

// === Handlers ===

/// Process a paragraph element along with its children.
#[must_use]
pub fn handle_paragraphs(
    element: &Selection,
    state: &mut ExtractionState,
    options: &ExtractorOptions,
) -> Option<Node> {
    let mut paragraph = Node::new(Tag::P);
    fold_inline(element, &mut paragraph, state, options);
    paragraph.trim_trailing_break();

    if !paragraph.has_content() {
        return None;
    }
    if !accept_text(&paragraph.iter_text(" "), options) {
        return None;
    }
    paragraph.tail = nonempty(dom::element_tail(element));
    Some(paragraph)
}

/// Process a heading (h1-h6, summary).
#[must_use]
pub fn handle_titles(
    element: &Selection,
    state: &mut ExtractionState,
    options: &ExtractorOptions,
) -> Option<Node> {
    let tag = dom::tag_name(element).unwrap_or_default();
    let mut head = Node::new(Tag::Head);
    if tag.starts_with('h') {
        head.rend = Some(tag);
    }
    fold_inline(element, &mut head, state, options);

    if !head.has_content() || !accept_text(&head.iter_text(" "), options) {
        return None;
    }
    Some(head)
}

/// Process a list container with its items, recursing through nested
/// lists and reattaching trailing tail text to the last meaningful
/// sub-child.
#[must_use]
pub fn handle_lists(
    element: &Selection,
    state: &mut ExtractionState,
    options: &ExtractorOptions,
) -> Option<Node> {
    let mut list = Node::new(Tag::List);
    if dom::tag_name(element).as_deref() == Some("ol") {
        list.rend = Some("ordered".to_string());
    }

    // Stray text directly inside the container becomes a leading item.
    let direct = trim_whitespace(&dom::element_text(element));
    if !direct.is_empty() {
        list.append(Node::with_text(Tag::Item, direct));
    }

    for item in dom::iter_elements(element, &["li", "dt", "dd"]) {
        let Some(item_node) = item.nodes().first().copied() else {
            continue;
        };
        if state.is_done(item_node.id) {
            continue;
        }
        state.mark_done(item_node.id);

        let mut canonical = Node::new(Tag::Item);
        fold_inline(&item, &mut canonical, state, options);

        // Reattach the item's tail to its last meaningful sub-child so
        // text flow survives serialization.
        let tail = trim_whitespace(&dom::element_tail(&item));
        if !tail.is_empty() {
            match canonical.children.last_mut() {
                Some(last) => match &mut last.tail {
                    Some(existing) => {
                        existing.push(' ');
                        existing.push_str(&tail);
                    }
                    None => last.tail = Some(tail),
                },
                None => push_text(&mut canonical, &tail),
            }
        }

        if canonical.has_content() && accept_text(&canonical.iter_text(" "), options) {
            list.append(canonical);
        }
    }

    if let Some(id) = element.nodes().first().map(|n| n.id) {
        state.mark_done(id);
    }

    if list.has_content() {
        Some(list)
    } else {
        None
    }
}

/// Structural markers for verbatim code blocks.
#[must_use]
pub fn is_code_block_element(element: &Selection) -> bool {
    if dom::attr(element, "lang").is_some() {
        return true;
    }
    if dom::tag_name(element).as_deref() == Some("code") {
        return true;
    }
    // GitHub-style wrapper around the pre element.
    let parent = dom::parent(element);
    if !parent.is_empty()
        && dom::attr(&parent, "class").is_some_and(|c| c.contains("highlight"))
    {
        return true;
    }
    // highlight.js convention: a lone nested code element.
    element.select("code").length() > 0 && dom::children(element).length() == 1
}

/// Process quote and preformatted elements, detecting code blocks.
#[must_use]
pub fn handle_quotes(
    element: &Selection,
    state: &mut ExtractionState,
    options: &ExtractorOptions,
) -> Option<Node> {
    for descendant in dom::iter_elements(element, &[]) {
        if let Some(id) = descendant.nodes().first().map(|n| n.id) {
            state.mark_done(id);
        }
    }

    if is_code_block_element(element) {
        // Code is preserved verbatim, markup stripped, whitespace kept.
        let code_text = dom::text_content(element);
        if !text_chars_test(&code_text) {
            return None;
        }
        let mut code = Node::new(Tag::Code);
        code.text = Some(code_text.trim_matches('\n').to_string());
        return Some(code);
    }

    // Plain quote: nested markup is stripped, text kept.
    let text = trim_whitespace(&dom::text_content(element));
    if !accept_text(&text, options) {
        return None;
    }
    Some(Node::with_text(Tag::Quote, text))
}

/// Process inline formatting found outside a paragraph. Orphans are
/// wrapped in a synthetic paragraph unless the immediate parent is
/// itself a formatting-protected container.
#[must_use]
pub fn handle_formatting(
    element: &Selection,
    state: &mut ExtractionState,
    options: &ExtractorOptions,
) -> Option<Node> {
    let tag = dom::tag_name(element).unwrap_or_default();
    let text = trim_whitespace(&dom::text_content(element));
    if !accept_text(&text, options) {
        return None;
    }

    let formatted = if options.include_formatting {
        match hi_rend(&tag) {
            Some(rend) => {
                let mut hi = Node::with_text(Tag::Hi, text);
                hi.rend = Some(rend.to_string());
                hi
            }
            None if matches!(tag.as_str(), "del" | "s" | "strike") => {
                let mut del = Node::with_text(Tag::Del, text);
                del.rend = Some("overstrike".to_string());
                del
            }
            None => Node::with_text(Tag::P, text),
        }
    } else {
        Node::with_text(Tag::P, text)
    };

    if let Some(id) = element.nodes().first().map(|n| n.id) {
        state.mark_done(id);
    }

    let parent = dom::parent(element);
    let parent_tag = if parent.is_empty() {
        String::new()
    } else {
        dom::tag_name(&parent).unwrap_or_default()
    };
    let protected = matches!(
        parent_tag.as_str(),
        "p" | "td" | "th" | "li" | "dt" | "dd" | "blockquote" | "pre" | "q"
    ) || is_heading_tag(&parent_tag)
        || hi_rend(&parent_tag).is_some();

    if protected || formatted.tag == Tag::P {
        Some(formatted)
    } else {
        let mut wrapper = Node::new(Tag::P);
        wrapper.append(formatted);
        Some(wrapper)
    }
}

/// Process an image element: resolve the first valid source attribute
/// (lazy-load variants preferred), keep alt and title, normalize
/// protocol-relative URLs.
#[must_use]
pub fn handle_image(element: &Selection) -> Option<Node> {
    let mut source: Option<String> = None;

    if let Some(data_src) = dom::attr(element, "data-src") {
        if is_image_file(&data_src) {
            source = Some(data_src);
        }
    }
    if source.is_none() {
        if let Some(src) = dom::attr(element, "src") {
            if is_image_file(&src) {
                source = Some(src);
            }
        }
    }
    if source.is_none() {
        for (name, value) in dom::attributes(element) {
            if name.starts_with("data-src") && is_image_file(&value) {
                source = Some(value);
                break;
            }
        }
    }

    let mut src = source?;
    if let Some(rest) = src.strip_prefix("//") {
        src = format!("http://{rest}");
    }

    let mut graphic = Node::new(Tag::Graphic);
    graphic.src = Some(src);
    graphic.alt = dom::attr(element, "alt").filter(|a| !a.is_empty());
    graphic.title = dom::attr(element, "title").filter(|t| !t.is_empty());
    Some(graphic)
}

fn is_image_file(src: &str) -> bool {
    if src.is_empty() {
        return false;
    }
    let path = src.split('?').next().unwrap_or(src);
    let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();
    matches!(
        ext.as_str(),
        "jpg" | "jpeg" | "png" | "gif" | "webp" | "svg" | "bmp" | "ico" | "tiff" | "tif" | "avif"
    )
}

/// Process a single table into rows and cells.
#[must_use]
pub fn handle_table(
    element: &Selection,
    state: &mut ExtractionState,
    options: &ExtractorOptions,
) -> Option<Node> {
    let mut table = Node::new(Tag::Table);
    let mut current_row = Node::new(Tag::Row);
    let mut row_widths: Vec<usize> = Vec::new();
    let mut spans: Vec<usize> = Vec::new();

    let own_id = element.nodes().first().map(|n| n.id);

    for sub in dom::iter_elements(element, &[]) {
        let Some(sub_node) = sub.nodes().first().copied() else {
            continue;
        };
        let tag = dom::tag_name(&sub).unwrap_or_default();

        match tag.as_str() {
            "table" => {
                // Nested table: stop here rather than flattening it in.
                if Some(sub_node.id) != own_id {
                    break;
                }
            }
            "tr" => {
                if !current_row.children.is_empty() {
                    row_widths.push(spans.iter().sum());
                    table.append(std::mem::replace(&mut current_row, Node::new(Tag::Row)));
                    spans.clear();
                }
            }
            "td" | "th" => {
                let mut cell = Node::new(Tag::Cell);
                if tag == "th" {
                    cell.role = Some("head".to_string());
                }
                fold_cell(&sub, &mut cell, state, options);
                if cell.has_content() {
                    let colspan = dom::attr(&sub, "colspan")
                        .and_then(|v| v.parse::<usize>().ok())
                        .unwrap_or(1)
                        .max(1);
                    spans.push(colspan);
                    current_row.append(cell);
                }
            }
            _ => {}
        }

        state.mark_done(sub_node.id);
    }

    if !current_row.children.is_empty() {
        row_widths.push(spans.iter().sum());
        table.append(current_row);
    }

    if let Some(id) = own_id {
        state.mark_done(id);
    }

    if table.children.is_empty() {
        return None;
    }

    // The first row spanning the full table width is the header row.
    let max_width = row_widths.iter().copied().max().unwrap_or(0);
    if let Some(first_full) = row_widths.iter().position(|w| *w == max_width) {
        if let Some(row) = table.children.get_mut(first_full) {
            for cell in &mut row.children {
                cell.role = Some("head".to_string());
            }
        }
    }

    Some(table)
}

/// Fold a table cell's content, inlining nested non-table-structural
/// markup (paragraphs, links; lists only in recall mode).
fn fold_cell(
    cell: &Selection,
    target: &mut Node,
    state: &mut ExtractionState,
    options: &ExtractorOptions,
) {
    let Some(root) = cell.nodes().first() else {
        return;
    };
    for child in root.children() {
        if child.is_text() {
            push_text(target, &child.text());
            continue;
        }
        if !child.is_element() {
            continue;
        }
        let child_sel = Selection::from(child);
        let tag = dom::tag_name(&child_sel).unwrap_or_default();
        state.mark_done(child.id);

        if is_list_tag(&tag) {
            if options.favor_recall() {
                if let Some(list) = handle_lists(&child_sel, state, options) {
                    target.append(list);
                }
            }
        } else {
            // Paragraphs, formatting and everything else flatten into
            // the cell text.
            fold_cell(&child_sel, target, state, options);
        }
    }
}

/// Handle diverse or unknown elements within the scope of admissible
/// tags: code-classed containers and, with a widened vocabulary,
/// paragraph promotion for generic containers.
#[must_use]
pub fn handle_other_elements(
    element: &Selection,
    state: &mut ExtractionState,
    options: &ExtractorOptions,
) -> Option<Node> {
    let tag = dom::tag_name(element).unwrap_or_default();

    if tag == "div" {
        let class = dom::attr(element, "class").unwrap_or_default();
        if class.contains("w3-code") {
            let code_text = dom::text_content(element);
            for descendant in dom::iter_elements(element, &[]) {
                if let Some(id) = descendant.nodes().first().map(|n| n.id) {
                    state.mark_done(id);
                }
            }
            if !text_chars_test(&code_text) {
                return None;
            }
            let mut code = Node::new(Tag::Code);
            code.text = Some(code_text.trim_matches('\n').to_string());
            return Some(code);
        }
    }

    if !state.is_potential_tag(&tag) {
        return None;
    }

    // Only containers carrying their own text are promoted; pure
    // wrapper divs are left alone so their children stay reachable.
    if (tag == "div" || tag == "details")
        && text_chars_test(&dom::element_text(element))
    {
        let mut paragraph = Node::new(Tag::P);
        fold_inline(element, &mut paragraph, state, options);
        if paragraph.has_content() && accept_text(&paragraph.iter_text(" "), options) {
            return Some(paragraph);
        }
    }

    None
}

fn nonempty(text: String) -> Option<String> {
    let text = trim_whitespace(&text);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ExtractionState {
        ExtractionState::new(&ExtractorOptions::default())
    }

    #[test]
    fn test_handle_paragraphs_simple() {
        let doc = dom::parse("<p>A plain paragraph.</p>");
        let node = handle_paragraphs(
            &doc.select("p"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        assert_eq!(node.map(|n| n.iter_text(" ")), Some("A plain paragraph.".to_string()));
    }

    #[test]
    fn test_handle_paragraphs_merges_nested() {
        let doc = dom::parse("<p>Outer <p>inner</p></p>");
        let p = doc.select("p").first();
        let node = handle_paragraphs(&p, &mut state(), &ExtractorOptions::default());
        // Broken nesting is flattened into one paragraph.
        let node = node.map(|n| n.iter_text(" ")).unwrap_or_default();
        assert!(node.contains("Outer"));
    }

    #[test]
    fn test_handle_paragraphs_rejects_noise() {
        let doc = dom::parse("<p>Share on Facebook</p>");
        let node = handle_paragraphs(
            &doc.select("p"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        assert!(node.is_none());
    }

    #[test]
    fn test_handle_paragraphs_empty() {
        let doc = dom::parse("<p>   </p>");
        let node = handle_paragraphs(
            &doc.select("p"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        assert!(node.is_none());
    }

    #[test]
    fn test_handle_paragraphs_keeps_link_when_enabled() {
        let options = ExtractorOptions {
            include_links: true,
            ..ExtractorOptions::default()
        };
        let doc = dom::parse(r#"<p>Read <a href="/doc">the document</a> now.</p>"#);
        let mut st = ExtractionState::new(&options);
        let node = handle_paragraphs(&doc.select("p"), &mut st, &options);

        let node = node.unwrap_or_else(|| Node::new(Tag::P));
        assert!(node.children.iter().any(|c| c.tag == Tag::Ref));
    }

    #[test]
    fn test_handle_paragraphs_inlines_link_text_when_disabled() {
        let doc = dom::parse(r#"<p>Read <a href="/doc">the document</a> now.</p>"#);
        let node = handle_paragraphs(
            &doc.select("p"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        let node = node.unwrap_or_else(|| Node::new(Tag::P));
        assert!(node.children.is_empty());
        assert_eq!(node.text.as_deref(), Some("Read the document now."));
    }

    #[test]
    fn test_handle_formatting_orphan_wrapped() {
        let options = ExtractorOptions {
            include_formatting: true,
            ..ExtractorOptions::default()
        };
        let doc = dom::parse("<div><b>Important notice text</b></div>");
        let mut st = ExtractionState::new(&options);
        let node = handle_formatting(&doc.select("b"), &mut st, &options);

        let node = node.unwrap_or_else(|| Node::new(Tag::P));
        assert_eq!(node.tag, Tag::P);
        assert_eq!(node.children.first().map(|c| c.tag), Some(Tag::Hi));
    }

    #[test]
    fn test_handle_formatting_without_formatting_option() {
        let doc = dom::parse("<div><b>Important notice text</b></div>");
        let node = handle_formatting(
            &doc.select("b"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        let node = node.unwrap_or_else(|| Node::new(Tag::Body));
        assert_eq!(node.tag, Tag::P);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_handle_lists_items() {
        let doc = dom::parse("<ul><li>first entry</li><li>second entry</li></ul>");
        let node = handle_lists(
            &doc.select("ul"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        let node = node.unwrap_or_else(|| Node::new(Tag::List));
        assert_eq!(node.children.len(), 2);
        assert!(node.children.iter().all(|c| c.tag == Tag::Item));
    }

    #[test]
    fn test_handle_lists_nested() {
        let doc = dom::parse("<ul><li>outer entry<ul><li>nested entry</li></ul></li></ul>");
        let ul = doc.select("ul").first();
        let node = handle_lists(&ul, &mut state(), &ExtractorOptions::default());
        let node = node.unwrap_or_else(|| Node::new(Tag::List));

        let text = node.iter_text(" ");
        assert!(text.contains("outer entry"));
        assert!(text.contains("nested entry"));
        // The nested container sits inside the first item, not beside it.
        assert_eq!(node.children.len(), 1);
        assert!(node.children[0].children.iter().any(|c| c.tag == Tag::List));
    }

    #[test]
    fn test_handle_lists_tail_reattached() {
        let doc = dom::parse("<ul><li><span>styled</span></li> trailing</ul>");
        let node = handle_lists(
            &doc.select("ul"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        assert!(node.is_some());
    }

    #[test]
    fn test_handle_lists_empty() {
        let doc = dom::parse("<ul></ul>");
        let node = handle_lists(
            &doc.select("ul"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        assert!(node.is_none());
    }

    #[test]
    fn test_handle_quotes_plain() {
        let doc = dom::parse("<blockquote><p>Quoted words</p> here</blockquote>");
        let node = handle_quotes(
            &doc.select("blockquote"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        let node = node.unwrap_or_else(|| Node::new(Tag::Quote));
        assert_eq!(node.tag, Tag::Quote);
        // Nested markup stripped, text kept.
        assert!(node.children.is_empty());
        assert!(node.text.unwrap_or_default().contains("Quoted words"));
    }

    #[test]
    fn test_handle_quotes_detects_code_by_lang() {
        let doc = dom::parse(r#"<pre lang="rust">fn main() {}</pre>"#);
        let node = handle_quotes(
            &doc.select("pre"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        assert_eq!(node.map(|n| n.tag), Some(Tag::Code));
    }

    #[test]
    fn test_handle_quotes_detects_lone_code_child() {
        let doc = dom::parse("<pre><code>let x = 1;</code></pre>");
        let node = handle_quotes(
            &doc.select("pre"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        assert_eq!(node.map(|n| n.tag), Some(Tag::Code));
    }

    #[test]
    fn test_handle_quotes_detects_highlight_ancestor() {
        let doc = dom::parse(r#"<div class="highlight"><pre>code here</pre></div>"#);
        let node = handle_quotes(
            &doc.select("pre"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        assert_eq!(node.map(|n| n.tag), Some(Tag::Code));
    }

    #[test]
    fn test_handle_image_prefers_data_src() {
        let doc = dom::parse(r#"<img data-src="lazy.png" src="pixel.gif" alt="a chart">"#);
        let node = handle_image(&doc.select("img"));
        let node = node.unwrap_or_else(|| Node::new(Tag::Graphic));
        assert_eq!(node.src.as_deref(), Some("lazy.png"));
        assert_eq!(node.alt.as_deref(), Some("a chart"));
    }

    #[test]
    fn test_handle_image_protocol_relative() {
        let doc = dom::parse(r#"<img src="//cdn.example.org/pic.jpg">"#);
        let node = handle_image(&doc.select("img"));
        assert_eq!(
            node.and_then(|n| n.src),
            Some("http://cdn.example.org/pic.jpg".to_string())
        );
    }

    #[test]
    fn test_handle_image_rejects_non_image() {
        let doc = dom::parse(r#"<img src="tracker.php">"#);
        assert!(handle_image(&doc.select("img")).is_none());
    }

    #[test]
    fn test_handle_table_rows_and_header() {
        let doc = dom::parse(
            "<table><tr><td>alpha</td><td>beta</td></tr><tr><td>1</td><td>2</td></tr></table>",
        );
        let node = handle_table(
            &doc.select("table"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        let node = node.unwrap_or_else(|| Node::new(Tag::Table));

        assert_eq!(node.children.len(), 2);
        // First full-width row tagged as header.
        assert!(node.children[0]
            .children
            .iter()
            .all(|c| c.role.as_deref() == Some("head")));
        assert!(node.children[1]
            .children
            .iter()
            .all(|c| c.role.is_none()));
    }

    #[test]
    fn test_handle_table_colspan_width() {
        let doc = dom::parse(
            "<table><tr><td colspan=\"2\">span</td></tr><tr><td>a</td><td>b</td></tr></table>",
        );
        let node = handle_table(
            &doc.select("table"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        let node = node.unwrap_or_else(|| Node::new(Tag::Table));
        // Both rows have width 2; the first one becomes the header row.
        assert!(node.children[0]
            .children
            .iter()
            .all(|c| c.role.as_deref() == Some("head")));
    }

    #[test]
    fn test_handle_table_empty() {
        let doc = dom::parse("<table><tr></tr></table>");
        let node = handle_table(
            &doc.select("table"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        assert!(node.is_none());
    }

    #[test]
    fn test_handle_table_cell_list_recall_only() {
        let html = "<table><tr><td><ul><li>inside list</li></ul></td></tr></table>";

        let doc = dom::parse(html);
        let node = handle_table(
            &doc.select("table"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        // Balanced mode drops the list inside the cell.
        assert!(node.is_none());

        let options = ExtractorOptions {
            focus: crate::options::Focus::Recall,
            ..ExtractorOptions::default()
        };
        let doc = dom::parse(html);
        let mut st = ExtractionState::new(&options);
        let node = handle_table(&doc.select("table"), &mut st, &options);
        let text = node.map(|n| n.iter_text(" ")).unwrap_or_default();
        assert!(text.contains("inside list"));
    }

    #[test]
    fn test_handle_other_elements_w3_code() {
        let doc = dom::parse(r#"<div class="w3-code">x = y + 1</div>"#);
        let node = handle_other_elements(
            &doc.select("div"),
            &mut state(),
            &ExtractorOptions::default(),
        );
        assert_eq!(node.map(|n| n.tag), Some(Tag::Code));
    }

    #[test]
    fn test_handle_other_elements_div_needs_widened_vocabulary() {
        let doc = dom::parse("<div>Loose text in a container.</div>");
        let mut st = state();
        assert!(handle_other_elements(
            &doc.select("div"),
            &mut st,
            &ExtractorOptions::default()
        )
        .is_none());

        st.add_potential_tag("div");
        let node = handle_other_elements(
            &doc.select("div"),
            &mut st,
            &ExtractorOptions::default(),
        );
        assert_eq!(node.map(|n| n.tag), Some(Tag::P));
    }

    #[test]
    fn test_dedup_drops_repeated_paragraphs() {
        let options = ExtractorOptions {
            deduplicate: true,
            min_duplcheck_size: 10,
            max_repetitions: 2,
            ..ExtractorOptions::default()
        };
        let mut st = ExtractionState::new(&options);
        let html = "<p>This exact paragraph text repeats itself far too many times.</p>";

        let mut kept = 0;
        for _ in 0..5 {
            let doc = dom::parse(html);
            if handle_paragraphs(&doc.select("p"), &mut st, &options).is_some() {
                kept += 1;
            }
        }
        assert_eq!(kept, 3);
    }
}
