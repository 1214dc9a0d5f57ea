//! Output serialization.
//!
//! Consumes a canonical tree exactly once and renders it as plain text,
//! Markdown, JSON or TEI-flavored XML. Formatting attributes (`rend`)
//! translate into target-syntax equivalents; control characters are
//! escaped or dropped so the output is always well-formed.

use serde::Serialize;

use crate::document::Document;
use crate::options::{ExtractorOptions, OutputFormat};
use crate::tree::{Node, Tag};

/// Serialize a document in the requested format.
#[must_use]
pub fn serialize(doc: &Document, options: &ExtractorOptions) -> String {
    match options.format {
        OutputFormat::Text => to_text(doc),
        OutputFormat::Markdown => to_markdown(doc),
        OutputFormat::Json => to_json(doc),
        OutputFormat::Xml => to_xml(doc),
    }
}

/// Remove control characters that would corrupt the output stream,
/// keeping ordinary whitespace.
fn clean_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect()
}

// === Plain text ===

/// Flattened text with blank lines between blocks.
#[must_use]
pub fn to_text(doc: &Document) -> String {
    let mut blocks: Vec<String> = Vec::new();
    collect_blocks(&doc.body, &mut blocks);
    if let Some(comments) = &doc.commentsbody {
        collect_blocks(comments, &mut blocks);
    }
    clean_control_chars(&blocks.join("\n\n"))
}

fn collect_blocks(node: &Node, blocks: &mut Vec<String>) {
    for child in &node.children {
        match child.tag {
            Tag::Table => {
                let mut rows: Vec<String> = Vec::new();
                for row in &child.children {
                    let cells: Vec<String> =
                        row.children.iter().map(|c| c.iter_text(" ")).collect();
                    if !cells.is_empty() {
                        rows.push(cells.join(" | "));
                    }
                }
                if !rows.is_empty() {
                    blocks.push(rows.join("\n"));
                }
            }
            Tag::List => {
                let items: Vec<String> = child
                    .children
                    .iter()
                    .map(|item| format!("- {}", item.iter_text(" ")))
                    .collect();
                if !items.is_empty() {
                    blocks.push(items.join("\n"));
                }
            }
            Tag::Code => {
                if let Some(code) = &child.text {
                    blocks.push(code.clone());
                }
            }
            Tag::Graphic => {
                if let Some(alt) = &child.alt {
                    blocks.push(format!("[{alt}]"));
                }
            }
            _ => {
                let text = child.iter_text(" ");
                if !text.is_empty() {
                    blocks.push(text);
                }
            }
        }
    }
}

// === Markdown ===

/// GitHub-flavored Markdown rendering.
#[must_use]
pub fn to_markdown(doc: &Document) -> String {
    let mut blocks: Vec<String> = Vec::new();
    markdown_blocks(&doc.body, &mut blocks);
    if let Some(comments) = &doc.commentsbody {
        blocks.push("---".to_string());
        markdown_blocks(comments, &mut blocks);
    }
    clean_control_chars(&blocks.join("\n\n"))
}

fn markdown_blocks(node: &Node, blocks: &mut Vec<String>) {
    for child in &node.children {
        match child.tag {
            Tag::Head => {
                let level = child
                    .rend
                    .as_deref()
                    .and_then(|r| r.strip_prefix('h'))
                    .and_then(|n| n.parse::<usize>().ok())
                    .unwrap_or(2)
                    .clamp(1, 6);
                blocks.push(format!("{} {}", "#".repeat(level), markdown_inline(child)));
            }
            Tag::List => {
                let items: Vec<String> = child
                    .children
                    .iter()
                    .map(|item| format!("- {}", markdown_inline(item)))
                    .collect();
                if !items.is_empty() {
                    blocks.push(items.join("\n"));
                }
            }
            Tag::Quote => {
                let text = markdown_inline(child);
                if !text.is_empty() {
                    let quoted: Vec<String> =
                        text.lines().map(|l| format!("> {l}")).collect();
                    blocks.push(quoted.join("\n"));
                }
            }
            Tag::Code => {
                let code = child.text.clone().unwrap_or_default();
                blocks.push(format!("```\n{code}\n```"));
            }
            Tag::Table => {
                if let Some(table) = markdown_table(child) {
                    blocks.push(table);
                }
            }
            Tag::Graphic => {
                let alt = child.alt.clone().unwrap_or_default();
                let src = child.src.clone().unwrap_or_default();
                blocks.push(format!("![{alt}]({src})"));
            }
            _ => {
                let text = markdown_inline(child);
                if !text.is_empty() {
                    blocks.push(text);
                }
            }
        }
    }
}

fn markdown_table(table: &Node) -> Option<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut width = 0;
    for (index, row) in table.children.iter().enumerate() {
        let cells: Vec<String> = row
            .children
            .iter()
            .map(|c| markdown_inline(c).replace('|', "\\|"))
            .collect();
        if cells.is_empty() {
            continue;
        }
        width = width.max(cells.len());
        lines.push(format!("| {} |", cells.join(" | ")));
        // Header separator after the first row.
        if index == 0 {
            lines.push(format!("|{}", " --- |".repeat(cells.len())));
        }
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Inline rendering with `rend` translated to Markdown emphasis.
fn markdown_inline(node: &Node) -> String {
    let mut out = String::new();
    if let Some(text) = &node.text {
        out.push_str(text);
    }
    for child in &node.children {
        let inner = markdown_inline(child);
        let rendered = match child.tag {
            Tag::Hi => match child.rend.as_deref() {
                Some("#i") => format!("*{inner}*"),
                Some("#t") => format!("`{inner}`"),
                // Bold covers #b and the rarer renditions.
                _ => format!("**{inner}**"),
            },
            Tag::Del => format!("~~{inner}~~"),
            Tag::Ref => {
                let target = child.target.clone().unwrap_or_default();
                format!("[{inner}]({target})")
            }
            Tag::Lb => "\n".to_string(),
            Tag::Graphic => format!(
                "![{}]({})",
                child.alt.clone().unwrap_or_default(),
                child.src.clone().unwrap_or_default()
            ),
            _ => inner,
        };
        if !out.is_empty() && !rendered.is_empty() && !rendered.starts_with('\n') {
            out.push(' ');
        }
        out.push_str(&rendered);
        if let Some(tail) = &child.tail {
            if !tail.is_empty() {
                out.push(' ');
                out.push_str(tail);
            }
        }
    }
    out.trim().to_string()
}

// === JSON ===

#[derive(Serialize)]
struct JsonDocument<'a> {
    #[serde(flatten)]
    metadata: &'a crate::document::Metadata,
    text: &'a str,
    comments: &'a str,
    fingerprint: &'a str,
}

/// JSON object with metadata and text fields.
#[must_use]
pub fn to_json(doc: &Document) -> String {
    let value = JsonDocument {
        metadata: &doc.metadata,
        text: &doc.text,
        comments: &doc.comments,
        fingerprint: &doc.fingerprint,
    };
    serde_json::to_string(&value).unwrap_or_default()
}

// === XML ===

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in clean_control_chars(text).chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// TEI-flavored XML rendering of the whole document.
#[must_use]
pub fn to_xml(doc: &Document) -> String {
    let mut out = String::from("<doc");
    for (name, value) in [
        ("title", &doc.metadata.title),
        ("author", &doc.metadata.author),
        ("url", &doc.metadata.url),
        ("hostname", &doc.metadata.hostname),
        ("sitename", &doc.metadata.sitename),
        ("license", &doc.metadata.license),
    ] {
        if let Some(value) = value {
            out.push_str(&format!(" {name}=\"{}\"", escape_xml(value)));
        }
    }
    out.push_str(&format!(" fingerprint=\"{}\">", escape_xml(&doc.fingerprint)));

    out.push_str("<main>");
    xml_children(&doc.body, &mut out);
    out.push_str("</main>");

    if let Some(comments) = &doc.commentsbody {
        out.push_str("<comments>");
        xml_children(comments, &mut out);
        out.push_str("</comments>");
    }

    out.push_str("</doc>");
    out
}

fn xml_children(node: &Node, out: &mut String) {
    for child in &node.children {
        xml_node(child, out);
    }
}

fn xml_node(node: &Node, out: &mut String) {
    if node.tag == Tag::Done {
        return;
    }
    if node.tag == Tag::Lb {
        out.push_str("<lb/>");
        if let Some(tail) = &node.tail {
            out.push_str(&escape_xml(tail));
        }
        return;
    }

    let name = node.tag.name();
    out.push('<');
    out.push_str(name);
    for (attr, value) in [
        ("rend", &node.rend),
        ("role", &node.role),
        ("target", &node.target),
        ("src", &node.src),
        ("alt", &node.alt),
        ("title", &node.title),
    ] {
        if let Some(value) = value {
            out.push_str(&format!(" {attr}=\"{}\"", escape_xml(value)));
        }
    }
    out.push('>');

    if let Some(text) = &node.text {
        out.push_str(&escape_xml(text));
    }
    xml_children(node, out);
    out.push_str(&format!("</{name}>"));

    if let Some(tail) = &node.tail {
        out.push_str(&escape_xml(tail));
    }
}
