//! Minimal markdown-like text transform for post bodies.
//!
//! Recognized syntax:
//! - `# `, `## `, `### ` line prefixes become headings
//! - `**bold**` and `*italic*` inline markers
//! - a blank line becomes a break
//!
//! Everything else is plain text. Output nodes carry text only, and
//! [`to_html`] escapes it, so embedded markup is never passed through.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// 行内强调：**bold** 与 *italic*
static INLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*|\*(.+?)\*").expect("inline emphasis regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { inlines: Vec<Inline> },
    Break,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Strong(String),
    Emphasis(String),
}

impl Inline {
    pub fn text(&self) -> &str {
        match self {
            Inline::Text(t) | Inline::Strong(t) | Inline::Emphasis(t) => t,
        }
    }
}

/// Parse a body into blocks, one per input line.
pub fn parse(input: &str) -> Vec<Block> {
    input.lines().map(parse_line).collect()
}

fn parse_line(line: &str) -> Block {
    let line = line.trim_end_matches('\r');
    for (prefix, level) in [("### ", 3u8), ("## ", 2), ("# ", 1)] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return Block::Heading {
                level,
                text: rest.trim().to_string(),
            };
        }
    }
    if line.trim().is_empty() {
        return Block::Break;
    }
    Block::Paragraph {
        inlines: parse_inlines(line),
    }
}

/// Split a line into text and emphasis runs.
pub fn parse_inlines(line: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut cursor = 0;
    for caps in INLINE_RE.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > cursor {
            out.push(Inline::Text(line[cursor..whole.start()].to_string()));
        }
        if let Some(strong) = caps.get(1) {
            out.push(Inline::Strong(strong.as_str().to_string()));
        } else if let Some(em) = caps.get(2) {
            out.push(Inline::Emphasis(em.as_str().to_string()));
        }
        cursor = whole.end();
    }
    if cursor < line.len() {
        out.push(Inline::Text(line[cursor..].to_string()));
    }
    out
}

/// Text with inline markers removed. Used for snippets and terminal output.
pub fn plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|block| match block {
            Block::Heading { text, .. } => text.clone(),
            Block::Paragraph { inlines } => inlines.iter().map(Inline::text).collect(),
            Block::Break => String::new(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn to_html(blocks: &[Block]) -> String {
    let mut html = String::new();
    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                html.push_str(&format!("<h{level}>{}</h{level}>", escape_html(text)));
            }
            Block::Paragraph { inlines } => {
                html.push_str("<p>");
                for inline in inlines {
                    match inline {
                        Inline::Text(t) => html.push_str(&escape_html(t)),
                        Inline::Strong(t) => {
                            html.push_str(&format!("<strong>{}</strong>", escape_html(t)))
                        }
                        Inline::Emphasis(t) => {
                            html.push_str(&format!("<em>{}</em>", escape_html(t)))
                        }
                    }
                }
                html.push_str("</p>");
            }
            Block::Break => html.push_str("<br/>"),
        }
    }
    html
}
