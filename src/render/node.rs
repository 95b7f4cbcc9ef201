//! Renderable node tree
//!
//! The renderer's output. Front-ends (the terminal printer and the TUI
//! viewer) walk this tree; nothing here knows how it will be drawn.

use serde::Serialize;

use super::code::CodeHeader;
use super::highlight::{Language, Span};

/// Severity of an alert box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Info,
    Warning,
    Important,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Info => "info",
            AlertKind::Warning => "warning",
            AlertKind::Important => "important",
        }
    }
}

/// Column alignment in a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    None,
    Left,
    Center,
    Right,
}

/// A link forced into safe cross-origin navigation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExternalLink {
    pub href: String,
    pub children: Vec<Node>,
}

impl ExternalLink {
    /// Links always open in a new browsing context
    pub const TARGET: &'static str = "_blank";

    /// No opener handle and no referrer leak
    pub const REL: &'static str = "noopener noreferrer";
}

/// An image wrapped in a link to its full-size asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    /// Source after deployment prefix rewriting
    pub src: String,
    pub alt: String,
    /// Full-size asset opened in a new context; same as `src`
    pub href: String,
}

/// A syntax-highlighted code block
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightedCode {
    pub language: Language,
    /// Filename header with copy control, present when the fence named a file
    pub header: Option<CodeHeader>,
    /// Tokenized lines, trailing newline stripped
    pub lines: Vec<Vec<Span>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Paragraph { children: Vec<Node> },
    Heading { level: u8, children: Vec<Node> },
    Text { text: String },
    Emphasis { children: Vec<Node> },
    Strong { children: Vec<Node> },
    Strikethrough { children: Vec<Node> },
    InlineCode { code: String },
    LineBreak,
    Rule,
    BlockQuote { children: Vec<Node> },
    List { start: Option<u64>, items: Vec<Vec<Node>> },
    TaskMarker { checked: bool },
    Table { alignments: Vec<Align>, head: Vec<Vec<Node>>, rows: Vec<Vec<Vec<Node>>> },
    FootnoteReference { label: String },
    FootnoteDefinition { label: String, children: Vec<Node> },
    Html { html: String },
    Link(ExternalLink),
    Image(Image),
    Alert { kind: AlertKind, label: Option<String>, children: Vec<Node> },
    /// Content of an unsupported directive, rendered as a plain block
    Block { children: Vec<Node> },
    /// Unhighlighted code fence: a `pre` around plain inline code
    Preformatted { children: Vec<Node> },
    Code(HighlightedCode),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }

    /// Child nodes for container variants
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Paragraph { children }
            | Node::Heading { children, .. }
            | Node::Emphasis { children }
            | Node::Strong { children }
            | Node::Strikethrough { children }
            | Node::BlockQuote { children }
            | Node::FootnoteDefinition { children, .. }
            | Node::Alert { children, .. }
            | Node::Block { children }
            | Node::Preformatted { children } => children,
            Node::Link(link) => &link.children,
            _ => &[],
        }
    }

    /// Concatenated text content, ignoring formatting
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text { text } => out.push_str(text),
        Node::InlineCode { code } => out.push_str(code),
        Node::LineBreak => out.push('\n'),
        Node::Image(image) => out.push_str(&image.alt),
        Node::List { items, .. } => {
            for item in items {
                for child in item {
                    collect_text(child, out);
                }
            }
        }
        Node::Code(code) => {
            for (i, line) in code.lines.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                for span in line {
                    out.push_str(&span.text);
                }
            }
        }
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

/// Walks a tree depth-first, calling `f` on every node
pub fn walk<'a>(nodes: &'a [Node], f: &mut impl FnMut(&'a Node)) {
    for node in nodes {
        f(node);
        match node {
            Node::List { items, .. } => {
                for item in items {
                    walk(item, f);
                }
            }
            Node::Table { head, rows, .. } => {
                for cell in head {
                    walk(cell, f);
                }
                for row in rows {
                    for cell in row {
                        walk(cell, f);
                    }
                }
            }
            _ => walk(node.children(), f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_flattens_formatting() {
        let node = Node::Paragraph {
            children: vec![
                Node::text("Hello "),
                Node::Strong {
                    children: vec![Node::text("world")],
                },
                Node::InlineCode {
                    code: "!".to_string(),
                },
            ],
        };

        assert_eq!(node.plain_text(), "Hello world!");
    }

    #[test]
    fn walk_visits_list_items() {
        let nodes = vec![Node::List {
            start: None,
            items: vec![vec![Node::text("a")], vec![Node::text("b")]],
        }];

        let mut texts = Vec::new();
        walk(&nodes, &mut |node| {
            if let Node::Text { text } = node {
                texts.push(text.clone());
            }
        });

        assert_eq!(texts, vec!["a", "b"]);
    }
}
