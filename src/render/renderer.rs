//! Markdown to node tree
//!
//! Runs directive splitting first, then feeds each markdown segment
//! through `pulldown-cmark` and folds the event stream into [`Node`]s.
//! Link reference definitions are collected from every segment up front so
//! `[text][ref]` resolves inside directive bodies too.
//! Rendering is total: every input produces a tree.

use std::collections::HashMap;

use pulldown_cmark::{Alignment, BrokenLink, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag};

use super::code::{CodeBlock, CodeHeader, CopyAction};
use super::directive::{self, DirectiveKind, Segment};
use super::highlight::{self, Language};
use super::node::{Align, ExternalLink, HighlightedCode, Image, Node};

/// Rendering parameters fixed at construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Path prefix for relative image sources (set for production builds).
    /// Absolute URLs (`scheme://`, `//`, `data:`) are never prefixed.
    pub asset_prefix: Option<String>,
}

impl RenderOptions {
    pub fn with_asset_prefix(prefix: impl Into<String>) -> Self {
        Self {
            asset_prefix: Some(prefix.into()),
        }
    }
}

/// Pure markdown renderer
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Renders a markdown document
    pub fn render(&self, source: &str) -> Vec<Node> {
        let definitions = link_definitions(source);
        self.render_segments(source, &definitions)
    }

    fn render_segments(&self, source: &str, definitions: &LinkDefinitions) -> Vec<Node> {
        let mut nodes = Vec::new();
        for segment in directive::split(source) {
            match segment {
                Segment::Markdown(text) => nodes.extend(self.render_markdown(&text, definitions)),
                Segment::Directive(d) => {
                    let children = self.render_segments(&d.body, definitions);
                    nodes.push(render_directive(d.kind, d.label, children));
                }
            }
        }
        nodes
    }

    fn render_markdown(&self, text: &str, definitions: &LinkDefinitions) -> Vec<Node> {
        // Only fires for references the segment itself does not define
        let mut resolve = |link: BrokenLink<'_>| {
            definitions
                .get(&normalize_label(&link.reference))
                .map(|(dest, title)| (CowStr::from(dest.clone()), CowStr::from(title.clone())))
        };

        let mut builder = TreeBuilder::new(self);
        for event in Parser::new_with_broken_link_callback(text, markdown_options(), Some(&mut resolve)) {
            builder.event(event);
        }
        builder.finish()
    }

    /// Applies the deployment prefix to relative asset paths
    pub fn rewrite_asset(&self, src: &str) -> String {
        match &self.options.asset_prefix {
            Some(prefix) if !is_absolute_url(src) => format!(
                "{}/{}",
                prefix.trim_end_matches('/'),
                src.trim_start_matches('/')
            ),
            _ => src.to_string(),
        }
    }
}

/// Normalized label to (destination, title)
type LinkDefinitions = HashMap<String, (String, String)>;

fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_FOOTNOTES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Reference definitions of every segment; the first definition of a label wins
fn link_definitions(source: &str) -> LinkDefinitions {
    let mut definitions = LinkDefinitions::new();
    collect_definitions(source, &mut definitions);
    definitions
}

fn collect_definitions(source: &str, definitions: &mut LinkDefinitions) {
    for segment in directive::split(source) {
        match segment {
            Segment::Markdown(text) => {
                let parser = Parser::new_ext(&text, markdown_options());
                for (label, def) in parser.reference_definitions().iter() {
                    let title = def.title.as_ref().map(|t| t.to_string()).unwrap_or_default();
                    definitions
                        .entry(normalize_label(label))
                        .or_insert_with(|| (def.dest.to_string(), title));
                }
            }
            Segment::Directive(d) => collect_definitions(&d.body, definitions),
        }
    }
}

/// Case-insensitive label with collapsed whitespace
fn normalize_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Single dispatch point for directive rendering
fn render_directive(kind: DirectiveKind, label: Option<String>, mut children: Vec<Node>) -> Node {
    match kind {
        DirectiveKind::Alert(kind) => Node::Alert {
            kind,
            label,
            children,
        },
        DirectiveKind::Unknown(_) => {
            if let Some(label) = label {
                children.insert(
                    0,
                    Node::Paragraph {
                        children: vec![Node::text(label)],
                    },
                );
            }
            Node::Block { children }
        }
    }
}

fn is_absolute_url(src: &str) -> bool {
    if src.starts_with("//") || src.starts_with("data:") {
        return true;
    }
    match src.split_once("://") {
        Some((scheme, _)) => !scheme.is_empty() && scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c)),
        None => false,
    }
}

fn render_code(block: CodeBlock) -> Node {
    let language = block.language.as_deref().and_then(Language::from_name);

    match language {
        Some(language) => {
            let header = block.filename.clone().map(|filename| CodeHeader {
                filename,
                copy: CopyAction::new(block.trimmed_source()),
            });
            Node::Code(HighlightedCode {
                language,
                header,
                lines: highlight::highlight(language, &block.source),
            })
        }
        None => Node::Preformatted {
            children: vec![Node::InlineCode { code: block.source }],
        },
    }
}

enum Frame {
    Root,
    Paragraph,
    Heading(u8),
    BlockQuote,
    List {
        start: Option<u64>,
        items: Vec<Vec<Node>>,
    },
    Item,
    Table {
        alignments: Vec<Align>,
        head: Vec<Vec<Node>>,
        rows: Vec<Vec<Vec<Node>>>,
    },
    TableHead(Vec<Vec<Node>>),
    TableRow(Vec<Vec<Node>>),
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link(String),
    Image(String),
    Footnote(String),
    Code {
        info: Option<String>,
        text: String,
    },
}

struct Open {
    frame: Frame,
    children: Vec<Node>,
}

/// Folds parser events into nodes using an explicit stack
struct TreeBuilder<'r> {
    renderer: &'r MarkdownRenderer,
    stack: Vec<Open>,
}

impl<'r> TreeBuilder<'r> {
    fn new(renderer: &'r MarkdownRenderer) -> Self {
        Self {
            renderer,
            stack: vec![Open {
                frame: Frame::Root,
                children: Vec::new(),
            }],
        }
    }

    fn open(&mut self, frame: Frame) {
        self.stack.push(Open {
            frame,
            children: Vec::new(),
        });
    }

    fn push(&mut self, node: Node) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        if let (Node::Text { text }, Some(Node::Text { text: prev })) = (&node, top.children.last_mut()) {
            prev.push_str(text);
            return;
        }
        top.children.push(node);
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => {
                if let Some(Open {
                    frame: Frame::Code { text: code, .. },
                    ..
                }) = self.stack.last_mut()
                {
                    code.push_str(&text);
                } else {
                    self.push(Node::text(text.to_string()));
                }
            }
            Event::Code(code) => self.push(Node::InlineCode {
                code: code.to_string(),
            }),
            Event::Html(html) => self.push(Node::Html {
                html: html.to_string(),
            }),
            Event::FootnoteReference(label) => self.push(Node::FootnoteReference {
                label: label.to_string(),
            }),
            // Soft breaks are kept as line breaks
            Event::SoftBreak | Event::HardBreak => self.push(Node::LineBreak),
            Event::Rule => self.push(Node::Rule),
            Event::TaskListMarker(checked) => self.push(Node::TaskMarker { checked }),
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => Frame::Paragraph,
            Tag::Heading(level, _, _) => Frame::Heading(level as u8),
            Tag::BlockQuote => Frame::BlockQuote,
            Tag::CodeBlock(kind) => Frame::Code {
                info: match kind {
                    CodeBlockKind::Fenced(info) => Some(info.to_string()),
                    CodeBlockKind::Indented => None,
                },
                text: String::new(),
            },
            Tag::List(start) => Frame::List {
                start,
                items: Vec::new(),
            },
            Tag::Item => Frame::Item,
            Tag::FootnoteDefinition(label) => Frame::Footnote(label.to_string()),
            Tag::Table(alignments) => Frame::Table {
                alignments: alignments.into_iter().map(align).collect(),
                head: Vec::new(),
                rows: Vec::new(),
            },
            Tag::TableHead => Frame::TableHead(Vec::new()),
            Tag::TableRow => Frame::TableRow(Vec::new()),
            Tag::TableCell => Frame::TableCell,
            Tag::Emphasis => Frame::Emphasis,
            Tag::Strong => Frame::Strong,
            Tag::Strikethrough => Frame::Strikethrough,
            Tag::Link(link_type, dest, _) => {
                let href = match link_type {
                    LinkType::Email => format!("mailto:{}", dest),
                    _ => dest.to_string(),
                };
                Frame::Link(href)
            }
            Tag::Image(_, src, _) => Frame::Image(src.to_string()),
        };
        self.open(frame);
    }

    fn end(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(Open { frame, children }) = self.stack.pop() else {
            return;
        };

        let node = match frame {
            Frame::Root => return,
            Frame::Paragraph => Node::Paragraph { children },
            Frame::Heading(level) => Node::Heading { level, children },
            Frame::BlockQuote => Node::BlockQuote { children },
            Frame::List { start, items } => Node::List { start, items },
            Frame::Item => {
                if let Some(Open {
                    frame: Frame::List { items, .. },
                    ..
                }) = self.stack.last_mut()
                {
                    items.push(children);
                }
                return;
            }
            Frame::Table {
                alignments,
                head,
                rows,
            } => Node::Table {
                alignments,
                head,
                rows,
            },
            Frame::TableHead(cells) => {
                if let Some(Open {
                    frame: Frame::Table { head, .. },
                    ..
                }) = self.stack.last_mut()
                {
                    *head = cells;
                }
                return;
            }
            Frame::TableRow(cells) => {
                match self.stack.last_mut().map(|open| &mut open.frame) {
                    Some(Frame::Table { rows, .. }) => rows.push(cells),
                    // Some parser versions wrap header cells in a row
                    Some(Frame::TableHead(head)) => *head = cells,
                    _ => {}
                }
                return;
            }
            Frame::TableCell => {
                if let Some(Open {
                    frame: Frame::TableHead(cells) | Frame::TableRow(cells),
                    ..
                }) = self.stack.last_mut()
                {
                    cells.push(children);
                }
                return;
            }
            Frame::Emphasis => Node::Emphasis { children },
            Frame::Strong => Node::Strong { children },
            Frame::Strikethrough => Node::Strikethrough { children },
            Frame::Link(href) => Node::Link(ExternalLink { href, children }),
            Frame::Image(src) => {
                let src = self.renderer.rewrite_asset(&src);
                let alt = children.iter().map(Node::plain_text).collect();
                Node::Image(Image {
                    href: src.clone(),
                    src,
                    alt,
                })
            }
            Frame::Footnote(label) => Node::FootnoteDefinition { label, children },
            Frame::Code { info, text } => render_code(CodeBlock::from_fence(info.as_deref().unwrap_or_default(), text)),
        };

        self.push(node);
    }

    fn finish(mut self) -> Vec<Node> {
        while self.stack.len() > 1 {
            self.end();
        }
        self.stack.pop().map(|open| open.children).unwrap_or_default()
    }
}

fn align(alignment: Alignment) -> Align {
    match alignment {
        Alignment::None => Align::None,
        Alignment::Left => Align::Left,
        Alignment::Center => Align::Center,
        Alignment::Right => Align::Right,
    }
}
