//! Terminal presentation of rendered documents
//!
//! Lays a [`Node`] tree out as styled ratatui lines. The TUI draws these
//! directly; `tutor show` prints them with crossterm (or as plain text when
//! stdout is not a terminal).

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{self as cstyle, Attribute, Print, ResetColor, SetAttribute};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::render::{AlertKind, Align, HighlightedCode, Node, Rgb, Theme, TokenKind};

const RULE_WIDTH: usize = 40;

/// Hint shown in code headers
pub const COPY_HINT: &str = "[y] copy";

pub fn rgb((r, g, b): Rgb) -> Color {
    Color::Rgb(r, g, b)
}

fn alert_color(kind: AlertKind) -> Color {
    match kind {
        AlertKind::Info => Color::Blue,
        AlertKind::Warning => Color::Yellow,
        AlertKind::Important => Color::Red,
    }
}

fn alert_title(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Info => "Info",
        AlertKind::Warning => "Warning",
        AlertKind::Important => "Important",
    }
}

/// Lays out a document as styled terminal lines
pub fn document_lines(nodes: &[Node]) -> Vec<Line<'static>> {
    let mut out = Vec::new();
    blocks(nodes, &mut out);
    trim_trailing_blank(&mut out);
    out
}

/// Text of a line without styling
pub fn plain(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

fn is_inline(node: &Node) -> bool {
    matches!(
        node,
        Node::Text { .. }
            | Node::Emphasis { .. }
            | Node::Strong { .. }
            | Node::Strikethrough { .. }
            | Node::InlineCode { .. }
            | Node::LineBreak
            | Node::TaskMarker { .. }
            | Node::FootnoteReference { .. }
            | Node::Html { .. }
            | Node::Link(_)
            | Node::Image(_)
    )
}

fn blank() -> Line<'static> {
    Line::default()
}

fn trim_trailing_blank(lines: &mut Vec<Line<'static>>) {
    while lines.last().is_some_and(|line| line.spans.is_empty()) {
        lines.pop();
    }
}

/// Block layout. Runs of bare inline nodes (tight list items) form one
/// paragraph.
fn blocks(nodes: &[Node], out: &mut Vec<Line<'static>>) {
    let mut run: Vec<&Node> = Vec::new();

    for node in nodes {
        if is_inline(node) {
            run.push(node);
            continue;
        }
        if !run.is_empty() {
            paragraph(&run, Style::default(), out);
            run.clear();
        }
        block(node, out);
    }

    if !run.is_empty() {
        paragraph(&run, Style::default(), out);
    }
}

fn paragraph(nodes: &[&Node], style: Style, out: &mut Vec<Line<'static>>) {
    let mut lines = vec![Vec::new()];
    for node in nodes {
        inline(node, style, &mut lines);
    }
    out.extend(lines.into_iter().map(Line::from));
    out.push(blank());
}

fn block(node: &Node, out: &mut Vec<Line<'static>>) {
    match node {
        Node::Paragraph { children } => {
            let children: Vec<&Node> = children.iter().collect();
            paragraph(&children, Style::default(), out);
        }
        Node::Heading { level, children } => {
            let mut style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
            if *level == 1 {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            let mut lines = vec![vec![Span::styled(
                format!("{} ", "#".repeat(usize::from(*level))),
                style,
            )]];
            for child in children {
                inline(child, style, &mut lines);
            }
            out.extend(lines.into_iter().map(Line::from));
            out.push(blank());
        }
        Node::Rule => {
            out.push(Line::styled("─".repeat(RULE_WIDTH), Style::default().fg(Color::DarkGray)));
            out.push(blank());
        }
        Node::BlockQuote { children } => {
            let bar = Span::styled("│ ", Style::default().fg(Color::DarkGray));
            nested(children, bar.clone(), bar, out);
        }
        Node::List { start, items } => {
            for (i, item) in items.iter().enumerate() {
                let marker = match start {
                    Some(n) => format!("{}. ", n + i as u64),
                    None => "• ".to_string(),
                };
                let indent = " ".repeat(marker.chars().count());
                let mut lines = Vec::new();
                blocks(item, &mut lines);
                trim_trailing_blank(&mut lines);
                out.extend(prefixed(lines, Span::raw(marker), Span::raw(indent)));
            }
            out.push(blank());
        }
        Node::Table { alignments, head, rows } => table(alignments, head, rows, out),
        Node::FootnoteDefinition { label, children } => {
            let marker = format!("[^{}]: ", label);
            let indent = " ".repeat(marker.chars().count());
            let marker = Span::styled(marker, Style::default().fg(Color::DarkGray));
            nested(children, marker, Span::raw(indent), out);
        }
        Node::Alert { kind, label, children } => {
            let color = alert_color(*kind);
            let bar = Span::styled("▌ ", Style::default().fg(color));
            let title = label.clone().unwrap_or_else(|| alert_title(*kind).to_string());
            out.push(Line::from(vec![
                bar.clone(),
                Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)),
            ]));
            nested(children, bar.clone(), bar, out);
        }
        Node::Block { children } => blocks(children, out),
        Node::Preformatted { children } => {
            let text: String = children.iter().map(Node::plain_text).collect();
            let text = text.strip_suffix('\n').unwrap_or(&text);
            for line in text.split('\n') {
                out.push(Line::styled(format!("  {}", line), Style::default().fg(Color::Gray)));
            }
            out.push(blank());
        }
        Node::Code(code) => {
            out.extend(code_lines(code));
            out.push(blank());
        }
        other => {
            // Stray inline node at block level
            paragraph(&[other], Style::default(), out);
        }
    }
}

fn nested(children: &[Node], first: Span<'static>, rest: Span<'static>, out: &mut Vec<Line<'static>>) {
    let mut lines = Vec::new();
    blocks(children, &mut lines);
    trim_trailing_blank(&mut lines);
    out.extend(prefixed(lines, first, rest));
    out.push(blank());
}

fn prefixed(lines: Vec<Line<'static>>, first: Span<'static>, rest: Span<'static>) -> Vec<Line<'static>> {
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let lead = if i == 0 { first.clone() } else { rest.clone() };
            let mut spans = vec![lead];
            spans.extend(line.spans);
            Line::from(spans)
        })
        .collect()
}

fn inline(node: &Node, style: Style, lines: &mut Vec<Vec<Span<'static>>>) {
    let push = |lines: &mut Vec<Vec<Span<'static>>>, span: Span<'static>| {
        if let Some(line) = lines.last_mut() {
            line.push(span);
        }
    };

    match node {
        Node::Text { text } => {
            for (i, part) in text.split('\n').enumerate() {
                if i > 0 {
                    lines.push(Vec::new());
                }
                if !part.is_empty() {
                    push(lines, Span::styled(part.to_string(), style));
                }
            }
        }
        Node::LineBreak => lines.push(Vec::new()),
        Node::Emphasis { children } => {
            for child in children {
                inline(child, style.add_modifier(Modifier::ITALIC), lines);
            }
        }
        Node::Strong { children } => {
            for child in children {
                inline(child, style.add_modifier(Modifier::BOLD), lines);
            }
        }
        Node::Strikethrough { children } => {
            for child in children {
                inline(child, style.add_modifier(Modifier::CROSSED_OUT), lines);
            }
        }
        Node::InlineCode { code } => {
            push(lines, Span::styled(code.clone(), style.fg(rgb(Theme::color(TokenKind::String)))));
        }
        Node::TaskMarker { checked } => {
            let marker = if *checked { "[x] " } else { "[ ] " };
            push(lines, Span::styled(marker, style.fg(Color::Green)));
        }
        Node::FootnoteReference { label } => {
            push(lines, Span::styled(format!("[^{}]", label), style.fg(Color::DarkGray)));
        }
        Node::Html { html } => {
            push(lines, Span::styled(html.trim_end().to_string(), style.fg(Color::DarkGray)));
        }
        Node::Link(link) => {
            let link_style = style.fg(Color::LightBlue).add_modifier(Modifier::UNDERLINED);
            for child in &link.children {
                inline(child, link_style, lines);
            }
            push(lines, Span::styled(format!(" <{}>", link.href), style.fg(Color::DarkGray)));
        }
        Node::Image(image) => {
            let alt = if image.alt.is_empty() { "image" } else { image.alt.as_str() };
            push(lines, Span::styled(format!("[{}]", alt), style.fg(Color::Magenta)));
            push(lines, Span::styled(format!(" <{}>", image.href), style.fg(Color::DarkGray)));
        }
        other => {
            // Block node inside inline content: flatten to text
            push(lines, Span::styled(other.plain_text(), style));
        }
    }
}

/// Header and highlighted lines of a code block
pub fn code_lines(code: &HighlightedCode) -> Vec<Line<'static>> {
    let background = rgb(Theme::BACKGROUND);
    let mut out = Vec::with_capacity(code.lines.len() + 1);

    if let Some(header) = &code.header {
        let header_style = Style::default().bg(rgb(Theme::HEADER_BACKGROUND));
        out.push(Line::from(vec![
            Span::styled(format!(" {} ", header.filename), header_style.fg(Color::White)),
            Span::styled(format!(" {} ", COPY_HINT), header_style.fg(rgb(Theme::HEADER_LABEL))),
        ]));
    }

    for tokens in &code.lines {
        let mut spans = vec![Span::styled("  ", Style::default().bg(background))];
        spans.extend(tokens.iter().map(|token| {
            Span::styled(
                token.text.clone(),
                Style::default().fg(rgb(Theme::color(token.kind))).bg(background),
            )
        }));
        out.push(Line::from(spans));
    }
    out
}

fn table(alignments: &[Align], head: &[Vec<Node>], rows: &[Vec<Vec<Node>>], out: &mut Vec<Line<'static>>) {
    let cell_text = |cell: &Vec<Node>| -> String { cell.iter().map(Node::plain_text).collect() };
    let head: Vec<String> = head.iter().map(cell_text).collect();
    let rows: Vec<Vec<String>> = rows.iter().map(|row| row.iter().map(cell_text).collect()).collect();

    let columns = rows.iter().map(Vec::len).chain([head.len()]).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows.iter().chain([&head]) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_row = |row: &[String]| -> String {
        (0..columns)
            .map(|i| {
                let cell = row.get(i).map(String::as_str).unwrap_or_default();
                let width = widths[i];
                match alignments.get(i).copied().unwrap_or(Align::None) {
                    Align::Right => format!("{:>width$}", cell),
                    Align::Center => format!("{:^width$}", cell),
                    Align::Left | Align::None => format!("{:<width$}", cell),
                }
            })
            .collect::<Vec<_>>()
            .join(" │ ")
    };

    let border = Style::default().fg(Color::DarkGray);
    out.push(Line::styled(
        format_row(&head).trim_end().to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    out.push(Line::styled(
        widths.iter().map(|w| "─".repeat(*w)).collect::<Vec<_>>().join("─┼─"),
        border,
    ));
    for row in &rows {
        out.push(Line::raw(format_row(row).trim_end().to_string()));
    }
    out.push(blank());
}

fn to_crossterm(color: Color) -> Option<cstyle::Color> {
    use cstyle::Color as C;
    Some(match color {
        Color::Reset => return None,
        Color::Black => C::Black,
        Color::Red => C::DarkRed,
        Color::Green => C::DarkGreen,
        Color::Yellow => C::DarkYellow,
        Color::Blue => C::DarkBlue,
        Color::Magenta => C::DarkMagenta,
        Color::Cyan => C::DarkCyan,
        Color::Gray => C::Grey,
        Color::DarkGray => C::DarkGrey,
        Color::LightRed => C::Red,
        Color::LightGreen => C::Green,
        Color::LightYellow => C::Yellow,
        Color::LightBlue => C::Blue,
        Color::LightMagenta => C::Magenta,
        Color::LightCyan => C::Cyan,
        Color::White => C::White,
        Color::Rgb(r, g, b) => C::Rgb { r, g, b },
        Color::Indexed(i) => C::AnsiValue(i),
    })
}

const ATTRIBUTES: &[(Modifier, Attribute)] = &[
    (Modifier::BOLD, Attribute::Bold),
    (Modifier::ITALIC, Attribute::Italic),
    (Modifier::UNDERLINED, Attribute::Underlined),
    (Modifier::CROSSED_OUT, Attribute::CrossedOut),
];

/// Writes lines to a terminal with colors, or as plain text
pub fn print_lines<W: Write>(writer: &mut W, lines: &[Line<'_>], ansi: bool) -> io::Result<()> {
    for line in lines {
        if !ansi {
            writeln!(writer, "{}", plain(line))?;
            continue;
        }
        for span in &line.spans {
            let style = line.style.patch(span.style);
            if let Some(fg) = style.fg.and_then(to_crossterm) {
                queue!(writer, cstyle::SetForegroundColor(fg))?;
            }
            if let Some(bg) = style.bg.and_then(to_crossterm) {
                queue!(writer, cstyle::SetBackgroundColor(bg))?;
            }
            for (modifier, attribute) in ATTRIBUTES {
                if style.add_modifier.contains(*modifier) {
                    queue!(writer, SetAttribute(*attribute))?;
                }
            }
            queue!(writer, Print(span.content.as_ref()), SetAttribute(Attribute::Reset), ResetColor)?;
        }
        queue!(writer, Print("\n"))?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MarkdownRenderer;

    fn render(source: &str) -> Vec<String> {
        let nodes = MarkdownRenderer::default().render(source);
        document_lines(&nodes).iter().map(plain).collect()
    }

    #[test]
    fn headings_and_paragraphs() {
        let lines = render("# Title\n\nSome *text* here.");
        assert_eq!(lines, vec!["# Title", "", "Some text here."]);
    }

    #[test]
    fn lists_get_markers() {
        let lines = render("- one\n- two\n\n3. three\n4. four");
        assert_eq!(lines, vec!["• one", "• two", "", "3. three", "4. four"]);
    }

    #[test]
    fn task_list_shows_checkboxes() {
        let lines = render("- [x] done\n- [ ] todo");
        assert_eq!(lines, vec!["• [x] done", "• [ ] todo"]);
    }

    #[test]
    fn alert_uses_kind_title() {
        let lines = render(":::warning\nCareful.\n:::");
        assert_eq!(lines, vec!["▌ Warning", "▌ Careful."]);
    }

    #[test]
    fn code_block_has_header_and_indent() {
        let lines = render("```ts:app.ts\nconst a = 1;\n```");
        assert_eq!(lines[0], format!(" app.ts  {} ", COPY_HINT));
        assert_eq!(lines[1], "  const a = 1;");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn unhighlighted_code_is_indented() {
        let lines = render("```\nplain\ntext\n```");
        assert_eq!(lines, vec!["  plain", "  text"]);
    }

    #[test]
    fn table_columns_align() {
        let lines = render("| a | bb |\n|---|---:|\n| ccc | d |");
        assert_eq!(lines[0], "a   │ bb");
        assert_eq!(lines[2], "ccc │  d");
    }

    #[test]
    fn links_show_target() {
        let lines = render("[Stripe](https://stripe.com)");
        assert_eq!(lines, vec!["Stripe <https://stripe.com>"]);
    }

    #[test]
    fn plain_print_has_no_escapes() {
        let nodes = MarkdownRenderer::default().render("**bold**");
        let mut buf = Vec::new();
        print_lines(&mut buf, &document_lines(&nodes), false).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "bold\n");
    }

    #[test]
    fn ansi_print_styles_spans() {
        let nodes = MarkdownRenderer::default().render("**bold**");
        let mut buf = Vec::new();
        print_lines(&mut buf, &document_lines(&nodes), true).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("bold"));
    }
}
