//! Container directives: `:::name[label]{attrs}` ... `:::`
//!
//! The source is split into plain markdown segments and directive blocks
//! before it reaches the markdown parser. A directive body is itself
//! markdown and is rendered recursively.
//!
//! Matching rules:
//! - An opener is a line of three or more colons followed by a name
//!   (letter first, then letters, digits, `-` or `_`), an optional
//!   `[label]` and an optional `{attributes}`
//! - A closer is a line of at least as many colons as its opener and
//!   nothing else
//! - Nested openers inside a body are counted so their closers do not end
//!   the outer block
//! - Colons inside fenced code are never directive syntax
//! - A colon line that fails to parse as an opener is plain text

use std::sync::OnceLock;

use regex::Regex;

use super::node::AlertKind;

/// What a directive name resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
    Alert(AlertKind),
    Unknown(String),
}

impl DirectiveKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "info" => DirectiveKind::Alert(AlertKind::Info),
            "warning" => DirectiveKind::Alert(AlertKind::Warning),
            "important" => DirectiveKind::Alert(AlertKind::Important),
            other => DirectiveKind::Unknown(other.to_string()),
        }
    }
}

/// A parsed container directive with its raw markdown body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub label: Option<String>,
    pub attributes: Vec<(String, String)>,
    pub body: String,
}

/// A top-level piece of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Markdown(String),
    Directive(Directive),
}

struct Opener {
    colons: usize,
    name: String,
    label: Option<String>,
    attributes: Vec<(String, String)>,
}

fn opener_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^ {0,3}(:{3,})[ \t]*([A-Za-z][A-Za-z0-9_-]*)(?:\[([^\]\n]*)\])?(?:\{([^}\n]*)\})?[ \t]*$")
            .expect("directive opener pattern is valid")
    })
}

fn closer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^ {0,3}(:{3,})[ \t]*$").expect("directive closer pattern is valid"))
}

fn attribute_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([#.])([^\s#.="']+)|([A-Za-z_:][\w:.-]*)(?:=(?:"([^"]*)"|'([^']*)'|([^\s"'=]+)))?"#)
            .expect("directive attribute pattern is valid")
    })
}

fn parse_opener(line: &str) -> Option<Opener> {
    let caps = opener_re().captures(line.trim_end_matches(['\n', '\r']))?;
    Some(Opener {
        colons: caps[1].len(),
        name: caps[2].to_string(),
        label: caps.get(3).map(|m| m.as_str().trim().to_string()).filter(|s| !s.is_empty()),
        attributes: caps
            .get(4)
            .map(|m| parse_attributes(m.as_str()))
            .unwrap_or_default(),
    })
}

fn closer_len(line: &str) -> Option<usize> {
    closer_re()
        .captures(line.trim_end_matches(['\n', '\r']))
        .map(|caps| caps[1].len())
}

/// Parses `#id .class key=value key="quoted value" flag`
pub fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    attribute_re()
        .captures_iter(raw)
        .map(|caps| {
            if let (Some(sigil), Some(value)) = (caps.get(1), caps.get(2)) {
                let key = if sigil.as_str() == "#" { "id" } else { "class" };
                return (key.to_string(), value.as_str().to_string());
            }
            let key = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
            let value = caps
                .get(4)
                .or_else(|| caps.get(5))
                .or_else(|| caps.get(6))
                .map(|m| m.as_str())
                .unwrap_or_default();
            (key.to_string(), value.to_string())
        })
        .collect()
}

/// Tracks whether we are inside a fenced code block
#[derive(Default)]
struct FenceState {
    open: Option<(char, usize)>,
}

impl FenceState {
    /// Updates state for a line, returning true if the line is fenced
    /// content or a fence marker
    fn observe(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start_matches(' ');
        if line.len() - trimmed.len() > 3 {
            return self.open.is_some();
        }
        let marker = trimmed.chars().next();
        let run = |c: char| trimmed.chars().take_while(|&x| x == c).count();

        match (self.open, marker) {
            (None, Some(c @ ('`' | '~'))) if run(c) >= 3 => {
                self.open = Some((c, run(c)));
                true
            }
            (Some((c, len)), Some(m)) if m == c && run(c) >= len && trimmed[run(c)..].trim().is_empty() => {
                self.open = None;
                true
            }
            (Some(_), _) => true,
            _ => false,
        }
    }
}

/// Splits a document into markdown and directive segments
pub fn split(source: &str) -> Vec<Segment> {
    let lines: Vec<&str> = source.split_inclusive('\n').collect();
    let mut segments = Vec::new();
    let mut markdown = String::new();
    let mut fence = FenceState::default();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if fence.observe(line) {
            markdown.push_str(line);
            i += 1;
            continue;
        }

        let Some(opener) = parse_opener(line) else {
            markdown.push_str(line);
            i += 1;
            continue;
        };

        if !markdown.is_empty() {
            segments.push(Segment::Markdown(std::mem::take(&mut markdown)));
        }

        let (body, next) = collect_body(&lines, i + 1, opener.colons);
        segments.push(Segment::Directive(Directive {
            kind: DirectiveKind::from_name(&opener.name),
            label: opener.label,
            attributes: opener.attributes,
            body,
        }));
        i = next;
    }

    if !markdown.is_empty() {
        segments.push(Segment::Markdown(markdown));
    }

    segments
}

/// Collects body lines from `start` until the matching closer.
///
/// Returns the body and the index of the first line after the closer. An
/// unterminated directive consumes the rest of the input.
fn collect_body(lines: &[&str], start: usize, colons: usize) -> (String, usize) {
    let mut body = String::new();
    let mut fence = FenceState::default();
    let mut depth = 0usize;

    for (offset, line) in lines[start..].iter().enumerate() {
        if fence.observe(line) {
            body.push_str(line);
            continue;
        }

        if parse_opener(line).is_some() {
            depth += 1;
        } else if let Some(len) = closer_len(line) {
            if depth == 0 && len >= colons {
                return (body, start + offset + 1);
            }
            depth = depth.saturating_sub(1);
        }

        body.push_str(line);
    }

    (body, lines.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directives(segments: &[Segment]) -> Vec<&Directive> {
        segments
            .iter()
            .filter_map(|s| match s {
                Segment::Directive(d) => Some(d),
                Segment::Markdown(_) => None,
            })
            .collect()
    }

    #[test]
    fn splits_alert_directive() {
        let segments = split("Before\n\n:::info\nHello **there**\n:::\n\nAfter\n");

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Segment::Markdown("Before\n\n".to_string()));
        assert_eq!(
            segments[1],
            Segment::Directive(Directive {
                kind: DirectiveKind::Alert(AlertKind::Info),
                label: None,
                attributes: vec![],
                body: "Hello **there**\n".to_string(),
            })
        );
        assert_eq!(segments[2], Segment::Markdown("\nAfter\n".to_string()));
    }

    #[test]
    fn unknown_name_is_kept_as_unknown() {
        let segments = split(":::note\ntext\n:::\n");
        let found = directives(&segments);
        assert_eq!(found[0].kind, DirectiveKind::Unknown("note".to_string()));
    }

    #[test]
    fn label_and_attributes() {
        let segments = split(":::warning[Heads up]{#key .loud level=2 title=\"Two words\"}\nBody\n:::\n");
        let d = directives(&segments)[0];

        assert_eq!(d.label.as_deref(), Some("Heads up"));
        assert_eq!(
            d.attributes,
            vec![
                ("id".to_string(), "key".to_string()),
                ("class".to_string(), "loud".to_string()),
                ("level".to_string(), "2".to_string()),
                ("title".to_string(), "Two words".to_string()),
            ]
        );
    }

    #[test]
    fn nested_directives_stay_inside() {
        let source = "::::important\nOuter\n:::info\nInner\n:::\nStill outer\n::::\nAfter\n";
        let segments = split(source);

        assert_eq!(segments.len(), 2);
        let outer = directives(&segments)[0];
        assert_eq!(outer.kind, DirectiveKind::Alert(AlertKind::Important));
        assert_eq!(outer.body, "Outer\n:::info\nInner\n:::\nStill outer\n");
    }

    #[test]
    fn same_length_nesting_is_balanced() {
        let segments = split(":::warning\n:::info\nInner\n:::\nTail\n:::\n");
        let outer = directives(&segments)[0];
        assert_eq!(outer.body, ":::info\nInner\n:::\nTail\n");
    }

    #[test]
    fn colons_in_code_fence_are_ignored() {
        let source = "```bash\n:::info\n```\n";
        let segments = split(source);
        assert_eq!(segments, vec![Segment::Markdown(source.to_string())]);
    }

    #[test]
    fn fence_inside_body_hides_closer() {
        let source = ":::info\n```\n:::\n```\n:::\n";
        let d = directives(&split(source))[0].clone();
        assert_eq!(d.body, "```\n:::\n```\n");
    }

    #[test]
    fn malformed_opener_is_plain_text() {
        for source in [":::\ntext\n", "::: 123\n", ":::info extra words\n", "::info\n"] {
            assert_eq!(split(source), vec![Segment::Markdown(source.to_string())]);
        }
    }

    #[test]
    fn unterminated_runs_to_end() {
        let d = directives(&split(":::info\nNever closed\n"))[0].clone();
        assert_eq!(d.body, "Never closed\n");
    }

    #[test]
    fn empty_input() {
        assert!(split("").is_empty());
    }
}
