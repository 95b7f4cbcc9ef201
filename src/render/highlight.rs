//! Syntax highlighting for code fences
//!
//! A small rule-based tokenizer per registered language plus one fixed
//! dark theme (the VS Code "Dark+" palette). Only the languages listed in
//! [`Language::from_name`] are highlighted; everything else is rendered as
//! plain code by the caller.
//!
//! Tokenizing never fails: text no rule claims becomes a plain token one
//! character at a time.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Languages with a registered grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Ts,
    Tsx,
    Bash,
    Diff,
}

impl Language {
    /// Resolves a fence language name, including common aliases
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ts" | "typescript" => Some(Language::Ts),
            "tsx" => Some(Language::Tsx),
            "bash" | "sh" | "shell" => Some(Language::Bash),
            "diff" | "patch" => Some(Language::Diff),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Ts => "ts",
            Language::Tsx => "tsx",
            Language::Bash => "bash",
            Language::Diff => "diff",
        }
    }
}

/// Token classes shared by all grammars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Plain,
    Keyword,
    String,
    Comment,
    Number,
    Function,
    Type,
    Variable,
    Operator,
    Punctuation,
    Tag,
    Attribute,
    Inserted,
    Deleted,
    Meta,
}

/// A run of text with one token class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub kind: TokenKind,
    pub text: String,
}

impl Span {
    fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// RGB colour triple
pub type Rgb = (u8, u8, u8);

/// The fixed dark theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme;

impl Theme {
    pub const BACKGROUND: Rgb = (0x1e, 0x1e, 0x1e);
    pub const HEADER_BACKGROUND: Rgb = (0x1f, 0x19, 0x2c);
    pub const HEADER_LABEL: Rgb = (0x99, 0x99, 0x99);

    pub fn color(kind: TokenKind) -> Rgb {
        match kind {
            TokenKind::Plain | TokenKind::Punctuation => (0xd4, 0xd4, 0xd4),
            TokenKind::Keyword => (0x56, 0x9c, 0xd6),
            TokenKind::String => (0xce, 0x91, 0x78),
            TokenKind::Comment => (0x6a, 0x99, 0x55),
            TokenKind::Number => (0xb5, 0xce, 0xa8),
            TokenKind::Function => (0xdc, 0xdc, 0xaa),
            TokenKind::Type => (0x4e, 0xc9, 0xb0),
            TokenKind::Variable | TokenKind::Attribute => (0x9c, 0xdc, 0xfe),
            TokenKind::Operator => (0xd4, 0xd4, 0xd4),
            TokenKind::Tag => (0x56, 0x9c, 0xd6),
            TokenKind::Inserted => (0xb5, 0xce, 0xa8),
            TokenKind::Deleted => (0xce, 0x91, 0x78),
            TokenKind::Meta => (0x56, 0x9c, 0xd6),
        }
    }
}

const TS_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "break", "case", "catch", "class", "const", "continue",
    "declare", "default", "delete", "do", "else", "enum", "export", "extends", "false", "finally",
    "for", "from", "function", "if", "implements", "import", "in", "instanceof", "interface",
    "keyof", "let", "namespace", "new", "null", "of", "private", "protected", "public",
    "readonly", "return", "static", "super", "switch", "this", "throw", "true", "try", "type",
    "typeof", "undefined", "var", "void", "while", "yield",
];

const BASH_KEYWORDS: &[&str] = &[
    "case", "do", "done", "elif", "else", "esac", "export", "fi", "for", "function", "if", "in",
    "local", "return", "then", "until", "while",
];

struct Rule {
    kind: TokenKind,
    re: Regex,
}

fn rule(kind: TokenKind, pattern: &str) -> Rule {
    Rule {
        kind,
        re: Regex::new(&format!(r"\A(?:{})", pattern)).expect("highlight pattern is valid"),
    }
}

fn ts_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            rule(TokenKind::Comment, r"//[^\n]*|/\*[\s\S]*?\*/"),
            rule(
                TokenKind::String,
                r#"`(?:\\[\s\S]|[^`\\])*`|"(?:\\.|[^"\\\n])*"|'(?:\\.|[^'\\\n])*'"#,
            ),
            rule(
                TokenKind::Number,
                r"(?:0[xX][0-9a-fA-F_]+|[0-9][0-9_]*(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?)n?\b",
            ),
            rule(TokenKind::Operator, r"=>|[+\-*/%=<>!&|^~?:]+"),
            rule(TokenKind::Punctuation, r"[{}\[\]();,.]"),
        ]
    })
}

fn tsx_tag_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            rule(TokenKind::Tag, r"</?[A-Za-z][\w.]*"),
            rule(TokenKind::Tag, r"/?>"),
        ]
    })
}

fn bash_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            rule(TokenKind::String, r#""(?:\\[\s\S]|[^"\\])*"|'[^']*'"#),
            rule(TokenKind::Variable, r"\$(?:\{[^}\n]*\}|[A-Za-z_][A-Za-z0-9_]*|[0-9@#?$!*-])"),
            rule(TokenKind::Attribute, r"--?[A-Za-z0-9][\w-]*(?:=)?"),
            rule(TokenKind::Number, r"[0-9]+\b"),
            rule(TokenKind::Operator, r"&&|\|\||[|;&]"),
            rule(TokenKind::Operator, r"[<>]+|="),
        ]
    })
}

fn identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\A[A-Za-z_$][\w$]*").expect("identifier pattern is valid"))
}

fn bash_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\A[A-Za-z0-9_./~:@%+,-]+").expect("word pattern is valid"))
}

/// Tokenizes source into lines of spans
///
/// A single trailing newline is stripped first so the block has no empty
/// last line.
pub fn highlight(language: Language, source: &str) -> Vec<Vec<Span>> {
    let source = source.strip_suffix('\n').unwrap_or(source);
    let spans = match language {
        Language::Ts => tokenize_ts(source, false),
        Language::Tsx => tokenize_ts(source, true),
        Language::Bash => tokenize_bash(source),
        Language::Diff => tokenize_diff(source),
    };
    split_lines(spans)
}

fn tokenize_ts(source: &str, jsx: bool) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < source.len() {
        let rest = &source[pos..];

        if let Some(ws) = leading_whitespace(rest) {
            push(&mut spans, TokenKind::Plain, ws);
            pos += ws.len();
            continue;
        }

        if jsx {
            if let Some((kind, text)) = first_match(tsx_tag_rules(), rest) {
                push(&mut spans, kind, text);
                pos += text.len();
                continue;
            }
        }

        if let Some(m) = identifier().find(rest) {
            let word = m.as_str();
            let after = rest[word.len()..].trim_start();
            let kind = if TS_KEYWORDS.contains(&word) {
                TokenKind::Keyword
            } else if after.starts_with('(') {
                TokenKind::Function
            } else if word.starts_with(|c: char| c.is_ascii_uppercase()) {
                TokenKind::Type
            } else {
                TokenKind::Plain
            };
            push(&mut spans, kind, word);
            pos += word.len();
            continue;
        }

        if let Some((kind, text)) = first_match(ts_rules(), rest) {
            push(&mut spans, kind, text);
            pos += text.len();
            continue;
        }

        pos += push_char(&mut spans, rest);
    }

    spans
}

fn tokenize_bash(source: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut pos = 0;
    // Next word is a command name
    let mut command_position = true;

    while pos < source.len() {
        let rest = &source[pos..];

        if let Some(ws) = leading_whitespace(rest) {
            if ws.contains('\n') {
                command_position = true;
            }
            push(&mut spans, TokenKind::Plain, ws);
            pos += ws.len();
            continue;
        }

        let at_word_start = pos == 0
            || source[..pos]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_whitespace() || c == ';');
        if rest.starts_with('#') && at_word_start {
            let end = rest.find('\n').unwrap_or(rest.len());
            push(&mut spans, TokenKind::Comment, &rest[..end]);
            pos += end;
            continue;
        }

        if let Some((kind, text)) = first_match(bash_rules(), rest) {
            if kind == TokenKind::Operator && matches!(text, "&&" | "||" | "|" | ";" | "&") {
                command_position = true;
            } else {
                command_position = false;
            }
            push(&mut spans, kind, text);
            pos += text.len();
            continue;
        }

        if let Some(m) = bash_word().find(rest) {
            let word = m.as_str();
            let kind = if BASH_KEYWORDS.contains(&word) {
                TokenKind::Keyword
            } else if command_position {
                TokenKind::Function
            } else {
                TokenKind::Plain
            };
            // Keywords like `then` and `do` are followed by a command
            command_position = kind == TokenKind::Keyword;
            push(&mut spans, kind, word);
            pos += word.len();
            continue;
        }

        command_position = false;
        pos += push_char(&mut spans, rest);
    }

    spans
}

fn tokenize_diff(source: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    for (i, line) in source.split('\n').enumerate() {
        if i > 0 {
            push(&mut spans, TokenKind::Plain, "\n");
        }
        let kind = if line.starts_with("+++") || line.starts_with("---") || line.starts_with("@@") {
            TokenKind::Meta
        } else if line.starts_with('+') || line.starts_with('>') {
            TokenKind::Inserted
        } else if line.starts_with('-') || line.starts_with('<') {
            TokenKind::Deleted
        } else {
            TokenKind::Plain
        };
        push(&mut spans, kind, line);
    }
    spans
}

fn leading_whitespace(rest: &str) -> Option<&str> {
    let end = rest
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}

fn first_match<'a>(rules: &[Rule], rest: &'a str) -> Option<(TokenKind, &'a str)> {
    rules.iter().find_map(|rule| {
        rule.re
            .find(rest)
            .filter(|m| !m.as_str().is_empty())
            .map(|m| (rule.kind, m.as_str()))
    })
}

/// Pushes one character as plain text, returning its byte length
fn push_char(spans: &mut Vec<Span>, rest: &str) -> usize {
    let len = rest.chars().next().map(char::len_utf8).unwrap_or(1);
    push(spans, TokenKind::Plain, &rest[..len]);
    len
}

/// Appends a span, merging with the previous one when the kind matches
fn push(spans: &mut Vec<Span>, kind: TokenKind, text: &str) {
    if text.is_empty() {
        return;
    }
    match spans.last_mut() {
        Some(last) if last.kind == kind => last.text.push_str(text),
        _ => spans.push(Span::new(kind, text)),
    }
}

fn split_lines(spans: Vec<Span>) -> Vec<Vec<Span>> {
    let mut lines = vec![Vec::new()];
    for span in spans {
        let mut parts = span.text.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                if let Some(line) = lines.last_mut() {
                    line.push(Span::new(span.kind, part));
                }
            }
            if parts.peek().is_some() {
                lines.push(Vec::new());
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Kinds of spans whose trimmed text equals `text`
    fn kinds_of(lines: &[Vec<Span>], text: &str) -> Vec<TokenKind> {
        lines
            .iter()
            .flatten()
            .filter(|s| s.text.trim() == text)
            .map(|s| s.kind)
            .collect()
    }

    #[test]
    fn resolves_aliases() {
        assert_eq!(Language::from_name("typescript"), Some(Language::Ts));
        assert_eq!(Language::from_name("TSX"), Some(Language::Tsx));
        assert_eq!(Language::from_name("sh"), Some(Language::Bash));
        assert_eq!(Language::from_name("python"), None);
        assert_eq!(Language::from_name(""), None);
    }

    #[test]
    fn typescript_tokens() {
        let lines = highlight(
            Language::Ts,
            "const stripe = new Stripe(key); // init\nexport default stripe;\n",
        );

        assert_eq!(lines.len(), 2);
        assert_eq!(kinds_of(&lines, "const"), vec![TokenKind::Keyword]);
        assert_eq!(kinds_of(&lines, "Stripe"), vec![TokenKind::Function]);
        assert_eq!(kinds_of(&lines, "// init"), vec![TokenKind::Comment]);
    }

    #[test]
    fn typescript_strings_and_types() {
        let lines = highlight(Language::Ts, "let p: Price = 'usd';");
        assert_eq!(kinds_of(&lines, "Price"), vec![TokenKind::Type]);
        assert_eq!(kinds_of(&lines, "'usd'"), vec![TokenKind::String]);
    }

    #[test]
    fn template_literal_spans_lines() {
        let lines = highlight(Language::Ts, "const s = `a\nb`;");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1][0], Span::new(TokenKind::String, "b`"));
    }

    #[test]
    fn tsx_tags() {
        let lines = highlight(Language::Tsx, "return <Button onClick={pay} />;");
        assert_eq!(kinds_of(&lines, "<Button"), vec![TokenKind::Tag]);
        assert_eq!(kinds_of(&lines, "/>"), vec![TokenKind::Tag]);
    }

    #[test]
    fn bash_commands_and_flags() {
        let lines = highlight(Language::Bash, "npm install --save stripe && echo $HOME # done");
        assert_eq!(kinds_of(&lines, "npm"), vec![TokenKind::Function]);
        assert_eq!(kinds_of(&lines, "install"), vec![TokenKind::Plain]);
        assert_eq!(kinds_of(&lines, "--save"), vec![TokenKind::Attribute]);
        assert_eq!(kinds_of(&lines, "echo"), vec![TokenKind::Function]);
        assert_eq!(kinds_of(&lines, "$HOME"), vec![TokenKind::Variable]);
        assert_eq!(kinds_of(&lines, "# done"), vec![TokenKind::Comment]);
    }

    #[test]
    fn diff_lines() {
        let lines = highlight(Language::Diff, "@@ -1 +1 @@\n-old\n+new\n same");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0][0].kind, TokenKind::Meta);
        assert_eq!(lines[1][0], Span::new(TokenKind::Deleted, "-old"));
        assert_eq!(lines[2][0], Span::new(TokenKind::Inserted, "+new"));
        assert_eq!(lines[3][0].kind, TokenKind::Plain);
    }

    #[test]
    fn strips_single_trailing_newline() {
        let lines = highlight(Language::Bash, "ls\n");
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn never_panics_on_odd_input() {
        for source in ["\"unterminated", "/* open", "`", "日本語 = 1", "$", "<", "\n\n"] {
            for language in [Language::Ts, Language::Tsx, Language::Bash, Language::Diff] {
                let _ = highlight(language, source);
            }
        }
    }
}
