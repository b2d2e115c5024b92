//! Token classes for coloring Mermaid source, one line at a time.
//!
//! Matching is pattern based, not a parse: it follows the shapes of common
//! diagram syntax closely enough to color while typing. Comments and
//! directives win over anything inside them. A line with an unbalanced
//! quote is flagged as a whole.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `%% ...` to the end of the line.
    Comment,
    /// `%%{ ... }%%` on a single line.
    Directive,
    /// Diagram type declarations such as `flowchart` or `sequenceDiagram`.
    Keyword,
    /// Structural words: `subgraph`, `end`, `participant`, `section`...
    Type,
    String,
    Number,
    Arrow,
    /// A bracketed node label such as `[text]` or `((text))`.
    Node,
    Operator,
    /// The line has an odd number of unescaped quotes.
    Unclosed,
}

const KEYWORDS: &str = r"(?i)\b(?:flowchart-(?:LR|RL|TB|BT)|stateDiagram-v2|architecture-beta|radar-beta|sankey-beta|treemap-beta|graph|flowchart|sequenceDiagram|classDiagram|stateDiagram|erDiagram|gantt|journey|pie|mindmap|timeline|gitGraph|quadrantChart|radar|sankey|treemap|C4Context|zenuml)\b";

const TYPES: &str = r"(?i)\b(?:subgraph|end|click|style|linkStyle|accTitle|accDescr|activate|deactivate|autonumber|dateFormat|axisFormat|section|participant|Note|classDef|direction|title|loop|alt|opt|par|rect|else)\b";

const ARROWS: &str = r"<->|-->|==>|===|->|<-|--x|x--|--o|o--|--\||\|--|==|--|\.\.|:::";

const NODES: &str = r"\[\[.*?\]\]|\[.*?\]|\(\(.*?\)\)|\([^()]*\)|\{[^{}]*\}";

/// Patterns in paint order: later ones overwrite earlier ones.
fn patterns() -> &'static [(TokenKind, Regex)] {
    static PATTERNS: OnceLock<Vec<(TokenKind, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (TokenKind::Keyword, KEYWORDS),
            (TokenKind::Type, TYPES),
            (TokenKind::String, r#""[^"]*"|'[^']*'"#),
            (TokenKind::Number, r"\b\d+(?:\.\d+)?\b"),
            (TokenKind::Operator, r"[:=+/*<>!|.,]"),
            (TokenKind::Arrow, ARROWS),
            (TokenKind::Node, NODES),
            (TokenKind::Comment, r"%%.*$"),
            (TokenKind::Directive, r"%%\{.*?\}%%"),
        ]
        .into_iter()
        .map(|(kind, pattern)| (kind, Regex::new(pattern).expect("Invalid token Regex")))
        .collect()
    })
}

/// Colored spans of `line`, in order and non-overlapping. Ranges are byte
/// ranges into `line`.
pub fn tokenize_line(line: &str) -> Vec<(Range<usize>, TokenKind)> {
    if line.is_empty() {
        return Vec::new();
    }

    if has_unclosed_quote(line) {
        return vec![(0..line.len(), TokenKind::Unclosed)];
    }

    let mut painted: Vec<Option<TokenKind>> = vec![None; line.len()];
    for (kind, regex) in patterns() {
        for m in regex.find_iter(line) {
            painted[m.range()].fill(Some(*kind));
        }
    }

    let mut spans = Vec::new();
    let mut start = 0;
    for i in 1..=painted.len() {
        if i == painted.len() || painted[i] != painted[start] {
            if let Some(kind) = painted[start] {
                spans.push((start..i, kind));
            }
            start = i;
        }
    }
    spans
}

/// Odd count of `"` or `'` not preceded by a backslash.
pub fn has_unclosed_quote(line: &str) -> bool {
    let mut double = 0;
    let mut single = 0;
    let mut previous = None;
    for c in line.chars() {
        if previous != Some('\\') {
            match c {
                '"' => double += 1,
                '\'' => single += 1,
                _ => {}
            }
        }
        previous = Some(c);
    }
    double % 2 == 1 || single % 2 == 1
}
