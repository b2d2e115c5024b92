//! Line-oriented editing commands for the source buffer.
//!
//! Lines are the `\n`-separated pieces of the text, counted from 0, and
//! columns are byte offsets into a line. That is what the editor widget
//! reports for its cursor, so results map straight back onto it. Anything
//! after the start of a line, including a trailing `\r`, is left untouched.

use std::ops::RangeInclusive;
use std::sync::OnceLock;

use regex::Regex;

/// One level of indentation.
pub const INDENT: &str = "    ";

/// Marker that starts a Mermaid comment.
pub const COMMENT: &str = "%%";

/// The result of a command that inserts or removes text at the start of
/// some lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEdit {
    pub text: String,
    /// `(line, at, delta)`: `delta` bytes were inserted (positive) or
    /// removed (negative) at byte `at` of `line`.
    pub changes: Vec<(usize, usize, isize)>,
}

impl LineEdit {
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }

    /// Where a column on `line` ends up after the edit. A column inside a
    /// removed span lands at its start.
    pub fn shift_column(&self, line: usize, column: usize) -> usize {
        let Some(&(_, at, delta)) = self.changes.iter().find(|(l, _, _)| *l == line) else {
            return column;
        };
        let size = delta.unsigned_abs();
        if delta >= 0 {
            if column >= at { column + size } else { column }
        } else if column >= at + size {
            column - size
        } else if column > at {
            at
        } else {
            column
        }
    }
}

/// The whitespace a line starts with.
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// Line `index` of `text`, without its `\n`.
pub fn line_at(text: &str, index: usize) -> Option<&str> {
    text.split('\n').nth(index)
}

/// Insert [`INDENT`] at the start of every line in `lines`.
pub fn indent_lines(text: &str, lines: RangeInclusive<usize>) -> LineEdit {
    edit_lines(text, lines, |_| Some((0, INDENT.len() as isize)))
        .apply(text, |_, line| format!("{}{}", INDENT, line))
}

/// Remove one level of indentation (four spaces, or a tab) from every line
/// in `lines` that has one.
pub fn outdent_lines(text: &str, lines: RangeInclusive<usize>) -> LineEdit {
    edit_lines(text, lines, |line| {
        outdent_width(line).map(|width| (0, -(width as isize)))
    })
    .apply(text, |(_, _, delta), line| line[delta.unsigned_abs()..].to_string())
}

fn outdent_width(line: &str) -> Option<usize> {
    if line.starts_with(INDENT) {
        Some(INDENT.len())
    } else if line.starts_with('\t') {
        Some(1)
    } else {
        None
    }
}

/// Comment out every line in `lines`, or uncomment them if each one is
/// already a comment or blank.
///
/// Commenting puts `%% ` after the line's indentation. Uncommenting removes
/// the marker and one space after it.
pub fn toggle_comment(text: &str, lines: RangeInclusive<usize>) -> LineEdit {
    let all_commented = text
        .split('\n')
        .enumerate()
        .filter(|(i, _)| lines.contains(i))
        .all(|(_, line)| {
            let trimmed = line.trim();
            trimmed.is_empty() || trimmed.starts_with(COMMENT)
        });

    if all_commented {
        edit_lines(text, lines, |line| {
            let found = comment_marker().find(line)?;
            let indent = leading_whitespace(line).len();
            Some((indent, -((found.end() - indent) as isize)))
        })
        .apply(text, |(_, at, delta), line| {
            let end = at + delta.unsigned_abs();
            format!("{}{}", &line[..at], &line[end..])
        })
    } else {
        let marker = format!("{} ", COMMENT);
        edit_lines(text, lines, |line| {
            Some((leading_whitespace(line).len(), marker.len() as isize))
        })
        .apply(text, |(_, at, _), line| {
            format!("{}{}{}", &line[..at], marker, &line[at..])
        })
    }
}

fn comment_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[ \t]*%% ?").expect("Invalid comment Regex"))
}

/// Planned per-line changes, before the text is rebuilt.
struct Plan {
    changes: Vec<(usize, usize, isize)>,
}

impl Plan {
    fn apply(
        self,
        text: &str,
        rewrite: impl Fn((usize, usize, isize), &str) -> String,
    ) -> LineEdit {
        if self.changes.is_empty() {
            return LineEdit {
                text: text.to_string(),
                changes: self.changes,
            };
        }

        let rebuilt: Vec<String> = text
            .split('\n')
            .enumerate()
            .map(|(i, line)| match self.changes.iter().find(|(l, _, _)| *l == i) {
                Some(&change) => rewrite(change, line),
                None => line.to_string(),
            })
            .collect();

        LineEdit {
            text: rebuilt.join("\n"),
            changes: self.changes,
        }
    }
}

fn edit_lines(
    text: &str,
    lines: RangeInclusive<usize>,
    plan: impl Fn(&str) -> Option<(usize, isize)>,
) -> Plan {
    let changes = text
        .split('\n')
        .enumerate()
        .filter(|(i, _)| lines.contains(i))
        .filter_map(|(i, line)| plan(line).map(|(at, delta)| (i, at, delta)))
        .filter(|(_, _, delta)| *delta != 0)
        .collect();
    Plan { changes }
}

// ════════════════════════════════════════════════════════════════════
// Brackets
// ════════════════════════════════════════════════════════════════════

/// A bracket and its partner, as `(line, column)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketPair {
    pub open: (usize, usize),
    pub close: (usize, usize),
}

/// The partner of the bracket just before the cursor, if that is one of
/// `()[]{}` and it is balanced.
pub fn matching_bracket(text: &str, line: usize, column: usize) -> Option<BracketPair> {
    let line_start = line_offset(text, line)?;
    let line_text = line_at(text, line)?;
    let before = line_text.get(..column)?;
    let ch = before.chars().next_back()?;
    let at = line_start + column - ch.len_utf8();

    let partner = match ch {
        '(' | '[' | '{' => scan_forward(text, at, ch, closer(ch)?)?,
        ')' | ']' | '}' => scan_backward(text, at, ch, opener(ch)?)?,
        _ => return None,
    };

    let (open, close) = if partner > at { (at, partner) } else { (partner, at) };
    Some(BracketPair {
        open: position(text, open),
        close: position(text, close),
    })
}

fn closer(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

fn opener(close: char) -> Option<char> {
    match close {
        ')' => Some('('),
        ']' => Some('['),
        '}' => Some('{'),
        _ => None,
    }
}

fn scan_forward(text: &str, at: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text[at..].char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(at + i);
            }
        }
    }
    None
}

fn scan_backward(text: &str, at: usize, close: char, open: char) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in text[..=at].char_indices().rev() {
        if c == close {
            depth += 1;
        } else if c == open {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn line_offset(text: &str, line: usize) -> Option<usize> {
    if line == 0 {
        return Some(0);
    }
    text.match_indices('\n').nth(line - 1).map(|(i, _)| i + 1)
}

fn position(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset];
    let line = before.matches('\n').count();
    let start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    (line, offset - start)
}
