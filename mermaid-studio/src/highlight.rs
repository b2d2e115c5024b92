//! Editor coloring: Mermaid tokens, the lines the renderer rejected and the
//! bracket pair at the cursor.
//!
//! The editor widget only lets a highlighter pick text color and font, so
//! a rejected line is drawn in the danger color and the exact error column
//! and matched brackets are drawn bold on top of that.

use std::ops::Range;

use iced::advanced::text::highlighter::{self, Highlighter};
use iced::font::Weight;
use iced::{Color, Font, Theme};

use mermaid_studio_core::editing::BracketPair;
use mermaid_studio_core::syntax::{TokenKind, tokenize_line};

/// A place the renderer reported a problem, 0-based. `column` counts
/// characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorMark {
    pub line: usize,
    pub column: Option<usize>,
}

/// Everything the highlighter needs beyond the text itself. A change here
/// recolors the whole buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorMarks {
    pub errors: Vec<ErrorMark>,
    pub bracket: Option<BracketPair>,
}

impl EditorMarks {
    pub fn is_error_line(&self, line: usize) -> bool {
        self.errors.iter().any(|e| e.line == line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    Token(TokenKind),
    ErrorLine,
    ErrorColumn,
    Bracket,
}

pub struct MermaidHighlighter {
    marks: EditorMarks,
    current_line: usize,
}

impl Highlighter for MermaidHighlighter {
    type Settings = EditorMarks;
    type Highlight = Highlight;
    type Iterator<'a> = std::vec::IntoIter<(Range<usize>, Highlight)>;

    fn new(settings: &Self::Settings) -> Self {
        Self {
            marks: settings.clone(),
            current_line: 0,
        }
    }

    fn update(&mut self, new_settings: &Self::Settings) {
        self.marks = new_settings.clone();
        self.current_line = 0;
    }

    fn change_line(&mut self, line: usize) {
        self.current_line = self.current_line.min(line);
    }

    fn highlight_line(&mut self, line: &str) -> Self::Iterator<'_> {
        let index = self.current_line;
        self.current_line += 1;
        highlight_line(&self.marks, index, line).into_iter()
    }

    fn current_line(&self) -> usize {
        self.current_line
    }
}

/// Spans for line `index`. Later spans are drawn over earlier ones.
pub fn highlight_line(marks: &EditorMarks, index: usize, line: &str) -> Vec<(Range<usize>, Highlight)> {
    let mut spans: Vec<(Range<usize>, Highlight)> = if marks.is_error_line(index) {
        vec![(0..line.len(), Highlight::ErrorLine)]
    } else {
        tokenize_line(line)
            .into_iter()
            .map(|(range, kind)| (range, Highlight::Token(kind)))
            .collect()
    };

    for error in marks.errors.iter().filter(|e| e.line == index) {
        if let Some(range) = error.column.and_then(|c| char_range(line, c)) {
            spans.push((range, Highlight::ErrorColumn));
        }
    }

    if let Some(pair) = marks.bracket {
        for (l, column) in [pair.open, pair.close] {
            if l == index && column < line.len() {
                spans.push((column..column + 1, Highlight::Bracket));
            }
        }
    }

    spans
}

/// Byte range of the `n`th character, or of the last one when the caret
/// points just past the end of the line.
fn char_range(line: &str, n: usize) -> Option<Range<usize>> {
    let mut chars = line.char_indices();
    let (start, c) = chars.nth(n).or_else(|| line.char_indices().next_back())?;
    Some(start..start + c.len_utf8())
}

pub fn format(highlight: &Highlight, theme: &Theme) -> highlighter::Format<Font> {
    let palette = theme.palette();
    let dark = theme.extended_palette().is_dark;
    let bold = Font {
        weight: Weight::Bold,
        ..Font::MONOSPACE
    };

    let color = |light: Color, night: Color| highlighter::Format {
        color: Some(if dark { night } else { light }),
        font: None,
    };

    match highlight {
        Highlight::ErrorLine => highlighter::Format {
            color: Some(palette.danger),
            font: None,
        },
        Highlight::ErrorColumn => highlighter::Format {
            color: Some(palette.danger),
            font: Some(bold),
        },
        Highlight::Bracket => highlighter::Format {
            color: Some(palette.primary),
            font: Some(bold),
        },
        Highlight::Token(kind) => match kind {
            TokenKind::Comment => color(rgb(0x6a9955), rgb(0x6a9955)),
            TokenKind::Directive => color(rgb(0xaa00aa), rgb(0xc586c0)),
            TokenKind::Keyword => color(rgb(0x0066cc), rgb(0x569cd6)),
            TokenKind::Type => color(rgb(0xb05a00), rgb(0xdcaa6e)),
            TokenKind::String => color(rgb(0xa31515), rgb(0xce9178)),
            TokenKind::Number => color(rgb(0x098658), rgb(0xb5cea8)),
            TokenKind::Arrow => color(rgb(0x0a7aca), rgb(0x4fc1ff)),
            TokenKind::Node => color(rgb(0x951db6), rgb(0xd7a0ea)),
            TokenKind::Operator => color(rgb(0x333333), rgb(0xd4d4d4)),
            TokenKind::Unclosed => highlighter::Format {
                color: Some(palette.danger),
                font: None,
            },
        },
    }
}

fn rgb(hex: u32) -> Color {
    Color::from_rgb8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}
