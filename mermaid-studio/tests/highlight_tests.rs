//! The editor highlighter: line bookkeeping and colors.

use iced::Theme;
use iced::advanced::text::Highlighter;
use iced::font::Weight;
use mermaid_studio::highlight::{EditorMarks, ErrorMark, Highlight, MermaidHighlighter, format};
use mermaid_studio_core::syntax::TokenKind;

fn marks_on(line: usize) -> EditorMarks {
    EditorMarks {
        errors: vec![ErrorMark { line, column: None }],
        bracket: None,
    }
}

#[test]
fn lines_are_counted_as_they_are_fed() {
    let mut highlighter = MermaidHighlighter::new(&marks_on(1));
    assert_eq!(highlighter.current_line(), 0);

    let first: Vec<_> = highlighter.highlight_line("graph TD").collect();
    assert_eq!(first, vec![(0..5, Highlight::Token(TokenKind::Keyword))]);

    let second: Vec<_> = highlighter.highlight_line("A-->B").collect();
    assert_eq!(second, vec![(0..5, Highlight::ErrorLine)]);
    assert_eq!(highlighter.current_line(), 2);
}

#[test]
fn changed_line_rewinds() {
    let mut highlighter = MermaidHighlighter::new(&EditorMarks::default());
    for line in ["a", "b", "c"] {
        let _ = highlighter.highlight_line(line);
    }

    highlighter.change_line(1);
    assert_eq!(highlighter.current_line(), 1);
    // A later change does not move past an earlier one.
    highlighter.change_line(2);
    assert_eq!(highlighter.current_line(), 1);
}

#[test]
fn new_marks_restart_from_the_top() {
    let mut highlighter = MermaidHighlighter::new(&EditorMarks::default());
    let _ = highlighter.highlight_line("graph TD");
    let _ = highlighter.highlight_line("A-->B");

    highlighter.update(&marks_on(0));
    assert_eq!(highlighter.current_line(), 0);
    let spans: Vec<_> = highlighter.highlight_line("graph TD").collect();
    assert_eq!(spans, vec![(0..8, Highlight::ErrorLine)]);
}

#[test]
fn errors_use_the_danger_color() {
    for theme in [Theme::Light, Theme::Dark] {
        let danger = Some(theme.palette().danger);
        assert_eq!(format(&Highlight::ErrorLine, &theme).color, danger);

        let column = format(&Highlight::ErrorColumn, &theme);
        assert_eq!(column.color, danger);
        assert_eq!(column.font.map(|f| f.weight), Some(Weight::Bold));
    }
}

#[test]
fn tokens_differ_between_light_and_dark() {
    let keyword = Highlight::Token(TokenKind::Keyword);
    assert_ne!(
        format(&keyword, &Theme::Light).color,
        format(&keyword, &Theme::Dark).color
    );
    assert!(format(&Highlight::Bracket, &Theme::Light).font.is_some());
}
