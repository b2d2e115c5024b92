//! Line commands, bracket matching and token coloring for the editor.

use mermaid_studio_core::editing::{
    BracketPair, indent_lines, leading_whitespace, matching_bracket, outdent_lines, toggle_comment,
};
use mermaid_studio_core::syntax::{TokenKind, has_unclosed_quote, tokenize_line};

// ════════════════════════════════════════════════════════════════
// Indent / outdent
// ════════════════════════════════════════════════════════════════

#[test]
fn indent_prefixes_each_selected_line() {
    let edit = indent_lines("graph TD\nA-->B\nB-->C", 1..=2);
    assert_eq!(edit.text, "graph TD\n    A-->B\n    B-->C");
    assert_eq!(edit.changes, vec![(1, 0, 4), (2, 0, 4)]);

    // The cursor moves with its line.
    assert_eq!(edit.shift_column(1, 3), 7);
    assert_eq!(edit.shift_column(0, 3), 3);
}

#[test]
fn indent_keeps_crlf_line_endings() {
    let edit = indent_lines("A\r\nB\r\n", 0..=1);
    assert_eq!(edit.text, "    A\r\n    B\r\n");
}

#[test]
fn outdent_removes_four_spaces_or_a_tab() {
    let edit = outdent_lines("    A\n\tB\n  C", 0..=2);
    assert_eq!(edit.text, "A\nB\n  C");
    assert_eq!(edit.changes.len(), 2);

    // A column inside the removed indentation lands at the line start.
    assert_eq!(edit.shift_column(0, 2), 0);
    assert_eq!(edit.shift_column(0, 6), 2);
    assert_eq!(edit.shift_column(2, 1), 1);
}

#[test]
fn outdent_without_indentation_changes_nothing() {
    let edit = outdent_lines("A\nB", 0..=1);
    assert!(edit.is_noop());
    assert_eq!(edit.text, "A\nB");
}

#[test]
fn leading_whitespace_mixes_tabs_and_spaces() {
    assert_eq!(leading_whitespace(" \t  A --> B"), " \t  ");
    assert_eq!(leading_whitespace("A"), "");
    assert_eq!(leading_whitespace("   "), "   ");
}

// ════════════════════════════════════════════════════════════════
// Comments
// ════════════════════════════════════════════════════════════════

const FLOW: &str = "flowchart LR\n  A --> B\n\n  B --> C";

#[test]
fn comment_goes_after_the_indentation() {
    let edit = toggle_comment(FLOW, 1..=3);
    assert_eq!(edit.text, "flowchart LR\n  %% A --> B\n%% \n  %% B --> C");
    assert_eq!(edit.shift_column(1, 4), 7);
}

#[test]
fn uncomment_restores_the_lines() {
    let commented = toggle_comment(FLOW, 1..=3).text;
    let edit = toggle_comment(&commented, 1..=3);
    assert_eq!(edit.text, FLOW);
}

#[test]
fn uncomment_without_space_after_marker() {
    let edit = toggle_comment("  %%A", 0..=0);
    assert_eq!(edit.text, "  A");
}

#[test]
fn mixed_selection_is_commented() {
    let edit = toggle_comment("%% a\nb", 0..=1);
    assert_eq!(edit.text, "%% %% a\n%% b");
}

#[test]
fn blank_line_alone_is_left_alone() {
    let edit = toggle_comment("graph TD\n\nA", 1..=1);
    assert!(edit.is_noop());
    assert_eq!(edit.text, "graph TD\n\nA");
}

// ════════════════════════════════════════════════════════════════
// Brackets
// ════════════════════════════════════════════════════════════════

#[test]
fn bracket_after_cursor_opener_finds_closer() {
    let text = "A[label] --> B{x}";
    let pair = BracketPair {
        open: (0, 1),
        close: (0, 7),
    };
    assert_eq!(matching_bracket(text, 0, 2), Some(pair));
    assert_eq!(matching_bracket(text, 0, 8), Some(pair));
}

#[test]
fn brackets_match_across_lines_and_nesting() {
    let text = "f(\n(a)\n)";
    assert_eq!(
        matching_bracket(text, 2, 1),
        Some(BracketPair {
            open: (0, 1),
            close: (2, 0),
        })
    );
}

#[test]
fn no_match_for_unbalanced_or_plain_text() {
    assert_eq!(matching_bracket("A[x", 0, 2), None);
    assert_eq!(matching_bracket("A[x]", 0, 1), None);
    assert_eq!(matching_bracket("A[x]", 0, 0), None);
    assert_eq!(matching_bracket("A[x]", 5, 0), None);
}

// ════════════════════════════════════════════════════════════════
// Token coloring
// ════════════════════════════════════════════════════════════════

#[test]
fn diagram_keyword() {
    assert_eq!(tokenize_line("flowchart LR"), vec![(0..9, TokenKind::Keyword)]);
}

#[test]
fn node_label_and_arrow() {
    assert_eq!(
        tokenize_line("  A[Start] --> B"),
        vec![(3..10, TokenKind::Node), (11..14, TokenKind::Arrow)]
    );
}

#[test]
fn pie_slice_string_operator_number() {
    assert_eq!(
        tokenize_line(r#"  "Dogs" : 386"#),
        vec![
            (2..8, TokenKind::String),
            (9..10, TokenKind::Operator),
            (11..14, TokenKind::Number),
        ]
    );
}

#[test]
fn comment_covers_everything_inside_it() {
    let line = "%% graph --> here";
    assert_eq!(tokenize_line(line), vec![(0..line.len(), TokenKind::Comment)]);
}

#[test]
fn init_directive() {
    let line = "%%{init: {'theme':'dark'}}%%";
    assert_eq!(tokenize_line(line), vec![(0..line.len(), TokenKind::Directive)]);
}

#[test]
fn unbalanced_quote_flags_the_line() {
    let line = r#"A["oops] --> B"#;
    assert_eq!(tokenize_line(line), vec![(0..line.len(), TokenKind::Unclosed)]);
    assert!(!has_unclosed_quote(r#"it\'s "ok""#));
    assert!(tokenize_line("").is_empty());
}
