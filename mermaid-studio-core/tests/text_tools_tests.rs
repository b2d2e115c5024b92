//! Diagnostics parsing, find/replace and the example gallery.

use mermaid_studio_core::diagnostics::{ErrorLocation, locate_errors, summarize};
use mermaid_studio_core::gallery::{self, EXAMPLES};
use mermaid_studio_core::search::{count_matches, find_next, line_col, replace_all, replace_at};

// ════════════════════════════════════════════════════════════════
// Diagnostics
// ════════════════════════════════════════════════════════════════

const PARSE_ERROR: &str = "Error: Parse error on line 2:
graph TD;A-->
-------------^
Expecting 'AMP', 'ALPHA', got 'EOF'
    at Parser.parseError (file:///usr/lib/node_modules/@mermaid-js/mermaid-cli/node_modules/mermaid/dist/mermaid.js:1:1)
";

#[test]
fn parse_error_line_and_column() {
    assert_eq!(
        locate_errors(PARSE_ERROR),
        vec![ErrorLocation { line: 2, column: Some(14) }]
    );
}

#[test]
fn truncated_excerpt_has_no_column() {
    let stderr = "Parse error on line 7:\n...-> C  D -->\n--------------^\n";
    assert_eq!(
        locate_errors(stderr),
        vec![ErrorLocation { line: 7, column: None }]
    );
}

#[test]
fn lexical_errors_are_located_too() {
    let stderr = "Error: Lexical error on line 3. Unrecognized text.\n";
    assert_eq!(locate_errors(stderr)[0].line, 3);
}

#[test]
fn unrelated_output_has_no_locations() {
    assert!(locate_errors("Error: Failed to launch the browser process!").is_empty());
    assert!(locate_errors("").is_empty());
}

#[test]
fn summary_strips_error_prefix() {
    assert_eq!(summarize(PARSE_ERROR), "Parse error on line 2:");
}

#[test]
fn summary_skips_blank_lines_and_frames() {
    let stderr = "\n\n    at foo (node_modules/x.js:1)\nTimeout waiting for page\n";
    assert_eq!(summarize(stderr), "Timeout waiting for page");
}

#[test]
fn summary_of_nothing() {
    assert_eq!(summarize("  \n\n"), "Render failed");
}

#[test]
fn long_summary_is_truncated() {
    let long = "x".repeat(500);
    let summary = summarize(&long);
    assert_eq!(summary.chars().count(), 160);
    assert!(summary.ends_with('…'));
}

// ════════════════════════════════════════════════════════════════
// Find / replace
// ════════════════════════════════════════════════════════════════

#[test]
fn find_next_moves_forward_and_wraps() {
    let text = "A --> B\nB --> C\n";
    let first = find_next(text, "-->", 0).unwrap();
    assert_eq!(first, 2..5);
    let second = find_next(text, "-->", first.end).unwrap();
    assert_eq!(second, 10..13);
    let wrapped = find_next(text, "-->", second.end).unwrap();
    assert_eq!(wrapped, first);
}

#[test]
fn find_next_misses() {
    assert_eq!(find_next("graph TD", "sequence", 0), None);
    assert_eq!(find_next("graph TD", "", 0), None);
    // Offsets past the end still wrap.
    assert_eq!(find_next("ab", "a", 99), Some(0..1));
}

#[test]
fn replace_all_counts() {
    let (text, n) = replace_all("A-->B\nB-->C", "-->", "---");
    assert_eq!(text, "A---B\nB---C");
    assert_eq!(n, 2);
    assert_eq!(count_matches(&text, "-->"), 0);

    let (same, none) = replace_all("A", "Z", "Y");
    assert_eq!((same.as_str(), none), ("A", 0));
}

#[test]
fn replace_at_checks_the_match_is_still_there() {
    let text = "old old";
    let (replaced, next) = replace_at(text, 4..7, "old", "new").unwrap();
    assert_eq!(replaced, "old new");
    assert_eq!(next, 7);

    assert!(replace_at(text, 1..4, "old", "new").is_none());
    assert!(replace_at(text, 5..20, "old", "new").is_none());
}

#[test]
fn line_col_counts_characters() {
    let text = "flowchart\n  Ä --> B";
    assert_eq!(line_col(text, 0), (1, 1));
    assert_eq!(line_col(text, 10), (2, 1));
    let arrow = text.find("-->").unwrap();
    assert_eq!(line_col(text, arrow), (2, 5));
    assert_eq!(line_col(text, 10_000), (2, 10));
}

// ════════════════════════════════════════════════════════════════
// Gallery
// ════════════════════════════════════════════════════════════════

#[test]
fn gallery_is_sorted_and_unique() {
    let names: Vec<_> = gallery::names().collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(names, sorted);
}

#[test]
fn every_example_is_reachable_by_name() {
    for example in EXAMPLES {
        assert_eq!(gallery::get(example.name), Some(example.source));
        assert!(!example.source.trim().is_empty());
    }
    assert!(gallery::get("No Such Diagram").is_none());
}
