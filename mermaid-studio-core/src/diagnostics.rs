//! Pull something useful out of mermaid-cli's error output.
//!
//! A typical failure looks like:
//!
//! ```text
//! Error: Parse error on line 3:
//! ...B --> C  C -->
//! ----------------^
//! Expecting 'AMP', 'COLON', ... got 'EOF'
//!     at Parser.parseError (file:///.../mermaid.js:...)
//! ```

use regex::Regex;
use std::sync::OnceLock;

static LINE_REGEX: OnceLock<Regex> = OnceLock::new();
static CARET_REGEX: OnceLock<Regex> = OnceLock::new();

fn line_regex() -> &'static Regex {
    LINE_REGEX.get_or_init(|| {
        Regex::new(r"(?i)\b(?:parse|lexical) error on line (\d+)").expect("Invalid line Regex")
    })
}

fn caret_regex() -> &'static Regex {
    CARET_REGEX.get_or_init(|| Regex::new(r"^-*\^\s*$").expect("Invalid caret Regex"))
}

const SUMMARY_MAX_CHARS: usize = 160;

/// A 1-based position in the diagram source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorLocation {
    pub line: usize,
    pub column: Option<usize>,
}

/// Every `... error on line N` in the output, with a caret column when
/// the excerpt above the caret is not truncated.
pub fn locate_errors(diagnostics: &str) -> Vec<ErrorLocation> {
    let lines: Vec<&str> = diagnostics.lines().collect();
    let mut found = Vec::new();

    for (i, text) in lines.iter().enumerate() {
        let Some(caps) = line_regex().captures(text) else {
            continue;
        };
        let Ok(line) = caps[1].parse::<usize>() else {
            continue;
        };
        if line == 0 {
            continue;
        }

        let column = match (lines.get(i + 1), lines.get(i + 2)) {
            (Some(excerpt), Some(caret))
                if caret_regex().is_match(caret) && !excerpt.starts_with("...") =>
            {
                Some(caret.trim_end().len())
            }
            _ => None,
        };

        found.push(ErrorLocation { line, column });
    }

    found
}

/// One line for the status bar: the first meaningful line of the output,
/// without the `Error:` prefix or stack frames.
pub fn summarize(diagnostics: &str) -> String {
    let first = diagnostics
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .find(|l| !l.starts_with("at ") && !l.contains("node_modules"));

    let Some(first) = first else {
        return "Render failed".to_string();
    };

    let line = first.strip_prefix("Error:").map(str::trim).unwrap_or(first);

    if line.chars().count() > SUMMARY_MAX_CHARS {
        let cut: String = line.chars().take(SUMMARY_MAX_CHARS - 1).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}
