//! Plain-text find and replace over the document buffer.
//!
//! Offsets are byte offsets into the text. Matching is case-sensitive and
//! non-overlapping.

use std::ops::Range;

/// Next occurrence of `needle` at or after `from`, wrapping to the start
/// of the text when nothing follows.
pub fn find_next(text: &str, needle: &str, from: usize) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }

    if let Some(tail) = text.get(from..) {
        if let Some(pos) = tail.find(needle) {
            let start = from + pos;
            return Some(start..start + needle.len());
        }
    }

    text.find(needle).map(|start| start..start + needle.len())
}

pub fn count_matches(text: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    text.matches(needle).count()
}

/// Replace every occurrence. Returns the new text and how many were replaced.
pub fn replace_all(text: &str, needle: &str, replacement: &str) -> (String, usize) {
    let count = count_matches(text, needle);
    if count == 0 {
        return (text.to_string(), 0);
    }
    (text.replace(needle, replacement), count)
}

/// Replace the match at `range` if it still holds `needle`, returning the
/// new text and the offset just past the inserted replacement.
pub fn replace_at(
    text: &str,
    range: Range<usize>,
    needle: &str,
    replacement: &str,
) -> Option<(String, usize)> {
    if text.get(range.clone())? != needle {
        return None;
    }

    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..range.start]);
    out.push_str(replacement);
    out.push_str(&text[range.end..]);
    Some((out, range.start + replacement.len()))
}

/// 1-based line and column (in characters) of a byte offset.
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let before = text.get(..offset).unwrap_or(text);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}
