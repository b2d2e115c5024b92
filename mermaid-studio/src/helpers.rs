//! Shared formatting helpers.
//!
//! Zero UI dependencies.

use mermaid_studio_core::browser::user_home;
use mermaid_studio_core::diagnostics::ErrorLocation;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "Mermaid Studio";

// ────────────────────────────────────────────────────────────────
// Titles and labels
// ────────────────────────────────────────────────────────────────

/// `flow.mmd* - Mermaid Studio`; the star marks unsaved changes.
pub fn window_title(name: &str, dirty: bool) -> String {
    format!("{}{} - {}", name, if dirty { "*" } else { "" }, APP_NAME)
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let ms = elapsed.as_millis();
    if ms < 1000 {
        format!("{}ms", ms)
    } else {
        format!("{:.1}s", elapsed.as_secs_f64())
    }
}

/// Shorten a path for the toolbar and status bar.
pub fn short_path(path: &Path) -> String {
    short_path_from(path, user_home().as_deref())
}

/// [`short_path`] against an explicit home directory. Home is matched by
/// whole components, so `/home/al` does not swallow `/home/alice`.
pub fn short_path_from(path: &Path, home: Option<&Path>) -> String {
    if let Some(rest) = home.and_then(|home| path.strip_prefix(home).ok()) {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~{}{}", std::path::MAIN_SEPARATOR, rest.display());
    }

    let full = path.display().to_string();
    let chars = full.chars().count();
    if chars > 48 {
        let tail: String = full.chars().skip(chars - 45).collect();
        return format!("…{}", tail);
    }
    full
}

/// `line 3, column 14; line 9` for the diagnostics header.
pub fn describe_locations(locations: &[ErrorLocation]) -> String {
    locations
        .iter()
        .map(|loc| match loc.column {
            Some(col) => format!("line {}, column {}", loc.line, col),
            None => format!("line {}", loc.line),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

// ────────────────────────────────────────────────────────────────
// Recent-files menu entry
// ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentEntry(pub PathBuf);

impl fmt::Display for RecentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&short_path(&self.0))
    }
}
