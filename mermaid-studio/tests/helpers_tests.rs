//! Format helpers, palettes and the keyboard shortcut table.

use iced::keyboard::{Key, Modifiers, key::Named};
use iced::Color;
use mermaid_studio::helpers::{
    RecentEntry, describe_locations, format_elapsed, short_path, short_path_from, window_title,
};
use mermaid_studio::keyboard::{editor_command, shortcut};
use mermaid_studio::messages::Message;
use mermaid_studio::palette::{palette_for, parse_hex};
use mermaid_studio_core::UiTheme;
use mermaid_studio_core::diagnostics::ErrorLocation;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ════════════════════════════════════════════════════════════════
// Titles and formatting
// ════════════════════════════════════════════════════════════════

#[test]
fn title_marks_unsaved_changes() {
    assert_eq!(window_title("Untitled", false), "Untitled - Mermaid Studio");
    assert_eq!(window_title("flow.mmd", true), "flow.mmd* - Mermaid Studio");
}

#[test]
fn elapsed_under_a_second_in_millis() {
    assert_eq!(format_elapsed(Duration::from_millis(850)), "850ms");
    assert_eq!(format_elapsed(Duration::ZERO), "0ms");
}

#[test]
fn elapsed_over_a_second_in_seconds() {
    assert_eq!(format_elapsed(Duration::from_millis(1250)), "1.2s");
    assert_eq!(format_elapsed(Duration::from_secs(45)), "45.0s");
}

#[test]
fn long_paths_are_shortened() {
    let long = PathBuf::from(format!("/srv/{}/diagram.mmd", "nested/".repeat(10)));
    let short = short_path(&long);
    assert!(short.starts_with('…') || short.starts_with('~'));
    assert!(short.ends_with("diagram.mmd"));
}

#[test]
fn short_paths_are_kept() {
    assert_eq!(short_path(&PathBuf::from("/tmp/a.mmd")), "/tmp/a.mmd");
}

#[cfg(unix)]
#[test]
fn home_is_abbreviated_by_whole_components() {
    let home = Path::new("/home/al");
    assert_eq!(
        short_path_from(Path::new("/home/al/diagrams/a.mmd"), Some(home)),
        "~/diagrams/a.mmd"
    );
    assert_eq!(short_path_from(Path::new("/home/al"), Some(home)), "~");
    // A sibling whose name merely starts with the home name is not home.
    assert_eq!(
        short_path_from(Path::new("/home/alice/x.mmd"), Some(home)),
        "/home/alice/x.mmd"
    );
    assert_eq!(short_path_from(Path::new("/tmp/a.mmd"), None), "/tmp/a.mmd");
}

#[test]
fn recent_entry_displays_short_path() {
    let entry = RecentEntry(PathBuf::from("/tmp/a.mmd"));
    assert_eq!(entry.to_string(), "/tmp/a.mmd");
}

#[test]
fn error_locations_are_described() {
    let locations = [
        ErrorLocation { line: 3, column: Some(14) },
        ErrorLocation { line: 9, column: None },
    ];
    assert_eq!(describe_locations(&locations), "line 3, column 14; line 9");
    assert_eq!(describe_locations(&[]), "");
}

// ════════════════════════════════════════════════════════════════
// Palettes
// ════════════════════════════════════════════════════════════════

#[test]
fn preview_colour_matches_renderer_background() {
    for theme in [UiTheme::Light, UiTheme::Dark] {
        assert_eq!(
            parse_hex(theme.preview_background()),
            Some(palette_for(theme).preview_bg)
        );
    }
}

#[test]
fn parse_hex_rejects_garbage() {
    assert_eq!(parse_hex("#ffffff"), Some(Color::from_rgb8(255, 255, 255)));
    assert_eq!(parse_hex("ffffff"), None);
    assert_eq!(parse_hex("#fff"), None);
    assert_eq!(parse_hex("#gggggg"), None);
    assert_eq!(parse_hex("#ééé"), None);
}

#[test]
fn light_and_dark_differ() {
    assert_ne!(palette_for(UiTheme::Light), palette_for(UiTheme::Dark));
}

// ════════════════════════════════════════════════════════════════
// Shortcuts
// ════════════════════════════════════════════════════════════════

fn ch(c: &str) -> Key {
    Key::Character(c.into())
}

#[test]
fn file_shortcuts() {
    assert!(matches!(shortcut(&ch("n"), Modifiers::COMMAND), Some(Message::NewDocument)));
    assert!(matches!(shortcut(&ch("o"), Modifiers::COMMAND), Some(Message::OpenDocument)));
    assert!(matches!(shortcut(&ch("s"), Modifiers::COMMAND), Some(Message::SaveDocument)));
}

#[test]
fn shift_s_is_save_as() {
    let mods = Modifiers::COMMAND | Modifiers::SHIFT;
    assert!(matches!(shortcut(&ch("s"), mods), Some(Message::SaveDocumentAs)));
    assert!(matches!(shortcut(&ch("S"), mods), Some(Message::SaveDocumentAs)));
}

#[test]
fn render_find_and_theme_shortcuts() {
    assert!(matches!(shortcut(&ch("r"), Modifiers::COMMAND), Some(Message::Render)));
    assert!(matches!(shortcut(&ch("f"), Modifiers::COMMAND), Some(Message::ToggleFind)));
    assert!(matches!(shortcut(&ch("t"), Modifiers::COMMAND), Some(Message::ToggleUiTheme)));
}

#[test]
fn zoom_shortcuts() {
    assert!(matches!(shortcut(&ch("="), Modifiers::COMMAND), Some(Message::ZoomIn)));
    assert!(matches!(
        shortcut(&ch("+"), Modifiers::COMMAND | Modifiers::SHIFT),
        Some(Message::ZoomIn)
    ));
    assert!(matches!(shortcut(&ch("-"), Modifiers::COMMAND), Some(Message::ZoomOut)));
    assert!(matches!(shortcut(&ch("0"), Modifiers::COMMAND), Some(Message::ZoomFit)));
}

#[test]
fn escape_closes_find() {
    let esc = Key::Named(Named::Escape);
    assert!(matches!(shortcut(&esc, Modifiers::empty()), Some(Message::CloseFind)));
}

#[test]
fn plain_typing_is_left_to_the_editor() {
    assert!(shortcut(&ch("s"), Modifiers::empty()).is_none());
    assert!(shortcut(&ch("S"), Modifiers::SHIFT).is_none());
    assert!(shortcut(&ch("q"), Modifiers::COMMAND).is_none());
}

// ════════════════════════════════════════════════════════════════
// Editor keys
// ════════════════════════════════════════════════════════════════

#[test]
fn tab_indents_and_shift_tab_outdents() {
    let tab = Key::Named(Named::Tab);
    assert!(matches!(editor_command(&tab, Modifiers::empty()), Some(Message::IndentLines)));
    assert!(matches!(editor_command(&tab, Modifiers::SHIFT), Some(Message::OutdentLines)));
}

#[test]
fn ctrl_slash_toggles_comment() {
    assert!(matches!(editor_command(&ch("/"), Modifiers::COMMAND), Some(Message::ToggleComment)));
    // Without the modifier it is just a slash.
    assert!(editor_command(&ch("/"), Modifiers::empty()).is_none());
}

#[test]
fn enter_keeps_indentation() {
    let enter = Key::Named(Named::Enter);
    assert!(matches!(editor_command(&enter, Modifiers::empty()), Some(Message::NewlineWithIndent)));
    assert!(editor_command(&ch("a"), Modifiers::empty()).is_none());
}
