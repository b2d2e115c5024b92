//! Colours for the light and dark UI themes.
//!
//! The preview background must match the `-b` colour handed to the
//! renderer (see `UiTheme::preview_background`) so the PNG blends into the
//! pane instead of sitting in a visible box.

use iced::{Color, Theme};
use mermaid_studio_core::UiTheme;

// ════════════════════════════════════════════════════════════════════
// Palette
// ════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub window: Color,
    pub panel: Color,
    pub border: Color,
    pub text: Color,
    pub muted: Color,
    pub preview_bg: Color,
    pub preview_fg: Color,
    pub error_bg: Color,
    pub error_fg: Color,
    pub match_bg: Color,
}

pub fn palette_for(theme: UiTheme) -> Palette {
    match theme {
        UiTheme::Light => Palette {
            window:     Color::from_rgb8(0xff, 0xff, 0xff),
            panel:      Color::from_rgb8(0xf5, 0xf5, 0xf5),
            border:     Color::from_rgb8(0xcf, 0xcf, 0xcf),
            text:       Color::from_rgb8(0x1e, 0x1e, 0x1e),
            muted:      Color::from_rgb8(0x55, 0x55, 0x55),
            preview_bg: Color::from_rgb8(0xf5, 0xf5, 0xf5),
            preview_fg: Color::from_rgb8(0x55, 0x55, 0x55),
            error_bg:   Color::from_rgb8(0xff, 0xf8, 0xf8),
            error_fg:   Color::from_rgb8(0x7a, 0x00, 0x00),
            match_bg:   Color::from_rgb8(0xff, 0xf2, 0xa8),
        },
        UiTheme::Dark => Palette {
            window:     Color::from_rgb8(0x1e, 0x1e, 0x1e),
            panel:      Color::from_rgb8(0x25, 0x25, 0x26),
            border:     Color::from_rgb8(0x3c, 0x3c, 0x3c),
            text:       Color::from_rgb8(0xd4, 0xd4, 0xd4),
            muted:      Color::from_rgb8(0x88, 0x88, 0x88),
            preview_bg: Color::from_rgb8(0x1e, 0x1e, 0x1e),
            preview_fg: Color::from_rgb8(0x88, 0x88, 0x88),
            error_bg:   Color::from_rgb8(0x2b, 0x1a, 0x1a),
            error_fg:   Color::from_rgb8(0xff, 0x8f, 0x8f),
            match_bg:   Color::from_rgb8(0x3a, 0x3d, 0x41),
        },
    }
}

/// The built-in iced theme that the widgets are styled from.
pub fn iced_theme(theme: UiTheme) -> Theme {
    match theme {
        UiTheme::Light => Theme::Light,
        UiTheme::Dark => Theme::Dark,
    }
}

/// Parse `#rrggbb`. Used to keep the preview pane in step with the colour
/// string the renderer receives.
pub fn parse_hex(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
}
