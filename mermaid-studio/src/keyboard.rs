//! Keyboard shortcuts and subscription management.

use crate::app::StudioApp;
use crate::messages::Message;

use iced::keyboard::{self, Key, Modifiers};
use iced::widget::text_editor::{Binding, KeyPress, Status};
use iced::{Subscription, event, window};
use std::time::Duration;

/// How often the auto-render debounce is checked while an edit is pending.
const TICK_INTERVAL: Duration = Duration::from_millis(200);

// ────────────────────────────────────────────────────────────────
// Shortcut table
// ────────────────────────────────────────────────────────────────

/// Map a key press to an application command. Editing keys are left to
/// the text editor.
pub fn shortcut(key: &Key, modifiers: Modifiers) -> Option<Message> {
    if let Key::Named(keyboard::key::Named::Escape) = key {
        return Some(Message::CloseFind);
    }

    if !modifiers.command() {
        return None;
    }

    let Key::Character(c) = key.as_ref() else {
        return None;
    };

    // Ctrl+Shift combos first; with Shift held some layouts report "S".
    if modifiers.shift() {
        return match c {
            "s" | "S" => Some(Message::SaveDocumentAs),
            "+" | "=" => Some(Message::ZoomIn),
            _ => None,
        };
    }

    match c {
        "n" => Some(Message::NewDocument),
        "o" => Some(Message::OpenDocument),
        "s" => Some(Message::SaveDocument),
        "r" => Some(Message::Render),
        "f" => Some(Message::ToggleFind),
        "t" => Some(Message::ToggleUiTheme),
        "+" | "=" => Some(Message::ZoomIn),
        "-" => Some(Message::ZoomOut),
        "0" => Some(Message::ZoomFit),
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────
// Editor keys
// ────────────────────────────────────────────────────────────────

/// Keys the editor handles as line commands instead of plain typing.
pub fn editor_command(key: &Key, modifiers: Modifiers) -> Option<Message> {
    match key.as_ref() {
        Key::Named(keyboard::key::Named::Tab) if modifiers.shift() => Some(Message::OutdentLines),
        Key::Named(keyboard::key::Named::Tab) => Some(Message::IndentLines),
        Key::Named(keyboard::key::Named::Enter) => Some(Message::NewlineWithIndent),
        Key::Character("/") if modifiers.command() => Some(Message::ToggleComment),
        _ => None,
    }
}

/// Key binding for the source editor: line commands first, then the
/// widget's defaults.
pub fn editor_binding(key_press: KeyPress) -> Option<Binding<Message>> {
    if !matches!(key_press.status, Status::Focused { .. }) {
        return None;
    }
    match editor_command(&key_press.key, key_press.modifiers) {
        Some(message) => Some(Binding::Custom(message)),
        None => Binding::from_key_press(key_press),
    }
}

fn handle_event(evt: iced::Event, _status: event::Status, _id: window::Id) -> Option<Message> {
    match evt {
        iced::Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            shortcut(&key, modifiers)
        }
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────
// Subscription
// ────────────────────────────────────────────────────────────────

pub fn subscription(app: &StudioApp) -> Subscription<Message> {
    let mut subs: Vec<Subscription<Message>> = vec![
        event::listen_with(handle_event),
        // Closing goes through the save prompt and the renderer shutdown.
        window::close_requests().map(Message::CloseRequested),
    ];

    // Auto-render debounce, only while an edit is waiting.
    if app.render_pending() {
        subs.push(iced::time::every(TICK_INTERVAL).map(|_| Message::Tick));
    }

    Subscription::batch(subs)
}
