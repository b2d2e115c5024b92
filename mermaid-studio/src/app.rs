//! Application state and boot logic.

use crate::highlight::{EditorMarks, ErrorMark};
use crate::messages::Message;
use crate::preview::{PreviewImage, PreviewViewport};

use mermaid_studio_core::browser::{ensure_browser_config, user_home};
use mermaid_studio_core::diagnostics::{self, ErrorLocation};
use mermaid_studio_core::document::STARTER_DIAGRAM;
use mermaid_studio_core::editing::matching_bracket;
use mermaid_studio_core::locate::find_renderer;
use mermaid_studio_core::{
    CacheDir, DiagramDocument, RenderBridge, RenderScheduler, Settings, SettingsStore,
};

use std::ops::Range;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use iced::widget::text_editor;
use iced::{Size, Task};

/// Quiet period after the last keystroke before an automatic render.
pub const AUTO_RENDER_DELAY: Duration = Duration::from_millis(800);

// ────────────────────────────────────────────────────────────────
// Panels
// ────────────────────────────────────────────────────────────────

/// Renderer output from the last failed render.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsPanel {
    pub text: String,
    pub summary: String,
    pub locations: Vec<ErrorLocation>,
}

impl DiagnosticsPanel {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            summary: diagnostics::summarize(&text),
            locations: diagnostics::locate_errors(&text),
            text,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindState {
    pub visible: bool,
    pub needle: String,
    pub replacement: String,
    /// Byte offset the next search starts from.
    pub cursor: usize,
    /// The match last reported to the user; "Replace" acts on it.
    pub current: Option<Range<usize>>,
    pub status: String,
}

impl FindState {
    /// Forget the current match after the text changed under it.
    pub fn invalidate(&mut self) {
        self.current = None;
    }
}

// ────────────────────────────────────────────────────────────────
// StudioApp
// ────────────────────────────────────────────────────────────────

pub struct StudioApp {
    pub document: DiagramDocument,
    pub editor: text_editor::Content,

    pub settings: Settings,
    pub store: SettingsStore,

    pub scheduler: Arc<RenderScheduler>,
    /// Set while the newest submission is running.
    pub rendering_since: Option<Instant>,
    /// Set by edits, cleared when a render starts.
    pub last_edit: Option<Instant>,

    pub preview: Option<PreviewImage>,
    pub viewport: PreviewViewport,
    pub preview_area: Size,

    pub diagnostics: Option<DiagnosticsPanel>,
    pub show_diagnostics: bool,
    pub find: FindState,

    /// The last render failed because no usable renderer was found.
    pub renderer_missing: bool,
    /// A Save / Discard / Cancel prompt is on screen.
    pub prompt_open: bool,
    pub shutting_down: bool,
    pub status: String,
}

impl StudioApp {
    pub fn new(settings: Settings, store: SettingsStore, cache: CacheDir) -> Self {
        let document = DiagramDocument::new(STARTER_DIAGRAM);
        Self {
            editor: text_editor::Content::with_text(document.text()),
            document,
            settings,
            store,
            scheduler: RenderScheduler::new(RenderBridge::new(cache)),
            rendering_since: None,
            last_edit: None,
            preview: None,
            viewport: PreviewViewport::default(),
            preview_area: Size::new(0.0, 0.0),
            diagnostics: None,
            show_diagnostics: false,
            find: FindState::default(),
            renderer_missing: false,
            prompt_open: false,
            shutting_down: false,
            status: "Ready".to_string(),
        }
    }

    /// Swap in a different document and reset everything tied to the old one.
    pub fn set_document(&mut self, document: DiagramDocument) {
        self.editor = text_editor::Content::with_text(document.text());
        self.document = document;
        self.last_edit = None;
        self.diagnostics = None;
        self.find.cursor = 0;
        self.find.invalidate();
    }

    /// Replace the buffer from outside the editor widget (find/replace).
    pub fn replace_text(&mut self, text: String) {
        self.editor = text_editor::Content::with_text(&text);
        self.document.set_text(text);
        self.last_edit = Some(Instant::now());
    }

    /// Error lines from the last failed render and the bracket pair at the
    /// cursor, for the editor's highlighter.
    pub fn editor_marks(&self) -> EditorMarks {
        let errors = self
            .diagnostics
            .iter()
            .flat_map(|panel| &panel.locations)
            .map(|loc| ErrorMark {
                line: loc.line.saturating_sub(1),
                column: loc.column.map(|c| c.saturating_sub(1)),
            })
            .collect();

        let cursor = self.editor.cursor();
        let bracket = match cursor.selection {
            Some(_) => None,
            None => matching_bracket(
                self.document.text(),
                cursor.position.line,
                cursor.position.column,
            ),
        };

        EditorMarks { errors, bracket }
    }

    /// Whether the auto-render timer should be ticking.
    pub fn render_pending(&self) -> bool {
        self.settings.auto_render && self.last_edit.is_some() && !self.shutting_down
    }

    pub fn auto_render_due(&self, now: Instant) -> bool {
        self.render_pending()
            && !self.prompt_open
            && self
                .last_edit
                .is_some_and(|at| now.duration_since(at) >= AUTO_RENDER_DELAY)
    }

    pub fn remember(&mut self, path: &Path) {
        self.settings.recent_files.push(path);
        self.save_settings();
    }

    pub fn save_settings(&mut self) {
        if let Err(e) = self.store.save(&self.settings) {
            tracing::warn!("Failed to save settings: {:#}", e);
            self.status = format!("Could not save settings: {:#}", e);
        }
    }
}

// ────────────────────────────────────────────────────────────────
// Boot
// ────────────────────────────────────────────────────────────────

pub fn boot() -> (StudioApp, Task<Message>) {
    let store = SettingsStore::for_user();
    let mut settings = store.load();
    let mut settings_changed = false;

    if settings.browser_config.is_none() {
        if let Some(home) = user_home() {
            match ensure_browser_config(store.dir(), &home) {
                Ok(Some(path)) => {
                    settings.browser_config = Some(path);
                    settings_changed = true;
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Could not write browser config: {:#}", e),
            }
        }
    }

    let cache = CacheDir::for_user();
    tracing::info!("Render cache at {}", cache.root().display());

    let mut app = StudioApp::new(settings, store, cache);
    if settings_changed {
        app.save_settings();
    }

    if app.settings.renderer_path.is_none() && find_renderer().is_none() {
        app.renderer_missing = true;
        app.status = "mmdc not found on PATH. Install @mermaid-js/mermaid-cli or use Locate mmdc…"
            .to_string();
        return (app, Task::none());
    }

    (app, Task::done(Message::Render))
}
