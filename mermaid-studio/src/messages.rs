//! Message enum.

use crate::preview::PreviewImage;

use mermaid_studio_core::{DiagramTheme, RenderError};

use iced::widget::text_editor;
use iced::{Point, Size, Vector, window};
use std::path::PathBuf;

// ────────────────────────────────────────────────────────────────
// Destructive actions that wait on the save prompt
// ────────────────────────────────────────────────────────────────

/// Something that would throw away the current buffer. Held while the
/// Save / Discard / Cancel prompt is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    New,
    Open,
    OpenRecent(PathBuf),
    LoadExample(String),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveChoice {
    Save,
    Discard,
    Cancel,
}

// ────────────────────────────────────────────────────────────────
// Message enum
// ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Message {
    // ── Editor ──
    Edit(text_editor::Action),
    /// Tab: indent the selected lines.
    IndentLines,
    /// Shift+Tab.
    OutdentLines,
    /// Ctrl+/: comment or uncomment the selected lines with `%%`.
    ToggleComment,
    /// Enter, keeping the current line's indentation.
    NewlineWithIndent,

    // ── Files ──
    NewDocument,
    OpenDocument,
    OpenRecent(PathBuf),
    LoadExample(String),
    SaveDocument,
    SaveDocumentAs,
    ExportPng,
    OpenPicked(Option<PathBuf>),
    SaveAsPicked(Option<PathBuf>, Option<PendingAction>),
    ExportPicked(Option<PathBuf>),
    ClearRecent,

    // ── Save prompt ──
    SaveChoiceMade(PendingAction, SaveChoice),

    // ── Rendering ──
    Render,
    RenderFinished(u64, Result<PreviewImage, RenderError>),
    CancelRender,
    Tick,

    // ── Renderer setup ──
    LocateRenderer,
    RendererPicked(Option<PathBuf>),

    // ── Options ──
    ToggleUiTheme,
    DiagramThemeChanged(DiagramTheme),
    SketchToggled(bool),
    AutoRenderToggled(bool),

    // ── Preview ──
    PreviewResized(Size),
    PreviewPanned(Vector),
    PreviewZoomAt(f32, Point),
    ZoomIn,
    ZoomOut,
    ZoomFit,
    ZoomActual,

    // ── Find / replace ──
    ToggleFind,
    CloseFind,
    FindChanged(String),
    ReplaceChanged(String),
    FindNext,
    ReplaceOne,
    ReplaceAll,

    // ── Diagnostics ──
    ToggleDiagnostics,
    CopyDiagnostics,

    // ── Lifecycle ──
    CloseRequested(window::Id),
    ShutdownComplete,
}
