//! Update logic: the central message handler.

use crate::app::{DiagnosticsPanel, StudioApp};
use crate::dialogs;
use crate::helpers::{format_elapsed, short_path};
use crate::messages::{Message, PendingAction, SaveChoice};
use crate::preview::PreviewImage;

use mermaid_studio_core::document::export_png;
use mermaid_studio_core::editing::{self, LineEdit};
use mermaid_studio_core::locate::resolve_renderer;
use mermaid_studio_core::{
    DiagramDocument, RenderError, RenderRequest, RenderScheduler, RenderedImage, gallery, search,
};

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use iced::Task;
use iced::widget::image::Handle;
use iced::widget::text_editor::{Action, Cursor, Edit, Position};

pub fn update(app: &mut StudioApp, message: Message) -> Task<Message> {
    match message {
        // ────────────────────────────────────────────────────
        // Editor
        // ────────────────────────────────────────────────────

        Message::Edit(action) => {
            let is_edit = action.is_edit();
            app.editor.perform(action);
            if is_edit {
                sync_from_editor(app);
            }
            Task::none()
        }

        Message::IndentLines => {
            edit_selected_lines(app, editing::indent_lines);
            Task::none()
        }

        Message::OutdentLines => {
            edit_selected_lines(app, editing::outdent_lines);
            Task::none()
        }

        Message::ToggleComment => {
            edit_selected_lines(app, editing::toggle_comment);
            Task::none()
        }

        Message::NewlineWithIndent => {
            let line = app.editor.cursor().position.line;
            let indent = app
                .editor
                .line(line)
                .map(|l| editing::leading_whitespace(&l.text).to_string())
                .unwrap_or_default();

            app.editor.perform(Action::Edit(Edit::Enter));
            if !indent.is_empty() {
                app.editor.perform(Action::Edit(Edit::Paste(Arc::new(indent))));
            }
            sync_from_editor(app);
            Task::none()
        }

        // ────────────────────────────────────────────────────
        // Files
        // ────────────────────────────────────────────────────

        Message::NewDocument => guard(app, PendingAction::New),
        Message::OpenDocument => guard(app, PendingAction::Open),
        Message::OpenRecent(path) => guard(app, PendingAction::OpenRecent(path)),
        Message::LoadExample(name) => guard(app, PendingAction::LoadExample(name)),

        Message::OpenPicked(None) => {
            app.status = "Open cancelled".to_string();
            Task::none()
        }
        Message::OpenPicked(Some(path)) => open_path(app, path),

        Message::SaveDocument => {
            if app.document.path().is_some() {
                save_in_place(app);
                Task::none()
            } else {
                ask_save_path(app, None)
            }
        }

        Message::SaveDocumentAs => ask_save_path(app, None),

        Message::SaveAsPicked(None, _) => {
            app.status = "Save cancelled".to_string();
            Task::none()
        }
        Message::SaveAsPicked(Some(path), pending) => {
            match app.document.save_as(&path) {
                Ok(()) => {
                    app.remember(&path);
                    app.status = format!("Saved {}", short_path(&path));
                    match pending {
                        Some(action) => proceed(app, action),
                        None => Task::none(),
                    }
                }
                Err(e) => {
                    app.status = format!("{:#}", e);
                    Task::none()
                }
            }
        }

        Message::ExportPng => {
            if app.preview.is_none() {
                app.status = "Nothing to export yet. Render the diagram first.".to_string();
                return Task::none();
            }
            Task::perform(
                dialogs::pick_export_path(app.document.export_file_name(), document_dir(app)),
                Message::ExportPicked,
            )
        }

        Message::ExportPicked(None) => {
            app.status = "Export cancelled".to_string();
            Task::none()
        }
        Message::ExportPicked(Some(dest)) => {
            let Some(preview) = &app.preview else {
                return Task::none();
            };
            app.status = match export_png(&preview.path, &dest) {
                Ok(_) => format!("Exported {}", short_path(&dest)),
                Err(e) => format!("{:#}", e),
            };
            Task::none()
        }

        Message::ClearRecent => {
            app.settings.recent_files.clear();
            app.save_settings();
            Task::none()
        }

        // ────────────────────────────────────────────────────
        // Save prompt
        // ────────────────────────────────────────────────────

        Message::SaveChoiceMade(action, choice) => {
            app.prompt_open = false;
            match choice {
                SaveChoice::Cancel => {
                    app.status = "Cancelled".to_string();
                    Task::none()
                }
                SaveChoice::Discard => proceed(app, action),
                SaveChoice::Save if app.document.path().is_some() => {
                    if save_in_place(app) {
                        proceed(app, action)
                    } else {
                        Task::none()
                    }
                }
                SaveChoice::Save => ask_save_path(app, Some(action)),
            }
        }

        // ────────────────────────────────────────────────────
        // Rendering
        // ────────────────────────────────────────────────────

        Message::Render => start_render(app),

        Message::Tick => {
            if app.auto_render_due(Instant::now()) {
                start_render(app)
            } else {
                Task::none()
            }
        }

        Message::RenderFinished(generation, result) => {
            if generation != app.scheduler.latest_generation() {
                tracing::debug!("Dropping superseded render #{}", generation);
                return Task::none();
            }
            let elapsed = app.rendering_since.take().map(|t| t.elapsed());
            finish_render(app, result, elapsed);
            Task::none()
        }

        Message::CancelRender => {
            app.scheduler.cancel();
            Task::none()
        }

        // ────────────────────────────────────────────────────
        // Renderer setup
        // ────────────────────────────────────────────────────

        Message::LocateRenderer => Task::perform(dialogs::pick_renderer(), Message::RendererPicked),

        Message::RendererPicked(None) => Task::none(),
        Message::RendererPicked(Some(path)) => match resolve_renderer(&path) {
            Ok(resolved) => {
                tracing::info!("Renderer set to {}", resolved.display());
                app.settings.renderer_path = Some(resolved);
                app.renderer_missing = false;
                app.save_settings();
                start_render(app)
            }
            Err(e) => {
                app.status = e.to_string();
                Task::none()
            }
        },

        // ────────────────────────────────────────────────────
        // Options
        // ────────────────────────────────────────────────────

        Message::ToggleUiTheme => {
            app.settings.ui_theme = app.settings.ui_theme.toggled();
            app.save_settings();
            // The renderer paints the background, so the image must be redone.
            rerender_if_shown(app)
        }

        Message::DiagramThemeChanged(theme) => {
            app.settings.diagram_theme = theme;
            app.save_settings();
            rerender_if_shown(app)
        }

        Message::SketchToggled(sketch) => {
            app.settings.sketch_mode = sketch;
            app.save_settings();
            rerender_if_shown(app)
        }

        Message::AutoRenderToggled(auto) => {
            app.settings.auto_render = auto;
            app.save_settings();
            Task::none()
        }

        // ────────────────────────────────────────────────────
        // Preview
        // ────────────────────────────────────────────────────

        Message::PreviewResized(size) => {
            app.preview_area = size;
            Task::none()
        }

        Message::PreviewPanned(delta) => {
            app.viewport.pan(delta);
            Task::none()
        }

        Message::PreviewZoomAt(factor, anchor) => {
            if let Some(image) = &app.preview {
                app.viewport
                    .zoom_at(factor, Some(anchor), image.size(), app.preview_area);
            }
            Task::none()
        }

        Message::ZoomIn => {
            if let Some(image) = &app.preview {
                app.viewport.zoom_in(image.size(), app.preview_area);
            }
            Task::none()
        }

        Message::ZoomOut => {
            if let Some(image) = &app.preview {
                app.viewport.zoom_out(image.size(), app.preview_area);
            }
            Task::none()
        }

        Message::ZoomFit => {
            app.viewport.reset();
            Task::none()
        }

        Message::ZoomActual => {
            app.viewport.actual_size();
            Task::none()
        }

        // ────────────────────────────────────────────────────
        // Find / replace
        // ────────────────────────────────────────────────────

        Message::ToggleFind => {
            app.find.visible = !app.find.visible;
            Task::none()
        }

        Message::CloseFind => {
            app.find.visible = false;
            app.find.invalidate();
            Task::none()
        }

        Message::FindChanged(needle) => {
            app.find.needle = needle;
            app.find.cursor = 0;
            app.find.invalidate();
            app.find.status = match search::count_matches(app.document.text(), &app.find.needle) {
                0 if app.find.needle.is_empty() => String::new(),
                0 => "No matches".to_string(),
                1 => "1 match".to_string(),
                n => format!("{} matches", n),
            };
            Task::none()
        }

        Message::ReplaceChanged(replacement) => {
            app.find.replacement = replacement;
            Task::none()
        }

        Message::FindNext => {
            find_next(app);
            Task::none()
        }

        Message::ReplaceOne => {
            let replaced = app.find.current.clone().and_then(|range| {
                search::replace_at(
                    app.document.text(),
                    range,
                    &app.find.needle,
                    &app.find.replacement,
                )
            });
            if let Some((text, next)) = replaced {
                app.replace_text(text);
                app.find.cursor = next;
            }
            find_next(app);
            Task::none()
        }

        Message::ReplaceAll => {
            let (text, count) =
                search::replace_all(app.document.text(), &app.find.needle, &app.find.replacement);
            if count > 0 {
                app.replace_text(text);
            }
            app.find.cursor = 0;
            app.find.invalidate();
            app.find.status = format!("Replaced {}", count);
            Task::none()
        }

        // ────────────────────────────────────────────────────
        // Diagnostics
        // ────────────────────────────────────────────────────

        Message::ToggleDiagnostics => {
            app.show_diagnostics = !app.show_diagnostics;
            Task::none()
        }

        Message::CopyDiagnostics => {
            let Some(panel) = &app.diagnostics else {
                return Task::none();
            };
            let contents = panel.text.clone();

            if let Ok(mut ctx) = copypasta::ClipboardContext::new() {
                use copypasta::ClipboardProvider;
                app.status = match ctx.set_contents(contents) {
                    Ok(()) => "Diagnostics copied to clipboard".to_string(),
                    Err(e) => format!("Clipboard error: {}", e),
                };
            } else {
                app.status = "Clipboard unavailable".to_string();
            }
            Task::none()
        }

        // ────────────────────────────────────────────────────
        // Lifecycle
        // ────────────────────────────────────────────────────

        Message::CloseRequested(_) => {
            if app.prompt_open || app.shutting_down {
                return Task::none();
            }
            guard(app, PendingAction::Exit)
        }

        Message::ShutdownComplete => {
            tracing::info!("Renderer stopped; exiting");
            iced::exit()
        }
    }
}

// ────────────────────────────────────────────────────────────────
// Editing
// ────────────────────────────────────────────────────────────────

/// The widget changed the text; the document follows.
fn sync_from_editor(app: &mut StudioApp) {
    app.document.set_text(app.editor.text());
    app.last_edit = Some(Instant::now());
    app.find.invalidate();
}

/// Run a line command over the lines the selection touches (or the cursor
/// line), keeping the cursor and selection on the same text.
fn edit_selected_lines(app: &mut StudioApp, command: fn(&str, RangeInclusive<usize>) -> LineEdit) {
    let cursor = app.editor.cursor();
    let anchor = cursor.selection.unwrap_or(cursor.position);
    let first = cursor.position.line.min(anchor.line);
    let last = cursor.position.line.max(anchor.line);

    let edit = command(app.document.text(), first..=last);
    if edit.is_noop() {
        return;
    }

    let shift = |p: Position| Position {
        line: p.line,
        column: edit.shift_column(p.line, p.column),
    };
    let moved = Cursor {
        position: shift(cursor.position),
        selection: cursor.selection.map(shift),
    };

    app.replace_text(edit.text);
    app.editor.move_to(moved);
    app.find.invalidate();
}

// ────────────────────────────────────────────────────────────────
// Destructive actions
// ────────────────────────────────────────────────────────────────

/// Run `action` now, or first ask about unsaved changes.
fn guard(app: &mut StudioApp, action: PendingAction) -> Task<Message> {
    if !app.document.is_dirty() {
        return proceed(app, action);
    }
    if app.prompt_open {
        return Task::none();
    }

    app.prompt_open = true;
    Task::perform(
        dialogs::confirm_discard(app.document.display_name()),
        move |choice| Message::SaveChoiceMade(action.clone(), choice),
    )
}

fn proceed(app: &mut StudioApp, action: PendingAction) -> Task<Message> {
    match action {
        PendingAction::New => {
            abandon_render(app);
            app.set_document(DiagramDocument::new(""));
            app.preview = None;
            app.diagnostics = None;
            app.viewport.reset();
            app.status = "New document".to_string();
            Task::none()
        }
        PendingAction::Open => Task::perform(
            dialogs::pick_open_path(document_dir(app)),
            Message::OpenPicked,
        ),
        PendingAction::OpenRecent(path) => open_path(app, path),
        PendingAction::LoadExample(name) => {
            let Some(source) = gallery::get(&name) else {
                app.status = format!("Unknown example: {}", name);
                return Task::none();
            };
            abandon_render(app);
            app.set_document(DiagramDocument::new(source));
            app.status = format!("Loaded example: {}", name);
            start_render(app)
        }
        PendingAction::Exit => {
            app.shutting_down = true;
            app.status = "Shutting down…".to_string();
            let scheduler = app.scheduler.clone();
            Task::perform(async move { scheduler.shutdown().await }, |_| {
                Message::ShutdownComplete
            })
        }
    }
}

fn open_path(app: &mut StudioApp, path: PathBuf) -> Task<Message> {
    match DiagramDocument::open(&path) {
        Ok(document) => {
            abandon_render(app);
            app.set_document(document);
            app.remember(&path);
            app.status = format!("Opened {}", short_path(&path));
            start_render(app)
        }
        Err(e) => {
            tracing::warn!("{:#}", e);
            app.status = format!("{:#}", e);
            if !path.exists() && app.settings.recent_files.remove(&path) {
                app.save_settings();
            }
            Task::none()
        }
    }
}

/// Save to the document's own path. Returns whether it worked.
fn save_in_place(app: &mut StudioApp) -> bool {
    match app.document.save() {
        Ok(path) => {
            app.remember(&path);
            app.status = format!("Saved {}", short_path(&path));
            true
        }
        Err(e) => {
            app.status = format!("{:#}", e);
            false
        }
    }
}

fn ask_save_path(app: &StudioApp, pending: Option<PendingAction>) -> Task<Message> {
    let file_name = match app.document.path() {
        Some(_) => app.document.display_name(),
        None => "diagram.mmd".to_string(),
    };
    Task::perform(
        dialogs::pick_save_path(file_name, document_dir(app)),
        move |path| Message::SaveAsPicked(path, pending.clone()),
    )
}

fn document_dir(app: &StudioApp) -> Option<PathBuf> {
    app.document
        .path()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
}

// ────────────────────────────────────────────────────────────────
// Rendering
// ────────────────────────────────────────────────────────────────

fn start_render(app: &mut StudioApp) -> Task<Message> {
    app.last_edit = None;

    if app.shutting_down {
        return Task::none();
    }
    if app.document.text().trim().is_empty() {
        app.status = "Nothing to render".to_string();
        return Task::none();
    }

    let request = RenderRequest::new(
        app.document.text(),
        app.scheduler.bridge().cache().preview_path(),
        app.settings.render_options(),
    );
    app.rendering_since = Some(Instant::now());
    app.status = "Rendering…".to_string();

    let scheduler = app.scheduler.clone();
    Task::perform(render_preview(scheduler, request), |(generation, result)| {
        Message::RenderFinished(generation, result)
    })
}

/// The document is being replaced: stop its render and make sure a result
/// already on its way is dropped as stale.
fn abandon_render(app: &mut StudioApp) {
    let latest = app.scheduler.discard();
    if app.rendering_since.take().is_some() {
        tracing::debug!("Discarded render in flight; now at #{}", latest);
    }
}

fn rerender_if_shown(app: &mut StudioApp) -> Task<Message> {
    if app.preview.is_some() || app.diagnostics.is_some() {
        start_render(app)
    } else {
        Task::none()
    }
}

/// Submit a render and load the resulting PNG into memory.
async fn render_preview(
    scheduler: Arc<RenderScheduler>,
    request: RenderRequest,
) -> (u64, Result<PreviewImage, RenderError>) {
    let outcome = scheduler.submit(request).await;
    let result = match outcome.result {
        Ok(image) => load_preview(image).await,
        Err(e) => Err(e),
    };
    (outcome.generation, result)
}

async fn load_preview(image: RenderedImage) -> Result<PreviewImage, RenderError> {
    let bytes = tokio::fs::read(&image.path)
        .await
        .map_err(|e| RenderError::Io {
            context: format!("Failed to load {}", image.path.display()),
            message: e.to_string(),
        })?;

    Ok(PreviewImage {
        handle: Handle::from_bytes(bytes),
        path: image.path,
        width: image.width,
        height: image.height,
    })
}

fn finish_render(
    app: &mut StudioApp,
    result: Result<PreviewImage, RenderError>,
    elapsed: Option<std::time::Duration>,
) {
    let took = elapsed.map(format_elapsed).unwrap_or_default();

    match result {
        Ok(image) => {
            let resized = app
                .preview
                .as_ref()
                .is_none_or(|old| (old.width, old.height) != (image.width, image.height));
            if resized {
                app.viewport.reset();
            }
            app.status = format!("Rendered {}×{} in {}", image.width, image.height, took);
            app.preview = Some(image);
            app.diagnostics = None;
            app.renderer_missing = false;
        }
        Err(e @ RenderError::Configuration { .. }) => {
            app.renderer_missing = true;
            app.status = format!("{}. Use Locate mmdc… to choose the renderer.", e);
        }
        Err(RenderError::Render { diagnostics, .. }) => {
            let panel = DiagnosticsPanel::new(diagnostics);
            app.status = format!("Render failed: {}", panel.summary);
            app.diagnostics = Some(panel);
            app.show_diagnostics = true;
        }
        Err(e) => {
            app.status = e.to_string();
        }
    }
}

// ────────────────────────────────────────────────────────────────
// Find
// ────────────────────────────────────────────────────────────────

fn find_next(app: &mut StudioApp) {
    let text = app.document.text();
    let needle = &app.find.needle;
    if needle.is_empty() {
        return;
    }

    match search::find_next(text, needle, app.find.cursor) {
        Some(range) => {
            let (line, col) = search::line_col(text, range.start);
            let total = search::count_matches(text, needle);
            app.find.status = format!("Line {}, column {} ({} total)", line, col, total);
            app.find.cursor = range.end;
            app.find.current = Some(range);
        }
        None => {
            app.find.status = "Not found".to_string();
            app.find.invalidate();
        }
    }
}
