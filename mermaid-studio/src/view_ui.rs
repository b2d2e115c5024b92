//! View / UI rendering.

use crate::app::StudioApp;
use crate::helpers::{RecentEntry, describe_locations, short_path, window_title};
use crate::highlight::{self, MermaidHighlighter};
use crate::keyboard;
use crate::messages::Message;
use crate::palette::{Palette, iced_theme, palette_for, parse_hex};
use crate::preview::PreviewCanvas;

use mermaid_studio_core::{DiagramTheme, gallery};

use iced::widget::{
    button, canvas, column, container, pick_list, row, scrollable, text, text_editor, text_input,
};
use iced::{Background, Border, Element, Font, Length, Padding, Theme};

// ────────────────────────────────────────────────────────────────
// Title & Theme
// ────────────────────────────────────────────────────────────────

pub fn title(app: &StudioApp) -> String {
    window_title(&app.document.display_name(), app.document.is_dirty())
}

pub fn theme(app: &StudioApp) -> Theme {
    iced_theme(app.settings.ui_theme)
}

// ────────────────────────────────────────────────────────────────
// View
// ────────────────────────────────────────────────────────────────

pub fn view(app: &StudioApp) -> Element<'_, Message> {
    let palette = palette_for(app.settings.ui_theme);

    let mut layout = column![toolbar(app)]
        .spacing(0)
        .width(Length::Fill)
        .height(Length::Fill);

    if app.find.visible {
        layout = layout.push(find_bar(app, palette));
    }

    let panes = row![editor_pane(app, palette), preview_pane(app, palette)]
        .spacing(1)
        .height(Length::Fill);
    layout = layout.push(panes);

    if let Some(panel) = diagnostics_panel(app, palette) {
        layout = layout.push(panel);
    }

    layout.push(status_bar(app, palette)).into()
}

// ────────────────────────────────────────────────────────────────
// Toolbar
// ────────────────────────────────────────────────────────────────

fn tool(label: &str) -> button::Button<'_, Message> {
    button(text(label).size(13))
        .padding([4, 10])
        .style(button::secondary)
}

fn toolbar(app: &StudioApp) -> Element<'_, Message> {
    let settings = &app.settings;

    let examples: Vec<String> = gallery::names().map(str::to_string).collect();
    let recent: Vec<RecentEntry> = settings
        .recent_files
        .iter()
        .map(|p| RecentEntry(p.to_path_buf()))
        .collect();

    let render_button = if app.rendering_since.is_some() {
        tool("Cancel").on_press(Message::CancelRender)
    } else {
        tool("Render").on_press(Message::Render).style(button::primary)
    };

    let sketch_label = if settings.sketch_mode { "Sketch: on" } else { "Sketch: off" };
    let auto_label = if settings.auto_render { "Auto: on" } else { "Auto: off" };

    let mut bar = row![
        tool("New").on_press(Message::NewDocument),
        tool("Open").on_press(Message::OpenDocument),
        pick_list(recent, None::<RecentEntry>, |entry| Message::OpenRecent(entry.0))
            .placeholder("Recent")
            .text_size(13),
        tool("Save").on_press(Message::SaveDocument),
        tool("Save As").on_press(Message::SaveDocumentAs),
        tool("Export PNG").on_press_maybe(app.preview.as_ref().map(|_| Message::ExportPng)),
        render_button,
        pick_list(examples, None::<String>, Message::LoadExample)
            .placeholder("Examples")
            .text_size(13),
        pick_list(
            DiagramTheme::all(),
            Some(settings.diagram_theme),
            Message::DiagramThemeChanged
        )
        .text_size(13),
        tool(sketch_label).on_press(Message::SketchToggled(!settings.sketch_mode)),
        tool(auto_label).on_press(Message::AutoRenderToggled(!settings.auto_render)),
        tool(settings.ui_theme.toggled().label()).on_press(Message::ToggleUiTheme),
        tool("Find").on_press(Message::ToggleFind),
    ]
    .spacing(6)
    .padding(6);

    if app.renderer_missing {
        bar = bar.push(tool("Locate mmdc…").on_press(Message::LocateRenderer).style(button::danger));
    }

    container(bar).width(Length::Fill).into()
}

// ────────────────────────────────────────────────────────────────
// Find bar
// ────────────────────────────────────────────────────────────────

fn find_bar(app: &StudioApp, palette: Palette) -> Element<'_, Message> {
    let find = &app.find;
    let bar = row![
        text_input("Find", &find.needle)
            .on_input(Message::FindChanged)
            .on_submit(Message::FindNext)
            .size(13)
            .width(Length::Fixed(220.0)),
        text_input("Replace", &find.replacement)
            .on_input(Message::ReplaceChanged)
            .on_submit(Message::ReplaceOne)
            .size(13)
            .width(Length::Fixed(220.0)),
        tool("Find Next").on_press(Message::FindNext),
        tool("Replace").on_press(Message::ReplaceOne),
        tool("Replace All").on_press(Message::ReplaceAll),
        text(find.status.as_str())
            .size(12)
            .color(palette.muted)
            .width(Length::Fill),
        tool("Close").on_press(Message::CloseFind),
    ]
    .spacing(6)
    .padding([4, 6]);

    container(bar)
        .width(Length::Fill)
        .style(move |_theme: &Theme| panel_style(palette))
        .into()
}

// ────────────────────────────────────────────────────────────────
// Panes
// ────────────────────────────────────────────────────────────────

const EDITOR_TEXT_SIZE: f32 = 14.0;
const EDITOR_PADDING: f32 = 8.0;

/// Line numbers beside the editor. Both sit in one scrollable with lines
/// unwrapped, so row `n` of the gutter always lines up with line `n`.
fn editor_pane(app: &StudioApp, palette: Palette) -> Element<'_, Message> {
    let editor = text_editor(&app.editor)
        .on_action(Message::Edit)
        .key_binding(keyboard::editor_binding)
        .font(Font::MONOSPACE)
        .size(EDITOR_TEXT_SIZE)
        .padding(EDITOR_PADDING)
        .wrapping(text::Wrapping::None)
        .height(Length::Shrink)
        .highlight_with::<MermaidHighlighter>(app.editor_marks(), highlight::format);

    scrollable(row![line_gutter(app, palette), editor])
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn line_gutter(app: &StudioApp, palette: Palette) -> Element<'_, Message> {
    let marks = app.editor_marks();
    let count = app.editor.line_count().max(1);
    let width = count.to_string().len().max(3);

    let numbers: Vec<Element<'_, Message>> = (0..count).map(|line| {
        let color = if marks.is_error_line(line) {
            palette.error_fg
        } else {
            palette.muted
        };
        text(format!("{:>width$}", line + 1, width = width))
            .font(Font::MONOSPACE)
            .size(EDITOR_TEXT_SIZE)
            .color(color)
            .into()
    }).collect();

    container(column(numbers))
        .padding(Padding {
            top: EDITOR_PADDING,
            right: 6.0,
            bottom: EDITOR_PADDING,
            left: 6.0,
        })
        .style(move |_theme: &Theme| container::Style {
            background: Some(Background::Color(palette.panel)),
            ..container::Style::default()
        })
        .into()
}

fn preview_pane(app: &StudioApp, palette: Palette) -> Element<'_, Message> {
    let background = parse_hex(app.settings.ui_theme.preview_background()).unwrap_or(palette.preview_bg);

    let body: Element<'_, Message> = match &app.preview {
        Some(image) => canvas(PreviewCanvas {
            image,
            viewport: &app.viewport,
            background,
        })
        .width(Length::Fill)
        .height(Length::Fill)
        .into(),
        None => container(
            text("No preview rendered yet")
                .size(16)
                .color(palette.preview_fg),
        )
        .center(Length::Fill)
        .style(move |_theme: &Theme| container::Style {
            background: Some(Background::Color(background)),
            ..container::Style::default()
        })
        .into(),
    };

    let zoom = match &app.preview {
        Some(image) => format!("{}%", app.viewport.percent(image.size(), app.preview_area)),
        None => String::new(),
    };

    let controls = row![
        tool("−").on_press(Message::ZoomOut),
        tool("Fit").on_press(Message::ZoomFit),
        tool("100%").on_press(Message::ZoomActual),
        tool("+").on_press(Message::ZoomIn),
        text(zoom).size(12).color(palette.muted),
    ]
    .spacing(4)
    .padding(4);

    column![body, controls]
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

// ────────────────────────────────────────────────────────────────
// Diagnostics
// ────────────────────────────────────────────────────────────────

fn diagnostics_panel(app: &StudioApp, palette: Palette) -> Option<Element<'_, Message>> {
    let panel = app.diagnostics.as_ref()?;

    let mut heading = format!("Diagnostics: {}", panel.summary);
    if !panel.locations.is_empty() {
        heading.push_str(&format!(" ({})", describe_locations(&panel.locations)));
    }

    let header = row![
        text(heading)
            .size(13)
            .color(palette.error_fg)
            .width(Length::Fill),
        tool("Copy").on_press(Message::CopyDiagnostics),
        tool(if app.show_diagnostics { "Hide" } else { "Show" }).on_press(Message::ToggleDiagnostics),
    ]
    .spacing(6);

    let mut body = column![header].spacing(4).padding([6, 10]);
    if app.show_diagnostics {
        body = body.push(
            scrollable(
                text(panel.text.as_str())
                    .font(Font::MONOSPACE)
                    .size(12)
                    .color(palette.error_fg),
            )
            .height(Length::Fixed(140.0))
            .width(Length::Fill),
        );
    }

    Some(
        container(body)
            .width(Length::Fill)
            .style(move |_theme: &Theme| container::Style {
                background: Some(Background::Color(palette.error_bg)),
                border: Border {
                    color: palette.border,
                    width: 1.0,
                    radius: 0.0.into(),
                },
                ..container::Style::default()
            })
            .into(),
    )
}

// ────────────────────────────────────────────────────────────────
// Status bar
// ────────────────────────────────────────────────────────────────

fn status_bar(app: &StudioApp, palette: Palette) -> Element<'_, Message> {
    let renderer = match &app.settings.renderer_path {
        Some(path) => short_path(path),
        None => "mmdc (PATH)".to_string(),
    };

    let status_text = format!(
        " {}  │  {} theme  │  {}",
        app.status,
        app.settings.diagram_theme.label(),
        renderer,
    );

    container(text(status_text).font(Font::MONOSPACE).size(12).color(palette.muted))
        .width(Length::Fill)
        .padding([3.0, 12.0])
        .style(move |_theme: &Theme| panel_style(palette))
        .into()
}

// ────────────────────────────────────────────────────────────────
// Styling
// ────────────────────────────────────────────────────────────────

fn panel_style(palette: Palette) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette.panel)),
        text_color: Some(palette.text),
        border: Border {
            color: palette.border,
            width: 1.0,
            radius: 0.0.into(),
        },
        ..container::Style::default()
    }
}
