//! The preview pane: a canvas that draws the last rendered PNG with zoom
//! and pan.
//!
//! `PreviewViewport` holds the pure geometry (tested without a window);
//! `PreviewCanvas` turns mouse input into messages and draws.

use crate::messages::Message;

use iced::widget::canvas;
use iced::widget::image::Handle;
use iced::{Color, Event, Point, Rectangle, Renderer, Size, Theme, Vector, mouse};
use std::path::PathBuf;

pub const MIN_ZOOM: f32 = 0.05;
pub const MAX_ZOOM: f32 = 8.0;
pub const ZOOM_IN_STEP: f32 = 1.10;
pub const ZOOM_OUT_STEP: f32 = 0.90;

// ────────────────────────────────────────────────────────────────
// Loaded image
// ────────────────────────────────────────────────────────────────

/// A rendered PNG held in memory. The handle is built from bytes, not from
/// the path, because every render reuses the same cache path and a
/// path-keyed handle would keep showing the first image.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub path: PathBuf,
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

impl PreviewImage {
    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

// ────────────────────────────────────────────────────────────────
// Viewport
// ────────────────────────────────────────────────────────────────

/// Zoom and pan state. `zoom == None` means "fit to the pane", which is
/// recomputed whenever the pane or the image changes size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewViewport {
    zoom: Option<f32>,
    offset: Vector,
}

impl Default for PreviewViewport {
    fn default() -> Self {
        Self {
            zoom: None,
            offset: Vector::new(0.0, 0.0),
        }
    }
}

impl PreviewViewport {
    /// Largest scale at which the whole image fits in `area`.
    pub fn fit_scale(image: Size, area: Size) -> f32 {
        if image.width <= 0.0 || image.height <= 0.0 || area.width <= 0.0 || area.height <= 0.0 {
            return 1.0;
        }
        (area.width / image.width)
            .min(area.height / image.height)
            .max(MIN_ZOOM)
    }

    pub fn is_fit(&self) -> bool {
        self.zoom.is_none()
    }

    pub fn offset(&self) -> Vector {
        self.offset
    }

    pub fn scale(&self, image: Size, area: Size) -> f32 {
        self.zoom.unwrap_or_else(|| Self::fit_scale(image, area))
    }

    /// Where the image lands inside `area`: centred, then shifted by the pan.
    pub fn image_rect(&self, image: Size, area: Size) -> Rectangle {
        let scale = self.scale(image, area);
        let size = Size::new(image.width * scale, image.height * scale);
        let center = Point::new(
            area.width / 2.0 + self.offset.x,
            area.height / 2.0 + self.offset.y,
        );
        Rectangle::new(
            Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0),
            size,
        )
    }

    /// Multiply the scale by `factor`, clamped. With an anchor, the image
    /// point under the anchor stays put; without one the zoom is about the
    /// image centre.
    pub fn zoom_at(&mut self, factor: f32, anchor: Option<Point>, image: Size, area: Size) {
        let old = self.scale(image, area);
        let new = (old * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new - old).abs() < 1e-6 {
            return;
        }

        if let Some(anchor) = anchor {
            let ratio = new / old;
            let cx = area.width / 2.0 + self.offset.x;
            let cy = area.height / 2.0 + self.offset.y;
            let new_cx = anchor.x - (anchor.x - cx) * ratio;
            let new_cy = anchor.y - (anchor.y - cy) * ratio;
            self.offset = Vector::new(new_cx - area.width / 2.0, new_cy - area.height / 2.0);
        }

        self.zoom = Some(new);
    }

    pub fn zoom_in(&mut self, image: Size, area: Size) {
        self.zoom_at(ZOOM_IN_STEP, None, image, area);
    }

    pub fn zoom_out(&mut self, image: Size, area: Size) {
        self.zoom_at(ZOOM_OUT_STEP, None, image, area);
    }

    pub fn pan(&mut self, delta: Vector) {
        self.offset = Vector::new(self.offset.x + delta.x, self.offset.y + delta.y);
    }

    /// Back to fit-to-window, centred.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 1:1 pixels, centred.
    pub fn actual_size(&mut self) {
        self.zoom = Some(1.0);
        self.offset = Vector::new(0.0, 0.0);
    }

    /// Zoom for the status bar, rounded to whole percent.
    pub fn percent(&self, image: Size, area: Size) -> u32 {
        (self.scale(image, area) * 100.0).round() as u32
    }
}

// ────────────────────────────────────────────────────────────────
// Canvas program
// ────────────────────────────────────────────────────────────────

pub struct PreviewCanvas<'a> {
    pub image: &'a PreviewImage,
    pub viewport: &'a PreviewViewport,
    pub background: Color,
}

#[derive(Debug, Default)]
pub struct PreviewState {
    drag_from: Option<Point>,
    last_size: Option<Size>,
}

impl canvas::Program<Message> for PreviewCanvas<'_> {
    type State = PreviewState;

    fn update(
        &self,
        state: &mut PreviewState,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        if state.last_size != Some(bounds.size()) {
            state.last_size = Some(bounds.size());
            return Some(canvas::Action::publish(Message::PreviewResized(bounds.size())));
        }

        let Event::Mouse(mouse_event) = event else {
            return None;
        };

        match mouse_event {
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                let position = cursor.position_in(bounds)?;
                state.drag_from = Some(position);
                Some(canvas::Action::capture())
            }
            mouse::Event::ButtonReleased(mouse::Button::Left) => {
                state.drag_from.take().map(|_| canvas::Action::capture())
            }
            mouse::Event::CursorMoved { .. } => {
                let from = state.drag_from?;
                let Some(to) = cursor.position_in(bounds) else {
                    state.drag_from = None;
                    return None;
                };
                state.drag_from = Some(to);
                let delta = Vector::new(to.x - from.x, to.y - from.y);
                Some(canvas::Action::publish(Message::PreviewPanned(delta)).and_capture())
            }
            mouse::Event::WheelScrolled { delta } => {
                let anchor = cursor.position_in(bounds)?;
                let y = match delta {
                    mouse::ScrollDelta::Lines { y, .. } | mouse::ScrollDelta::Pixels { y, .. } => *y,
                };
                let factor = if y > 0.0 {
                    ZOOM_IN_STEP
                } else if y < 0.0 {
                    ZOOM_OUT_STEP
                } else {
                    return None;
                };
                Some(canvas::Action::publish(Message::PreviewZoomAt(factor, anchor)).and_capture())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &PreviewState,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), self.background);

        let rect = self.viewport.image_rect(self.image.size(), bounds.size());
        frame.draw_image(rect, canvas::Image::new(self.image.handle.clone()));

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &PreviewState,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.drag_from.is_some() {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}
