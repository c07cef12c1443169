//! A renderer that records draw calls instead of rasterizing them.
//!
//! Useful for headless hosts and for asserting paint order in tests.

use crate::brush::TextureId;
use crate::renderer::{FrameStats, Renderer};
use crate::text::Font;
use crate::transform::Transform2D;
use crate::types::{Color, Point, Rect, Size};

/// One recorded primitive, with the state it was drawn under.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        thickness: f32,
    },
    Texture {
        texture: TextureId,
        source: Option<Rect>,
        dest: Rect,
        tint: Color,
    },
    Text {
        text: String,
        origin: Point,
        color: Color,
    },
}

/// A recorded primitive plus the transform and scissor active for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub command: DrawCommand,
    pub transform: Transform2D,
    pub scissor: Option<Rect>,
}

/// [`Renderer`] that appends every draw to a list.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    draws: Vec<RecordedDraw>,
    transform: Transform2D,
    scissor: Option<Rect>,
    viewport: Size,
    stats: FrameStats,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything drawn since the last `begin_frame`.
    #[inline]
    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    /// Viewport passed to the last `begin_frame`.
    #[inline]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Filled rectangles in draw order.
    pub fn filled_rects(&self) -> Vec<(Rect, Color)> {
        self.draws
            .iter()
            .filter_map(|draw| match draw.command {
                DrawCommand::FillRect { rect, color } => Some((rect, color)),
                _ => None,
            })
            .collect()
    }

    /// Text strings in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.draws
            .iter()
            .filter_map(|draw| match &draw.command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Drop everything recorded so far.
    pub fn clear(&mut self) {
        self.draws.clear();
        self.stats = FrameStats::default();
    }

    fn record(&mut self, command: DrawCommand) {
        self.stats.draw_calls += 1;
        self.draws.push(RecordedDraw {
            command,
            transform: self.transform,
            scissor: self.scissor,
        });
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, _clear_color: Color, viewport_size: Size) {
        self.clear();
        self.viewport = viewport_size;
        self.transform = Transform2D::IDENTITY;
        self.scissor = None;
    }

    fn end_frame(&mut self) -> FrameStats {
        self.stats.clone()
    }

    fn set_transform(&mut self, transform: Transform2D) {
        self.stats.state_changes += 1;
        self.transform = transform;
    }

    fn set_scissor(&mut self, scissor: Option<Rect>) {
        self.stats.state_changes += 1;
        self.scissor = scissor;
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.record(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: f32) {
        self.record(DrawCommand::StrokeRect {
            rect,
            color,
            thickness,
        });
    }

    fn draw_texture(&mut self, texture: TextureId, source: Option<Rect>, dest: Rect, tint: Color) {
        self.record(DrawCommand::Texture {
            texture,
            source,
            dest,
            tint,
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, _font: &Font, color: Color) {
        self.record(DrawCommand::Text {
            text: text.to_string(),
            origin,
            color,
        });
    }
}
