//! The draw-sink trait backends implement.
//!
//! A [`Renderer`] is deliberately dumb: it receives absolute transforms and
//! scissor rectangles, plus a handful of primitive draws. State stacking,
//! opacity accumulation and scissor intersection live in
//! [`RenderContext`](crate::RenderContext), so backends never have to
//! duplicate that bookkeeping.

use crate::brush::TextureId;
use crate::text::Font;
use crate::transform::Transform2D;
use crate::types::{Color, Point, Rect, Size};

/// Statistics from a frame render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Number of primitive draws submitted.
    pub draw_calls: u32,
    /// Number of transform or scissor changes submitted.
    pub state_changes: u32,
}

/// The 2D drawing interface a desktop renders into.
///
/// # Frame Lifecycle
///
/// ```ignore
/// renderer.begin_frame(Color::BLACK, viewport);
/// renderer.set_transform(Transform2D::IDENTITY);
/// renderer.set_scissor(Some(viewport_rect));
/// renderer.fill_rect(rect, Color::RED);
/// let stats = renderer.end_frame();
/// ```
///
/// Colors passed to draw calls already include accumulated opacity.
pub trait Renderer {
    /// Begin a new frame cleared to `clear_color`.
    fn begin_frame(&mut self, clear_color: Color, viewport_size: Size);

    /// End the current frame.
    fn end_frame(&mut self) -> FrameStats;

    /// Set the absolute transform applied to subsequent draws.
    fn set_transform(&mut self, transform: Transform2D);

    /// Set the device-space scissor rectangle, or disable scissoring.
    fn set_scissor(&mut self, scissor: Option<Rect>);

    /// Fill a rectangle with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Outline a rectangle. The stroke lies inside `rect`.
    fn stroke_rect(&mut self, rect: Rect, color: Color, thickness: f32);

    /// Draw a texture region stretched into `dest`, multiplied by `tint`.
    fn draw_texture(&mut self, texture: TextureId, source: Option<Rect>, dest: Rect, tint: Color);

    /// Draw a single line of text with its top-left corner at `origin`.
    fn draw_text(&mut self, text: &str, origin: Point, font: &Font, color: Color);
}
