//! Stateful drawing on top of a [`Renderer`].
//!
//! [`RenderContext`] keeps a save/restore stack of transform, scissor and
//! opacity. Draw calls flush whatever state changed since the last draw to
//! the backend, then forward the primitive with opacity applied.

use crate::brush::Brush;
use crate::renderer::Renderer;
use crate::text::{Font, RichText};
use crate::transform::Transform2D;
use crate::types::{Color, Point, Rect};

/// Saved state for save/restore operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    /// Absolute transform.
    pub transform: Transform2D,
    /// Device-space scissor, `None` when unclipped.
    pub clip: Option<Rect>,
    /// Accumulated opacity in `[0, 1]`.
    pub opacity: f32,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            transform: Transform2D::IDENTITY,
            clip: None,
            opacity: 1.0,
        }
    }
}

/// Save/restore bookkeeping, independent of any backend.
#[derive(Debug, Clone, Default)]
pub struct RenderStateStack {
    stack: Vec<RenderState>,
    current: RenderState,
}

impl RenderStateStack {
    /// Create a new state stack with default state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state.
    #[inline]
    pub fn current(&self) -> &RenderState {
        &self.current
    }

    /// Save the current state.
    pub fn save(&mut self) {
        self.stack.push(self.current);
    }

    /// Restore the previously saved state. Unbalanced restores are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.current = state;
        }
    }

    /// Get the current transform.
    #[inline]
    pub fn transform(&self) -> &Transform2D {
        &self.current.transform
    }

    /// Replace the current transform.
    #[inline]
    pub fn set_transform(&mut self, transform: Transform2D) {
        self.current.transform = transform;
    }

    /// Concatenate a transform with the current transform.
    #[inline]
    pub fn concat_transform(&mut self, transform: &Transform2D) {
        self.current.transform = self.current.transform.then(transform);
    }

    /// Intersect the clip with `rect` mapped through the current transform.
    ///
    /// Returns `false` when the resulting clip is empty.
    pub fn clip_rect(&mut self, rect: Rect) -> bool {
        let transformed = self.current.transform.transform_rect(&rect);

        let clip = match self.current.clip {
            Some(existing) => existing.intersect(&transformed),
            None => Some(transformed),
        };
        match clip {
            Some(clip) if !clip.is_empty() => {
                self.current.clip = Some(clip);
                true
            }
            _ => {
                self.current.clip = Some(Rect::ZERO);
                false
            }
        }
    }

    /// Get the current clip bounds.
    #[inline]
    pub fn clip_bounds(&self) -> Option<Rect> {
        self.current.clip
    }

    /// Multiply the current opacity by `factor`.
    #[inline]
    pub fn multiply_opacity(&mut self, factor: f32) {
        self.current.opacity *= factor.clamp(0.0, 1.0);
    }

    /// Get the current opacity.
    #[inline]
    pub fn opacity(&self) -> f32 {
        self.current.opacity
    }

    /// Get the stack depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

/// Drawing context handed to widgets while painting.
pub struct RenderContext<'a> {
    renderer: &'a mut dyn Renderer,
    state: RenderStateStack,
    flushed_transform: Option<Transform2D>,
    flushed_clip: Option<Option<Rect>>,
}

impl<'a> RenderContext<'a> {
    /// Wrap a backend. The state starts at identity, unclipped, fully opaque.
    pub fn new(renderer: &'a mut dyn Renderer) -> Self {
        Self {
            renderer,
            state: RenderStateStack::new(),
            flushed_transform: None,
            flushed_clip: None,
        }
    }

    /// Save the current state.
    #[inline]
    pub fn save(&mut self) {
        self.state.save();
    }

    /// Restore the previously saved state.
    #[inline]
    pub fn restore(&mut self) {
        self.state.restore();
    }

    /// Current state snapshot.
    #[inline]
    pub fn state(&self) -> &RenderState {
        self.state.current()
    }

    /// Replace the current transform.
    pub fn set_transform(&mut self, transform: Transform2D) {
        self.state.set_transform(transform);
    }

    /// Concatenate a transform onto the current one.
    pub fn concat_transform(&mut self, transform: &Transform2D) {
        self.state.concat_transform(transform);
    }

    /// Intersect the scissor with `rect` in current coordinates.
    ///
    /// Returns `false` when nothing remains visible.
    pub fn clip_rect(&mut self, rect: Rect) -> bool {
        self.state.clip_rect(rect)
    }

    /// Current device-space scissor.
    #[inline]
    pub fn clip_bounds(&self) -> Option<Rect> {
        self.state.clip_bounds()
    }

    /// Multiply the current opacity.
    #[inline]
    pub fn multiply_opacity(&mut self, factor: f32) {
        self.state.multiply_opacity(factor);
    }

    /// Current accumulated opacity.
    #[inline]
    pub fn opacity(&self) -> f32 {
        self.state.opacity()
    }

    fn flush(&mut self) -> bool {
        let current = *self.state.current();
        if current.opacity <= 0.0 {
            return false;
        }
        if matches!(current.clip, Some(clip) if clip.is_empty()) {
            return false;
        }
        if self.flushed_transform != Some(current.transform) {
            self.renderer.set_transform(current.transform);
            self.flushed_transform = Some(current.transform);
        }
        if self.flushed_clip != Some(current.clip) {
            self.renderer.set_scissor(current.clip);
            self.flushed_clip = Some(current.clip);
        }
        true
    }

    /// Fill `rect` with a solid color.
    pub fn fill_rectangle(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() || !self.flush() {
            return;
        }
        let color = color.with_opacity(self.opacity());
        self.renderer.fill_rect(rect, color);
    }

    /// Outline `rect` with a stroke of `thickness` lying inside it.
    pub fn draw_rectangle(&mut self, rect: Rect, color: Color, thickness: f32) {
        if rect.is_empty() || thickness <= 0.0 || !self.flush() {
            return;
        }
        let color = color.with_opacity(self.opacity());
        self.renderer.stroke_rect(rect, color, thickness);
    }

    /// Draw a brush into `dest`, multiplied by `color`.
    pub fn draw_brush(&mut self, brush: &Brush, dest: Rect, color: Color) {
        match *brush {
            Brush::Solid(fill) => self.fill_rectangle(dest, multiply(fill, color)),
            Brush::Texture {
                texture,
                source,
                tint,
            } => {
                if dest.is_empty() || !self.flush() {
                    return;
                }
                let tint = multiply(tint, color).with_opacity(self.opacity());
                self.renderer.draw_texture(texture, source, dest, tint);
            }
        }
    }

    /// Draw one line of plain text.
    pub fn draw_text(&mut self, text: &str, origin: Point, font: &Font, color: Color) {
        if text.is_empty() || !self.flush() {
            return;
        }
        let color = color.with_opacity(self.opacity());
        self.renderer.draw_text(text, origin, font, color);
    }

    /// Draw parsed rich text, using `default_color` for uncolored runs.
    pub fn draw_rich_text(
        &mut self,
        text: &RichText,
        origin: Point,
        font: &Font,
        default_color: Color,
    ) {
        for (line_index, line) in text.lines().iter().enumerate() {
            let y = origin.y + line_index as f32 * font.line_height;
            let mut x = origin.x;
            for run in line {
                let color = run.color.unwrap_or(default_color);
                self.draw_text(&run.text, Point::new(x, y), font, color);
                x += font.advance(&run.text);
            }
        }
    }
}

fn multiply(a: Color, b: Color) -> Color {
    Color::new(a.r * b.r, a.g * b.g, a.b * b.b, a.a * b.a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_state_default() {
        let state = RenderState::default();
        assert!(state.transform.is_identity());
        assert!(state.clip.is_none());
        assert_eq!(state.opacity, 1.0);
    }

    #[test]
    fn test_render_state_stack() {
        let mut stack = RenderStateStack::new();

        stack.concat_transform(&Transform2D::translate(10.0, 20.0));
        stack.save();
        stack.concat_transform(&Transform2D::translate(5.0, 5.0));
        stack.multiply_opacity(0.5);
        assert_eq!(stack.transform().translation(), (15.0, 25.0));
        assert_eq!(stack.depth(), 1);

        stack.restore();
        assert_eq!(stack.transform().translation(), (10.0, 20.0));
        assert_eq!(stack.opacity(), 1.0);

        // Unbalanced restore keeps the current state
        stack.restore();
        assert_eq!(stack.transform().translation(), (10.0, 20.0));
    }

    #[test]
    fn test_clip_intersection() {
        let mut stack = RenderStateStack::new();

        assert!(stack.clip_rect(Rect::new(0.0, 0.0, 100.0, 100.0)));
        assert_eq!(stack.clip_bounds(), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));

        assert!(stack.clip_rect(Rect::new(50.0, 50.0, 100.0, 100.0)));
        assert_eq!(stack.clip_bounds(), Some(Rect::new(50.0, 50.0, 50.0, 50.0)));

        assert!(!stack.clip_rect(Rect::new(200.0, 200.0, 10.0, 10.0)));
    }

    #[test]
    fn test_clip_uses_current_transform() {
        let mut stack = RenderStateStack::new();
        stack.set_transform(Transform2D::translate(10.0, 0.0));
        stack.clip_rect(Rect::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(stack.clip_bounds(), Some(Rect::new(10.0, 0.0, 20.0, 20.0)));
    }
}
