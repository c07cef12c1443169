//! Rendering primitives for weft.
//!
//! This crate does not rasterize anything. It provides the geometry types the
//! layout engine works in, the [`Renderer`] trait a backend implements, and
//! [`RenderContext`], which tracks transform, scissor and opacity while widgets
//! paint.
//!
//! # Quick Start
//!
//! ```
//! use weft_render::{Color, RecordingRenderer, Rect, RenderContext};
//!
//! let mut backend = RecordingRenderer::new();
//! let mut ctx = RenderContext::new(&mut backend);
//! ctx.save();
//! ctx.multiply_opacity(0.5);
//! ctx.fill_rectangle(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);
//! ctx.restore();
//!
//! assert_eq!(backend.filled_rects()[0].1, Color::WHITE.with_opacity(0.5));
//! ```

mod brush;
mod context;
mod error;
mod recording;
mod renderer;
pub mod text;
mod transform;
mod types;

pub use brush::{Brush, TextureId};
pub use context::{RenderContext, RenderState, RenderStateStack};
pub use error::{RenderError, RenderResult};
pub use recording::{DrawCommand, RecordedDraw, RecordingRenderer};
pub use renderer::{FrameStats, Renderer};
pub use text::{Font, RichText, TextRun};
pub use transform::Transform2D;
pub use types::{Color, Point, Rect, Size};
