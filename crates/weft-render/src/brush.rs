//! Brushes: what fills a widget's background or border.

use crate::types::{Color, Rect};

/// Opaque handle to a texture owned by the rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Something that can be drawn into a destination rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Brush {
    /// A flat color.
    Solid(Color),
    /// A texture region stretched over the destination, multiplied by `tint`.
    Texture {
        texture: TextureId,
        /// Region of the texture to sample; `None` samples all of it.
        source: Option<Rect>,
        tint: Color,
    },
}

impl Brush {
    /// Shorthand for a solid brush.
    #[inline]
    pub const fn solid(color: Color) -> Self {
        Self::Solid(color)
    }
}

impl From<Color> for Brush {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}
