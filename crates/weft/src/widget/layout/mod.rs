//! Layout primitives shared by the measure/arrange protocol.
//!
//! # Key Types
//!
//! - [`Thickness`] - margin, border and padding insets
//! - [`HorizontalAlignment`] / [`VerticalAlignment`] - placement inside a container slot
//! - [`Proportion`] - column/row sizing rule for grids and stack panels
//! - [`GridLayout`] - the proportional sizing engine

mod grid_layout;
mod proportion;

pub use grid_layout::{GridLayout, GridPlacement, MAX_GRID_TRACKS};
pub use proportion::{Proportion, ProportionType};

use weft_render::{Rect, Size};

/// Insets on each side of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Thickness {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Thickness {
    /// No insets.
    pub const ZERO: Self = Self::uniform(0.0);

    /// Create a thickness from individual edges.
    #[inline]
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same inset on every edge.
    #[inline]
    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// `horizontal` on left/right, `vertical` on top/bottom.
    #[inline]
    pub const fn symmetric(horizontal: f32, vertical: f32) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
    }

    /// Left plus right.
    #[inline]
    pub fn width(&self) -> f32 {
        self.left + self.right
    }

    /// Top plus bottom.
    #[inline]
    pub fn height(&self) -> f32 {
        self.top + self.bottom
    }

    /// Total insets as a size.
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Shrink `rect` by these insets, never below zero size.
    #[inline]
    pub fn deflate(&self, rect: Rect) -> Rect {
        rect.deflate_edges(self.left, self.top, self.right, self.bottom)
    }

    /// Sum of two thicknesses, edge by edge.
    #[inline]
    pub fn plus(&self, other: &Thickness) -> Thickness {
        Thickness::new(
            self.left + other.left,
            self.top + other.top,
            self.right + other.right,
            self.bottom + other.bottom,
        )
    }

    pub(crate) fn is_valid(&self) -> bool {
        [self.left, self.top, self.right, self.bottom]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Horizontal placement inside a container slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
    Stretch,
}

/// Vertical placement inside a container slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlignment {
    #[default]
    Top,
    Center,
    Bottom,
    Stretch,
}

/// Direction children are laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Place a control of `control` size inside a container of `container` size.
///
/// The returned rectangle is relative to the container's origin.
pub fn align(
    container: Size,
    control: Size,
    horizontal: HorizontalAlignment,
    vertical: VerticalAlignment,
) -> Rect {
    let mut result = Rect::new(0.0, 0.0, control.width, control.height);

    match horizontal {
        HorizontalAlignment::Left => {}
        HorizontalAlignment::Center => {
            result.origin.x = ((container.width - control.width) / 2.0).trunc();
        }
        HorizontalAlignment::Right => result.origin.x = container.width - control.width,
        HorizontalAlignment::Stretch => result.size.width = container.width,
    }

    match vertical {
        VerticalAlignment::Top => {}
        VerticalAlignment::Center => {
            result.origin.y = ((container.height - control.height) / 2.0).trunc();
        }
        VerticalAlignment::Bottom => result.origin.y = container.height - control.height,
        VerticalAlignment::Stretch => result.size.height = container.height,
    }

    result
}
