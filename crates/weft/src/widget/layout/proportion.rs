//! Column and row sizing rules.

use std::fmt;

use weft_core::{WeftError, WeftResult};

/// How a grid column (or row) takes its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProportionType {
    /// Sized to the largest content in the column.
    #[default]
    Auto,
    /// A share of the space left after `Auto` and `Pixels` columns.
    Part,
    /// Absorbs whatever space is left.
    Fill,
    /// A fixed number of pixels.
    Pixels,
}

/// A sizing rule: a [`ProportionType`] plus its numeric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proportion {
    pub kind: ProportionType,
    pub value: f32,
}

impl Default for Proportion {
    fn default() -> Self {
        Self::AUTO
    }
}

impl Proportion {
    /// Size to content.
    pub const AUTO: Self = Self::new(ProportionType::Auto, 1.0);
    /// Take remaining space.
    pub const FILL: Self = Self::new(ProportionType::Fill, 1.0);
    /// Rule for grid columns/rows beyond the explicit lists.
    pub const GRID_DEFAULT: Self = Self::new(ProportionType::Part, 1.0);
    /// Rule for stack panel children without an explicit proportion.
    pub const STACK_PANEL_DEFAULT: Self = Self::AUTO;

    /// Create a proportion.
    #[inline]
    pub const fn new(kind: ProportionType, value: f32) -> Self {
        Self { kind, value }
    }

    /// A `Part` share with the given weight.
    #[inline]
    pub const fn part(value: f32) -> Self {
        Self::new(ProportionType::Part, value)
    }

    /// A fixed pixel size.
    #[inline]
    pub const fn pixels(value: f32) -> Self {
        Self::new(ProportionType::Pixels, value)
    }

    /// Reject negative or non-finite values.
    pub fn validate(&self) -> WeftResult<()> {
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(WeftError::InvalidValue {
                property: "proportion",
                value: self.value,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Proportion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ProportionType::Auto => write!(f, "Auto"),
            ProportionType::Fill => write!(f, "Fill"),
            ProportionType::Part => write!(f, "Part: {:.2}", self.value),
            ProportionType::Pixels => write!(f, "Pixels: {}", self.value as i32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Proportion::AUTO.to_string(), "Auto");
        assert_eq!(Proportion::FILL.to_string(), "Fill");
        assert_eq!(Proportion::GRID_DEFAULT.to_string(), "Part: 1.00");
        assert_eq!(Proportion::pixels(50.7).to_string(), "Pixels: 50");
    }

    #[test]
    fn test_validate() {
        assert!(Proportion::part(0.0).validate().is_ok());
        assert!(Proportion::part(-1.0).validate().is_err());
        assert!(Proportion::pixels(f32::NAN).validate().is_err());
    }
}
