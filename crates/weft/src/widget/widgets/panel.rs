//! Free-form container.

use crate::widget::Widget;

/// A container that sizes itself to its largest child and places every
/// child in its content rectangle according to the child's own alignment
/// and position.
///
/// Input falls through a panel without a background.
#[derive(Debug, Clone, Copy, Default)]
pub struct Panel;

impl Panel {
    pub fn new() -> Self {
        Self
    }
}

impl Widget for Panel {
    fn type_name(&self) -> &'static str {
        "Panel"
    }

    fn is_container(&self) -> bool {
        true
    }

    fn is_pass_through(&self) -> bool {
        true
    }
}
