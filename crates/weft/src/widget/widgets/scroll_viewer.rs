//! Vertical scrolling container.

use weft_core::WidgetId;
use weft_render::{Rect, Size};

use crate::widget::{
    EventContext, LayoutContext, MouseWheelFocusType, Widget, WidgetBase, WidgetTree,
};

/// Pixels scrolled per wheel unit.
const SCROLL_STEP: f32 = 1.0;

/// Clips a single child and scrolls it vertically with the mouse wheel.
///
/// The child is measured with unbounded height. The viewer receives wheel
/// input while hovered and keeps wheel focus when the pointer touches empty
/// desktop space.
#[derive(Debug, Clone, Default)]
pub struct ScrollViewer {
    scroll: f32,
    max_scroll: f32,
}

impl ScrollViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current vertical offset.
    #[inline]
    pub fn scroll_position(&self) -> f32 {
        self.scroll
    }

    /// Largest offset reached by the last arrange.
    #[inline]
    pub fn max_scroll(&self) -> f32 {
        self.max_scroll
    }

    /// Set the offset, clamped to the scrollable range.
    pub fn set_scroll_position(&mut self, position: f32) {
        self.scroll = position.clamp(0.0, self.max_scroll);
    }

    pub fn content(tree: &WidgetTree, id: WidgetId) -> Option<WidgetId> {
        tree.children(id).first().copied()
    }
}

impl Widget for ScrollViewer {
    fn type_name(&self) -> &'static str {
        "ScrollViewer"
    }

    fn configure(&self, base: &mut WidgetBase) {
        base.clip_to_bounds = true;
    }

    fn is_container(&self) -> bool {
        true
    }

    fn child_capacity(&self) -> Option<usize> {
        Some(1)
    }

    fn is_pass_through(&self) -> bool {
        true
    }

    fn mouse_wheel_focus_type(&self) -> MouseWheelFocusType {
        MouseWheelFocusType::Hover
    }

    fn mouse_wheel_focus_can_be_null(&self) -> bool {
        false
    }

    fn measure(&mut self, ctx: &mut LayoutContext<'_>, available: Size) -> Size {
        let content = ctx.measure_children(Size::new(available.width, f32::INFINITY));
        Size::new(content.width, content.height.min(available.height))
    }

    fn arrange(&mut self, ctx: &mut LayoutContext<'_>, bounds: Rect) {
        let content = ctx.measure_children(Size::new(bounds.width(), f32::INFINITY));
        let height = content.height.max(bounds.height());
        self.max_scroll = (height - bounds.height()).max(0.0);
        self.scroll = self.scroll.clamp(0.0, self.max_scroll);

        let rect = Rect::new(bounds.left(), bounds.top() - self.scroll, bounds.width(), height);
        ctx.arrange_children(rect);
    }

    fn on_mouse_wheel(&mut self, ctx: &mut EventContext<'_>, delta: f32) {
        let previous = self.scroll;
        self.set_scroll_position(self.scroll - delta * SCROLL_STEP);
        if self.scroll != previous {
            let id = ctx.id();
            ctx.tree_mut().invalidate_arrange(id);
        }
    }
}
