//! Top-level window with a title bar and a single content child.

use weft_core::{Signal, WidgetId};
use weft_render::{Color, Font, Rect, Size};

use crate::widget::{
    DesktopCommand, EventContext, Key, LayoutContext, PaintContext, Widget, WidgetBase, WidgetTree,
};

/// A movable top-level container.
///
/// Touching a window brings it to the front. Pressing the close key while it
/// holds keyboard focus asks the desktop to close it; the desktop emits
/// [`closed`](Window::closed) once it is gone.
pub struct Window {
    title: String,
    title_font: Font,
    title_color: Color,
    close_key: Option<Key>,

    /// Emitted after the desktop removed the window.
    pub closed: Signal<()>,
}

impl Default for Window {
    fn default() -> Self {
        Self::new("")
    }
}

impl Window {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            title_font: Font::default(),
            title_color: Color::WHITE,
            close_key: Some(Key::Escape),
            closed: Signal::new(),
        }
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_title_color(&mut self, color: Color) {
        self.title_color = color;
    }

    /// Key that closes the window, `None` to disable.
    pub fn set_close_key(&mut self, key: Option<Key>) {
        self.close_key = key;
    }

    /// The content widget.
    pub fn content(tree: &WidgetTree, id: WidgetId) -> Option<WidgetId> {
        tree.children(id).first().copied()
    }

    fn title_height(&self) -> f32 {
        if self.title.is_empty() {
            0.0
        } else {
            self.title_font.line_height
        }
    }
}

impl Widget for Window {
    fn type_name(&self) -> &'static str {
        "Window"
    }

    fn configure(&self, base: &mut WidgetBase) {
        base.accepts_keyboard_focus = true;
    }

    fn is_container(&self) -> bool {
        true
    }

    fn child_capacity(&self) -> Option<usize> {
        Some(1)
    }

    fn is_window(&self) -> bool {
        true
    }

    fn measure(&mut self, ctx: &mut LayoutContext<'_>, available: Size) -> Size {
        let title = Size::new(self.title_font.advance(&self.title), self.title_height());
        let content_available = Size::new(available.width, (available.height - title.height).max(0.0));
        let content = ctx.measure_children(content_available);
        Size::new(content.width.max(title.width), content.height + title.height)
    }

    fn arrange(&mut self, ctx: &mut LayoutContext<'_>, bounds: Rect) {
        let title = self.title_height().min(bounds.height());
        let content = Rect::new(
            bounds.left(),
            bounds.top() + title,
            bounds.width(),
            bounds.height() - title,
        );
        ctx.arrange_children(content);
    }

    fn paint(&self, ctx: &mut PaintContext<'_, '_>) {
        let origin = ctx.base().actual_bounds().origin;
        ctx.render()
            .draw_text(&self.title, origin, &self.title_font, self.title_color);
        ctx.paint_children();
    }

    fn on_key_down(&mut self, ctx: &mut EventContext<'_>, key: Key) {
        if Some(key) == self.close_key {
            ctx.post(DesktopCommand::Close(ctx.id()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untitled_window_has_no_title_bar() {
        assert_eq!(Window::default().title_height(), 0.0);
        assert_eq!(Window::new("Settings").title_height(), Font::default().line_height);
    }
}
