//! The single context menu.

use tracing::debug;
use weft_core::logging::targets;
use weft_core::{WeftResult, WidgetId};
use weft_render::Point;

use super::Desktop;
use crate::widget::{HorizontalAlignment, MouseWheelFocusType, VerticalAlignment};

/// Arguments of [`Desktop::context_menu_closing`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenuClosing {
    /// The open menu.
    pub menu: WidgetId,
    /// Desktop position of the touch that would close it.
    pub position: Point,
    /// Deepest widget under the touch, if any.
    pub target: Option<WidgetId>,
}

impl Desktop {
    /// The open context menu.
    #[inline]
    pub fn context_menu(&self) -> Option<WidgetId> {
        self.context_menu
    }

    /// Show `menu` at a desktop position, replacing any open menu.
    ///
    /// The position is pulled back so the menu's measured size fits inside
    /// the desktop bounds.
    pub fn show_context_menu(&mut self, menu: WidgetId, position: Point) -> WeftResult<()> {
        self.tree.check(menu)?;
        if self.context_menu.is_some() {
            self.hide_context_menu();
        }

        self.tree
            .widget_mut(menu)?
            .set_horizontal_alignment(HorizontalAlignment::Left)
            .set_vertical_alignment(VerticalAlignment::Top);
        let size = self.tree.measure(menu, self.bounds.size);

        let mut x = position.x;
        let mut y = position.y;
        if x + size.width > self.bounds.right() {
            x = self.bounds.right() - size.width;
        }
        if y + size.height > self.bounds.bottom() {
            y = self.bounds.bottom() - size.height;
        }

        self.tree
            .widget_mut(menu)?
            .set_position(x - self.bounds.left(), y - self.bounds.top())
            .set_visible(true);
        self.tree.add_root(menu)?;

        self.context_menu = Some(menu);
        debug!(target: targets::DESKTOP, ?menu, x, y, "context menu shown");

        if self.tree.node_base(menu).accepts_keyboard_focus {
            self.previous_keyboard_focus = self.focused_keyboard;
            self.set_keyboard_focus(Some(menu))?;
        }
        let wheel_focus = self
            .tree
            .dyn_behavior(menu)
            .map_or(MouseWheelFocusType::None, |w| w.mouse_wheel_focus_type());
        if wheel_focus != MouseWheelFocusType::None {
            self.scheduled_wheel_focus = Some(menu);
        }
        Ok(())
    }

    /// Hide the open context menu and give focus back to its previous holders.
    pub fn hide_context_menu(&mut self) {
        let Some(menu) = self.context_menu.take() else {
            return;
        };

        if self.tree.roots().contains(&menu) {
            if let Err(err) = self.tree.remove_root(menu) {
                debug!(
                    target: targets::DESKTOP,
                    ?menu,
                    error = %err,
                    "could not remove context menu"
                );
            }
        }
        if let Ok(mut handle) = self.tree.widget_mut(menu) {
            handle.set_visible(false);
        }
        debug!(target: targets::DESKTOP, ?menu, "context menu hidden");
        self.context_menu_closed.emit(menu);

        self.release_unplaced_focus();
        // Only a remembered holder is restored; no holder leaves focus as is
        if let Some(keyboard) = self
            .previous_keyboard_focus
            .take()
            .filter(|id| self.tree.is_placed(*id))
        {
            if let Err(err) = self.set_keyboard_focus(Some(keyboard)) {
                debug!(target: targets::FOCUS, error = %err, "could not restore keyboard focus");
            }
        }
        if let Some(wheel) = self
            .previous_wheel_focus
            .take()
            .filter(|id| self.tree.is_placed(*id))
        {
            self.set_mouse_wheel_focus(Some(wheel));
        }
    }
}
