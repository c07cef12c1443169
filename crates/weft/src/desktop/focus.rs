//! Keyboard and mouse-wheel focus.
//!
//! At most one widget holds each kind of focus. Moving keyboard focus first
//! consults the current holder's `losing_keyboard_focus` hook, which may veto
//! the change.

use tracing::{debug, trace};
use weft_core::logging::targets;
use weft_core::{WeftResult, WidgetId};

use super::Desktop;

impl Desktop {
    #[inline]
    pub fn focused_keyboard_widget(&self) -> Option<WidgetId> {
        self.focused_keyboard
    }

    #[inline]
    pub fn focused_mouse_wheel_widget(&self) -> Option<WidgetId> {
        self.focused_wheel
    }

    /// Move keyboard focus.
    ///
    /// Returns `Ok(false)` if the current holder vetoed the change.
    pub fn set_keyboard_focus(&mut self, target: Option<WidgetId>) -> WeftResult<bool> {
        if let Some(target) = target {
            self.tree.check(target)?;
        }
        let previous = self.focused_keyboard;
        if previous == target {
            return Ok(true);
        }

        if let Some(old) = previous {
            if self.tree.is_placed(old)
                && self.tree.node_base(old).losing_keyboard_focus.invoke(&target).is_cancel()
            {
                debug!(target: targets::FOCUS, ?old, ?target, "keyboard focus change vetoed");
                return Ok(false);
            }
        }

        self.focused_keyboard = target;
        if let Some(old) = previous {
            self.notify_keyboard_focus_lost(old);
        }
        if let Some(new) = target {
            self.tree.node_base_mut(new).keyboard_focused = true;
            self.call_widget(new, |widget, ctx| widget.on_got_keyboard_focus(ctx));
            if let Ok(base) = self.tree.base(new) {
                base.keyboard_focus_changed.emit(true);
            }
            self.widget_got_keyboard_focus.emit(new);
        }
        debug!(target: targets::FOCUS, ?previous, ?target, "keyboard focus moved");
        Ok(true)
    }

    fn notify_keyboard_focus_lost(&mut self, old: WidgetId) {
        if !self.tree.contains(old) {
            return;
        }
        self.tree.node_base_mut(old).keyboard_focused = false;
        self.call_widget(old, |widget, ctx| widget.on_lost_keyboard_focus(ctx));
        if let Ok(base) = self.tree.base(old) {
            base.keyboard_focus_changed.emit(false);
        }
        self.widget_lost_keyboard_focus.emit(old);
    }

    /// Move keyboard focus to the next focusable widget, wrapping around.
    pub fn focus_next(&mut self) -> WeftResult<bool> {
        self.step_focus(true)
    }

    /// Move keyboard focus to the previous focusable widget, wrapping around.
    pub fn focus_previous(&mut self) -> WeftResult<bool> {
        self.step_focus(false)
    }

    fn step_focus(&mut self, forward: bool) -> WeftResult<bool> {
        let candidates: Vec<WidgetId> = self
            .tree
            .placed_depth_first()
            .into_iter()
            .filter(|id| {
                let base = self.tree.node_base(*id);
                base.accepts_keyboard_focus
                    && base.enabled
                    && base.active
                    && self.tree.is_visible_in_tree(*id)
            })
            .collect();
        if candidates.is_empty() {
            return Ok(false);
        }

        let len = candidates.len();
        let current = self
            .focused_keyboard
            .and_then(|f| candidates.iter().position(|c| *c == f));
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        self.set_keyboard_focus(Some(candidates[next]))
    }

    /// Move mouse-wheel focus. There is no veto for wheel focus.
    pub fn set_mouse_wheel_focus(&mut self, target: Option<WidgetId>) {
        if self.focused_wheel != target {
            trace!(target: targets::FOCUS, previous = ?self.focused_wheel, ?target, "wheel focus moved");
            self.focused_wheel = target;
        }
    }

    /// Apply the focus candidates collected during a fresh touch-down.
    pub(super) fn apply_touch_focus(&mut self, keyboard: Option<WidgetId>, wheel: Option<WidgetId>) {
        if let Err(err) = self.set_keyboard_focus(keyboard) {
            debug!(target: targets::FOCUS, error = %err, "touch focus target vanished");
        }

        match wheel {
            Some(id) => self.set_mouse_wheel_focus(Some(id)),
            None => {
                let nullable = self.focused_wheel.is_none_or(|holder| {
                    self.tree
                        .dyn_behavior(holder)
                        .is_none_or(|w| w.mouse_wheel_focus_can_be_null())
                });
                if nullable {
                    self.set_mouse_wheel_focus(None);
                }
            }
        }
    }

    pub(super) fn apply_scheduled_wheel_focus(&mut self) {
        if let Some(id) = self.scheduled_wheel_focus.take() {
            if self.tree.is_placed(id) {
                self.previous_wheel_focus = self.focused_wheel;
                self.set_mouse_wheel_focus(Some(id));
            }
        }
    }

    /// Drop focus held by widgets that left the desktop. No veto applies.
    pub(super) fn release_unplaced_focus(&mut self) {
        if let Some(id) = self.focused_keyboard {
            if !self.tree.is_placed(id) {
                self.focused_keyboard = None;
                self.notify_keyboard_focus_lost(id);
            }
        }
        if self.focused_wheel.is_some_and(|id| !self.tree.is_placed(id)) {
            self.focused_wheel = None;
        }
        if self.scheduled_wheel_focus.is_some_and(|id| !self.tree.is_placed(id)) {
            self.scheduled_wheel_focus = None;
        }
    }
}
