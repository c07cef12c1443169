//! Keyboard routing: key-down with repeat, key-up and typed characters.

use tracing::trace;
use weft_core::logging::targets;

use super::Desktop;
use crate::widget::{Key, Window};

impl Desktop {
    /// Diff the key sets of this frame and deliver the resulting events.
    pub(super) fn process_keys(&mut self) {
        let now = self.input.now();
        for key in self.input.pressed_keys() {
            self.key_repeat.press(key, now);
            self.on_key_down(key);
        }
        for key in self.input.released_keys() {
            self.key_repeat.release(key);
            self.on_key_up(key);
        }

        let start = self.config.repeat_key_down_start();
        let interval = self.config.repeat_key_down_interval();
        for key in self.input.held_keys() {
            if self.key_repeat.poll(key, now, start, interval) {
                trace!(target: targets::INPUT, ?key, "key repeat");
                self.on_key_down(key);
            }
        }
    }

    fn on_key_down(&mut self, key: Key) {
        self.key_down.emit(key);

        if key == Key::Tab && self.config.tab_navigation {
            let moved = if self.input.is_shift_down() {
                self.focus_previous()
            } else {
                self.focus_next()
            };
            if let Err(err) = moved {
                trace!(target: targets::FOCUS, error = %err, "tab navigation failed");
            }
            return;
        }

        if key == Key::Escape {
            if let Some(active) = self.active_widget() {
                if self.focused_keyboard != Some(active) && self.tree.behavior::<Window>(active).is_some() {
                    self.call_widget(active, |widget, ctx| widget.on_key_down(ctx, key));
                }
            }
        }

        if let Some(focused) = self.focused_keyboard {
            self.call_widget(focused, |widget, ctx| widget.on_key_down(ctx, key));
            if let Ok(base) = self.tree.base(focused) {
                base.key_down.emit(key);
            }
        }

        if key == Key::Escape && self.context_menu.is_some() {
            self.hide_context_menu();
        }
    }

    fn on_key_up(&mut self, key: Key) {
        self.key_up.emit(key);
        if let Some(focused) = self.focused_keyboard {
            self.call_widget(focused, |widget, ctx| widget.on_key_up(ctx, key));
            if let Ok(base) = self.tree.base(focused) {
                base.key_up.emit(key);
            }
        }
    }

    pub(super) fn on_char(&mut self, c: char) {
        self.char_typed.emit(c);
        if let Some(focused) = self.focused_keyboard {
            self.call_widget(focused, |widget, ctx| widget.on_char(ctx, c));
            if let Ok(base) = self.tree.base(focused) {
                base.char_typed.emit(c);
            }
        }
    }
}
