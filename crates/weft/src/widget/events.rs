//! Input event kinds and the small state machines that synthesize them.

use std::collections::HashMap;
use std::time::Duration;

use weft_render::Point;

/// Physical key identifier.
pub use winit::keyboard::KeyCode as Key;

/// Pointer events delivered to a single widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetEvent {
    MouseEntered,
    MouseLeft,
    MouseMoved,
    MouseWheel(f32),
    TouchEntered,
    TouchLeft,
    TouchMoved,
    TouchDown,
    TouchUp,
    TouchDoubleClick,
}

/// Pointer events observed by the desktop as a whole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DesktopEvent {
    MouseMoved,
    MouseWheel(f32),
    TouchDown,
    TouchUp,
    TouchMoved,
    TouchDoubleClick,
}

/// Detects double clicks from successive touch-downs.
///
/// A touch-down is a double click when it comes strictly less than `interval`
/// after the previous one and within `radius` pixels on each axis. A detected
/// double click resets the tracker, so a third quick touch starts over.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DoubleClickTracker {
    last: Option<(Duration, Point)>,
}

impl DoubleClickTracker {
    /// Record a touch-down; returns `true` if it completes a double click.
    pub fn register(&mut self, now: Duration, position: Point, interval: Duration, radius: f32) -> bool {
        if let Some((at, previous)) = self.last {
            if now.saturating_sub(at) < interval && position.is_within(previous, radius) {
                self.last = None;
                return true;
            }
        }
        self.last = Some((now, position));
        false
    }

    /// Forget the previous touch-down.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[derive(Debug, Clone, Copy)]
struct RepeatState {
    pressed_at: Duration,
    last_repeat: Option<Duration>,
}

/// Key auto-repeat timing.
///
/// The first repeat fires once more than `start` has elapsed since the press,
/// further repeats once more than `interval` has elapsed since the previous.
#[derive(Debug, Clone, Default)]
pub struct KeyRepeat {
    keys: HashMap<Key, RepeatState>,
}

impl KeyRepeat {
    /// Start tracking a freshly pressed key.
    pub fn press(&mut self, key: Key, now: Duration) {
        self.keys.insert(
            key,
            RepeatState {
                pressed_at: now,
                last_repeat: None,
            },
        );
    }

    /// Stop tracking a released key.
    pub fn release(&mut self, key: Key) {
        self.keys.remove(&key);
    }

    /// Whether a held key should repeat now.
    pub fn poll(&mut self, key: Key, now: Duration, start: Duration, interval: Duration) -> bool {
        let Some(state) = self.keys.get_mut(&key) else {
            return false;
        };
        let fire = match state.last_repeat {
            None => now.saturating_sub(state.pressed_at) > start,
            Some(last) => now.saturating_sub(last) > interval,
        };
        if fire {
            state.last_repeat = Some(now);
        }
        fire
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERVAL: Duration = Duration::from_millis(500);

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_double_click_window() {
        let mut tracker = DoubleClickTracker::default();
        assert!(!tracker.register(ms(0), Point::new(10.0, 10.0), INTERVAL, 2.0));
        assert!(tracker.register(ms(200), Point::new(12.0, 11.0), INTERVAL, 2.0));
        // Reset by the detected double click
        assert!(!tracker.register(ms(250), Point::new(12.0, 11.0), INTERVAL, 2.0));
    }

    #[test]
    fn test_double_click_interval_is_strict() {
        let mut tracker = DoubleClickTracker::default();
        tracker.register(ms(0), Point::ZERO, INTERVAL, 2.0);
        assert!(!tracker.register(ms(500), Point::ZERO, INTERVAL, 2.0));
    }

    #[test]
    fn test_double_click_radius() {
        let mut tracker = DoubleClickTracker::default();
        tracker.register(ms(0), Point::ZERO, INTERVAL, 2.0);
        assert!(!tracker.register(ms(100), Point::new(3.0, 0.0), INTERVAL, 2.0));
        // The far touch became the new baseline
        assert!(tracker.register(ms(150), Point::new(4.0, 2.0), INTERVAL, 2.0));
    }

    #[test]
    fn test_key_repeat_timing() {
        let start = ms(500);
        let interval = ms(50);
        let mut repeat = KeyRepeat::default();
        repeat.press(Key::KeyA, ms(0));

        assert!(!repeat.poll(Key::KeyA, ms(500), start, interval));
        assert!(repeat.poll(Key::KeyA, ms(501), start, interval));
        assert!(!repeat.poll(Key::KeyA, ms(551), start, interval));
        assert!(repeat.poll(Key::KeyA, ms(552), start, interval));

        repeat.release(Key::KeyA);
        assert!(!repeat.poll(Key::KeyA, ms(2000), start, interval));
    }
}
