//! Polled input.
//!
//! The desktop does not consume discrete OS events. Once per frame it asks an
//! [`InputSource`] for the current pointer, wheel and keyboard state and
//! diffs it against the previous frame to synthesize enter/leave, down/up,
//! moved and repeat events.
//!
//! [`InputRecorder`] is the provided source: feed it winit window events (or
//! call its setters directly, as tests do) and hand a clone to the desktop.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use weft_render::Point;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::PhysicalKey;

use crate::widget::Key;

/// Pixels scrolled per wheel line.
const PIXELS_PER_LINE: f32 = 20.0;

/// Errors reported by an input source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The touch panel could not be queried this frame.
    #[error("touch panel unavailable: {0}")]
    TouchUnavailable(String),
}

/// Input state sampled once per frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Pointer position in desktop coordinates.
    pub mouse_position: Point,
    pub left_button: bool,
    pub middle_button: bool,
    pub right_button: bool,
    /// Cumulative wheel value; the desktop uses the difference between frames.
    pub wheel: f32,
    /// Keys held down right now.
    pub pressed_keys: HashSet<Key>,
    /// Characters typed since the previous sample.
    pub typed_chars: Vec<char>,
}

impl InputSnapshot {
    /// Whether any mouse button is held, which counts as a touch.
    #[inline]
    pub fn any_button_down(&self) -> bool {
        self.left_button || self.middle_button || self.right_button
    }
}

/// A poll-based provider of input state.
pub trait InputSource {
    /// Current state. Typed characters are consumed by the call.
    fn snapshot(&mut self) -> InputSnapshot;

    /// Primary touch-panel contact, if any.
    ///
    /// Only consulted when the desktop runs in touch input mode. Sources
    /// without a touch panel keep the default.
    fn touch_position(&mut self) -> Result<Option<Point>, InputError> {
        Ok(None)
    }
}

#[derive(Debug)]
struct Recorded {
    snapshot: InputSnapshot,
    touch: Result<Option<Point>, InputError>,
}

/// Shared, mutable input state implementing [`InputSource`].
///
/// Clones share the same state, so the host keeps one handle to record
/// events while the desktop polls another.
///
/// ```ignore
/// let input = InputRecorder::new();
/// let mut desktop = Desktop::new(Box::new(input.clone()), Box::new(SystemClock::new()));
///
/// // In the winit event loop:
/// input.handle_window_event(&event);
/// ```
#[derive(Debug, Clone)]
pub struct InputRecorder {
    state: Arc<Mutex<Recorded>>,
}

impl Default for InputRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl InputRecorder {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(Recorded {
                snapshot: InputSnapshot::default(),
                touch: Ok(None),
            })),
        }
    }

    /// Record a winit window event. Returns `true` if it affected input state.
    pub fn handle_window_event(&self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.set_mouse_position(Point::new(position.x as f32, position.y as f32));
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.set_button(*button, *state == ElementState::Pressed);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y * PIXELS_PER_LINE,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                self.scroll(amount);
                true
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return false;
                };
                match event.state {
                    ElementState::Pressed => {
                        self.press_key(code);
                        if let Some(text) = event.text.as_deref() {
                            text.chars().filter(|c| !c.is_control()).for_each(|c| self.type_char(c));
                        }
                    }
                    ElementState::Released => self.release_key(code),
                }
                true
            }
            WindowEvent::Focused(false) => {
                // Keys released while unfocused are never reported
                self.state.lock().snapshot.pressed_keys.clear();
                true
            }
            _ => false,
        }
    }

    pub fn set_mouse_position(&self, position: Point) {
        self.state.lock().snapshot.mouse_position = position;
    }

    pub fn set_button(&self, button: MouseButton, down: bool) {
        let snapshot = &mut self.state.lock().snapshot;
        match button {
            MouseButton::Left => snapshot.left_button = down,
            MouseButton::Middle => snapshot.middle_button = down,
            MouseButton::Right => snapshot.right_button = down,
            _ => {}
        }
    }

    /// Add to the cumulative wheel value.
    pub fn scroll(&self, amount: f32) {
        self.state.lock().snapshot.wheel += amount;
    }

    pub fn press_key(&self, key: Key) {
        self.state.lock().snapshot.pressed_keys.insert(key);
    }

    pub fn release_key(&self, key: Key) {
        self.state.lock().snapshot.pressed_keys.remove(&key);
    }

    pub fn type_char(&self, c: char) {
        self.state.lock().snapshot.typed_chars.push(c);
    }

    /// Set the result of the next touch-panel queries.
    pub fn set_touch(&self, touch: Result<Option<Point>, InputError>) {
        self.state.lock().touch = touch;
    }
}

impl InputSource for InputRecorder {
    fn snapshot(&mut self) -> InputSnapshot {
        let mut state = self.state.lock();
        let snapshot = state.snapshot.clone();
        state.snapshot.typed_chars.clear();
        snapshot
    }

    fn touch_position(&mut self) -> Result<Option<Point>, InputError> {
        self.state.lock().touch.clone()
    }
}

// =============================================================================
// Desktop-side state
// =============================================================================

/// Input state of the current frame, with the previous frame kept for diffing.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    mouse_position: Point,
    previous_mouse_position: Point,
    touch_position: Option<Point>,
    previous_touch_position: Option<Point>,
    wheel: Option<f32>,
    mouse_wheel_delta: f32,
    keys: HashSet<Key>,
    previous_keys: HashSet<Key>,
    now: Duration,
}

impl InputState {
    #[inline]
    pub fn mouse_position(&self) -> Point {
        self.mouse_position
    }

    #[inline]
    pub fn previous_mouse_position(&self) -> Point {
        self.previous_mouse_position
    }

    /// Touch (or pressed mouse) position, `None` while nothing is down.
    #[inline]
    pub fn touch_position(&self) -> Option<Point> {
        self.touch_position
    }

    #[inline]
    pub fn previous_touch_position(&self) -> Option<Point> {
        self.previous_touch_position
    }

    #[inline]
    pub fn is_touch_down(&self) -> bool {
        self.touch_position.is_some()
    }

    /// Wheel movement since the previous frame.
    #[inline]
    pub fn mouse_wheel_delta(&self) -> f32 {
        self.mouse_wheel_delta
    }

    #[inline]
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn is_shift_down(&self) -> bool {
        self.is_key_down(Key::ShiftLeft) || self.is_key_down(Key::ShiftRight)
    }

    pub fn is_control_down(&self) -> bool {
        self.is_key_down(Key::ControlLeft) || self.is_key_down(Key::ControlRight)
    }

    pub fn is_alt_down(&self) -> bool {
        self.is_key_down(Key::AltLeft) || self.is_key_down(Key::AltRight)
    }

    /// Clock time of the current frame.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Keys that went down this frame.
    pub(crate) fn pressed_keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self.keys.difference(&self.previous_keys).copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Keys that went up this frame.
    pub(crate) fn released_keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self.previous_keys.difference(&self.keys).copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Keys held in both frames.
    pub(crate) fn held_keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self.keys.intersection(&self.previous_keys).copied().collect();
        keys.sort_unstable();
        keys
    }

    pub(crate) fn begin_frame(&mut self, now: Duration) {
        self.now = now;
        self.previous_mouse_position = self.mouse_position;
        self.previous_touch_position = self.touch_position;
    }

    pub(crate) fn set_keys(&mut self, keys: HashSet<Key>) {
        self.previous_keys = std::mem::replace(&mut self.keys, keys);
    }

    pub(crate) fn set_pointer(&mut self, mouse: Point, touch: Option<Point>) {
        self.mouse_position = mouse;
        self.touch_position = touch;
    }

    /// Record the cumulative wheel value and compute the delta.
    pub(crate) fn set_wheel(&mut self, wheel: f32) {
        self.mouse_wheel_delta = match self.wheel {
            Some(previous) => wheel - previous,
            None => 0.0,
        };
        self.wheel = Some(wheel);
    }

    pub(crate) fn mouse_moved(&self) -> bool {
        self.mouse_position != self.previous_mouse_position
    }
}
