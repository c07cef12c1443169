//! Frame-driven desktop scenarios: pointer routing, focus, modality,
//! context menus and keyboard handling.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use weft::ConfigError;
use weft::desktop::{ContextMenuClosing, InputError};
use weft::prelude::*;
use weft::widget::WidgetBase;
use winit::event::MouseButton;

/// Solid leaf widget sized by explicit width and height.
struct Probe;

impl Widget for Probe {
    fn type_name(&self) -> &'static str {
        "Probe"
    }
}

struct Harness {
    input: InputRecorder,
    clock: ManualClock,
    desktop: Desktop,
    renderer: RecordingRenderer,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(DesktopConfig::default())
    }

    fn with_config(config: DesktopConfig) -> Self {
        let input = InputRecorder::new();
        let clock = ManualClock::new();
        let mut desktop =
            Desktop::with_config(config, Box::new(input.clone()), Box::new(clock.clone())).unwrap();
        desktop.set_bounds(Rect::new(0.0, 0.0, 800.0, 600.0));
        Self {
            input,
            clock,
            desktop,
            renderer: RecordingRenderer::new(),
        }
    }

    fn frame_at(&mut self, ms: u64) {
        self.clock.set_ms(ms);
        self.desktop.render(&mut self.renderer);
    }

    fn press(&mut self, at: Point, ms: u64) {
        self.input.set_mouse_position(at);
        self.input.set_button(MouseButton::Left, true);
        self.frame_at(ms);
    }

    fn release(&mut self, ms: u64) {
        self.input.set_button(MouseButton::Left, false);
        self.frame_at(ms);
    }

    fn tap(&mut self, at: Point, ms: u64) {
        self.press(at, ms);
        self.release(ms);
    }

    fn key(&mut self, key: Key, ms: u64) {
        self.input.press_key(key);
        self.frame_at(ms);
        self.input.release_key(key);
        self.frame_at(ms);
    }

    /// Create a probe at a desktop rectangle without adding it anywhere.
    fn probe(&mut self, rect: Rect) -> WidgetId {
        let tree = self.desktop.tree_mut();
        let id = tree.create(Probe);
        let mut handle = tree.widget_mut(id).unwrap();
        handle.set_position(rect.left(), rect.top());
        handle.set_width(Some(rect.width())).unwrap();
        handle.set_height(Some(rect.height())).unwrap();
        id
    }

    /// Create a probe and add it as a top-level widget.
    fn top_probe(&mut self, rect: Rect) -> WidgetId {
        let id = self.probe(rect);
        self.desktop.add_widget(id).unwrap();
        id
    }

    fn focusable(&mut self, rect: Rect) -> WidgetId {
        let id = self.top_probe(rect);
        self.desktop
            .tree_mut()
            .widget_mut(id)
            .unwrap()
            .set_accepts_keyboard_focus(true);
        id
    }

    fn window(&mut self, rect: Rect, modal: bool) -> WidgetId {
        let tree = self.desktop.tree_mut();
        let id = tree.create(Window::new(""));
        let mut handle = tree.widget_mut(id).unwrap();
        handle.set_width(Some(rect.width())).unwrap();
        handle.set_height(Some(rect.height())).unwrap();
        self.desktop
            .show_window(id, modal, Some(rect.origin))
            .unwrap();
        id
    }

    fn base(&self, id: WidgetId) -> &WidgetBase {
        self.desktop.tree().base(id).unwrap()
    }
}

fn counter<T>() -> (Arc<AtomicUsize>, impl Fn(&T) + Send + Sync + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let handle = count.clone();
    (count, move |_: &T| {
        handle.fetch_add(1, Ordering::SeqCst);
    })
}

fn count(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

// =============================================================================
// Pointer
// =============================================================================

#[test]
fn test_double_click_fires_once_and_resets() {
    let mut h = Harness::new();
    let probe = h.top_probe(Rect::new(0.0, 0.0, 50.0, 50.0));
    h.desktop.update_layout();

    let (desktop_clicks, slot) = counter::<()>();
    h.desktop.touch_double_click.connect(slot);
    let (widget_clicks, slot) = counter::<()>();
    h.base(probe).touch_double_click.connect(slot);

    h.press(Point::new(10.0, 10.0), 0);
    h.release(100);
    h.press(Point::new(12.0, 11.0), 200);
    assert_eq!(count(&desktop_clicks), 1);
    assert_eq!(count(&widget_clicks), 1);

    h.release(220);
    h.press(Point::new(12.0, 11.0), 250);
    assert_eq!(count(&desktop_clicks), 1);
    assert_eq!(count(&widget_clicks), 1);
}

#[test]
fn test_double_click_needs_interval_and_radius() {
    let mut h = Harness::new();
    let (clicks, slot) = counter::<()>();
    h.desktop.touch_double_click.connect(slot);

    h.tap(Point::new(10.0, 10.0), 0);
    h.tap(Point::new(10.0, 10.0), 600);
    assert_eq!(count(&clicks), 0);

    h.tap(Point::new(20.0, 10.0), 700);
    assert_eq!(count(&clicks), 0);
}

#[test]
fn test_topmost_widget_hides_pointer_from_widgets_below() {
    let mut h = Harness::new();
    let below = h.top_probe(Rect::new(0.0, 0.0, 100.0, 100.0));
    let above = h.top_probe(Rect::new(0.0, 0.0, 100.0, 100.0));
    h.desktop.update_layout();

    let (below_downs, slot) = counter::<()>();
    h.base(below).touch_down.connect(slot);
    let (above_downs, slot) = counter::<()>();
    h.base(above).touch_down.connect(slot);

    h.tap(Point::new(50.0, 50.0), 0);
    assert_eq!(count(&above_downs), 1);
    assert_eq!(count(&below_downs), 0);
    assert!(!h.base(below).is_mouse_inside());
}

#[test]
fn test_pass_through_panel_lets_input_fall_through() {
    let mut h = Harness::new();
    let below = h.top_probe(Rect::new(0.0, 0.0, 100.0, 100.0));
    let panel = h.desktop.tree_mut().create(Panel::new());
    h.desktop
        .tree_mut()
        .widget_mut(panel)
        .unwrap()
        .set_horizontal_alignment(HorizontalAlignment::Stretch)
        .set_vertical_alignment(VerticalAlignment::Stretch);
    h.desktop.add_widget(panel).unwrap();
    h.desktop.update_layout();

    let (downs, slot) = counter::<()>();
    h.base(below).touch_down.connect(slot);
    h.tap(Point::new(50.0, 50.0), 0);
    assert_eq!(count(&downs), 1);

    h.desktop
        .tree_mut()
        .widget_mut(panel)
        .unwrap()
        .set_background(Some(Brush::solid(Color::BLACK)));
    h.tap(Point::new(50.0, 50.0), 1000);
    assert_eq!(count(&downs), 1);
}

#[test]
fn test_event_discipline_orders_widget_events() {
    for (discipline, expected) in [
        (EventDiscipline::Capturing, vec!["parent", "child"]),
        (EventDiscipline::Bubbling, vec!["child", "parent"]),
    ] {
        let config = DesktopConfig {
            event_discipline: discipline,
            ..DesktopConfig::default()
        };
        let mut h = Harness::with_config(config);
        let parent = h.desktop.tree_mut().create(Panel::new());
        {
            let mut handle = h.desktop.tree_mut().widget_mut(parent).unwrap();
            handle.set_width(Some(200.0)).unwrap();
            handle.set_height(Some(200.0)).unwrap();
        }
        let child = h.probe(Rect::new(0.0, 0.0, 50.0, 50.0));
        h.desktop.tree_mut().add_child(parent, child).unwrap();
        h.desktop.add_widget(parent).unwrap();
        h.desktop.update_layout();

        let order = Arc::new(Mutex::new(Vec::new()));
        for (id, name) in [(parent, "parent"), (child, "child")] {
            let order = order.clone();
            h.base(id).mouse_entered.connect(move |_| order.lock().push(name));
        }

        h.input.set_mouse_position(Point::new(10.0, 10.0));
        h.frame_at(0);
        assert_eq!(*order.lock(), expected, "{discipline:?}");
    }
}

#[test]
fn test_hovered_scroll_viewer_receives_wheel() {
    let mut h = Harness::new();
    let viewer = h.desktop.tree_mut().create(ScrollViewer::new());
    {
        let mut handle = h.desktop.tree_mut().widget_mut(viewer).unwrap();
        handle.set_width(Some(100.0)).unwrap();
        handle.set_height(Some(100.0)).unwrap();
    }
    let content = h.probe(Rect::new(0.0, 0.0, 100.0, 300.0));
    h.desktop.tree_mut().add_child(viewer, content).unwrap();
    h.desktop.add_widget(viewer).unwrap();

    let wheel = Arc::new(Mutex::new(Vec::new()));
    {
        let wheel = wheel.clone();
        h.desktop
            .mouse_wheel_changed
            .connect(move |delta: &f32| wheel.lock().push(*delta));
    }

    h.input.set_mouse_position(Point::new(50.0, 50.0));
    h.frame_at(0);
    h.input.scroll(-10.0);
    h.frame_at(16);

    assert_eq!(*wheel.lock(), vec![-10.0]);
    let viewer_state = h.desktop.tree().behavior::<ScrollViewer>(viewer).unwrap();
    assert_eq!(viewer_state.scroll_position(), 10.0);
    assert_eq!(h.base(content).bounds().top(), -10.0);
    // Hover wheel targets never take wheel focus
    assert_eq!(h.desktop.focused_mouse_wheel_widget(), None);
}

#[test]
fn test_is_point_over_gui() {
    let mut h = Harness::new();
    let panel = h.desktop.tree_mut().create(Panel::new());
    {
        let mut handle = h.desktop.tree_mut().widget_mut(panel).unwrap();
        handle.set_width(Some(200.0)).unwrap();
        handle.set_height(Some(200.0)).unwrap();
    }
    let leaf = h.probe(Rect::new(10.0, 10.0, 20.0, 20.0));
    h.desktop.tree_mut().add_child(panel, leaf).unwrap();
    h.desktop.add_widget(panel).unwrap();
    h.desktop.update_layout();

    assert!(h.desktop.is_point_over_gui(Point::new(15.0, 15.0)));
    assert!(!h.desktop.is_point_over_gui(Point::new(100.0, 100.0)));
    assert!(!h.desktop.is_point_over_gui(Point::new(500.0, 500.0)));

    h.desktop
        .tree_mut()
        .widget_mut(panel)
        .unwrap()
        .set_background(Some(Brush::solid(Color::GRAY)));
    assert!(h.desktop.is_point_over_gui(Point::new(100.0, 100.0)));

    h.input.set_mouse_position(Point::new(100.0, 100.0));
    h.frame_at(0);
    assert!(h.desktop.is_mouse_over_gui());
}

#[test]
fn test_touch_panel_failure_keeps_previous_state() {
    let config = DesktopConfig {
        touch_input: true,
        ..DesktopConfig::default()
    };
    let mut h = Harness::with_config(config);
    let (downs, slot) = counter::<()>();
    h.desktop.touch_down.connect(slot);
    let (ups, slot) = counter::<()>();
    h.desktop.touch_up.connect(slot);

    h.input
        .set_touch(Err(InputError::TouchUnavailable("bus error".into())));
    h.frame_at(0);
    assert_eq!(h.desktop.input().touch_position(), None);

    h.input.set_touch(Ok(Some(Point::new(5.0, 5.0))));
    h.frame_at(16);
    assert_eq!(count(&downs), 1);

    h.input
        .set_touch(Err(InputError::TouchUnavailable("bus error".into())));
    h.frame_at(32);
    assert_eq!(h.desktop.input().touch_position(), Some(Point::new(5.0, 5.0)));
    assert_eq!(count(&ups), 0);

    // Mouse buttons are ignored in touch mode
    h.input.set_touch(Ok(None));
    h.input.set_button(MouseButton::Left, true);
    h.frame_at(48);
    assert_eq!(count(&ups), 1);
    assert_eq!(h.desktop.input().touch_position(), None);
}

// =============================================================================
// Windows and modality
// =============================================================================

#[test]
fn test_modal_window_deactivates_widgets_below() {
    let mut h = Harness::new();
    let below = h.top_probe(Rect::new(0.0, 0.0, 100.0, 100.0));
    let (downs, slot) = counter::<()>();
    h.base(below).touch_down.connect(slot);

    let window = h.window(Rect::new(300.0, 300.0, 200.0, 100.0), true);
    h.desktop.update_layout();
    assert!(h.desktop.has_modal_widget());
    assert!(!h.base(below).is_active());
    assert!(h.base(window).is_active());

    h.tap(Point::new(50.0, 50.0), 0);
    assert_eq!(count(&downs), 0);

    h.desktop.close(window).unwrap();
    h.desktop.update_layout();
    assert!(h.base(below).is_active());

    h.tap(Point::new(50.0, 50.0), 1000);
    assert_eq!(count(&downs), 1);
}

#[test]
fn test_widgets_above_modal_stay_active() {
    let mut h = Harness::new();
    let below = h.top_probe(Rect::new(0.0, 0.0, 10.0, 10.0));
    let window = h.window(Rect::new(100.0, 100.0, 50.0, 50.0), true);
    let above = h.top_probe(Rect::new(0.0, 0.0, 10.0, 10.0));
    h.desktop.update_layout();

    assert!(!h.base(below).is_active());
    assert!(h.base(window).is_active());
    assert!(h.base(above).is_active());
}

#[test]
fn test_touch_brings_window_to_front() {
    let mut h = Harness::new();
    let first = h.window(Rect::new(0.0, 0.0, 200.0, 200.0), false);
    let second = h.window(Rect::new(100.0, 100.0, 200.0, 200.0), false);
    h.desktop.update_layout();
    assert_eq!(h.desktop.widgets(), &[first, second]);

    h.tap(Point::new(50.0, 50.0), 0);
    assert_eq!(h.desktop.widgets(), &[second, first]);
    assert_eq!(h.desktop.active_widget(), Some(first));
}

#[test]
fn test_escape_closes_focused_window() {
    let mut h = Harness::new();
    let window = h.window(Rect::new(0.0, 0.0, 100.0, 100.0), false);
    assert_eq!(h.desktop.focused_keyboard_widget(), Some(window));

    let (closed, slot) = counter::<()>();
    h.desktop
        .tree()
        .behavior::<Window>(window)
        .unwrap()
        .closed
        .connect(slot);

    h.key(Key::Escape, 0);
    assert_eq!(count(&closed), 1);
    assert!(h.desktop.widgets().is_empty());
    assert_eq!(h.desktop.focused_keyboard_widget(), None);
}

#[test]
fn test_escape_reaches_unfocused_active_window() {
    let mut h = Harness::new();
    let window = h.window(Rect::new(0.0, 0.0, 100.0, 100.0), false);
    h.desktop.set_keyboard_focus(None).unwrap();

    let (closed, slot) = counter::<()>();
    h.desktop
        .tree()
        .behavior::<Window>(window)
        .unwrap()
        .closed
        .connect(slot);

    h.key(Key::Escape, 0);
    assert_eq!(count(&closed), 1);
}

#[test]
fn test_centered_window() {
    let mut h = Harness::new();
    let id = h.desktop.tree_mut().create(Window::new(""));
    {
        let mut handle = h.desktop.tree_mut().widget_mut(id).unwrap();
        handle.set_width(Some(200.0)).unwrap();
        handle.set_height(Some(100.0)).unwrap();
    }
    h.desktop.show_window(id, false, None).unwrap();
    h.desktop.update_layout();
    assert_eq!(h.base(id).bounds(), Rect::new(300.0, 250.0, 200.0, 100.0));
}

// =============================================================================
// Focus
// =============================================================================

#[test]
fn test_touch_moves_keyboard_focus() {
    let mut h = Harness::new();
    let a = h.focusable(Rect::new(0.0, 0.0, 50.0, 50.0));
    let b = h.focusable(Rect::new(100.0, 0.0, 50.0, 50.0));
    h.desktop.update_layout();

    h.tap(Point::new(10.0, 10.0), 0);
    assert_eq!(h.desktop.focused_keyboard_widget(), Some(a));
    assert!(h.base(a).is_keyboard_focused());

    h.tap(Point::new(110.0, 10.0), 1000);
    assert_eq!(h.desktop.focused_keyboard_widget(), Some(b));
    assert!(!h.base(a).is_keyboard_focused());

    // Empty space clears it
    h.tap(Point::new(500.0, 500.0), 2000);
    assert_eq!(h.desktop.focused_keyboard_widget(), None);
}

#[test]
fn test_losing_focus_veto() {
    let mut h = Harness::new();
    let a = h.focusable(Rect::new(0.0, 0.0, 50.0, 50.0));
    let b = h.focusable(Rect::new(100.0, 0.0, 50.0, 50.0));
    h.desktop.update_layout();

    let (gained, slot) = counter::<WidgetId>();
    h.desktop.widget_got_keyboard_focus.connect(slot);

    assert_eq!(h.desktop.set_keyboard_focus(Some(a)), Ok(true));
    h.base(a)
        .losing_keyboard_focus
        .connect(|_: &Option<WidgetId>| Decision::Cancel);

    assert_eq!(h.desktop.set_keyboard_focus(Some(b)), Ok(false));
    assert_eq!(h.desktop.focused_keyboard_widget(), Some(a));

    h.tap(Point::new(110.0, 10.0), 0);
    assert_eq!(h.desktop.focused_keyboard_widget(), Some(a));
    assert_eq!(count(&gained), 1);
}

#[test]
fn test_focus_on_missing_widget_is_an_error() {
    let mut h = Harness::new();
    let a = h.focusable(Rect::new(0.0, 0.0, 50.0, 50.0));
    h.desktop.tree_mut().destroy(a).unwrap();
    assert_eq!(
        h.desktop.set_keyboard_focus(Some(a)),
        Err(WeftError::WidgetNotFound(a))
    );
}

#[test]
fn test_removing_widget_drops_its_focus() {
    let mut h = Harness::new();
    let a = h.focusable(Rect::new(0.0, 0.0, 50.0, 50.0));
    h.desktop.set_keyboard_focus(Some(a)).unwrap();
    let (lost, slot) = counter::<WidgetId>();
    h.desktop.widget_lost_keyboard_focus.connect(slot);

    h.desktop.remove_widget(a).unwrap();
    assert_eq!(h.desktop.focused_keyboard_widget(), None);
    assert_eq!(count(&lost), 1);
}

#[test]
fn test_tab_navigation_wraps_and_skips_hidden() {
    let mut h = Harness::new();
    let a = h.focusable(Rect::new(0.0, 0.0, 10.0, 10.0));
    let b = h.focusable(Rect::new(20.0, 0.0, 10.0, 10.0));
    let c = h.focusable(Rect::new(40.0, 0.0, 10.0, 10.0));
    h.desktop.tree_mut().widget_mut(c).unwrap().set_visible(false);

    h.key(Key::Tab, 0);
    assert_eq!(h.desktop.focused_keyboard_widget(), Some(a));
    h.key(Key::Tab, 10);
    assert_eq!(h.desktop.focused_keyboard_widget(), Some(b));
    h.key(Key::Tab, 20);
    assert_eq!(h.desktop.focused_keyboard_widget(), Some(a));

    h.input.press_key(Key::ShiftLeft);
    h.key(Key::Tab, 30);
    assert_eq!(h.desktop.focused_keyboard_widget(), Some(b));
}

#[test]
fn test_key_repeat_timing() {
    let mut h = Harness::new();
    let a = h.focusable(Rect::new(0.0, 0.0, 10.0, 10.0));
    h.desktop.set_keyboard_focus(Some(a)).unwrap();

    let (downs, slot) = counter::<Key>();
    h.base(a).key_down.connect(slot);
    let (ups, slot) = counter::<Key>();
    h.base(a).key_up.connect(slot);

    h.input.press_key(Key::KeyA);
    h.frame_at(0);
    assert_eq!(count(&downs), 1);
    h.frame_at(500);
    assert_eq!(count(&downs), 1);
    h.frame_at(501);
    assert_eq!(count(&downs), 2);
    h.frame_at(540);
    assert_eq!(count(&downs), 2);
    h.frame_at(552);
    assert_eq!(count(&downs), 3);

    h.input.release_key(Key::KeyA);
    h.frame_at(600);
    h.frame_at(2000);
    assert_eq!(count(&downs), 3);
    assert_eq!(count(&ups), 1);
}

#[test]
fn test_typed_chars_reach_focused_widget() {
    let mut h = Harness::new();
    let a = h.focusable(Rect::new(0.0, 0.0, 10.0, 10.0));
    h.desktop.set_keyboard_focus(Some(a)).unwrap();

    let typed = Arc::new(Mutex::new(String::new()));
    {
        let typed = typed.clone();
        h.base(a).char_typed.connect(move |c: &char| typed.lock().push(*c));
    }
    h.input.type_char('h');
    h.input.type_char('i');
    h.frame_at(0);
    h.frame_at(16);
    assert_eq!(*typed.lock(), "hi");
}

// =============================================================================
// Context menu
// =============================================================================

fn menu_panel(h: &mut Harness, width: f32, height: f32) -> WidgetId {
    let tree = h.desktop.tree_mut();
    let menu = tree.create(Panel::new());
    let mut handle = tree.widget_mut(menu).unwrap();
    handle.set_width(Some(width)).unwrap();
    handle.set_height(Some(height)).unwrap();
    handle.set_accepts_keyboard_focus(true);
    menu
}

#[test]
fn test_context_menu_is_clamped_inside_desktop() {
    let mut h = Harness::new();
    let menu = menu_panel(&mut h, 100.0, 50.0);

    h.desktop
        .show_context_menu(menu, Point::new(750.0, 580.0))
        .unwrap();
    h.desktop.update_layout();

    assert_eq!(h.base(menu).left(), 700.0);
    assert_eq!(h.base(menu).top(), 550.0);
    assert_eq!(h.base(menu).bounds(), Rect::new(700.0, 550.0, 100.0, 50.0));
}

#[test]
fn test_context_menu_focus_round_trip() {
    let mut h = Harness::new();
    let a = h.focusable(Rect::new(0.0, 0.0, 50.0, 50.0));
    h.desktop.set_keyboard_focus(Some(a)).unwrap();
    let menu = menu_panel(&mut h, 100.0, 50.0);

    let (closed, slot) = counter::<WidgetId>();
    h.desktop.context_menu_closed.connect(slot);

    h.desktop
        .show_context_menu(menu, Point::new(200.0, 200.0))
        .unwrap();
    assert_eq!(h.desktop.context_menu(), Some(menu));
    assert_eq!(h.desktop.focused_keyboard_widget(), Some(menu));

    // A plain panel never takes wheel focus
    h.frame_at(0);
    assert_eq!(h.desktop.focused_mouse_wheel_widget(), None);

    h.desktop.hide_context_menu();
    assert_eq!(h.desktop.context_menu(), None);
    assert_eq!(count(&closed), 1);
    assert_eq!(h.desktop.focused_keyboard_widget(), Some(a));
    assert_eq!(h.desktop.focused_mouse_wheel_widget(), None);
    assert!(!h.base(menu).is_visible());
    assert!(!h.desktop.widgets().contains(&menu));
}

#[test]
fn test_context_menu_wheel_focus_round_trip() {
    let mut h = Harness::new();
    let a = h.focusable(Rect::new(0.0, 0.0, 50.0, 50.0));
    h.desktop.set_keyboard_focus(Some(a)).unwrap();
    let prior = h.top_probe(Rect::new(100.0, 0.0, 50.0, 50.0));
    h.desktop.set_mouse_wheel_focus(Some(prior));

    let tree = h.desktop.tree_mut();
    let menu = tree.create(ScrollViewer::new());
    tree.widget_mut(menu)
        .unwrap()
        .set_width(Some(100.0))
        .unwrap()
        .set_height(Some(50.0))
        .unwrap();

    h.desktop
        .show_context_menu(menu, Point::new(200.0, 200.0))
        .unwrap();
    // Keyboard focus is untouched by a menu that does not accept it
    assert_eq!(h.desktop.focused_keyboard_widget(), Some(a));
    assert_eq!(h.desktop.focused_mouse_wheel_widget(), Some(prior));

    h.frame_at(0);
    assert_eq!(h.desktop.focused_mouse_wheel_widget(), Some(menu));

    h.desktop.hide_context_menu();
    assert_eq!(h.desktop.focused_mouse_wheel_widget(), Some(prior));
    assert_eq!(h.desktop.focused_keyboard_widget(), Some(a));
}

#[test]
fn test_hiding_menu_without_previous_focus_keeps_focus() {
    let mut h = Harness::new();
    let b = h.focusable(Rect::new(0.0, 0.0, 50.0, 50.0));
    let menu = menu_panel(&mut h, 100.0, 50.0);

    h.desktop
        .show_context_menu(menu, Point::new(200.0, 200.0))
        .unwrap();
    assert_eq!(h.desktop.focused_keyboard_widget(), Some(menu));

    h.desktop.set_keyboard_focus(Some(b)).unwrap();
    h.desktop.hide_context_menu();
    assert_eq!(h.desktop.focused_keyboard_widget(), Some(b));
}

#[test]
fn test_showing_a_menu_replaces_the_open_one() {
    let mut h = Harness::new();
    let first = menu_panel(&mut h, 10.0, 10.0);
    let second = menu_panel(&mut h, 10.0, 10.0);
    let (closed, slot) = counter::<WidgetId>();
    h.desktop.context_menu_closed.connect(slot);

    h.desktop.show_context_menu(first, Point::ZERO).unwrap();
    h.desktop.show_context_menu(second, Point::ZERO).unwrap();

    assert_eq!(count(&closed), 1);
    assert_eq!(h.desktop.context_menu(), Some(second));
    assert_eq!(h.desktop.widgets(), &[second]);
}

#[test]
fn test_touch_outside_closes_menu_unless_vetoed() {
    let mut h = Harness::new();
    let target = h.top_probe(Rect::new(400.0, 400.0, 50.0, 50.0));
    let menu = menu_panel(&mut h, 100.0, 50.0);
    h.desktop
        .show_context_menu(menu, Point::new(100.0, 100.0))
        .unwrap();
    h.desktop.update_layout();

    let veto = Arc::new(AtomicUsize::new(1));
    let seen = Arc::new(Mutex::new(None));
    {
        let veto = veto.clone();
        let seen = seen.clone();
        h.desktop
            .context_menu_closing
            .connect(move |args: &ContextMenuClosing| {
                *seen.lock() = Some(*args);
                if veto.load(Ordering::SeqCst) == 1 {
                    Decision::Cancel
                } else {
                    Decision::Proceed
                }
            });
    }

    // Inside the menu: no closing attempt
    h.tap(Point::new(120.0, 120.0), 0);
    assert!(seen.lock().is_none());

    h.tap(Point::new(410.0, 410.0), 1000);
    let args = (*seen.lock()).expect("closing hook ran");
    assert_eq!(args.menu, menu);
    assert_eq!(args.target, Some(target));
    assert_eq!(h.desktop.context_menu(), Some(menu));

    veto.store(0, Ordering::SeqCst);
    h.tap(Point::new(410.0, 410.0), 2000);
    assert_eq!(h.desktop.context_menu(), None);
}

#[test]
fn test_escape_hides_context_menu() {
    let mut h = Harness::new();
    let menu = menu_panel(&mut h, 100.0, 50.0);
    h.desktop.show_context_menu(menu, Point::ZERO).unwrap();

    h.key(Key::Escape, 0);
    assert_eq!(h.desktop.context_menu(), None);
}

#[test]
fn test_popup_menu_selection_hides_menu() {
    let mut h = Harness::new();
    let tree = h.desktop.tree_mut();
    let menu = tree.create(Menu::popup());
    for _ in 0..2 {
        let item = tree.create(Label::new("item"));
        tree.add_child(menu, item).unwrap();
    }
    let selected = Arc::new(Mutex::new(Vec::new()));
    {
        let selected = selected.clone();
        tree.behavior::<Menu>(menu)
            .unwrap()
            .item_selected
            .connect(move |index: &usize| selected.lock().push(*index));
    }

    h.input.set_mouse_position(Point::new(700.0, 500.0));
    h.desktop.show_context_menu(menu, Point::ZERO).unwrap();
    h.key(Key::ArrowDown, 0);
    h.key(Key::ArrowDown, 10);
    h.key(Key::Enter, 20);

    assert_eq!(*selected.lock(), vec![1]);
    assert_eq!(h.desktop.context_menu(), None);
}

// =============================================================================
// Desktop bookkeeping
// =============================================================================

#[test]
fn test_calculate_total_widgets() {
    let mut h = Harness::new();
    let panel = h.desktop.tree_mut().create(Panel::new());
    let shown = h.probe(Rect::new(0.0, 0.0, 10.0, 10.0));
    let hidden = h.probe(Rect::new(0.0, 0.0, 10.0, 10.0));
    h.desktop.tree_mut().add_child(panel, shown).unwrap();
    h.desktop.tree_mut().add_child(panel, hidden).unwrap();
    h.desktop.tree_mut().widget_mut(hidden).unwrap().set_visible(false);
    h.desktop.add_widget(panel).unwrap();

    assert_eq!(h.desktop.calculate_total_widgets(false), 3);
    assert_eq!(h.desktop.calculate_total_widgets(true), 2);
}

#[test]
fn test_layout_discovers_menu_bar() {
    let mut h = Harness::new();
    let panel = h.desktop.tree_mut().create(Panel::new());
    let bar = h.desktop.tree_mut().create(Menu::bar());
    h.desktop.tree_mut().add_child(panel, bar).unwrap();
    h.desktop.add_widget(panel).unwrap();

    h.desktop.update_layout();
    assert_eq!(h.desktop.menu_bar(), Some(bar));
}

#[test]
fn test_render_draws_visible_widgets_clipped() {
    let mut h = Harness::new();
    let panel = h.desktop.tree_mut().create(Panel::new());
    {
        let mut handle = h.desktop.tree_mut().widget_mut(panel).unwrap();
        handle.set_width(Some(100.0)).unwrap();
        handle.set_height(Some(40.0)).unwrap();
        handle.set_background(Some(Brush::solid(Color::BLUE)));
    }
    h.desktop.add_widget(panel).unwrap();

    h.frame_at(0);
    let fills = h.renderer.filled_rects();
    assert_eq!(fills.len(), 1);
    assert_eq!(fills[0].0, Rect::new(0.0, 0.0, 100.0, 40.0));

    h.desktop.tree_mut().widget_mut(panel).unwrap().set_visible(false);
    h.frame_at(16);
    assert!(h.renderer.filled_rects().is_empty());
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = DesktopConfig {
        opacity: 1.5,
        ..DesktopConfig::default()
    };
    let result = Desktop::with_config(
        config,
        Box::new(InputRecorder::new()),
        Box::new(ManualClock::new()),
    );
    assert!(matches!(result, Err(ConfigError::Invalid { field: "opacity", .. })));
}
