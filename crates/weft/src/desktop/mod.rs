//! The desktop: top-level widgets, input routing and the frame driver.
//!
//! A [`Desktop`] owns the [`WidgetTree`] and everything that is global to a
//! UI: pointer and keyboard state, keyboard and mouse-wheel focus, modality,
//! the menu bar and the context menu. The host calls
//! [`render`](Desktop::render) once per frame:
//!
//! ```ignore
//! let input = InputRecorder::new();
//! let mut desktop = Desktop::new(Box::new(input.clone()), Box::new(SystemClock::new()));
//! desktop.set_bounds(Rect::new(0.0, 0.0, 800.0, 600.0));
//!
//! let root = desktop.tree_mut().create(Panel::new());
//! desktop.add_widget(root)?;
//!
//! // each frame
//! desktop.render(&mut renderer);
//! ```
//!
//! A frame is [`update_input`](Desktop::update_input), then
//! [`update_layout`](Desktop::update_layout), then
//! [`render_visual`](Desktop::render_visual).

mod context_menu;
mod dispatch;
mod focus;
mod input;
mod keyboard;
mod modal;

use tracing::{debug, trace};
use weft_core::logging::{span_names, targets};
use weft_core::{Clock, Hook, Signal, WeftResult, WidgetId};
use weft_render::{Color, FrameStats, Point, Rect, RenderContext, Renderer};

use crate::config::{ConfigResult, DesktopConfig};
use crate::widget::{
    ChildAdded, ChildRemoved, DesktopCommand, DesktopEvent, DoubleClickTracker, EventContext,
    HorizontalAlignment, Key, KeyRepeat, VerticalAlignment, Widget, WidgetEvent, WidgetTree,
    Window,
};

pub use context_menu::ContextMenuClosing;
pub use dispatch::{EventQueue, QueuedEvent};
pub use input::{InputError, InputRecorder, InputSnapshot, InputSource, InputState};

use dispatch::{ClickSettings, InputContext};

/// Root of a UI: the widget tree plus global input and focus state.
pub struct Desktop {
    tree: WidgetTree,
    config: DesktopConfig,
    source: Box<dyn InputSource>,
    clock: Box<dyn Clock>,
    input: InputState,
    bounds: Rect,
    laid_out_bounds: Option<Rect>,
    events: EventQueue,
    commands: Vec<DesktopCommand>,
    double_click: DoubleClickTracker,
    key_repeat: KeyRepeat,

    focused_keyboard: Option<WidgetId>,
    focused_wheel: Option<WidgetId>,
    menu_bar: Option<WidgetId>,
    context_menu: Option<WidgetId>,
    previous_keyboard_focus: Option<WidgetId>,
    previous_wheel_focus: Option<WidgetId>,
    scheduled_wheel_focus: Option<WidgetId>,

    // =========================================================================
    // Signals
    // =========================================================================
    pub mouse_moved: Signal<()>,
    pub mouse_wheel_changed: Signal<f32>,
    pub touch_down: Signal<()>,
    pub touch_up: Signal<()>,
    pub touch_moved: Signal<()>,
    pub touch_double_click: Signal<()>,
    /// Every key-down, including repeats.
    pub key_down: Signal<Key>,
    pub key_up: Signal<Key>,
    pub char_typed: Signal<char>,
    pub widget_got_keyboard_focus: Signal<WidgetId>,
    pub widget_lost_keyboard_focus: Signal<WidgetId>,
    /// Consulted when a touch-down outside the context menu would close it.
    pub context_menu_closing: Hook<ContextMenuClosing>,
    /// Emitted with the menu after it was hidden.
    pub context_menu_closed: Signal<WidgetId>,
}

impl Desktop {
    /// Create a desktop with the default configuration.
    pub fn new(source: Box<dyn InputSource>, clock: Box<dyn Clock>) -> Self {
        let config = DesktopConfig::default();
        Self {
            tree: WidgetTree::new(),
            events: EventQueue::new(config.event_discipline),
            config,
            source,
            clock,
            input: InputState::default(),
            bounds: Rect::ZERO,
            laid_out_bounds: None,
            commands: Vec::new(),
            double_click: DoubleClickTracker::default(),
            key_repeat: KeyRepeat::default(),
            focused_keyboard: None,
            focused_wheel: None,
            menu_bar: None,
            context_menu: None,
            previous_keyboard_focus: None,
            previous_wheel_focus: None,
            scheduled_wheel_focus: None,
            mouse_moved: Signal::new(),
            mouse_wheel_changed: Signal::new(),
            touch_down: Signal::new(),
            touch_up: Signal::new(),
            touch_moved: Signal::new(),
            touch_double_click: Signal::new(),
            key_down: Signal::new(),
            key_up: Signal::new(),
            char_typed: Signal::new(),
            widget_got_keyboard_focus: Signal::new(),
            widget_lost_keyboard_focus: Signal::new(),
            context_menu_closing: Hook::new(),
            context_menu_closed: Signal::new(),
        }
    }

    /// Create a desktop with a validated configuration.
    pub fn with_config(
        config: DesktopConfig,
        source: Box<dyn InputSource>,
        clock: Box<dyn Clock>,
    ) -> ConfigResult<Self> {
        let mut desktop = Self::new(source, clock);
        desktop.set_config(config)?;
        Ok(desktop)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    #[inline]
    pub fn config(&self) -> &DesktopConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DesktopConfig) -> ConfigResult<()> {
        config.validate()?;
        self.events.set_discipline(config.event_discipline);
        self.config = config;
        Ok(())
    }

    /// Input state of the current frame.
    #[inline]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Resize the desktop; the next frame lays everything out again.
    pub fn set_bounds(&mut self, bounds: Rect) {
        if bounds != self.bounds {
            debug!(target: targets::DESKTOP, ?bounds, "desktop bounds changed");
            self.bounds = bounds;
        }
    }

    /// The first horizontal menu found by the last layout pass.
    #[inline]
    pub fn menu_bar(&self) -> Option<WidgetId> {
        self.menu_bar
    }

    /// Top-level widgets in insertion order (last is topmost).
    #[inline]
    pub fn widgets(&self) -> &[WidgetId] {
        self.tree.roots()
    }

    // =========================================================================
    // Top-level Widgets
    // =========================================================================

    /// Add a top-level widget.
    pub fn add_widget(&mut self, id: WidgetId) -> WeftResult<ChildAdded> {
        self.tree.add_root(id)
    }

    /// Remove a top-level widget, dropping focus held inside it.
    pub fn remove_widget(&mut self, id: WidgetId) -> WeftResult<ChildRemoved> {
        let removed = self.tree.remove_root(id)?;
        if self.context_menu == Some(id) {
            self.context_menu = None;
        }
        self.release_unplaced_focus();
        Ok(removed)
    }

    /// Place a window on the desktop.
    ///
    /// Without a position the window is centered. A modal window makes
    /// everything underneath it inactive until it is closed.
    pub fn show_window(&mut self, id: WidgetId, modal: bool, position: Option<Point>) -> WeftResult<()> {
        let position = match position {
            Some(p) => p,
            None => {
                let size = self.tree.measure(id, self.bounds.size);
                Point::new(
                    self.bounds.left() + ((self.bounds.width() - size.width) / 2.0).max(0.0).floor(),
                    self.bounds.top() + ((self.bounds.height() - size.height) / 2.0).max(0.0).floor(),
                )
            }
        };

        {
            let mut handle = self.tree.widget_mut(id)?;
            handle
                .set_horizontal_alignment(HorizontalAlignment::Left)
                .set_vertical_alignment(VerticalAlignment::Top)
                .set_position(position.x, position.y)
                .set_modal(modal)
                .set_visible(true);
        }
        self.add_widget(id)?;
        debug!(target: targets::DESKTOP, ?id, modal, ?position, "window shown");

        if self.tree.node_base(id).accepts_keyboard_focus {
            self.set_keyboard_focus(Some(id))?;
        }
        Ok(())
    }

    /// Close a top-level widget. Windows emit `closed`.
    pub fn close(&mut self, id: WidgetId) -> WeftResult<()> {
        if self.context_menu == Some(id) {
            self.hide_context_menu();
            return Ok(());
        }
        self.remove_widget(id)?;
        debug!(target: targets::DESKTOP, ?id, "widget closed");
        if let Some(window) = self.tree.behavior::<Window>(id) {
            window.closed.emit(());
        }
        Ok(())
    }

    /// The topmost visible and enabled top-level widget.
    pub fn active_widget(&self) -> Option<WidgetId> {
        self.tree.sorted_roots().into_iter().rev().find(|id| {
            let base = self.tree.node_base(*id);
            base.visible && base.enabled
        })
    }

    /// Number of widgets on the desktop, optionally skipping hidden subtrees.
    pub fn calculate_total_widgets(&self, visible_only: bool) -> usize {
        fn count(tree: &WidgetTree, id: WidgetId, visible_only: bool) -> usize {
            if visible_only && !tree.node_base(id).visible {
                return 0;
            }
            1 + tree
                .children(id)
                .iter()
                .map(|c| count(tree, *c, visible_only))
                .sum::<usize>()
        }
        self.tree
            .roots()
            .iter()
            .map(|root| count(&self.tree, *root, visible_only))
            .sum()
    }

    // =========================================================================
    // Hit Testing
    // =========================================================================

    /// Whether a point is covered by a solid part of the UI.
    pub fn is_point_over_gui(&self, point: Point) -> bool {
        self.tree
            .sorted_roots()
            .into_iter()
            .any(|root| self.is_solid_at(root, point))
    }

    /// Whether the mouse is over a solid part of the UI.
    pub fn is_mouse_over_gui(&self) -> bool {
        self.is_point_over_gui(self.input.mouse_position())
    }

    fn is_solid_at(&self, id: WidgetId, point: Point) -> bool {
        let base = self.tree.node_base(id);
        if !base.visible || !base.contains_global(point) {
            return false;
        }
        let Some(widget) = self.tree.dyn_behavior(id) else {
            return true;
        };
        if !widget.is_container() || !widget.is_pass_through() {
            return true;
        }
        if base.background().is_some() {
            return true;
        }
        self.tree
            .sorted_children(id)
            .into_iter()
            .any(|child| self.is_solid_at(child, point))
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Run one frame: input, layout, then drawing.
    pub fn render(&mut self, renderer: &mut dyn Renderer) -> FrameStats {
        let _span = tracing::debug_span!(span_names::FRAME).entered();
        if self.bounds.is_empty() {
            return FrameStats::default();
        }
        self.update_input();
        self.update_layout();
        self.apply_scheduled_wheel_focus();
        self.render_visual(renderer)
    }

    /// Lay out top-level widgets if anything changed since the last pass.
    pub fn update_layout(&mut self) {
        if !self.tree.is_layout_dirty() && self.laid_out_bounds == Some(self.bounds) {
            return;
        }
        let _span = tracing::trace_span!(span_names::LAYOUT_PASS).entered();

        self.menu_bar = self.tree.placed_depth_first().into_iter().find(|id| {
            self.tree.is_visible_in_tree(*id)
                && self.tree.dyn_behavior(*id).is_some_and(|w| w.is_menu_bar())
        });

        self.update_active();

        for root in self.tree.roots_copy() {
            if self.tree.node_base(root).visible {
                self.tree.arrange(root, self.bounds);
            }
        }
        self.tree.update_transforms();

        self.tree.clear_layout_dirty();
        self.laid_out_bounds = Some(self.bounds);
        trace!(target: targets::DESKTOP, bounds = ?self.bounds, "layout updated");
    }

    /// Draw every visible top-level widget in z-order, clipped to the desktop.
    pub fn render_visual(&mut self, renderer: &mut dyn Renderer) -> FrameStats {
        renderer.begin_frame(Color::TRANSPARENT, self.bounds.size);
        {
            let mut render = RenderContext::new(renderer);
            render.multiply_opacity(self.config.opacity);
            if render.clip_rect(self.bounds) {
                for root in self.tree.roots_copy() {
                    self.tree.render_widget(root, &mut render);
                }
            }
        }
        renderer.end_frame()
    }

    /// Poll input and dispatch the resulting events.
    pub fn update_input(&mut self) {
        let _span = tracing::trace_span!(span_names::INPUT_PASS).entered();

        let now = self.clock.now();
        self.input.begin_frame(now);
        let snapshot = self.source.snapshot();

        self.input.set_keys(snapshot.pressed_keys.clone());
        self.process_keys();
        for c in &snapshot.typed_chars {
            self.on_char(*c);
        }

        let touch = if self.config.touch_input {
            match self.source.touch_position() {
                Ok(touch) => touch,
                Err(err) => {
                    debug!(target: targets::INPUT, error = %err, "touch query failed, keeping last state");
                    self.input.previous_touch_position()
                }
            }
        } else if snapshot.any_button_down() {
            Some(snapshot.mouse_position)
        } else {
            None
        };
        self.input.set_pointer(snapshot.mouse_position, touch);
        self.input.set_wheel(snapshot.wheel);

        self.queue_desktop_events();
        let ctx = self.process_pointer();

        if self.input.mouse_wheel_delta() != 0.0 {
            let target = ctx.wheel_widget.or(self.focused_wheel);
            if let Some(target) = target {
                let delta = self.input.mouse_wheel_delta();
                self.events.push(QueuedEvent::Widget(target, WidgetEvent::MouseWheel(delta)));
            }
        }

        let touched_down = self.input.is_touch_down() && self.input.previous_touch_position().is_none();
        self.dispatch_events();

        if touched_down {
            self.apply_touch_focus(ctx.keyboard_candidate, ctx.wheel_candidate);
        }
        self.process_commands();
    }

    fn queue_desktop_events(&mut self) {
        if self.input.mouse_moved() {
            self.events.push(QueuedEvent::Desktop(DesktopEvent::MouseMoved));
        }
        match (self.input.previous_touch_position(), self.input.touch_position()) {
            (None, Some(position)) => {
                self.events.push(QueuedEvent::Desktop(DesktopEvent::TouchDown));
                let interval = self.config.double_click_interval();
                if self.double_click.register(self.input.now(), position, interval, self.config.double_click_radius) {
                    self.events.push(QueuedEvent::Desktop(DesktopEvent::TouchDoubleClick));
                }
            }
            (Some(_), None) => self.events.push(QueuedEvent::Desktop(DesktopEvent::TouchUp)),
            (Some(a), Some(b)) if a != b => {
                self.events.push(QueuedEvent::Desktop(DesktopEvent::TouchMoved));
            }
            _ => {}
        }
        let delta = self.input.mouse_wheel_delta();
        if delta != 0.0 {
            self.events.push(QueuedEvent::Desktop(DesktopEvent::MouseWheel(delta)));
        }
    }

    fn process_pointer(&mut self) -> InputContext {
        let clicks = ClickSettings {
            interval: self.config.double_click_interval(),
            radius: self.config.double_click_radius,
        };
        let mut ctx = InputContext::default();
        for root in self.tree.roots_copy().into_iter().rev() {
            dispatch::process_pointer(&mut self.tree, root, &self.input, clicks, &mut ctx, &mut self.events, false);
        }
        ctx
    }

    fn dispatch_events(&mut self) {
        while let Some(event) = self.events.pop() {
            match event {
                QueuedEvent::Desktop(event) => self.dispatch_desktop_event(event),
                QueuedEvent::Widget(id, event) => self.dispatch_widget_event(id, event),
            }
        }
    }

    fn dispatch_desktop_event(&mut self, event: DesktopEvent) {
        trace!(target: targets::INPUT, ?event, "desktop event");
        match event {
            DesktopEvent::MouseMoved => self.mouse_moved.emit(()),
            DesktopEvent::MouseWheel(delta) => self.mouse_wheel_changed.emit(delta),
            DesktopEvent::TouchDown => {
                self.on_touch_down();
                self.touch_down.emit(());
            }
            DesktopEvent::TouchUp => self.touch_up.emit(()),
            DesktopEvent::TouchMoved => self.touch_moved.emit(()),
            DesktopEvent::TouchDoubleClick => self.touch_double_click.emit(()),
        }
    }

    fn dispatch_widget_event(&mut self, id: WidgetId, event: WidgetEvent) {
        if !self.tree.contains(id) {
            return;
        }
        trace!(target: targets::INPUT, ?id, ?event, "widget event");
        self.call_widget(id, |widget, ctx| match event {
            WidgetEvent::MouseEntered => widget.on_mouse_entered(ctx),
            WidgetEvent::MouseLeft => widget.on_mouse_left(ctx),
            WidgetEvent::MouseMoved => widget.on_mouse_moved(ctx),
            WidgetEvent::MouseWheel(delta) => widget.on_mouse_wheel(ctx, delta),
            WidgetEvent::TouchEntered => widget.on_touch_entered(ctx),
            WidgetEvent::TouchLeft => widget.on_touch_left(ctx),
            WidgetEvent::TouchMoved => widget.on_touch_moved(ctx),
            WidgetEvent::TouchDown => widget.on_touch_down(ctx),
            WidgetEvent::TouchUp => widget.on_touch_up(ctx),
            WidgetEvent::TouchDoubleClick => widget.on_touch_double_click(ctx),
        });

        let Ok(base) = self.tree.base(id) else {
            return;
        };
        match event {
            WidgetEvent::MouseEntered => base.mouse_entered.emit(()),
            WidgetEvent::MouseLeft => base.mouse_left.emit(()),
            WidgetEvent::MouseMoved => base.mouse_moved.emit(()),
            WidgetEvent::MouseWheel(delta) => base.mouse_wheel_changed.emit(delta),
            WidgetEvent::TouchEntered => base.touch_entered.emit(()),
            WidgetEvent::TouchLeft => base.touch_left.emit(()),
            WidgetEvent::TouchMoved => base.touch_moved.emit(()),
            WidgetEvent::TouchDown => base.touch_down.emit(()),
            WidgetEvent::TouchUp => base.touch_up.emit(()),
            WidgetEvent::TouchDoubleClick => base.touch_double_click.emit(()),
        }
    }

    /// Desktop-level touch-down: context menu closing and window raising.
    fn on_touch_down(&mut self) {
        let Some(position) = self.input.touch_position() else {
            return;
        };

        if let Some(menu) = self.context_menu {
            let inside = self.tree.base(menu).is_ok_and(|b| b.contains_global(position));
            if !inside {
                let args = ContextMenuClosing {
                    menu,
                    position,
                    target: self.widget_at(position),
                };
                if self.context_menu_closing.invoke(&args).is_cancel() {
                    debug!(target: targets::DESKTOP, ?menu, "context menu close vetoed");
                } else {
                    self.hide_context_menu();
                }
            }
        }

        let top = self.tree.sorted_roots().into_iter().rev().find(|id| {
            let base = self.tree.node_base(*id);
            base.visible && base.active && base.contains_global(position)
        });
        if let Some(top) = top {
            if self.tree.dyn_behavior(top).is_some_and(|w| w.is_window()) {
                if let Err(err) = self.tree.bring_to_front(top) {
                    debug!(
                        target: targets::DESKTOP,
                        window = ?top,
                        error = %err,
                        "could not bring window to front"
                    );
                }
            }
        }
    }

    /// Deepest visible widget under a point, topmost first.
    pub fn widget_at(&self, point: Point) -> Option<WidgetId> {
        fn deepest(tree: &WidgetTree, id: WidgetId, point: Point) -> Option<WidgetId> {
            let base = tree.node_base(id);
            if !base.visible || !base.contains_global(point) {
                return None;
            }
            tree.sorted_children(id)
                .into_iter()
                .rev()
                .find_map(|child| deepest(tree, child, point))
                .or(Some(id))
        }
        self.tree
            .sorted_roots()
            .into_iter()
            .rev()
            .find_map(|root| deepest(&self.tree, root, point))
    }

    /// Run a behavior callback with an event context.
    fn call_widget(&mut self, id: WidgetId, f: impl FnOnce(&mut dyn Widget, &mut EventContext<'_>)) {
        let Some(mut widget) = self.tree.take_behavior(id) else {
            return;
        };
        {
            let mut ctx = EventContext::new(&mut self.tree, id, &self.input, &mut self.commands);
            f(widget.as_mut(), &mut ctx);
        }
        self.tree.restore_behavior(id, widget);
    }

    /// Execute commands posted by widget callbacks.
    fn process_commands(&mut self) {
        while !self.commands.is_empty() {
            let commands = std::mem::take(&mut self.commands);
            for command in commands {
                debug!(target: targets::DESKTOP, ?command, "desktop command");
                let result = match command {
                    DesktopCommand::Close(id) => self.close(id),
                    DesktopCommand::BringToFront(id) => self.tree.bring_to_front(id),
                    DesktopCommand::SetKeyboardFocus(id) => self.set_keyboard_focus(id).map(|_| ()),
                    DesktopCommand::ShowContextMenu { menu, position } => {
                        self.show_context_menu(menu, position)
                    }
                    DesktopCommand::HideContextMenu => {
                        self.hide_context_menu();
                        Ok(())
                    }
                };
                if let Err(err) = result {
                    debug!(target: targets::DESKTOP, ?command, error = %err, "desktop command failed");
                }
            }
        }
    }
}

impl std::fmt::Debug for Desktop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Desktop")
            .field("tree", &self.tree)
            .field("bounds", &self.bounds)
            .field("focused_keyboard", &self.focused_keyboard)
            .field("focused_wheel", &self.focused_wheel)
            .field("context_menu", &self.context_menu)
            .finish_non_exhaustive()
    }
}
