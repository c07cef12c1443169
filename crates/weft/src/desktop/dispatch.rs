//! Same-frame event queue and pointer routing.
//!
//! Pointer processing walks the tree once per frame, updates each widget's
//! hover and touch state and queues the resulting events. Queued events are
//! dispatched afterwards, so callbacks never run while the walk is in
//! progress.

use std::collections::VecDeque;

use tracing::trace;
use weft_core::WidgetId;
use weft_core::logging::targets;
use weft_render::Point;

use crate::config::EventDiscipline;
use crate::widget::{DesktopEvent, MouseWheelFocusType, WidgetEvent, WidgetTree};

use super::input::InputState;

/// An event waiting for dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueuedEvent {
    Desktop(DesktopEvent),
    Widget(WidgetId, WidgetEvent),
}

/// Events of one frame, dispatched FIFO or LIFO.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    discipline: EventDiscipline,
    events: VecDeque<QueuedEvent>,
}

impl EventQueue {
    pub fn new(discipline: EventDiscipline) -> Self {
        Self {
            discipline,
            events: VecDeque::new(),
        }
    }

    #[inline]
    pub fn discipline(&self) -> EventDiscipline {
        self.discipline
    }

    pub fn set_discipline(&mut self, discipline: EventDiscipline) {
        self.discipline = discipline;
    }

    pub fn push(&mut self, event: QueuedEvent) {
        self.events.push_back(event);
    }

    /// Next event according to the discipline.
    pub fn pop(&mut self) -> Option<QueuedEvent> {
        match self.discipline {
            EventDiscipline::Capturing => self.events.pop_front(),
            EventDiscipline::Bubbling => self.events.pop_back(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

// =============================================================================
// Pointer routing
// =============================================================================

/// State threaded through one pointer pass.
#[derive(Debug, Default)]
pub(crate) struct InputContext {
    /// A solid widget already took the pointer.
    pub handled: bool,
    /// Deepest hovered widget taking wheel input on hover.
    pub wheel_widget: Option<WidgetId>,
    /// Deepest widget touched down this frame that takes keyboard focus.
    pub keyboard_candidate: Option<WidgetId>,
    /// Deepest widget touched down this frame that takes wheel focus on touch.
    pub wheel_candidate: Option<WidgetId>,
}

/// Double-click settings for the pass.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClickSettings {
    pub interval: std::time::Duration,
    pub radius: f32,
}

/// Update pointer state of `id` and its subtree, queueing events.
///
/// Children are visited in reverse z-order after the widget itself; a widget
/// that does not let input fall through marks the pointer handled once its
/// children have been processed, hiding it from widgets underneath. Hidden
/// and inactive subtrees only lose their pointer state.
pub(crate) fn process_pointer(
    tree: &mut WidgetTree,
    id: WidgetId,
    input: &InputState,
    clicks: ClickSettings,
    ctx: &mut InputContext,
    queue: &mut EventQueue,
    hidden: bool,
) {
    if !tree.contains(id) {
        return;
    }
    let hidden = hidden || !tree.node_base(id).visible || !tree.node_base(id).active;
    let blocked = ctx.handled || hidden;

    let mouse = input.mouse_position();
    let local_mouse = if blocked {
        None
    } else {
        let base = tree.node_base(id);
        if base.contains_global(mouse) { base.to_local(mouse) } else { None }
    };

    let local_touch = match input.touch_position() {
        Some(touch) if !blocked => {
            let base = tree.node_base(id);
            if base.contains_global(touch) { base.to_local(touch) } else { None }
        }
        _ => None,
    };

    update_mouse(tree, id, local_mouse, queue);
    update_touch(tree, id, local_touch, input, clicks, ctx, queue);

    let (wheel_type, pass_through) = tree
        .dyn_behavior(id)
        .map(|w| (w.mouse_wheel_focus_type(), w.is_pass_through()))
        .unwrap_or((MouseWheelFocusType::None, false));

    if local_mouse.is_some() && input.mouse_wheel_delta() != 0.0 && wheel_type == MouseWheelFocusType::Hover {
        ctx.wheel_widget = Some(id);
    }

    for child in tree.children_copy(id).into_iter().rev() {
        process_pointer(tree, child, input, clicks, ctx, queue, hidden);
    }

    let inside = local_mouse.is_some() || local_touch.is_some();
    let falls_through = pass_through && tree.node_base(id).background().is_none();
    if inside && !falls_through {
        ctx.handled = true;
    }
}

fn update_mouse(tree: &mut WidgetTree, id: WidgetId, local: Option<Point>, queue: &mut EventQueue) {
    let base = tree.node_base_mut(id);
    let previous = base.local_mouse_position;
    if previous == local {
        return;
    }
    base.local_mouse_position = local;
    base.mouse_inside = local.is_some();

    let event = match (previous, local) {
        (None, Some(_)) => WidgetEvent::MouseEntered,
        (Some(_), None) => WidgetEvent::MouseLeft,
        _ => WidgetEvent::MouseMoved,
    };
    queue.push(QueuedEvent::Widget(id, event));
}

fn update_touch(
    tree: &mut WidgetTree,
    id: WidgetId,
    local: Option<Point>,
    input: &InputState,
    clicks: ClickSettings,
    ctx: &mut InputContext,
    queue: &mut EventQueue,
) {
    let wheel_type = tree
        .dyn_behavior(id)
        .map_or(MouseWheelFocusType::None, |w| w.mouse_wheel_focus_type());

    let base = tree.node_base_mut(id);
    let previous = base.local_touch_position;
    if previous == local {
        return;
    }
    base.local_touch_position = local;
    base.touch_inside = local.is_some();

    match (previous, local) {
        (None, Some(_)) if input.previous_touch_position().is_none() => {
            if base.enabled && base.accepts_keyboard_focus {
                ctx.keyboard_candidate = Some(id);
            }
            if wheel_type == MouseWheelFocusType::Focus {
                ctx.wheel_candidate = Some(id);
            }
            queue.push(QueuedEvent::Widget(id, WidgetEvent::TouchDown));
            if base.register_touch(input.now(), clicks.interval, clicks.radius) {
                trace!(target: targets::INPUT, ?id, "double click");
                queue.push(QueuedEvent::Widget(id, WidgetEvent::TouchDoubleClick));
            }
        }
        (None, Some(_)) => queue.push(QueuedEvent::Widget(id, WidgetEvent::TouchEntered)),
        (Some(_), None) if input.touch_position().is_none() => {
            queue.push(QueuedEvent::Widget(id, WidgetEvent::TouchUp));
        }
        (Some(_), None) => queue.push(QueuedEvent::Widget(id, WidgetEvent::TouchLeft)),
        _ => queue.push(QueuedEvent::Widget(id, WidgetEvent::TouchMoved)),
    }
}
