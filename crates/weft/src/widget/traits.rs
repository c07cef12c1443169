//! Core widget trait definitions.
//!
//! # Key Types
//!
//! - [`Widget`] - behavior attached to a tree node
//! - [`LayoutContext`] - passed to [`Widget::measure`] and [`Widget::arrange`]
//! - [`PaintContext`] - passed to [`Widget::paint`]
//! - [`EventContext`] - passed to the `on_*` input callbacks
//! - [`DesktopCommand`] - desktop actions requested from a callback
//!
//! A widget is a node in the [`WidgetTree`] arena: the node's
//! [`WidgetBase`] carries the common properties, and an optional boxed
//! `Widget` carries the type-specific behavior. While a behavior method runs,
//! the behavior is detached from its node, so the context can hand out
//! mutable access to the rest of the tree.

use std::any::Any;

use weft_core::{WeftResult, WidgetId};
use weft_render::{Point, Rect, RenderContext, Size};

use super::base::WidgetBase;
use super::events::Key;
use super::handle::WidgetMut;
use super::tree::WidgetTree;
use crate::desktop::InputState;

/// How a widget takes mouse-wheel focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseWheelFocusType {
    /// Never receives wheel input.
    #[default]
    None,
    /// Receives wheel input while hovered.
    Hover,
    /// Receives wheel input once touched, until something else is.
    Focus,
}

/// Desktop-level actions a widget can request from an input callback.
///
/// Commands are executed by the desktop after the current batch of events
/// has been dispatched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DesktopCommand {
    /// Remove a top-level widget; windows also emit `closed`.
    Close(WidgetId),
    /// Move a top-level widget to the end of the top-level list.
    BringToFront(WidgetId),
    /// Move keyboard focus.
    SetKeyboardFocus(Option<WidgetId>),
    /// Show a widget as the context menu at a desktop position.
    ShowContextMenu { menu: WidgetId, position: Point },
    /// Hide the current context menu.
    HideContextMenu,
}

/// Behavior of a widget kind.
///
/// Every method has a default, so a plain leaf needs only
/// [`type_name`](Widget::type_name). Containers report
/// [`is_container`](Widget::is_container); the default measure/arrange then
/// size the widget to its largest child and stack every child in the content
/// rectangle.
///
/// # Example
///
/// ```ignore
/// struct Swatch { size: Size }
///
/// impl Widget for Swatch {
///     fn type_name(&self) -> &'static str { "Swatch" }
///
///     fn measure(&mut self, _ctx: &mut LayoutContext<'_>, _available: Size) -> Size {
///         self.size
///     }
/// }
/// ```
#[allow(unused_variables)]
pub trait Widget: Any {
    /// Short type name used in logs.
    fn type_name(&self) -> &'static str;

    /// Adjust base defaults once, when the node is created.
    fn configure(&self, base: &mut WidgetBase) {}

    /// Whether the widget owns children.
    fn is_container(&self) -> bool {
        false
    }

    /// Maximum number of children, `None` for unlimited.
    fn child_capacity(&self) -> Option<usize> {
        None
    }

    /// Whether pointer input falls through to widgets underneath when the
    /// widget has no background.
    fn is_pass_through(&self) -> bool {
        false
    }

    /// Top-level windows are brought to front when touched.
    fn is_window(&self) -> bool {
        false
    }

    /// Whether this widget serves as the desktop's menu bar.
    fn is_menu_bar(&self) -> bool {
        false
    }

    fn mouse_wheel_focus_type(&self) -> MouseWheelFocusType {
        MouseWheelFocusType::None
    }

    /// Whether a touch on empty desktop space may clear this widget's wheel focus.
    fn mouse_wheel_focus_can_be_null(&self) -> bool {
        true
    }

    // =========================================================================
    // Layout and painting
    // =========================================================================

    /// Desired content size for `available` content space.
    ///
    /// Margin, border and padding are handled by the caller.
    fn measure(&mut self, ctx: &mut LayoutContext<'_>, available: Size) -> Size {
        ctx.measure_children(available)
    }

    /// Position children inside `bounds`, the content rectangle.
    fn arrange(&mut self, ctx: &mut LayoutContext<'_>, bounds: Rect) {
        ctx.arrange_children(bounds);
    }

    /// Draw content on top of the background and border.
    fn paint(&self, ctx: &mut PaintContext<'_, '_>) {
        ctx.paint_children();
    }

    // =========================================================================
    // Input
    // =========================================================================

    fn on_mouse_entered(&mut self, ctx: &mut EventContext<'_>) {}
    fn on_mouse_left(&mut self, ctx: &mut EventContext<'_>) {}
    fn on_mouse_moved(&mut self, ctx: &mut EventContext<'_>) {}
    fn on_mouse_wheel(&mut self, ctx: &mut EventContext<'_>, delta: f32) {}
    fn on_touch_entered(&mut self, ctx: &mut EventContext<'_>) {}
    fn on_touch_left(&mut self, ctx: &mut EventContext<'_>) {}
    fn on_touch_moved(&mut self, ctx: &mut EventContext<'_>) {}
    fn on_touch_down(&mut self, ctx: &mut EventContext<'_>) {}
    fn on_touch_up(&mut self, ctx: &mut EventContext<'_>) {}
    fn on_touch_double_click(&mut self, ctx: &mut EventContext<'_>) {}
    fn on_key_down(&mut self, ctx: &mut EventContext<'_>, key: Key) {}
    fn on_key_up(&mut self, ctx: &mut EventContext<'_>, key: Key) {}
    fn on_char(&mut self, ctx: &mut EventContext<'_>, c: char) {}
    fn on_got_keyboard_focus(&mut self, ctx: &mut EventContext<'_>) {}
    fn on_lost_keyboard_focus(&mut self, ctx: &mut EventContext<'_>) {}
}

// =============================================================================
// LayoutContext
// =============================================================================

/// Tree access during measure and arrange.
pub struct LayoutContext<'a> {
    tree: &'a mut WidgetTree,
    id: WidgetId,
}

impl<'a> LayoutContext<'a> {
    pub(crate) fn new(tree: &'a mut WidgetTree, id: WidgetId) -> Self {
        Self { tree, id }
    }

    /// The widget being laid out.
    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Base state of the widget being laid out.
    #[inline]
    pub fn base(&self) -> &WidgetBase {
        self.tree.node_base(self.id)
    }

    #[inline]
    pub fn tree(&self) -> &WidgetTree {
        &*self.tree
    }

    /// Children in insertion order.
    pub fn children(&self) -> Vec<WidgetId> {
        self.base().children().to_vec()
    }

    /// Visible children in insertion order.
    pub fn visible_children(&self) -> Vec<WidgetId> {
        self.base()
            .children()
            .iter()
            .copied()
            .filter(|c| self.tree.node_base(*c).is_visible())
            .collect()
    }

    /// Measure a child against `available`, margin included.
    pub fn measure_child(&mut self, child: WidgetId, available: Size) -> Size {
        self.tree.measure(child, available)
    }

    /// Arrange a child inside `container`.
    pub fn arrange_child(&mut self, child: WidgetId, container: Rect) {
        self.tree.arrange(child, container);
    }

    /// Largest desired size among visible children.
    pub fn measure_children(&mut self, available: Size) -> Size {
        let mut result = Size::ZERO;
        for child in self.visible_children() {
            result = result.max(self.measure_child(child, available));
        }
        result
    }

    /// Arrange every visible child inside `bounds`.
    pub fn arrange_children(&mut self, bounds: Rect) {
        for child in self.visible_children() {
            self.arrange_child(child, bounds);
        }
    }
}

// =============================================================================
// PaintContext
// =============================================================================

/// Tree and renderer access during painting.
pub struct PaintContext<'a, 'r> {
    tree: &'a WidgetTree,
    id: WidgetId,
    render: &'a mut RenderContext<'r>,
}

impl<'a, 'r> PaintContext<'a, 'r> {
    pub(crate) fn new(tree: &'a WidgetTree, id: WidgetId, render: &'a mut RenderContext<'r>) -> Self {
        Self { tree, id, render }
    }

    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Base state of the widget being painted.
    #[inline]
    pub fn base(&self) -> &WidgetBase {
        self.tree.node_base(self.id)
    }

    #[inline]
    pub fn tree(&self) -> &WidgetTree {
        &*self.tree
    }

    /// The render state stack, with this widget's transform and opacity applied.
    #[inline]
    pub fn render(&mut self) -> &mut RenderContext<'r> {
        &mut *self.render
    }

    /// Render one child (background, border, content).
    pub fn paint_child(&mut self, child: WidgetId) {
        self.tree.render_widget(child, self.render);
    }

    /// Render every child in ascending z-order.
    pub fn paint_children(&mut self) {
        for child in self.tree.sorted_children(self.id) {
            self.paint_child(child);
        }
    }
}

// =============================================================================
// EventContext
// =============================================================================

/// Tree and input access during an input callback.
pub struct EventContext<'a> {
    tree: &'a mut WidgetTree,
    id: WidgetId,
    input: &'a InputState,
    commands: &'a mut Vec<DesktopCommand>,
}

impl<'a> EventContext<'a> {
    pub(crate) fn new(
        tree: &'a mut WidgetTree,
        id: WidgetId,
        input: &'a InputState,
        commands: &'a mut Vec<DesktopCommand>,
    ) -> Self {
        Self {
            tree,
            id,
            input,
            commands,
        }
    }

    /// The widget receiving the event.
    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    #[inline]
    pub fn base(&self) -> &WidgetBase {
        self.tree.node_base(self.id)
    }

    #[inline]
    pub fn tree(&self) -> &WidgetTree {
        &*self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut *self.tree
    }

    /// Property handle for the receiving widget.
    pub fn widget_mut(&mut self) -> WidgetMut<'_> {
        WidgetMut::new(self.tree, self.id)
    }

    /// Property handle for another widget.
    pub fn other_mut(&mut self, id: WidgetId) -> WeftResult<WidgetMut<'_>> {
        self.tree.widget_mut(id)
    }

    /// Desktop input state for this frame.
    #[inline]
    pub fn input(&self) -> &InputState {
        self.input
    }

    /// Queue a desktop action.
    pub fn post(&mut self, command: DesktopCommand) {
        self.commands.push(command);
    }
}
