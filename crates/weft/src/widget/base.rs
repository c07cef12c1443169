//! Widget base state.
//!
//! `WidgetBase` holds everything the tree, the layout passes and the desktop
//! need to know about a node: layout properties, cached layout results,
//! pointer state and per-widget notifications. Widget behaviors only add
//! their own data on top.

use std::time::Duration;

use glam::Vec2;
use weft_core::{Hook, Signal, WidgetId};
use weft_render::{Brush, Point, Rect, Size, Transform2D};

use super::events::{DoubleClickTracker, Key};
use super::layout::{GridPlacement, HorizontalAlignment, Proportion, Thickness, VerticalAlignment};

/// Brushes selected by widget state when painting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetBrushes {
    pub background: Option<Brush>,
    pub over_background: Option<Brush>,
    pub focused_background: Option<Brush>,
    pub disabled_background: Option<Brush>,
    pub disabled_over_background: Option<Brush>,
    pub border: Option<Brush>,
    pub over_border: Option<Brush>,
    pub focused_border: Option<Brush>,
    pub disabled_border: Option<Brush>,
}

/// Per-node state shared by every widget.
///
/// Read it through [`WidgetTree::base`](super::WidgetTree::base); change
/// properties through [`WidgetMut`](super::WidgetMut) so invalidation happens.
pub struct WidgetBase {
    // Structure
    pub(crate) id: WidgetId,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    pub(crate) children_sorted: Vec<WidgetId>,
    pub(crate) children_dirty: bool,
    pub(crate) placed: bool,
    pub(crate) name: Option<String>,

    // Layout properties
    pub(crate) left: f32,
    pub(crate) top: f32,
    pub(crate) width: Option<f32>,
    pub(crate) height: Option<f32>,
    pub(crate) min_width: Option<f32>,
    pub(crate) min_height: Option<f32>,
    pub(crate) max_width: Option<f32>,
    pub(crate) max_height: Option<f32>,
    pub(crate) margin: Thickness,
    pub(crate) border_thickness: Thickness,
    pub(crate) padding: Thickness,
    pub(crate) horizontal_alignment: HorizontalAlignment,
    pub(crate) vertical_alignment: VerticalAlignment,
    pub(crate) grid: GridPlacement,
    pub(crate) stack_proportion: Option<Proportion>,
    pub(crate) z_index: i32,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    pub(crate) opacity: f32,
    pub(crate) scale: Vec2,
    pub(crate) rotation: f32,
    pub(crate) transform_origin: Vec2,
    pub(crate) clip_to_bounds: bool,
    pub(crate) brushes: WidgetBrushes,
    pub(crate) accepts_keyboard_focus: bool,
    pub(crate) is_modal: bool,

    // Layout results
    pub(crate) measure_dirty: bool,
    pub(crate) arrange_dirty: bool,
    pub(crate) last_measure_available: Option<Size>,
    pub(crate) last_measure_size: Size,
    pub(crate) container_bounds: Option<Rect>,
    pub(crate) bounds: Rect,
    pub(crate) actual_bounds: Rect,
    pub(crate) transform: Transform2D,

    // Input state
    pub(crate) active: bool,
    pub(crate) mouse_inside: bool,
    pub(crate) touch_inside: bool,
    pub(crate) local_mouse_position: Option<Point>,
    pub(crate) local_touch_position: Option<Point>,
    pub(crate) keyboard_focused: bool,
    pub(crate) double_click: DoubleClickTracker,

    // =========================================================================
    // Signals
    // =========================================================================
    /// Emitted when the widget enters (`true`) or leaves (`false`) the desktop.
    pub placed_changed: Signal<bool>,
    /// Emitted after every full arrange with the new bounds.
    pub arrange_updated: Signal<Rect>,
    pub visible_changed: Signal<bool>,
    pub enabled_changed: Signal<bool>,

    pub mouse_entered: Signal<()>,
    pub mouse_left: Signal<()>,
    pub mouse_moved: Signal<()>,
    pub mouse_wheel_changed: Signal<f32>,
    pub touch_entered: Signal<()>,
    pub touch_left: Signal<()>,
    pub touch_moved: Signal<()>,
    pub touch_down: Signal<()>,
    pub touch_up: Signal<()>,
    pub touch_double_click: Signal<()>,
    pub key_down: Signal<Key>,
    pub key_up: Signal<Key>,
    pub char_typed: Signal<char>,

    /// Emitted with `true` on gaining and `false` on losing keyboard focus.
    pub keyboard_focus_changed: Signal<bool>,
    /// Consulted before this widget loses keyboard focus; the argument is the
    /// widget about to receive it. `Cancel` keeps the focus here.
    pub losing_keyboard_focus: Hook<Option<WidgetId>>,
}

impl WidgetBase {
    pub(crate) fn new(id: WidgetId) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            children_sorted: Vec::new(),
            children_dirty: false,
            placed: false,
            name: None,

            left: 0.0,
            top: 0.0,
            width: None,
            height: None,
            min_width: None,
            min_height: None,
            max_width: None,
            max_height: None,
            margin: Thickness::ZERO,
            border_thickness: Thickness::ZERO,
            padding: Thickness::ZERO,
            horizontal_alignment: HorizontalAlignment::default(),
            vertical_alignment: VerticalAlignment::default(),
            grid: GridPlacement::default(),
            stack_proportion: None,
            z_index: 0,
            visible: true,
            enabled: true,
            opacity: 1.0,
            scale: Vec2::ONE,
            rotation: 0.0,
            transform_origin: Vec2::splat(0.5),
            clip_to_bounds: false,
            brushes: WidgetBrushes::default(),
            accepts_keyboard_focus: false,
            is_modal: false,

            measure_dirty: true,
            arrange_dirty: true,
            last_measure_available: None,
            last_measure_size: Size::ZERO,
            container_bounds: None,
            bounds: Rect::ZERO,
            actual_bounds: Rect::ZERO,
            transform: Transform2D::IDENTITY,

            active: true,
            mouse_inside: false,
            touch_inside: false,
            local_mouse_position: None,
            local_touch_position: None,
            keyboard_focused: false,
            double_click: DoubleClickTracker::default(),

            placed_changed: Signal::new(),
            arrange_updated: Signal::new(),
            visible_changed: Signal::new(),
            enabled_changed: Signal::new(),
            mouse_entered: Signal::new(),
            mouse_left: Signal::new(),
            mouse_moved: Signal::new(),
            mouse_wheel_changed: Signal::new(),
            touch_entered: Signal::new(),
            touch_left: Signal::new(),
            touch_moved: Signal::new(),
            touch_down: Signal::new(),
            touch_up: Signal::new(),
            touch_double_click: Signal::new(),
            key_down: Signal::new(),
            key_up: Signal::new(),
            char_typed: Signal::new(),
            keyboard_focus_changed: Signal::new(),
            losing_keyboard_focus: Hook::new(),
        }
    }

    // =========================================================================
    // Structure
    // =========================================================================

    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    #[inline]
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Children in insertion order.
    #[inline]
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    /// Whether the widget is part of a tree rooted in the desktop's top-level list.
    #[inline]
    pub fn is_placed(&self) -> bool {
        self.placed
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    // =========================================================================
    // Layout Properties
    // =========================================================================

    #[inline]
    pub fn left(&self) -> f32 {
        self.left
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.top
    }

    #[inline]
    pub fn width(&self) -> Option<f32> {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Option<f32> {
        self.height
    }

    #[inline]
    pub fn min_width(&self) -> Option<f32> {
        self.min_width
    }

    #[inline]
    pub fn min_height(&self) -> Option<f32> {
        self.min_height
    }

    #[inline]
    pub fn max_width(&self) -> Option<f32> {
        self.max_width
    }

    #[inline]
    pub fn max_height(&self) -> Option<f32> {
        self.max_height
    }

    #[inline]
    pub fn margin(&self) -> Thickness {
        self.margin
    }

    #[inline]
    pub fn border_thickness(&self) -> Thickness {
        self.border_thickness
    }

    #[inline]
    pub fn padding(&self) -> Thickness {
        self.padding
    }

    /// Margin, border and padding combined.
    #[inline]
    pub fn mbp(&self) -> Thickness {
        self.margin.plus(&self.border_thickness).plus(&self.padding)
    }

    #[inline]
    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.horizontal_alignment
    }

    #[inline]
    pub fn vertical_alignment(&self) -> VerticalAlignment {
        self.vertical_alignment
    }

    /// Grid column, row and spans.
    #[inline]
    pub fn grid(&self) -> GridPlacement {
        self.grid
    }

    #[inline]
    pub fn stack_proportion(&self) -> Option<Proportion> {
        self.stack_proportion
    }

    #[inline]
    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    #[inline]
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Rotation in radians.
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Scale/rotation center relative to the bounds, `(0.5, 0.5)` is the middle.
    #[inline]
    pub fn transform_origin(&self) -> Vec2 {
        self.transform_origin
    }

    #[inline]
    pub fn clip_to_bounds(&self) -> bool {
        self.clip_to_bounds
    }

    #[inline]
    pub fn brushes(&self) -> &WidgetBrushes {
        &self.brushes
    }

    #[inline]
    pub fn background(&self) -> Option<&Brush> {
        self.brushes.background.as_ref()
    }

    #[inline]
    pub fn accepts_keyboard_focus(&self) -> bool {
        self.accepts_keyboard_focus
    }

    #[inline]
    pub fn is_modal(&self) -> bool {
        self.is_modal
    }

    // =========================================================================
    // Layout Results
    // =========================================================================

    /// Arranged rectangle in desktop coordinates, margin included.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Bounds minus margin; background and border are drawn here.
    #[inline]
    pub fn background_bounds(&self) -> Rect {
        self.margin.deflate(self.bounds)
    }

    /// Background bounds minus border and padding; children live here.
    #[inline]
    pub fn actual_bounds(&self) -> Rect {
        self.actual_bounds
    }

    /// Rectangle last passed to arrange, if any.
    #[inline]
    pub fn container_bounds(&self) -> Option<Rect> {
        self.container_bounds
    }

    /// Size returned by the last measure.
    #[inline]
    pub fn desired_size(&self) -> Size {
        self.last_measure_size
    }

    #[inline]
    pub fn is_measure_dirty(&self) -> bool {
        self.measure_dirty
    }

    #[inline]
    pub fn is_arrange_dirty(&self) -> bool {
        self.arrange_dirty
    }

    /// Composed scale/rotation transform from desktop to this widget.
    #[inline]
    pub fn transform(&self) -> Transform2D {
        self.transform
    }

    /// Whether a desktop-space point lies within the transformed bounds.
    pub fn contains_global(&self, point: Point) -> bool {
        match self.to_layout_space(point) {
            Some(p) => self.bounds.contains(p),
            None => false,
        }
    }

    /// Convert a desktop-space point to coordinates relative to the bounds origin.
    pub fn to_local(&self, point: Point) -> Option<Point> {
        self.to_layout_space(point).map(|p| p - self.bounds.origin)
    }

    fn to_layout_space(&self, point: Point) -> Option<Point> {
        if self.transform.is_identity() {
            return Some(point);
        }
        self.transform.inverse().map(|inv| inv.transform_point(point))
    }

    /// This widget's own scale/rotation around its transform origin.
    pub(crate) fn local_transform(&self) -> Transform2D {
        if self.scale == Vec2::ONE && self.rotation == 0.0 {
            return Transform2D::IDENTITY;
        }
        let center = self.bounds.origin.to_vec2() + self.transform_origin * self.bounds.size.to_vec2();
        Transform2D::around(Point::from_vec2(center), self.scale.x, self.scale.y, self.rotation)
    }

    // =========================================================================
    // Input State
    // =========================================================================

    /// False while a modal widget above this one is shown.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the mouse is over the widget (the "hovered" state).
    #[inline]
    pub fn is_mouse_inside(&self) -> bool {
        self.mouse_inside
    }

    #[inline]
    pub fn is_touch_inside(&self) -> bool {
        self.touch_inside
    }

    /// Mouse position relative to the bounds origin while inside.
    #[inline]
    pub fn local_mouse_position(&self) -> Option<Point> {
        self.local_mouse_position
    }

    /// Touch position relative to the bounds origin while inside.
    #[inline]
    pub fn local_touch_position(&self) -> Option<Point> {
        self.local_touch_position
    }

    #[inline]
    pub fn is_keyboard_focused(&self) -> bool {
        self.keyboard_focused
    }

    pub(crate) fn clear_pointer_state(&mut self) {
        self.mouse_inside = false;
        self.touch_inside = false;
        self.local_mouse_position = None;
        self.local_touch_position = None;
    }

    pub(crate) fn register_touch(&mut self, now: Duration, interval: Duration, radius: f32) -> bool {
        match self.local_touch_position {
            Some(position) => self.double_click.register(now, position, interval, radius),
            None => false,
        }
    }
}

impl std::fmt::Debug for WidgetBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetBase")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("children", &self.children.len())
            .field("bounds", &self.bounds)
            .field("visible", &self.visible)
            .field("placed", &self.placed)
            .finish()
    }
}
