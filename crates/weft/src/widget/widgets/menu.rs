//! Menus: a horizontal menu bar or a vertical popup list.
//!
//! Items are the menu's children. Hovering highlights an item, touching or
//! pressing Enter/Space on the highlighted item selects it and emits
//! [`Menu::item_selected`]. A vertical menu also asks the desktop to hide the
//! context menu, since that is how popup menus are shown.

use tracing::debug;
use weft_core::logging::targets;
use weft_core::{Signal, WidgetId};
use weft_render::{Brush, Color, Point, Rect, Size};

use crate::widget::layout::{GridLayout, GridPlacement, Orientation, Proportion};
use crate::widget::{
    DesktopCommand, EventContext, Key, LayoutContext, PaintContext, Widget, WidgetBase, WidgetTree,
};

pub struct Menu {
    orientation: Orientation,
    layout: GridLayout,
    hover_index: Option<usize>,
    hover_background: Option<Brush>,

    /// Emitted with the index of the selected item.
    pub item_selected: Signal<usize>,
}

impl Menu {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            layout: GridLayout::new(Proportion::AUTO),
            hover_index: None,
            hover_background: None,
            item_selected: Signal::new(),
        }
    }

    /// A menu bar, laid out left to right.
    pub fn bar() -> Self {
        Self::new(Orientation::Horizontal)
    }

    /// A popup menu, laid out top to bottom.
    pub fn popup() -> Self {
        Self::new(Orientation::Vertical)
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn hover_index(&self) -> Option<usize> {
        self.hover_index
    }

    pub fn set_hover_index(&mut self, index: Option<usize>) {
        self.hover_index = index;
    }

    pub fn set_hover_background(&mut self, brush: Option<Brush>) {
        self.hover_background = brush;
    }

    /// Space between items.
    pub fn set_spacing(&mut self, spacing: f32) {
        match self.orientation {
            Orientation::Horizontal => self.layout.set_column_spacing(spacing),
            Orientation::Vertical => self.layout.set_row_spacing(spacing),
        }
    }

    fn placement(&self, index: usize) -> GridPlacement {
        match self.orientation {
            Orientation::Horizontal => GridPlacement::at(index, 0),
            Orientation::Vertical => GridPlacement::at(0, index),
        }
    }

    fn visible_items(tree: &WidgetTree, base: &WidgetBase) -> Vec<WidgetId> {
        base.children()
            .iter()
            .copied()
            .filter(|c| tree.node_base(*c).is_visible())
            .collect()
    }

    fn item_at(ctx: &EventContext<'_>, position: Option<Point>) -> Option<usize> {
        let position = position?;
        Self::visible_items(ctx.tree(), ctx.base())
            .iter()
            .position(|item| ctx.tree().node_base(*item).contains_global(position))
    }

    fn select(&mut self, ctx: &mut EventContext<'_>, index: usize) {
        debug!(target: targets::DESKTOP, menu = ?ctx.id(), index, "menu item selected");
        self.item_selected.emit(index);
        if self.orientation == Orientation::Vertical {
            ctx.post(DesktopCommand::HideContextMenu);
        }
    }

    fn step(&mut self, count: usize, forward: bool) {
        if count == 0 {
            return;
        }
        self.hover_index = Some(match (self.hover_index, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        });
    }
}

impl Widget for Menu {
    fn type_name(&self) -> &'static str {
        "Menu"
    }

    fn configure(&self, base: &mut WidgetBase) {
        base.accepts_keyboard_focus = true;
    }

    fn is_container(&self) -> bool {
        true
    }

    fn is_menu_bar(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }

    fn measure(&mut self, ctx: &mut LayoutContext<'_>, available: Size) -> Size {
        let items = ctx.visible_children();
        let placements: Vec<_> = (0..items.len()).map(|i| self.placement(i)).collect();
        self.layout
            .measure(available, &placements, |i, size| ctx.measure_child(items[i], size))
    }

    fn arrange(&mut self, ctx: &mut LayoutContext<'_>, bounds: Rect) {
        let items = ctx.visible_children();
        let placements: Vec<_> = (0..items.len()).map(|i| self.placement(i)).collect();
        let rects = self
            .layout
            .arrange(bounds, &placements, |i, size| ctx.measure_child(items[i], size));
        for (item, rect) in items.into_iter().zip(rects) {
            ctx.arrange_child(item, rect);
        }
    }

    fn paint(&self, ctx: &mut PaintContext<'_, '_>) {
        if let (Some(index), Some(brush)) = (self.hover_index, &self.hover_background) {
            let items = Self::visible_items(ctx.tree(), ctx.base());
            if let Some(item) = items.get(index) {
                let rect = ctx.tree().node_base(*item).bounds();
                ctx.render().draw_brush(brush, rect, Color::WHITE);
            }
        }
        ctx.paint_children();
    }

    fn on_mouse_moved(&mut self, ctx: &mut EventContext<'_>) {
        if let Some(index) = Self::item_at(ctx, Some(ctx.input().mouse_position())) {
            self.hover_index = Some(index);
        }
    }

    fn on_mouse_left(&mut self, _ctx: &mut EventContext<'_>) {
        self.hover_index = None;
    }

    fn on_touch_down(&mut self, ctx: &mut EventContext<'_>) {
        if let Some(index) = Self::item_at(ctx, ctx.input().touch_position()) {
            self.hover_index = Some(index);
            self.select(ctx, index);
        }
    }

    fn on_key_down(&mut self, ctx: &mut EventContext<'_>, key: Key) {
        let count = Self::visible_items(ctx.tree(), ctx.base()).len();
        let (back, forward) = match self.orientation {
            Orientation::Horizontal => (Key::ArrowLeft, Key::ArrowRight),
            Orientation::Vertical => (Key::ArrowUp, Key::ArrowDown),
        };
        match key {
            k if k == back => self.step(count, false),
            k if k == forward => self.step(count, true),
            Key::Enter | Key::NumpadEnter | Key::Space => {
                if let Some(index) = self.hover_index.filter(|i| *i < count) {
                    self.select(ctx, index);
                }
            }
            _ => {}
        }
    }
}
