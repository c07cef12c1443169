//! Grid container.
//!
//! Children are placed by their grid column/row/spans (see
//! [`WidgetMut::set_grid_column`](crate::widget::WidgetMut::set_grid_column))
//! and sized by the grid's column and row proportions. The optional
//! selection mode tracks the row, column or cell under the pointer and a
//! separately selected one, each highlighted with its own brush.

use weft_core::{Signal, WeftResult, WidgetId};
use weft_render::{Brush, Color, Point, Rect, Size};

use crate::widget::layout::{GridLayout, GridPlacement, Proportion};
use crate::widget::{EventContext, LayoutContext, PaintContext, Widget, WidgetBase};

/// What a grid highlights and selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GridSelectionMode {
    #[default]
    None,
    Row,
    Column,
    Cell,
}

/// Proportional two-dimensional layout container.
pub struct Grid {
    layout: GridLayout,
    show_grid_lines: bool,
    grid_lines_color: Color,
    selection_mode: GridSelectionMode,
    selection_background: Option<Brush>,
    selection_hover_background: Option<Brush>,
    hover_row_index: Option<usize>,
    hover_column_index: Option<usize>,
    selected_row_index: Option<usize>,
    selected_column_index: Option<usize>,
    hover_index_can_be_null: bool,
    can_select_nothing: bool,

    /// Emitted when the hovered row or column changes.
    pub hover_index_changed: Signal<()>,
    /// Emitted when the selected row or column changes.
    pub selected_index_changed: Signal<()>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

fn set_index(slot: &mut Option<usize>, value: Option<usize>, changed: &Signal<()>) {
    if *slot != value {
        *slot = value;
        changed.emit(());
    }
}

fn validate_all(proportions: &[Proportion]) -> WeftResult<()> {
    proportions.iter().try_for_each(Proportion::validate)
}

/// Index of the band containing `pos`, bands widened by half the spacing.
fn band_index(pos: f32, origin: f32, locations: &[f32], sizes: &[f32], spacing: f32) -> Option<usize> {
    let half = (spacing / 2.0).floor();
    locations.iter().zip(sizes).position(|(location, size)| {
        let start = location + origin - half;
        pos >= start && pos < start + size + half
    })
}

impl Grid {
    pub fn new() -> Self {
        Self {
            layout: GridLayout::default(),
            show_grid_lines: false,
            grid_lines_color: Color::WHITE,
            selection_mode: GridSelectionMode::None,
            selection_background: None,
            selection_hover_background: None,
            hover_row_index: None,
            hover_column_index: None,
            selected_row_index: None,
            selected_column_index: None,
            hover_index_can_be_null: true,
            can_select_nothing: false,
            hover_index_changed: Signal::new(),
            selected_index_changed: Signal::new(),
        }
    }

    /// The sizing engine, holding the results of the last arrange.
    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    // =========================================================================
    // Proportions and Spacing
    // =========================================================================

    pub fn column_proportions(&self) -> &[Proportion] {
        self.layout.column_proportions()
    }

    pub fn row_proportions(&self) -> &[Proportion] {
        self.layout.row_proportions()
    }

    pub fn set_column_proportions(&mut self, proportions: Vec<Proportion>) -> WeftResult<()> {
        validate_all(&proportions)?;
        self.layout.set_column_proportions(proportions);
        Ok(())
    }

    pub fn set_row_proportions(&mut self, proportions: Vec<Proportion>) -> WeftResult<()> {
        validate_all(&proportions)?;
        self.layout.set_row_proportions(proportions);
        Ok(())
    }

    /// Rule for columns beyond the explicit list.
    pub fn set_default_column_proportion(&mut self, proportion: Proportion) -> WeftResult<()> {
        proportion.validate()?;
        self.layout.set_default_column_proportion(proportion);
        Ok(())
    }

    /// Rule for rows beyond the explicit list.
    pub fn set_default_row_proportion(&mut self, proportion: Proportion) -> WeftResult<()> {
        proportion.validate()?;
        self.layout.set_default_row_proportion(proportion);
        Ok(())
    }

    pub fn column_spacing(&self) -> f32 {
        self.layout.column_spacing()
    }

    pub fn row_spacing(&self) -> f32 {
        self.layout.row_spacing()
    }

    pub fn set_column_spacing(&mut self, spacing: f32) {
        self.layout.set_column_spacing(spacing);
    }

    pub fn set_row_spacing(&mut self, spacing: f32) {
        self.layout.set_row_spacing(spacing);
    }

    /// Override the sum that `Part` values are divided by.
    pub fn set_total_columns_part(&mut self, total: Option<f32>) {
        self.layout.set_total_columns_part(total);
    }

    pub fn set_total_rows_part(&mut self, total: Option<f32>) {
        self.layout.set_total_rows_part(total);
    }

    // =========================================================================
    // Appearance
    // =========================================================================

    #[inline]
    pub fn show_grid_lines(&self) -> bool {
        self.show_grid_lines
    }

    pub fn set_show_grid_lines(&mut self, show: bool) {
        self.show_grid_lines = show;
    }

    pub fn set_grid_lines_color(&mut self, color: Color) {
        self.grid_lines_color = color;
    }

    pub fn set_selection_background(&mut self, brush: Option<Brush>) {
        self.selection_background = brush;
    }

    pub fn set_selection_hover_background(&mut self, brush: Option<Brush>) {
        self.selection_hover_background = brush;
    }

    // =========================================================================
    // Selection
    // =========================================================================

    #[inline]
    pub fn selection_mode(&self) -> GridSelectionMode {
        self.selection_mode
    }

    pub fn set_selection_mode(&mut self, mode: GridSelectionMode) {
        self.selection_mode = mode;
    }

    #[inline]
    pub fn hover_row_index(&self) -> Option<usize> {
        self.hover_row_index
    }

    #[inline]
    pub fn hover_column_index(&self) -> Option<usize> {
        self.hover_column_index
    }

    #[inline]
    pub fn selected_row_index(&self) -> Option<usize> {
        self.selected_row_index
    }

    #[inline]
    pub fn selected_column_index(&self) -> Option<usize> {
        self.selected_column_index
    }

    pub fn set_selected_row_index(&mut self, index: Option<usize>) {
        set_index(&mut self.selected_row_index, index, &self.selected_index_changed);
    }

    pub fn set_selected_column_index(&mut self, index: Option<usize>) {
        set_index(&mut self.selected_column_index, index, &self.selected_index_changed);
    }

    /// Whether leaving the grid clears the hover index.
    pub fn set_hover_index_can_be_null(&mut self, value: bool) {
        self.hover_index_can_be_null = value;
    }

    /// Whether touching the selected index again deselects it.
    pub fn set_can_select_nothing(&mut self, value: bool) {
        self.can_select_nothing = value;
    }

    /// Recompute the hover indices for a desktop-space pointer position.
    fn update_hover(&mut self, base: &WidgetBase, position: Option<Point>) {
        if self.selection_mode == GridSelectionMode::None {
            return;
        }

        let Some(position) = position.and_then(|p| base.to_local(p)) else {
            if self.hover_index_can_be_null {
                set_index(&mut self.hover_row_index, None, &self.hover_index_changed);
                set_index(&mut self.hover_column_index, None, &self.hover_index_changed);
            }
            return;
        };
        let position = position + base.bounds().origin;
        let actual = base.actual_bounds();

        if matches!(self.selection_mode, GridSelectionMode::Column | GridSelectionMode::Cell) {
            if let Some(index) = band_index(
                position.x,
                actual.left(),
                self.layout.cell_locations_x(),
                self.layout.column_widths(),
                self.layout.column_spacing(),
            ) {
                set_index(&mut self.hover_column_index, Some(index), &self.hover_index_changed);
            }
        }

        if matches!(self.selection_mode, GridSelectionMode::Row | GridSelectionMode::Cell) {
            if let Some(index) = band_index(
                position.y,
                actual.top(),
                self.layout.cell_locations_y(),
                self.layout.row_heights(),
                self.layout.row_spacing(),
            ) {
                set_index(&mut self.hover_row_index, Some(index), &self.hover_index_changed);
            }
        }
    }

    fn items(ctx: &LayoutContext<'_>) -> (Vec<WidgetId>, Vec<GridPlacement>) {
        let children = ctx.visible_children();
        let placements = children
            .iter()
            .map(|c| ctx.tree().node_base(*c).grid())
            .collect();
        (children, placements)
    }

    fn row_band(&self, bounds: Rect, row: usize) -> Option<Rect> {
        let spacing = self.layout.row_spacing();
        Some(Rect::new(
            bounds.left(),
            bounds.top() + self.layout.cell_locations_y().get(row)? - (spacing / 2.0).floor(),
            bounds.width(),
            self.layout.row_heights().get(row)? + spacing,
        ))
    }

    fn column_band(&self, bounds: Rect, column: usize) -> Option<Rect> {
        let spacing = self.layout.column_spacing();
        Some(Rect::new(
            bounds.left() + self.layout.cell_locations_x().get(column)? - (spacing / 2.0).floor(),
            bounds.top(),
            self.layout.column_widths().get(column)? + spacing,
            bounds.height(),
        ))
    }

    fn cell_band(&self, bounds: Rect, column: usize, row: usize) -> Option<Rect> {
        let columns = self.column_band(bounds, column)?;
        let rows = self.row_band(bounds, row)?;
        Some(Rect::new(columns.left(), rows.top(), columns.width(), rows.height()))
    }

    /// Hover and selection highlight rectangles for the current mode.
    fn highlights(&self, bounds: Rect) -> (Option<Rect>, Option<Rect>) {
        let (hover_row, hover_col) = (self.hover_row_index, self.hover_column_index);
        let (sel_row, sel_col) = (self.selected_row_index, self.selected_column_index);
        match self.selection_mode {
            GridSelectionMode::None => (None, None),
            GridSelectionMode::Row => (
                hover_row
                    .filter(|r| Some(*r) != sel_row)
                    .and_then(|r| self.row_band(bounds, r)),
                sel_row.and_then(|r| self.row_band(bounds, r)),
            ),
            GridSelectionMode::Column => (
                hover_col
                    .filter(|c| Some(*c) != sel_col)
                    .and_then(|c| self.column_band(bounds, c)),
                sel_col.and_then(|c| self.column_band(bounds, c)),
            ),
            GridSelectionMode::Cell => {
                let hover = match (hover_col, hover_row) {
                    (Some(c), Some(r)) if (Some(r), Some(c)) != (sel_row, sel_col) => {
                        self.cell_band(bounds, c, r)
                    }
                    _ => None,
                };
                let selected = match (sel_col, sel_row) {
                    (Some(c), Some(r)) => self.cell_band(bounds, c, r),
                    _ => None,
                };
                (hover, selected)
            }
        }
    }
}

impl Widget for Grid {
    fn type_name(&self) -> &'static str {
        "Grid"
    }

    fn is_container(&self) -> bool {
        true
    }

    fn is_pass_through(&self) -> bool {
        true
    }

    fn measure(&mut self, ctx: &mut LayoutContext<'_>, available: Size) -> Size {
        let (children, placements) = Self::items(ctx);
        self.layout
            .measure(available, &placements, |i, size| ctx.measure_child(children[i], size))
    }

    fn arrange(&mut self, ctx: &mut LayoutContext<'_>, bounds: Rect) {
        let (children, placements) = Self::items(ctx);
        let rects = self
            .layout
            .arrange(bounds, &placements, |i, size| ctx.measure_child(children[i], size));
        for (child, rect) in children.into_iter().zip(rects) {
            ctx.arrange_child(child, rect);
        }
    }

    fn paint(&self, ctx: &mut PaintContext<'_, '_>) {
        let bounds = ctx.base().actual_bounds();

        let (hover, selected) = self.highlights(bounds);
        if let (Some(rect), Some(brush)) = (hover, &self.selection_hover_background) {
            ctx.render().draw_brush(brush, rect, Color::WHITE);
        }
        if let (Some(rect), Some(brush)) = (selected, &self.selection_background) {
            ctx.render().draw_brush(brush, rect, Color::WHITE);
        }

        ctx.paint_children();

        if !self.show_grid_lines {
            return;
        }
        for x in self.layout.grid_lines_x() {
            let line = Rect::new(bounds.left() + x, bounds.top(), 1.0, bounds.height());
            ctx.render().fill_rectangle(line, self.grid_lines_color);
        }
        for y in self.layout.grid_lines_y() {
            let line = Rect::new(bounds.left(), bounds.top() + y, bounds.width(), 1.0);
            ctx.render().fill_rectangle(line, self.grid_lines_color);
        }
    }

    fn on_mouse_entered(&mut self, ctx: &mut EventContext<'_>) {
        self.update_hover(ctx.base(), Some(ctx.input().mouse_position()));
    }

    fn on_mouse_moved(&mut self, ctx: &mut EventContext<'_>) {
        self.update_hover(ctx.base(), Some(ctx.input().mouse_position()));
    }

    fn on_mouse_left(&mut self, ctx: &mut EventContext<'_>) {
        self.update_hover(ctx.base(), None);
    }

    fn on_touch_down(&mut self, ctx: &mut EventContext<'_>) {
        self.update_hover(ctx.base(), ctx.input().touch_position());

        if let Some(row) = self.hover_row_index {
            if self.selected_row_index != Some(row) {
                self.set_selected_row_index(Some(row));
            } else if self.can_select_nothing {
                self.set_selected_row_index(None);
            }
        }

        if let Some(column) = self.hover_column_index {
            if self.selected_column_index != Some(column) {
                self.set_selected_column_index(Some(column));
            } else if self.can_select_nothing {
                self.set_selected_column_index(None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_index_includes_half_spacing() {
        let locations = [0.0, 12.0, 24.0];
        let sizes = [10.0, 10.0, 10.0];
        assert_eq!(band_index(0.0, 0.0, &locations, &sizes, 2.0), Some(0));
        assert_eq!(band_index(11.0, 0.0, &locations, &sizes, 2.0), Some(1));
        assert_eq!(band_index(25.0, 100.0, &locations, &sizes, 2.0), None);
        assert_eq!(band_index(125.0, 100.0, &locations, &sizes, 2.0), Some(2));
    }

    #[test]
    fn test_rejects_negative_proportions() {
        let mut grid = Grid::new();
        assert!(
            grid.set_column_proportions(vec![Proportion::AUTO, Proportion::part(-1.0)])
                .is_err()
        );
        assert!(grid.column_proportions().is_empty());
    }

    #[test]
    fn test_row_highlights_follow_arranged_rows() {
        use std::any::Any;

        use crate::widget::layout::{HorizontalAlignment, Thickness, VerticalAlignment};
        use crate::widget::WidgetTree;

        let mut grid = Grid::new();
        grid.set_row_proportions(vec![
            Proportion::pixels(20.0),
            Proportion::pixels(30.0),
            Proportion::pixels(40.0),
        ])
        .unwrap();
        grid.set_row_spacing(4.0);
        grid.set_selection_mode(GridSelectionMode::Row);
        grid.hover_row_index = Some(0);
        // Not arranged yet: no bands exist
        assert_eq!(grid.highlights(Rect::new(0.0, 0.0, 10.0, 10.0)), (None, None));
        grid.hover_row_index = None;

        let mut tree = WidgetTree::new();
        let id = tree.create(grid);
        tree.add_root(id).unwrap();
        tree.widget_mut(id)
            .unwrap()
            .set_horizontal_alignment(HorizontalAlignment::Stretch)
            .set_vertical_alignment(VerticalAlignment::Stretch)
            .set_padding(Thickness::uniform(5.0))
            .unwrap();
        tree.arrange(id, Rect::new(10.0, 10.0, 200.0, 200.0));
        tree.update_transforms();

        let actual = tree.base(id).unwrap().actual_bounds();
        assert_eq!(actual, Rect::new(15.0, 15.0, 190.0, 190.0));

        let mut behavior = tree.take_behavior(id).unwrap();
        let grid = (&mut *behavior as &mut dyn Any)
            .downcast_mut::<Grid>()
            .unwrap();
        assert_eq!(grid.layout().cell_locations_y(), &[0.0, 24.0, 58.0]);

        // Row 1 spans 37..69 in desktop space
        grid.update_hover(tree.base(id).unwrap(), Some(Point::new(50.0, 49.0)));
        assert_eq!(grid.hover_row_index(), Some(1));
        let row_one = Rect::new(15.0, 15.0 + 24.0 - 2.0, 190.0, 30.0 + 4.0);
        assert_eq!(grid.highlights(actual), (Some(row_one), None));

        // Hovering the selected row draws only the selection
        grid.set_selected_row_index(Some(1));
        assert_eq!(grid.highlights(actual), (None, Some(row_one)));

        grid.update_hover(tree.base(id).unwrap(), Some(Point::new(50.0, 80.0)));
        assert_eq!(grid.hover_row_index(), Some(2));
        let row_two = Rect::new(15.0, 15.0 + 58.0 - 2.0, 190.0, 40.0 + 4.0);
        assert_eq!(grid.highlights(actual), (Some(row_two), Some(row_one)));

        tree.restore_behavior(id, behavior);
    }
}
