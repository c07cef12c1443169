//! Proportional grid sizing.
//!
//! `GridLayout` sizes columns and rows from a list of [`Proportion`]s and the
//! measured sizes of the items placed in them, then computes the rectangle of
//! every item. It knows nothing about the widget tree: callers pass item
//! placements and a closure that measures item *i*.
//!
//! # Algorithm
//!
//! Measure:
//! 1. Column/row counts are `max(explicit proportions, position + span)`.
//! 2. `Pixels` columns take their value; every other column takes the largest
//!    measured width among the single-span items whose origin cell is in it.
//! 3. All `Part` columns are then resized to `max_part_width * value`, so parts
//!    share one unit size.
//! 4. The desired size is the sum of the sizes plus spacing.
//!
//! Arrange:
//! 1. `Auto` and `Pixels` columns are subtracted from the available width;
//!    `Part` and `Fill` values add up to the total part.
//! 2. Each `Part` column gets `value * available / total_part`.
//! 3. The first `Fill` column takes what remains.
//!
//! All sizes are truncated to whole pixels.

use tracing::trace;
use weft_core::logging::targets;
use weft_render::{Rect, Size};

use super::proportion::{Proportion, ProportionType};

/// Columns (and rows) a grid lays out at most.
///
/// Placements reaching further are cut off at this many tracks.
pub const MAX_GRID_TRACKS: usize = 1024;

/// Where an item sits in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPlacement {
    pub column: usize,
    pub row: usize,
    pub column_span: usize,
    pub row_span: usize,
}

impl Default for GridPlacement {
    fn default() -> Self {
        Self {
            column: 0,
            row: 0,
            column_span: 1,
            row_span: 1,
        }
    }
}

impl GridPlacement {
    /// A single cell.
    pub const fn at(column: usize, row: usize) -> Self {
        Self {
            column,
            row,
            column_span: 1,
            row_span: 1,
        }
    }

    /// Set the spans (builder pattern).
    pub const fn spanning(mut self, column_span: usize, row_span: usize) -> Self {
        self.column_span = column_span;
        self.row_span = row_span;
        self
    }
}

/// Column/row sizing engine shared by `Grid` and `StackPanel`.
#[derive(Debug, Clone)]
pub struct GridLayout {
    column_proportions: Vec<Proportion>,
    row_proportions: Vec<Proportion>,
    default_column_proportion: Proportion,
    default_row_proportion: Proportion,
    column_spacing: f32,
    row_spacing: f32,
    total_columns_part: Option<f32>,
    total_rows_part: Option<f32>,

    measure_col_widths: Vec<f32>,
    measure_row_heights: Vec<f32>,
    col_widths: Vec<f32>,
    row_heights: Vec<f32>,
    cell_locations_x: Vec<f32>,
    cell_locations_y: Vec<f32>,
    grid_lines_x: Vec<f32>,
    grid_lines_y: Vec<f32>,
    actual_size: Size,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(Proportion::GRID_DEFAULT)
    }
}

impl GridLayout {
    /// Create an engine whose unlisted columns and rows use `default_proportion`.
    pub fn new(default_proportion: Proportion) -> Self {
        Self {
            column_proportions: Vec::new(),
            row_proportions: Vec::new(),
            default_column_proportion: default_proportion,
            default_row_proportion: default_proportion,
            column_spacing: 0.0,
            row_spacing: 0.0,
            total_columns_part: None,
            total_rows_part: None,
            measure_col_widths: Vec::new(),
            measure_row_heights: Vec::new(),
            col_widths: Vec::new(),
            row_heights: Vec::new(),
            cell_locations_x: Vec::new(),
            cell_locations_y: Vec::new(),
            grid_lines_x: Vec::new(),
            grid_lines_y: Vec::new(),
            actual_size: Size::ZERO,
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Explicit column rules.
    #[inline]
    pub fn column_proportions(&self) -> &[Proportion] {
        &self.column_proportions
    }

    /// Explicit row rules.
    #[inline]
    pub fn row_proportions(&self) -> &[Proportion] {
        &self.row_proportions
    }

    pub fn set_column_proportions(&mut self, proportions: Vec<Proportion>) {
        self.column_proportions = proportions;
    }

    pub fn set_row_proportions(&mut self, proportions: Vec<Proportion>) {
        self.row_proportions = proportions;
    }

    pub fn set_default_column_proportion(&mut self, proportion: Proportion) {
        self.default_column_proportion = proportion;
    }

    pub fn set_default_row_proportion(&mut self, proportion: Proportion) {
        self.default_row_proportion = proportion;
    }

    /// Rule for column `col`, falling back to the default.
    pub fn column_proportion(&self, col: usize) -> Proportion {
        self.column_proportions
            .get(col)
            .copied()
            .unwrap_or(self.default_column_proportion)
    }

    /// Rule for row `row`, falling back to the default.
    pub fn row_proportion(&self, row: usize) -> Proportion {
        self.row_proportions
            .get(row)
            .copied()
            .unwrap_or(self.default_row_proportion)
    }

    #[inline]
    pub fn column_spacing(&self) -> f32 {
        self.column_spacing
    }

    #[inline]
    pub fn row_spacing(&self) -> f32 {
        self.row_spacing
    }

    pub fn set_column_spacing(&mut self, spacing: f32) {
        self.column_spacing = spacing.max(0.0).trunc();
    }

    pub fn set_row_spacing(&mut self, spacing: f32) {
        self.row_spacing = spacing.max(0.0).trunc();
    }

    /// Override the divisor used to share width among `Part` columns.
    pub fn set_total_columns_part(&mut self, total: Option<f32>) {
        self.total_columns_part = total;
    }

    /// Override the divisor used to share height among `Part` rows.
    pub fn set_total_rows_part(&mut self, total: Option<f32>) {
        self.total_rows_part = total;
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// Column widths from the last arrange.
    #[inline]
    pub fn column_widths(&self) -> &[f32] {
        &self.col_widths
    }

    /// Row heights from the last arrange.
    #[inline]
    pub fn row_heights(&self) -> &[f32] {
        &self.row_heights
    }

    /// Column widths from the last measure.
    #[inline]
    pub fn measured_column_widths(&self) -> &[f32] {
        &self.measure_col_widths
    }

    /// Row heights from the last measure.
    #[inline]
    pub fn measured_row_heights(&self) -> &[f32] {
        &self.measure_row_heights
    }

    /// Left edge of every column, relative to the arranged bounds.
    #[inline]
    pub fn cell_locations_x(&self) -> &[f32] {
        &self.cell_locations_x
    }

    /// Top edge of every row, relative to the arranged bounds.
    #[inline]
    pub fn cell_locations_y(&self) -> &[f32] {
        &self.cell_locations_y
    }

    /// Vertical separator positions between columns.
    #[inline]
    pub fn grid_lines_x(&self) -> &[f32] {
        &self.grid_lines_x
    }

    /// Horizontal separator positions between rows.
    #[inline]
    pub fn grid_lines_y(&self) -> &[f32] {
        &self.grid_lines_y
    }

    /// Sum of the arranged column widths and row heights, without spacing.
    #[inline]
    pub fn actual_size(&self) -> Size {
        self.actual_size
    }

    /// Cell rectangle relative to the arranged bounds, if it exists.
    pub fn cell_rect(&self, col: usize, row: usize) -> Option<Rect> {
        Some(Rect::new(
            *self.cell_locations_x.get(col)?,
            *self.cell_locations_y.get(row)?,
            *self.col_widths.get(col)?,
            *self.row_heights.get(row)?,
        ))
    }

    // =========================================================================
    // Measure
    // =========================================================================

    /// Compute the desired size of the grid.
    ///
    /// `measure_item(i, available)` measures item `i` of `items`.
    pub fn measure<F>(&mut self, available: Size, items: &[GridPlacement], mut measure_item: F) -> Size
    where
        F: FnMut(usize, Size) -> Size,
    {
        let (columns, rows) = self.counts(items);

        self.measure_col_widths.clear();
        self.measure_col_widths.resize(columns, 0.0);
        self.measure_row_heights.clear();
        self.measure_row_heights.resize(rows, 0.0);

        let mut available = available;
        available.width -= columns.saturating_sub(1) as f32 * self.column_spacing;
        available.height -= rows.saturating_sub(1) as f32 * self.row_spacing;

        for col in 0..columns {
            let p = self.column_proportion(col);
            if p.kind == ProportionType::Pixels {
                self.measure_col_widths[col] = p.value.trunc();
            }
        }
        for row in 0..rows {
            let p = self.row_proportion(row);
            if p.kind == ProportionType::Pixels {
                self.measure_row_heights[row] = p.value.trunc();
            }
        }

        // Row-major by origin cell, item order within a cell. Items past the
        // last track are not laid out.
        let mut order: Vec<usize> = (0..items.len())
            .filter(|&i| items[i].column < columns && items[i].row < rows)
            .collect();
        order.sort_by_key(|&i| (items[i].row, items[i].column));

        for index in order {
            let item = &items[index];
            let (col, row) = (item.column, item.row);
            let col_pixels = self.column_proportion(col).kind == ProportionType::Pixels;
            let row_pixels = self.row_proportion(row).kind == ProportionType::Pixels;

            let mut measured = Size::ZERO;
            if !col_pixels || !row_pixels {
                measured = measure_item(index, available);
                measured.width = measured.width.trunc();
                measured.height = measured.height.trunc();
            }

            if item.column_span != 1 {
                measured.width = 0.0;
            }
            if item.row_span != 1 {
                measured.height = 0.0;
            }

            if !col_pixels && measured.width > self.measure_col_widths[col] {
                self.measure_col_widths[col] = measured.width;
            }
            if !row_pixels && measured.height > self.measure_row_heights[row] {
                self.measure_row_heights[row] = measured.height;
            }
        }

        let col_props = self.resolved_columns(columns);
        let row_props = self.resolved_rows(rows);
        share_part_unit(&mut self.measure_col_widths, &col_props);
        share_part_unit(&mut self.measure_row_heights, &row_props);

        let result = Size::new(
            sum_with_spacing(&self.measure_col_widths, self.column_spacing),
            sum_with_spacing(&self.measure_row_heights, self.row_spacing),
        );

        trace!(
            target: targets::GRID,
            columns,
            rows,
            width = result.width,
            height = result.height,
            "grid measured"
        );

        result
    }

    fn resolved_columns(&self, count: usize) -> Vec<Proportion> {
        (0..count).map(|col| self.column_proportion(col)).collect()
    }

    fn resolved_rows(&self, count: usize) -> Vec<Proportion> {
        (0..count).map(|row| self.row_proportion(row)).collect()
    }

    fn counts(&self, items: &[GridPlacement]) -> (usize, usize) {
        let mut columns = self.column_proportions.len();
        let mut rows = self.row_proportions.len();
        for item in items {
            columns = columns.max(item.column.saturating_add(item.column_span.max(1)));
            rows = rows.max(item.row.saturating_add(item.row_span.max(1)));
        }
        (columns.min(MAX_GRID_TRACKS), rows.min(MAX_GRID_TRACKS))
    }

    // =========================================================================
    // Arrange
    // =========================================================================

    /// Size columns and rows inside `bounds` and return one rectangle per item.
    ///
    /// The grid is re-measured against `bounds.size` first. Item rectangles are
    /// in the same coordinate space as `bounds` and never extend past its right
    /// or bottom edge.
    pub fn arrange<F>(&mut self, bounds: Rect, items: &[GridPlacement], measure_item: F) -> Vec<Rect>
    where
        F: FnMut(usize, Size) -> Size,
    {
        self.measure(bounds.size, items, measure_item);

        self.col_widths.clone_from(&self.measure_col_widths);
        self.row_heights.clone_from(&self.measure_row_heights);

        let col_props = self.resolved_columns(self.col_widths.len());
        let row_props = self.resolved_rows(self.row_heights.len());
        distribute(
            &mut self.col_widths,
            &col_props,
            bounds.width(),
            self.column_spacing,
            self.total_columns_part,
        );
        distribute(
            &mut self.row_heights,
            &row_props,
            bounds.height(),
            self.row_spacing,
            self.total_rows_part,
        );

        locate(
            &self.col_widths,
            self.column_spacing,
            &mut self.cell_locations_x,
            &mut self.grid_lines_x,
        );
        locate(
            &self.row_heights,
            self.row_spacing,
            &mut self.cell_locations_y,
            &mut self.grid_lines_y,
        );
        self.actual_size = Size::new(self.col_widths.iter().sum(), self.row_heights.iter().sum());

        trace!(
            target: targets::GRID,
            widths = ?self.col_widths,
            heights = ?self.row_heights,
            "grid arranged"
        );

        items.iter().map(|item| self.item_rect(bounds, item)).collect()
    }

    fn item_rect(&self, bounds: Rect, item: &GridPlacement) -> Rect {
        let span_size = |sizes: &[f32], start: usize, span: usize, spacing: f32| {
            let end = start.saturating_add(span);
            let mut total = 0.0;
            for i in start..end.min(sizes.len()) {
                total += sizes[i];
                if i + 1 < end {
                    total += spacing;
                }
            }
            total
        };

        let width = span_size(&self.col_widths, item.column, item.column_span, self.column_spacing);
        let height = span_size(&self.row_heights, item.row, item.row_span, self.row_spacing);
        let x = bounds.left() + self.cell_locations_x.get(item.column).copied().unwrap_or(0.0);
        let y = bounds.top() + self.cell_locations_y.get(item.row).copied().unwrap_or(0.0);

        let mut rect = Rect::new(x, y, width, height);
        if rect.right() > bounds.right() {
            rect.size.width = bounds.right() - rect.left();
        }
        rect.size.width = rect.size.width.max(0.0).min(bounds.width());
        if rect.bottom() > bounds.bottom() {
            rect.size.height = bounds.bottom() - rect.top();
        }
        rect.size.height = rect.size.height.max(0.0).min(bounds.height());
        rect
    }
}

/// Force every `Part` entry to the largest `Part` size scaled by its value.
fn share_part_unit(sizes: &mut [f32], proportions: &[Proportion]) {
    let max_part = sizes
        .iter()
        .zip(proportions)
        .filter(|(_, p)| p.kind == ProportionType::Part)
        .map(|(size, _)| *size)
        .fold(0.0, f32::max);

    for (size, p) in sizes.iter_mut().zip(proportions) {
        if p.kind == ProportionType::Part {
            *size = (max_part * p.value).trunc();
        }
    }
}

fn distribute(
    sizes: &mut [f32],
    proportions: &[Proportion],
    total: f32,
    spacing: f32,
    total_part_override: Option<f32>,
) {
    let mut available = total - sizes.len().saturating_sub(1) as f32 * spacing;

    let mut total_part = 0.0;
    for (size, p) in sizes.iter().zip(proportions) {
        match p.kind {
            ProportionType::Auto | ProportionType::Pixels => available -= *size,
            ProportionType::Part | ProportionType::Fill => total_part += p.value,
        }
    }
    if let Some(total) = total_part_override {
        total_part = total;
    }

    if total_part != 0.0 {
        let mut took = 0.0;
        for (size, p) in sizes.iter_mut().zip(proportions) {
            if p.kind == ProportionType::Part {
                *size = (p.value * available / total_part).trunc();
                took += *size;
            }
        }
        available -= took;
    }

    if let Some(fill) = proportions.iter().position(|p| p.kind == ProportionType::Fill) {
        sizes[fill] = available.trunc();
    }
}

fn locate(sizes: &[f32], spacing: f32, locations: &mut Vec<f32>, lines: &mut Vec<f32>) {
    locations.clear();
    lines.clear();
    let half_spacing = (spacing / 2.0).floor();
    let mut p = 0.0;
    for (i, size) in sizes.iter().enumerate() {
        locations.push(p);
        p += size;
        if i + 1 < sizes.len() {
            lines.push(p + half_spacing);
        }
        p += spacing;
    }
}

fn sum_with_spacing(sizes: &[f32], spacing: f32) -> f32 {
    sizes.iter().sum::<f32>() + sizes.len().saturating_sub(1) as f32 * spacing
}
