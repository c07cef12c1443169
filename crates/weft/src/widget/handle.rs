//! Property setters with invalidation.
//!
//! Size-affecting properties invalidate measure (which propagates to every
//! ancestor), position-only properties invalidate arrange, z-index changes
//! mark the owner's sorted child cache dirty, and paint-only properties
//! invalidate nothing.

use glam::Vec2;
use weft_core::{WeftError, WeftResult, WidgetId};
use weft_render::Brush;

use super::base::{WidgetBase, WidgetBrushes};
use super::layout::{
    HorizontalAlignment, MAX_GRID_TRACKS, Proportion, Thickness, VerticalAlignment,
};
use super::tree::WidgetTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Invalidate {
    Nothing,
    Measure,
    Arrange,
    Order,
    /// Transforms and activity are recomputed by the next layout pass.
    Layout,
}

fn check_track(property: &'static str, value: usize, limit: usize) -> WeftResult<()> {
    if value >= limit {
        return Err(WeftError::GridOutOfRange {
            property,
            value,
            limit,
        });
    }
    Ok(())
}

/// Mutable handle to one widget's base properties.
///
/// Obtained from [`WidgetTree::widget_mut`] or
/// [`EventContext::widget_mut`](super::EventContext::widget_mut). Setters
/// return `&mut Self` for chaining; those that validate return
/// `WeftResult<&mut Self>`.
///
/// ```ignore
/// tree.widget_mut(id)?
///     .set_left(10.0)
///     .set_horizontal_alignment(HorizontalAlignment::Center)
///     .set_width(Some(120.0))?;
/// ```
pub struct WidgetMut<'a> {
    tree: &'a mut WidgetTree,
    id: WidgetId,
}

impl<'a> WidgetMut<'a> {
    pub(crate) fn new(tree: &'a mut WidgetTree, id: WidgetId) -> Self {
        Self { tree, id }
    }

    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Current base state.
    #[inline]
    pub fn base(&self) -> &WidgetBase {
        self.tree.node_base(self.id)
    }

    fn update<T: PartialEq>(
        &mut self,
        value: T,
        field: impl FnOnce(&mut WidgetBase) -> &mut T,
        effect: Invalidate,
    ) -> bool {
        let slot = field(self.tree.node_base_mut(self.id));
        if *slot == value {
            return false;
        }
        *slot = value;
        match effect {
            Invalidate::Nothing => {}
            Invalidate::Measure => self.tree.invalidate_measure(self.id),
            Invalidate::Arrange => self.tree.invalidate_arrange(self.id),
            Invalidate::Order => {
                self.tree.mark_order_dirty(self.id);
                self.tree.mark_layout_dirty();
            }
            Invalidate::Layout => self.tree.mark_layout_dirty(),
        }
        true
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.tree.node_base_mut(self.id).name = Some(name.into());
        self
    }

    // =========================================================================
    // Position
    // =========================================================================

    pub fn set_left(&mut self, left: f32) -> &mut Self {
        self.update(left, |b| &mut b.left, Invalidate::Arrange);
        self
    }

    pub fn set_top(&mut self, top: f32) -> &mut Self {
        self.update(top, |b| &mut b.top, Invalidate::Arrange);
        self
    }

    pub fn set_position(&mut self, left: f32, top: f32) -> &mut Self {
        self.set_left(left).set_top(top)
    }

    pub fn set_horizontal_alignment(&mut self, alignment: HorizontalAlignment) -> &mut Self {
        self.update(alignment, |b| &mut b.horizontal_alignment, Invalidate::Arrange);
        self
    }

    pub fn set_vertical_alignment(&mut self, alignment: VerticalAlignment) -> &mut Self {
        self.update(alignment, |b| &mut b.vertical_alignment, Invalidate::Arrange);
        self
    }

    // =========================================================================
    // Size
    // =========================================================================

    fn set_size_field(
        &mut self,
        property: &'static str,
        value: Option<f32>,
        field: impl FnOnce(&mut WidgetBase) -> &mut Option<f32>,
    ) -> WeftResult<&mut Self> {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(WeftError::InvalidValue { property, value: v });
            }
        }
        self.update(value, field, Invalidate::Measure);
        Ok(self)
    }

    /// Explicit content width, `None` to size to content.
    pub fn set_width(&mut self, width: Option<f32>) -> WeftResult<&mut Self> {
        self.set_size_field("width", width, |b| &mut b.width)
    }

    pub fn set_height(&mut self, height: Option<f32>) -> WeftResult<&mut Self> {
        self.set_size_field("height", height, |b| &mut b.height)
    }

    pub fn set_min_width(&mut self, value: Option<f32>) -> WeftResult<&mut Self> {
        self.set_size_field("min_width", value, |b| &mut b.min_width)
    }

    pub fn set_min_height(&mut self, value: Option<f32>) -> WeftResult<&mut Self> {
        self.set_size_field("min_height", value, |b| &mut b.min_height)
    }

    pub fn set_max_width(&mut self, value: Option<f32>) -> WeftResult<&mut Self> {
        self.set_size_field("max_width", value, |b| &mut b.max_width)
    }

    pub fn set_max_height(&mut self, value: Option<f32>) -> WeftResult<&mut Self> {
        self.set_size_field("max_height", value, |b| &mut b.max_height)
    }

    fn set_thickness(
        &mut self,
        property: &'static str,
        value: Thickness,
        field: impl FnOnce(&mut WidgetBase) -> &mut Thickness,
    ) -> WeftResult<&mut Self> {
        if !value.is_valid() {
            let worst = [value.left, value.top, value.right, value.bottom]
                .into_iter()
                .find(|v| !v.is_finite() || *v < 0.0)
                .unwrap_or(f32::NAN);
            return Err(WeftError::InvalidValue {
                property,
                value: worst,
            });
        }
        self.update(value, field, Invalidate::Measure);
        Ok(self)
    }

    pub fn set_margin(&mut self, margin: Thickness) -> WeftResult<&mut Self> {
        self.set_thickness("margin", margin, |b| &mut b.margin)
    }

    pub fn set_border_thickness(&mut self, thickness: Thickness) -> WeftResult<&mut Self> {
        self.set_thickness("border_thickness", thickness, |b| &mut b.border_thickness)
    }

    pub fn set_padding(&mut self, padding: Thickness) -> WeftResult<&mut Self> {
        self.set_thickness("padding", padding, |b| &mut b.padding)
    }

    // =========================================================================
    // Container Placement
    // =========================================================================

    /// Grid column, below [`MAX_GRID_TRACKS`].
    pub fn set_grid_column(&mut self, column: usize) -> WeftResult<&mut Self> {
        check_track("column", column, MAX_GRID_TRACKS)?;
        self.update(column, |b| &mut b.grid.column, Invalidate::Measure);
        Ok(self)
    }

    /// Grid row, below [`MAX_GRID_TRACKS`].
    pub fn set_grid_row(&mut self, row: usize) -> WeftResult<&mut Self> {
        check_track("row", row, MAX_GRID_TRACKS)?;
        self.update(row, |b| &mut b.grid.row, Invalidate::Measure);
        Ok(self)
    }

    /// Number of columns spanned, from 1 to [`MAX_GRID_TRACKS`].
    pub fn set_grid_column_span(&mut self, span: usize) -> WeftResult<&mut Self> {
        if span == 0 {
            return Err(WeftError::InvalidSpan { axis: "column", span });
        }
        check_track("column_span", span, MAX_GRID_TRACKS + 1)?;
        self.update(span, |b| &mut b.grid.column_span, Invalidate::Measure);
        Ok(self)
    }

    /// Number of rows spanned, from 1 to [`MAX_GRID_TRACKS`].
    pub fn set_grid_row_span(&mut self, span: usize) -> WeftResult<&mut Self> {
        if span == 0 {
            return Err(WeftError::InvalidSpan { axis: "row", span });
        }
        check_track("row_span", span, MAX_GRID_TRACKS + 1)?;
        self.update(span, |b| &mut b.grid.row_span, Invalidate::Measure);
        Ok(self)
    }

    /// Sizing rule used by a stack panel parent.
    pub fn set_stack_proportion(&mut self, proportion: Option<Proportion>) -> WeftResult<&mut Self> {
        if let Some(p) = &proportion {
            p.validate()?;
        }
        self.update(proportion, |b| &mut b.stack_proportion, Invalidate::Measure);
        Ok(self)
    }

    pub fn set_z_index(&mut self, z_index: i32) -> &mut Self {
        self.update(z_index, |b| &mut b.z_index, Invalidate::Order);
        self
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        if self.update(visible, |b| &mut b.visible, Invalidate::Measure) {
            let base = self.tree.node_base_mut(self.id);
            if !visible {
                base.clear_pointer_state();
            }
            base.visible_changed.emit(visible);
        }
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        if self.update(enabled, |b| &mut b.enabled, Invalidate::Nothing) {
            self.tree.node_base(self.id).enabled_changed.emit(enabled);
        }
        self
    }

    /// Opacity in `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f32) -> WeftResult<&mut Self> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(WeftError::InvalidValue {
                property: "opacity",
                value: opacity,
            });
        }
        self.update(opacity, |b| &mut b.opacity, Invalidate::Nothing);
        Ok(self)
    }

    pub fn set_scale(&mut self, scale: Vec2) -> &mut Self {
        self.update(scale, |b| &mut b.scale, Invalidate::Layout);
        self
    }

    /// Rotation in radians around the transform origin.
    pub fn set_rotation(&mut self, rotation: f32) -> &mut Self {
        self.update(rotation, |b| &mut b.rotation, Invalidate::Layout);
        self
    }

    pub fn set_transform_origin(&mut self, origin: Vec2) -> &mut Self {
        self.update(origin, |b| &mut b.transform_origin, Invalidate::Layout);
        self
    }

    pub fn set_clip_to_bounds(&mut self, clip: bool) -> &mut Self {
        self.update(clip, |b| &mut b.clip_to_bounds, Invalidate::Nothing);
        self
    }

    pub fn set_accepts_keyboard_focus(&mut self, accepts: bool) -> &mut Self {
        self.update(accepts, |b| &mut b.accepts_keyboard_focus, Invalidate::Nothing);
        self
    }

    /// Modal widgets deactivate every top-level widget underneath them.
    pub fn set_modal(&mut self, modal: bool) -> &mut Self {
        self.update(modal, |b| &mut b.is_modal, Invalidate::Layout);
        self
    }

    // =========================================================================
    // Brushes
    // =========================================================================

    pub fn set_background(&mut self, brush: Option<Brush>) -> &mut Self {
        self.tree.node_base_mut(self.id).brushes.background = brush;
        self
    }

    pub fn set_border(&mut self, brush: Option<Brush>) -> &mut Self {
        self.tree.node_base_mut(self.id).brushes.border = brush;
        self
    }

    /// All state brushes.
    pub fn brushes_mut(&mut self) -> &mut WidgetBrushes {
        &mut self.tree.node_base_mut(self.id).brushes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::widgets::Panel;

    #[test]
    fn test_measure_invalidation_propagates_to_ancestors() {
        let mut tree = WidgetTree::new();
        let outer = tree.create(Panel::new());
        let inner = tree.create(Panel::new());
        let leaf = tree.create(Panel::new());
        tree.add_child(outer, inner).unwrap();
        tree.add_child(inner, leaf).unwrap();
        for id in [outer, inner, leaf] {
            let base = tree.node_base_mut(id);
            base.measure_dirty = false;
            base.arrange_dirty = false;
        }

        tree.widget_mut(leaf).unwrap().set_width(Some(10.0)).unwrap();
        assert!(tree.base(outer).unwrap().is_measure_dirty());
        assert!(tree.base(inner).unwrap().is_measure_dirty());
    }

    #[test]
    fn test_position_invalidation_does_not_propagate() {
        let mut tree = WidgetTree::new();
        let outer = tree.create(Panel::new());
        let leaf = tree.create(Panel::new());
        tree.add_child(outer, leaf).unwrap();
        for id in [outer, leaf] {
            let base = tree.node_base_mut(id);
            base.measure_dirty = false;
            base.arrange_dirty = false;
        }

        tree.widget_mut(leaf).unwrap().set_left(5.0);
        assert!(tree.base(leaf).unwrap().is_arrange_dirty());
        assert!(!tree.base(leaf).unwrap().is_measure_dirty());
        assert!(!tree.base(outer).unwrap().is_arrange_dirty());
    }

    #[test]
    fn test_validation() {
        let mut tree = WidgetTree::new();
        let id = tree.create(Panel::new());
        let mut handle = tree.widget_mut(id).unwrap();
        assert_eq!(
            handle.set_grid_row_span(0).err(),
            Some(WeftError::InvalidSpan { axis: "row", span: 0 })
        );
        assert!(handle.set_grid_column(usize::MAX).is_err());
        assert!(handle.set_grid_row(MAX_GRID_TRACKS).is_err());
        assert!(handle.set_grid_column_span(MAX_GRID_TRACKS + 1).is_err());
        assert!(handle.set_grid_column(MAX_GRID_TRACKS - 1).is_ok());
        assert!(handle.set_opacity(1.5).is_err());
        assert!(handle.set_width(Some(-1.0)).is_err());
        assert!(handle.set_padding(Thickness::uniform(-2.0)).is_err());
        assert!(handle.set_stack_proportion(Some(Proportion::part(-1.0))).is_err());
        assert!(handle.set_opacity(0.25).is_ok());
        assert_eq!(handle.base().opacity(), 0.25);
    }
}
