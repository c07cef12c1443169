//! The measure and arrange passes.
//!
//! `measure` is memoized on the available size until the widget is
//! invalidated. `arrange` is skipped when the container rectangle did not
//! change and nothing was invalidated, but still descends so children with a
//! pending arrange are positioned.

use tracing::trace;
use weft_core::WidgetId;
use weft_core::logging::targets;
use weft_render::{Rect, Size, Transform2D};

use super::layout::{HorizontalAlignment, VerticalAlignment, align};
use super::tree::WidgetTree;

/// Available content space on one axis.
fn inner_available(available: f32, mbp: f32, explicit: Option<f32>, max: Option<f32>) -> f32 {
    let value = explicit.unwrap_or_else(|| (available - mbp).max(0.0));
    match max {
        Some(max) => value.min(max),
        None => value,
    }
}

/// Resolve a measured content size against the explicit size and limits.
///
/// The minimum wins when it exceeds the maximum.
fn resolve_axis(measured: f32, explicit: Option<f32>, min: Option<f32>, max: Option<f32>) -> f32 {
    if let Some(explicit) = explicit {
        return explicit;
    }
    let mut value = measured;
    if let Some(max) = max {
        value = value.min(max);
    }
    if let Some(min) = min {
        value = value.max(min);
    }
    value
}

impl WidgetTree {
    /// Desired size of a widget for `available` space, margin included.
    ///
    /// Returns the cached result when `available` matches the previous call
    /// and the widget was not invalidated since.
    pub fn measure(&mut self, id: WidgetId, available: Size) -> Size {
        let Some(node) = self.nodes.get(id) else {
            return Size::ZERO;
        };
        let base = &node.base;
        if !base.measure_dirty && base.last_measure_available == Some(available) {
            return base.last_measure_size;
        }

        let mbp = base.mbp();
        let (width, height) = (base.width, base.height);
        let (min_width, min_height) = (base.min_width, base.min_height);
        let (max_width, max_height) = (base.max_width, base.max_height);

        let inner = match (width, height) {
            (Some(w), Some(h)) => Size::new(w, h),
            _ => {
                let inner_available = Size::new(
                    inner_available(available.width, mbp.width(), width, max_width),
                    inner_available(available.height, mbp.height(), height, max_height),
                );
                let measured = self
                    .with_layout(id, |widget, ctx| widget.measure(ctx, inner_available))
                    .unwrap_or(Size::ZERO);
                Size::new(
                    resolve_axis(measured.width, width, min_width, max_width),
                    resolve_axis(measured.height, height, min_height, max_height),
                )
            }
        };

        let result = Size::new(inner.width + mbp.width(), inner.height + mbp.height()).non_negative();

        let base = self.node_base_mut(id);
        base.last_measure_available = Some(available);
        base.last_measure_size = result;
        base.measure_dirty = false;

        trace!(target: targets::LAYOUT, ?id, ?available, ?result, "measured");
        result
    }

    /// Position a widget inside `container` and arrange its content.
    pub fn arrange(&mut self, id: WidgetId, container: Rect) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let base = &node.base;

        if !base.arrange_dirty && base.container_bounds == Some(container) {
            let children = base.children.clone();
            for child in children {
                let child_base = self.node_base(child);
                if !child_base.visible {
                    continue;
                }
                if let Some(bounds) = child_base.container_bounds {
                    self.arrange(child, bounds);
                }
            }
            return;
        }

        let horizontal = base.horizontal_alignment;
        let vertical = base.vertical_alignment;
        let (left, top) = (base.left, base.top);
        let mbp = base.mbp();
        let (width, height) = (base.width, base.height);

        let mut size = if horizontal != HorizontalAlignment::Stretch
            || vertical != VerticalAlignment::Stretch
        {
            self.measure(id, container.size)
        } else {
            container.size
        };
        size.width = size.width.min(container.width());
        size.height = size.height.min(container.height());

        // An explicit size narrower than the container wins over Stretch
        let mut slot = container.size;
        if horizontal == HorizontalAlignment::Stretch {
            if let Some(w) = width {
                let total = w + mbp.width();
                if total < slot.width {
                    slot.width = total;
                }
            }
        }
        if vertical == VerticalAlignment::Stretch {
            if let Some(h) = height {
                let total = h + mbp.height();
                if total < slot.height {
                    slot.height = total;
                }
            }
        }

        let bounds = align(slot, size, horizontal, vertical)
            .offset(container.left() + left, container.top() + top);
        let actual = mbp.deflate(bounds);

        let base = self.node_base_mut(id);
        base.bounds = bounds;
        base.actual_bounds = actual;
        base.container_bounds = Some(container);
        base.arrange_dirty = false;

        self.with_layout(id, |widget, ctx| widget.arrange(ctx, actual));

        trace!(target: targets::LAYOUT, ?id, ?bounds, "arranged");
        if let Some(node) = self.nodes.get(id) {
            node.base.arrange_updated.emit(bounds);
        }
    }

    /// Recompute every placed widget's global transform.
    ///
    /// A widget's transform is its parent's composed with its own scale and
    /// rotation around the transform origin, so it must run after arrange.
    pub(crate) fn update_transforms(&mut self) {
        let mut stack: Vec<(WidgetId, Transform2D)> = self
            .roots()
            .iter()
            .map(|root| (*root, Transform2D::IDENTITY))
            .collect();

        while let Some((id, parent)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            let local = node.base.local_transform();
            let global = if local.is_identity() {
                parent
            } else {
                parent.then(&local)
            };
            node.base.transform = global;
            stack.extend(node.base.children.iter().map(|child| (*child, global)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::layout::Thickness;
    use crate::widget::widgets::Panel;
    use weft_render::Point;

    #[test]
    fn test_resolve_axis_min_wins_over_max() {
        assert_eq!(resolve_axis(50.0, None, Some(30.0), Some(20.0)), 30.0);
        assert_eq!(resolve_axis(50.0, None, None, Some(20.0)), 20.0);
        assert_eq!(resolve_axis(50.0, Some(10.0), Some(30.0), None), 10.0);
    }

    #[test]
    fn test_measure_adds_insets_and_memoizes() {
        let mut tree = WidgetTree::new();
        let id = tree.create(Panel::new());
        tree.widget_mut(id)
            .unwrap()
            .set_width(Some(40.0))
            .unwrap()
            .set_height(Some(10.0))
            .unwrap()
            .set_margin(Thickness::uniform(2.0))
            .unwrap()
            .set_padding(Thickness::new(1.0, 0.0, 1.0, 0.0))
            .unwrap();

        let available = Size::new(100.0, 100.0);
        let first = tree.measure(id, available);
        assert_eq!(first, Size::new(46.0, 14.0));
        assert!(!tree.base(id).unwrap().is_measure_dirty());
        assert_eq!(tree.measure(id, available), first);
    }

    #[test]
    fn test_arrange_stretch_fills_container() {
        let mut tree = WidgetTree::new();
        let id = tree.create(Panel::new());
        tree.widget_mut(id)
            .unwrap()
            .set_horizontal_alignment(HorizontalAlignment::Stretch)
            .set_vertical_alignment(VerticalAlignment::Stretch);

        let container = Rect::new(10.0, 20.0, 300.0, 200.0);
        tree.arrange(id, container);
        assert_eq!(tree.base(id).unwrap().bounds(), container);
    }

    #[test]
    fn test_arrange_explicit_width_beats_stretch() {
        let mut tree = WidgetTree::new();
        let id = tree.create(Panel::new());
        tree.widget_mut(id)
            .unwrap()
            .set_horizontal_alignment(HorizontalAlignment::Stretch)
            .set_vertical_alignment(VerticalAlignment::Stretch)
            .set_width(Some(50.0))
            .unwrap();

        tree.arrange(id, Rect::new(0.0, 0.0, 300.0, 200.0));
        assert_eq!(tree.base(id).unwrap().bounds(), Rect::new(0.0, 0.0, 50.0, 200.0));
    }

    #[test]
    fn test_arrange_centers_and_offsets() {
        let mut tree = WidgetTree::new();
        let id = tree.create(Panel::new());
        tree.widget_mut(id)
            .unwrap()
            .set_horizontal_alignment(HorizontalAlignment::Center)
            .set_vertical_alignment(VerticalAlignment::Bottom)
            .set_left(5.0)
            .set_width(Some(20.0))
            .unwrap()
            .set_height(Some(10.0))
            .unwrap();

        tree.arrange(id, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(tree.base(id).unwrap().bounds(), Rect::new(45.0, 40.0, 20.0, 10.0));
    }

    #[test]
    fn test_transforms_compose_with_parent() {
        let mut tree = WidgetTree::new();
        let outer = tree.create(Panel::new());
        let inner = tree.create(Panel::new());
        tree.add_child(outer, inner).unwrap();
        tree.add_root(outer).unwrap();
        tree.widget_mut(outer)
            .unwrap()
            .set_width(Some(100.0))
            .unwrap()
            .set_height(Some(100.0))
            .unwrap()
            .set_scale(glam::Vec2::splat(2.0));

        tree.arrange(outer, Rect::new(0.0, 0.0, 400.0, 400.0));
        tree.update_transforms();

        let t = tree.base(inner).unwrap().transform();
        // Scaled 2x around (50, 50)
        assert_eq!(t.transform_point(Point::new(50.0, 50.0)), Point::new(50.0, 50.0));
        assert_eq!(t.transform_point(Point::new(60.0, 50.0)), Point::new(70.0, 50.0));
    }
}
