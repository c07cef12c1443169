//! Widget rendering.
//!
//! Each widget paints in its composed transform: background, the four border
//! edges, then its own content (children included). State selects which
//! brush is used.

use weft_core::WidgetId;
use weft_render::{Brush, Color, Rect, RenderContext};

use super::base::WidgetBase;
use super::traits::PaintContext;
use super::tree::WidgetTree;

/// The background brush for the widget's current state.
///
/// A disabled brush wins, then a focused one. Hover picks the over brush, or
/// the disabled-over brush on a disabled widget with no disabled brush; both
/// require an over brush to be set. Anything else falls back to the plain
/// background.
pub(crate) fn current_background(base: &WidgetBase) -> Option<&Brush> {
    let brushes = &base.brushes;
    let state = if !base.enabled && brushes.disabled_background.is_some() {
        brushes.disabled_background.as_ref()
    } else if base.enabled && base.keyboard_focused && brushes.focused_background.is_some() {
        brushes.focused_background.as_ref()
    } else if base.mouse_inside && brushes.over_background.is_some() {
        if base.enabled {
            brushes.over_background.as_ref()
        } else {
            brushes.disabled_over_background.as_ref()
        }
    } else {
        None
    };
    state.or(brushes.background.as_ref())
}

/// The border brush for the widget's current state.
pub(crate) fn current_border(base: &WidgetBase) -> Option<&Brush> {
    let brushes = &base.brushes;
    let state = if !base.enabled {
        brushes.disabled_border.as_ref()
    } else if base.keyboard_focused && brushes.focused_border.is_some() {
        brushes.focused_border.as_ref()
    } else if base.mouse_inside {
        brushes.over_border.as_ref()
    } else {
        None
    };
    state.or(brushes.border.as_ref())
}

fn border_edges(bounds: Rect, base: &WidgetBase) -> [Rect; 4] {
    let t = base.border_thickness;
    [
        Rect::new(bounds.left(), bounds.top(), t.left, bounds.height()),
        Rect::new(bounds.left(), bounds.top(), bounds.width(), t.top),
        Rect::new(bounds.right() - t.right, bounds.top(), t.right, bounds.height()),
        Rect::new(bounds.left(), bounds.bottom() - t.bottom, bounds.width(), t.bottom),
    ]
}

impl WidgetTree {
    /// Render a widget and, through its paint method, its children.
    ///
    /// Invisible widgets draw nothing. A widget that clips to its bounds and
    /// whose clip leaves nothing visible is skipped with its whole subtree.
    pub fn render_widget(&self, id: WidgetId, render: &mut RenderContext<'_>) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let base = &node.base;
        if !base.visible {
            return;
        }

        render.save();
        render.set_transform(base.transform);

        // A scissor cannot follow a rotated box, so rotated widgets and their
        // descendants paint unclipped.
        if base.clip_to_bounds
            && base.transform.is_axis_aligned()
            && !render.clip_rect(base.bounds)
        {
            render.restore();
            return;
        }

        render.multiply_opacity(base.opacity);

        let background_bounds = base.background_bounds();
        if let Some(brush) = current_background(base) {
            render.draw_brush(brush, background_bounds, Color::WHITE);
        }

        if let Some(brush) = current_border(base) {
            for edge in border_edges(background_bounds, base) {
                if !edge.is_empty() {
                    render.draw_brush(brush, edge, Color::WHITE);
                }
            }
        }

        if let Some(widget) = node.widget.as_deref() {
            let mut ctx = PaintContext::new(self, id, render);
            widget.paint(&mut ctx);
        }

        render.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::layout::Thickness;
    use crate::widget::widgets::Panel;
    use weft_render::{DrawCommand, RecordingRenderer, Renderer, Size};

    fn red() -> Brush {
        Brush::solid(Color::RED)
    }

    #[test]
    fn test_background_precedence() {
        let mut tree = WidgetTree::new();
        let id = tree.create(Panel::new());
        {
            let mut widget = tree.widget_mut(id).unwrap();
            let brushes = widget.brushes_mut();
            brushes.background = Some(Brush::solid(Color::WHITE));
            brushes.over_background = Some(red());
            brushes.disabled_background = Some(Brush::solid(Color::GRAY));
        }

        let base = tree.node_base_mut(id);
        assert_eq!(current_background(base), Some(&Brush::solid(Color::WHITE)));

        base.mouse_inside = true;
        assert_eq!(current_background(base), Some(&red()));

        // Focus without a focused brush falls through to hover
        base.keyboard_focused = true;
        assert_eq!(current_background(base), Some(&red()));

        // Disabled and hovered without a disabled-over brush
        base.enabled = false;
        assert_eq!(current_background(base), Some(&Brush::solid(Color::GRAY)));
    }

    #[test]
    fn test_disabled_over_background() {
        let mut tree = WidgetTree::new();
        let id = tree.create(Panel::new());
        let white = Brush::solid(Color::WHITE);
        let gray = Brush::solid(Color::GRAY);
        let blue = Brush::solid(Color::BLUE);
        {
            let mut widget = tree.widget_mut(id).unwrap();
            let brushes = widget.brushes_mut();
            brushes.background = Some(white);
            brushes.over_background = Some(red());
            brushes.disabled_background = Some(gray);
            brushes.disabled_over_background = Some(blue);
        }

        let base = tree.node_base_mut(id);
        base.enabled = false;
        base.mouse_inside = true;
        // The disabled brush wins over hover
        assert_eq!(current_background(base), Some(&gray));

        base.brushes.disabled_background = None;
        assert_eq!(current_background(base), Some(&blue));

        base.mouse_inside = false;
        assert_eq!(current_background(base), Some(&white));

        // Disabled-over needs an over brush too
        base.mouse_inside = true;
        base.brushes.over_background = None;
        assert_eq!(current_background(base), Some(&white));
    }

    #[test]
    fn test_render_draws_background_and_borders() {
        let mut tree = WidgetTree::new();
        let id = tree.create(Panel::new());
        tree.add_root(id).unwrap();
        tree.widget_mut(id)
            .unwrap()
            .set_width(Some(20.0))
            .unwrap()
            .set_height(Some(10.0))
            .unwrap()
            .set_border_thickness(Thickness::uniform(1.0))
            .unwrap()
            .set_background(Some(Brush::solid(Color::BLUE)))
            .set_border(Some(red()));
        tree.arrange(id, Rect::new(0.0, 0.0, 100.0, 100.0));

        let mut renderer = RecordingRenderer::new();
        renderer.begin_frame(Color::TRANSPARENT, Size::new(100.0, 100.0));
        {
            let mut ctx = RenderContext::new(&mut renderer);
            tree.render_widget(id, &mut ctx);
        }
        renderer.end_frame();

        let fills = renderer.filled_rects();
        assert_eq!(fills.len(), 5);
        assert_eq!(fills[0], (Rect::new(0.0, 0.0, 22.0, 12.0), Color::BLUE));
        assert_eq!(fills[3], (Rect::new(21.0, 0.0, 1.0, 12.0), Color::RED));
    }

    #[test]
    fn test_invisible_and_clipped_widgets_draw_nothing() {
        let mut tree = WidgetTree::new();
        let clipped = tree.create(Panel::new());
        let hidden = tree.create(Panel::new());
        for id in [clipped, hidden] {
            tree.add_root(id).unwrap();
            tree.widget_mut(id).unwrap().set_background(Some(red()));
        }
        // Zero-sized bounds leave an empty clip
        tree.widget_mut(clipped).unwrap().set_clip_to_bounds(true);
        tree.widget_mut(hidden)
            .unwrap()
            .set_width(Some(10.0))
            .unwrap()
            .set_height(Some(10.0))
            .unwrap()
            .set_visible(false);
        for id in [clipped, hidden] {
            tree.arrange(id, Rect::new(0.0, 0.0, 100.0, 100.0));
        }

        let mut renderer = RecordingRenderer::new();
        {
            let mut ctx = RenderContext::new(&mut renderer);
            tree.render_widget(clipped, &mut ctx);
            tree.render_widget(hidden, &mut ctx);
        }
        assert!(
            renderer
                .draws()
                .iter()
                .all(|d| !matches!(d.command, DrawCommand::FillRect { .. }))
        );
    }

    #[test]
    fn test_clip_is_skipped_under_rotated_parent() {
        let mut tree = WidgetTree::new();
        let parent = tree.create(Panel::new());
        let child = tree.create(Panel::new());
        tree.add_root(parent).unwrap();
        tree.add_child(parent, child).unwrap();
        tree.widget_mut(parent)
            .unwrap()
            .set_width(Some(200.0))
            .unwrap()
            .set_height(Some(200.0))
            .unwrap()
            .set_rotation(0.5);
        tree.widget_mut(child)
            .unwrap()
            .set_width(Some(100.0))
            .unwrap()
            .set_height(Some(100.0))
            .unwrap()
            .set_clip_to_bounds(true)
            .set_background(Some(red()));
        tree.measure(parent, Size::new(800.0, 600.0));
        tree.arrange(parent, Rect::new(0.0, 0.0, 800.0, 600.0));
        tree.update_transforms();
        assert!(!tree.base(child).unwrap().transform().is_axis_aligned());

        let mut renderer = RecordingRenderer::new();
        {
            let mut ctx = RenderContext::new(&mut renderer);
            tree.render_widget(parent, &mut ctx);
        }
        let fills: Vec<_> = renderer
            .draws()
            .iter()
            .filter(|d| matches!(d.command, DrawCommand::FillRect { .. }))
            .collect();
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].scissor, None);
    }

    #[test]
    fn test_clip_applies_without_rotation() {
        let mut tree = WidgetTree::new();
        let id = tree.create(Panel::new());
        tree.add_root(id).unwrap();
        tree.widget_mut(id)
            .unwrap()
            .set_width(Some(40.0))
            .unwrap()
            .set_height(Some(30.0))
            .unwrap()
            .set_clip_to_bounds(true)
            .set_background(Some(red()));
        tree.measure(id, Size::new(100.0, 100.0));
        tree.arrange(id, Rect::new(0.0, 0.0, 100.0, 100.0));
        tree.update_transforms();

        let mut renderer = RecordingRenderer::new();
        {
            let mut ctx = RenderContext::new(&mut renderer);
            tree.render_widget(id, &mut ctx);
        }
        assert_eq!(renderer.draws()[0].scissor, Some(Rect::new(0.0, 0.0, 40.0, 30.0)));
    }
}
