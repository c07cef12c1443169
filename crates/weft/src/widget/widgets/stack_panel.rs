//! Linear layout driven by the grid engine.

use weft_core::{WeftResult, WidgetId};
use weft_render::{Rect, Size};

use crate::widget::layout::{GridLayout, GridPlacement, Orientation, Proportion};
use crate::widget::{LayoutContext, Widget};

/// Lays out visible children one after another.
///
/// Child *i* occupies column *i* (horizontal) or row *i* (vertical). The
/// child's stack proportion sizes that column or row, falling back to the
/// panel's default proportion (`Auto`).
#[derive(Debug, Clone)]
pub struct StackPanel {
    orientation: Orientation,
    default_proportion: Proportion,
    layout: GridLayout,
}

impl StackPanel {
    pub fn new(orientation: Orientation) -> Self {
        let mut layout = GridLayout::default();
        match orientation {
            Orientation::Horizontal => {
                layout.set_default_column_proportion(Proportion::STACK_PANEL_DEFAULT)
            }
            Orientation::Vertical => layout.set_default_row_proportion(Proportion::STACK_PANEL_DEFAULT),
        }
        Self {
            orientation,
            default_proportion: Proportion::STACK_PANEL_DEFAULT,
            layout,
        }
    }

    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Gap between consecutive children.
    pub fn spacing(&self) -> f32 {
        match self.orientation {
            Orientation::Horizontal => self.layout.column_spacing(),
            Orientation::Vertical => self.layout.row_spacing(),
        }
    }

    pub fn set_spacing(&mut self, spacing: f32) {
        match self.orientation {
            Orientation::Horizontal => self.layout.set_column_spacing(spacing),
            Orientation::Vertical => self.layout.set_row_spacing(spacing),
        }
    }

    #[inline]
    pub fn default_proportion(&self) -> Proportion {
        self.default_proportion
    }

    pub fn set_default_proportion(&mut self, proportion: Proportion) -> WeftResult<()> {
        proportion.validate()?;
        self.default_proportion = proportion;
        Ok(())
    }

    /// The underlying engine, with the sizes of the last arrange.
    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Assign one column (row) per visible child.
    fn prepare(&mut self, ctx: &LayoutContext<'_>) -> (Vec<WidgetId>, Vec<GridPlacement>) {
        let children = ctx.visible_children();
        let proportions: Vec<Proportion> = children
            .iter()
            .map(|c| {
                ctx.tree()
                    .node_base(*c)
                    .stack_proportion()
                    .unwrap_or(self.default_proportion)
            })
            .collect();

        let placements = (0..children.len())
            .map(|i| match self.orientation {
                Orientation::Horizontal => GridPlacement::at(i, 0),
                Orientation::Vertical => GridPlacement::at(0, i),
            })
            .collect();

        match self.orientation {
            Orientation::Horizontal => self.layout.set_column_proportions(proportions),
            Orientation::Vertical => self.layout.set_row_proportions(proportions),
        }
        (children, placements)
    }
}

impl Default for StackPanel {
    fn default() -> Self {
        Self::vertical()
    }
}

impl Widget for StackPanel {
    fn type_name(&self) -> &'static str {
        "StackPanel"
    }

    fn is_container(&self) -> bool {
        true
    }

    fn is_pass_through(&self) -> bool {
        true
    }

    fn measure(&mut self, ctx: &mut LayoutContext<'_>, available: Size) -> Size {
        let (children, placements) = self.prepare(ctx);
        self.layout
            .measure(available, &placements, |i, size| ctx.measure_child(children[i], size))
    }

    fn arrange(&mut self, ctx: &mut LayoutContext<'_>, bounds: Rect) {
        let (children, placements) = self.prepare(ctx);
        let rects = self
            .layout
            .arrange(bounds, &placements, |i, size| ctx.measure_child(children[i], size));
        for (child, rect) in children.into_iter().zip(rects) {
            ctx.arrange_child(child, rect);
        }
    }
}
