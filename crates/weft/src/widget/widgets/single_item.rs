//! Container holding at most one child.

use weft_core::{WeftResult, WidgetId};

use crate::widget::{Widget, WidgetTree};

/// A container with a single content slot.
///
/// Adding a second child fails with `ContainerFull`; use
/// [`set_content`](SingleItemContainer::set_content) to replace it.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleItemContainer;

impl SingleItemContainer {
    pub fn new() -> Self {
        Self
    }

    /// Current content of a single-item container.
    pub fn content(tree: &WidgetTree, id: WidgetId) -> Option<WidgetId> {
        tree.children(id).first().copied()
    }

    /// Replace the content, returning the previous one (left alive, detached).
    pub fn set_content(
        tree: &mut WidgetTree,
        id: WidgetId,
        content: Option<WidgetId>,
    ) -> WeftResult<Option<WidgetId>> {
        let previous = tree.clear_children(id)?.into_iter().next();
        if let Some(content) = content {
            tree.add_child(id, content)?;
        }
        Ok(previous)
    }
}

impl Widget for SingleItemContainer {
    fn type_name(&self) -> &'static str {
        "SingleItemContainer"
    }

    fn is_container(&self) -> bool {
        true
    }

    fn child_capacity(&self) -> Option<usize> {
        Some(1)
    }
}
