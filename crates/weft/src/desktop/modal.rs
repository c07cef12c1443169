//! Modal stacking.

use tracing::trace;
use weft_core::logging::targets;

use super::Desktop;

impl Desktop {
    /// Recompute `active` flags for every placed widget.
    ///
    /// Every top-level widget below the topmost visible modal one is inactive
    /// together with its whole subtree.
    pub(super) fn update_active(&mut self) {
        let roots = self.tree.sorted_roots();
        let modal = roots.iter().rposition(|id| {
            let base = self.tree.node_base(*id);
            base.visible && base.is_modal
        });

        for (index, root) in roots.iter().enumerate() {
            let active = modal.is_none_or(|m| index >= m);
            for id in self.tree.subtree(*root) {
                self.tree.node_base_mut(id).active = active;
            }
        }
        trace!(target: targets::DESKTOP, modal = ?modal.map(|m| roots[m]), "active flags updated");
    }

    /// Whether a visible modal widget is on the desktop.
    pub fn has_modal_widget(&self) -> bool {
        self.tree.roots().iter().any(|id| {
            let base = self.tree.node_base(*id);
            base.visible && base.is_modal
        })
    }
}
