//! The widget arena.
//!
//! Every node lives in one [`SlotMap`]. A node's parent holds the only owning
//! reference to it through its ordered child list; the parent link is a
//! plain id. Top-level widgets are held by the tree's own top-level list.
//!
//! Structural operations report contract violations as [`WeftError`] and
//! return a [`ChildAdded`] / [`ChildRemoved`] record describing what moved.

use std::any::Any;

use slotmap::SlotMap;
use tracing::{debug, trace};
use weft_core::logging::targets;
use weft_core::{WeftError, WeftResult, WidgetId};

use super::base::WidgetBase;
use super::handle::WidgetMut;
use super::traits::{LayoutContext, Widget};

/// Who owns a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    /// The desktop's top-level list.
    Desktop,
    /// A container widget.
    Widget(WidgetId),
}

/// Result of inserting a widget into a parent or the top-level list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildAdded {
    pub child: WidgetId,
    pub owner: Owner,
    pub index: usize,
    /// Where the widget was detached from, if it was placed somewhere before.
    pub previous_owner: Option<Owner>,
}

/// Result of removing a widget from its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildRemoved {
    pub child: WidgetId,
    pub owner: Owner,
    /// The index the widget had in its owner's list.
    pub index: usize,
}

/// Capabilities fixed at creation time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NodeKind {
    pub(crate) type_name: &'static str,
    pub(crate) container: bool,
    pub(crate) capacity: Option<usize>,
}

pub(crate) struct WidgetNode {
    pub(crate) base: WidgetBase,
    pub(crate) kind: NodeKind,
    /// Detached while one of its methods runs.
    pub(crate) widget: Option<Box<dyn Widget>>,
}

/// Arena of widget nodes plus the ordered top-level list.
pub struct WidgetTree {
    pub(crate) nodes: SlotMap<WidgetId, WidgetNode>,
    roots: Vec<WidgetId>,
    roots_sorted: Vec<WidgetId>,
    roots_dirty: bool,
    layout_dirty: bool,
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            roots_sorted: Vec::new(),
            roots_dirty: false,
            layout_dirty: true,
        }
    }

    // =========================================================================
    // Creation and Lookup
    // =========================================================================

    /// Create a detached widget.
    pub fn create<W: Widget>(&mut self, widget: W) -> WidgetId {
        let kind = NodeKind {
            type_name: widget.type_name(),
            container: widget.is_container(),
            capacity: widget.child_capacity(),
        };
        let id = self.nodes.insert_with_key(|id| {
            let mut base = WidgetBase::new(id);
            widget.configure(&mut base);
            WidgetNode {
                base,
                kind,
                widget: Some(Box::new(widget)),
            }
        });
        trace!(target: targets::TREE, ?id, kind = kind.type_name, "widget created");
        id
    }

    /// Destroy a widget and its whole subtree, detaching it first.
    pub fn destroy(&mut self, id: WidgetId) -> WeftResult<()> {
        self.check(id)?;
        self.detach(id);
        let subtree = self.subtree(id);
        for node in &subtree {
            self.nodes.remove(*node);
        }
        debug!(target: targets::TREE, ?id, count = subtree.len(), "subtree destroyed");
        Ok(())
    }

    /// Whether `id` resolves to a live widget.
    #[inline]
    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live widgets.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Base state of a widget.
    pub fn base(&self, id: WidgetId) -> WeftResult<&WidgetBase> {
        self.nodes
            .get(id)
            .map(|node| &node.base)
            .ok_or(WeftError::WidgetNotFound(id))
    }

    /// Property handle for a widget.
    pub fn widget_mut(&mut self, id: WidgetId) -> WeftResult<WidgetMut<'_>> {
        self.check(id)?;
        Ok(WidgetMut::new(self, id))
    }

    /// Type name of a widget's behavior.
    pub fn type_name(&self, id: WidgetId) -> Option<&'static str> {
        self.nodes.get(id).map(|node| node.kind.type_name)
    }

    /// Downcast a widget's behavior.
    pub fn behavior<W: Widget>(&self, id: WidgetId) -> Option<&W> {
        let widget = self.nodes.get(id)?.widget.as_deref()?;
        (widget as &dyn Any).downcast_ref::<W>()
    }

    /// Downcast a widget's behavior mutably.
    ///
    /// Changes made this way do not invalidate layout; call
    /// [`invalidate_measure`](Self::invalidate_measure) when they affect size.
    pub fn behavior_mut<W: Widget>(&mut self, id: WidgetId) -> Option<&mut W> {
        let widget = self.nodes.get_mut(id)?.widget.as_deref_mut()?;
        (widget as &mut dyn Any).downcast_mut::<W>()
    }

    /// Mutate a behavior and invalidate the widget's measure.
    ///
    /// ```ignore
    /// tree.update_behavior::<Label, _>(label, |l| l.set_text("Saved"))?;
    /// ```
    pub fn update_behavior<W: Widget, R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut W) -> R,
    ) -> WeftResult<R> {
        self.check(id)?;
        let behavior = self
            .behavior_mut::<W>(id)
            .ok_or(WeftError::UnexpectedType {
                id,
                expected: std::any::type_name::<W>(),
            })?;
        let result = f(behavior);
        self.invalidate_measure(id);
        Ok(result)
    }

    /// The behavior as a trait object.
    pub fn dyn_behavior(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.nodes.get(id)?.widget.as_deref()
    }

    pub(crate) fn check(&self, id: WidgetId) -> WeftResult<()> {
        if self.nodes.contains_key(id) {
            Ok(())
        } else {
            Err(WeftError::WidgetNotFound(id))
        }
    }

    /// Base of a node known to exist.
    pub(crate) fn node_base(&self, id: WidgetId) -> &WidgetBase {
        &self.nodes[id].base
    }

    pub(crate) fn node_base_mut(&mut self, id: WidgetId) -> &mut WidgetBase {
        &mut self.nodes[id].base
    }

    /// Detach a behavior, run `f` with layout access, then reattach it.
    pub(crate) fn with_layout<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut dyn Widget, &mut LayoutContext<'_>) -> R,
    ) -> Option<R> {
        let mut widget = self.take_behavior(id)?;
        let result = {
            let mut ctx = LayoutContext::new(self, id);
            f(widget.as_mut(), &mut ctx)
        };
        self.restore_behavior(id, widget);
        Some(result)
    }

    pub(crate) fn take_behavior(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        self.nodes.get_mut(id)?.widget.take()
    }

    pub(crate) fn restore_behavior(&mut self, id: WidgetId, widget: Box<dyn Widget>) {
        // The node may have been destroyed by the callback
        if let Some(node) = self.nodes.get_mut(id) {
            node.widget = Some(widget);
        }
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Append `child` to `parent`'s children.
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId) -> WeftResult<ChildAdded> {
        self.insert_child(parent, usize::MAX, child)
    }

    /// Insert `child` at `index` (clamped) in `parent`'s children.
    ///
    /// The child is detached from its previous owner first.
    pub fn insert_child(&mut self, parent: WidgetId, index: usize, child: WidgetId) -> WeftResult<ChildAdded> {
        self.check(parent)?;
        self.check(child)?;

        if parent == child || self.is_ancestor_of(child, parent) {
            return Err(WeftError::CyclicParent { parent, child });
        }

        let kind = self.nodes[parent].kind;
        if !kind.container {
            return Err(WeftError::NotAContainer(parent));
        }
        if let Some(capacity) = kind.capacity {
            let existing = self.nodes[parent]
                .base
                .children
                .iter()
                .filter(|c| **c != child)
                .count();
            if existing >= capacity {
                return Err(WeftError::ContainerFull {
                    container: parent,
                    capacity,
                });
            }
        }

        let previous_owner = self.detach(child).map(|removed| removed.owner);

        let parent_base = &mut self.nodes[parent].base;
        let index = index.min(parent_base.children.len());
        parent_base.children.insert(index, child);
        parent_base.children_dirty = true;
        let placed = parent_base.placed;

        self.nodes[child].base.parent = Some(parent);
        self.set_placed(child, placed);
        self.invalidate_measure(child);

        trace!(target: targets::TREE, ?parent, ?child, index, "child added");
        Ok(ChildAdded {
            child,
            owner: Owner::Widget(parent),
            index,
            previous_owner,
        })
    }

    /// Remove `child` from `parent`. The child stays alive, detached.
    pub fn remove_child(&mut self, parent: WidgetId, child: WidgetId) -> WeftResult<ChildRemoved> {
        self.check(parent)?;
        self.check(child)?;
        if self.nodes[child].base.parent != Some(parent) {
            return Err(WeftError::NotAChild { parent, child });
        }
        self.detach(child).ok_or(WeftError::NotAChild { parent, child })
    }

    /// Remove every child of `parent`, returning them in their former order.
    pub fn clear_children(&mut self, parent: WidgetId) -> WeftResult<Vec<WidgetId>> {
        self.check(parent)?;
        let children = self.nodes[parent].base.children.clone();
        for child in &children {
            self.detach(*child);
        }
        Ok(children)
    }

    /// Append a widget to the top-level list, detaching it from any parent.
    pub fn add_root(&mut self, id: WidgetId) -> WeftResult<ChildAdded> {
        self.check(id)?;
        let previous_owner = self.detach(id).map(|removed| removed.owner);
        self.roots.push(id);
        self.roots_dirty = true;
        self.set_placed(id, true);
        self.invalidate_measure(id);

        trace!(target: targets::TREE, ?id, "top-level widget added");
        Ok(ChildAdded {
            child: id,
            owner: Owner::Desktop,
            index: self.roots.len() - 1,
            previous_owner,
        })
    }

    /// Remove a widget from the top-level list. The widget stays alive.
    pub fn remove_root(&mut self, id: WidgetId) -> WeftResult<ChildRemoved> {
        self.check(id)?;
        if !self.roots.contains(&id) {
            return Err(WeftError::NotTopLevel(id));
        }
        self.detach(id).ok_or(WeftError::NotTopLevel(id))
    }

    /// Move a top-level widget to the end of the list.
    pub fn bring_to_front(&mut self, id: WidgetId) -> WeftResult<()> {
        let Some(index) = self.roots.iter().position(|r| *r == id) else {
            return Err(WeftError::NotTopLevel(id));
        };
        if index + 1 != self.roots.len() {
            self.roots.remove(index);
            self.roots.push(id);
            self.roots_dirty = true;
            self.layout_dirty = true;
        }
        Ok(())
    }

    /// Top-level widgets in insertion order.
    #[inline]
    pub fn roots(&self) -> &[WidgetId] {
        &self.roots
    }

    /// Top-level widgets sorted by z-index (stable), rebuilding the cache if needed.
    pub fn roots_copy(&mut self) -> Vec<WidgetId> {
        if self.roots_dirty {
            self.roots_sorted = self.sort_by_z(&self.roots);
            self.roots_dirty = false;
        }
        self.roots_sorted.clone()
    }

    /// Children in insertion order.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes
            .get(id)
            .map(|node| node.base.children.as_slice())
            .unwrap_or(&[])
    }

    /// Children sorted by z-index (stable), rebuilding the cache if needed.
    pub fn children_copy(&mut self, id: WidgetId) -> Vec<WidgetId> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        if node.base.children_dirty {
            let sorted = self.sort_by_z(&node.base.children);
            let base = &mut self.nodes[id].base;
            base.children_sorted = sorted;
            base.children_dirty = false;
        }
        self.nodes[id].base.children_sorted.clone()
    }

    /// Sorted children without touching the cache.
    pub(crate) fn sorted_children(&self, id: WidgetId) -> Vec<WidgetId> {
        match self.nodes.get(id) {
            Some(node) if node.base.children_dirty => self.sort_by_z(&node.base.children),
            Some(node) => node.base.children_sorted.clone(),
            None => Vec::new(),
        }
    }

    /// Sorted top-level widgets without touching the cache.
    pub(crate) fn sorted_roots(&self) -> Vec<WidgetId> {
        if self.roots_dirty {
            self.sort_by_z(&self.roots)
        } else {
            self.roots_sorted.clone()
        }
    }

    fn sort_by_z(&self, ids: &[WidgetId]) -> Vec<WidgetId> {
        let mut sorted = ids.to_vec();
        sorted.sort_by_key(|id| self.nodes.get(*id).map_or(0, |node| node.base.z_index));
        sorted
    }

    pub(crate) fn mark_order_dirty(&mut self, id: WidgetId) {
        match self.nodes.get(id).and_then(|node| node.base.parent) {
            Some(parent) => self.nodes[parent].base.children_dirty = true,
            None if self.roots.contains(&id) => self.roots_dirty = true,
            None => {}
        }
    }

    #[inline]
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id).and_then(|node| node.base.parent)
    }

    /// Whether the widget's root ancestor is in the top-level list.
    #[inline]
    pub fn is_placed(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.base.placed)
    }

    /// Whether `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor_of(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// The top-most ancestor of `id` (itself if it has no parent).
    pub fn root_of(&self, id: WidgetId) -> WidgetId {
        let mut current = id;
        while let Some(p) = self.parent(current) {
            current = p;
        }
        current
    }

    /// `id` and all its descendants, depth-first, children in insertion order.
    pub fn subtree(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            result.push(current);
            stack.extend(node.base.children.iter().rev());
        }
        result
    }

    /// Every placed widget, depth-first over the top-level list.
    pub fn placed_depth_first(&self) -> Vec<WidgetId> {
        self.roots.iter().flat_map(|root| self.subtree(*root)).collect()
    }

    /// Whether the widget and all its ancestors are visible.
    pub fn is_visible_in_tree(&self, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            match self.nodes.get(c) {
                Some(node) if node.base.visible => current = node.base.parent,
                _ => return false,
            }
        }
        true
    }

    fn detach(&mut self, id: WidgetId) -> Option<ChildRemoved> {
        let removed = match self.nodes.get(id)?.base.parent {
            Some(parent) => {
                let parent_base = &mut self.nodes[parent].base;
                let index = parent_base.children.iter().position(|c| *c == id)?;
                parent_base.children.remove(index);
                parent_base.children_dirty = true;
                self.nodes[id].base.parent = None;
                self.invalidate_measure(parent);
                ChildRemoved {
                    child: id,
                    owner: Owner::Widget(parent),
                    index,
                }
            }
            None => {
                let index = self.roots.iter().position(|r| *r == id)?;
                self.roots.remove(index);
                self.roots_dirty = true;
                self.layout_dirty = true;
                ChildRemoved {
                    child: id,
                    owner: Owner::Desktop,
                    index,
                }
            }
        };
        self.set_placed(id, false);
        trace!(target: targets::TREE, ?id, owner = ?removed.owner, "widget detached");
        Some(removed)
    }

    fn set_placed(&mut self, id: WidgetId, placed: bool) {
        for node_id in self.subtree(id) {
            let base = &mut self.nodes[node_id].base;
            if base.placed == placed {
                continue;
            }
            base.placed = placed;
            if !placed {
                base.clear_pointer_state();
            }
            base.placed_changed.emit(placed);
        }
    }

    // =========================================================================
    // Invalidation
    // =========================================================================

    /// Mark `id` and all its ancestors for re-measure.
    pub fn invalidate_measure(&mut self, id: WidgetId) {
        let mut current = Some(id);
        while let Some(c) = current {
            let Some(node) = self.nodes.get_mut(c) else {
                break;
            };
            node.base.measure_dirty = true;
            node.base.arrange_dirty = true;
            current = node.base.parent;
        }
        self.layout_dirty = true;
    }

    /// Mark `id` for re-arrange without touching its ancestors.
    pub fn invalidate_arrange(&mut self, id: WidgetId) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.base.arrange_dirty = true;
        }
        self.layout_dirty = true;
    }

    /// Whether a layout pass is pending.
    #[inline]
    pub fn is_layout_dirty(&self) -> bool {
        self.layout_dirty
    }

    pub(crate) fn mark_layout_dirty(&mut self) {
        self.layout_dirty = true;
    }

    pub(crate) fn clear_layout_dirty(&mut self) {
        self.layout_dirty = false;
    }
}

impl std::fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetTree")
            .field("nodes", &self.nodes.len())
            .field("roots", &self.roots)
            .field("layout_dirty", &self.layout_dirty)
            .finish()
    }
}
