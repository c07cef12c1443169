//! Widget identity.

use slotmap::new_key_type;

new_key_type! {
    /// Identifies a widget node inside a widget arena.
    ///
    /// Ids are generational: once a widget is destroyed its id never resolves
    /// again, even if the slot is reused. Parent links, focus holders and the
    /// top-level list all store `WidgetId`s rather than references.
    pub struct WidgetId;
}
