//! Widget system for weft.
//!
//! This module provides the retained widget tree and its layout protocol:
//!
//! - [`WidgetTree`]: arena owning every widget node
//! - [`WidgetBase`]: properties, cached layout and pointer state of a node
//! - [`Widget`]: the behavior trait (measure, arrange, paint, input)
//! - [`WidgetMut`]: property setters that invalidate layout correctly
//!
//! # Layout
//!
//! Layout is two-pass. [`WidgetTree::measure`] returns the size a widget
//! wants for a given available size, margin included, and caches it until
//! the widget is invalidated. [`WidgetTree::arrange`] places the widget in a
//! container rectangle according to its alignment and position, then lets
//! the behavior arrange children inside the content rectangle.
//!
//! ```ignore
//! use weft::widget::*;
//!
//! let mut tree = WidgetTree::new();
//! let grid = tree.create(Grid::new());
//! let label = tree.create(Label::new("Hello"));
//! tree.add_child(grid, label)?;
//! tree.widget_mut(label)?.set_grid_column(1)?;
//!
//! tree.add_root(grid)?;
//! tree.arrange(grid, Rect::new(0.0, 0.0, 800.0, 600.0));
//! ```
//!
//! # Invalidation
//!
//! Size-affecting property changes invalidate measure on the widget and all
//! its ancestors. Position-only changes invalidate arrange on the widget
//! alone. Both mark the tree's layout dirty so the desktop runs a layout
//! pass on the next frame.

mod base;
mod events;
mod handle;
pub mod layout;
mod layout_pass;
mod painting;
mod traits;
mod tree;
pub mod widgets;


pub use base::{WidgetBase, WidgetBrushes};
pub use events::{DesktopEvent, DoubleClickTracker, Key, KeyRepeat, WidgetEvent};
pub use handle::WidgetMut;
pub use layout::{
    GridLayout, GridPlacement, HorizontalAlignment, MAX_GRID_TRACKS, Orientation, Proportion,
    ProportionType, Thickness, VerticalAlignment, align,
};
pub use traits::{
    DesktopCommand, EventContext, LayoutContext, MouseWheelFocusType, PaintContext, Widget,
};
pub use tree::{ChildAdded, ChildRemoved, Owner, WidgetTree};

pub use widgets::{
    Grid, GridSelectionMode, Label, Menu, Panel, ScrollViewer, SingleItemContainer, StackPanel,
    Window,
};
