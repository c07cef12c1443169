//! Widgets built on the core protocol.
//!
//! - [`Panel`]: stacks children in the content rectangle
//! - [`Grid`]: proportional column/row layout with optional selection
//! - [`StackPanel`]: one column or row per child
//! - [`SingleItemContainer`]: holds at most one child
//! - [`Window`]: top-level container closed by a key
//! - [`Menu`]: item list; horizontal menus serve as the menu bar
//! - [`Label`]: rich-text display
//! - [`ScrollViewer`]: scrolls its content with the mouse wheel

mod grid;
mod label;
mod menu;
mod panel;
mod scroll_viewer;
mod single_item;
mod stack_panel;
mod window;

pub use grid::{Grid, GridSelectionMode};
pub use label::Label;
pub use menu::Menu;
pub use panel::Panel;
pub use scroll_viewer::ScrollViewer;
pub use single_item::SingleItemContainer;
pub use stack_panel::StackPanel;
pub use window::Window;
