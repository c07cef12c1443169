//! weft - a retained-mode widget toolkit.
//!
//! This is the umbrella crate. It owns the widget tree, the layout engine
//! and the [`Desktop`](desktop::Desktop) input router, and re-exports the
//! signal, id and error types of `weft-core` and the drawing types of
//! `weft-render`.
//!
//! # Example
//!
//! ```ignore
//! use weft::prelude::*;
//!
//! let input = InputRecorder::new();
//! let mut desktop = Desktop::new(Box::new(input.clone()), Box::new(SystemClock::new()));
//! desktop.set_bounds(Rect::new(0.0, 0.0, 800.0, 600.0));
//!
//! let grid = desktop.tree_mut().create(Grid::new());
//! let label = desktop.tree_mut().create(Label::new("/c[red]Hello"));
//! desktop.tree_mut().add_child(grid, label)?;
//! desktop.add_widget(grid)?;
//!
//! let mut renderer = RecordingRenderer::new();
//! desktop.render(&mut renderer);
//! ```

pub use weft_core::*;

/// Geometry, draw sink and text.
pub mod render {
    pub use weft_render::*;
}

pub mod config;
pub mod desktop;
pub mod platform;
pub mod prelude;
pub mod widget;

pub use config::{ConfigError, ConfigResult, DesktopConfig, EventDiscipline};
pub use desktop::Desktop;
