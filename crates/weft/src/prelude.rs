//! Commonly used types.
//!
//! ```ignore
//! use weft::prelude::*;
//! ```

// ============================================================================
// Core
// ============================================================================

pub use weft_core::{
    Clock, Decision, Hook, ManualClock, Signal, SystemClock, WeftError, WeftResult, WidgetId,
};

// ============================================================================
// Rendering
// ============================================================================

pub use weft_render::{
    Brush, Color, Font, FrameStats, Point, Rect, RecordingRenderer, RenderContext, Renderer, Size,
};

// ============================================================================
// Widgets and Layout
// ============================================================================

pub use crate::widget::{
    EventContext, Grid, GridSelectionMode, HorizontalAlignment, Key, Label, LayoutContext, Menu,
    MouseWheelFocusType, Orientation, PaintContext, Panel, Proportion, ProportionType,
    ScrollViewer, StackPanel, Thickness, VerticalAlignment, Widget, WidgetMut, WidgetTree, Window,
};

// ============================================================================
// Desktop
// ============================================================================

pub use crate::config::{DesktopConfig, EventDiscipline};
pub use crate::desktop::{Desktop, InputRecorder, InputSnapshot, InputSource};
pub use crate::platform::Clipboard;
