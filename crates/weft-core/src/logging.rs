//! Logging facilities for weft.
//!
//! weft uses the `tracing` crate for instrumentation. To see logs, install a
//! subscriber in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("weft::desktop=debug,weft::focus=trace")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot and hook dispatch.
    pub const SIGNAL: &str = "weft::signal";
    /// Widget arena structure (create, re-parent, destroy).
    pub const TREE: &str = "weft::tree";
    /// Measure/arrange passes.
    pub const LAYOUT: &str = "weft::layout";
    /// Grid proportional sizing.
    pub const GRID: &str = "weft::grid";
    /// Desktop frame driving, modality, context menus.
    pub const DESKTOP: &str = "weft::desktop";
    /// Input polling and event dispatch.
    pub const INPUT: &str = "weft::input";
    /// Keyboard and mouse-wheel focus.
    pub const FOCUS: &str = "weft::focus";
    /// Painting and text diagnostics.
    pub const RENDER: &str = "weft::render";
    /// Platform services (clipboard).
    pub const PLATFORM: &str = "weft::platform";
}

/// Span names used for frame-level tracing.
pub mod span_names {
    /// One full desktop frame.
    pub const FRAME: &str = "weft::frame";
    /// Layout pass.
    pub const LAYOUT_PASS: &str = "weft::layout_pass";
    /// Input processing pass.
    pub const INPUT_PASS: &str = "weft::input_pass";
}
