//! Error types for the render crate.

use thiserror::Error;

/// Errors that can occur while preparing draw content.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Rich-text markup could not be parsed.
    #[error("malformed markup at byte {offset}: {message}")]
    Markup { offset: usize, message: String },

    /// A markup color command named a color that does not exist.
    #[error("unknown color '{name}' at byte {offset}")]
    UnknownColor { offset: usize, name: String },
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
