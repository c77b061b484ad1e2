//! Error types for the render crate.

use thiserror::Error;

/// Errors that can occur while creating or drawing to a surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Invalid surface dimensions (zero width or height).
    #[error("invalid surface dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The backend refused to create another surface.
    #[error("surface backend unavailable: {0}")]
    BackendUnavailable(String),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
