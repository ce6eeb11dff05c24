//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The drawing surface is unavailable or has an unusable size.
    #[error("Surface error: {0}")]
    Surface(String),

    /// A drawing primitive failed on the backend.
    #[error("Draw call failed: {0}")]
    Draw(String),
}
