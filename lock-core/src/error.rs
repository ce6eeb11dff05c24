//! Error types for gesture-lock operations.

use thiserror::Error;

/// Result type for gesture-lock operations.
pub type LockResult<T> = Result<T, LockError>;

/// Errors that can occur while configuring or driving the lock.
#[derive(Debug, Error)]
pub enum LockError {
    /// The grid side length must be between 1 and [`MAX_MATRIX`](crate::MAX_MATRIX).
    #[error("Invalid matrix size: {0}")]
    InvalidMatrix(u32),

    /// The drawing surface must have a finite, positive size.
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSurface {
        /// Surface width in pixels.
        width: f32,
        /// Surface height in pixels.
        height: f32,
    },

    /// A required initialization parameter was not supplied.
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// A gesture finished without selecting any anchor.
    #[error("Gesture selected no points")]
    EmptySequence,

    /// A stored pattern belongs to a different grid size.
    #[error("Stored pattern was enrolled on a {enrolled}x{enrolled} grid, cannot switch to {requested}x{requested}")]
    PatternBound {
        /// Matrix the stored pattern was enrolled on.
        enrolled: u32,
        /// Matrix that was requested.
        requested: u32,
    },

    /// The persistence collaborator failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    /// Configuration or script (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LockError {
    /// Whether this error aborts initialization.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidMatrix(_) | Self::InvalidSurface { .. } | Self::MissingParameter(_)
        )
    }
}

/// Errors raised by [`PatternStore`](crate::PatternStore) implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage cannot be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The persisted record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
