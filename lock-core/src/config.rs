//! Lock configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{matrix_in_range, LockError, LockResult};

/// Default grid side length.
pub const DEFAULT_MATRIX: u32 = 3;

/// Default delay between a finished gesture and the session reset.
pub const DEFAULT_RESET_DELAY_MS: u64 = 500;

/// Default surface edge in pixels.
const DEFAULT_SURFACE: f32 = 300.0;

/// Configuration supplied when the lock is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Number of anchors per grid side.
    pub matrix: u32,
    /// Drawing surface width in pixels. Drives the anchor spacing.
    pub width: f32,
    /// Drawing surface height in pixels.
    pub height: f32,
    /// Delay before a finished gesture is cleared, in milliseconds.
    pub reset_delay_ms: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            matrix: DEFAULT_MATRIX,
            width: DEFAULT_SURFACE,
            height: DEFAULT_SURFACE,
            reset_delay_ms: DEFAULT_RESET_DELAY_MS,
        }
    }
}

impl LockConfig {
    /// Create a configuration for a surface of the given size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Set the grid side length.
    #[must_use]
    pub fn with_matrix(mut self, matrix: u32) -> Self {
        self.matrix = matrix;
        self
    }

    /// Set the surface size.
    #[must_use]
    pub fn with_surface(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the reset delay.
    #[must_use]
    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// The reset delay as a [`Duration`].
    #[must_use]
    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::InvalidMatrix`] for a matrix outside
    /// `1..=MAX_MATRIX` and
    /// [`LockError::InvalidSurface`] for a non-finite or non-positive surface.
    pub fn validate(&self) -> LockResult<()> {
        if !matrix_in_range(self.matrix) {
            return Err(LockError::InvalidMatrix(self.matrix));
        }
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(self.width) || !valid(self.height) {
            return Err(LockError::InvalidSurface {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns a serialization error for malformed JSON, or a configuration
    /// error from [`LockConfig::validate`].
    pub fn from_json(json: &str) -> LockResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_MATRIX;

    #[test]
    fn default_config_is_valid() {
        let config = LockConfig::default();
        assert_eq!(config.matrix, 3);
        assert_eq!(config.reset_delay(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_matrix_is_rejected() {
        let err = LockConfig::default().with_matrix(0).validate().unwrap_err();
        assert!(matches!(err, LockError::InvalidMatrix(0)));
    }

    #[test]
    fn oversized_matrix_is_rejected() {
        assert!(LockConfig::default().with_matrix(MAX_MATRIX).validate().is_ok());
        let err = LockConfig::default()
            .with_matrix(70_000)
            .validate()
            .unwrap_err();
        assert!(matches!(err, LockError::InvalidMatrix(70_000)));
        assert!(LockConfig::from_json(r#"{"matrix":60000}"#).is_err());
    }

    #[test]
    fn bad_surface_is_rejected() {
        for (w, h) in [(0.0, 300.0), (300.0, -1.0), (f32::NAN, 300.0), (f32::INFINITY, 1.0)] {
            let err = LockConfig::new(w, h).validate().unwrap_err();
            assert!(matches!(err, LockError::InvalidSurface { .. }), "{w}x{h}");
        }
    }

    #[test]
    fn from_json_fills_defaults() {
        let config = LockConfig::from_json(r#"{"matrix":4,"width":480.0}"#).expect("valid");
        assert_eq!(config.matrix, 4);
        assert!((config.width - 480.0).abs() < f32::EPSILON);
        assert!((config.height - 300.0).abs() < f32::EPSILON);
        assert_eq!(config.reset_delay_ms, 500);
    }

    #[test]
    fn from_json_validates() {
        assert!(LockConfig::from_json(r#"{"matrix":0}"#).is_err());
        assert!(LockConfig::from_json("not json").is_err());
    }

    #[test]
    fn builder_sets_delay() {
        let config = LockConfig::default().with_reset_delay(Duration::from_millis(120));
        assert_eq!(config.reset_delay_ms, 120);
    }
}
