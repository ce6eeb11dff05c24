//! Colours and stroke widths.

use serde::{Deserialize, Serialize};

/// Visual style of the lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockStyle {
    /// Ring, trail and dot colour.
    pub ring_color: String,
    /// Highlight for saved or unlocked gestures.
    pub success_color: String,
    /// Highlight for mismatched or failed gestures.
    pub failure_color: String,
    /// Ring stroke width.
    pub ring_width: f32,
    /// Trail stroke width.
    pub trail_width: f32,
    /// Chosen dot radius as a fraction of the anchor radius.
    pub dot_ratio: f32,
}

impl Default for LockStyle {
    fn default() -> Self {
        Self {
            ring_color: "#CFE6FF".to_string(),
            success_color: "#2CFF26".to_string(),
            failure_color: "red".to_string(),
            ring_width: 2.0,
            trail_width: 3.0,
            dot_ratio: 0.5,
        }
    }
}
