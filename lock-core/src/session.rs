//! A single pointer-down to pointer-up gesture.
//!
//! The session splits the grid into a selection pool and a chosen sequence.
//! A hit moves the anchor from the pool to the end of the sequence, so each
//! anchor is chosen at most once and the two always partition the grid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{AnchorPoint, Grid, ResetTimer};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    /// Waiting for a pointer-down.
    Idle,
    /// Pointer is down and samples are being collected.
    Tracing,
    /// Pointer lifted; the chosen sequence is frozen until reset.
    Finished,
}

/// Mutable state for one gesture.
#[derive(Debug, Clone)]
pub struct GestureSession {
    phase: SessionPhase,
    radius: f32,
    pool: Vec<AnchorPoint>,
    chosen: Vec<AnchorPoint>,
    reset: ResetTimer,
}

impl GestureSession {
    /// Fresh session over the whole grid.
    #[must_use]
    pub fn new(grid: &Grid) -> Self {
        Self {
            phase: SessionPhase::Idle,
            radius: grid.radius(),
            pool: grid.points().to_vec(),
            chosen: Vec::with_capacity(grid.len()),
            reset: ResetTimer::new(),
        }
    }

    /// Pointer down. Activates the session and selects the anchor under the
    /// pointer, if any. Ignored unless the session is idle.
    pub fn start(&mut self, x: f32, y: f32) -> Option<AnchorPoint> {
        if self.phase != SessionPhase::Idle {
            tracing::debug!(phase = ?self.phase, "Ignoring start on non-idle session");
            return None;
        }
        self.phase = SessionPhase::Tracing;
        self.select(x, y)
    }

    /// Pointer move. Selects at most one new anchor per sample; anchors the
    /// pointer skipped over between samples are not interpolated.
    pub fn extend(&mut self, x: f32, y: f32) -> Option<AnchorPoint> {
        if self.phase != SessionPhase::Tracing {
            return None;
        }
        self.select(x, y)
    }

    /// Pointer up. Freezes and returns the chosen sequence, or `None` if the
    /// session was not tracing.
    pub fn finish(&mut self) -> Option<Vec<AnchorPoint>> {
        if self.phase != SessionPhase::Tracing {
            return None;
        }
        self.phase = SessionPhase::Finished;
        tracing::debug!(chosen = self.chosen.len(), "Gesture finished");
        Some(self.chosen.clone())
    }

    /// Discard all progress and refill the pool from `grid`.
    pub fn reset(&mut self, grid: &Grid) {
        self.phase = SessionPhase::Idle;
        self.radius = grid.radius();
        self.pool.clear();
        self.pool.extend_from_slice(grid.points());
        self.chosen.clear();
        self.reset.cancel();
    }

    /// Arm the deferred reset.
    pub fn schedule_reset(&mut self, delay: Duration) {
        self.reset.schedule(delay);
    }

    /// Disarm the deferred reset. Returns whether one was pending.
    pub fn cancel_reset(&mut self) -> bool {
        self.reset.cancel()
    }

    /// Whether a deferred reset is pending.
    #[must_use]
    pub fn reset_pending(&self) -> bool {
        self.reset.is_pending()
    }

    /// Advance the deferred reset; resets against `grid` when it fires.
    pub fn advance(&mut self, delta: Duration, grid: &Grid) -> bool {
        if self.reset.advance(delta) {
            self.reset(grid);
            true
        } else {
            false
        }
    }

    /// First pool anchor (grid order) whose hit box contains the sample.
    fn select(&mut self, x: f32, y: f32) -> Option<AnchorPoint> {
        let slot = self
            .pool
            .iter()
            .position(|p| p.is_hit(x, y, self.radius))?;
        let point = self.pool.remove(slot);
        self.chosen.push(point);
        tracing::trace!(index = point.index, "Anchor selected");
        Some(point)
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether the pointer is down.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Tracing
    }

    /// Anchors chosen so far, in selection order.
    #[must_use]
    pub fn chosen(&self) -> &[AnchorPoint] {
        &self.chosen
    }

    /// Anchors still selectable, in grid order.
    #[must_use]
    pub fn pool(&self) -> &[AnchorPoint] {
        &self.pool
    }
}
