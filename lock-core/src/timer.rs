//! One-shot deferred reset timer.
//!
//! The timer is advanced by the host (animation frame deltas in the browser,
//! fixed steps in tests) rather than reading a wall clock.

use std::time::Duration;

/// A cancellable one-shot countdown.
#[derive(Debug, Clone, Default)]
pub struct ResetTimer {
    remaining: Option<Duration>,
}

impl ResetTimer {
    /// Create an idle timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer, replacing any pending countdown.
    pub fn schedule(&mut self, delay: Duration) {
        self.remaining = Some(delay);
    }

    /// Disarm the timer. Returns whether a countdown was pending.
    pub fn cancel(&mut self) -> bool {
        self.remaining.take().is_some()
    }

    /// Whether a countdown is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.remaining.is_some()
    }

    /// Time left before firing, if armed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining
    }

    /// Move time forward. Returns `true` exactly once, on the call that
    /// exhausts the countdown.
    pub fn advance(&mut self, delta: Duration) -> bool {
        let Some(left) = self.remaining else {
            return false;
        };
        if delta >= left {
            self.remaining = None;
            true
        } else {
            self.remaining = Some(left - delta);
            false
        }
    }
}
