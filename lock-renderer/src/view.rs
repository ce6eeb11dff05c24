//! Retained view of the lock, fed by core signals.

use lock_core::{AnchorPoint, Signal, UiSink, WorkflowOutcome, WorkflowPhase};

use crate::{LockStyle, RenderBackend, RenderResult};

/// Colour applied to the chosen rings after a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Saved or unlocked.
    Success,
    /// Mismatch or failed unlock.
    Failure,
}

/// Everything needed to paint one frame and the status chrome.
#[derive(Debug, Clone)]
pub struct LockView {
    points: Vec<AnchorPoint>,
    radius: f32,
    chosen: Vec<AnchorPoint>,
    pointer: Option<(f32, f32)>,
    tracing: bool,
    highlight: Option<Highlight>,
    phase: WorkflowPhase,
    outcome: Option<WorkflowOutcome>,
    storage_error: Option<String>,
    dirty: bool,
}

impl Default for LockView {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            radius: 0.0,
            chosen: Vec::new(),
            pointer: None,
            tracing: false,
            highlight: None,
            phase: WorkflowPhase::Unset,
            outcome: None,
            storage_error: None,
            dirty: true,
        }
    }
}

impl LockView {
    /// Empty view; fills in once the lock announces its grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Status line shown above the lock.
    #[must_use]
    pub fn title(&self) -> &'static str {
        if self.storage_error.is_some() {
            return "Could not save the pattern";
        }
        match self.outcome {
            Some(WorkflowOutcome::EnterAgain) => "Enter the pattern again",
            Some(WorkflowOutcome::Mismatch) => "Patterns do not match, try again",
            Some(WorkflowOutcome::Saved) => "Pattern saved",
            Some(WorkflowOutcome::Unlocked) => "Unlocked",
            Some(WorkflowOutcome::Failed) => "Unlock failed",
            None => match self.phase {
                WorkflowPhase::Locked => "Please unlock",
                WorkflowPhase::Unset | WorkflowPhase::AwaitingConfirmation => {
                    "Draw an unlock pattern"
                }
            },
        }
    }

    /// Whether the "reset pattern" control should be offered.
    #[must_use]
    pub fn show_reset_button(&self) -> bool {
        self.phase == WorkflowPhase::Locked
    }

    /// Current workflow phase as last announced.
    #[must_use]
    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    /// Highlight applied to the chosen rings, if any.
    #[must_use]
    pub fn highlight(&self) -> Option<Highlight> {
        self.highlight
    }

    /// Anchors chosen in the gesture on screen.
    #[must_use]
    pub fn chosen(&self) -> &[AnchorPoint] {
        &self.chosen
    }

    /// Whether anything changed since the last [`Self::mark_clean`].
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledge a repaint.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Paint the current frame: rings, trail, chosen dots, then highlights.
    ///
    /// # Errors
    ///
    /// Propagates backend failures.
    pub fn paint(&self, backend: &mut dyn RenderBackend, style: &LockStyle) -> RenderResult<()> {
        backend.clear()?;

        for p in &self.points {
            backend.stroke_circle((p.x, p.y), self.radius, &style.ring_color, style.ring_width)?;
        }

        let mut trail: Vec<(f32, f32)> = self.chosen.iter().map(|p| (p.x, p.y)).collect();
        if self.tracing {
            trail.extend(self.pointer);
        }
        if trail.len() > 1 {
            backend.polyline(&trail, &style.ring_color, style.trail_width)?;
        }

        let dot = self.radius * style.dot_ratio;
        for p in &self.chosen {
            backend.fill_circle((p.x, p.y), dot, &style.ring_color)?;
        }

        if let Some(highlight) = self.highlight {
            let color = match highlight {
                Highlight::Success => &style.success_color,
                Highlight::Failure => &style.failure_color,
            };
            for p in &self.chosen {
                backend.stroke_circle((p.x, p.y), self.radius, color, style.ring_width)?;
            }
        }
        Ok(())
    }
}

impl UiSink for LockView {
    fn emit(&mut self, signal: Signal) {
        match signal {
            Signal::GridBuilt { points, radius } => {
                self.points = points;
                self.radius = radius;
                self.chosen.clear();
                self.pointer = None;
                self.tracing = false;
            }
            Signal::PointSelected(point) => {
                self.tracing = true;
                self.chosen.push(point);
            }
            Signal::PointerMoved { x, y } => {
                self.tracing = true;
                self.pointer = Some((x, y));
            }
            Signal::SessionFinalized(seq) => {
                self.tracing = false;
                self.pointer = None;
                self.chosen = seq;
            }
            Signal::WorkflowResult(outcome) => {
                self.outcome = Some(outcome);
                self.storage_error = None;
                self.highlight = if outcome.is_success() {
                    Some(Highlight::Success)
                } else if outcome.is_failure() {
                    Some(Highlight::Failure)
                } else {
                    None
                };
            }
            Signal::StateChanged(phase) => {
                self.phase = phase;
                if phase == WorkflowPhase::Unset && self.outcome != Some(WorkflowOutcome::Mismatch)
                {
                    self.outcome = None;
                }
            }
            Signal::SessionReset => {
                self.chosen.clear();
                self.pointer = None;
                self.tracing = false;
                self.highlight = None;
                // verification results give way to the prompt; enrolment
                // messages stay until the next gesture is judged
                if self.phase == WorkflowPhase::Locked {
                    self.outcome = None;
                }
            }
            Signal::StorageFailed(message) => {
                tracing::warn!("Storage failure shown to user: {message}");
                self.storage_error = Some(message);
                self.highlight = Some(Highlight::Failure);
            }
        }
        self.dirty = true;
    }
}
