//! Enrolment and verification workflow.
//!
//! ```text
//!            finish            finish (equal)
//!   Unset ───────────► AwaitingConfirmation ───────────► Locked
//!     ▲                        │                          │  ▲
//!     └──── finish (differs) ──┘            finish ──────┘  │
//!     ▲                                   (Unlocked/Failed)  │
//!     └──────────────── reset_stored_pattern ────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    matrix_in_range, AnchorPoint, LockError, LockResult, Pattern, PatternStore, StoredPattern,
};

/// Result of judging a finished gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowOutcome {
    /// First enrolment attempt recorded; draw it again to confirm.
    EnterAgain,
    /// Confirmation differed from the first attempt; enrolment restarts.
    Mismatch,
    /// Confirmation matched and the pattern was persisted.
    Saved,
    /// Gesture matched the stored pattern.
    Unlocked,
    /// Gesture did not match the stored pattern.
    Failed,
}

impl WorkflowOutcome {
    /// Stable `snake_case` name, matching the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnterAgain => "enter_again",
            Self::Mismatch => "mismatch",
            Self::Saved => "saved",
            Self::Unlocked => "unlocked",
            Self::Failed => "failed",
        }
    }

    /// Outcomes shown as success.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Saved | Self::Unlocked)
    }

    /// Outcomes shown as failure.
    #[must_use]
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Mismatch | Self::Failed)
    }
}

/// Data-free view of [`WorkflowState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowPhase {
    /// No pattern stored.
    Unset,
    /// First attempt held, waiting for the confirmation.
    AwaitingConfirmation,
    /// A pattern is stored; gestures are verified.
    Locked,
}

impl WorkflowPhase {
    /// Stable `snake_case` name, matching the serialized form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::AwaitingConfirmation => "awaiting_confirmation",
            Self::Locked => "locked",
        }
    }
}

/// Workflow state with the data each phase needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    /// No pattern stored.
    Unset,
    /// Holding the first enrolment attempt.
    AwaitingConfirmation {
        /// The attempt to confirm against.
        first_attempt: Pattern,
    },
    /// Verifying against the stored pattern.
    Locked {
        /// The persisted pattern.
        stored: StoredPattern,
    },
}

impl WorkflowState {
    /// The phase without its data.
    #[must_use]
    pub fn phase(&self) -> WorkflowPhase {
        match self {
            Self::Unset => WorkflowPhase::Unset,
            Self::AwaitingConfirmation { .. } => WorkflowPhase::AwaitingConfirmation,
            Self::Locked { .. } => WorkflowPhase::Locked,
        }
    }
}

/// The enrol/verify state machine over an injected store.
#[derive(Debug)]
pub struct PatternWorkflow<S> {
    state: WorkflowState,
    matrix: u32,
    store: S,
}

impl<S: PatternStore> PatternWorkflow<S> {
    /// Start the workflow for a `matrix` grid, loading any stored pattern.
    ///
    /// A valid stored record locks the workflow and its enrolment matrix wins
    /// over `matrix`. Unreadable or invalid records are ignored with a warning
    /// so the widget can still be enrolled.
    pub fn new(store: S, matrix: u32) -> Self {
        let mut workflow = Self {
            state: WorkflowState::Unset,
            matrix,
            store,
        };
        match workflow.store.load() {
            Ok(Some(stored)) if stored.is_valid() => {
                if stored.matrix != matrix {
                    tracing::info!(
                        enrolled = stored.matrix,
                        requested = matrix,
                        "Using matrix of the stored pattern"
                    );
                    workflow.matrix = stored.matrix;
                }
                workflow.state = WorkflowState::Locked { stored };
            }
            Ok(Some(stored)) => {
                tracing::warn!(
                    matrix = stored.matrix,
                    pattern = %stored.pattern,
                    "Ignoring invalid stored pattern"
                );
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to load stored pattern: {e}"),
        }
        workflow
    }

    /// Judge a finished gesture.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::EmptySequence`] without any transition when `seq`
    /// is empty, and [`LockError::Storage`] when saving a confirmed pattern
    /// fails; the workflow then stays awaiting confirmation.
    pub fn submit(&mut self, seq: &[AnchorPoint]) -> LockResult<WorkflowOutcome> {
        if seq.is_empty() {
            return Err(LockError::EmptySequence);
        }

        let attempt = Pattern::from_points(seq);
        let state = std::mem::replace(&mut self.state, WorkflowState::Unset);
        let (next, outcome) = match state {
            WorkflowState::Unset => (
                WorkflowState::AwaitingConfirmation {
                    first_attempt: attempt,
                },
                WorkflowOutcome::EnterAgain,
            ),
            WorkflowState::AwaitingConfirmation { first_attempt } => {
                if first_attempt.matches(seq) {
                    let stored = StoredPattern::new(self.matrix, attempt);
                    if let Err(e) = self.store.save(&stored) {
                        tracing::warn!("Failed to save confirmed pattern: {e}");
                        self.state = WorkflowState::AwaitingConfirmation { first_attempt };
                        return Err(e.into());
                    }
                    (WorkflowState::Locked { stored }, WorkflowOutcome::Saved)
                } else {
                    (WorkflowState::Unset, WorkflowOutcome::Mismatch)
                }
            }
            WorkflowState::Locked { stored } => {
                let outcome = if stored.pattern.matches(seq) {
                    WorkflowOutcome::Unlocked
                } else {
                    WorkflowOutcome::Failed
                };
                (WorkflowState::Locked { stored }, outcome)
            }
        };

        self.state = next;
        tracing::info!(?outcome, phase = ?self.state.phase(), "Gesture judged");
        Ok(outcome)
    }

    /// Forget the stored pattern and return to enrolment.
    ///
    /// The workflow is `Unset` afterwards even when clearing the store fails.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Storage`] if the store could not be cleared.
    pub fn reset_stored_pattern(&mut self) -> LockResult<()> {
        self.state = WorkflowState::Unset;
        self.store.clear()?;
        tracing::info!("Stored pattern cleared");
        Ok(())
    }

    /// Switch to a `matrix` grid.
    ///
    /// A pending first attempt is discarded. A stored pattern survives only
    /// when it was enrolled on the same matrix, since indices are meaningless
    /// on another grid.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::InvalidMatrix`] for zero or above
    /// [`MAX_MATRIX`](crate::MAX_MATRIX), and [`LockError::PatternBound`] when a pattern for another matrix is
    /// stored; clear it with [`Self::reset_stored_pattern`] first.
    pub fn change_matrix(&mut self, matrix: u32) -> LockResult<()> {
        if !matrix_in_range(matrix) {
            return Err(LockError::InvalidMatrix(matrix));
        }
        if let WorkflowState::Locked { stored } = &self.state {
            if stored.matrix != matrix {
                return Err(LockError::PatternBound {
                    enrolled: stored.matrix,
                    requested: matrix,
                });
            }
        }
        if matches!(self.state, WorkflowState::AwaitingConfirmation { .. }) {
            tracing::debug!("Discarding unconfirmed first attempt");
            self.state = WorkflowState::Unset;
        }
        self.matrix = matrix;
        Ok(())
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> WorkflowPhase {
        self.state.phase()
    }

    /// Matrix new patterns are enrolled on.
    #[must_use]
    pub fn matrix(&self) -> u32 {
        self.matrix
    }

    /// The stored pattern while locked.
    #[must_use]
    pub fn stored(&self) -> Option<&StoredPattern> {
        match &self.state {
            WorkflowState::Locked { stored } => Some(stored),
            _ => None,
        }
    }

    /// The persistence collaborator.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the persistence collaborator.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Grid, MemoryStore};

    fn seq(indices: &[u32]) -> Vec<AnchorPoint> {
        let grid = Grid::build(300.0, 3).expect("valid grid");
        indices
            .iter()
            .map(|&i| *grid.get(i).expect("index on grid"))
            .collect()
    }

    fn locked(indices: &[u32]) -> PatternWorkflow<MemoryStore> {
        let store = MemoryStore::with_record(StoredPattern::new(3, Pattern::new(indices.to_vec())));
        PatternWorkflow::new(store, 3)
    }

    #[test]
    fn names_match_serde() {
        for outcome in [
            WorkflowOutcome::EnterAgain,
            WorkflowOutcome::Mismatch,
            WorkflowOutcome::Saved,
            WorkflowOutcome::Unlocked,
            WorkflowOutcome::Failed,
        ] {
            let json = serde_json::to_string(&outcome).expect("serialize");
            assert_eq!(json, format!("\"{}\"", outcome.as_str()));
        }
        let json = serde_json::to_string(&WorkflowPhase::AwaitingConfirmation).expect("serialize");
        assert_eq!(json, "\"awaiting_confirmation\"");
    }

    #[test]
    fn empty_store_starts_unset() {
        let workflow = PatternWorkflow::new(MemoryStore::new(), 3);
        assert_eq!(workflow.phase(), WorkflowPhase::Unset);
        assert!(workflow.stored().is_none());
    }

    #[test]
    fn valid_record_starts_locked() {
        let workflow = locked(&[1, 2, 3]);
        assert_eq!(workflow.phase(), WorkflowPhase::Locked);
    }

    #[test]
    fn invalid_record_is_ignored() {
        let store = MemoryStore::with_record(StoredPattern::new(3, Pattern::new(vec![1, 12])));
        let workflow = PatternWorkflow::new(store, 3);
        assert_eq!(workflow.phase(), WorkflowPhase::Unset);
    }

    #[test]
    fn oversized_stored_matrix_is_ignored() {
        let store = MemoryStore::with_record(StoredPattern::new(60_000, Pattern::new(vec![1])));
        let workflow = PatternWorkflow::new(store, 3);
        assert_eq!(workflow.phase(), WorkflowPhase::Unset);
        assert_eq!(workflow.matrix(), 3);
    }

    #[test]
    fn stored_matrix_wins_at_startup() {
        let store = MemoryStore::with_record(StoredPattern::new(4, Pattern::new(vec![16, 1])));
        let workflow = PatternWorkflow::new(store, 3);
        assert_eq!(workflow.matrix(), 4);
        assert_eq!(workflow.phase(), WorkflowPhase::Locked);
    }

    #[test]
    fn enrol_then_confirm_saves() {
        let mut workflow = PatternWorkflow::new(MemoryStore::new(), 3);
        assert_eq!(
            workflow.submit(&seq(&[1, 2, 3])).expect("submit"),
            WorkflowOutcome::EnterAgain
        );
        assert_eq!(workflow.phase(), WorkflowPhase::AwaitingConfirmation);
        assert_eq!(
            workflow.submit(&seq(&[1, 2, 3])).expect("submit"),
            WorkflowOutcome::Saved
        );
        assert_eq!(workflow.phase(), WorkflowPhase::Locked);
        let record = workflow.store().record().expect("persisted");
        assert_eq!(record.pattern.indices(), &[1, 2, 3]);
        assert_eq!(record.matrix, 3);
    }

    #[test]
    fn confirm_mismatch_restarts() {
        let mut workflow = PatternWorkflow::new(MemoryStore::new(), 3);
        workflow.submit(&seq(&[1, 2])).expect("submit");
        assert_eq!(
            workflow.submit(&seq(&[3, 4])).expect("submit"),
            WorkflowOutcome::Mismatch
        );
        assert_eq!(workflow.phase(), WorkflowPhase::Unset);
        assert!(workflow.store().record().is_none());
    }

    #[test]
    fn verify_is_order_sensitive() {
        let mut workflow = locked(&[1, 2, 3]);
        assert_eq!(
            workflow.submit(&seq(&[1, 2, 3])).expect("submit"),
            WorkflowOutcome::Unlocked
        );
        assert_eq!(
            workflow.submit(&seq(&[2, 1, 3])).expect("submit"),
            WorkflowOutcome::Failed
        );
        assert_eq!(workflow.phase(), WorkflowPhase::Locked);
    }

    #[test]
    fn empty_sequence_never_transitions() {
        let mut workflow = PatternWorkflow::new(MemoryStore::new(), 3);
        assert!(matches!(workflow.submit(&[]), Err(LockError::EmptySequence)));
        assert_eq!(workflow.phase(), WorkflowPhase::Unset);

        workflow.submit(&seq(&[5, 6])).expect("submit");
        assert!(matches!(workflow.submit(&[]), Err(LockError::EmptySequence)));
        assert_eq!(workflow.phase(), WorkflowPhase::AwaitingConfirmation);
        assert_eq!(
            workflow.submit(&seq(&[5, 6])).expect("submit"),
            WorkflowOutcome::Saved
        );

        assert!(matches!(workflow.submit(&[]), Err(LockError::EmptySequence)));
        assert_eq!(workflow.phase(), WorkflowPhase::Locked);
    }

    #[test]
    fn failed_save_is_not_reported_as_saved() {
        let mut store = MemoryStore::new();
        store.set_unavailable(true);
        let mut workflow = PatternWorkflow::new(store, 3);
        workflow.submit(&seq(&[7, 8, 9])).expect("submit");
        let err = workflow.submit(&seq(&[7, 8, 9])).unwrap_err();
        assert!(matches!(err, LockError::Storage(_)));
        assert_eq!(workflow.phase(), WorkflowPhase::AwaitingConfirmation);

        workflow.store_mut().set_unavailable(false);
        assert_eq!(
            workflow.submit(&seq(&[7, 8, 9])).expect("retry"),
            WorkflowOutcome::Saved
        );
    }

    #[test]
    fn reset_stored_pattern_from_any_state() {
        let mut workflow = locked(&[1, 5, 9]);
        workflow.reset_stored_pattern().expect("reset");
        assert_eq!(workflow.phase(), WorkflowPhase::Unset);
        assert!(workflow.store().record().is_none());

        workflow.submit(&seq(&[1])).expect("submit");
        workflow.reset_stored_pattern().expect("reset");
        assert_eq!(workflow.phase(), WorkflowPhase::Unset);

        workflow.reset_stored_pattern().expect("reset when unset");
    }

    #[test]
    fn change_matrix_rules() {
        let mut workflow = PatternWorkflow::new(MemoryStore::new(), 3);
        workflow.submit(&seq(&[1, 2])).expect("submit");
        workflow.change_matrix(4).expect("unset resize");
        assert_eq!(workflow.phase(), WorkflowPhase::Unset);
        assert_eq!(workflow.matrix(), 4);

        let mut workflow = locked(&[1, 2, 3]);
        workflow.change_matrix(3).expect("same matrix");
        assert_eq!(workflow.phase(), WorkflowPhase::Locked);
        assert!(matches!(
            workflow.change_matrix(5),
            Err(LockError::PatternBound {
                enrolled: 3,
                requested: 5
            })
        ));
        assert_eq!(workflow.matrix(), 3);
        assert!(matches!(
            workflow.change_matrix(0),
            Err(LockError::InvalidMatrix(0))
        ));

        let mut workflow = PatternWorkflow::new(MemoryStore::new(), 3);
        assert!(matches!(
            workflow.change_matrix(70_000),
            Err(LockError::InvalidMatrix(70_000))
        ));
        assert_eq!(workflow.matrix(), 3);
    }
}
