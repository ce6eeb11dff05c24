//! The gesture-lock controller.
//!
//! Pointer input is routed into the [`GestureSession`], finished gestures are
//! judged by the [`PatternWorkflow`], and every visible change is announced
//! through the injected [`UiSink`].

use std::time::Duration;

use crate::{
    GestureSession, Grid, LockConfig, LockError, LockResult, PatternStore, PatternWorkflow,
    SessionPhase, Signal, StoredPattern, TouchEvent, TouchPhase, UiSink, WorkflowOutcome,
    WorkflowPhase,
};

/// A lock-pattern widget without presentation or storage of its own.
#[derive(Debug)]
pub struct GestureLock<S, U> {
    config: LockConfig,
    grid: Grid,
    session: GestureSession,
    workflow: PatternWorkflow<S>,
    sink: U,
}

impl<S: PatternStore, U: UiSink> GestureLock<S, U> {
    /// Create the lock, load any stored pattern and announce the grid.
    ///
    /// If a valid pattern is stored for a different matrix, the stored
    /// matrix is used.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` is invalid.
    pub fn new(mut config: LockConfig, store: S, sink: U) -> LockResult<Self> {
        config.validate()?;
        let workflow = PatternWorkflow::new(store, config.matrix);
        config.matrix = workflow.matrix();
        let grid = Grid::build(config.width, config.matrix)?;
        let session = GestureSession::new(&grid);

        tracing::info!(
            matrix = config.matrix,
            phase = ?workflow.phase(),
            "Gesture lock ready"
        );

        let mut lock = Self {
            config,
            grid,
            session,
            workflow,
            sink,
        };
        lock.announce_grid();
        lock.sink.emit(Signal::StateChanged(lock.workflow.phase()));
        Ok(lock)
    }

    /// Pointer down. Returns `false` if the press was ignored because the
    /// previous gesture is still on screen, waiting for its reset.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        if self.session.reset_pending() {
            tracing::debug!("Pointer down ignored until the pending reset fires");
            return false;
        }
        if self.session.phase() != SessionPhase::Idle {
            return false;
        }
        if let Some(point) = self.session.start(x, y) {
            self.sink.emit(Signal::PointSelected(point));
        }
        self.sink.emit(Signal::PointerMoved { x, y });
        true
    }

    /// Pointer move while tracing.
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if !self.session.is_active() {
            return;
        }
        if let Some(point) = self.session.extend(x, y) {
            self.sink.emit(Signal::PointSelected(point));
        }
        self.sink.emit(Signal::PointerMoved { x, y });
    }

    /// Pointer up. Finalizes the gesture, hands it to the workflow and arms
    /// the deferred reset.
    ///
    /// Returns `Ok(None)` when no gesture was in progress or the gesture was
    /// empty (a no-op retry).
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Storage`] if a confirmed pattern could not be
    /// saved. A [`Signal::StorageFailed`] is emitted as well.
    pub fn pointer_up(&mut self) -> LockResult<Option<WorkflowOutcome>> {
        let Some(seq) = self.session.finish() else {
            return Ok(None);
        };
        self.sink.emit(Signal::SessionFinalized(seq.clone()));
        self.session.schedule_reset(self.config.reset_delay());

        let before = self.workflow.phase();
        match self.workflow.submit(&seq) {
            Ok(outcome) => {
                self.sink.emit(Signal::WorkflowResult(outcome));
                self.announce_phase_change(before);
                Ok(Some(outcome))
            }
            Err(LockError::EmptySequence) => {
                tracing::debug!("Empty gesture ignored");
                Ok(None)
            }
            Err(e) => {
                if let LockError::Storage(ref inner) = e {
                    self.sink.emit(Signal::StorageFailed(inner.to_string()));
                }
                Err(e)
            }
        }
    }

    /// Abort the gesture in progress without judging it.
    pub fn cancel_gesture(&mut self) {
        if self.session.is_active() {
            tracing::debug!("Gesture cancelled");
            self.reset_session();
        }
    }

    /// Route a touch event by phase. Only the primary touch is used.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::pointer_up`].
    pub fn handle_touch(&mut self, event: &TouchEvent) -> LockResult<Option<WorkflowOutcome>> {
        match event.phase {
            TouchPhase::Start => {
                if let Some(touch) = event.primary_touch() {
                    self.pointer_down(touch.x, touch.y);
                }
                Ok(None)
            }
            TouchPhase::Move => {
                if let Some(touch) = event.primary_touch() {
                    self.pointer_move(touch.x, touch.y);
                }
                Ok(None)
            }
            TouchPhase::End => self.pointer_up(),
            TouchPhase::Cancel => {
                self.cancel_gesture();
                Ok(None)
            }
        }
    }

    /// Advance the deferred reset. Returns `true` when it fired.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if self.session.advance(delta, &self.grid) {
            self.sink.emit(Signal::SessionReset);
            self.announce_grid();
            true
        } else {
            false
        }
    }

    /// Disarm the deferred reset, keeping the finished gesture on screen.
    pub fn cancel_reset(&mut self) -> bool {
        self.session.cancel_reset()
    }

    /// Clear the session now, cancelling any deferred reset.
    pub fn reset_session(&mut self) {
        self.session.reset(&self.grid);
        self.sink.emit(Signal::SessionReset);
        self.announce_grid();
    }

    /// Forget the stored pattern and start enrolment over.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Storage`] if the store could not be cleared. The
    /// lock is back in enrolment either way.
    pub fn reset_stored_pattern(&mut self) -> LockResult<()> {
        let result = self.workflow.reset_stored_pattern();
        self.reset_session();
        self.sink.emit(Signal::StateChanged(WorkflowPhase::Unset));
        if let Err(LockError::Storage(ref e)) = result {
            self.sink.emit(Signal::StorageFailed(e.to_string()));
        }
        result
    }

    /// Switch the grid side length, discarding the session in flight.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::InvalidMatrix`] for zero and
    /// [`LockError::PatternBound`] while a pattern for another matrix is
    /// stored. Nothing changes on error.
    pub fn change_matrix_size(&mut self, matrix: u32) -> LockResult<()> {
        let grid = Grid::build(self.config.width, matrix)?;
        let before = self.workflow.phase();
        if let Err(e) = self.workflow.change_matrix(matrix) {
            tracing::warn!("Matrix change refused: {e}");
            return Err(e);
        }

        self.config.matrix = matrix;
        self.grid = grid;
        self.session = GestureSession::new(&self.grid);
        self.sink.emit(Signal::SessionReset);
        self.announce_grid();
        self.announce_phase_change(before);
        Ok(())
    }

    fn announce_grid(&mut self) {
        self.sink.emit(Signal::GridBuilt {
            points: self.grid.points().to_vec(),
            radius: self.grid.radius(),
        });
    }

    fn announce_phase_change(&mut self, before: WorkflowPhase) {
        let after = self.workflow.phase();
        if after != before {
            self.sink.emit(Signal::StateChanged(after));
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &LockConfig {
        &self.config
    }

    /// Current grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current gesture session.
    #[must_use]
    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    /// Current workflow phase.
    #[must_use]
    pub fn phase(&self) -> WorkflowPhase {
        self.workflow.phase()
    }

    /// The stored pattern while locked.
    #[must_use]
    pub fn stored_pattern(&self) -> Option<&StoredPattern> {
        self.workflow.stored()
    }

    /// The workflow.
    #[must_use]
    pub fn workflow(&self) -> &PatternWorkflow<S> {
        &self.workflow
    }

    /// The persistence collaborator.
    #[must_use]
    pub fn store(&self) -> &S {
        self.workflow.store()
    }

    /// Mutable access to the persistence collaborator.
    pub fn store_mut(&mut self) -> &mut S {
        self.workflow.store_mut()
    }

    /// The signal sink.
    #[must_use]
    pub fn sink(&self) -> &U {
        &self.sink
    }

    /// Mutable access to the signal sink.
    pub fn sink_mut(&mut self) -> &mut U {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, NullSink, Pattern};

    type TestLock = GestureLock<MemoryStore, Vec<Signal>>;

    fn lock() -> TestLock {
        GestureLock::new(LockConfig::default(), MemoryStore::new(), Vec::new()).expect("valid")
    }

    fn trace(lock: &mut TestLock, indices: &[u32]) -> LockResult<Option<WorkflowOutcome>> {
        let points: Vec<_> = indices
            .iter()
            .map(|&i| *lock.grid().get(i).expect("index on grid"))
            .collect();
        let (first, rest) = points.split_first().expect("non-empty trace");
        assert!(lock.pointer_down(first.x, first.y));
        for p in rest {
            lock.pointer_move(p.x, p.y);
        }
        lock.pointer_up()
    }

    #[test]
    fn new_announces_grid_and_phase() {
        let lock = lock();
        assert!(matches!(
            lock.sink()[0],
            Signal::GridBuilt { ref points, .. } if points.len() == 9
        ));
        assert_eq!(lock.sink()[1], Signal::StateChanged(WorkflowPhase::Unset));
    }

    #[test]
    fn new_rejects_bad_config() {
        let err = GestureLock::new(
            LockConfig::default().with_matrix(0),
            MemoryStore::new(),
            NullSink,
        )
        .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn moves_emit_selection_and_pointer() {
        let mut lock = lock();
        lock.sink_mut().clear();
        lock.pointer_down(50.0, 50.0);
        lock.pointer_move(100.0, 60.0);
        lock.pointer_move(150.0, 50.0);
        let selected: Vec<u32> = lock
            .sink()
            .iter()
            .filter_map(|s| match s {
                Signal::PointSelected(p) => Some(p.index),
                _ => None,
            })
            .collect();
        assert_eq!(selected, vec![1, 2]);
        assert_eq!(
            lock.sink().last(),
            Some(&Signal::PointerMoved { x: 150.0, y: 50.0 })
        );
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut lock = lock();
        lock.sink_mut().clear();
        lock.pointer_move(50.0, 50.0);
        assert!(lock.sink().is_empty());
        assert_eq!(lock.pointer_up().expect("no-op"), None);
    }

    #[test]
    fn press_during_pending_reset_is_ignored() {
        let mut lock = lock();
        trace(&mut lock, &[1, 2]).expect("trace");
        assert!(!lock.pointer_down(250.0, 250.0));
        assert_eq!(lock.session().phase(), SessionPhase::Finished);

        assert!(lock.advance(Duration::from_millis(500)));
        assert!(lock.pointer_down(250.0, 250.0));
        assert_eq!(lock.session().chosen().len(), 1);
    }

    #[test]
    fn reset_fires_after_configured_delay() {
        let mut lock = GestureLock::new(
            LockConfig::default().with_reset_delay(Duration::from_millis(100)),
            MemoryStore::new(),
            Vec::new(),
        )
        .expect("valid");
        trace(&mut lock, &[1]).expect("trace");
        lock.sink_mut().clear();
        assert!(!lock.advance(Duration::from_millis(99)));
        assert!(lock.advance(Duration::from_millis(1)));
        assert_eq!(lock.sink()[0], Signal::SessionReset);
        assert!(lock.session().chosen().is_empty());
    }

    #[test]
    fn cancel_reset_keeps_gesture_visible() {
        let mut lock = lock();
        trace(&mut lock, &[1, 2]).expect("trace");
        assert!(lock.cancel_reset());
        assert!(!lock.advance(Duration::from_secs(5)));
        assert_eq!(lock.session().chosen().len(), 2);
        lock.reset_session();
        assert!(lock.session().chosen().is_empty());
    }

    #[test]
    fn empty_gesture_is_a_quiet_retry() {
        let mut lock = lock();
        trace(&mut lock, &[4, 5]).expect("trace");
        lock.advance(Duration::from_millis(500));
        lock.sink_mut().clear();

        lock.pointer_down(100.0, 100.0);
        assert_eq!(lock.pointer_up().expect("empty"), None);
        assert_eq!(lock.phase(), WorkflowPhase::AwaitingConfirmation);
        assert!(!lock
            .sink()
            .iter()
            .any(|s| matches!(s, Signal::WorkflowResult(_))));
        assert!(lock.session().reset_pending());
    }

    #[test]
    fn failed_save_emits_storage_signal() {
        let mut store = MemoryStore::new();
        store.set_unavailable(true);
        let mut lock = GestureLock::new(LockConfig::default(), store, Vec::new()).expect("valid");
        trace(&mut lock, &[1, 2, 3]).expect("first attempt");
        lock.advance(Duration::from_millis(500));
        let err = trace(&mut lock, &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, LockError::Storage(_)));
        assert!(lock
            .sink()
            .iter()
            .any(|s| matches!(s, Signal::StorageFailed(_))));
        assert!(!lock
            .sink()
            .contains(&Signal::WorkflowResult(WorkflowOutcome::Saved)));
        assert_eq!(lock.phase(), WorkflowPhase::AwaitingConfirmation);
    }

    #[test]
    fn touch_events_drive_the_lock() {
        let mut lock = lock();
        let events = [
            TouchEvent::single(TouchPhase::Start, 50.0, 50.0, 0),
            TouchEvent::single(TouchPhase::Move, 150.0, 150.0, 16),
            TouchEvent::single(TouchPhase::Move, 250.0, 250.0, 32),
            TouchEvent::new(TouchPhase::End, Vec::new(), 48),
        ];
        let mut outcome = None;
        for event in &events {
            outcome = lock.handle_touch(event).expect("handled");
        }
        assert_eq!(outcome, Some(WorkflowOutcome::EnterAgain));
    }

    #[test]
    fn touch_cancel_discards_gesture() {
        let mut lock = lock();
        lock.handle_touch(&TouchEvent::single(TouchPhase::Start, 50.0, 50.0, 0))
            .expect("start");
        lock.handle_touch(&TouchEvent::new(TouchPhase::Cancel, Vec::new(), 10))
            .expect("cancel");
        assert_eq!(lock.session().phase(), SessionPhase::Idle);
        assert!(lock.session().chosen().is_empty());
        assert_eq!(lock.phase(), WorkflowPhase::Unset);
    }

    #[test]
    fn matrix_change_rebuilds_grid() {
        let mut lock = lock();
        lock.change_matrix_size(4).expect("resize");
        assert_eq!(lock.grid().len(), 16);
        assert_eq!(lock.config().matrix, 4);
        assert!(matches!(
            lock.change_matrix_size(0),
            Err(LockError::InvalidMatrix(0))
        ));
        assert_eq!(lock.grid().len(), 16);
    }

    #[test]
    fn matrix_change_refused_for_foreign_pattern() {
        let store = MemoryStore::with_record(StoredPattern::new(3, Pattern::new(vec![1, 2, 3])));
        let mut lock = GestureLock::new(LockConfig::default(), store, Vec::new()).expect("valid");
        assert!(matches!(
            lock.change_matrix_size(4),
            Err(LockError::PatternBound { .. })
        ));
        assert_eq!(lock.grid().matrix(), 3);
        lock.reset_stored_pattern().expect("reset");
        lock.change_matrix_size(4).expect("resize after reset");
        assert_eq!(lock.phase(), WorkflowPhase::Unset);
    }
}
