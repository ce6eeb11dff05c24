//! Output signals for rendering and status collaborators.

use serde::{Deserialize, Serialize};

use crate::{AnchorPoint, WorkflowOutcome, WorkflowPhase};

/// Everything the core tells the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Signal {
    /// The grid was (re)built; draw every ring.
    GridBuilt {
        /// All anchors in row-major order.
        points: Vec<AnchorPoint>,
        /// Ring radius.
        radius: f32,
    },
    /// An anchor joined the chosen sequence.
    PointSelected(AnchorPoint),
    /// The pointer moved while tracing; redraw the trail to it.
    PointerMoved {
        /// Pointer X.
        x: f32,
        /// Pointer Y.
        y: f32,
    },
    /// The pointer lifted with this chosen sequence.
    SessionFinalized(Vec<AnchorPoint>),
    /// The workflow judged a finished gesture.
    WorkflowResult(WorkflowOutcome),
    /// The workflow moved to a new phase.
    StateChanged(WorkflowPhase),
    /// The session was cleared and is ready for a new gesture.
    SessionReset,
    /// The persistence collaborator failed.
    StorageFailed(String),
}

/// Receiver for [`Signal`]s.
pub trait UiSink {
    /// Handle one signal.
    fn emit(&mut self, signal: Signal);
}

/// Collects signals in order.
impl UiSink for Vec<Signal> {
    fn emit(&mut self, signal: Signal) {
        self.push(signal);
    }
}

impl<U: UiSink + ?Sized> UiSink for &mut U {
    fn emit(&mut self, signal: Signal) {
        (**self).emit(signal);
    }
}

/// Discards every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl UiSink for NullSink {
    fn emit(&mut self, _signal: Signal) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_sink_records_in_order() {
        let mut sink: Vec<Signal> = Vec::new();
        sink.emit(Signal::SessionReset);
        sink.emit(Signal::WorkflowResult(WorkflowOutcome::Saved));
        assert_eq!(
            sink,
            vec![
                Signal::SessionReset,
                Signal::WorkflowResult(WorkflowOutcome::Saved)
            ]
        );
    }

    #[test]
    fn signals_serialize_tagged() {
        let json = serde_json::to_string(&Signal::WorkflowResult(WorkflowOutcome::EnterAgain))
            .expect("serialize");
        assert_eq!(json, r#"{"type":"WorkflowResult","data":"enter_again"}"#);
        let json = serde_json::to_string(&Signal::SessionReset).expect("serialize");
        assert_eq!(json, r#"{"type":"SessionReset"}"#);
    }
}
