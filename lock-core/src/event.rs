//! Touch input events fed into the lock.

use serde::{Deserialize, Serialize};

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled by the host (e.g., palm rejection, lost focus).
    Cancel,
}

impl TouchPhase {
    /// Parse a DOM-style phase name. Unknown names yield `None`.
    #[must_use]
    pub fn parse(phase: &str) -> Option<Self> {
        match phase {
            "start" | "started" | "touchstart" => Some(Self::Start),
            "move" | "moved" | "touchmove" => Some(Self::Move),
            "end" | "ended" | "touchend" => Some(Self::End),
            "cancel" | "cancelled" | "touchcancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier (for multi-touch).
    #[serde(default)]
    pub id: u32,
    /// X position in surface coordinates.
    pub x: f32,
    /// Y position in surface coordinates.
    pub y: f32,
    /// Pressure (0.0 to 1.0, if available).
    #[serde(default)]
    pub pressure: Option<f32>,
    /// Touch radius in pixels (if available).
    #[serde(default)]
    pub radius: Option<f32>,
}

impl TouchPoint {
    /// A primary touch at the given position.
    #[must_use]
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            id: 0,
            x,
            y,
            pressure: None,
            radius: None,
        }
    }
}

/// A touch event with one or more touch points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points. Empty for `End` on most hosts.
    #[serde(default)]
    pub touches: Vec<TouchPoint>,
    /// Timestamp in milliseconds since the widget started.
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>, timestamp_ms: u64) -> Self {
        Self {
            phase,
            touches,
            timestamp_ms,
        }
    }

    /// Single-finger event at the given position.
    #[must_use]
    pub fn single(phase: TouchPhase, x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(phase, vec![TouchPoint::at(x, y)], timestamp_ms)
    }

    /// Get the primary (first) touch point.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Check if this is a multi-touch event.
    #[must_use]
    pub fn is_multi_touch(&self) -> bool {
        self.touches.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_dom_spellings() {
        assert_eq!(TouchPhase::parse("touchstart"), Some(TouchPhase::Start));
        assert_eq!(TouchPhase::parse("moved"), Some(TouchPhase::Move));
        assert_eq!(TouchPhase::parse("end"), Some(TouchPhase::End));
        assert_eq!(TouchPhase::parse("cancelled"), Some(TouchPhase::Cancel));
        assert_eq!(TouchPhase::parse("hover"), None);
    }

    #[test]
    fn primary_touch_is_first() {
        let event = TouchEvent::new(
            TouchPhase::Move,
            vec![TouchPoint::at(1.0, 2.0), TouchPoint::at(3.0, 4.0)],
            10,
        );
        assert!(event.is_multi_touch());
        assert_eq!(event.primary_touch().map(|t| t.x), Some(1.0));
    }

    #[test]
    fn deserializes_minimal_script_entry() {
        let event: TouchEvent =
            serde_json::from_str(r#"{"phase":"start","touches":[{"x":50.0,"y":50.0}]}"#)
                .expect("valid event");
        assert_eq!(event.phase, TouchPhase::Start);
        assert_eq!(event.timestamp_ms, 0);
        assert_eq!(event.touches[0].id, 0);

        let end: TouchEvent = serde_json::from_str(r#"{"phase":"end"}"#).expect("valid event");
        assert!(end.primary_touch().is_none());
    }
}
