use crate::core::geometry::Point;
use serde::{Deserialize, Serialize};

/// Raw pointer events from a drag source. `time` is in seconds on any
/// monotonic clock chosen by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DragEvent {
    /// Pointer went down
    Began { position: Point, time: f64 },
    /// Pointer moved while down
    Moved { position: Point, time: f64 },
    /// Pointer lifted
    Ended { position: Point, time: f64 },
    /// The platform took the gesture away (system gesture, lost capture)
    Cancelled,
}

impl DragEvent {
    pub fn position(&self) -> Option<Point> {
        match self {
            DragEvent::Began { position, .. }
            | DragEvent::Moved { position, .. }
            | DragEvent::Ended { position, .. } => Some(*position),
            DragEvent::Cancelled => None,
        }
    }

    pub fn time(&self) -> Option<f64> {
        match self {
            DragEvent::Began { time, .. }
            | DragEvent::Moved { time, .. }
            | DragEvent::Ended { time, .. } => Some(*time),
            DragEvent::Cancelled => None,
        }
    }
}

/// Notifications emitted by a transition controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TransitionEvent {
    /// Input ended past the threshold; the transition will complete
    Committed,
    /// Input ended short of the threshold; the transition will revert
    Cancelled,
    /// The settling spring arrived. Fired once per settle.
    Settled { committed: bool },
    /// A settle was abandoned before arriving, at this progress value
    Interrupted { value: f64 },
}

impl TransitionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TransitionEvent::Committed => "committed",
            TransitionEvent::Cancelled => "cancelled",
            TransitionEvent::Settled { .. } => "settled",
            TransitionEvent::Interrupted { .. } => "interrupted",
        }
    }
}
