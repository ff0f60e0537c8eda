//! # Interactive Transitions
//!
//! Gesture-driven transitions that can be grabbed, paused and released.
//!
//! A [`ProgressDrivenTransitionController`] maps a drag onto the progress of
//! a two-state transition, decides on release whether to complete or revert,
//! and settles the rest of the way with a damped spring. Higher-level
//! transitions such as a bottom sheet and a step pager are built on top of
//! it, and the animation module provides the interpolation helpers a
//! renderer needs to turn progress into frames.

pub mod animation;
pub mod core;
pub mod input;
pub mod prelude;
pub mod transitions;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{ControllerConfig, SettleCriteria, SpringConfig, TransitionProfile},
    geometry::{Point, Rect, Size},
};

pub use animation::{FrameClock, FrameInterpolation, PauseClock, SettlingIntegrator};

pub use input::{DragEvent, DragTracker, DragUpdate, GestureSample, TransitionEvent};

pub use transitions::{
    controller::{Direction, Mode, ProgressDrivenTransitionController, TransitionProgress},
    pager::{PageMove, StepPager},
    sheet::{SheetPresentation, SheetState},
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, TransitionError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    #[error("`{operation}` is not valid while the transition is {mode:?}")]
    InvalidState {
        operation: &'static str,
        mode: Mode,
    },

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Error type alias for convenience
pub type Error = TransitionError;
