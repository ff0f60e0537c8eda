//! Prelude module for common interactive-transitions types
//!
//! This module re-exports the most commonly used types and traits
//! for easy importing with `use interactive_transitions::prelude::*;`

pub use crate::core::{
    config::{ControllerConfig, SettleCriteria, SpringConfig, TransitionProfile},
    geometry::{Point, Rect, Size},
};

pub use crate::animation::{
    clock::{FrameClock, PauseClock},
    interpolation::{EasingFunction, FrameInterpolation, Interpolatable, Interpolation},
    spring::{SettlingIntegrator, SpringState},
};

pub use crate::input::{
    events::{DragEvent, TransitionEvent},
    gestures::{DragAxis, DragConfig, DragTracker, DragUpdate, GestureSample},
};

pub use crate::transitions::{
    controller::{Direction, Mode, ProgressDrivenTransitionController, TransitionProgress},
    pager::{PageMove, PageTransition, StepPager},
    sheet::{SheetPresentation, SheetState},
};

pub use crate::TransitionError;
