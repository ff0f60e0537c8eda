pub mod controller;
pub mod pager;
pub mod sheet;

pub use controller::{
    Direction, Mode, ProgressDrivenTransitionController, TransitionListener, TransitionProgress,
};
pub use pager::{PageMove, PageTransition, StepPager};
pub use sheet::{SheetPresentation, SheetState, SheetStateListener};
