pub mod events;
pub mod gestures;

// Re-export the essential types
pub use events::{DragEvent, TransitionEvent};
pub use gestures::{DragAxis, DragConfig, DragTracker, DragUpdate, GestureSample};
