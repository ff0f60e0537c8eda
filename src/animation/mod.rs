pub mod clock;
pub mod interpolation;
pub mod spring;

// Re-export commonly used types and functions for convenience
pub use clock::{FrameClock, PauseClock};
pub use interpolation::{EasingFunction, FrameInterpolation, Interpolatable, Interpolation};
pub use spring::{SettlingIntegrator, SpringState};
