use crate::core::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Interpolation trait for values that can be smoothly transitioned
pub trait Interpolatable {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

/// Easing curves for mapping progress onto visuals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EasingFunction {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseOutBack,
}

impl EasingFunction {
    /// Apply the easing function to a normalized time value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            EasingFunction::Linear => t,
            EasingFunction::EaseInQuad => t * t,
            EasingFunction::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            EasingFunction::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EasingFunction::EaseInCubic => t * t * t,
            EasingFunction::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            EasingFunction::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            EasingFunction::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            EasingFunction::EaseOutSine => (t * PI / 2.0).sin(),
            EasingFunction::EaseInOutSine => -(((PI * t).cos() - 1.0) / 2.0),
            EasingFunction::EaseOutBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
            }
        }
    }
}

/// Main interpolation utilities
pub struct Interpolation;

impl Interpolation {
    /// Linear interpolation between two f64 values. `t` is not clamped.
    pub fn linear(start: f64, end: f64, t: f64) -> f64 {
        start + (end - start) * t
    }
}

impl Interpolatable for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Interpolation::linear(*self, *other, t)
    }
}

impl Interpolatable for Point {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Point::new(
            Interpolation::linear(self.x, other.x, t),
            Interpolation::linear(self.y, other.y, t),
        )
    }
}

impl Interpolatable for Size {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Size::new(
            Interpolation::linear(self.width, other.width, t),
            Interpolation::linear(self.height, other.height, t),
        )
    }
}

/// Frames interpolate around their centers, the way a shared element grows
/// from its source slot into its destination.
impl Interpolatable for Rect {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        let center = self.center().lerp(&other.center(), t);
        let size = self.size.lerp(&other.size, t);
        Rect::from_center_and_size(center, size)
    }
}

/// Blends a shared element between a source and a destination frame as a
/// transition's progress moves from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameInterpolation {
    pub source: Rect,
    pub destination: Rect,
    pub source_corner_radius: f64,
    pub destination_corner_radius: f64,
    /// Optional easing. Without one, progress is applied unclamped so
    /// interactive overshoot and spring bounce stay visible.
    pub easing: Option<EasingFunction>,
}

impl FrameInterpolation {
    pub fn new(source: Rect, destination: Rect) -> Self {
        Self {
            source,
            destination,
            source_corner_radius: 0.0,
            destination_corner_radius: 0.0,
            easing: None,
        }
    }

    pub fn with_corner_radii(mut self, source: f64, destination: f64) -> Self {
        self.source_corner_radius = source;
        self.destination_corner_radius = destination;
        self
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = Some(easing);
        self
    }

    fn curve(&self, progress: f64) -> f64 {
        match self.easing {
            Some(easing) => easing.apply(progress),
            None => progress,
        }
    }

    pub fn frame_at(&self, progress: f64) -> Rect {
        self.source.lerp(&self.destination, self.curve(progress))
    }

    /// Corner radius at `progress`, never negative
    pub fn corner_radius_at(&self, progress: f64) -> f64 {
        self.source_corner_radius
            .lerp(&self.destination_corner_radius, self.curve(progress))
            .max(0.0)
    }
}
