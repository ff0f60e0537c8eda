use crate::{
    core::{constants::VELOCITY_SAMPLE_WINDOW_MS, geometry::Point},
    input::events::DragEvent,
    Result, TransitionError,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// One reading of a 1-D drag, relative to where it started
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSample {
    /// Signed distance travelled along the drag axis
    pub displacement: f64,
    /// Distance that corresponds to a full transition (container size)
    pub reference_extent: f64,
    /// Signed speed along the axis, in displacement units per second
    pub velocity: f64,
}

impl GestureSample {
    pub fn new(displacement: f64, reference_extent: f64) -> Self {
        Self {
            displacement,
            reference_extent,
            velocity: 0.0,
        }
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    /// Unclamped fraction of the reference extent covered by the drag
    pub fn raw_progress(&self) -> Result<f64> {
        self.validate()?;
        Ok(self.displacement / self.reference_extent)
    }

    /// Velocity expressed in progress units per second
    pub fn progress_velocity(&self) -> Result<f64> {
        self.validate()?;
        Ok(self.velocity / self.reference_extent)
    }

    fn validate(&self) -> Result<()> {
        if !(self.reference_extent.is_finite() && self.reference_extent > 0.0) {
            return Err(TransitionError::InvalidArgument(format!(
                "reference extent must be positive, got {}",
                self.reference_extent
            )));
        }
        if !self.displacement.is_finite() || !self.velocity.is_finite() {
            return Err(TransitionError::InvalidArgument(format!(
                "non-finite gesture sample {:?}",
                self
            )));
        }
        Ok(())
    }
}

/// Which component of pointer movement drives the transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragAxis {
    Horizontal,
    Vertical,
    /// Whichever component has the larger magnitude, keeping its sign
    Dominant,
}

impl DragAxis {
    pub fn project(&self, translation: &Point) -> f64 {
        match self {
            DragAxis::Horizontal => translation.x,
            DragAxis::Vertical => translation.y,
            DragAxis::Dominant => {
                if translation.x.abs() >= translation.y.abs() {
                    translation.x
                } else {
                    translation.y
                }
            }
        }
    }
}

/// Configuration for drag tracking
#[derive(Debug, Clone, PartialEq)]
pub struct DragConfig {
    pub axis: DragAxis,
    /// Distance that maps to full progress
    pub reference_extent: f64,
    /// Travel required before the drag counts as started (0 = immediately)
    pub minimum_distance: f64,
    /// Samples older than this are ignored when estimating velocity
    pub velocity_window: Duration,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            axis: DragAxis::Horizontal,
            reference_extent: 1.0,
            minimum_distance: 0.0,
            velocity_window: Duration::from_millis(VELOCITY_SAMPLE_WINDOW_MS),
        }
    }
}

/// What a raw pointer event means for a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate {
    /// The drag passed the minimum distance; begin the interaction
    Started(GestureSample),
    Changed(GestureSample),
    /// The pointer lifted after a started drag; end the interaction
    Ended(GestureSample),
    /// A started drag was taken away; revert the interaction
    Cancelled,
}

/// Turns raw pointer positions into `GestureSample`s along one axis and
/// estimates the release velocity from the most recent movement.
#[derive(Debug, Clone)]
pub struct DragTracker {
    pub enabled: bool,
    config: DragConfig,
    origin: Option<Point>,
    started: bool,
    history: VecDeque<(f64, f64)>,
}

impl DragTracker {
    pub fn new(axis: DragAxis, reference_extent: f64) -> Self {
        Self::with_config(DragConfig {
            axis,
            reference_extent,
            ..Default::default()
        })
    }

    pub fn with_config(config: DragConfig) -> Self {
        Self {
            enabled: true,
            config,
            origin: None,
            started: false,
            history: VecDeque::new(),
        }
    }

    /// Processes a pointer event and reports how the transition should react
    pub fn process(&mut self, event: DragEvent) -> Option<DragUpdate> {
        if !self.enabled {
            return None;
        }

        match event {
            DragEvent::Began { position, time } => {
                self.reset();
                self.origin = Some(position);
                self.record(0.0, time);
                self.start_if_far_enough(0.0)
            }
            DragEvent::Moved { position, time } => {
                let displacement = self.displacement_to(&position)?;
                self.record(displacement, time);
                if self.started {
                    Some(DragUpdate::Changed(self.sample(displacement)))
                } else {
                    self.start_if_far_enough(displacement)
                }
            }
            DragEvent::Ended { position, time } => {
                let displacement = self.displacement_to(&position)?;
                self.record(displacement, time);
                let update = self.started.then(|| {
                    DragUpdate::Ended(self.sample(displacement).with_velocity(self.velocity()))
                });
                self.reset();
                update
            }
            DragEvent::Cancelled => {
                let update = self.started.then_some(DragUpdate::Cancelled);
                self.reset();
                update
            }
        }
    }

    fn displacement_to(&self, position: &Point) -> Option<f64> {
        let origin = self.origin?;
        Some(self.config.axis.project(&position.subtract(&origin)))
    }

    fn start_if_far_enough(&mut self, displacement: f64) -> Option<DragUpdate> {
        if displacement.abs() >= self.config.minimum_distance {
            self.started = true;
            Some(DragUpdate::Started(self.sample(displacement)))
        } else {
            None
        }
    }

    fn sample(&self, displacement: f64) -> GestureSample {
        GestureSample::new(displacement, self.config.reference_extent)
    }

    fn record(&mut self, displacement: f64, time: f64) {
        self.history.push_back((time, displacement));
        let window = self.config.velocity_window.as_secs_f64();
        while let Some(&(oldest, _)) = self.history.front() {
            if time - oldest > window && self.history.len() > 2 {
                self.history.pop_front();
            } else {
                break;
            }
        }
    }

    /// Current speed along the axis, in units per second
    pub fn velocity(&self) -> f64 {
        match (self.history.front(), self.history.back()) {
            (Some(&(t0, d0)), Some(&(t1, d1))) if t1 > t0 => (d1 - d0) / (t1 - t0),
            _ => 0.0,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.started
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Resets all drag state
    pub fn reset(&mut self) {
        self.origin = None;
        self.started = false;
        self.history.clear();
    }
}
