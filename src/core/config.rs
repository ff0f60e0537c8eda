//! Configuration system for transition physics and gesture behavior
//!
//! Controllers are configured through a [`ControllerConfig`], either built by
//! hand, resolved from a [`TransitionProfile`] preset, or loaded from JSON.

use crate::animation::spring::{solve, SpringState};
use crate::core::constants::{
    DEFAULT_COMMIT_THRESHOLD, DEFAULT_POSITION_EPSILON, DEFAULT_SETTLE_HOLD_SECS,
    DEFAULT_VELOCITY_EPSILON, MAX_SETTLING_DURATION_SECS,
};
use crate::{Result, TransitionError};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Step used when scanning a spring trajectory for its settling time.
const SETTLING_SCAN_STEP_SECS: f64 = 0.001;

/// Physical parameters of a damped spring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl SpringConfig {
    pub fn new(stiffness: f64, damping: f64, mass: f64) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Build a unit-mass spring from a perceptual duration and bounce.
    ///
    /// `bounce` of 0 is critically damped, positive values overshoot and
    /// negative values are overdamped. `bounce` must stay in (-1, 1).
    pub fn from_duration_bounce(duration: f64, bounce: f64) -> Self {
        let stiffness = (2.0 * PI / duration).powi(2);
        let damping = if bounce >= 0.0 {
            4.0 * PI * (1.0 - bounce) / duration
        } else {
            4.0 * PI / (duration * (1.0 + bounce))
        };
        Self::new(stiffness, damping, 1.0)
    }

    /// Build a unit-mass spring from a response time and damping fraction
    pub fn from_response(response: f64, damping_fraction: f64) -> Self {
        let stiffness = (2.0 * PI / response).powi(2);
        let damping = 4.0 * PI * damping_fraction / response;
        Self::new(stiffness, damping, 1.0)
    }

    /// Quick completion with a small overshoot. Default completion spring.
    pub fn snappy() -> Self {
        Self::from_duration_bounce(0.5, 0.15)
    }

    /// No overshoot, same pace as `snappy`
    pub fn smooth() -> Self {
        Self::from_duration_bounce(0.5, 0.0)
    }

    /// Visible overshoot for playful transitions
    pub fn bouncy() -> Self {
        Self::from_duration_bounce(0.5, 0.3)
    }

    /// Classic stiffness/damping spring used for sheets and pagers
    pub fn interpolating() -> Self {
        Self::new(170.0, 15.0, 1.0)
    }

    /// Very short response used while tracking a finger
    pub fn interactive() -> Self {
        Self::from_response(0.15, 0.86)
    }

    /// Critically damped spring settling in roughly `duration` seconds
    pub fn critically_damped(duration: f64) -> Self {
        Self::from_duration_bounce(duration, 0.0)
    }

    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    pub fn critical_damping(&self) -> f64 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Ratio of actual to critical damping (zeta)
    pub fn damping_ratio(&self) -> f64 {
        self.damping / self.critical_damping()
    }

    pub fn is_underdamped(&self) -> bool {
        self.damping_ratio() < 1.0 - 1e-9
    }

    pub fn is_critically_damped(&self) -> bool {
        (self.damping_ratio() - 1.0).abs() <= 1e-9
    }

    pub fn is_overdamped(&self) -> bool {
        self.damping_ratio() > 1.0 + 1e-9
    }

    /// Time after which a unit displacement released at rest stays within
    /// `criteria`. `None` if that does not happen within
    /// [`MAX_SETTLING_DURATION_SECS`] or the parameters are not physical.
    pub fn settling_duration(&self, criteria: &SettleCriteria) -> Option<f64> {
        if self.check_physical().is_err() {
            return None;
        }

        let initial = SpringState {
            displacement: -1.0,
            velocity: 0.0,
        };
        let steps = (MAX_SETTLING_DURATION_SECS / SETTLING_SCAN_STEP_SECS).ceil() as usize;
        let mut last_outside: Option<f64> = None;
        let mut inside_at_end = false;

        for step in 0..=steps {
            let t = step as f64 * SETTLING_SCAN_STEP_SECS;
            let state = solve(self, initial, t);
            inside_at_end = criteria.contains(state.displacement, state.velocity);
            if !inside_at_end {
                last_outside = Some(t);
            }
        }

        if !inside_at_end {
            return None;
        }
        Some(last_outside.map_or(0.0, |t| t + SETTLING_SCAN_STEP_SECS))
    }

    fn check_physical(&self) -> Result<()> {
        if !(self.stiffness.is_finite() && self.stiffness > 0.0) {
            return Err(TransitionError::Configuration(format!(
                "spring stiffness must be positive, got {}",
                self.stiffness
            )));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(TransitionError::Configuration(format!(
                "spring mass must be positive, got {}",
                self.mass
            )));
        }
        if !(self.damping.is_finite() && self.damping > 0.0) {
            return Err(TransitionError::Configuration(format!(
                "spring damping must be positive to converge, got {}",
                self.damping
            )));
        }
        Ok(())
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::snappy()
    }
}

/// When a settling spring counts as arrived
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettleCriteria {
    /// Maximum distance from the target, in progress units
    pub position_epsilon: f64,
    /// Maximum speed, in progress units per second
    pub velocity_epsilon: f64,
    /// Effective seconds both conditions must hold before settling
    pub hold_duration: f64,
}

impl SettleCriteria {
    pub fn contains(&self, displacement: f64, velocity: f64) -> bool {
        displacement.abs() <= self.position_epsilon && velocity.abs() <= self.velocity_epsilon
    }
}

impl Default for SettleCriteria {
    fn default() -> Self {
        Self {
            position_epsilon: DEFAULT_POSITION_EPSILON,
            velocity_epsilon: DEFAULT_VELOCITY_EPSILON,
            hold_duration: DEFAULT_SETTLE_HOLD_SECS,
        }
    }
}

/// Everything a `ProgressDrivenTransitionController` needs to know
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Spring that completes the transition once input ends
    pub spring: SpringConfig,
    pub settle: SettleCriteria,
    /// Released progress at or above this commits; ties commit
    pub commit_threshold: f64,
    /// Seed the completion spring with the release velocity instead of zero
    pub carry_release_velocity: bool,
    /// Release speed (progress units per second) that decides the outcome
    /// on its own, regardless of `commit_threshold`
    pub flick_velocity: Option<f64>,
}

impl ControllerConfig {
    pub fn with_spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }

    pub fn with_commit_threshold(mut self, threshold: f64) -> Self {
        self.commit_threshold = threshold;
        self
    }

    pub fn with_settle(mut self, settle: SettleCriteria) -> Self {
        self.settle = settle;
        self
    }

    pub fn with_release_velocity(mut self, carry: bool) -> Self {
        self.carry_release_velocity = carry;
        self
    }

    pub fn with_flick_velocity(mut self, flick_velocity: Option<f64>) -> Self {
        self.flick_velocity = flick_velocity;
        self
    }

    /// Reject parameters that would leave a controller stuck or meaningless
    pub fn validate(&self) -> Result<()> {
        self.spring.check_physical()?;

        let settle = &self.settle;
        if !(settle.position_epsilon.is_finite() && settle.position_epsilon > 0.0)
            || !(settle.velocity_epsilon.is_finite() && settle.velocity_epsilon > 0.0)
        {
            return Err(TransitionError::Configuration(
                "settle epsilons must be positive".to_string(),
            ));
        }
        if !(settle.hold_duration.is_finite() && settle.hold_duration >= 0.0) {
            return Err(TransitionError::Configuration(format!(
                "settle hold duration must be non-negative, got {}",
                settle.hold_duration
            )));
        }

        if !(self.commit_threshold > 0.0 && self.commit_threshold < 1.0) {
            return Err(TransitionError::Configuration(format!(
                "commit threshold must lie in (0, 1), got {}",
                self.commit_threshold
            )));
        }

        if let Some(flick) = self.flick_velocity {
            if !(flick.is_finite() && flick > 0.0) {
                return Err(TransitionError::Configuration(format!(
                    "flick velocity must be positive, got {}",
                    flick
                )));
            }
        }

        if self.spring.settling_duration(settle).is_none() {
            return Err(TransitionError::Configuration(format!(
                "spring {:?} does not settle within {}s",
                self.spring, MAX_SETTLING_DURATION_SECS
            )));
        }

        Ok(())
    }

    /// Upper bound on how long a release takes to settle, hold included
    pub fn max_settle_time(&self) -> Option<f64> {
        self.spring
            .settling_duration(&self.settle)
            .map(|duration| duration + self.settle.hold_duration)
    }

    /// Load and validate a configuration from JSON. Missing fields fall back
    /// to the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ControllerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            spring: SpringConfig::default(),
            settle: SettleCriteria::default(),
            commit_threshold: DEFAULT_COMMIT_THRESHOLD,
            carry_release_velocity: false,
            flick_velocity: None,
        }
    }
}

/// Named presets for common transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransitionProfile {
    Snappy,
    Smooth,
    Bouncy,
    /// Sheet and pager feel: interpolating spring, flicks honored
    Sheet,
    Custom(ControllerConfig),
}

impl TransitionProfile {
    pub fn resolve(&self) -> ControllerConfig {
        match self {
            Self::Snappy => ControllerConfig::default(),
            Self::Smooth => ControllerConfig::default().with_spring(SpringConfig::smooth()),
            Self::Bouncy => ControllerConfig::default().with_spring(SpringConfig::bouncy()),
            Self::Sheet => ControllerConfig::default()
                .with_spring(SpringConfig::interpolating())
                .with_release_velocity(true)
                .with_flick_velocity(Some(2.0)),
            Self::Custom(config) => config.clone(),
        }
    }

    /// Parse a profile name as used on command lines
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "snappy" => Some(Self::Snappy),
            "smooth" => Some(Self::Smooth),
            "bouncy" => Some(Self::Bouncy),
            "sheet" => Some(Self::Sheet),
            _ => None,
        }
    }
}

impl Default for TransitionProfile {
    fn default() -> Self {
        Self::Snappy
    }
}
