//! Spring physics for settling a released transition
//!
//! The spring is solved in closed form rather than stepped, so a trajectory
//! depends only on elapsed effective time and not on how that time was split
//! into frames. Pausing and resuming therefore cannot drift the animation.

use crate::core::config::{SettleCriteria, SpringConfig};

/// Displacement from the rest point and velocity at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringState {
    pub displacement: f64,
    pub velocity: f64,
}

/// Evaluate a damped spring `t` seconds after it was released in `initial`.
///
/// Handles the underdamped, critically damped and overdamped regimes. The
/// parameters are assumed physical (positive stiffness, damping and mass).
pub fn solve(config: &SpringConfig, initial: SpringState, t: f64) -> SpringState {
    let x0 = initial.displacement;
    let v0 = initial.velocity;
    let omega = config.natural_frequency();
    let zeta = config.damping_ratio();

    if config.is_critically_damped() {
        let b = v0 + omega * x0;
        let decay = (-omega * t).exp();
        SpringState {
            displacement: decay * (x0 + b * t),
            velocity: decay * (b - omega * (x0 + b * t)),
        }
    } else if zeta < 1.0 {
        let decay_rate = zeta * omega;
        let omega_d = omega * (1.0 - zeta * zeta).sqrt();
        let b = (v0 + decay_rate * x0) / omega_d;
        let decay = (-decay_rate * t).exp();
        let (sin, cos) = (omega_d * t).sin_cos();
        SpringState {
            displacement: decay * (x0 * cos + b * sin),
            velocity: decay
                * ((b * omega_d - decay_rate * x0) * cos - (decay_rate * b + x0 * omega_d) * sin),
        }
    } else {
        let root = omega * (zeta * zeta - 1.0).sqrt();
        let r1 = -zeta * omega + root;
        let r2 = -zeta * omega - root;
        let c2 = (v0 - r1 * x0) / (r2 - r1);
        let c1 = x0 - c2;
        let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
        SpringState {
            displacement: c1 * e1 + c2 * e2,
            velocity: c1 * r1 * e1 + c2 * r2 * e2,
        }
    }
}

/// Physics state of one settling run
///
/// A run starts from a position and velocity, heads for a fixed target and is
/// advanced by absolute elapsed time since its start.
#[derive(Debug, Clone, Copy)]
pub struct SettlingIntegrator {
    config: SpringConfig,
    initial: SpringState,
    target: f64,
    elapsed: f64,
    position: f64,
    velocity: f64,
    running: bool,
}

impl SettlingIntegrator {
    pub fn new(config: SpringConfig) -> Self {
        Self {
            config,
            initial: SpringState {
                displacement: 0.0,
                velocity: 0.0,
            },
            target: 0.0,
            elapsed: 0.0,
            position: 0.0,
            velocity: 0.0,
            running: false,
        }
    }

    /// Begin a new run, discarding whatever run was in flight
    pub fn start(&mut self, position: f64, velocity: f64, target: f64) {
        self.initial = SpringState {
            displacement: position - target,
            velocity,
        };
        self.target = target;
        self.elapsed = 0.0;
        self.position = position;
        self.velocity = velocity;
        self.running = true;
    }

    /// Move the run to `elapsed` seconds after its start
    pub fn advance_to(&mut self, elapsed: f64) {
        if !self.running {
            return;
        }
        self.elapsed = elapsed.max(0.0);
        let state = solve(&self.config, self.initial, self.elapsed);
        self.position = self.target + state.displacement;
        self.velocity = state.velocity;
    }

    /// Pin the run at its target and stop it
    pub fn finish(&mut self) {
        self.position = self.target;
        self.velocity = 0.0;
        self.running = false;
    }

    /// Abandon the run where it is
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_within(&self, criteria: &SettleCriteria) -> bool {
        criteria.contains(self.position - self.target, self.velocity)
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SpringConfig) {
        self.config = config;
    }
}
