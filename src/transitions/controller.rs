//! Progress-driven transition controller
//!
//! A controller owns one transition between two states ("off" and "on").
//! A drag drives its progress directly; on release it decides whether to
//! commit or cancel and hands off to a spring that settles the progress on
//! the chosen endpoint. Settling can be paused, and a new drag can grab the
//! transition mid-flight without a visual jump.
//!
//! The controller owns no clock and no threads: the caller feeds it gesture
//! samples and calls [`ProgressDrivenTransitionController::tick`] once per
//! frame.
//!
//! ```
//! use interactive_transitions::prelude::*;
//!
//! let mut controller = ProgressDrivenTransitionController::new(ControllerConfig::default())?;
//! controller.begin_interaction(false)?;
//! controller.update_interaction(GestureSample::new(40.0, 100.0))?;
//! let committed = controller.end_interaction(GestureSample::new(60.0, 100.0))?;
//! assert!(committed);
//!
//! while controller.mode() == Mode::Settling {
//!     controller.tick(1.0 / 60.0)?;
//! }
//! assert_eq!(controller.value(), 1.0);
//! # Ok::<(), interactive_transitions::TransitionError>(())
//! ```

use crate::{
    animation::{clock::PauseClock, spring::SettlingIntegrator},
    core::config::{ControllerConfig, TransitionProfile},
    input::{
        events::TransitionEvent,
        gestures::{DragUpdate, GestureSample},
    },
    Result, TransitionError,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who is driving the progress value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// At rest on 0 or 1
    Idle,
    /// Following a live drag
    Interactive,
    /// Released, a spring is carrying the value to its endpoint
    Settling,
}

/// Which way the current transition goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Turning the state on (opening, presenting)
    Forward,
    /// Turning the state off (closing, dismissing)
    Reversed,
}

impl Direction {
    /// Direction of a transition that starts from `is_on`
    pub fn from_state(is_on: bool) -> Self {
        if is_on {
            Direction::Reversed
        } else {
            Direction::Forward
        }
    }

    /// Sign applied to drag displacement so the transition's own drag
    /// always increases progress
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reversed => -1.0,
        }
    }

    /// Progress in this direction → position in the fixed off/on frame
    pub fn position(&self, value: f64) -> f64 {
        match self {
            Direction::Forward => value,
            Direction::Reversed => 1.0 - value,
        }
    }

    /// Position in the fixed off/on frame → progress in this direction
    pub fn progress(&self, position: f64) -> f64 {
        // The mapping is its own inverse.
        self.position(position)
    }
}

/// Snapshot of a controller, read by the rendering layer each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionProgress {
    /// Fraction complete of the current transition. Not clamped while
    /// interactive.
    pub value: f64,
    pub mode: Mode,
    pub direction: Direction,
}

impl TransitionProgress {
    /// The value in the fixed frame where 0 is "off" and 1 is "on"
    pub fn position(&self) -> f64 {
        self.direction.position(self.value)
    }

    pub fn is_idle(&self) -> bool {
        self.mode == Mode::Idle
    }
}

pub type TransitionListener = Box<dyn Fn(&TransitionEvent) + Send + Sync>;

/// Drives one two-state transition from a drag, then settles it physically.
pub struct ProgressDrivenTransitionController {
    config: ControllerConfig,
    value: f64,
    mode: Mode,
    direction: Direction,
    /// Progress the current drag started from
    resume_value: f64,
    committed: bool,
    integrator: SettlingIntegrator,
    clock: PauseClock,
    /// Effective time at which the current settle started
    settle_started_at: f64,
    /// Settle-relative time at which the spring last entered the epsilons
    within_since: Option<f64>,
    listeners: Vec<TransitionListener>,
}

impl ProgressDrivenTransitionController {
    /// Create an idle controller for a state that is currently off
    pub fn new(config: ControllerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            integrator: SettlingIntegrator::new(config.spring),
            config,
            value: 0.0,
            mode: Mode::Idle,
            direction: Direction::Forward,
            resume_value: 0.0,
            committed: false,
            clock: PauseClock::new(),
            settle_started_at: 0.0,
            within_since: None,
            listeners: Vec::new(),
        })
    }

    pub fn with_profile(profile: TransitionProfile) -> Result<Self> {
        Self::new(profile.resolve())
    }

    /// Start from a state that is currently on
    pub fn with_initial_state(mut self, is_on: bool) -> Self {
        self.direction = Direction::from_state(is_on);
        self.value = 0.0;
        self.resume_value = 0.0;
        self
    }

    /// Listen to every event
    pub fn on_event<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TransitionEvent) + Send + Sync + 'static,
    {
        self.add_listener(callback);
        self
    }

    /// Called as soon as a release (or toggle) commits
    pub fn on_commit<F>(self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_event(move |event| {
            if matches!(event, TransitionEvent::Committed) {
                callback();
            }
        })
    }

    /// Called as soon as a release cancels
    pub fn on_cancel<F>(self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_event(move |event| {
            if matches!(event, TransitionEvent::Cancelled) {
                callback();
            }
        })
    }

    /// Called once per settle, with whether it ended on the committed side
    pub fn on_settled<F>(self, callback: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.on_event(move |event| {
            if let TransitionEvent::Settled { committed } = event {
                callback(*committed);
            }
        })
    }

    /// Called when a new drag or toggle abandons a settle in flight
    pub fn on_interrupted<F>(self, callback: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.on_event(move |event| {
            if let TransitionEvent::Interrupted { value } = event {
                callback(*value);
            }
        })
    }

    pub fn add_listener<F>(&mut self, callback: F)
    where
        F: Fn(&TransitionEvent) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(callback));
    }

    /// Start following a drag.
    ///
    /// `current_state` is the caller's discrete state: when it is on, the
    /// drag is an attempt to turn it off. Grabbing a settling transition
    /// abandons the settle and continues from where the spring was.
    pub fn begin_interaction(&mut self, current_state: bool) -> Result<()> {
        match self.mode {
            Mode::Interactive => return Err(self.invalid_state("begin_interaction")),
            Mode::Settling => self.interrupt_settle(),
            Mode::Idle => {}
        }

        self.rebase(Direction::from_state(current_state));
        self.resume_value = self.value;
        self.mode = Mode::Interactive;

        #[cfg(feature = "debug")]
        log::debug!(
            "interaction began {:?} from value {:.4}",
            self.direction,
            self.resume_value
        );

        Ok(())
    }

    /// Follow the drag. The value is not clamped; overshoot is the
    /// renderer's business.
    pub fn update_interaction(&mut self, sample: GestureSample) -> Result<TransitionProgress> {
        if self.mode != Mode::Interactive {
            return Err(self.invalid_state("update_interaction"));
        }

        self.value = self.interactive_value(&sample)?;
        Ok(self.progress())
    }

    /// Release the drag. Returns whether the transition commits, so discrete
    /// application state can be updated before the spring finishes.
    pub fn end_interaction(&mut self, final_sample: GestureSample) -> Result<bool> {
        if self.mode != Mode::Interactive {
            return Err(self.invalid_state("end_interaction"));
        }

        let value = self.interactive_value(&final_sample)?;
        let release_velocity = self.direction.sign() * final_sample.progress_velocity()?;
        self.value = value;

        let mut committed = value >= self.config.commit_threshold;
        if let Some(flick) = self.config.flick_velocity {
            if release_velocity >= flick {
                committed = true;
            } else if release_velocity <= -flick {
                committed = false;
            }
        }

        let initial_velocity = if self.config.carry_release_velocity {
            release_velocity
        } else {
            0.0
        };

        #[cfg(feature = "debug")]
        log::debug!(
            "interaction ended at {:.4} (velocity {:.3}/s): {}",
            value,
            release_velocity,
            if committed { "commit" } else { "cancel" }
        );

        self.start_settling(committed, initial_velocity);
        Ok(committed)
    }

    /// Revert a drag that the platform took away
    pub fn cancel_interaction(&mut self) -> Result<()> {
        if self.mode != Mode::Interactive {
            return Err(self.invalid_state("cancel_interaction"));
        }
        self.start_settling(false, 0.0);
        Ok(())
    }

    /// Programmatic transition away from `current_state`, with no drag.
    /// Redirects a settle in flight, keeping its velocity.
    pub fn toggle(&mut self, current_state: bool) -> Result<()> {
        let carried_velocity = match self.mode {
            Mode::Interactive => return Err(self.invalid_state("toggle")),
            Mode::Settling => {
                let velocity = self.integrator.velocity();
                self.interrupt_settle();
                velocity
            }
            Mode::Idle => 0.0,
        };

        let previous = self.direction;
        self.rebase(Direction::from_state(current_state));
        let velocity = if previous == self.direction {
            carried_velocity
        } else {
            -carried_velocity
        };

        self.start_settling(true, velocity);
        Ok(())
    }

    /// Drop whatever is happening and rest at the start of a transition
    /// away from `is_on`
    pub fn reset(&mut self, is_on: bool) {
        if self.mode == Mode::Settling {
            self.interrupt_settle();
        }
        self.integrator.stop();
        self.mode = Mode::Idle;
        self.direction = Direction::from_state(is_on);
        self.value = 0.0;
        self.resume_value = 0.0;
        self.within_since = None;
    }

    /// Advance time by `delta_time` seconds of wall time.
    ///
    /// Only a settling transition moves; in other modes the call just keeps
    /// the clock in step with the frame loop.
    pub fn tick(&mut self, delta_time: f64) -> Result<TransitionProgress> {
        if !(delta_time.is_finite() && delta_time >= 0.0) {
            return Err(TransitionError::InvalidArgument(format!(
                "frame delta must be finite and non-negative, got {}",
                delta_time
            )));
        }

        self.clock.advance(delta_time);
        if self.mode == Mode::Settling {
            self.advance_settle();
        }
        Ok(self.progress())
    }

    /// Freeze or resume settling. Valid in any mode.
    pub fn set_paused(&mut self, paused: bool) {
        if paused != self.clock.is_paused() {
            #[cfg(feature = "debug")]
            log::debug!(
                "{} at effective time {:.4}",
                if paused { "paused" } else { "resumed" },
                self.clock.effective_time()
            );
        }
        self.clock.set_paused(paused);
    }

    /// Swap the configuration. Not allowed mid-settle, since the running
    /// spring would jump.
    pub fn set_config(&mut self, config: ControllerConfig) -> Result<()> {
        if self.mode == Mode::Settling {
            return Err(self.invalid_state("set_config"));
        }
        config.validate()?;
        self.integrator.set_config(config.spring);
        self.config = config;
        Ok(())
    }

    /// Feed a tracker update straight into the controller. Returns the
    /// commit decision when the drag ends.
    ///
    /// A drag that restarts while one is already being followed (a second
    /// pointer-down) continues from the current value in the same direction.
    pub fn handle_drag(&mut self, update: DragUpdate, current_state: bool) -> Result<Option<bool>> {
        match update {
            DragUpdate::Started(sample) => {
                if self.mode == Mode::Interactive {
                    self.resume_value = self.value;
                } else {
                    self.begin_interaction(current_state)?;
                }
                self.update_interaction(sample)?;
                Ok(None)
            }
            DragUpdate::Changed(sample) => {
                self.update_interaction(sample)?;
                Ok(None)
            }
            DragUpdate::Ended(sample) => self.end_interaction(sample).map(Some),
            DragUpdate::Cancelled => {
                self.cancel_interaction()?;
                Ok(None)
            }
        }
    }

    pub fn progress(&self) -> TransitionProgress {
        TransitionProgress {
            value: self.value,
            mode: self.mode,
            direction: self.direction,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn position(&self) -> f64 {
        self.direction.position(self.value)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Endpoint of the settle in flight
    pub fn target(&self) -> Option<f64> {
        (self.mode == Mode::Settling).then(|| self.integrator.target())
    }

    /// Whether the settle in flight is completing the transition
    pub fn pending_commit(&self) -> Option<bool> {
        (self.mode == Mode::Settling).then_some(self.committed)
    }

    /// Spring velocity in progress units per second (zero unless settling)
    pub fn velocity(&self) -> f64 {
        if self.mode == Mode::Settling {
            self.integrator.velocity()
        } else {
            0.0
        }
    }

    /// Animation time seen so far, excluding pauses
    pub fn effective_time(&self) -> f64 {
        self.clock.effective_time()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    fn interactive_value(&self, sample: &GestureSample) -> Result<f64> {
        Ok(self.resume_value + self.direction.sign() * sample.raw_progress()?)
    }

    /// Re-express the current value in `direction`'s frame, keeping the
    /// on-screen position where it is
    fn rebase(&mut self, direction: Direction) {
        let position = self.direction.position(self.value);
        self.direction = direction;
        self.value = direction.progress(position);
    }

    fn start_settling(&mut self, committed: bool, velocity: f64) {
        let target = if committed { 1.0 } else { 0.0 };
        self.integrator.start(self.value, velocity, target);
        self.committed = committed;
        self.settle_started_at = self.clock.effective_time();
        self.within_since = None;
        self.mode = Mode::Settling;

        self.emit(if committed {
            TransitionEvent::Committed
        } else {
            TransitionEvent::Cancelled
        });
    }

    fn advance_settle(&mut self) {
        let elapsed = self.clock.effective_time() - self.settle_started_at;
        self.integrator.advance_to(elapsed);
        self.value = self.integrator.position();

        if self.integrator.is_within(&self.config.settle) {
            let since = *self.within_since.get_or_insert(elapsed);
            if elapsed - since >= self.config.settle.hold_duration {
                self.finish_settling();
            }
        } else {
            self.within_since = None;
        }
    }

    fn finish_settling(&mut self) {
        self.integrator.finish();
        self.value = self.integrator.target();
        self.mode = Mode::Idle;
        self.within_since = None;

        #[cfg(feature = "debug")]
        log::debug!(
            "settled at {} after {:.3}s",
            self.value,
            self.integrator.elapsed()
        );

        self.emit(TransitionEvent::Settled {
            committed: self.committed,
        });
    }

    fn interrupt_settle(&mut self) {
        self.integrator.stop();
        self.within_since = None;

        #[cfg(feature = "debug")]
        log::debug!("settle interrupted at {:.4}", self.value);

        self.emit(TransitionEvent::Interrupted { value: self.value });
    }

    fn invalid_state(&self, operation: &'static str) -> TransitionError {
        #[cfg(feature = "debug")]
        log::warn!("{} called while {:?}", operation, self.mode);

        TransitionError::InvalidState {
            operation,
            mode: self.mode,
        }
    }

    fn emit(&self, event: TransitionEvent) {
        for listener in &self.listeners {
            listener(&event);
        }
    }
}

impl fmt::Debug for ProgressDrivenTransitionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressDrivenTransitionController")
            .field("value", &self.value)
            .field("mode", &self.mode)
            .field("direction", &self.direction)
            .field("paused", &self.clock.is_paused())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{config::SpringConfig, geometry::Point},
        input::{
            events::DragEvent,
            gestures::{DragAxis, DragTracker},
        },
    };
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    const DT: f64 = 1.0 / 60.0;

    fn controller() -> ProgressDrivenTransitionController {
        ProgressDrivenTransitionController::new(ControllerConfig::default()).unwrap()
    }

    fn sample(displacement: f64) -> GestureSample {
        GestureSample::new(displacement, 100.0)
    }

    fn settle(controller: &mut ProgressDrivenTransitionController) -> usize {
        let mut ticks = 0;
        while controller.mode() == Mode::Settling {
            controller.tick(DT).unwrap();
            ticks += 1;
            assert!(ticks < 10_000, "spring never settled");
        }
        ticks
    }

    #[test]
    fn test_interaction_does_not_clamp() {
        let mut controller = controller();
        controller.begin_interaction(false).unwrap();

        let over = controller.update_interaction(sample(250.0)).unwrap();
        assert_eq!(over.value, 2.5);
        assert_eq!(over.mode, Mode::Interactive);

        let under = controller.update_interaction(sample(-130.0)).unwrap();
        assert!((under.value + 1.3).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_tie_commits() {
        let mut controller = controller();
        controller.begin_interaction(false).unwrap();
        assert!(controller.end_interaction(sample(50.0)).unwrap());
        assert_eq!(controller.target(), Some(1.0));
    }

    #[test]
    fn test_threshold_edges() {
        let mut below = controller();
        below.begin_interaction(false).unwrap();
        assert!(!below
            .end_interaction(GestureSample::new(0.49999, 1.0))
            .unwrap());
        assert_eq!(below.target(), Some(0.0));

        let mut above = controller();
        above.begin_interaction(false).unwrap();
        assert!(above
            .end_interaction(GestureSample::new(0.50001, 1.0))
            .unwrap());
    }

    #[test]
    fn test_reversed_direction_flips_drag() {
        let mut controller = controller().with_initial_state(true);
        controller.begin_interaction(true).unwrap();
        assert_eq!(controller.direction(), Direction::Reversed);

        let progress = controller.update_interaction(sample(-30.0)).unwrap();
        assert!((progress.value - 0.3).abs() < 1e-12);
        assert!((progress.position() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_operations_outside_interaction_fail() {
        let mut controller = controller();
        assert!(matches!(
            controller.update_interaction(sample(10.0)),
            Err(TransitionError::InvalidState {
                mode: Mode::Idle,
                ..
            })
        ));
        assert!(controller.end_interaction(sample(10.0)).is_err());
        assert!(controller.cancel_interaction().is_err());

        controller.begin_interaction(false).unwrap();
        assert!(matches!(
            controller.begin_interaction(false),
            Err(TransitionError::InvalidState {
                mode: Mode::Interactive,
                ..
            })
        ));
        assert!(controller.toggle(false).is_err());

        controller.end_interaction(sample(80.0)).unwrap();
        assert!(controller.update_interaction(sample(10.0)).is_err());
        assert!(controller.set_config(ControllerConfig::default()).is_err());
    }

    #[test]
    fn test_tick_rejects_bad_delta() {
        let mut controller = controller();
        assert!(controller.tick(-0.1).is_err());
        assert!(controller.tick(f64::NAN).is_err());
        assert!(controller.tick(0.0).is_ok());
    }

    #[test]
    fn test_bad_sample_is_rejected_without_state_change() {
        let mut controller = controller();
        controller.begin_interaction(false).unwrap();
        controller.update_interaction(sample(20.0)).unwrap();
        assert!(controller
            .update_interaction(GestureSample::new(10.0, 0.0))
            .is_err());
        assert_eq!(controller.value(), 0.2);
        assert_eq!(controller.mode(), Mode::Interactive);
    }

    #[test]
    fn test_settled_fires_exactly_once() {
        let settled = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&settled);
        let mut controller = controller().on_settled(move |committed| {
            assert!(committed);
            counter.fetch_add(1, Ordering::SeqCst);
        });

        controller.begin_interaction(false).unwrap();
        controller.end_interaction(sample(70.0)).unwrap();
        settle(&mut controller);
        for _ in 0..120 {
            controller.tick(DT).unwrap();
        }

        assert_eq!(settled.load(Ordering::SeqCst), 1);
        assert_eq!(controller.value(), 1.0);
        assert_eq!(controller.mode(), Mode::Idle);
    }

    #[test]
    fn test_cancel_settles_back_to_zero() {
        let mut controller = controller();
        controller.begin_interaction(false).unwrap();
        assert!(!controller.end_interaction(sample(30.0)).unwrap());
        settle(&mut controller);
        assert_eq!(controller.value(), 0.0);
        assert_eq!(controller.position(), 0.0);
    }

    #[test]
    fn test_regrab_mid_settle_is_continuous() {
        let interrupted = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&interrupted);
        let mut controller = controller().on_interrupted(move |value| {
            sink.lock().unwrap().push(value);
        });

        controller.begin_interaction(false).unwrap();
        controller.end_interaction(sample(30.0)).unwrap();
        for _ in 0..5 {
            controller.tick(DT).unwrap();
        }
        let v = controller.value();
        assert!(v > 0.0 && v < 0.3);

        controller.begin_interaction(false).unwrap();
        let progress = controller.update_interaction(sample(0.0)).unwrap();
        assert!((progress.value - v).abs() < 1e-12);
        assert_eq!(interrupted.lock().unwrap().as_slice(), &[v]);

        let progress = controller.update_interaction(sample(10.0)).unwrap();
        assert!((progress.value - (v + 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_regrab_in_opposite_direction_keeps_position() {
        let mut controller = controller();
        controller.begin_interaction(false).unwrap();
        let committed = controller.end_interaction(sample(60.0)).unwrap();
        for _ in 0..4 {
            controller.tick(DT).unwrap();
        }
        let position = controller.position();

        // The caller flipped its state when the release committed
        controller.begin_interaction(committed).unwrap();
        let progress = controller.update_interaction(sample(0.0)).unwrap();
        assert_eq!(progress.direction, Direction::Reversed);
        assert!((progress.position() - position).abs() < 1e-12);
    }

    #[test]
    fn test_next_interaction_starts_from_zero_after_commit() {
        let mut controller = controller();
        controller.begin_interaction(false).unwrap();
        controller.end_interaction(sample(90.0)).unwrap();
        settle(&mut controller);

        controller.begin_interaction(true).unwrap();
        assert_eq!(controller.value(), 0.0);
        assert_eq!(controller.position(), 1.0);
    }

    #[test]
    fn test_pause_freezes_settle() {
        let mut controller = controller();
        controller.begin_interaction(false).unwrap();
        controller.end_interaction(sample(60.0)).unwrap();
        controller.tick(DT).unwrap();

        controller.set_paused(true);
        let frozen = controller.value();
        for _ in 0..600 {
            controller.tick(DT).unwrap();
        }
        assert_eq!(controller.value(), frozen);
        assert_eq!(controller.mode(), Mode::Settling);

        controller.set_paused(false);
        settle(&mut controller);
        assert_eq!(controller.value(), 1.0);
    }

    #[test]
    fn test_zero_length_pauses_do_not_change_trajectory() {
        let run = |toggles: usize| {
            let mut controller = controller();
            controller.begin_interaction(false).unwrap();
            controller.end_interaction(sample(55.0)).unwrap();
            let mut values = Vec::new();
            for _ in 0..30 {
                for _ in 0..toggles {
                    controller.set_paused(true);
                    controller.set_paused(false);
                }
                values.push(controller.tick(DT).unwrap().value);
            }
            values
        };
        assert_eq!(run(0), run(7));
    }

    #[test]
    fn test_toggle_commits_without_drag() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let mut controller = controller().on_event(move |event| {
            sink.lock().unwrap().push(*event);
        });

        controller.toggle(false).unwrap();
        assert_eq!(controller.pending_commit(), Some(true));
        settle(&mut controller);

        assert_eq!(controller.position(), 1.0);
        assert_eq!(
            events.lock().unwrap().as_slice(),
            &[
                TransitionEvent::Committed,
                TransitionEvent::Settled { committed: true }
            ]
        );
    }

    #[test]
    fn test_toggle_mid_settle_reverses_smoothly() {
        let mut controller = controller();
        controller.toggle(false).unwrap();
        for _ in 0..6 {
            controller.tick(DT).unwrap();
        }
        let position = controller.position();
        let velocity = controller.velocity();
        assert!(velocity > 0.0);

        controller.toggle(true).unwrap();
        assert_eq!(controller.direction(), Direction::Reversed);
        assert!((controller.position() - position).abs() < 1e-12);
        // Still moving towards "on" in the fixed frame right after the flip
        assert!((controller.velocity() + velocity).abs() < 1e-12);

        settle(&mut controller);
        assert_eq!(controller.position(), 0.0);
    }

    #[test]
    fn test_release_velocity_is_opt_in() {
        let flick = GestureSample::new(20.0, 100.0).with_velocity(400.0);

        let mut plain = controller();
        plain.begin_interaction(false).unwrap();
        assert!(!plain.end_interaction(flick).unwrap());
        assert_eq!(plain.velocity(), 0.0);

        let config = ControllerConfig::default()
            .with_release_velocity(true)
            .with_flick_velocity(Some(2.0));
        let mut aware = ProgressDrivenTransitionController::new(config).unwrap();
        aware.begin_interaction(false).unwrap();
        assert!(aware.end_interaction(flick).unwrap());
        assert_eq!(aware.velocity(), 4.0);
    }

    #[test]
    fn test_backward_flick_cancels_past_threshold() {
        let config = ControllerConfig::default().with_flick_velocity(Some(1.0));
        let mut controller = ProgressDrivenTransitionController::new(config).unwrap();
        controller.begin_interaction(false).unwrap();
        let release = GestureSample::new(80.0, 100.0).with_velocity(-300.0);
        assert!(!controller.end_interaction(release).unwrap());
    }

    #[test]
    fn test_reset_interrupts_and_rests() {
        let interrupted = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&interrupted);
        let mut controller = controller().on_interrupted(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        controller.toggle(false).unwrap();
        controller.tick(DT).unwrap();
        controller.reset(true);

        assert_eq!(interrupted.load(Ordering::SeqCst), 1);
        assert_eq!(controller.mode(), Mode::Idle);
        assert_eq!(controller.direction(), Direction::Reversed);
        assert_eq!(controller.value(), 0.0);
    }

    #[test]
    fn test_handle_drag_sequence() {
        let mut controller = controller();
        assert_eq!(
            controller
                .handle_drag(DragUpdate::Started(sample(10.0)), false)
                .unwrap(),
            None
        );
        controller
            .handle_drag(DragUpdate::Changed(sample(45.0)), false)
            .unwrap();
        assert_eq!(controller.value(), 0.45);
        assert_eq!(
            controller
                .handle_drag(DragUpdate::Ended(sample(65.0)), false)
                .unwrap(),
            Some(true)
        );
    }

    #[test]
    fn test_cancel_interaction_settles_back() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let mut controller = controller().on_event(move |event| {
            sink.lock().unwrap().push(*event);
        });

        controller.begin_interaction(false).unwrap();
        controller.update_interaction(sample(70.0)).unwrap();
        controller.cancel_interaction().unwrap();
        assert_eq!(controller.mode(), Mode::Settling);
        assert_eq!(controller.target(), Some(0.0));
        assert_eq!(controller.pending_commit(), Some(false));

        settle(&mut controller);
        assert_eq!(controller.value(), 0.0);
        assert_eq!(
            events.lock().unwrap().as_slice(),
            &[
                TransitionEvent::Cancelled,
                TransitionEvent::Settled { committed: false }
            ]
        );
    }

    #[test]
    fn test_tracker_cancel_reverts_drag() {
        let mut tracker = DragTracker::new(DragAxis::Horizontal, 100.0);
        let mut controller = controller();
        let events = [
            DragEvent::Began {
                position: Point::new(0.0, 0.0),
                time: 0.0,
            },
            DragEvent::Moved {
                position: Point::new(70.0, 0.0),
                time: 0.1,
            },
            DragEvent::Cancelled,
        ];
        for event in events {
            if let Some(update) = tracker.process(event) {
                assert_eq!(controller.handle_drag(update, false).unwrap(), None);
            }
        }

        assert_eq!(controller.mode(), Mode::Settling);
        assert_eq!(controller.value(), 0.7);
        settle(&mut controller);
        assert_eq!(controller.value(), 0.0);
    }

    #[test]
    fn test_restarted_drag_continues_from_current_value() {
        let mut tracker = DragTracker::new(DragAxis::Horizontal, 100.0);
        let mut controller = controller();
        let mut feed = |controller: &mut ProgressDrivenTransitionController, event| {
            if let Some(update) = tracker.process(event) {
                controller.handle_drag(update, false).unwrap();
            }
        };

        feed(
            &mut controller,
            DragEvent::Began {
                position: Point::new(0.0, 0.0),
                time: 0.0,
            },
        );
        feed(
            &mut controller,
            DragEvent::Moved {
                position: Point::new(40.0, 0.0),
                time: 0.1,
            },
        );
        assert_eq!(controller.value(), 0.4);

        // A second pointer-down without a lift in between
        feed(
            &mut controller,
            DragEvent::Began {
                position: Point::new(50.0, 0.0),
                time: 0.2,
            },
        );
        assert_eq!(controller.mode(), Mode::Interactive);
        assert_eq!(controller.value(), 0.4);

        feed(
            &mut controller,
            DragEvent::Moved {
                position: Point::new(60.0, 0.0),
                time: 0.3,
            },
        );
        assert!((controller.value() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_reset_during_drag_is_not_an_interruption() {
        let interrupted = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&interrupted);
        let mut controller = controller().on_interrupted(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        controller.begin_interaction(false).unwrap();
        controller.update_interaction(sample(30.0)).unwrap();
        controller.reset(false);

        assert_eq!(interrupted.load(Ordering::SeqCst), 0);
        assert_eq!(controller.mode(), Mode::Idle);
        assert_eq!(controller.value(), 0.0);
    }

    #[test]
    fn test_set_config_applies_to_next_settle() {
        let mut controller = controller();
        let config = ControllerConfig::default().with_spring(SpringConfig::bouncy());
        controller.set_config(config.clone()).unwrap();
        assert_eq!(controller.config(), &config);

        let invalid = ControllerConfig::default().with_commit_threshold(1.5);
        assert!(controller.set_config(invalid).is_err());
        assert_eq!(controller.config(), &config);
    }
}
