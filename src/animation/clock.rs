//! Time sources for frame-driven animations

use crate::core::constants::MAX_FRAME_DELTA_SECS;
use instant::Instant;

/// Maps wall time to effective animation time, freezing while paused.
///
/// The only bookkeeping is the accumulated pause offset and the instant the
/// current pause began, so pausing and resuming any number of times with no
/// wall time in between leaves the effective timeline untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PauseClock {
    time: f64,
    pause_offset: f64,
    paused_at: Option<f64>,
}

impl PauseClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance wall time by `delta` seconds and return how much effective
    /// time passed (zero while paused)
    pub fn advance(&mut self, delta: f64) -> f64 {
        let before = self.effective_time();
        self.time += delta;
        self.effective_time() - before
    }

    /// Move wall time to an absolute timestamp and return the effective time
    /// at that instant. Timestamps earlier than the current time are ignored.
    pub fn effective_time_at(&mut self, time: f64) -> f64 {
        if time > self.time {
            self.time = time;
        }
        self.effective_time()
    }

    pub fn effective_time(&self) -> f64 {
        match self.paused_at {
            Some(paused_at) => paused_at - self.pause_offset,
            None => self.time - self.pause_offset,
        }
    }

    /// Wall time seen so far
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Total wall time spent paused, excluding a pause still in progress
    pub fn pause_offset(&self) -> f64 {
        self.pause_offset
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn set_paused(&mut self, paused: bool) {
        match (self.paused_at, paused) {
            (None, true) => self.paused_at = Some(self.time),
            (Some(paused_at), false) => {
                self.pause_offset += self.time - paused_at;
                self.paused_at = None;
            }
            _ => {}
        }
    }
}

/// Measures real frame deltas for callers without their own frame clock
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Option<Instant>,
    max_delta: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_frame: None,
            max_delta: MAX_FRAME_DELTA_SECS,
        }
    }

    /// Cap reported deltas, so a stalled frame does not teleport animations
    pub fn with_max_delta(mut self, max_delta: f64) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Seconds since the previous call; zero on the first call
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let delta = match self.last_frame {
            Some(last) => now.duration_since(last).as_secs_f64(),
            None => 0.0,
        };
        self.last_frame = Some(now);
        delta.min(self.max_delta)
    }

    pub fn reset(&mut self) {
        self.last_frame = None;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
