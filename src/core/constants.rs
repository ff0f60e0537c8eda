//! Engine-wide defaults for interactive transitions.
//! Keeping them in a single place makes it easier to tweak the magic numbers.

/// Progress at or above which a released drag commits the transition.
pub const DEFAULT_COMMIT_THRESHOLD: f64 = 0.5;

/// Distance from the target (in progress units) considered "arrived".
pub const DEFAULT_POSITION_EPSILON: f64 = 0.001;

/// Speed (progress units per second) considered "at rest".
pub const DEFAULT_VELOCITY_EPSILON: f64 = 0.01;

/// How long the spring must stay within the epsilons before it is settled.
pub const DEFAULT_SETTLE_HOLD_SECS: f64 = 0.05;

/// Nominal frame interval used by the simulator and the tests (60fps).
pub const DEFAULT_FRAME_INTERVAL_SECS: f64 = 1.0 / 60.0;

/// Largest frame delta a `FrameClock` reports after a stall.
pub const MAX_FRAME_DELTA_SECS: f64 = 0.1;

/// Springs that take longer than this to settle are rejected as misconfigured.
pub const MAX_SETTLING_DURATION_SECS: f64 = 30.0;

/// Window used to estimate release velocity from recent drag samples.
pub const VELOCITY_SAMPLE_WINDOW_MS: u64 = 100;
