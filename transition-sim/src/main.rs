use anyhow::{anyhow, Context};
use interactive_transitions::{
    constants::DEFAULT_FRAME_INTERVAL_SECS,
    prelude::*,
};
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

/// Distance that maps to a full transition in the scripted drag
const EXTENT: f64 = 400.0;
/// Frames the scripted finger spends moving
const DRAG_FRAMES: usize = 18;
/// Frames the settle stays paused when `--pause` is given
const PAUSE_FRAMES: usize = 30;

struct Options {
    profile: TransitionProfile,
    /// Fraction of the extent the finger travels before lifting
    travel: f64,
    pause: bool,
}

impl Options {
    fn from_args() -> anyhow::Result<Self> {
        let mut options = Options {
            profile: TransitionProfile::default(),
            travel: 0.6,
            pause: false,
        };

        for arg in std::env::args().skip(1) {
            if arg == "--pause" {
                options.pause = true;
            } else if let Some(travel) = arg.strip_prefix("--travel=") {
                options.travel = travel
                    .parse()
                    .with_context(|| format!("invalid travel `{}`", travel))?;
            } else if let Some(path) = arg.strip_prefix("--config=") {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path))?;
                options.profile = TransitionProfile::Custom(ControllerConfig::from_json(&json)?);
            } else {
                options.profile = TransitionProfile::from_name(&arg).ok_or_else(|| {
                    anyhow!("unknown profile `{}` (snappy, smooth, bouncy, sheet)", arg)
                })?;
            }
        }

        Ok(options)
    }
}

/// Headless driver: a scripted drag goes through a `DragTracker` into a
/// controller that a tokio interval ticks at display rate, and every frame
/// of the trajectory is printed.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = Options::from_args()?;
    let config = options.profile.resolve();
    log::info!("profile {:?}, settles within {:?}s", options.profile, config.max_settle_time());

    let mut controller = ProgressDrivenTransitionController::new(config)?
        .on_event(|event| println!("  -> {}", event.name()));
    let mut tracker = DragTracker::new(DragAxis::Horizontal, EXTENT);
    let mut frames = FrameClock::new();
    let mut ticker = time::interval(Duration::from_secs_f64(DEFAULT_FRAME_INTERVAL_SECS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut elapsed = 0.0;
    let mut frame = 0usize;
    let mut paused_frames = 0usize;

    println!("{:>5} {:>8} {:>12} {:>9}", "frame", "time", "mode", "value");
    loop {
        ticker.tick().await;
        let delta = frames.tick();
        elapsed += delta;

        if let Some(event) = scripted_drag(frame, options.travel, elapsed) {
            if let Some(update) = tracker.process(event) {
                controller.handle_drag(update, false)?;
            }
        }

        if options.pause && controller.mode() == Mode::Settling {
            match paused_frames {
                5 => controller.set_paused(true),
                n if n == 5 + PAUSE_FRAMES => controller.set_paused(false),
                _ => {}
            }
            paused_frames += 1;
        }

        let progress = controller.tick(delta)?;
        println!(
            "{:>5} {:>8.3} {:>12} {:>9.4}{}",
            frame,
            elapsed,
            format!("{:?}", progress.mode),
            progress.value,
            if controller.is_paused() { " (paused)" } else { "" }
        );

        frame += 1;
        if frame > DRAG_FRAMES && progress.is_idle() {
            break;
        }
    }

    println!("finished at position {:.1} after {:.3}s", controller.position(), elapsed);
    Ok(())
}

/// Finger goes down on frame 0, moves evenly, lifts on `DRAG_FRAMES`
fn scripted_drag(frame: usize, travel: f64, time: f64) -> Option<DragEvent> {
    let x = EXTENT * travel * frame as f64 / DRAG_FRAMES as f64;
    let position = Point::new(x, 0.0);
    match frame {
        0 => Some(DragEvent::Began { position, time }),
        f if f < DRAG_FRAMES => Some(DragEvent::Moved { position, time }),
        f if f == DRAG_FRAMES => Some(DragEvent::Ended { position, time }),
        _ => None,
    }
}
