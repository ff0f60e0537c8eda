//! Presents a sheet, drags it most of the way down and lets go, printing the
//! sheet offset and a shared thumbnail frame that follows the sheet.
//!
//! Run with `RUST_LOG=debug cargo run --example drag_to_dismiss`.

use interactive_transitions::prelude::*;

const SCREEN_HEIGHT: f64 = 844.0;
const DT: f64 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut sheet = SheetPresentation::new(SCREEN_HEIGHT)?
        .on_state_changed(|state| println!("state: {:?}", state));

    // The thumbnail lives in a grid cell while hidden and in the sheet header
    // while presented.
    let thumbnail = FrameInterpolation::new(
        Rect::new(Point::new(95.0, 300.0), Size::new(200.0, 200.0)),
        Rect::new(Point::new(16.0, 80.0), Size::new(358.0, 130.0)),
    )
    .with_corner_radii(32.0, 12.0);

    sheet.present()?;
    while sheet.controller().mode() != Mode::Idle {
        sheet.tick(DT)?;
    }

    let mut tracker = DragTracker::new(DragAxis::Vertical, SCREEN_HEIGHT);
    let mut time = 0.0;
    tracker.process(DragEvent::Began {
        position: Point::new(200.0, 100.0),
        time,
    });
    for step in 1..=20 {
        time += DT;
        let event = DragEvent::Moved {
            position: Point::new(200.0, 100.0 + 25.0 * step as f64),
            time,
        };
        if let Some(DragUpdate::Started(sample) | DragUpdate::Changed(sample)) =
            tracker.process(event)
        {
            sheet.drag(sample.displacement)?;
        }
        print_frame(&sheet, &thumbnail);
    }

    time += DT;
    if let Some(DragUpdate::Ended(sample)) = tracker.process(DragEvent::Ended {
        position: Point::new(200.0, 600.0),
        time,
    }) {
        let dismissed = sheet.end_drag(sample.displacement, sample.velocity)?;
        println!("released, dismissing: {}", dismissed);
    }

    while sheet.controller().mode() != Mode::Idle {
        sheet.tick(DT)?;
        print_frame(&sheet, &thumbnail);
    }

    Ok(())
}

fn print_frame(sheet: &SheetPresentation, thumbnail: &FrameInterpolation) {
    let progress = sheet.presentation();
    let frame = thumbnail.frame_at(progress);
    println!(
        "offset {:>7.1}  thumbnail {:>6.1},{:>6.1} {:>5.1}x{:<5.1} radius {:>4.1}",
        sheet.offset(),
        frame.origin.x,
        frame.origin.y,
        frame.width(),
        frame.height(),
        thumbnail.corner_radius_at(progress)
    );
}
