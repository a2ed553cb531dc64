//! Sweep lines from a sliding start point to a fixed corner.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use fbgl::Color;
use fbgl_programs::{DisplayArgs, FramePacer};

#[derive(Parser)]
#[command(about = "Line drawing demo")]
struct Cli {
    #[command(flatten)]
    display: DisplayArgs,
}

fn main() -> Result<()> {
    fbgl_programs::init_logging();
    let cli = Cli::parse();
    let mut fb = cli.display.open()?;

    let (w, h) = (fb.width() as i32, fb.height() as i32);
    let end = (w - 1, h - 1);
    fb.set_bg(Color::RED);

    let mut pacer = FramePacer::new(Duration::from_millis(10));
    let mut frame = 0u64;
    for x in 0..w {
        if cli.display.done(frame) {
            break;
        }
        fb.draw_line(x, 0, end.0, end.1, Color::WHITE);
        fb.display()?;
        frame += 1;
        pacer.wait();
    }
    // last sweep in black so the end point is visible
    fb.draw_line(w - 1, 0, end.0, end.1, Color::BLACK);
    fb.display()?;
    tracing::info!("drew {} lines, {:.1} fps", frame, fb.fps());
    Ok(())
}
