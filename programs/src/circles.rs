//! An outline circle orbiting while a filled one stays put.

use std::f32::consts::PI;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use fbgl::Color;
use fbgl_programs::{DisplayArgs, FramePacer};

#[derive(Parser)]
#[command(about = "Circle drawing demo")]
struct Cli {
    #[command(flatten)]
    display: DisplayArgs,

    /// Clear between frames instead of leaving a trail
    #[arg(long)]
    clear: bool,
}

fn main() -> Result<()> {
    fbgl_programs::init_logging();
    let cli = Cli::parse();
    let mut fb = cli.display.open()?;

    let (cx, cy) = (fb.width() as i32 / 2, fb.height() as i32 / 2);
    let orbit = (fb.height() as f32 / 5.0).max(1.0);
    let radius = (fb.height() as i32 / 15).max(2);

    fb.set_bg(Color::RED);
    let mut pacer = FramePacer::new(Duration::from_millis(10));
    let mut frame = 0u64;
    while !cli.display.done(frame) {
        if cli.clear {
            fb.set_bg(Color::RED);
        }
        let a = (frame % 360) as f32 * PI / 180.0;
        let x = cx + (orbit * a.cos()) as i32;
        let y = cy + (orbit * a.sin()) as i32;
        fb.draw_circle_outline(x, y, radius, Color::WHITE);
        fb.draw_circle_filled(cx / 2, cy, radius, Color::WHITE);

        fb.display()?;
        frame += 1;
        pacer.wait();
    }
    Ok(())
}
