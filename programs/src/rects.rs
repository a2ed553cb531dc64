//! A fixed outline and a bouncing filled rectangle that changes color on
//! every wall hit.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use fbgl::{Color, Point};
use fbgl_programs::motion::Bouncer;
use fbgl_programs::{DisplayArgs, FramePacer};

const COLORS: [Color; 4] = [Color::YELLOW, Color::GREEN, Color::BLUE, Color::MAGENTA];

#[derive(Parser)]
#[command(about = "Rectangle drawing demo")]
struct Cli {
    #[command(flatten)]
    display: DisplayArgs,
}

fn main() -> Result<()> {
    fbgl_programs::init_logging();
    let cli = Cli::parse();
    let mut fb = cli.display.open()?;
    let (w, h) = (fb.width() as i32, fb.height() as i32);

    let mut marquee = Bouncer::new(w / 3, h / 3, w / 8, h / 8, 15, 8);
    let mut color = 0;
    let mut pacer = FramePacer::new(Duration::from_millis(50));
    let mut frame = 0u64;

    while !cli.display.done(frame) {
        fb.set_bg(Color::WHITE);
        fb.draw_rectangle_outline(Point::new(100, 100), Point::new(200, 200), Color::RED);

        let top_left = Point::new(marquee.x, marquee.y);
        fb.draw_rectangle_filled(top_left, top_left.offset(marquee.w, marquee.h), COLORS[color]);
        color = (color + marquee.step(w, h) as usize) % COLORS.len();

        fb.display()?;
        frame += 1;
        pacer.wait();
    }
    Ok(())
}
