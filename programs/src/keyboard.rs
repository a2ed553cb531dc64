//! Move a rectangle with W/A/S/D. ESC quits.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use fbgl::{Color, Key, Point};
use fbgl_programs::motion::clamp_box;
use fbgl_programs::{DisplayArgs, FramePacer};

const RECT_WIDTH: i32 = 50;
const RECT_HEIGHT: i32 = 30;
const MOVE_STEP: i32 = 10;

#[derive(Parser)]
#[command(about = "Keyboard input demo")]
struct Cli {
    #[command(flatten)]
    display: DisplayArgs,
}

fn main() -> Result<()> {
    fbgl_programs::init_logging();
    let cli = Cli::parse();
    let mut fb = cli.display.open()?;
    let mut keyboard = fbgl_programs::open_keyboard()?;
    let (w, h) = (fb.width() as i32, fb.height() as i32);

    let mut x = w / 2 - RECT_WIDTH / 2;
    let mut y = h / 2 - RECT_HEIGHT / 2;
    let mut pacer = FramePacer::new(Duration::from_millis(16));
    let mut frame = 0u64;

    while !cli.display.done(frame) {
        if let Some(kb) = keyboard.as_mut() {
            kb.update()?;
            if kb.is_down(Key::Escape) || kb.is_down(Key::Interrupt) {
                break;
            }
            if kb.is_down(Key::Char('w')) {
                y -= MOVE_STEP;
            }
            if kb.is_down(Key::Char('s')) {
                y += MOVE_STEP;
            }
            if kb.is_down(Key::Char('a')) {
                x -= MOVE_STEP;
            }
            if kb.is_down(Key::Char('d')) {
                x += MOVE_STEP;
            }
        }
        (x, y) = clamp_box(x, y, RECT_WIDTH, RECT_HEIGHT, w, h);

        fb.set_bg(Color::BLACK);
        let top_left = Point::new(x, y);
        fb.draw_rectangle_filled(top_left, top_left.offset(RECT_WIDTH, RECT_HEIGHT), Color::WHITE);
        fb.display()?;
        frame += 1;
        pacer.wait();
    }
    Ok(())
}
