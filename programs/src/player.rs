//! Steer a square with the arrow keys; FPS and position are shown on top.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fbgl::{Color, Font, Key, Point};
use fbgl_programs::{DisplayArgs, FramePacer};

const PLAYER_SPEED: i32 = 1;
const HALF_SIZE: i32 = 5;

#[derive(Parser)]
#[command(about = "Arrow-key player demo")]
struct Cli {
    /// PSF font for the overlay (built-in font if omitted)
    font: Option<PathBuf>,

    #[command(flatten)]
    display: DisplayArgs,
}

fn main() -> Result<()> {
    fbgl_programs::init_logging();
    let cli = Cli::parse();
    let font = fbgl_programs::load_font(cli.font.as_deref())?;
    let mut fb = cli.display.open()?;
    let mut keyboard = fbgl_programs::open_keyboard()?;
    let (w, h) = (fb.width() as i32, fb.height() as i32);

    let mut pos = Point::new(w / 2, h / 2);
    let mut pacer = FramePacer::from_fps(60);
    let mut frame = 0u64;

    'game: while !cli.display.done(frame) {
        fb.set_bg(Color::BLACK);

        if let Some(kb) = keyboard.as_mut() {
            while let Some(key) = kb.get_key()? {
                match key {
                    Key::Up => pos.y = (pos.y - PLAYER_SPEED).max(0),
                    Key::Down => pos.y = (pos.y + PLAYER_SPEED).min(h - 1),
                    Key::Left => pos.x = (pos.x - PLAYER_SPEED).max(0),
                    Key::Right => pos.x = (pos.x + PLAYER_SPEED).min(w - 1),
                    Key::Escape | Key::Interrupt => break 'game,
                    _ => {}
                }
            }
        }

        fb.draw_rectangle_filled(
            pos.offset(-HALF_SIZE, -HALF_SIZE),
            pos.offset(HALF_SIZE, HALF_SIZE),
            Color::WHITE,
        );
        let fps_text = format!("FPS: {:.2}", fb.fps());
        let pos_text = format!("POS: {}, {}", pos.x, pos.y);
        let line = font.line_height() as i32;
        fb.render_text(&*font, &fps_text, 10, 10, Color::GREEN);
        fb.render_text(&*font, &pos_text, 10, 10 + line + 4, Color::RED);

        fb.display()?;
        frame += 1;
        pacer.wait();
    }
    Ok(())
}
