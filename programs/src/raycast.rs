//! First-person walk through a small grid maze.
//!
//! Up/Down walk, Left/Right turn, ESC quits. With `--dump-dir` every frame
//! is also written out as `frame_NNNN.ppm`.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fbgl::{Color, Fbgl, Key, Point};
use fbgl_programs::maze::{self, Camera};
use fbgl_programs::{DisplayArgs, FramePacer};

#[derive(Parser)]
#[command(about = "Ray casting demo")]
struct Cli {
    /// Write each frame as a PPM into this directory
    #[arg(long, value_name = "DIR")]
    dump_dir: Option<PathBuf>,

    #[command(flatten)]
    display: DisplayArgs,
}

fn render(fb: &mut Fbgl, cam: &Camera) {
    let (width, height) = (fb.width(), fb.height());
    let mid = height as i32 / 2;
    for col in 0..width {
        let hit = cam.cast(cam.ray_angle(col, width));
        let base = if hit.vertical { maze::WALL_X } else { maze::WALL_Y };
        let half = maze::wall_height(height, hit.distance) / 2;
        let top = (mid - half).max(0);
        let bottom = (mid + half).min(height as i32 - 1);
        let x = col as i32;
        fb.draw_rectangle_filled(
            Point::new(x, top),
            Point::new(x + 1, bottom),
            maze::shade(base, hit.distance),
        );
    }
}

fn main() -> Result<()> {
    fbgl_programs::init_logging();
    let cli = Cli::parse();
    if let Some(dir) = &cli.dump_dir {
        fs::create_dir_all(dir).with_context(|| format!("cannot create {}", dir.display()))?;
    }
    let mut fb = cli.display.open()?;
    let mut keyboard = fbgl_programs::open_keyboard()?;

    let mut cam = Camera::default();
    let mut pacer = FramePacer::from_fps(60);
    let mut frame = 0u64;

    'game: while !cli.display.done(frame) {
        fb.set_bg(Color::BLACK);
        render(&mut fb, &cam);
        fb.display()?;

        if let Some(dir) = &cli.dump_dir {
            fb.save_ppm(dir.join(format!("frame_{frame:04}.ppm")))?;
        }

        if let Some(kb) = keyboard.as_mut() {
            while let Some(key) = kb.get_key()? {
                match key {
                    Key::Up => cam.walk(maze::MOVE_SPEED),
                    Key::Down => cam.walk(-maze::MOVE_SPEED),
                    Key::Left => cam.turn(-maze::TURN_SPEED),
                    Key::Right => cam.turn(maze::TURN_SPEED),
                    Key::Escape | Key::Interrupt => break 'game,
                    _ => {}
                }
            }
        }

        frame += 1;
        pacer.wait();
    }
    tracing::info!(frames = frame, fps = fb.fps(), "raycast finished");
    Ok(())
}
