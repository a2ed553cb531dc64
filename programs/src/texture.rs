//! Bounce a TGA image around the screen with an FPS readout.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use fbgl::Color;
use fbgl_programs::motion::Bouncer;
use fbgl_programs::{DisplayArgs, FramePacer};

#[derive(Parser)]
#[command(about = "Texture blitting demo")]
struct Cli {
    /// TGA image to show
    texture: PathBuf,

    /// PSF font for the FPS text (built-in font if omitted)
    #[arg(long)]
    font: Option<PathBuf>,

    #[command(flatten)]
    display: DisplayArgs,
}

fn main() -> Result<()> {
    fbgl_programs::init_logging();
    let cli = Cli::parse();
    let tex = fbgl::load_tga_texture(&cli.texture)
        .with_context(|| format!("failed to load texture {}", cli.texture.display()))?;
    let font = fbgl_programs::load_font(cli.font.as_deref())?;
    let mut fb = cli.display.open()?;
    let (w, h) = (fb.width() as i32, fb.height() as i32);

    let mut pos = Bouncer::new(0, 100.min(h / 2), tex.width() as i32, tex.height() as i32, 5, 3);
    let mut pacer = FramePacer::new(Duration::from_millis(50));
    let mut frame = 0u64;
    while !cli.display.done(frame) {
        fb.set_bg(Color::BLACK);
        fb.draw_texture(&tex, pos.x, pos.y);
        pos.step(w, h);

        let text = format!("FPS: {:.6}", fb.fps());
        fb.render_text(&*font, &text, 5, 0, Color::RED);

        fb.display()?;
        frame += 1;
        pacer.wait();
    }
    Ok(())
}
