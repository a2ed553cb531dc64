//! Render a line of text and hold it on screen.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use fbgl::Color;
use fbgl_programs::{DisplayArgs, FramePacer};

#[derive(Parser)]
#[command(about = "Text rendering demo")]
struct Cli {
    /// PSF1/PSF2 font file (built-in font if omitted)
    font: Option<PathBuf>,

    /// What to write
    #[arg(long, default_value = "hello, fbgl")]
    message: String,

    #[command(flatten)]
    display: DisplayArgs,
}

fn main() -> Result<()> {
    fbgl_programs::init_logging();
    let cli = Cli::parse();
    let font = fbgl_programs::load_font(cli.font.as_deref())?;
    let mut fb = cli.display.open()?;

    fb.set_bg(Color::WHITE);
    let area = fb.render_text(&*font, &cli.message, 100, 100, Color::BLACK);
    tracing::debug!(?area, "text drawn");
    fb.display()?;

    // hold for 45 seconds, or --frames ticks, or until ESC
    let frames = if cli.display.frames == 0 { 900 } else { cli.display.frames };
    let mut keyboard = fbgl_programs::open_keyboard()?;
    let mut pacer = FramePacer::new(Duration::from_millis(50));
    for _ in 0..frames {
        if let Some(kb) = keyboard.as_mut() {
            if kb.esc_pressed()? {
                break;
            }
        }
        pacer.wait();
    }
    Ok(())
}
