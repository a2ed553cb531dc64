//! Shared plumbing for the FBGL programs: command-line flags, logging
//! setup, keyboard fallback and small pieces of demo logic.

pub mod args;
pub mod maze;
pub mod motion;

use std::thread;
use std::time::{Duration, Instant};

use fbgl::Keyboard;
use tracing_subscriber::EnvFilter;

pub use args::{DisplayArgs, Size};

/// Install the `tracing` subscriber. `RUST_LOG` overrides the `info`
/// default; `log` records from the libraries are forwarded.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Raw-mode keyboard on stdin, or `None` when stdin is not a terminal
/// (piped, or running under a test harness).
pub fn open_keyboard() -> anyhow::Result<Option<Keyboard>> {
    match Keyboard::stdin() {
        Ok(kb) => Ok(Some(kb)),
        Err(fbgl::libfbdev::DevError::NotATerminal) => {
            tracing::warn!("stdin is not a terminal, keyboard input disabled");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Sleeps out the remainder of a fixed frame period.
pub struct FramePacer {
    period: Duration,
    last: Instant,
}

impl FramePacer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last: Instant::now(),
        }
    }

    pub fn from_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }

    pub fn wait(&mut self) {
        let elapsed = self.last.elapsed();
        if elapsed < self.period {
            thread::sleep(self.period - elapsed);
        }
        self.last = Instant::now();
    }
}

/// A PSF font from `path`, or the built-in font when no path is given.
pub fn load_font(path: Option<&std::path::Path>) -> anyhow::Result<Box<dyn fbgl::Font>> {
    let font: Box<dyn fbgl::Font> = match path {
        Some(p) => Box::new(fbgl::load_psf_font(p)?),
        None => Box::new(fbgl::BuiltinFont),
    };
    Ok(font)
}
