//! Flags every program accepts.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::Args;
use fbgl::{Config, Fbgl};

/// `WIDTHxHEIGHT` on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl FromStr for Size {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = fbgl::config::parse_size(s).map_err(|e| e.to_string())?;
        Ok(Self { width, height })
    }
}

#[derive(Debug, Clone, Args)]
pub struct DisplayArgs {
    /// Framebuffer device
    #[arg(long, env = "FBGL_DEVICE", default_value = fbgl::libfbdev::DEFAULT_FB)]
    pub device: PathBuf,

    /// Draw into a virtual framebuffer file instead of the device
    #[arg(long, env = "FBGL_EMULATE", value_name = "FILE")]
    pub emulate: Option<PathBuf>,

    /// Virtual framebuffer size
    #[arg(long, env = "FBGL_EMU_SIZE", default_value = "800x600")]
    pub size: Size,

    /// Draw off-screen and copy on each frame
    #[arg(long, env = "FBGL_DOUBLE_BUFFER")]
    pub double_buffer: bool,

    /// Stop after this many frames (0 runs until ESC)
    #[arg(long, default_value_t = 0)]
    pub frames: u64,
}

impl DisplayArgs {
    pub fn config(&self) -> Config {
        Config {
            device: self.device.clone(),
            emulate: self.emulate.clone(),
            emu_width: self.size.width,
            emu_height: self.size.height,
            double_buffer: self.double_buffer,
        }
    }

    pub fn open(&self) -> anyhow::Result<Fbgl> {
        let config = self.config();
        let target = config
            .emulate
            .as_ref()
            .unwrap_or(&config.device)
            .display()
            .to_string();
        Fbgl::init(&config).with_context(|| format!("failed to initialize framebuffer {target}"))
    }

    /// Whether `frame` (counted from 0) is past the `--frames` limit.
    pub fn done(&self, frame: u64) -> bool {
        self.frames != 0 && frame >= self.frames
    }
}
