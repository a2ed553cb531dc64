//! Headless viewer for a virtual framebuffer.
//!
//! Attaches to the file a program renders into, follows its frame counter
//! and saves the screen whenever a new frame is presented.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use fbgl::libfbdev::{DevError, Screen, VirtualFb};
use fbgl::snapshot::{self, ImageKind};

#[derive(Parser)]
#[command(about = "Watch a virtual framebuffer and snapshot its frames")]
struct Cli {
    /// Virtual framebuffer file
    #[arg(long, env = "FBGL_EMULATE", value_name = "FILE")]
    emulate: PathBuf,

    /// Snapshot destination; `.bmp` writes BMP, anything else PPM
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Number snapshots (`name_000001.ppm`, ...) instead of overwriting
    #[arg(long)]
    keep: bool,

    /// Exit after this many snapshots (0 = run until interrupted)
    #[arg(long, default_value_t = 0)]
    frames: u64,

    /// Poll interval in milliseconds
    #[arg(long, default_value_t = 16)]
    interval: u64,

    /// Seconds to wait for the file to appear
    #[arg(long, default_value_t = 10)]
    wait: u64,
}

/// Where and how many snapshots to write.
struct Output {
    out: Option<PathBuf>,
    keep: bool,
    limit: u64,
}

/// Viewer progress carried between polls.
#[derive(Debug, Default)]
struct Progress {
    last_seen: u64,
    saved: u64,
    window_frames: u64,
}

impl Progress {
    fn following(vfb: &VirtualFb) -> Self {
        Self {
            last_seen: vfb.stats().frames,
            ..Self::default()
        }
    }

    /// Frames per second over `elapsed`, then start a new window.
    fn take_rate(&mut self, elapsed: Duration) -> Option<f64> {
        let frames = std::mem::take(&mut self.window_frames);
        if frames == 0 || elapsed.is_zero() {
            return None;
        }
        Some(frames as f64 / elapsed.as_secs_f64())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Idle,
    Frame,
    /// The writer recreated the file or reset its counter.
    Reattach,
    /// The snapshot limit was reached.
    Done,
}

fn attach(path: &Path, wait: Duration) -> Result<VirtualFb> {
    let deadline = Instant::now() + wait;
    loop {
        match VirtualFb::attach(path) {
            Ok(vfb) => return Ok(vfb),
            Err(DevError::EmulatorIo { .. }) | Err(DevError::Emulator { .. })
                if Instant::now() < deadline =>
            {
                thread::sleep(Duration::from_millis(100));
            }
            Err(e) => {
                return Err(e).with_context(|| format!("cannot attach to {}", path.display()))
            }
        }
    }
}

/// `dir/name.ext` becomes `dir/name_000042.ext`.
fn numbered(path: &Path, n: u64) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("frame");
    let ext = ImageKind::from_path(path).extension();
    path.with_file_name(format!("{stem}_{n:06}.{ext}"))
}

/// Check the counter once and save a snapshot if a new frame arrived.
fn poll(vfb: &VirtualFb, output: &Output, progress: &mut Progress) -> Result<Step> {
    if vfb.is_replaced() {
        return Ok(Step::Reattach);
    }
    let frames = vfb.stats().frames;
    if frames < progress.last_seen {
        return Ok(Step::Reattach);
    }
    if frames == progress.last_seen {
        return Ok(Step::Idle);
    }
    progress.window_frames += frames - progress.last_seen;
    progress.last_seen = frames;

    if let Some(out) = &output.out {
        let frame = snapshot::copy_frame(vfb.frame_buf())?;
        let path = if output.keep {
            numbered(out, progress.saved + 1)
        } else {
            out.clone()
        };
        snapshot::save(&frame, &path, ImageKind::from_path(out))?;
        progress.saved += 1;
        if output.limit != 0 && progress.saved >= output.limit {
            return Ok(Step::Done);
        }
    }
    Ok(Step::Frame)
}

fn main() -> Result<()> {
    fbgl_programs::init_logging();
    let cli = Cli::parse();
    let wait = Duration::from_secs(cli.wait);
    let mut vfb = attach(&cli.emulate, wait)?;
    tracing::info!(
        path = %cli.emulate.display(),
        width = vfb.var_screeninfo().xres,
        height = vfb.var_screeninfo().yres,
        "attached"
    );

    let output = Output {
        out: cli.out,
        keep: cli.keep,
        limit: cli.frames,
    };
    let interval = Duration::from_millis(cli.interval.max(1));
    let mut progress = Progress::following(&vfb);
    let mut window_start = Instant::now();

    loop {
        match poll(&vfb, &output, &mut progress)? {
            Step::Done => {
                tracing::info!(saved = progress.saved, "snapshot limit reached");
                return Ok(());
            }
            Step::Reattach => {
                tracing::info!(path = %cli.emulate.display(), "framebuffer recreated, reattaching");
                vfb = attach(&cli.emulate, wait)?;
                progress.last_seen = vfb.stats().frames;
                tracing::info!(
                    width = vfb.var_screeninfo().xres,
                    height = vfb.var_screeninfo().yres,
                    "attached"
                );
            }
            Step::Idle | Step::Frame => {}
        }

        let elapsed = window_start.elapsed();
        if elapsed >= Duration::from_secs(1) {
            if let Some(fps) = progress.take_rate(elapsed) {
                let stats = vfb.stats();
                tracing::info!(
                    frames = stats.frames,
                    bytes = stats.bytes_presented,
                    "{:.1} fps",
                    fps
                );
            }
            window_start = Instant::now();
        }
        thread::sleep(interval);
    }
}
