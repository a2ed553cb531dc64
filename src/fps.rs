//! Frames-per-second measurement.

use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Counts frames and refreshes the rate once per second.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f64,
    total: u64,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::with_clock(Instant::now())
    }

    /// Start measuring from `start` instead of now.
    pub fn with_clock(start: Instant) -> Self {
        Self {
            window_start: start,
            frames: 0,
            fps: 0.0,
            total: 0,
        }
    }

    /// Count one frame. Returns the current rate.
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// Count one frame finished at `now`.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        self.frames += 1;
        self.total += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= WINDOW {
            self.fps = f64::from(self.frames) / elapsed.as_secs_f64();
            self.frames = 0;
            self.window_start = now;
        }
        self.fps
    }

    /// Rate over the last completed window; 0 until one second has passed.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn total_frames(&self) -> u64 {
        self.total
    }
}
