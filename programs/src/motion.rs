//! Bouncing boxes for the animation demos.

/// An axis-aligned box moving at a fixed velocity inside the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bouncer {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub dx: i32,
    pub dy: i32,
}

impl Bouncer {
    pub fn new(x: i32, y: i32, w: i32, h: i32, dx: i32, dy: i32) -> Self {
        Self { x, y, w, h, dx, dy }
    }

    /// Move one step, reversing on each edge touched. Returns how many
    /// axes bounced (0, 1 or 2).
    pub fn step(&mut self, width: i32, height: i32) -> u32 {
        self.x += self.dx;
        self.y += self.dy;
        let mut bounces = 0;
        if self.x <= 0 || self.x + self.w >= width {
            self.dx = -self.dx;
            bounces += 1;
        }
        if self.y <= 0 || self.y + self.h >= height {
            self.dy = -self.dy;
            bounces += 1;
        }
        bounces
    }
}

/// Keep a `w` x `h` box at (x, y) fully on a `width` x `height` screen.
pub fn clamp_box(x: i32, y: i32, w: i32, h: i32, width: i32, height: i32) -> (i32, i32) {
    let x = x.min(width - w).max(0);
    let y = y.min(height - h).max(0);
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_moves() {
        let mut b = Bouncer::new(10, 10, 5, 5, 3, 2);
        assert_eq!(b.step(100, 100), 0);
        assert_eq!((b.x, b.y), (13, 12));
    }

    #[test]
    fn test_step_bounces_off_right_edge() {
        let mut b = Bouncer::new(90, 10, 5, 5, 5, 1);
        assert_eq!(b.step(100, 100), 1);
        assert_eq!(b.dx, -5);
        assert_eq!(b.dy, 1);
    }

    #[test]
    fn test_step_corner_counts_both_axes() {
        let mut b = Bouncer::new(2, 2, 5, 5, -2, -2);
        assert_eq!(b.step(100, 100), 2);
        assert_eq!((b.dx, b.dy), (2, 2));
    }

    #[test]
    fn test_clamp_box() {
        assert_eq!(clamp_box(-5, 10, 50, 30, 800, 600), (0, 10));
        assert_eq!(clamp_box(790, 590, 50, 30, 800, 600), (750, 570));
        assert_eq!(clamp_box(100, 100, 50, 30, 800, 600), (100, 100));
    }
}
