//! Drawing primitives: lines, filled and outlined rectangles, filled and outlined circles.
//!
//! Everything clips against the canvas, so off-screen or negative
//! coordinates are safe to pass.

use crate::color::Color;
use crate::framebuf::Canvas;
use crate::math::isqrt_i64;

/// A point in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Half-open rectangle `[x, x + w) x [y, y + h)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Build from two opposite corners given in any order. The larger
    /// corner is exclusive. Extents wider than `i32::MAX` saturate.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            w: a.x.max(b.x).saturating_sub(x),
            h: a.y.max(b.y).saturating_sub(y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn contains(&self, p: Point) -> bool {
        let (px, py) = (p.x as i64, p.y as i64);
        let (x, y) = (self.x as i64, self.y as i64);
        px >= x && px < x + self.w as i64 && py >= y && py < y + self.h as i64
    }
}

/// Clamp a coordinate into `-1..=limit`, enough to keep every clipping
/// decision the same while fitting in an `i32`.
fn clamp_coord(v: i64, limit: usize) -> i32 {
    v.clamp(-1, limit as i64) as i32
}

/// Fill the half-open box `x0..x1` x `y0..y1`, clipped to the canvas.
fn fill_box<C: Canvas + ?Sized>(fb: &mut C, x0: i64, y0: i64, x1: i64, y1: i64, color: Color) {
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let (w, h) = (fb.width(), fb.height());
    let (sx0, sx1) = (clamp_coord(x0, w), clamp_coord(x1, w));
    for row_y in y0.max(0)..y1.min(h as i64) {
        fb.fill_span(sx0, sx1, row_y as i32, color);
    }
}

/// Outline the half-open box `x0..x1` x `y0..y1`.
fn outline_box<C: Canvas + ?Sized>(fb: &mut C, x0: i64, y0: i64, x1: i64, y1: i64, color: Color) {
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    fill_box(fb, x0, y0, x1, y0 + 1, color);
    fill_box(fb, x0, y1 - 1, x1, y1, color);
    fill_box(fb, x0, y0, x0 + 1, y1, color);
    fill_box(fb, x1 - 1, y0, x1, y1, color);
}

/// Fill a rectangle with the given color.
pub fn fill_rect<C: Canvas + ?Sized>(fb: &mut C, x: i32, y: i32, w: i32, h: i32, color: Color) {
    let (x, y) = (x as i64, y as i64);
    fill_box(fb, x, y, x + w as i64, y + h as i64, color);
}

/// Draw a rectangle outline with the given color.
pub fn draw_rect<C: Canvas + ?Sized>(fb: &mut C, x: i32, y: i32, w: i32, h: i32, color: Color) {
    let (x, y) = (x as i64, y as i64);
    outline_box(fb, x, y, x + w as i64, y + h as i64, color);
}

fn corners(a: Point, b: Point) -> (i64, i64, i64, i64) {
    let (ax, ay, bx, by) = (a.x as i64, a.y as i64, b.x as i64, b.y as i64);
    (ax.min(bx), ay.min(by), ax.max(bx), ay.max(by))
}

/// Fill the rectangle spanned by two corners.
pub fn draw_rectangle_filled<C: Canvas + ?Sized>(
    fb: &mut C,
    top_left: Point,
    bottom_right: Point,
    color: Color,
) {
    let (x0, y0, x1, y1) = corners(top_left, bottom_right);
    fill_box(fb, x0, y0, x1, y1, color);
}

/// Outline the rectangle spanned by two corners.
pub fn draw_rectangle_outline<C: Canvas + ?Sized>(
    fb: &mut C,
    top_left: Point,
    bottom_right: Point,
    color: Color,
) {
    let (x0, y0, x1, y1) = corners(top_left, bottom_right);
    outline_box(fb, x0, y0, x1, y1, color);
}

/// Whether a circle's bounding box misses the canvas entirely.
fn circle_offscreen<C: Canvas + ?Sized>(fb: &C, cx: i64, cy: i64, r: i64) -> bool {
    cx + r < 0 || cy + r < 0 || cx - r >= fb.width() as i64 || cy - r >= fb.height() as i64
}

/// Fill a circle at (cx, cy) with the given radius and color.
pub fn fill_circle<C: Canvas + ?Sized>(fb: &mut C, cx: i32, cy: i32, radius: i32, color: Color) {
    let (cx, cy, r) = (cx as i64, cy as i64, radius as i64);
    if r < 0 || circle_offscreen(fb, cx, cy, r) {
        return;
    }
    let w = fb.width();
    let r2 = r * r;
    // only rows that land on the canvas
    let dy0 = (-r).max(-cy);
    let dy1 = r.min(fb.height() as i64 - 1 - cy);
    for dy in dy0..=dy1 {
        let dx_max = isqrt_i64(r2 - dy * dy);
        fb.fill_span(
            clamp_coord(cx - dx_max, w),
            clamp_coord(cx + dx_max + 1, w),
            (cy + dy) as i32,
            color,
        );
    }
}

#[inline]
fn plot<C: Canvas + ?Sized>(fb: &mut C, x: i64, y: i64, color: Color) {
    if x >= 0 && y >= 0 && x < fb.width() as i64 && y < fb.height() as i64 {
        fb.put_pixel(x as i32, y as i32, color);
    }
}

/// Draw a circle outline at (cx, cy) with the given radius using the midpoint circle algorithm.
pub fn draw_circle<C: Canvas + ?Sized>(fb: &mut C, cx: i32, cy: i32, radius: i32, color: Color) {
    if radius <= 0 {
        if radius == 0 {
            fb.put_pixel(cx, cy, color);
        }
        return;
    }
    let (cx, cy) = (cx as i64, cy as i64);
    if circle_offscreen(fb, cx, cy, radius as i64) {
        return;
    }

    let mut x = radius as i64;
    let mut y = 0i64;
    let mut d = 1 - x;

    while x >= y {
        // Plot 8 symmetric points
        let points: [(i64, i64); 8] = [
            (cx + x, cy + y),
            (cx - x, cy + y),
            (cx + x, cy - y),
            (cx - x, cy - y),
            (cx + y, cy + x),
            (cx - y, cy + x),
            (cx + y, cy - x),
            (cx - y, cy - x),
        ];
        for (px, py) in points {
            plot(fb, px, py, color);
        }

        y += 1;
        if d <= 0 {
            d += 2 * y + 1;
        } else {
            x -= 1;
            d += 2 * (y - x) + 1;
        }
    }
}

/// `n / d` rounded to the nearest integer, halves rounding up.
fn div_round(n: i128, d: i128) -> i64 {
    let (n, d) = if d < 0 { (-n, -d) } else { (n, d) };
    (2 * n + d).div_euclid(2 * d) as i64
}

/// Draw a line between two points (inclusive) using Bresenham's algorithm.
///
/// Each step along the major axis plots the pixel nearest the ideal line.
/// The minor coordinate is computed directly from the step, so the walk
/// starts at the canvas edge instead of at an off-screen endpoint.
pub fn draw_line<C: Canvas + ?Sized>(fb: &mut C, p0: Point, p1: Point, color: Color) {
    let w = fb.width() as i64;
    let h = fb.height() as i64;
    let (x0, y0, x1, y1) = (p0.x as i64, p0.y as i64, p1.x as i64, p1.y as i64);

    // Entirely off one side of the screen: nothing to plot.
    if (x0 < 0 && x1 < 0) || (y0 < 0 && y1 < 0) || (x0 >= w && x1 >= w) || (y0 >= h && y1 >= h) {
        return;
    }

    let dx = x1 - x0;
    let dy = y1 - y0;
    if dy == 0 {
        let (a, b) = (x0.min(x1), x0.max(x1));
        fb.fill_span(clamp_coord(a, w as usize), clamp_coord(b + 1, w as usize), y0 as i32, color);
        return;
    }

    if dx.abs() >= dy.abs() {
        for x in x0.min(x1).max(0)..=x0.max(x1).min(w - 1) {
            let y = y0 + div_round((x - x0) as i128 * dy as i128, dx as i128);
            plot(fb, x, y, color);
        }
    } else {
        for y in y0.min(y1).max(0)..=y0.max(y1).min(h - 1) {
            let x = x0 + div_round((y - y0) as i128 * dx as i128, dy as i128);
            plot(fb, x, y, color);
        }
    }
}
