//! In-memory textures and blitting.

use crate::color::Color;
use crate::error::GfxError;
use crate::framebuf::Canvas;

/// A decoded image, row-major with the origin at the top-left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Texture {
    pub fn new(width: usize, height: usize, pixels: Vec<Color>) -> Result<Self, GfxError> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(GfxError::TextureSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from tightly packed RGBA bytes.
    pub fn from_rgba(width: usize, height: usize, rgba: &[u8]) -> Result<Self, GfxError> {
        let expected = width * height;
        if rgba.len() != expected * 4 {
            return Err(GfxError::TextureSize {
                expected,
                actual: rgba.len() / 4,
            });
        }
        let pixels = rgba
            .chunks_exact(4)
            .map(|p| Color::rgba(p[0], p[1], p[2], p[3]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// A texture filled with one color.
    pub fn solid(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }
}

#[inline]
fn blit_pixel<C: Canvas + ?Sized>(fb: &mut C, x: i32, y: i32, src: Color) {
    match src.a {
        0 => {}
        255 => fb.put_pixel(x, y, src),
        a => {
            if let Some(bg) = fb.get_pixel(x, y) {
                fb.put_pixel(x, y, src.blend(bg, a));
            }
        }
    }
}

/// Draw `tex` with its top-left corner at (x, y).
///
/// Opaque pixels are copied, fully transparent pixels are skipped and
/// anything in between is blended over what is already on the canvas.
pub fn draw_texture<C: Canvas + ?Sized>(fb: &mut C, tex: &Texture, x: i32, y: i32) {
    let (x, y) = (x as i64, y as i64);
    let tx0 = (-x).max(0);
    let ty0 = (-y).max(0);
    let tx1 = (tex.width as i64).min(fb.width() as i64 - x);
    let ty1 = (tex.height as i64).min(fb.height() as i64 - y);
    if tx0 >= tx1 || ty0 >= ty1 {
        return;
    }
    for ty in ty0..ty1 {
        let row = &tex.pixels[ty as usize * tex.width..(ty as usize + 1) * tex.width];
        for tx in tx0..tx1 {
            blit_pixel(fb, (x + tx) as i32, (y + ty) as i32, row[tx as usize]);
        }
    }
}

/// Draw `tex` stretched to `w` x `h` using nearest-neighbour sampling.
pub fn draw_texture_scaled<C: Canvas + ?Sized>(
    fb: &mut C,
    tex: &Texture,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
) {
    if w <= 0 || h <= 0 || tex.width == 0 || tex.height == 0 {
        return;
    }
    let (x, y, w, h) = (x as i64, y as i64, w as i64, h as i64);
    let y0 = (-y).max(0);
    let y1 = h.min(fb.height() as i64 - y);
    let x0 = (-x).max(0);
    let x1 = w.min(fb.width() as i64 - x);
    for dy in y0..y1 {
        let sy = (dy * tex.height as i64 / h) as usize;
        for dx in x0..x1 {
            let sx = (dx * tex.width as i64 / w) as usize;
            blit_pixel(fb, (x + dx) as i32, (y + dy) as i32, tex.pixels[sy * tex.width + sx]);
        }
    }
}
