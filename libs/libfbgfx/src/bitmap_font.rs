//! Built-in anti-aliased font using noto-sans-mono-bitmap.
//!
//! Used when no PSF file is supplied, so text can always be drawn.

use noto_sans_mono_bitmap::{get_raster, get_raster_width, FontWeight, RasterHeight};

use crate::color::Color;
use crate::framebuf::Canvas;
use crate::text::Font;

const WEIGHT: FontWeight = FontWeight::Regular;
const HEIGHT: RasterHeight = RasterHeight::Size16;

/// Additional vertical space between lines.
const LINE_SPACING: usize = 2;

/// The 16px regular Noto Sans Mono font.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinFont;

impl Font for BuiltinFont {
    fn glyph_width(&self) -> usize {
        get_raster_width(WEIGHT, HEIGHT)
    }

    fn glyph_height(&self) -> usize {
        HEIGHT.val()
    }

    fn line_height(&self) -> usize {
        HEIGHT.val() + LINE_SPACING
    }

    /// Glyph intensity is blended against whatever is already on the canvas.
    fn draw_char(&self, fb: &mut dyn Canvas, ch: char, x0: i32, y0: i32, fg: Color) {
        let rc = match get_raster(ch, WEIGHT, HEIGHT) {
            Some(rc) => rc,
            None => match get_raster('?', WEIGHT, HEIGHT) {
                Some(rc) => rc,
                None => return,
            },
        };

        let width = rc.width();
        for (y, row) in rc.raster().iter().enumerate() {
            for (x, &intensity) in row.iter().take(width).enumerate() {
                if intensity == 0 {
                    continue;
                }
                let px = x0.saturating_add(x as i32);
                let py = y0.saturating_add(y as i32);
                if intensity == 255 {
                    fb.put_pixel(px, py, fg);
                } else if let Some(bg) = fb.get_pixel(px, py) {
                    fb.put_pixel(px, py, fg.blend(bg, intensity));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PixelFormat;
    use crate::framebuf::FrameBuf;
    use crate::text::draw_text;

    #[test]
    fn test_metrics() {
        let f = BuiltinFont;
        assert!(f.glyph_width() > 0);
        assert_eq!(f.glyph_height(), 16);
        assert_eq!(f.line_height(), 18);
    }

    #[test]
    fn test_draws_something_for_ascii() {
        let mut fb = FrameBuf::alloc(64, 20, PixelFormat::XRGB8888);
        draw_text(&mut fb, &BuiltinFont, "Hi", 0, 0, Color::WHITE);
        assert!(fb.take_dirty().is_some());
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut fb = FrameBuf::alloc(64, 20, PixelFormat::XRGB8888);
        draw_text(&mut fb, &BuiltinFont, "   ", 0, 0, Color::WHITE);
        assert!(fb.take_dirty().is_none());
    }
}
