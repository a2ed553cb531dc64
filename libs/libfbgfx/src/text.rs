//! Text layout on top of any bitmap font.

use crate::color::Color;
use crate::framebuf::{Canvas, DirtyRect};

/// A fixed-width bitmap font.
pub trait Font {
    /// Horizontal advance of every glyph, in pixels.
    fn glyph_width(&self) -> usize;

    /// Height of every glyph, in pixels.
    fn glyph_height(&self) -> usize;

    /// Vertical advance between lines.
    fn line_height(&self) -> usize {
        self.glyph_height()
    }

    /// Draw one character with its top-left corner at (x, y).
    /// Background pixels are left as they are.
    fn draw_char(&self, fb: &mut dyn Canvas, ch: char, x: i32, y: i32, color: Color);
}

/// Draw `text` starting at (x, y). `'\n'` returns to `x` on the next line.
///
/// Returns the rectangle covered by the laid-out text (before clipping).
pub fn draw_text(
    fb: &mut dyn Canvas,
    font: &dyn Font,
    text: &str,
    x: i32,
    y: i32,
    color: Color,
) -> DirtyRect {
    let advance = font.glyph_width() as i32;
    let line_height = font.line_height() as i32;
    let mut cx = x;
    let mut cy = y;
    for ch in text.chars() {
        match ch {
            '\n' => {
                cx = x;
                cy = cy.saturating_add(line_height);
            }
            '\r' => cx = x,
            _ => {
                font.draw_char(fb, ch, cx, cy, color);
                cx = cx.saturating_add(advance);
            }
        }
    }
    let (w, h) = text_size(font, text);
    DirtyRect::new(x, y, w as i32, h as i32)
}

/// Pixel width of the widest line in `text`.
pub fn text_width(font: &dyn Font, text: &str) -> usize {
    text_size(font, text).0
}

/// Width of the widest line and total height of `text`.
pub fn text_size(font: &dyn Font, text: &str) -> (usize, usize) {
    if text.is_empty() {
        return (0, 0);
    }
    let mut widest = 0;
    let mut lines = 0;
    for line in text.split('\n') {
        lines += 1;
        widest = widest.max(line.trim_end_matches('\r').chars().count());
    }
    let height = (lines - 1) * font.line_height() + font.glyph_height();
    (widest * font.glyph_width(), height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PixelFormat;
    use crate::framebuf::FrameBuf;
    use crate::psf::tests::psf1_font;
    use crate::psf::PsfFont;

    fn font() -> PsfFont {
        PsfFont::parse(&psf1_font(false)).unwrap()
    }

    #[test]
    fn test_text_size_single_line() {
        let f = font();
        assert_eq!(text_size(&f, "AAA"), (24, 4));
        assert_eq!(text_width(&f, ""), 0);
    }

    #[test]
    fn test_text_size_multi_line() {
        let f = font();
        assert_eq!(text_size(&f, "A\nAAAA\nAA"), (32, 12));
    }

    #[test]
    fn test_draw_text_advances_and_wraps() {
        let f = font();
        let mut fb = FrameBuf::alloc(32, 16, PixelFormat::XRGB8888);
        let r = draw_text(&mut fb, &f, "AA\nA", 0, 0, Color::WHITE);
        assert_eq!(r, DirtyRect::new(0, 0, 16, 8));
        // top-left corners of the three glyphs
        assert_eq!(fb.get_pixel(0, 0), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(8, 0), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(0, 4), Some(Color::WHITE));
        // nothing drawn where a third glyph on line one would go
        assert_eq!(fb.get_pixel(16, 0), Some(Color::BLACK));
        assert_eq!(fb.get_pixel(8, 4), Some(Color::BLACK));
    }

    #[test]
    fn test_draw_text_offscreen_does_not_panic() {
        let f = font();
        let mut fb = FrameBuf::alloc(8, 8, PixelFormat::XRGB8888);
        draw_text(&mut fb, &f, "AAAA", -20, -2, Color::WHITE);
        draw_text(&mut fb, &f, "AAAA", 6, 6, Color::WHITE);
        assert_eq!(fb.get_pixel(7, 6), Some(Color::WHITE));
    }

    #[test]
    fn test_draw_text_near_i32_limits() {
        let f = font();
        let mut fb = FrameBuf::alloc(8, 8, PixelFormat::XRGB8888);
        draw_text(&mut fb, &f, "AAAA\nAA", i32::MAX - 4, i32::MAX - 2, Color::WHITE);
        draw_text(&mut fb, &f, "A", i32::MIN, i32::MIN, Color::WHITE);
        assert!(fb.take_dirty().is_none());
    }
}
