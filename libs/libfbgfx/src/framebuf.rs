//! Framebuffer wrapper with dirty-rectangle tracking.

use crate::color::Color;
use crate::error::GfxError;
use crate::format::PixelFormat;

/// A dirty rectangle (pixel coordinates).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl DirtyRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Smallest rect covering both.
    pub fn union(&self, other: &DirtyRect) -> DirtyRect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let x2 = (self.x + self.w).max(other.x + other.w);
        let y2 = (self.y + self.h).max(other.y + other.h);
        DirtyRect::new(x, y, x2 - x, y2 - y)
    }

    /// Intersect with `0..width` x `0..height`. Returns `None` if nothing remains.
    pub fn clip(&self, width: usize, height: usize) -> Option<DirtyRect> {
        let x0 = (self.x as i64).max(0);
        let y0 = (self.y as i64).max(0);
        let x1 = (self.x as i64 + self.w as i64).min(width as i64);
        let y1 = (self.y as i64 + self.h as i64).min(height as i64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(DirtyRect::new(x0 as i32, y0 as i32, (x1 - x0) as i32, (y1 - y0) as i32))
    }
}

/// Something pixels can be drawn onto.
///
/// Coordinates are signed; anything outside the visible area is dropped
/// so callers never have to clip themselves.
pub trait Canvas {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Write a single pixel. Out-of-bounds writes are ignored.
    fn put_pixel(&mut self, x: i32, y: i32, color: Color);

    /// Read a single pixel, `None` when out of bounds.
    fn get_pixel(&self, x: i32, y: i32) -> Option<Color>;

    /// Fill the half-open run `x0..x1` on row `y`, clipped to the canvas.
    fn fill_span(&mut self, x0: i32, x1: i32, y: i32, color: Color);

    /// Fill every visible pixel with one color.
    fn clear(&mut self, color: Color);

    /// Expand the dirty rect to include a region.
    fn mark_dirty(&mut self, rect: DirtyRect);
}

/// A pixel buffer with dimensions, pixel format, and dirty tracking.
///
/// Storage is anything byte-addressable: an owned `Vec<u8>` back buffer or
/// a memory-mapped device. Tracks which region has been modified so that
/// only the dirty rect needs presenting.
#[derive(Debug)]
pub struct FrameBuf<B> {
    buf: B,
    width: usize,
    height: usize,
    stride: usize, // bytes per row
    format: PixelFormat,
    dirty: Option<DirtyRect>,
}

impl FrameBuf<Vec<u8>> {
    /// Allocate a zeroed, tightly packed buffer.
    pub fn alloc(width: usize, height: usize, format: PixelFormat) -> Self {
        let stride = width * format.bytes_per_pixel;
        Self {
            buf: vec![0u8; stride * height],
            width,
            height,
            stride,
            format,
            dirty: None,
        }
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> FrameBuf<B> {
    /// Wrap existing storage. The buffer must hold `stride * height` bytes.
    pub fn new(
        buf: B,
        width: usize,
        height: usize,
        stride: usize,
        format: PixelFormat,
    ) -> Result<Self, GfxError> {
        let bpp = format.bytes_per_pixel;
        if stride < width * bpp {
            return Err(GfxError::InvalidStride {
                stride,
                width,
                bytes_per_pixel: bpp,
            });
        }
        let needed = stride * height;
        let actual = buf.as_ref().len();
        if actual < needed {
            return Err(GfxError::BufferTooSmall { needed, actual });
        }
        Ok(Self {
            buf,
            width,
            height,
            stride,
            format,
            dirty: None,
        })
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw bytes, including any padding past `width` on each row.
    pub fn pixels(&self) -> &[u8] {
        &self.buf.as_ref()[..self.stride * self.height]
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        let len = self.stride * self.height;
        &mut self.buf.as_mut()[..len]
    }

    /// Visible bytes of row `y`.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.buf.as_ref()[start..start + self.width * self.format.bytes_per_pixel]
    }

    /// Take and reset the current dirty rect. Returns `None` if nothing was drawn.
    pub fn take_dirty(&mut self) -> Option<DirtyRect> {
        self.dirty.take()
    }

    pub fn dirty(&self) -> Option<DirtyRect> {
        self.dirty
    }

    /// Copy `rect` from `src` into the same place in `self`.
    ///
    /// Both buffers must share a pixel format; the rect is clipped to both.
    pub fn copy_rect_from<S>(&mut self, src: &FrameBuf<S>, rect: DirtyRect) -> Result<(), GfxError>
    where
        S: AsRef<[u8]>,
    {
        if src.format != self.format {
            return Err(GfxError::FormatMismatch);
        }
        let Some(r) = rect
            .clip(self.width, self.height)
            .and_then(|r| r.clip(src.width, src.height))
        else {
            return Ok(());
        };
        let bpp = self.format.bytes_per_pixel;
        let x0 = r.x as usize * bpp;
        let len = r.w as usize * bpp;
        let dst_stride = self.stride;
        let dst = self.buf.as_mut();
        let src_bytes = src.buf.as_ref();
        for y in r.y as usize..(r.y + r.h) as usize {
            let s = y * src.stride + x0;
            let d = y * dst_stride + x0;
            dst[d..d + len].copy_from_slice(&src_bytes[s..s + len]);
        }
        self.expand_dirty(r);
        Ok(())
    }

    #[inline]
    fn offset(&self, x: usize, y: usize) -> usize {
        y * self.stride + x * self.format.bytes_per_pixel
    }

    fn expand_dirty(&mut self, rect: DirtyRect) {
        if rect.is_empty() {
            return;
        }
        self.dirty = Some(match self.dirty {
            Some(d) => d.union(&rect),
            None => rect,
        });
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Canvas for FrameBuf<B> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let off = self.offset(x as usize, y as usize);
        let format = self.format;
        format.write(&mut self.buf.as_mut()[off..], color);
        self.expand_dirty(DirtyRect::new(x, y, 1, 1));
    }

    #[inline]
    fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        let off = self.offset(x as usize, y as usize);
        Some(self.format.read(&self.buf.as_ref()[off..]))
    }

    fn fill_span(&mut self, x0: i32, x1: i32, y: i32, color: Color) {
        if y < 0 || y as usize >= self.height {
            return;
        }
        let start = x0.max(0);
        let end = x1.min(self.width as i32);
        if start >= end {
            return;
        }
        let bpp = self.format.bytes_per_pixel;
        let bytes = self.format.encode(color).to_le_bytes();
        let row = self.offset(start as usize, y as usize);
        let len = (end - start) as usize * bpp;
        for px in self.buf.as_mut()[row..row + len].chunks_exact_mut(bpp) {
            px.copy_from_slice(&bytes[..bpp]);
        }
        self.expand_dirty(DirtyRect::new(start, y, end - start, 1));
    }

    fn clear(&mut self, color: Color) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let bpp = self.format.bytes_per_pixel;
        let bytes = self.format.encode(color).to_le_bytes();
        let row_len = self.width * bpp;
        let stride = self.stride;
        let height = self.height;
        let buf = self.buf.as_mut();
        // Fill first row
        for px in buf[..row_len].chunks_exact_mut(bpp) {
            px.copy_from_slice(&bytes[..bpp]);
        }
        // Copy first row to all remaining rows
        for y in 1..height {
            buf.copy_within(0..row_len, y * stride);
        }
        self.dirty = Some(DirtyRect::new(0, 0, self.width as i32, self.height as i32));
    }

    fn mark_dirty(&mut self, rect: DirtyRect) {
        if let Some(r) = rect.clip(self.width, self.height) {
            self.expand_dirty(r);
        }
    }
}
