//! Writing screen contents to image files.

use std::fs;
use std::path::Path;

use libfbgfx::{Canvas, Color, DirtyRect, FrameBuf};
use libimg::{bmp, ppm};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Ppm,
    Bmp,
}

impl ImageKind {
    /// Pick the encoder from a file extension; anything but `.bmp` is PPM.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bmp") => ImageKind::Bmp,
            _ => ImageKind::Ppm,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Ppm => "ppm",
            ImageKind::Bmp => "bmp",
        }
    }
}

/// Top-down RGB bytes of every visible pixel.
pub fn rgb_bytes(canvas: &dyn Canvas) -> Vec<u8> {
    let (w, h) = (canvas.width(), canvas.height());
    let mut out = Vec::with_capacity(w * h * 3);
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let c = canvas.get_pixel(x, y).unwrap_or(Color::BLACK);
            out.extend_from_slice(&[c.r, c.g, c.b]);
        }
    }
    out
}

pub fn encode(canvas: &dyn Canvas, kind: ImageKind) -> Result<Vec<u8>> {
    let (w, h) = (canvas.width() as u32, canvas.height() as u32);
    let rgb = rgb_bytes(canvas);
    match kind {
        ImageKind::Ppm => ppm::encode_ppm(w, h, &rgb),
        ImageKind::Bmp => bmp::encode_bmp_24(w, h, &rgb),
    }
    .map_err(Error::Encode)
}

/// Encode `canvas` and write it to `path`.
pub fn save(canvas: &dyn Canvas, path: &Path, kind: ImageKind) -> Result<()> {
    let bytes = encode(canvas, kind)?;
    fs::write(path, bytes).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("wrote {} snapshot {}", kind.extension(), path.display());
    Ok(())
}

/// Owned copy of a framebuffer's visible area.
pub fn copy_frame<B: AsRef<[u8]> + AsMut<[u8]>>(src: &FrameBuf<B>) -> Result<FrameBuf<Vec<u8>>> {
    let mut out = FrameBuf::alloc(src.width(), src.height(), src.format());
    let rect = DirtyRect::new(0, 0, src.width() as i32, src.height() as i32);
    out.copy_rect_from(src, rect)?;
    out.take_dirty();
    Ok(out)
}
