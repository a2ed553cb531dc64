//! FBGL: software graphics on the Linux framebuffer.
//!
//! ```no_run
//! use fbgl::{Color, Config, Fbgl, Point};
//!
//! let mut fb = Fbgl::init(&Config::from_env()?)?;
//! fb.set_bg(Color::BLACK);
//! fb.draw_rectangle_filled(Point::new(10, 10), Point::new(110, 60), Color::RED);
//! fb.display()?;
//! # Ok::<(), fbgl::Error>(())
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod fps;
pub mod snapshot;

use std::fs;
use std::path::Path;

pub use config::Config;
pub use context::Fbgl;
pub use error::{Error, Result};
pub use fps::FpsCounter;
pub use snapshot::ImageKind;

pub use libfbdev::{Key, Keyboard};
pub use libfbgfx::bitmap_font::BuiltinFont;
pub use libfbgfx::psf::PsfFont;
pub use libfbgfx::{rgb_u32, Canvas, Color, DirtyRect, Font, FrameBuf, PixelFormat, Point, Rect, Texture};

pub use libfbdev;
pub use libfbgfx;
pub use libimg;

pub const NAME: &str = "FBGL";

pub fn name() -> &'static str {
    NAME
}

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a TGA image as a texture.
pub fn load_tga_texture(path: impl AsRef<Path>) -> Result<Texture> {
    let path = path.as_ref();
    let image = libimg::tga::decode(&read_file(path)?).map_err(|source| Error::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let tex = Texture::from_rgba(image.width, image.height, &image.rgba)?;
    log::debug!("loaded texture {} ({}x{})", path.display(), tex.width(), tex.height());
    Ok(tex)
}

/// Load a PSF1 or PSF2 console font.
pub fn load_psf_font(path: impl AsRef<Path>) -> Result<PsfFont> {
    let path = path.as_ref();
    let font = PsfFont::parse(&read_file(path)?).map_err(|source| Error::Font {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "loaded font {} ({} glyphs, {}x{})",
        path.display(),
        font.glyph_count(),
        font.glyph_width(),
        font.glyph_height()
    );
    Ok(font)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_and_version() {
        assert_eq!(name(), "FBGL");
        assert_eq!(version(), "0.1.0");
    }

    #[test]
    fn test_load_tga_texture() {
        // 2x1 uncompressed true-color, 24bpp, top-left origin
        let mut tga = vec![0u8, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 1, 0, 24, 0x20];
        tga.extend_from_slice(&[0, 0, 255, 255, 0, 0]); // BGR red, BGR blue
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.tga");
        fs::write(&path, &tga).unwrap();

        let tex = load_tga_texture(&path).unwrap();
        assert_eq!((tex.width(), tex.height()), (2, 1));
        assert_eq!(tex.get(0, 0), Some(Color::RED));
        assert_eq!(tex.get(1, 0), Some(Color::BLUE));
    }

    #[test]
    fn test_load_tga_errors_carry_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.tga");
        fs::write(&path, b"nope").unwrap();
        match load_tga_texture(&path) {
            Err(Error::Image { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            load_tga_texture(dir.path().join("missing.tga")),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_load_psf_font() {
        // PSF1, 256 glyphs of 8x2
        let mut psf = vec![0x36, 0x04, 0x00, 2];
        psf.extend(std::iter::repeat(0xAA).take(256 * 2));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.psf");
        fs::write(&path, &psf).unwrap();

        let font = load_psf_font(&path).unwrap();
        assert_eq!(font.glyph_width(), 8);
        assert_eq!(font.glyph_height(), 2);
        assert_eq!(font.glyph_count(), 256);
    }

    #[test]
    fn test_load_psf_font_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.psf");
        fs::write(&path, [0u8; 64]).unwrap();
        assert!(matches!(load_psf_font(&path), Err(Error::Font { .. })));
    }
}
