//! Image codecs used by FBGL.
//!
//! Decoding produces a tightly packed, top-down RGBA [`Image`]; encoding
//! takes tightly packed, top-down RGB rows.

pub mod bmp;
pub mod error;
pub mod ppm;
pub mod tga;

pub use error::ImageError;

/// A decoded image: `width * height` RGBA pixels, rows top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl Image {
    /// RGBA bytes of pixel (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let o = (y * self.width + x) * 4;
        Some([self.rgba[o], self.rgba[o + 1], self.rgba[o + 2], self.rgba[o + 3]])
    }
}

/// Check that an RGB buffer matches its stated dimensions.
pub(crate) fn check_rgb_len(width: u32, height: u32, rgb_data: &[u8]) -> Result<(), ImageError> {
    let expected = width as usize * height as usize * 3;
    if rgb_data.len() != expected {
        return Err(ImageError::SizeMismatch {
            expected,
            actual: rgb_data.len(),
        });
    }
    Ok(())
}
