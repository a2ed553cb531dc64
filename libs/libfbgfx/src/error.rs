//! Error types for buffer construction and font parsing.

use thiserror::Error;

/// Errors raised when describing or wrapping a pixel buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GfxError {
    #[error("unsupported pixel format: {bits_per_pixel} bits per pixel")]
    UnsupportedFormat { bits_per_pixel: u32 },

    #[error("pixel buffer too small: need {needed} bytes, have {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("stride of {stride} bytes cannot hold {width} pixels of {bytes_per_pixel} bytes")]
    InvalidStride {
        stride: usize,
        width: usize,
        bytes_per_pixel: usize,
    },

    #[error("texture data has {actual} pixels, expected {expected}")]
    TextureSize { expected: usize, actual: usize },

    #[error("pixel formats differ")]
    FormatMismatch,
}

/// Errors raised while parsing a PSF font.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FontError {
    #[error("not a PSF font (bad magic)")]
    BadMagic,

    #[error("font data truncated: need {needed} bytes, have {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("invalid font header: {0}")]
    InvalidHeader(&'static str),
}
