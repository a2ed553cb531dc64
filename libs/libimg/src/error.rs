//! Error type for image decoding and encoding.

use std::io;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("image data truncated: {0}")]
    Truncated(String),

    #[error("unsupported image: {0}")]
    Unsupported(String),

    #[error("invalid image: {0}")]
    Invalid(String),

    #[error("pixel data has {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

impl From<image::ImageError> for ImageError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::Unsupported(e) => ImageError::Unsupported(e.to_string()),
            image::ImageError::IoError(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                ImageError::Truncated(e.to_string())
            }
            other => ImageError::Invalid(other.to_string()),
        }
    }
}
