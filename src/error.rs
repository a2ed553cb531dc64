use std::io;
use std::path::PathBuf;

use libfbdev::DevError;
use libfbgfx::{FontError, GfxError};
use libimg::error::ImageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Device(#[from] DevError),

    #[error(transparent)]
    Graphics(#[from] GfxError),

    #[error("{path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("{path}: {source}")]
    Font {
        path: PathBuf,
        #[source]
        source: FontError,
    },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("image encoding failed: {0}")]
    Encode(#[source] ImageError),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
