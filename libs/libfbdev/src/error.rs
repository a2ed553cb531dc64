use std::io;
use std::path::PathBuf;

use libfbgfx::GfxError;
use nix::errno::Errno;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DevError {
    #[error("cannot open framebuffer {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{request} failed: {source}")]
    Ioctl {
        request: &'static str,
        #[source]
        source: Errno,
    },

    #[error("cannot map framebuffer memory: {0}")]
    Map(#[source] io::Error),

    #[error("unusable pixel layout: {0}")]
    Format(#[from] GfxError),

    #[error("standard input is not a terminal")]
    NotATerminal,

    #[error("cannot change terminal attributes: {0}")]
    Terminal(#[source] io::Error),

    #[error("cannot read input: {0}")]
    Input(#[source] io::Error),

    #[error("virtual framebuffer {path}: {reason}")]
    Emulator { path: PathBuf, reason: String },

    #[error("virtual framebuffer {path}: {source}")]
    EmulatorIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
