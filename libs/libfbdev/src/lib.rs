//! FBGL Linux layer
//!
//! Everything that talks to the operating system: the framebuffer device
//! behind `/dev/fb*`, the file-backed virtual framebuffer used when no
//! device is available, and raw-mode terminal input.

pub mod device;
pub mod error;
pub mod keyboard;
pub mod screeninfo;
pub mod terminal;
pub mod virtual_fb;

pub use device::{FbDevice, DEFAULT_FB};
pub use error::DevError;
pub use keyboard::{parse_keys, Key, Keyboard};
pub use screeninfo::{FbBitfield, FbFixScreeninfo, FbVarScreeninfo};
pub use terminal::RawTerminal;
pub use virtual_fb::{VirtualFb, VirtualFbStats};

use libfbgfx::FrameBuf;
use memmap2::MmapMut;

/// Pixel memory shared with whatever scans it out.
pub type MappedFrameBuf = FrameBuf<MmapMut>;

/// A display surface: a real device or the virtual framebuffer.
pub trait Screen {
    fn var_screeninfo(&self) -> FbVarScreeninfo;
    fn fix_screeninfo(&self) -> FbFixScreeninfo;
    fn frame_buf(&self) -> &MappedFrameBuf;
    fn frame_buf_mut(&mut self) -> &mut MappedFrameBuf;

    /// Signal that a frame is complete. Hardware scans out continuously,
    /// so the default does nothing.
    fn present(&mut self) -> Result<(), DevError> {
        Ok(())
    }
}
