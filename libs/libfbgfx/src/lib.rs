//! FBGL drawing library
//!
//! Pure drawing on raw pixel buffers. No device or syscall dependencies:
//! callers hand over the pixel memory (an owned back buffer or a mapped
//! framebuffer) and decide when to present it.

pub mod bitmap_font;
pub mod color;
pub mod error;
pub mod format;
pub mod framebuf;
pub mod math;
pub mod psf;
pub mod shapes;
pub mod text;
pub mod texture;

pub use color::{rgb_u32, Color};
pub use error::{FontError, GfxError};
pub use format::{Bitfield, PixelFormat};
pub use framebuf::{Canvas, DirtyRect, FrameBuf};
pub use shapes::{Point, Rect};
pub use text::Font;
pub use texture::Texture;
