//! Kernel framebuffer descriptors (`linux/fb.h`) and the ioctls that fill them.

use std::fs::File;
use std::os::fd::AsRawFd;

use libfbgfx::{Bitfield, GfxError, PixelFormat};

use crate::error::DevError;

pub const FBIOGET_VSCREENINFO: u16 = 0x4600;
pub const FBIOPUT_VSCREENINFO: u16 = 0x4601;
pub const FBIOGET_FSCREENINFO: u16 = 0x4602;

pub const FB_TYPE_PACKED_PIXELS: u32 = 0;
pub const FB_VISUAL_TRUECOLOR: u32 = 2;

/// Position of one color channel inside a pixel.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FbBitfield {
    pub offset: u32,
    pub length: u32,
    pub msb_right: u32,
}

impl From<FbBitfield> for Bitfield {
    fn from(b: FbBitfield) -> Self {
        Bitfield::new(b.offset, b.length)
    }
}

impl From<Bitfield> for FbBitfield {
    fn from(b: Bitfield) -> Self {
        Self {
            offset: b.offset,
            length: b.length,
            msb_right: 0,
        }
    }
}

/// Variable screen information: resolution, depth, channel layout, timings.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FbVarScreeninfo {
    pub xres: u32,
    pub yres: u32,
    pub xres_virtual: u32,
    pub yres_virtual: u32,
    pub xoffset: u32,
    pub yoffset: u32,
    pub bits_per_pixel: u32,
    pub grayscale: u32,
    pub red: FbBitfield,
    pub green: FbBitfield,
    pub blue: FbBitfield,
    pub transp: FbBitfield,
    pub nonstd: u32,
    pub activate: u32,
    pub height: u32,
    pub width: u32,
    pub accel_flags: u32,
    pub pixclock: u32,
    pub left_margin: u32,
    pub right_margin: u32,
    pub upper_margin: u32,
    pub lower_margin: u32,
    pub hsync_len: u32,
    pub vsync_len: u32,
    pub sync: u32,
    pub vmode: u32,
    pub rotate: u32,
    pub colorspace: u32,
    pub reserved: [u32; 4],
}

impl FbVarScreeninfo {
    /// The pixel layout described by the depth and channel bitfields.
    pub fn pixel_format(&self) -> Result<PixelFormat, GfxError> {
        PixelFormat::from_bits_per_pixel(
            self.bits_per_pixel,
            self.red.into(),
            self.green.into(),
            self.blue.into(),
            self.transp.into(),
        )
    }
}

/// Fixed screen information: memory size, row pitch, visual type.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FbFixScreeninfo {
    pub id: [u8; 16],
    pub smem_start: libc::c_ulong,
    pub smem_len: u32,
    pub type_: u32,
    pub type_aux: u32,
    pub visual: u32,
    pub xpanstep: u16,
    pub ypanstep: u16,
    pub ywrapstep: u16,
    pub line_length: u32,
    pub mmio_start: libc::c_ulong,
    pub mmio_len: u32,
    pub accel: u32,
    pub capabilities: u16,
    pub reserved: [u16; 2],
}

impl FbFixScreeninfo {
    /// Driver identification, up to the first NUL.
    pub fn id_str(&self) -> String {
        let end = self.id.iter().position(|&b| b == 0).unwrap_or(self.id.len());
        String::from_utf8_lossy(&self.id[..end]).into_owned()
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = [0; 16];
        let n = id.len().min(15);
        self.id[..n].copy_from_slice(&id.as_bytes()[..n]);
    }
}

mod ioctl {
    use super::{FbFixScreeninfo, FbVarScreeninfo, FBIOGET_FSCREENINFO, FBIOGET_VSCREENINFO};

    nix::ioctl_read_bad!(get_vscreeninfo, FBIOGET_VSCREENINFO, FbVarScreeninfo);
    nix::ioctl_read_bad!(get_fscreeninfo, FBIOGET_FSCREENINFO, FbFixScreeninfo);
}

/// Query variable screen info from an open framebuffer device.
pub fn read_var(file: &File) -> Result<FbVarScreeninfo, DevError> {
    let mut info = FbVarScreeninfo::default();
    // SAFETY: the fd is open for the call and `info` is a repr(C) match for
    // the kernel's struct fb_var_screeninfo.
    unsafe { ioctl::get_vscreeninfo(file.as_raw_fd(), &mut info) }.map_err(|source| {
        DevError::Ioctl {
            request: "FBIOGET_VSCREENINFO",
            source,
        }
    })?;
    Ok(info)
}

/// Query fixed screen info from an open framebuffer device.
pub fn read_fix(file: &File) -> Result<FbFixScreeninfo, DevError> {
    let mut info = FbFixScreeninfo::default();
    // SAFETY: as above, for struct fb_fix_screeninfo.
    unsafe { ioctl::get_fscreeninfo(file.as_raw_fd(), &mut info) }.map_err(|source| {
        DevError::Ioctl {
            request: "FBIOGET_FSCREENINFO",
            source,
        }
    })?;
    Ok(info)
}
