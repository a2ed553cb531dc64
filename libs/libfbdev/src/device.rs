//! Memory-mapped access to a Linux framebuffer device.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use libfbgfx::{Canvas, FrameBuf};
use memmap2::MmapOptions;

use crate::error::DevError;
use crate::screeninfo::{self, FbFixScreeninfo, FbVarScreeninfo};
use crate::{MappedFrameBuf, Screen};

pub const DEFAULT_FB: &str = "/dev/fb0";

/// An open framebuffer device with its memory mapped read-write.
///
/// The mapping and the descriptor are released on drop.
pub struct FbDevice {
    path: PathBuf,
    var: FbVarScreeninfo,
    fix: FbFixScreeninfo,
    fb: MappedFrameBuf,
    _file: File,
}

impl FbDevice {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DevError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|source| DevError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let fix = screeninfo::read_fix(&file)?;
        let var = screeninfo::read_var(&file)?;
        let format = var.pixel_format()?;

        let width = var.xres as usize;
        let height = var.yres as usize;
        let stride = row_stride(&var, &fix, format.bytes_per_pixel);
        let map_len = match fix.smem_len as usize {
            0 => stride * var.yres_virtual.max(var.yres) as usize,
            n => n,
        };

        // SAFETY: the device stays open for as long as the mapping lives and
        // nothing else in this process maps it.
        let mmap = unsafe { MmapOptions::new().len(map_len).map_mut(&file) }.map_err(DevError::Map)?;
        let fb = FrameBuf::new(mmap, width, height, stride, format)?;

        log::info!(
            "{}: {} {}x{} {}bpp, stride {}, {} bytes mapped",
            path.display(),
            fix.id_str(),
            width,
            height,
            var.bits_per_pixel,
            stride,
            map_len
        );

        Ok(Self {
            path: path.to_path_buf(),
            var,
            fix,
            fb,
            _file: file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn width(&self) -> usize {
        self.fb.width()
    }

    pub fn height(&self) -> usize {
        self.fb.height()
    }
}

/// Bytes per row: the driver's `line_length`, or derived from the virtual
/// width when the driver leaves it zero.
fn row_stride(var: &FbVarScreeninfo, fix: &FbFixScreeninfo, bytes_per_pixel: usize) -> usize {
    if fix.line_length != 0 {
        fix.line_length as usize
    } else {
        var.xres_virtual.max(var.xres) as usize * bytes_per_pixel
    }
}

impl Screen for FbDevice {
    fn var_screeninfo(&self) -> FbVarScreeninfo {
        self.var
    }

    fn fix_screeninfo(&self) -> FbFixScreeninfo {
        self.fix
    }

    fn frame_buf(&self) -> &MappedFrameBuf {
        &self.fb
    }

    fn frame_buf_mut(&mut self) -> &mut MappedFrameBuf {
        &mut self.fb
    }
}

impl Drop for FbDevice {
    fn drop(&mut self) {
        log::debug!("{}: unmapping framebuffer", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_device() {
        let err = FbDevice::open("/nonexistent/fb9").err().unwrap();
        match err {
            DevError::Open { path, .. } => assert_eq!(path, PathBuf::from("/nonexistent/fb9")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_open_regular_file_fails_ioctl() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = FbDevice::open(file.path()).err().unwrap();
        assert!(matches!(err, DevError::Ioctl { request: "FBIOGET_FSCREENINFO", .. }));
    }

    #[test]
    fn test_row_stride_prefers_line_length() {
        let var = FbVarScreeninfo {
            xres: 800,
            xres_virtual: 800,
            ..Default::default()
        };
        let fix = FbFixScreeninfo {
            line_length: 3328,
            ..Default::default()
        };
        assert_eq!(row_stride(&var, &fix, 4), 3328);
    }

    #[test]
    fn test_row_stride_falls_back_to_virtual_width() {
        let var = FbVarScreeninfo {
            xres: 640,
            xres_virtual: 1024,
            ..Default::default()
        };
        assert_eq!(row_stride(&var, &FbFixScreeninfo::default(), 2), 2048);
    }
}
