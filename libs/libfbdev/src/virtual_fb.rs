//! File-backed virtual framebuffer.
//!
//! Stands in for `/dev/fb0` on machines without one. The backing file is a
//! 64-byte header followed by the pixels, so a second process (the viewer)
//! can map the same file and watch frames as they are presented.
//!
//! Header layout, little-endian:
//!
//! | offset | size | field            |
//! |--------|------|------------------|
//! | 0      | 8    | magic `FBGLEMU1` |
//! | 8      | 4    | width            |
//! | 12     | 4    | height           |
//! | 16     | 4    | bits per pixel   |
//! | 20     | 4    | line length      |
//! | 24     | 8    | frames presented |
//! | 32     | 8    | bytes presented  |
//!
//! A new screen is always built in a fresh file that is then renamed over
//! the path. Processes still mapping the previous file keep a valid
//! mapping of the old inode and can notice the swap with
//! [`VirtualFb::is_replaced`].

use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use libfbgfx::{Canvas, FrameBuf, PixelFormat};
use memmap2::{MmapMut, MmapOptions};

use crate::error::DevError;
use crate::screeninfo::{
    FbFixScreeninfo, FbVarScreeninfo, FB_TYPE_PACKED_PIXELS, FB_VISUAL_TRUECOLOR,
};
use crate::{MappedFrameBuf, Screen};

pub const MAGIC: &[u8; 8] = b"FBGLEMU1";
pub const HEADER_LEN: usize = 64;
pub const DEFAULT_WIDTH: usize = 800;
pub const DEFAULT_HEIGHT: usize = 600;
pub const EMU_ID: &str = "FBGL_EMU";

const BITS_PER_PIXEL: u32 = 32;
const OFF_WIDTH: usize = 8;
const OFF_HEIGHT: usize = 12;
const OFF_BPP: usize = 16;
const OFF_LINE_LENGTH: usize = 20;
const OFF_FRAMES: usize = 24;
const OFF_BYTES: usize = 32;

/// Counters kept in the header, bumped by every `present()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VirtualFbStats {
    pub frames: u64,
    pub bytes_presented: u64,
}

pub struct VirtualFb {
    path: PathBuf,
    header: MmapMut,
    fb: MappedFrameBuf,
    file: File,
}

impl VirtualFb {
    /// Create the backing file and map a zeroed ARGB8888 screen.
    ///
    /// An existing file at `path` is replaced, not resized in place.
    pub fn create(path: impl AsRef<Path>, width: usize, height: usize) -> Result<Self, DevError> {
        let path = path.as_ref();
        if width == 0 || height == 0 {
            return Err(emu_err(path, format!("invalid size {width}x{height}")));
        }
        let line_length = width * 4;
        let pixel_len = line_length * height;
        let io_err = |source| DevError::EmulatorIo {
            path: path.to_path_buf(),
            source,
        };

        let staging = staging_path(path);
        let built = build_file(&staging, width, height, line_length, pixel_len)
            .and_then(|parts| fs::rename(&staging, path).map(|()| parts));
        let (file, header, pixels) = match built {
            Ok(parts) => parts,
            Err(e) => {
                let _ = fs::remove_file(&staging);
                return Err(io_err(e));
            }
        };
        let fb = FrameBuf::new(pixels, width, height, line_length, PixelFormat::ARGB8888)?;

        log::info!(
            "virtual framebuffer {} created: {}x{} {}bpp",
            path.display(),
            width,
            height,
            BITS_PER_PIXEL
        );

        Ok(Self {
            path: path.to_path_buf(),
            header,
            fb,
            file,
        })
    }

    /// Map an existing virtual framebuffer created by another process.
    pub fn attach(path: impl AsRef<Path>) -> Result<Self, DevError> {
        let path = path.as_ref();
        let io_err = |source| DevError::EmulatorIo {
            path: path.to_path_buf(),
            source,
        };

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(io_err)?;
        let file_len = file.metadata().map_err(io_err)?.len() as usize;
        if file_len < HEADER_LEN {
            return Err(emu_err(path, format!("file is {file_len} bytes, too short for a header")));
        }

        let header = map_header(&file).map_err(io_err)?;
        if &header[..8] != MAGIC {
            return Err(emu_err(path, "bad magic".to_string()));
        }
        let width = get_u32(&header, OFF_WIDTH) as usize;
        let height = get_u32(&header, OFF_HEIGHT) as usize;
        let bpp = get_u32(&header, OFF_BPP);
        let line_length = get_u32(&header, OFF_LINE_LENGTH) as usize;
        if bpp != BITS_PER_PIXEL {
            return Err(emu_err(path, format!("unsupported depth {bpp}")));
        }
        let pixel_len = line_length * height;
        if file_len < HEADER_LEN + pixel_len {
            return Err(emu_err(
                path,
                format!("file is {file_len} bytes, expected {}", HEADER_LEN + pixel_len),
            ));
        }

        let pixels = map_pixels(&file, pixel_len).map_err(io_err)?;
        let fb = FrameBuf::new(pixels, width, height, line_length, PixelFormat::ARGB8888)?;

        log::debug!("attached to virtual framebuffer {} ({}x{})", path.display(), width, height);

        Ok(Self {
            path: path.to_path_buf(),
            header,
            fb,
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stats(&self) -> VirtualFbStats {
        VirtualFbStats {
            frames: get_u64(&self.header, OFF_FRAMES),
            bytes_presented: get_u64(&self.header, OFF_BYTES),
        }
    }

    /// True once `path` no longer names the file this handle maps,
    /// because a writer recreated it or it was removed.
    pub fn is_replaced(&self) -> bool {
        let (Ok(ours), Ok(current)) = (self.file.metadata(), fs::metadata(&self.path)) else {
            return true;
        };
        ours.dev() != current.dev() || ours.ino() != current.ino()
    }
}

impl Screen for VirtualFb {
    fn var_screeninfo(&self) -> FbVarScreeninfo {
        let format = self.fb.format();
        let width = self.fb.width() as u32;
        let height = self.fb.height() as u32;
        FbVarScreeninfo {
            xres: width,
            yres: height,
            xres_virtual: width,
            yres_virtual: height,
            bits_per_pixel: format.bits_per_pixel(),
            red: format.red.into(),
            green: format.green.into(),
            blue: format.blue.into(),
            transp: format.transp.into(),
            ..Default::default()
        }
    }

    fn fix_screeninfo(&self) -> FbFixScreeninfo {
        let mut fix = FbFixScreeninfo {
            smem_len: (self.fb.stride() * self.fb.height()) as u32,
            type_: FB_TYPE_PACKED_PIXELS,
            visual: FB_VISUAL_TRUECOLOR,
            line_length: self.fb.stride() as u32,
            ..Default::default()
        };
        fix.set_id(EMU_ID);
        fix
    }

    fn frame_buf(&self) -> &MappedFrameBuf {
        &self.fb
    }

    fn frame_buf_mut(&mut self) -> &mut MappedFrameBuf {
        &mut self.fb
    }

    fn present(&mut self) -> Result<(), DevError> {
        let visible = (self.fb.width() * self.fb.height() * self.fb.format().bytes_per_pixel) as u64;
        let stats = self.stats();
        put_u64(&mut self.header, OFF_FRAMES, stats.frames.wrapping_add(1));
        put_u64(&mut self.header, OFF_BYTES, stats.bytes_presented.wrapping_add(visible));
        log::trace!("virtual framebuffer frame {}", stats.frames.wrapping_add(1));
        Ok(())
    }
}

fn emu_err(path: &Path, reason: String) -> DevError {
    DevError::Emulator {
        path: path.to_path_buf(),
        reason,
    }
}

/// Sibling of `path` the next screen is built in before the rename.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".{}.tmp", std::process::id()));
    path.with_file_name(name)
}

fn build_file(
    staging: &Path,
    width: usize,
    height: usize,
    line_length: usize,
    pixel_len: usize,
) -> io::Result<(File, MmapMut, MmapMut)> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(staging)?;
    file.set_len((HEADER_LEN + pixel_len) as u64)?;

    let mut header = map_header(&file)?;
    header[..8].copy_from_slice(MAGIC);
    put_u32(&mut header, OFF_WIDTH, width as u32);
    put_u32(&mut header, OFF_HEIGHT, height as u32);
    put_u32(&mut header, OFF_BPP, BITS_PER_PIXEL);
    put_u32(&mut header, OFF_LINE_LENGTH, line_length as u32);

    let pixels = map_pixels(&file, pixel_len)?;
    Ok((file, header, pixels))
}

fn map_header(file: &File) -> io::Result<MmapMut> {
    // SAFETY: the file is owned by the VirtualFb alongside the mapping.
    // Other processes may write it concurrently; the header holds only
    // plain integers so torn reads are harmless.
    unsafe { MmapOptions::new().len(HEADER_LEN).map_mut(file) }
}

fn map_pixels(file: &File, len: usize) -> io::Result<MmapMut> {
    // SAFETY: as for the header.
    unsafe {
        MmapOptions::new()
            .offset(HEADER_LEN as u64)
            .len(len)
            .map_mut(file)
    }
}

fn get_u32(buf: &[u8], off: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[off..off + 4]);
    u32::from_le_bytes(b)
}

fn put_u32(buf: &mut [u8], off: usize, v: u32) {
    buf[off..off + 4].copy_from_slice(&v.to_le_bytes());
}

fn get_u64(buf: &[u8], off: usize) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&buf[off..off + 8]);
    u64::from_le_bytes(b)
}

fn put_u64(buf: &mut [u8], off: usize, v: u64) {
    buf[off..off + 8].copy_from_slice(&v.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use libfbgfx::Color;

    fn temp_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("fb.emu")
    }

    // =========================================================================
    // Creation and header
    // =========================================================================

    #[test]
    fn test_create_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir);
        let vfb = VirtualFb::create(&path, 4, 3).unwrap();
        drop(vfb);

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 4 * 4 * 3);
        assert_eq!(&bytes[..8], MAGIC);
        assert_eq!(get_u32(&bytes, OFF_WIDTH), 4);
        assert_eq!(get_u32(&bytes, OFF_HEIGHT), 3);
        assert_eq!(get_u32(&bytes, OFF_BPP), 32);
        assert_eq!(get_u32(&bytes, OFF_LINE_LENGTH), 16);
        assert!(bytes[HEADER_LEN..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_create_rejects_zero_size() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            VirtualFb::create(temp_path(&dir), 0, 10),
            Err(DevError::Emulator { .. })
        ));
    }

    #[test]
    fn test_screeninfo_synthesized() {
        let dir = tempfile::tempdir().unwrap();
        let vfb = VirtualFb::create(temp_path(&dir), DEFAULT_WIDTH, DEFAULT_HEIGHT).unwrap();
        let var = vfb.var_screeninfo();
        assert_eq!((var.xres, var.yres), (800, 600));
        assert_eq!((var.xres_virtual, var.yres_virtual), (800, 600));
        assert_eq!(var.bits_per_pixel, 32);
        assert_eq!(var.red.offset, 16);
        assert_eq!(var.transp.offset, 24);
        assert_eq!(var.pixel_format().unwrap(), PixelFormat::ARGB8888);

        let fix = vfb.fix_screeninfo();
        assert_eq!(fix.id_str(), "FBGL_EMU");
        assert_eq!(fix.line_length, 3200);
        assert_eq!(fix.smem_len, 3200 * 600);
        assert_eq!(fix.type_, FB_TYPE_PACKED_PIXELS);
        assert_eq!(fix.visual, FB_VISUAL_TRUECOLOR);
    }

    // =========================================================================
    // Sharing between handles
    // =========================================================================

    #[test]
    fn test_attach_sees_pixels_and_counters() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir);
        let mut writer = VirtualFb::create(&path, 8, 8).unwrap();
        writer.frame_buf_mut().put_pixel(2, 3, Color::RED);
        writer.present().unwrap();
        writer.present().unwrap();

        let reader = VirtualFb::attach(&path).unwrap();
        assert_eq!(reader.frame_buf().width(), 8);
        assert_eq!(reader.frame_buf().get_pixel(2, 3), Some(Color::RED));
        assert_eq!(
            reader.stats(),
            VirtualFbStats {
                frames: 2,
                bytes_presented: 2 * 8 * 8 * 4,
            }
        );

        writer.frame_buf_mut().put_pixel(0, 0, Color::BLUE);
        writer.present().unwrap();
        assert_eq!(reader.frame_buf().get_pixel(0, 0), Some(Color::BLUE));
        assert_eq!(reader.stats().frames, 3);
    }

    #[test]
    fn test_attach_rejects_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir);
        std::fs::write(&path, vec![0u8; HEADER_LEN + 16]).unwrap();
        assert!(matches!(VirtualFb::attach(&path), Err(DevError::Emulator { .. })));
    }

    #[test]
    fn test_attach_rejects_short_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir);
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes[..8].copy_from_slice(MAGIC);
        put_u32(&mut bytes, OFF_WIDTH, 10);
        put_u32(&mut bytes, OFF_HEIGHT, 10);
        put_u32(&mut bytes, OFF_BPP, 32);
        put_u32(&mut bytes, OFF_LINE_LENGTH, 40);
        std::fs::write(&path, &bytes).unwrap();
        assert!(matches!(VirtualFb::attach(&path), Err(DevError::Emulator { .. })));
    }

    #[test]
    fn test_attach_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            VirtualFb::attach(temp_path(&dir)),
            Err(DevError::EmulatorIo { .. })
        ));
    }

    // =========================================================================
    // Recreating the file
    // =========================================================================

    #[test]
    fn test_recreate_keeps_old_mapping_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir);
        let mut first = VirtualFb::create(&path, 64, 64).unwrap();
        first.frame_buf_mut().put_pixel(63, 63, Color::RED);
        first.present().unwrap();
        let reader = VirtualFb::attach(&path).unwrap();
        assert!(!reader.is_replaced());

        let mut second = VirtualFb::create(&path, 8, 8).unwrap();
        second.present().unwrap();

        // the old mapping still covers the whole 64x64 screen
        assert_eq!(reader.frame_buf().get_pixel(63, 63), Some(Color::RED));
        assert_eq!(reader.stats().frames, 1);
        assert!(reader.is_replaced());
        assert!(first.is_replaced());
        assert!(!second.is_replaced());

        let again = VirtualFb::attach(&path).unwrap();
        assert_eq!(again.frame_buf().width(), 8);
        assert_eq!(again.stats().frames, 1);

        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_removed_file_counts_as_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_path(&dir);
        let vfb = VirtualFb::create(&path, 2, 2).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(vfb.is_replaced());
    }

    #[test]
    fn test_create_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("fb.emu");
        assert!(matches!(
            VirtualFb::create(&path, 2, 2),
            Err(DevError::EmulatorIo { .. })
        ));
    }
}
