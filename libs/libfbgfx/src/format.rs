//! Pixel format description and packing.
//!
//! Mirrors the `fb_bitfield` layout the kernel reports, so a format can be
//! built straight from `FBIOGET_VSCREENINFO` output.

use crate::color::Color;
use crate::error::GfxError;

/// Position and width of one color channel inside a packed pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bitfield {
    pub offset: u32,
    pub length: u32,
}

impl Bitfield {
    pub const fn new(offset: u32, length: u32) -> Self {
        Self { offset, length }
    }

    #[inline]
    fn mask(self) -> u32 {
        if self.length >= 32 {
            u32::MAX
        } else {
            (1u32 << self.length) - 1
        }
    }

    #[inline]
    fn pack(self, value: u8) -> u32 {
        if self.length == 0 {
            return 0;
        }
        let v = if self.length >= 8 {
            value as u32
        } else {
            (value as u32) >> (8 - self.length)
        };
        (v & self.mask()) << self.offset
    }

    #[inline]
    fn unpack(self, pixel: u32) -> Option<u8> {
        if self.length == 0 {
            return None;
        }
        let mask = self.mask();
        let v = (pixel >> self.offset) & mask;
        if self.length >= 8 {
            Some(v as u8)
        } else {
            Some(((v * 255 + mask / 2) / mask) as u8)
        }
    }
}

/// Layout of a single pixel in memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelFormat {
    pub bytes_per_pixel: usize,
    pub red: Bitfield,
    pub green: Bitfield,
    pub blue: Bitfield,
    pub transp: Bitfield,
}

impl PixelFormat {
    /// 32-bit with alpha in the top byte (what the emulator reports).
    pub const ARGB8888: Self = Self {
        bytes_per_pixel: 4,
        red: Bitfield::new(16, 8),
        green: Bitfield::new(8, 8),
        blue: Bitfield::new(0, 8),
        transp: Bitfield::new(24, 8),
    };

    /// 32-bit with an unused top byte.
    pub const XRGB8888: Self = Self {
        bytes_per_pixel: 4,
        red: Bitfield::new(16, 8),
        green: Bitfield::new(8, 8),
        blue: Bitfield::new(0, 8),
        transp: Bitfield::new(0, 0),
    };

    pub const RGB888: Self = Self {
        bytes_per_pixel: 3,
        red: Bitfield::new(16, 8),
        green: Bitfield::new(8, 8),
        blue: Bitfield::new(0, 8),
        transp: Bitfield::new(0, 0),
    };

    pub const BGR888: Self = Self {
        bytes_per_pixel: 3,
        red: Bitfield::new(0, 8),
        green: Bitfield::new(8, 8),
        blue: Bitfield::new(16, 8),
        transp: Bitfield::new(0, 0),
    };

    pub const RGB565: Self = Self {
        bytes_per_pixel: 2,
        red: Bitfield::new(11, 5),
        green: Bitfield::new(5, 6),
        blue: Bitfield::new(0, 5),
        transp: Bitfield::new(0, 0),
    };

    /// Build a format from the values reported by the kernel.
    pub fn from_bits_per_pixel(
        bits_per_pixel: u32,
        red: Bitfield,
        green: Bitfield,
        blue: Bitfield,
        transp: Bitfield,
    ) -> Result<Self, GfxError> {
        let bytes_per_pixel = match bits_per_pixel {
            16 => 2,
            24 => 3,
            32 => 4,
            _ => return Err(GfxError::UnsupportedFormat { bits_per_pixel }),
        };
        Ok(Self {
            bytes_per_pixel,
            red,
            green,
            blue,
            transp,
        })
    }

    pub fn bits_per_pixel(&self) -> u32 {
        (self.bytes_per_pixel * 8) as u32
    }

    /// Pack a color into its in-memory integer value.
    #[inline]
    pub fn encode(&self, color: Color) -> u32 {
        self.red.pack(color.r)
            | self.green.pack(color.g)
            | self.blue.pack(color.b)
            | self.transp.pack(color.a)
    }

    /// Unpack an in-memory integer value. Formats without alpha decode as opaque.
    #[inline]
    pub fn decode(&self, pixel: u32) -> Color {
        Color {
            r: self.red.unpack(pixel).unwrap_or(0),
            g: self.green.unpack(pixel).unwrap_or(0),
            b: self.blue.unpack(pixel).unwrap_or(0),
            a: self.transp.unpack(pixel).unwrap_or(255),
        }
    }

    /// Store one pixel (little-endian) into `dst`, which must hold `bytes_per_pixel` bytes.
    #[inline]
    pub fn write(&self, dst: &mut [u8], color: Color) {
        let bytes = self.encode(color).to_le_bytes();
        dst[..self.bytes_per_pixel].copy_from_slice(&bytes[..self.bytes_per_pixel]);
    }

    /// Load one pixel (little-endian) from `src`.
    #[inline]
    pub fn read(&self, src: &[u8]) -> Color {
        let mut bytes = [0u8; 4];
        bytes[..self.bytes_per_pixel].copy_from_slice(&src[..self.bytes_per_pixel]);
        self.decode(u32::from_le_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb8888_encode_matches_packed_literal() {
        let f = PixelFormat::ARGB8888;
        assert_eq!(f.encode(Color::rgb(0x12, 0x34, 0x56)), 0xFF123456);
        assert_eq!(f.decode(0xFF123456), Color::rgb(0x12, 0x34, 0x56));
    }

    #[test]
    fn test_xrgb8888_decodes_opaque() {
        let f = PixelFormat::XRGB8888;
        assert_eq!(f.encode(Color::rgb(1, 2, 3)), 0x00010203);
        assert!(f.decode(0x00010203).is_opaque());
    }

    #[test]
    fn test_bgr888_byte_order() {
        let f = PixelFormat::BGR888;
        let mut px = [0u8; 3];
        f.write(&mut px, Color::rgb(0xAA, 0xBB, 0xCC));
        assert_eq!(px, [0xAA, 0xBB, 0xCC]);
        let f = PixelFormat::RGB888;
        f.write(&mut px, Color::rgb(0xAA, 0xBB, 0xCC));
        assert_eq!(px, [0xCC, 0xBB, 0xAA]);
    }

    #[test]
    fn test_rgb565_extremes() {
        let f = PixelFormat::RGB565;
        assert_eq!(f.encode(Color::WHITE), 0xFFFF);
        assert_eq!(f.encode(Color::RED), 0xF800);
        assert_eq!(f.encode(Color::GREEN), 0x07E0);
        assert_eq!(f.decode(0xFFFF), Color::WHITE);
        assert_eq!(f.decode(0x001F), Color::BLUE);
    }

    #[test]
    fn test_from_bits_per_pixel_rejects_8bpp() {
        let err = PixelFormat::from_bits_per_pixel(
            8,
            Bitfield::default(),
            Bitfield::default(),
            Bitfield::default(),
            Bitfield::default(),
        )
        .unwrap_err();
        assert_eq!(err, GfxError::UnsupportedFormat { bits_per_pixel: 8 });
    }

    #[test]
    fn test_from_bits_per_pixel_32() {
        let f = PixelFormat::from_bits_per_pixel(
            32,
            Bitfield::new(16, 8),
            Bitfield::new(8, 8),
            Bitfield::new(0, 8),
            Bitfield::new(24, 8),
        )
        .unwrap();
        assert_eq!(f, PixelFormat::ARGB8888);
        assert_eq!(f.bits_per_pixel(), 32);
    }
}
