//! Color types, constants, and the packed-integer helpers used by callers
//! that think in `0xRRGGBB` literals.

/// An RGBA color value. Alpha 255 is opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Unpack `0xAARRGGBB`. A zero alpha byte is read as opaque so that
    /// plain `0xRRGGBB` literals behave as expected.
    pub const fn from_u32(packed: u32) -> Self {
        let a = (packed >> 24) as u8;
        Self {
            r: (packed >> 16) as u8,
            g: (packed >> 8) as u8,
            b: packed as u8,
            a: if a == 0 { 255 } else { a },
        }
    }

    /// Pack as `0xAARRGGBB`.
    pub const fn to_u32(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Blend `self` over `bg` with the given coverage (0 = all `bg`, 255 = all `self`).
    pub fn blend(self, bg: Color, alpha: u8) -> Color {
        let a = alpha as u16;
        let inv = 255 - a;
        let mix = |f: u8, b: u8| ((f as u16 * a + b as u16 * inv) / 255) as u8;
        Color {
            r: mix(self.r, bg.r),
            g: mix(self.g, bg.g),
            b: mix(self.b, bg.b),
            a: 255,
        }
    }

    /// Darken towards black. `factor` is clamped to `0.0..=1.0`.
    pub fn scale(self, factor: f32) -> Color {
        let f = factor.clamp(0.0, 1.0);
        Color {
            r: (self.r as f32 * f) as u8,
            g: (self.g as f32 * f) as u8,
            b: (self.b as f32 * f) as u8,
            a: self.a,
        }
    }

    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }

    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const ORANGE: Self = Self::rgb(255, 150, 50);
    pub const PURPLE: Self = Self::rgb(150, 50, 255);
    pub const GRAY: Self = Self::rgb(200, 200, 200);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
}

impl From<u32> for Color {
    fn from(packed: u32) -> Self {
        Color::from_u32(packed)
    }
}

/// Pack RGB components into `0x00RRGGBB`.
#[inline]
pub const fn rgb_u32(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}
