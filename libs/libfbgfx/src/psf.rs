//! PC Screen Font (PSF1 and PSF2) parsing and rendering.
//!
//! These are the console fonts shipped in `/usr/share/kbd/consolefonts`.
//! Glyphs are 1 bit per pixel, most significant bit leftmost, each row
//! padded to a whole byte.

use std::collections::HashMap;

use crate::color::Color;
use crate::error::FontError;
use crate::framebuf::Canvas;
use crate::math::div_ceil;
use crate::text::Font;

const PSF1_MAGIC: [u8; 2] = [0x36, 0x04];
const PSF1_MODE512: u8 = 0x01;
const PSF1_MODEHASTAB: u8 = 0x02;
const PSF1_MODESEQ: u8 = 0x04;
const PSF1_SEPARATOR: u16 = 0xFFFF;
const PSF1_STARTSEQ: u16 = 0xFFFE;

const PSF2_MAGIC: [u8; 4] = [0x72, 0xb5, 0x4a, 0x86];
const PSF2_HAS_UNICODE_TABLE: u32 = 0x01;
const PSF2_HEADER_LEN: usize = 32;
const PSF2_SEPARATOR: u8 = 0xFF;
const PSF2_STARTSEQ: u8 = 0xFE;

/// Which on-disk revision a font was loaded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PsfVersion {
    V1,
    V2,
}

/// A parsed PSF bitmap font.
#[derive(Clone, Debug)]
pub struct PsfFont {
    version: PsfVersion,
    width: usize,
    height: usize,
    row_bytes: usize,
    glyph_count: usize,
    glyphs: Vec<u8>,
    unicode: Option<HashMap<char, usize>>,
}

fn need(data: &[u8], needed: usize) -> Result<(), FontError> {
    if data.len() < needed {
        return Err(FontError::Truncated {
            needed,
            actual: data.len(),
        });
    }
    Ok(())
}

fn read_u32_le(data: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([data[off], data[off + 1], data[off + 2], data[off + 3]])
}

impl PsfFont {
    /// Parse a PSF1 or PSF2 font from its file contents.
    pub fn parse(data: &[u8]) -> Result<Self, FontError> {
        if data.len() >= 4 && data[..4] == PSF2_MAGIC {
            Self::parse_v2(data)
        } else if data.len() >= 2 && data[..2] == PSF1_MAGIC {
            Self::parse_v1(data)
        } else {
            Err(FontError::BadMagic)
        }
    }

    fn parse_v1(data: &[u8]) -> Result<Self, FontError> {
        need(data, 4)?;
        let mode = data[2];
        let height = data[3] as usize;
        if height == 0 {
            return Err(FontError::InvalidHeader("zero glyph height"));
        }
        let glyph_count = if mode & PSF1_MODE512 != 0 { 512 } else { 256 };
        let glyph_end = 4 + glyph_count * height;
        need(data, glyph_end)?;

        let unicode = if mode & (PSF1_MODEHASTAB | PSF1_MODESEQ) != 0 {
            Some(parse_v1_table(&data[glyph_end..], glyph_count))
        } else {
            None
        };

        log::debug!(
            "psf1: {} glyphs, 8x{}, unicode table: {}",
            glyph_count,
            height,
            unicode.is_some()
        );

        Ok(Self {
            version: PsfVersion::V1,
            width: 8,
            height,
            row_bytes: 1,
            glyph_count,
            glyphs: data[4..glyph_end].to_vec(),
            unicode,
        })
    }

    fn parse_v2(data: &[u8]) -> Result<Self, FontError> {
        need(data, PSF2_HEADER_LEN)?;
        let header_len = read_u32_le(data, 8) as usize;
        let flags = read_u32_le(data, 12);
        let glyph_count = read_u32_le(data, 16) as usize;
        let bytes_per_glyph = read_u32_le(data, 20) as usize;
        let height = read_u32_le(data, 24) as usize;
        let width = read_u32_le(data, 28) as usize;

        if header_len < PSF2_HEADER_LEN {
            return Err(FontError::InvalidHeader("header size below 32 bytes"));
        }
        if width == 0 || height == 0 || glyph_count == 0 {
            return Err(FontError::InvalidHeader("empty glyph geometry"));
        }
        let row_bytes = div_ceil(width, 8);
        if bytes_per_glyph != row_bytes * height {
            return Err(FontError::InvalidHeader("glyph size does not match dimensions"));
        }

        let glyph_end = glyph_count
            .checked_mul(bytes_per_glyph)
            .and_then(|n| n.checked_add(header_len))
            .ok_or(FontError::InvalidHeader("glyph table size overflows"))?;
        need(data, glyph_end)?;

        let unicode = if flags & PSF2_HAS_UNICODE_TABLE != 0 {
            Some(parse_v2_table(&data[glyph_end..], glyph_count))
        } else {
            None
        };

        log::debug!(
            "psf2: {} glyphs, {}x{}, unicode table: {}",
            glyph_count,
            width,
            height,
            unicode.is_some()
        );

        Ok(Self {
            version: PsfVersion::V2,
            width,
            height,
            row_bytes,
            glyph_count,
            glyphs: data[header_len..glyph_end].to_vec(),
            unicode,
        })
    }

    pub fn version(&self) -> PsfVersion {
        self.version
    }

    pub fn glyph_count(&self) -> usize {
        self.glyph_count
    }

    pub fn has_unicode_table(&self) -> bool {
        self.unicode.is_some()
    }

    fn lookup(&self, ch: char) -> Option<usize> {
        match &self.unicode {
            Some(map) => map.get(&ch).copied(),
            None => {
                let cp = ch as usize;
                (cp < self.glyph_count).then_some(cp)
            }
        }
    }

    /// Glyph index for `ch`, falling back to `?` and then glyph 0.
    pub fn glyph_index(&self, ch: char) -> usize {
        self.lookup(ch).or_else(|| self.lookup('?')).unwrap_or(0)
    }

    /// Raw bitmap rows of one glyph.
    pub fn glyph(&self, index: usize) -> &[u8] {
        let size = self.row_bytes * self.height;
        let start = index.min(self.glyph_count - 1) * size;
        &self.glyphs[start..start + size]
    }

    /// Whether pixel (col, row) of glyph `index` is set.
    pub fn is_set(&self, index: usize, col: usize, row: usize) -> bool {
        if col >= self.width || row >= self.height {
            return false;
        }
        let glyph = self.glyph(index);
        glyph[row * self.row_bytes + col / 8] & (0x80 >> (col % 8)) != 0
    }
}

fn parse_v1_table(table: &[u8], glyph_count: usize) -> HashMap<char, usize> {
    let mut map = HashMap::new();
    let mut words = table
        .chunks_exact(2)
        .map(|w| u16::from_le_bytes([w[0], w[1]]));
    for glyph in 0..glyph_count {
        let mut in_sequence = false;
        for word in words.by_ref() {
            match word {
                PSF1_SEPARATOR => break,
                PSF1_STARTSEQ => in_sequence = true,
                cp if !in_sequence => {
                    if let Some(ch) = char::from_u32(cp as u32) {
                        map.entry(ch).or_insert(glyph);
                    }
                }
                _ => {}
            }
        }
    }
    map
}

fn parse_v2_table(table: &[u8], glyph_count: usize) -> HashMap<char, usize> {
    let mut map = HashMap::new();
    let mut entries = table.split(|&b| b == PSF2_SEPARATOR);
    for glyph in 0..glyph_count {
        let Some(entry) = entries.next() else {
            break;
        };
        // Single characters come first; anything after STARTSEQ is a sequence.
        let singles = entry
            .split(|&b| b == PSF2_STARTSEQ)
            .next()
            .unwrap_or_default();
        match std::str::from_utf8(singles) {
            Ok(s) => {
                for ch in s.chars() {
                    map.entry(ch).or_insert(glyph);
                }
            }
            Err(_) => log::warn!("psf2: glyph {} has a malformed unicode entry", glyph),
        }
    }
    map
}

impl Font for PsfFont {
    fn glyph_width(&self) -> usize {
        self.width
    }

    fn glyph_height(&self) -> usize {
        self.height
    }

    fn draw_char(&self, fb: &mut dyn Canvas, ch: char, x: i32, y: i32, color: Color) {
        let index = self.glyph_index(ch);
        let glyph = self.glyph(index);
        for row in 0..self.height {
            let bits = &glyph[row * self.row_bytes..(row + 1) * self.row_bytes];
            for col in 0..self.width {
                if bits[col / 8] & (0x80 >> (col % 8)) != 0 {
                    fb.put_pixel(x.saturating_add(col as i32), y.saturating_add(row as i32), color);
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::format::PixelFormat;
    use crate::framebuf::FrameBuf;

    /// 256-glyph 8x4 PSF1 font; glyph 'A' is a box outline, '?' a full block.
    pub(crate) fn psf1_font(with_table: bool) -> Vec<u8> {
        let height = 4;
        let mode = if with_table { PSF1_MODEHASTAB } else { 0 };
        let mut data = vec![0x36, 0x04, mode, height as u8];
        let mut glyphs = vec![0u8; 256 * height];
        let a = b'A' as usize * height;
        glyphs[a..a + 4].copy_from_slice(&[0xFF, 0x81, 0x81, 0xFF]);
        let q = b'?' as usize * height;
        glyphs[q..q + 4].copy_from_slice(&[0xFF; 4]);
        data.extend_from_slice(&glyphs);
        if with_table {
            for glyph in 0..256u16 {
                if glyph == b'A' as u16 {
                    // 'A' also stands in for U+0391 (Greek capital alpha),
                    // followed by a ligature sequence that must be ignored.
                    for w in [0x41u16, 0x0391, PSF1_STARTSEQ, 0x41, 0x0301] {
                        data.extend_from_slice(&w.to_le_bytes());
                    }
                } else if glyph == b'?' as u16 {
                    data.extend_from_slice(&0x3Fu16.to_le_bytes());
                }
                data.extend_from_slice(&PSF1_SEPARATOR.to_le_bytes());
            }
        }
        data
    }

    fn psf2_font() -> Vec<u8> {
        // two glyphs, 10x2 (two bytes per row), unicode table
        let mut data = Vec::new();
        data.extend_from_slice(&PSF2_MAGIC);
        for v in [0u32, 32, PSF2_HAS_UNICODE_TABLE, 2, 4, 2, 10] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        // glyph 0: empty
        data.extend_from_slice(&[0, 0, 0, 0]);
        // glyph 1: leftmost pixel and tenth pixel of row 0
        data.extend_from_slice(&[0x80, 0x40, 0, 0]);
        // table: glyph 0 <- '?', glyph 1 <- 'é' and 'e'
        data.push(b'?');
        data.push(PSF2_SEPARATOR);
        data.extend_from_slice("ée".as_bytes());
        data.push(PSF2_STARTSEQ);
        data.extend_from_slice("e\u{301}".as_bytes());
        data.push(PSF2_SEPARATOR);
        data
    }

    // =============================================================================
    // PSF1
    // =============================================================================

    #[test]
    fn test_psf1_parse_without_table() {
        let font = PsfFont::parse(&psf1_font(false)).unwrap();
        assert_eq!(font.version(), PsfVersion::V1);
        assert_eq!(font.glyph_count(), 256);
        assert_eq!(font.glyph_width(), 8);
        assert_eq!(font.glyph_height(), 4);
        assert!(!font.has_unicode_table());
        assert_eq!(font.glyph_index('A'), b'A' as usize);
        // out of range falls back to '?'
        assert_eq!(font.glyph_index('\u{4e2d}'), b'?' as usize);
    }

    #[test]
    fn test_psf1_unicode_table() {
        let font = PsfFont::parse(&psf1_font(true)).unwrap();
        assert!(font.has_unicode_table());
        assert_eq!(font.glyph_index('A'), b'A' as usize);
        assert_eq!(font.glyph_index('\u{0391}'), b'A' as usize);
        // the combining accent only appears inside a sequence
        assert_eq!(font.glyph_index('\u{0301}'), b'?' as usize);
    }

    #[test]
    fn test_psf1_512_mode_truncated() {
        let mut data = psf1_font(false);
        data[2] = PSF1_MODE512;
        let err = PsfFont::parse(&data).unwrap_err();
        assert_eq!(
            err,
            FontError::Truncated {
                needed: 4 + 512 * 4,
                actual: data.len()
            }
        );
    }

    #[test]
    fn test_psf1_zero_height() {
        let err = PsfFont::parse(&[0x36, 0x04, 0, 0]).unwrap_err();
        assert!(matches!(err, FontError::InvalidHeader(_)));
    }

    #[test]
    fn test_bad_magic() {
        assert_eq!(PsfFont::parse(b"hello").unwrap_err(), FontError::BadMagic);
        assert_eq!(PsfFont::parse(&[]).unwrap_err(), FontError::BadMagic);
    }

    #[test]
    fn test_psf1_draw_char_sets_only_glyph_bits() {
        let font = PsfFont::parse(&psf1_font(false)).unwrap();
        let mut fb = FrameBuf::alloc(10, 6, PixelFormat::XRGB8888);
        fb.clear(Color::BLUE);
        font.draw_char(&mut fb, 'A', 1, 1, Color::WHITE);
        assert_eq!(fb.get_pixel(1, 1), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(8, 1), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(1, 2), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(2, 2), Some(Color::BLUE));
        assert_eq!(fb.get_pixel(8, 4), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(9, 1), Some(Color::BLUE));
    }

    // =============================================================================
    // PSF2
    // =============================================================================

    #[test]
    fn test_psf2_parse() {
        let font = PsfFont::parse(&psf2_font()).unwrap();
        assert_eq!(font.version(), PsfVersion::V2);
        assert_eq!(font.glyph_width(), 10);
        assert_eq!(font.glyph_height(), 2);
        assert_eq!(font.glyph_index('é'), 1);
        assert_eq!(font.glyph_index('e'), 1);
        assert_eq!(font.glyph_index('x'), 0);
        assert!(font.is_set(1, 0, 0));
        assert!(font.is_set(1, 9, 0));
        assert!(!font.is_set(1, 1, 0));
        assert!(!font.is_set(1, 10, 0));
    }

    #[test]
    fn test_psf2_glyph_size_mismatch() {
        let mut data = psf2_font();
        data[20..24].copy_from_slice(&3u32.to_le_bytes());
        assert!(matches!(
            PsfFont::parse(&data).unwrap_err(),
            FontError::InvalidHeader(_)
        ));
    }

    #[test]
    fn test_psf2_truncated_header() {
        let err = PsfFont::parse(&PSF2_MAGIC).unwrap_err();
        assert_eq!(err, FontError::Truncated { needed: 32, actual: 4 });
    }
}
