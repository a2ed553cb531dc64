//! BMP 24-bit uncompressed encoding.

use crate::error::ImageError;

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: usize = 40;

/// Encode a top-down RGB pixel buffer as a 24-bit uncompressed BMP file.
///
/// `rgb_data` must be `width * height * 3` bytes: rows top-to-bottom, pixels
/// left-to-right, 3 bytes per pixel (R, G, B).
///
/// Returns the complete BMP file as a byte vector.
pub fn encode_bmp_24(width: u32, height: u32, rgb_data: &[u8]) -> Result<Vec<u8>, ImageError> {
    crate::check_rgb_len(width, height, rgb_data)?;

    let row_bytes = (width * 3) as usize;
    let padding = (4 - (row_bytes % 4)) % 4;
    let padded_row = row_bytes + padding;
    let pixel_data_size = padded_row * height as usize;
    let data_offset = FILE_HEADER_LEN + INFO_HEADER_LEN;
    let file_size = data_offset + pixel_data_size;

    let mut buf = Vec::with_capacity(file_size);

    // -- BITMAPFILEHEADER (14 bytes) --
    buf.extend_from_slice(b"BM");
    buf.extend_from_slice(&(file_size as u32).to_le_bytes());
    buf.extend_from_slice(&[0; 4]); // reserved
    buf.extend_from_slice(&(data_offset as u32).to_le_bytes());

    // -- BITMAPINFOHEADER (40 bytes) --
    buf.extend_from_slice(&(INFO_HEADER_LEN as u32).to_le_bytes());
    buf.extend_from_slice(&width.to_le_bytes());
    buf.extend_from_slice(&height.to_le_bytes()); // positive = bottom-up
    buf.extend_from_slice(&1u16.to_le_bytes()); // planes
    buf.extend_from_slice(&24u16.to_le_bytes()); // bits per pixel
    buf.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    buf.extend_from_slice(&(pixel_data_size as u32).to_le_bytes());
    // x/y pixels per meter, colors used, colors important (all 0)
    buf.extend_from_slice(&[0; 16]);

    // -- Pixel data (bottom-up, BGR) --
    for row in rgb_data.chunks_exact(row_bytes.max(1)).rev() {
        for px in row.chunks_exact(3) {
            buf.extend_from_slice(&[px[2], px[1], px[0]]);
        }
        // Pad row to 4-byte boundary
        buf.extend(std::iter::repeat(0).take(padding));
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u32_at(buf: &[u8], off: usize) -> u32 {
        u32::from_le_bytes([buf[off], buf[off + 1], buf[off + 2], buf[off + 3]])
    }

    #[test]
    fn test_header_fields() {
        let bmp = encode_bmp_24(2, 2, &[0u8; 12]).unwrap();
        assert_eq!(&bmp[..2], b"BM");
        // 2 px * 3 = 6 bytes, padded to 8, two rows
        assert_eq!(u32_at(&bmp, 2) as usize, 54 + 16);
        assert_eq!(bmp.len(), 54 + 16);
        assert_eq!(u32_at(&bmp, 10), 54);
        assert_eq!(u32_at(&bmp, 18), 2);
        assert_eq!(u32_at(&bmp, 22), 2);
        assert_eq!(u32_at(&bmp, 34), 16);
    }

    #[test]
    fn test_rows_are_bottom_up_bgr() {
        // top row red, bottom row blue, 1 px wide
        let bmp = encode_bmp_24(1, 2, &[255, 0, 0, 0, 0, 255]).unwrap();
        // first stored row is the bottom (blue) row: B G R + 1 pad byte
        assert_eq!(&bmp[54..58], &[255, 0, 0, 0]);
        assert_eq!(&bmp[58..62], &[0, 0, 255, 0]);
    }

    #[test]
    fn test_size_mismatch() {
        assert_eq!(
            encode_bmp_24(2, 2, &[0u8; 11]).unwrap_err(),
            ImageError::SizeMismatch { expected: 12, actual: 11 }
        );
    }
}
