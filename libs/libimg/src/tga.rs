//! Truevision TGA decoding for textures.
//!
//! Decoding is done by the `image` crate: uncompressed and RLE true-color
//! (24/32 bpp) and grayscale images, with the origin flip applied. The
//! result is always converted to RGBA.

use image::ImageFormat;

use crate::error::ImageError;
use crate::Image;

/// Decode a TGA file into a top-down RGBA image.
pub fn decode(data: &[u8]) -> Result<Image, ImageError> {
    let rgba = image::load_from_memory_with_format(data, ImageFormat::Tga)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ImageError::Invalid("zero image dimension".into()));
    }
    log::debug!("tga: {}x{}", width, height);
    Ok(Image {
        width: width as usize,
        height: height as usize,
        rgba: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER_LEN: usize = 18;
    const TYPE_TRUECOLOR: u8 = 2;
    const TYPE_RLE_TRUECOLOR: u8 = 10;
    const TYPE_RLE_GRAYSCALE: u8 = 11;
    const DESC_TOP_TO_BOTTOM: u8 = 0x20;

    fn header(image_type: u8, w: u16, h: u16, bpp: u8, desc: u8) -> Vec<u8> {
        let mut v = vec![0u8; HEADER_LEN];
        v[2] = image_type;
        v[12..14].copy_from_slice(&w.to_le_bytes());
        v[14..16].copy_from_slice(&h.to_le_bytes());
        v[16] = bpp;
        v[17] = desc;
        v
    }

    // =============================================================================
    // Uncompressed
    // =============================================================================

    #[test]
    fn test_truecolor_24_bottom_up() {
        // 2x2, stored bottom row first: blue, green / red, white
        let mut data = header(TYPE_TRUECOLOR, 2, 2, 24, 0);
        data.extend_from_slice(&[255, 0, 0, 0, 255, 0]);
        data.extend_from_slice(&[0, 0, 255, 255, 255, 255]);
        let img = decode(&data).unwrap();
        assert_eq!((img.width, img.height), (2, 2));
        assert_eq!(img.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(img.pixel(1, 0), Some([255, 255, 255, 255]));
        assert_eq!(img.pixel(0, 1), Some([0, 0, 255, 255]));
        assert_eq!(img.pixel(1, 1), Some([0, 255, 0, 255]));
    }

    #[test]
    fn test_truecolor_32_top_down_keeps_alpha() {
        let mut data = header(TYPE_TRUECOLOR, 1, 2, 32, DESC_TOP_TO_BOTTOM | 8);
        data.extend_from_slice(&[10, 20, 30, 0, 40, 50, 60, 128]);
        let img = decode(&data).unwrap();
        assert_eq!(img.pixel(0, 0), Some([30, 20, 10, 0]));
        assert_eq!(img.pixel(0, 1), Some([60, 50, 40, 128]));
    }

    #[test]
    fn test_skips_image_id() {
        let mut data = header(TYPE_TRUECOLOR, 1, 1, 24, DESC_TOP_TO_BOTTOM);
        data[0] = 3;
        data.extend_from_slice(b"abc");
        data.extend_from_slice(&[1, 2, 3]);
        let img = decode(&data).unwrap();
        assert_eq!(img.pixel(0, 0), Some([3, 2, 1, 255]));
    }

    #[test]
    fn test_truncated_pixels() {
        let mut data = header(TYPE_TRUECOLOR, 2, 2, 24, 0);
        data.extend_from_slice(&[0; 5]);
        assert!(matches!(decode(&data), Err(ImageError::Truncated(_))));
    }

    #[test]
    fn test_short_header() {
        assert!(matches!(decode(&[0; 4]), Err(ImageError::Truncated(_))));
    }

    #[test]
    fn test_rejects_unknown_type_and_bad_depth() {
        let mut data = header(5, 1, 1, 24, 0);
        data.extend_from_slice(&[0; 3]);
        assert!(matches!(decode(&data), Err(ImageError::Unsupported(_))));

        let mut data = header(TYPE_TRUECOLOR, 1, 1, 12, 0);
        data.extend_from_slice(&[0; 2]);
        assert!(matches!(decode(&data), Err(ImageError::Unsupported(_))));
    }

    #[test]
    fn test_rejects_zero_size() {
        let data = header(TYPE_TRUECOLOR, 0, 4, 24, 0);
        assert!(decode(&data).is_err());
    }

    // =============================================================================
    // RLE
    // =============================================================================

    #[test]
    fn test_rle_truecolor_mixed_packets() {
        // 4x1: run of 3 red, then one raw blue
        let mut data = header(TYPE_RLE_TRUECOLOR, 4, 1, 24, DESC_TOP_TO_BOTTOM);
        data.extend_from_slice(&[0x82, 0, 0, 255]);
        data.extend_from_slice(&[0x00, 255, 0, 0]);
        let img = decode(&data).unwrap();
        for x in 0..3 {
            assert_eq!(img.pixel(x, 0), Some([255, 0, 0, 255]));
        }
        assert_eq!(img.pixel(3, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn test_rle_grayscale() {
        let mut data = header(TYPE_RLE_GRAYSCALE, 2, 2, 8, DESC_TOP_TO_BOTTOM);
        data.extend_from_slice(&[0x81, 7, 0x01, 8, 9]);
        let img = decode(&data).unwrap();
        assert_eq!(img.pixel(1, 0), Some([7, 7, 7, 255]));
        assert_eq!(img.pixel(0, 1), Some([8, 8, 8, 255]));
        assert_eq!(img.pixel(1, 1), Some([9, 9, 9, 255]));
    }

    #[test]
    fn test_rle_truncated() {
        let mut data = header(TYPE_RLE_TRUECOLOR, 2, 1, 24, 0);
        data.extend_from_slice(&[0x81, 1, 2]);
        assert!(matches!(decode(&data), Err(ImageError::Truncated(_))));
    }
}
