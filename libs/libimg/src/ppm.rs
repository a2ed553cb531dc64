//! Binary PPM (P6) encoding, the simplest format for dumping frames.

use crate::error::ImageError;

/// Encode a top-down RGB pixel buffer as a binary `P6` PPM with maxval 255.
pub fn encode_ppm(width: u32, height: u32, rgb_data: &[u8]) -> Result<Vec<u8>, ImageError> {
    crate::check_rgb_len(width, height, rgb_data)?;
    let header = format!("P6\n{} {}\n255\n", width, height);
    let mut buf = Vec::with_capacity(header.len() + rgb_data.len());
    buf.extend_from_slice(header.as_bytes());
    buf.extend_from_slice(rgb_data);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_ppm() {
        let ppm = encode_ppm(2, 1, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(&ppm[..11], b"P6\n2 1\n255\n");
        assert_eq!(&ppm[11..], &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_encode_ppm_size_mismatch() {
        assert!(matches!(
            encode_ppm(2, 2, &[0; 3]),
            Err(ImageError::SizeMismatch { expected: 12, actual: 3 })
        ));
    }
}
