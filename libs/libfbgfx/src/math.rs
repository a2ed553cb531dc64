//! Integer helpers for the scanline rasterizers.

/// Integer square root (floor) by Newton's method. Negative input yields 0.
pub fn isqrt_i64(n: i64) -> i64 {
    if n < 2 {
        return n.max(0);
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// Ceiling division for non-negative sizes (row bytes of a 1bpp glyph, etc).
#[inline]
pub const fn div_ceil(n: usize, d: usize) -> usize {
    (n + d - 1) / d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isqrt_small_values() {
        let expected = [0, 1, 1, 1, 2, 2, 2, 2, 2, 3];
        for (n, want) in expected.iter().enumerate() {
            assert_eq!(isqrt_i64(n as i64), *want, "isqrt({})", n);
        }
    }

    #[test]
    fn test_isqrt_perfect_squares_and_neighbours() {
        for r in [10i64, 255, 1000, 46_340] {
            assert_eq!(isqrt_i64(r * r), r);
            assert_eq!(isqrt_i64(r * r - 1), r - 1);
            assert_eq!(isqrt_i64(r * r + 1), r);
        }
    }

    #[test]
    fn test_isqrt_negative() {
        assert_eq!(isqrt_i64(-9), 0);
    }

    #[test]
    fn test_div_ceil() {
        assert_eq!(div_ceil(8, 8), 1);
        assert_eq!(div_ceil(9, 8), 2);
        assert_eq!(div_ceil(0, 8), 0);
    }
}
