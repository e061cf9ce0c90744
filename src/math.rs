//! Math function wrappers for std/no_std compatibility
//!
//! Uses standard library math when available, falls back to libm for no_std.

#[cfg(feature = "std")]
#[inline]
pub fn round(x: f64) -> f64 {
    x.round()
}

#[cfg(not(feature = "std"))]
#[inline]
pub fn round(x: f64) -> f64 {
    libm::round(x)
}

/// Scale `k` by `factor`, rounding to the nearest count and never going below `k`
pub fn scaled_capacity(k: usize, factor: f64) -> usize {
    let scaled = round(k as f64 * factor);
    // `as` saturates for out-of-range floats, NaN maps to 0
    let scaled = scaled as usize;
    scaled.max(k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round(2.5), 3.0);
        assert_eq!(round(2.4), 2.0);
    }

    #[test]
    fn test_scaled_capacity() {
        assert_eq!(scaled_capacity(10, 5.0), 50);
        assert_eq!(scaled_capacity(3, 1.5), 5); // 4.5 rounds up
        assert_eq!(scaled_capacity(10, 0.5), 10);
        assert_eq!(scaled_capacity(0, 5.0), 0);
    }
}
