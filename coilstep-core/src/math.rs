//! Integer helpers

/// Linearly map `x` from `[in_min, in_max]` onto `[out_min, out_max]`
///
/// `x` is clamped to the input range first. The output range may be
/// descending (`out_min > out_max`). An empty input range maps everything
/// to `out_min`.
pub fn interpolate(x: u32, in_min: u32, in_max: u32, out_min: u32, out_max: u32) -> u32 {
    if in_max <= in_min {
        return out_min;
    }

    let x = x.clamp(in_min, in_max);
    let offset = i128::from(x - in_min);
    let span_in = i128::from(in_max - in_min);
    let span_out = i128::from(out_max) - i128::from(out_min);

    // |offset * span_out| < 2^64, result stays between out_min and out_max
    (i128::from(out_min) + offset * span_out / span_in) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_ascending() {
        assert_eq!(interpolate(0, 0, 100, 0, 1000), 0);
        assert_eq!(interpolate(50, 0, 100, 0, 1000), 500);
        assert_eq!(interpolate(100, 0, 100, 0, 1000), 1000);
        assert_eq!(interpolate(512, 0, 1023, 0, 255), 127);
    }

    #[test]
    fn test_interpolate_descending() {
        assert_eq!(interpolate(0, 0, 100, 45_000, 100), 45_000);
        assert_eq!(interpolate(100, 0, 100, 45_000, 100), 100);
        assert_eq!(interpolate(50, 0, 100, 45_000, 100), 22_550);
    }

    #[test]
    fn test_interpolate_clamps() {
        assert_eq!(interpolate(150, 0, 100, 0, 10), 10);
        assert_eq!(interpolate(5, 10, 20, 0, 10), 0);
    }

    #[test]
    fn test_interpolate_empty_range() {
        assert_eq!(interpolate(7, 10, 10, 3, 9), 3);
        assert_eq!(interpolate(7, 20, 10, 3, 9), 3);
    }

    #[test]
    fn test_interpolate_wide_range() {
        // Full-step rated range does not overflow 32-bit math paths
        assert_eq!(interpolate(0, 0, 100, 5_000_000, 950), 5_000_000);
        assert_eq!(interpolate(100, 0, 100, 5_000_000, 950), 950);
    }

    #[test]
    fn test_interpolate_full_u32_range() {
        assert_eq!(interpolate(u32::MAX, 0, u32::MAX, 0, u32::MAX), u32::MAX);
        assert_eq!(interpolate(u32::MAX, 0, u32::MAX, u32::MAX, 0), 0);
        assert_eq!(interpolate(0, 0, u32::MAX, u32::MAX, 0), u32::MAX);
        assert_eq!(interpolate(u32::MAX / 2, 0, u32::MAX, 0, u32::MAX), u32::MAX / 2);
        assert_eq!(interpolate(1, 0, 2, u32::MAX, 1), u32::MAX / 2 + 1);
    }
}
