//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

use crate::timer::{TENTHS_PER_SECOND, Tenths};

/// Round tenths up to whole seconds.
#[must_use]
pub const fn ceil_tenths_to_secs(tenths: Tenths) -> u32 {
    tenths.div_ceil(TENTHS_PER_SECOND)
}

/// Convert a 0..=1 ratio to a whole percentage, clamping out-of-range and NaN input.
#[must_use]
pub fn ratio_to_pct(ratio: f64) -> u8 {
    if ratio.is_nan() {
        return 0;
    }
    let pct = (ratio.clamp(0.0, 1.0) * 100.0).round();
    cast::<f64, u8>(pct).unwrap_or(0)
}

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Mean of the values, `0.0` for an empty slice.
#[must_use]
pub fn mean_i64(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let total: f64 = values.iter().copied().map(i64_to_f64).sum();
    total / usize_to_f64(values.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceil_rounds_partial_seconds_up() {
        assert_eq!(ceil_tenths_to_secs(0), 0);
        assert_eq!(ceil_tenths_to_secs(1), 1);
        assert_eq!(ceil_tenths_to_secs(10), 1);
        assert_eq!(ceil_tenths_to_secs(11), 2);
        assert_eq!(ceil_tenths_to_secs(50), 5);
    }

    #[test]
    fn pct_clamps_and_handles_nan() {
        assert_eq!(ratio_to_pct(f64::NAN), 0);
        assert_eq!(ratio_to_pct(-0.5), 0);
        assert_eq!(ratio_to_pct(0.284), 28);
        assert_eq!(ratio_to_pct(7.0), 100);
    }

    #[test]
    fn mean_handles_empty_and_values() {
        assert!((mean_i64(&[]) - 0.0).abs() < f64::EPSILON);
        assert!((mean_i64(&[10, 20, 30]) - 20.0).abs() < f64::EPSILON);
    }
}
