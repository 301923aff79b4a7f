//! Decimal rounding of error scores.
//!
//! Scores are rounded the way array libraries round floats: scale by
//! `10^decimals`, round half to even, scale back. Rounding is what lets the
//! reducer treat `0.123456` and `0.123455` as the same score at 5 decimals.

/// Round `value` to `decimals` digits after the point (half to even).
///
/// Non-finite values pass through unchanged, as does any value when
/// `decimals` is past the precision of an `f64`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() || decimals > f64::MAX_10_EXP as u32 {
        return value;
    }
    let scale = 10f64.powi(decimals as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_scores_collapse_at_five_decimals() {
        assert_eq!(round_to(0.123456, 5), 0.12346);
        assert_eq!(round_to(0.123455, 5), 0.12346);
    }

    #[test]
    fn ties_round_to_even() {
        assert_eq!(round_to(0.5, 0), 0.0);
        assert_eq!(round_to(1.5, 0), 2.0);
        assert_eq!(round_to(2.5, 0), 2.0);
    }

    #[test]
    fn non_finite_passes_through() {
        assert!(round_to(f64::NAN, 6).is_nan());
        assert_eq!(round_to(f64::INFINITY, 6), f64::INFINITY);
    }

    #[test]
    fn huge_decimals_leave_value_unchanged() {
        assert_eq!(round_to(0.123456, 400), 0.123456);
        assert_eq!(round_to(0.123456, 3_000_000_000), 0.123456);
        assert_eq!(round_to(0.123456, u32::MAX), 0.123456);
    }
}
