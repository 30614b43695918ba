/// `numerator / denominator`, or None when the denominator is zero (or not finite).
#[inline]
pub fn fraction(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !denominator.is_finite() {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Share of items that are NOT flagged, i.e. `1 - flagged/total`.
#[inline]
pub fn complement_ratio(flagged: usize, total: usize) -> Option<f64> {
    fraction(flagged as f64, total as f64).map(|f| 1.0 - f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction() {
        assert_eq!(fraction(1.0, 4.0), Some(0.25));
        assert_eq!(fraction(1.0, 0.0), None);
        assert_eq!(fraction(0.0, f64::NAN), None);
    }

    #[test]
    fn test_complement_ratio() {
        assert_eq!(complement_ratio(1, 4), Some(0.75));
        assert_eq!(complement_ratio(0, 0), None);
    }
}
