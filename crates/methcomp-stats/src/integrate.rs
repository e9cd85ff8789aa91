/// Integrates sampled `y` over sampled `x` with the trapezoidal rule.
///
/// The samples need not be evenly spaced; a decreasing `x` yields a negative
/// area, matching the usual convention.
///
/// # Returns
///
/// * `Some(area)` - if both slices have the same length
/// * `None` - if the lengths differ
///
/// # Examples
///
/// ```
/// use methcomp_stats::integrate::trapezoid;
///
/// let x = [0.0, 1.0, 2.0];
/// let y = [0.0, 1.0, 0.0];
/// assert_eq!(trapezoid(&x, &y), Some(1.0));
/// ```
#[must_use]
pub fn trapezoid(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() {
        return None;
    }
    let area = x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum();
    Some(area)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_length_mismatch() {
        assert!(trapezoid(&[0.0, 1.0], &[1.0]).is_none());
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(trapezoid(&[], &[]), Some(0.0));
        assert_eq!(trapezoid(&[1.0], &[5.0]), Some(0.0));
    }

    #[test]
    fn test_uneven_spacing() {
        // y = x over [0, 3]
        let x = [0.0, 0.5, 3.0];
        let y = [0.0, 0.5, 3.0];
        assert_relative_eq!(trapezoid(&x, &y).unwrap(), 4.5);
    }

    #[test]
    fn test_decreasing_x_is_negative() {
        let x = [2.0, 1.0, 0.0];
        let y = [1.0, 1.0, 1.0];
        assert_relative_eq!(trapezoid(&x, &y).unwrap(), -2.0);
    }
}
