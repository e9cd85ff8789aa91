use serde::Serialize;

use super::{Estimate, RegressionResult, intercept_at, ordered};
use crate::{Analysis, ConfidenceLevel, Error, PairedSample};

/// Passing–Bablok robust regression.
///
/// The slope is the shifted median of all pairwise slopes
/// `(y[j] - y[i]) / (x[j] - x[i])`, `i < j`, and the intercept is the median
/// of `y - slope * x`. Confidence bounds come from order statistics of the
/// same slope array.
///
/// # Examples
///
/// ```
/// use methcomp::{Analysis, PairedSample, regression::PassingBablok};
///
/// let sample = PairedSample::new([1.0, 2.0, 3.0, 4.0], [2.0, 4.0, 6.0, 8.0]).unwrap();
/// let result = PassingBablok::default().analyze(&sample).unwrap();
/// assert_eq!(result.slope.value, 2.0);
/// assert_eq!(result.intercept.value, 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PassingBablok {
    confidence: ConfidenceLevel,
}

impl PassingBablok {
    #[must_use]
    pub fn new(confidence: ConfidenceLevel) -> Self {
        Self { confidence }
    }

    #[must_use]
    pub fn confidence(&self) -> ConfidenceLevel {
        self.confidence
    }
}

impl Analysis for PassingBablok {
    type Output = RegressionResult;

    fn name(&self) -> &'static str {
        "passing-bablok"
    }

    fn analyze(&self, sample: &PairedSample) -> Result<RegressionResult, Error> {
        let slopes = pairwise_slopes(sample);
        if slopes.is_empty() {
            return Err(Error::insufficient(
                "every pair of observations is identical in both methods",
            ));
        }

        let count = slopes.len();
        let shift = slopes.iter().position(|&s| s > 0.0).unwrap_or(0) / 2;
        let at = |i: usize| {
            slopes
                .get(i + shift)
                .copied()
                .ok_or(Error::insufficient("shifted slope rank is past the last slope"))
        };

        let slope = if count % 2 == 1 {
            at((count - 1) / 2)?
        } else {
            signed_geometric_mean(at(count / 2 - 1)?, at(count / 2)?)
        };
        if !slope.is_finite() {
            return Err(Error::insufficient("median pairwise slope is infinite"));
        }

        let (lower_rank, upper_rank) = confidence_ranks(count, sample.len(), self.confidence);
        let (slope_lo, slope_hi) = ordered(at(lower_rank)?, at(upper_rank)?);
        tracing::debug!(
            slopes = count,
            shift,
            lower_rank,
            upper_rank,
            "passing-bablok order statistics"
        );
        if !slope_lo.is_finite() || !slope_hi.is_finite() {
            return Err(Error::insufficient(
                "confidence bound of the pairwise slopes is infinite",
            ));
        }

        let intercept = intercept_at(sample, slope);
        let (intercept_lo, intercept_hi) =
            ordered(intercept_at(sample, slope_hi), intercept_at(sample, slope_lo));
        if ![intercept, intercept_lo, intercept_hi].iter().all(|v| v.is_finite()) {
            return Err(Error::insufficient("intercept is not finite"));
        }

        Ok(RegressionResult {
            slope: Estimate::new(slope, slope_lo, slope_hi),
            intercept: Estimate::new(intercept, intercept_lo, intercept_hi),
        })
    }
}

/// Sorted pairwise slopes with degenerate pairs resolved.
///
/// Pairs equal in both methods are dropped. Pairs equal only in method1
/// become an infinity carrying the sign of the method2 difference. A zero
/// slope keeps the sign of its denominator so that negative zeros sort first.
fn pairwise_slopes(sample: &PairedSample) -> Vec<f64> {
    let x = sample.method1();
    let y = sample.method2();
    let n = x.len();

    let mut dropped = 0_usize;
    let mut slopes = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[j] - x[i];
            let dy = y[j] - y[i];
            let slope = match (dx == 0.0, dy == 0.0) {
                (true, true) => {
                    dropped += 1;
                    continue;
                }
                (true, false) => f64::INFINITY.copysign(dy),
                (false, _) => dy / dx,
            };
            slopes.push(slope);
        }
    }
    if dropped > 0 {
        tracing::debug!(dropped, "ignored pairs identical in both methods");
    }

    slopes.sort_by(f64::total_cmp);
    slopes
}

/// Geometric mean that keeps the common sign of its arguments.
///
/// Falls back to the arithmetic mean when the signs differ or either is zero.
fn signed_geometric_mean(a: f64, b: f64) -> f64 {
    if a > 0.0 && b > 0.0 {
        (a * b).sqrt()
    } else if a < 0.0 && b < 0.0 {
        -(a * b).sqrt()
    } else {
        f64::midpoint(a, b)
    }
}

/// 0-based ranks (before the shift) of the confidence bounds in the sorted
/// slope array.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn confidence_ranks(count: usize, n: usize, confidence: ConfidenceLevel) -> (usize, usize) {
    let n = n as f64;
    let z = methcomp_stats::distribution::standard_normal_quantile(confidence.upper_tail());
    let c = z * (n * (n - 1.0) * (2.0 * n + 5.0) / 18.0).sqrt();
    let lower = ((count as f64 - c) / 2.0).floor().max(0.0) as usize;
    let lower = lower.min(count - 1);
    let upper = count - 1 - lower;
    (lower, upper)
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::regression::test_data::{METHOD1, METHOD2};

    fn analyze(x: &[f64], y: &[f64]) -> Result<RegressionResult, Error> {
        let sample = PairedSample::new(x.iter().copied(), y.iter().copied())?;
        PassingBablok::default().analyze(&sample)
    }

    #[test]
    fn test_reference_dataset() {
        let result = analyze(&METHOD1, &METHOD2).unwrap();

        assert_relative_eq!(result.slope.value, 1.005, epsilon = 1e-12);
        assert_relative_eq!(result.slope.ci_low, 0.984_615_384_6, epsilon = 1e-9);
        assert_relative_eq!(result.slope.ci_high, 1.027_777_777_8, epsilon = 1e-9);
        assert_abs_diff_eq!(result.intercept.value, 0.0125, epsilon = 1e-9);
        assert_abs_diff_eq!(result.intercept.ci_low, -0.308_888_888_9, epsilon = 1e-9);
        assert_abs_diff_eq!(result.intercept.ci_high, 0.141_153_846_2, epsilon = 1e-9);

        // published values for the same data
        assert_abs_diff_eq!(result.slope.value, 1.0050, epsilon = 1e-3);
        assert_abs_diff_eq!(result.slope.ci_low, 0.9848, epsilon = 1e-3);
        assert_abs_diff_eq!(result.slope.ci_high, 1.0266, epsilon = 2e-3);
        assert_abs_diff_eq!(result.intercept.ci_high, 0.1393, epsilon = 2e-3);
        assert_abs_diff_eq!(result.intercept.ci_low, -0.2975, epsilon = 2e-2);
    }

    #[test]
    fn test_interval_brackets_estimate() {
        let result = analyze(&METHOD1, &METHOD2).unwrap();
        assert!(result.slope.contains(result.slope.value));
        assert!(result.intercept.contains(result.intercept.value));
    }

    #[test]
    fn test_odd_slope_count_uses_central_element() {
        // three pairs -> three slopes: 1, 2, 3
        let result = analyze(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).unwrap();
        assert_eq!(result.slope.value, 2.0);
    }

    #[test]
    fn test_all_negative_slopes_are_not_shifted() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [5.0, 4.0, 3.0, 2.0, 1.0];
        let result = analyze(&x, &y).unwrap();
        // no positive slope, so the median is taken unshifted
        assert_eq!(result.slope.value, -1.0);
        assert_eq!(result.intercept.value, 6.0);
    }

    #[test]
    fn test_negatively_correlated_median() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [5.0, 4.2, 2.9, 2.1, 0.8];
        let result = analyze(&x, &y).unwrap();

        // sorted slopes run from -1.3 to -0.8, the central pair is -1.05
        assert_relative_eq!(result.slope.value, -1.05, epsilon = 1e-12);
        assert_relative_eq!(result.slope.ci_low, -1.3, epsilon = 1e-12);
        assert_relative_eq!(result.slope.ci_high, -0.8, epsilon = 1e-12);
        assert_relative_eq!(result.intercept.value, 6.05, epsilon = 1e-12);
        assert_relative_eq!(result.intercept.ci_low, 5.3, epsilon = 1e-12);
        assert_relative_eq!(result.intercept.ci_high, 6.8, epsilon = 1e-12);
    }

    #[test]
    fn test_non_positive_slopes_shift_the_ranks() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let y = [1.0, 3.0, 2.0, 5.0, 4.0, 7.0, 6.0, 9.0];
        let result = analyze(&x, &y).unwrap();

        // three slopes of -1 precede the first positive one, so every rank
        // moves up by one
        assert_eq!(result.slope.value, 1.0);
        assert_relative_eq!(result.slope.ci_low, 0.75, epsilon = 1e-12);
        assert_relative_eq!(result.slope.ci_high, 5.0 / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.intercept.value, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_shift_past_the_last_slope() {
        let err = analyze(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 1.0, 4.0, 3.0, 6.0]).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_tied_method1_with_infinite_bound() {
        let err = analyze(&[1.0, 1.0, 2.0], &[1.0, 2.0, 2.0]).unwrap_err();
        assert!(err.is_insufficient_data());

        let err = analyze(&[81.0, 35.0, 61.0, 81.0], &[42.33, 42.53, 42.08, 54.68]).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_tied_method1_with_finite_bounds() {
        let mut x = METHOD1.to_vec();
        let mut y = METHOD2.to_vec();
        x.push(METHOD1[10]);
        y.push(METHOD2[10] + 0.5);
        let result = analyze(&x, &y).unwrap();
        assert!(result.slope.ci_high.is_finite());
        assert!(result.intercept.ci_low.is_finite());
        assert!(result.slope.contains(result.slope.value));
        assert!(result.intercept.contains(result.intercept.value));
    }

    #[test]
    fn test_degenerate_pairs() {
        let sample = PairedSample::new([1.0, 1.0, 1.0, 2.0], [1.0, 1.0, 3.0, 2.0]).unwrap();
        let slopes = pairwise_slopes(&sample);
        // (0,1) dropped; (0,2), (1,2) vertical up; (2,3) negative
        assert_eq!(slopes.len(), 5);
        assert_eq!(slopes[0], -1.0);
        assert_eq!(slopes[3], f64::INFINITY);
        assert_eq!(slopes[4], f64::INFINITY);
    }

    #[test]
    fn test_negative_zero_sorts_first() {
        let sample = PairedSample::new([2.0, 1.0, 3.0], [1.0, 1.0, 1.0]).unwrap();
        let slopes = pairwise_slopes(&sample);
        assert_eq!(slopes.len(), 3);
        assert!(slopes[0].is_sign_negative());
        assert!(slopes[1].is_sign_positive());
    }

    #[test]
    fn test_all_pairs_identical() {
        let err = analyze(&[1.0, 1.0, 1.0], &[2.0, 2.0, 2.0]).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_vertical_data_has_no_finite_slope() {
        let err = analyze(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_signed_geometric_mean() {
        assert_eq!(signed_geometric_mean(4.0, 9.0), 6.0);
        assert_eq!(signed_geometric_mean(-4.0, -9.0), -6.0);
        assert_eq!(signed_geometric_mean(-1.0, 3.0), 1.0);
    }

    #[test]
    fn test_wider_confidence_widens_interval() {
        let sample = PairedSample::new(METHOD1, METHOD2).unwrap();
        let narrow = PassingBablok::new(ConfidenceLevel::new(0.8).unwrap())
            .analyze(&sample)
            .unwrap();
        let wide = PassingBablok::new(ConfidenceLevel::new(0.99).unwrap())
            .analyze(&sample)
            .unwrap();
        assert!(wide.slope.width() >= narrow.slope.width());
        assert_eq!(wide.slope.value, narrow.slope.value);
    }
}
