//! Mountain plot: the folded empirical distribution of differences.
//!
//! # Overview
//!
//! The differences `method1 - method2` are evaluated at `n_percentiles`
//! evenly spaced probabilities `p` in `[0, 1]`. The mountain height at `p`
//! is `100 * p` below the median and `100 * (1 - p)` above it, so the curve
//! peaks near 50 at the median difference. A narrow mountain centred on zero
//! means good agreement.
//!
//! The area under the mountain (taken over the difference axis) equals, in
//! the limit, 100 times the mean absolute deviation of the differences from
//! their median.

use serde::Serialize;

use crate::{
    Analysis, Error, PairedSample,
    result_map::{ResultMap, ResultValue, ToResultMap},
};

/// Mountain analysis options.
///
/// # Examples
///
/// ```
/// use methcomp::{Analysis, Mountain, PairedSample};
///
/// let sample = PairedSample::new([1.0, 2.0, 3.0, 4.0], [1.0, 2.0, 3.0, 4.0]).unwrap();
/// let result = Mountain::default().analyze(&sample).unwrap();
/// assert_eq!(result.median, 0.0);
/// assert_eq!(result.auc, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Mountain {
    n_percentiles: usize,
    iqr: f64,
}

impl Default for Mountain {
    fn default() -> Self {
        Self {
            n_percentiles: Self::DEFAULT_PERCENTILES,
            iqr: Self::DEFAULT_IQR,
        }
    }
}

impl Mountain {
    pub const DEFAULT_PERCENTILES: usize = 100;
    /// Central coverage of ±1 standard deviation of a normal distribution.
    pub const DEFAULT_IQR: f64 = 68.27;

    /// # Errors
    ///
    /// * [`Error::Range`] - if `n_percentiles` is zero
    /// * [`Error::Range`] - if `iqr` is outside `[0, 100]`
    pub fn new(n_percentiles: usize, iqr: f64) -> Result<Self, Error> {
        Self::default()
            .with_percentiles(n_percentiles)?
            .with_iqr(iqr)
    }

    /// # Errors
    ///
    /// Returns [`Error::Range`] if `n_percentiles` is zero.
    #[expect(clippy::cast_precision_loss)]
    pub fn with_percentiles(self, n_percentiles: usize) -> Result<Self, Error> {
        if n_percentiles == 0 {
            return Err(Error::range(
                "n_percentiles",
                "greater than zero",
                n_percentiles as f64,
            ));
        }
        Ok(Self {
            n_percentiles,
            ..self
        })
    }

    /// # Errors
    ///
    /// Returns [`Error::Range`] if `iqr` is outside `[0, 100]`.
    pub fn with_iqr(self, iqr: f64) -> Result<Self, Error> {
        if !(0.0..=100.0).contains(&iqr) {
            return Err(Error::range("iqr", "in the range [0, 100]", iqr));
        }
        Ok(Self { iqr, ..self })
    }

    #[must_use]
    pub fn n_percentiles(&self) -> usize {
        self.n_percentiles
    }

    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.iqr
    }
}

/// Result of a [`Mountain`] analysis.
///
/// `mountain` and `quantile` are co-indexed and ordered by probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MountainResult {
    /// Folded CDF in percent, bounded by `[0, 50]`.
    pub mountain: Vec<f64>,
    /// Difference at each probability.
    pub quantile: Vec<f64>,
    pub auc: f64,
    pub median: f64,
    pub median_idx: usize,
    /// Differences at probabilities `0.5 ± iqr_pct / 200`.
    pub iqr: (f64, f64),
    /// Indices in `quantile` closest to each `iqr` bound.
    pub iqr_idx: (usize, usize),
    pub iqr_pct: f64,
}

impl ToResultMap for MountainResult {
    fn to_result_map(&self) -> ResultMap {
        ResultMap::from([
            ("mountain", ResultValue::Sequence(self.mountain.clone())),
            ("quantile", ResultValue::Sequence(self.quantile.clone())),
            ("auc", ResultValue::Scalar(self.auc)),
            ("median", ResultValue::Scalar(self.median)),
            ("median_idx", ResultValue::Count(self.median_idx)),
            ("iqr", self.iqr.into()),
            ("iqr_idx", self.iqr_idx.into()),
            ("iqr_pct", ResultValue::Scalar(self.iqr_pct)),
        ])
    }
}

impl Analysis for Mountain {
    type Output = MountainResult;

    fn name(&self) -> &'static str {
        "mountain"
    }

    fn analyze(&self, sample: &PairedSample) -> Result<MountainResult, Error> {
        use methcomp_stats::{integrate::trapezoid, quantile};

        let mut differences = sample.differences();
        differences.sort_by(f64::total_cmp);
        let at = |p: f64| {
            quantile::from_sorted(&differences, p)
                .ok_or(Error::insufficient("no differences to fold"))
        };

        let probabilities = quantile::linspace(0.0, 1.0, self.n_percentiles);
        let quantiles = probabilities
            .iter()
            .map(|&p| at(p))
            .collect::<Result<Vec<_>, _>>()?;
        let mountain = probabilities
            .iter()
            .map(|&p| if p < 0.5 { p * 100.0 } else { (1.0 - p) * 100.0 })
            .collect::<Vec<_>>();
        let auc = trapezoid(&quantiles, &mountain).unwrap_or(f64::NAN);

        let median_idx = self.n_percentiles / 2;
        let median = quantiles[median_idx];

        let half_width = self.iqr / 200.0;
        let iqr = (at(0.5 - half_width)?, at(0.5 + half_width)?);
        let iqr_idx = (nearest_index(&quantiles, iqr.0), nearest_index(&quantiles, iqr.1));
        tracing::trace!(auc, median, ?iqr, "mountain summary");

        Ok(MountainResult {
            mountain,
            quantile: quantiles,
            auc,
            median,
            median_idx,
            iqr,
            iqr_idx,
            iqr_pct: self.iqr,
        })
    }
}

/// First index whose value is closest to `target`.
fn nearest_index(values: &[f64], target: f64) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(best, best_dist), (i, v)| {
            let dist = (v - target).abs();
            if dist < best_dist { (i, dist) } else { (best, best_dist) }
        })
        .0
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    use super::*;
    use crate::regression::test_data::{METHOD1, METHOD2};

    fn reference(mountain: Mountain) -> MountainResult {
        let sample = PairedSample::new(METHOD1, METHOD2).unwrap();
        mountain.analyze(&sample).unwrap()
    }

    #[test]
    fn test_reference_dataset() {
        let result = reference(Mountain::default());
        assert_eq!(result.mountain.len(), 100);
        assert_eq!(result.quantile.len(), 100);
        assert_eq!(result.median_idx, 50);
        assert_abs_diff_eq!(result.median, -0.038_080_8, epsilon = 1e-6);
        assert_abs_diff_eq!(result.auc, 18.501_173_3, epsilon = 1e-5);
        assert_abs_diff_eq!(result.iqr.0, -0.159_856_5, epsilon = 1e-6);
        assert_abs_diff_eq!(result.iqr.1, 0.308_565, epsilon = 1e-6);
        assert_abs_diff_eq!(result.iqr.1 - result.iqr.0, 0.468_421_5, epsilon = 1e-6);
        assert_eq!(result.iqr_idx, (16, 84));
        let peak = result.mountain.iter().copied().fold(0.0, f64::max);
        assert_abs_diff_eq!(peak, 49.494_949_5, epsilon = 1e-6);

        // published values for the same data
        assert_abs_diff_eq!(result.median, -0.04, epsilon = 0.005);
        assert_abs_diff_eq!(result.auc, 18.5, epsilon = 0.01);
        assert_abs_diff_eq!(result.iqr.1 - result.iqr.0, 0.47, epsilon = 0.005);
    }

    #[test]
    fn test_quantiles_ascend() {
        let result = reference(Mountain::default());
        assert!(result.quantile.is_sorted_by(|a, b| a <= b));
        assert_eq!(result.mountain[0], 0.0);
        assert_abs_diff_eq!(result.mountain[99], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_percentile() {
        let result = reference(Mountain::new(1, 50.0).unwrap());
        assert_eq!(result.mountain, vec![0.0]);
        assert_eq!(result.median_idx, 0);
        assert_eq!(result.auc, 0.0);
    }

    #[test]
    fn test_zero_iqr_collapses_to_median() {
        let result = reference(Mountain::new(101, 0.0).unwrap());
        assert_eq!(result.iqr.0, result.iqr.1);
        assert_eq!(result.iqr_idx.0, result.iqr_idx.1);
        assert_abs_diff_eq!(result.iqr.0, result.median, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_invalid_options() {
        assert!(Mountain::new(0, 50.0).unwrap_err().is_range());
        assert!(Mountain::new(10, -1.0).unwrap_err().is_range());
        assert!(Mountain::new(10, 100.5).unwrap_err().is_range());
        assert!(Mountain::new(10, f64::NAN).unwrap_err().is_range());
        assert!(Mountain::new(10, 100.0).is_ok());
    }

    #[test]
    fn test_nearest_index_prefers_first() {
        assert_eq!(nearest_index(&[0.0, 1.0, 1.0, 2.0], 1.0), 1);
        assert_eq!(nearest_index(&[0.0, 2.0], 1.0), 0);
    }

    #[test]
    fn test_result_map() {
        let map = reference(Mountain::default()).to_result_map();
        assert_eq!(map["iqr_idx"], ResultValue::IndexPair([16, 84]));
        assert_eq!(map["median_idx"], ResultValue::Count(50));
    }

    proptest! {
        #[test]
        fn mountain_is_bounded(
            pairs in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 2..30),
            n_percentiles in 1usize..300,
        ) {
            let (x, y): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
            let sample = PairedSample::new(x, y).unwrap();
            let result = Mountain::new(n_percentiles, Mountain::DEFAULT_IQR)
                .unwrap()
                .analyze(&sample)
                .unwrap();
            prop_assert!(result.mountain.iter().all(|&m| (0.0..=50.0).contains(&m)));
            prop_assert!(result.auc >= 0.0);
            prop_assert!(result.iqr.0 <= result.iqr.1);
        }

        #[test]
        fn auc_approaches_mean_absolute_deviation(
            pairs in prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 2..12),
        ) {
            let (x, y): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();
            let sample = PairedSample::new(x, y).unwrap();
            let result = Mountain::new(20_001, Mountain::DEFAULT_IQR)
                .unwrap()
                .analyze(&sample)
                .unwrap();

            // 100 * integral over p of |Q(p) - Q(0.5)|, midpoint rule
            let mut diffs = sample.differences();
            diffs.sort_by(f64::total_cmp);
            let center = methcomp_stats::quantile::from_sorted(&diffs, 0.5).unwrap();
            let steps = 20_000;
            #[expect(clippy::cast_precision_loss)]
            let expected = (0..steps)
                .map(|i| {
                    let p = (i as f64 + 0.5) / steps as f64;
                    (methcomp_stats::quantile::from_sorted(&diffs, p).unwrap() - center).abs()
                })
                .sum::<f64>()
                * 100.0
                / steps as f64;
            let spread = diffs[diffs.len() - 1] - diffs[0];
            prop_assert!((result.auc - expected).abs() <= 1e-3 * (1.0 + spread));
        }
    }
}
