use serde::Serialize;

use super::bootstrap::Bootstrap;
use crate::{
    Analysis, ConfidenceLevel, Error, PairedSample,
    result_map::{ResultMap, ResultValue, ToResultMap},
};

/// Deming regression with a known ratio of error variances.
///
/// The ratio `λ = var(error in method2) / var(error in method1)` is taken
/// from [`Deming::with_variance_ratio`], falling back to
/// [`Deming::with_std_dev_ratio`], and finally to `1`. Without a bootstrap
/// the result is a point estimate with no interval. With a bootstrap the
/// reported value is the median of the resampled fits and the interval comes
/// from their empirical quantiles.
///
/// # Examples
///
/// ```
/// use methcomp::{Analysis, PairedSample, regression::Deming};
///
/// let sample = PairedSample::new([1.0, 2.0, 3.0, 4.0], [1.1, 1.9, 3.1, 3.9]).unwrap();
/// let result = Deming::default().without_bootstrap().analyze(&sample).unwrap();
/// assert!((result.slope.value - 0.96).abs() < 1e-2);
/// assert!(result.slope.interval.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Deming {
    confidence: ConfidenceLevel,
    variance_ratio: Option<f64>,
    std_dev_ratio: Option<f64>,
    bootstrap: Option<Bootstrap>,
}

impl Default for Deming {
    fn default() -> Self {
        Self::new(ConfidenceLevel::default())
    }
}

impl Deming {
    /// Deming regression with λ = 1 and the default bootstrap.
    #[must_use]
    pub fn new(confidence: ConfidenceLevel) -> Self {
        Self {
            confidence,
            variance_ratio: None,
            std_dev_ratio: None,
            bootstrap: Some(Bootstrap::default()),
        }
    }

    /// Sets the error-variance ratio. Takes precedence over the standard
    /// deviation ratio.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] unless `ratio` is finite and positive.
    pub fn with_variance_ratio(self, ratio: f64) -> Result<Self, Error> {
        Ok(Self {
            variance_ratio: Some(check_ratio("variance ratio", ratio)?),
            ..self
        })
    }

    /// Sets the ratio used when no variance ratio is given.
    ///
    /// The value is used as `λ` unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Domain`] unless `ratio` is finite and positive.
    pub fn with_std_dev_ratio(self, ratio: f64) -> Result<Self, Error> {
        Ok(Self {
            std_dev_ratio: Some(check_ratio("standard deviation ratio", ratio)?),
            ..self
        })
    }

    #[must_use]
    pub fn with_bootstrap(self, bootstrap: Bootstrap) -> Self {
        Self {
            bootstrap: Some(bootstrap),
            ..self
        }
    }

    #[must_use]
    pub fn without_bootstrap(self) -> Self {
        Self {
            bootstrap: None,
            ..self
        }
    }

    #[must_use]
    pub fn confidence(&self) -> ConfidenceLevel {
        self.confidence
    }

    #[must_use]
    pub fn bootstrap(&self) -> Option<&Bootstrap> {
        self.bootstrap.as_ref()
    }

    /// The error-variance ratio `λ` in effect.
    #[must_use]
    pub fn lambda(&self) -> f64 {
        self.variance_ratio.or(self.std_dev_ratio).unwrap_or(1.0)
    }
}

fn check_ratio(name: &'static str, ratio: f64) -> Result<f64, Error> {
    if ratio.is_finite() && ratio > 0.0 {
        Ok(ratio)
    } else {
        Err(Error::domain(name, "a positive finite number", ratio))
    }
}

/// Closed-form Deming parameters of one data set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemingFit {
    pub intercept: f64,
    pub slope: f64,
    /// Estimated error standard deviation of method1.
    pub sx: f64,
    /// Estimated error standard deviation of method2.
    pub sy: f64,
}

impl DemingFit {
    /// Fits the pairs yielded by `pairs`, which must have at least three
    /// elements and may be iterated several times.
    ///
    /// Returns `None` when the fit is undefined (zero covariance) or not
    /// finite.
    #[expect(clippy::cast_precision_loss)]
    fn estimate<I>(pairs: I, lambda: f64) -> Option<Self>
    where
        I: Iterator<Item = (f64, f64)> + Clone,
    {
        let count = pairs.clone().count();
        if count < 3 {
            return None;
        }
        let n = count as f64;
        let (sum_x, sum_y) = pairs
            .clone()
            .fold((0.0, 0.0), |(sx, sy), (x, y)| (sx + x, sy + y));
        let (mx, my) = (sum_x / n, sum_y / n);

        let (sxx, syy, sxy) = pairs.clone().fold((0.0, 0.0, 0.0), |(xx, yy, xy), (x, y)| {
            let (dx, dy) = (x - mx, y - my);
            (xx + dx * dx, yy + dy * dy, xy + dx * dy)
        });
        if sxy == 0.0 {
            return None;
        }

        let d = syy - lambda * sxx;
        let slope = (d + (d * d + 4.0 * lambda * sxy * sxy).sqrt()) / (2.0 * sxy);
        let intercept = my - slope * mx;

        let (ssx, ssy) = pairs.fold((0.0, 0.0), |(ssx, ssy), (x, y)| {
            let xi = (lambda * x + slope * (y - intercept)) / (lambda + slope * slope);
            let ex = x - xi;
            let ey = y - intercept - slope * xi;
            (ssx + ex * ex, ssy + ey * ey)
        });
        let sigma_sq = (lambda * ssx + ssy) / (2.0 * lambda * (n - 2.0));

        let fit = Self {
            intercept,
            slope,
            sx: sigma_sq.sqrt(),
            sy: (lambda * sigma_sq).sqrt(),
        };
        fit.is_finite().then_some(fit)
    }

    fn is_finite(&self) -> bool {
        [self.intercept, self.slope, self.sx, self.sy]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// One Deming parameter, with bootstrap interval and standard error when
/// bootstrapping was requested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DemingParameter {
    pub value: f64,
    pub interval: Option<(f64, f64)>,
    pub std_error: Option<f64>,
}

impl DemingParameter {
    fn point(value: f64) -> Self {
        Self {
            value,
            interval: None,
            std_error: None,
        }
    }

    fn from_bootstrap(values: &mut [f64], confidence: ConfidenceLevel) -> Self {
        use methcomp_stats::{descriptive::DescriptiveStats, quantile};

        values.sort_by(f64::total_cmp);
        let at = |p| quantile::from_sorted(values, p).unwrap_or(f64::NAN);
        let std_error = DescriptiveStats::from_sorted(values).and_then(|s| s.sample_std_dev());
        Self {
            value: at(0.5),
            interval: Some((at(confidence.lower_tail()), at(confidence.upper_tail()))),
            std_error,
        }
    }

    fn to_result_value(self) -> ResultValue {
        match self.interval {
            Some((lo, hi)) => ResultValue::Triple([self.value, lo, hi]),
            None => ResultValue::Scalar(self.value),
        }
    }
}

/// Result of a [`Deming`] regression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemingResult {
    pub intercept: DemingParameter,
    pub slope: DemingParameter,
    pub sx: DemingParameter,
    pub sy: DemingParameter,
    /// The closed-form fit of the full sample.
    pub full_sample: DemingFit,
    /// Number of resamples that produced a finite fit.
    pub resamples_used: Option<usize>,
    pub lambda: f64,
}

impl ToResultMap for DemingResult {
    fn to_result_map(&self) -> ResultMap {
        let mut map = ResultMap::from([
            ("intercept", self.intercept.to_result_value()),
            ("slope", self.slope.to_result_value()),
            ("sx", self.sx.to_result_value()),
            ("sy", self.sy.to_result_value()),
            ("lambda", ResultValue::Scalar(self.lambda)),
        ]);
        let errors = [
            ("intercept_se", self.intercept.std_error),
            ("slope_se", self.slope.std_error),
            ("sx_se", self.sx.std_error),
            ("sy_se", self.sy.std_error),
        ];
        for (key, se) in errors {
            if let Some(se) = se {
                map.insert(key, ResultValue::Scalar(se));
            }
        }
        if let Some(used) = self.resamples_used {
            map.insert("resamples", ResultValue::Count(used));
        }
        map
    }
}

impl Analysis for Deming {
    type Output = DemingResult;

    fn name(&self) -> &'static str {
        "deming"
    }

    fn analyze(&self, sample: &PairedSample) -> Result<DemingResult, Error> {
        let lambda = self.lambda();
        let full_sample = DemingFit::estimate(sample.pairs(), lambda).ok_or(
            Error::insufficient("Deming fit needs three or more points with non-zero covariance"),
        )?;

        let Some(bootstrap) = &self.bootstrap else {
            return Ok(DemingResult {
                intercept: DemingParameter::point(full_sample.intercept),
                slope: DemingParameter::point(full_sample.slope),
                sx: DemingParameter::point(full_sample.sx),
                sy: DemingParameter::point(full_sample.sy),
                full_sample,
                resamples_used: None,
                lambda,
            });
        };

        let (x, y) = (sample.method1(), sample.method2());
        let fits = bootstrap.run(sample.len(), |indices| {
            DemingFit::estimate(indices.iter().map(|&i| (x[i], y[i])), lambda)
        });
        let discarded = bootstrap.resamples() - fits.len();
        if discarded > 0 {
            tracing::debug!(discarded, "discarded degenerate bootstrap resamples");
        }
        if fits.len() < 2 {
            return Err(Error::insufficient(
                "fewer than two bootstrap resamples produced a finite fit",
            ));
        }
        tracing::trace!(resamples = fits.len(), lambda, "deming bootstrap finished");

        let column = |f: fn(&DemingFit) -> f64| {
            let mut values = fits.iter().map(f).collect::<Vec<_>>();
            DemingParameter::from_bootstrap(&mut values, self.confidence)
        };
        Ok(DemingResult {
            intercept: column(|fit| fit.intercept),
            slope: column(|fit| fit.slope),
            sx: column(|fit| fit.sx),
            sy: column(|fit| fit.sy),
            full_sample,
            resamples_used: Some(fits.len()),
            lambda,
        })
    }
}
