//! Bland–Altman agreement analysis.
//!
//! # Overview
//!
//! For each pair the analysis takes the mean of both methods and their
//! difference `method1 - method2`, either absolute or as a percentage of the
//! pair mean. It reports the mean difference (bias), the population standard
//! deviation of the differences and the limits of agreement
//! `mean_diff ± multiplier * sd_diff`.
//!
//! When a confidence level is set, it also reports:
//!
//! - a normal interval around the bias with scale `sd_diff / sqrt(n)`
//! - intervals around each limit with standard error `1.71 * sd_diff / sqrt(n)`
//!   and a Student-t quantile at `n - 1` degrees of freedom
//!
//! # Examples
//!
//! ```
//! use methcomp::{Analysis, BlandAltman, DifferenceMode, PairedSample};
//!
//! let sample = PairedSample::new([10.0, 20.0, 30.0], [9.0, 21.0, 28.0]).unwrap();
//! let result = BlandAltman::default().analyze(&sample).unwrap();
//! assert!((result.mean_diff - 2.0 / 3.0).abs() < 1e-12);
//! assert!(result.loa_lower < result.mean_diff && result.mean_diff < result.loa_upper);
//!
//! let percent = BlandAltman::default()
//!     .with_mode("percentage".parse::<DifferenceMode>().unwrap())
//!     .analyze(&sample)
//!     .unwrap();
//! assert_eq!(percent.mode, DifferenceMode::Percentage);
//! ```

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{
    Analysis, ConfidenceLevel, Error, PairedSample,
    result_map::{ResultMap, ResultValue, ToResultMap},
};

/// How differences between the two methods are expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DifferenceMode {
    #[default]
    Absolute,
    /// Difference as a percentage of the pair mean.
    Percentage,
}

impl FromStr for DifferenceMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "percentage" => Ok(Self::Percentage),
            _ => Err(Error::domain(
                "difference mode",
                "one of 'absolute', 'percentage'",
                s,
            )),
        }
    }
}

impl fmt::Display for DifferenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Absolute => "absolute",
            Self::Percentage => "percentage",
        })
    }
}

/// Bland–Altman analysis options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlandAltman {
    mode: DifferenceMode,
    limit_of_agreement: f64,
    confidence: Option<ConfidenceLevel>,
}

impl Default for BlandAltman {
    fn default() -> Self {
        Self {
            mode: DifferenceMode::Absolute,
            limit_of_agreement: Self::DEFAULT_LIMIT_OF_AGREEMENT,
            confidence: Some(ConfidenceLevel::default()),
        }
    }
}

impl BlandAltman {
    pub const DEFAULT_LIMIT_OF_AGREEMENT: f64 = 1.96;

    #[must_use]
    pub fn with_mode(self, mode: DifferenceMode) -> Self {
        Self { mode, ..self }
    }

    /// Sets the number of standard deviations spanned by the limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Range`] unless `multiplier` is finite and positive.
    pub fn with_limit_of_agreement(self, multiplier: f64) -> Result<Self, Error> {
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(Error::range(
                "limit of agreement",
                "a positive finite number",
                multiplier,
            ));
        }
        Ok(Self {
            limit_of_agreement: multiplier,
            ..self
        })
    }

    /// Sets the confidence level of the intervals; `None` skips them.
    #[must_use]
    pub fn with_confidence(self, confidence: Option<ConfidenceLevel>) -> Self {
        Self { confidence, ..self }
    }

    #[must_use]
    pub fn mode(&self) -> DifferenceMode {
        self.mode
    }

    #[must_use]
    pub fn limit_of_agreement(&self) -> f64 {
        self.limit_of_agreement
    }

    #[must_use]
    pub fn confidence(&self) -> Option<ConfidenceLevel> {
        self.confidence
    }
}

/// Result of a [`BlandAltman`] analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlandAltmanResult {
    pub mode: DifferenceMode,
    /// Per-pair mean of both methods.
    pub means: Vec<f64>,
    /// Per-pair difference, absolute or percent.
    pub differences: Vec<f64>,
    pub mean_diff: f64,
    /// Population standard deviation of the differences.
    pub sd_diff: f64,
    pub limit_of_agreement: f64,
    pub loa_lower: f64,
    pub loa_upper: f64,
    pub mean_ci: Option<(f64, f64)>,
    pub loa_lower_ci: Option<(f64, f64)>,
    pub loa_upper_ci: Option<(f64, f64)>,
}

impl ToResultMap for BlandAltmanResult {
    fn to_result_map(&self) -> ResultMap {
        let mut map = ResultMap::from([
            ("mean", ResultValue::Scalar(self.mean_diff)),
            ("sd_diff", ResultValue::Scalar(self.sd_diff)),
            ("loa_lower", ResultValue::Scalar(self.loa_lower)),
            ("loa_upper", ResultValue::Scalar(self.loa_upper)),
            ("means", ResultValue::Sequence(self.means.clone())),
            ("differences", ResultValue::Sequence(self.differences.clone())),
        ]);
        let intervals = [
            ("mean_CI", self.mean_ci),
            ("loa_lower_CI", self.loa_lower_ci),
            ("loa_upper_CI", self.loa_upper_ci),
        ];
        for (key, interval) in intervals {
            if let Some(interval) = interval {
                map.insert(key, interval.into());
            }
        }
        map
    }
}

impl Analysis for BlandAltman {
    type Output = BlandAltmanResult;

    fn name(&self) -> &'static str {
        "bland-altman"
    }

    #[expect(clippy::cast_precision_loss)]
    fn analyze(&self, sample: &PairedSample) -> Result<BlandAltmanResult, Error> {
        use methcomp_stats::{
            descriptive::DescriptiveStats,
            distribution::{normal_quantile, student_t_quantile},
        };

        let means = sample
            .pairs()
            .map(|(x, y)| f64::midpoint(x, y))
            .collect::<Vec<_>>();
        let differences = match self.mode {
            DifferenceMode::Absolute => sample.differences(),
            DifferenceMode::Percentage => {
                if means.contains(&0.0) {
                    return Err(Error::insufficient(
                        "percentage differences need non-zero pair means",
                    ));
                }
                sample
                    .pairs()
                    .zip(&means)
                    .map(|((x, y), mean)| (x - y) * 100.0 / mean)
                    .collect()
            }
        };

        let stats = DescriptiveStats::new(differences.iter().copied())
            .ok_or(Error::insufficient("no differences to summarize"))?;
        let mean_diff = stats.mean;
        let sd_diff = stats.std_dev;
        let loa_sd = self.limit_of_agreement * sd_diff;

        let (mean_ci, loa_lower_ci, loa_upper_ci) = match self.confidence {
            Some(confidence) => {
                let n = sample.len() as f64;
                let scale = sd_diff / n.sqrt();
                let mean_ci = (
                    normal_quantile(confidence.lower_tail(), mean_diff, scale),
                    normal_quantile(confidence.upper_tail(), mean_diff, scale),
                );
                let t = student_t_quantile(confidence.lower_tail(), n - 1.0)
                    .ok_or(Error::insufficient("no Student-t quantile for this sample size"))?;
                // t is negative, so `+ conf` gives the lower bound
                let conf = 1.71 * scale * t;
                let upper = mean_diff + loa_sd;
                let lower = mean_diff - loa_sd;
                (
                    Some(mean_ci),
                    Some((lower + conf, lower - conf)),
                    Some((upper + conf, upper - conf)),
                )
            }
            None => (None, None, None),
        };
        tracing::trace!(mode = %self.mode, mean_diff, sd_diff, "bland-altman summary");

        Ok(BlandAltmanResult {
            mode: self.mode,
            means,
            differences,
            mean_diff,
            sd_diff,
            limit_of_agreement: self.limit_of_agreement,
            loa_lower: mean_diff - loa_sd,
            loa_upper: mean_diff + loa_sd,
            mean_ci,
            loa_lower_ci,
            loa_upper_ci,
        })
    }
}
