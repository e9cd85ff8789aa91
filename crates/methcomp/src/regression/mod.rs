//! Regression estimators for method comparison.
//!
//! # Overview
//!
//! Three estimators fit `method2 = intercept + slope * method1`:
//!
//! - [`PassingBablok`]: non-parametric, robust to outliers, based on the
//!   median of all pairwise slopes
//! - [`Deming`]: errors-in-variables fit with a known error-variance ratio,
//!   optionally bootstrapped for confidence intervals
//! - [`Linear`]: ordinary least squares with Student-t intervals
//!
//! [`Regression`] selects one of them at run time.
//!
//! # Examples
//!
//! ```
//! use methcomp::{Comparer, PairedSample, regression::Regression};
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let y = [1.1, 2.0, 3.2, 3.9, 5.1, 6.0];
//! let sample = PairedSample::new(x, y).unwrap();
//!
//! let mut comparer = Comparer::new(sample, Regression::passing_bablok());
//! let result = comparer.compute().unwrap();
//! assert!((result.slope() - 1.0).abs() < 0.1);
//! ```

use serde::Serialize;

use crate::{
    Analysis, Error, PairedSample,
    result_map::{ResultMap, ResultValue, ToResultMap},
};

pub use self::{
    bootstrap::{Bootstrap, BootstrapSeed},
    deming::{Deming, DemingFit, DemingParameter, DemingResult},
    linear::{Linear, LinearResult},
    passing_bablok::PassingBablok,
};

mod bootstrap;
mod deming;
mod linear;
mod passing_bablok;

/// A point estimate with its two-sided confidence interval.
///
/// Invariant: `ci_low <= value <= ci_high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Estimate {
    pub value: f64,
    pub ci_low: f64,
    pub ci_high: f64,
}

impl Estimate {
    #[must_use]
    pub fn new(value: f64, ci_low: f64, ci_high: f64) -> Self {
        Self {
            value,
            ci_low,
            ci_high,
        }
    }

    #[must_use]
    pub fn contains(&self, x: f64) -> bool {
        self.ci_low <= x && x <= self.ci_high
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.ci_high - self.ci_low
    }

    #[must_use]
    pub fn to_array(self) -> [f64; 3] {
        [self.value, self.ci_low, self.ci_high]
    }
}

/// Slope and intercept, each with a confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionResult {
    pub slope: Estimate,
    pub intercept: Estimate,
}

impl RegressionResult {
    /// Predicted `method2` value at `x`.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept.value + self.slope.value * x
    }
}

impl ToResultMap for RegressionResult {
    fn to_result_map(&self) -> ResultMap {
        ResultMap::from([
            ("slope", ResultValue::Triple(self.slope.to_array())),
            ("intercept", ResultValue::Triple(self.intercept.to_array())),
        ])
    }
}

/// Run-time selection of a regression estimator.
#[derive(Debug, Clone)]
pub enum Regression {
    PassingBablok(PassingBablok),
    Deming(Deming),
    Linear(Linear),
}

impl Regression {
    /// Passing–Bablok at the default confidence level.
    #[must_use]
    pub fn passing_bablok() -> Self {
        Self::PassingBablok(PassingBablok::default())
    }

    /// Deming with λ = 1 and the default bootstrap.
    #[must_use]
    pub fn deming() -> Self {
        Self::Deming(Deming::default())
    }

    /// Ordinary least squares at the default confidence level.
    #[must_use]
    pub fn linear() -> Self {
        Self::Linear(Linear::default())
    }
}

impl From<PassingBablok> for Regression {
    fn from(value: PassingBablok) -> Self {
        Self::PassingBablok(value)
    }
}

impl From<Deming> for Regression {
    fn from(value: Deming) -> Self {
        Self::Deming(value)
    }
}

impl From<Linear> for Regression {
    fn from(value: Linear) -> Self {
        Self::Linear(value)
    }
}

/// Result of a [`Regression`].
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum RegressionOutput {
    PassingBablok(RegressionResult),
    Deming(DemingResult),
    Linear(LinearResult),
}

impl RegressionOutput {
    #[must_use]
    pub fn slope(&self) -> f64 {
        match self {
            Self::PassingBablok(r) => r.slope.value,
            Self::Deming(r) => r.slope.value,
            Self::Linear(r) => r.fit.slope.value,
        }
    }

    #[must_use]
    pub fn intercept(&self) -> f64 {
        match self {
            Self::PassingBablok(r) => r.intercept.value,
            Self::Deming(r) => r.intercept.value,
            Self::Linear(r) => r.fit.intercept.value,
        }
    }
}

impl ToResultMap for RegressionOutput {
    fn to_result_map(&self) -> ResultMap {
        match self {
            Self::PassingBablok(r) => r.to_result_map(),
            Self::Deming(r) => r.to_result_map(),
            Self::Linear(r) => r.to_result_map(),
        }
    }
}

impl Analysis for Regression {
    type Output = RegressionOutput;

    fn name(&self) -> &'static str {
        match self {
            Self::PassingBablok(a) => a.name(),
            Self::Deming(a) => a.name(),
            Self::Linear(a) => a.name(),
        }
    }

    fn analyze(&self, sample: &PairedSample) -> Result<Self::Output, Error> {
        Ok(match self {
            Self::PassingBablok(a) => RegressionOutput::PassingBablok(a.analyze(sample)?),
            Self::Deming(a) => RegressionOutput::Deming(a.analyze(sample)?),
            Self::Linear(a) => RegressionOutput::Linear(a.analyze(sample)?),
        })
    }
}

/// Median of `method2 - slope * method1`.
fn intercept_at(sample: &PairedSample, slope: f64) -> f64 {
    let residuals = sample.pairs().map(|(x, y)| y - slope * x).collect::<Vec<_>>();
    methcomp_stats::descriptive::median(&residuals).unwrap_or(f64::NAN)
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
pub(crate) mod test_data {
    /// Twenty paired measurements with a near-identity relationship.
    pub const METHOD1: [f64; 20] = [
        1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0,
        17.0, 18.0, 19.0, 20.0,
    ];
    pub const METHOD2: [f64; 20] = [
        1.03, 2.05, 2.79, 3.67, 5.00, 5.82, 7.16, 7.69, 8.53, 10.38, 11.11, 12.17, 13.47, 13.83,
        15.15, 16.12, 16.94, 18.09, 19.13, 19.54,
    ];
}
