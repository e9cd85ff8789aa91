//! Validated paired measurements and confidence levels.
//!
//! Every analysis in this crate consumes a [`PairedSample`]: two sequences of
//! finite measurements where index `i` in both sequences refers to the same
//! subject. Construction is the single validation point, so analyses can rely
//! on equal lengths, at least two observations and finite values.

use serde::Serialize;

use crate::Error;

/// Two equal-length sequences of paired, finite measurements.
///
/// The sample is immutable once constructed.
///
/// # Examples
///
/// ```
/// use methcomp::PairedSample;
///
/// let sample = PairedSample::new([1.0, 2.0, 3.0], [1.1, 2.1, 2.9]).unwrap();
/// assert_eq!(sample.len(), 3);
/// assert_eq!(sample.method2()[2], 2.9);
///
/// let err = PairedSample::new([1.0, 2.0], [1.0]).unwrap_err();
/// assert!(err.is_shape_mismatch());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairedSample {
    method1: Vec<f64>,
    method2: Vec<f64>,
}

impl PairedSample {
    /// Minimum number of paired observations accepted.
    pub const MIN_LEN: usize = 2;

    /// Validates and stores two sequences of measurements.
    ///
    /// # Errors
    ///
    /// * [`Error::ShapeMismatch`] - if the sequences differ in length
    /// * [`Error::InsufficientData`] - if fewer than two pairs are given
    /// * [`Error::Range`] - if any value is `NaN` or infinite
    pub fn new<I1, I2>(method1: I1, method2: I2) -> Result<Self, Error>
    where
        I1: IntoIterator<Item = f64>,
        I2: IntoIterator<Item = f64>,
    {
        let method1 = method1.into_iter().collect::<Vec<_>>();
        let method2 = method2.into_iter().collect::<Vec<_>>();
        if method1.len() != method2.len() {
            return Err(Error::ShapeMismatch {
                method1_len: method1.len(),
                method2_len: method2.len(),
            });
        }
        if method1.len() < Self::MIN_LEN {
            return Err(Error::insufficient("at least two paired observations are required"));
        }
        check_finite("method1", &method1)?;
        check_finite("method2", &method2)?;
        Ok(Self { method1, method2 })
    }

    /// Measurements of the first (reference) method.
    #[must_use]
    pub fn method1(&self) -> &[f64] {
        &self.method1
    }

    /// Measurements of the second (test) method.
    #[must_use]
    pub fn method2(&self) -> &[f64] {
        &self.method2
    }

    /// Number of paired observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.method1.len()
    }

    /// Always `false`; a validated sample holds at least two pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.method1.is_empty()
    }

    /// Iterates over `(method1[i], method2[i])` pairs.
    pub fn pairs(&self) -> impl ExactSizeIterator<Item = (f64, f64)> + Clone + '_ {
        self.method1.iter().copied().zip(self.method2.iter().copied())
    }

    /// Elementwise `method1 - method2`.
    #[must_use]
    pub fn differences(&self) -> Vec<f64> {
        self.pairs().map(|(x, y)| x - y).collect()
    }
}

fn check_finite(name: &'static str, values: &[f64]) -> Result<(), Error> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(Error::range(name, "finite", value)),
        None => Ok(()),
    }
}

/// Confidence level in the open interval `(0, 1)`.
///
/// Defaults to `0.95`.
///
/// # Examples
///
/// ```
/// use methcomp::ConfidenceLevel;
///
/// let level = ConfidenceLevel::new(0.95).unwrap();
/// assert!((level.lower_tail() - 0.025).abs() < 1e-12);
/// assert!((level.upper_tail() - 0.975).abs() < 1e-12);
///
/// assert!(ConfidenceLevel::new(1.0).unwrap_err().is_range());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct ConfidenceLevel(f64);

impl Default for ConfidenceLevel {
    fn default() -> Self {
        Self(0.95)
    }
}

impl ConfidenceLevel {
    /// Validates a confidence level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Range`] unless `0 < level < 1`.
    pub fn new(level: f64) -> Result<Self, Error> {
        if level > 0.0 && level < 1.0 {
            Ok(Self(level))
        } else {
            Err(Error::range(
                "confidence level",
                "in the open interval (0, 1)",
                level,
            ))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Probability mass below a two-sided interval, `(1 - level) / 2`.
    #[must_use]
    pub fn lower_tail(self) -> f64 {
        (1.0 - self.0) / 2.0
    }

    /// Cumulative probability at the top of a two-sided interval, `(1 + level) / 2`.
    #[must_use]
    pub fn upper_tail(self) -> f64 {
        f64::midpoint(1.0, self.0)
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = Error;

    fn try_from(level: f64) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_short_sample() {
        let err = PairedSample::new([1.0], [2.0]).unwrap_err();
        assert!(err.is_insufficient_data());
        let err = PairedSample::new(Vec::new(), Vec::new()).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_rejects_non_finite() {
        let err = PairedSample::new([1.0, f64::NAN], [1.0, 2.0]).unwrap_err();
        assert!(err.is_range());
        let err = PairedSample::new([1.0, 2.0], [f64::INFINITY, 2.0]).unwrap_err();
        assert!(matches!(err, Error::Range { name: "method2", .. }));
    }

    #[test]
    fn test_length_mismatch_reports_both_lengths() {
        let err = PairedSample::new([1.0, 2.0, 3.0], [1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            Error::ShapeMismatch {
                method1_len: 3,
                method2_len: 2
            }
        );
    }

    #[test]
    fn test_differences() {
        let sample = PairedSample::new([3.0, 5.0], [1.0, 6.0]).unwrap();
        assert_eq!(sample.differences(), vec![2.0, -1.0]);
        assert_eq!(sample.pairs().len(), 2);
        assert!(!sample.is_empty());
    }

    #[test]
    fn test_confidence_level_bounds() {
        assert!(ConfidenceLevel::new(0.0).is_err());
        assert!(ConfidenceLevel::new(-0.5).is_err());
        assert!(ConfidenceLevel::new(f64::NAN).is_err());
        assert!(ConfidenceLevel::try_from(0.5).is_ok());
        assert_eq!(ConfidenceLevel::default().value(), 0.95);
    }
}
