use serde::Serialize;

use super::{Estimate, RegressionResult};
use crate::{
    Analysis, ConfidenceLevel, Error, PairedSample,
    result_map::{ResultMap, ResultValue, ToResultMap},
};

/// Ordinary least squares of method2 on method1.
///
/// Intervals use the Student-t quantile with `n - 2` degrees of freedom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Linear {
    confidence: ConfidenceLevel,
}

impl Linear {
    #[must_use]
    pub fn new(confidence: ConfidenceLevel) -> Self {
        Self { confidence }
    }

    #[must_use]
    pub fn confidence(&self) -> ConfidenceLevel {
        self.confidence
    }
}

/// Least-squares fit with its auxiliary statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearResult {
    pub fit: RegressionResult,
    pub slope_std_error: f64,
    pub intercept_std_error: f64,
    /// Pearson correlation coefficient.
    pub r_value: f64,
    /// Two-sided p-value of the null hypothesis `slope == 0`.
    pub p_value: f64,
    pub residual_std_error: f64,
    pub degrees_of_freedom: usize,
}

impl ToResultMap for LinearResult {
    fn to_result_map(&self) -> ResultMap {
        let mut map = self.fit.to_result_map();
        map.extend([
            ("slope_se", ResultValue::Scalar(self.slope_std_error)),
            ("intercept_se", ResultValue::Scalar(self.intercept_std_error)),
            ("r_value", ResultValue::Scalar(self.r_value)),
            ("p_value", ResultValue::Scalar(self.p_value)),
            ("residual_se", ResultValue::Scalar(self.residual_std_error)),
            ("df", ResultValue::Count(self.degrees_of_freedom)),
        ]);
        map
    }
}

impl Analysis for Linear {
    type Output = LinearResult;

    fn name(&self) -> &'static str {
        "linear"
    }

    #[expect(clippy::cast_precision_loss)]
    fn analyze(&self, sample: &PairedSample) -> Result<LinearResult, Error> {
        use methcomp_stats::{
            descriptive::mean,
            distribution::{student_t_quantile, student_t_two_sided_p_value},
        };

        let count = sample.len();
        if count < 3 {
            return Err(Error::insufficient(
                "linear regression needs at least three observations",
            ));
        }
        let n = count as f64;
        let df = count - 2;

        let (x, y) = (sample.method1(), sample.method2());
        let (Some(mx), Some(my)) = (mean(x), mean(y)) else {
            return Err(Error::insufficient("linear regression needs observations"));
        };
        let (sxx, syy, sxy) = sample
            .pairs()
            .fold((0.0, 0.0, 0.0), |(xx, yy, xy), (x, y)| {
                let (dx, dy) = (x - mx, y - my);
                (xx + dx * dx, yy + dy * dy, xy + dx * dy)
            });
        if sxx == 0.0 {
            return Err(Error::insufficient("method1 has zero variance"));
        }

        let slope = sxy / sxx;
        let intercept = my - slope * mx;
        let sse = sample
            .pairs()
            .map(|(x, y)| (y - intercept - slope * x).powi(2))
            .sum::<f64>();
        let residual_variance = sse / df as f64;
        let slope_std_error = (residual_variance / sxx).sqrt();
        let intercept_std_error = (residual_variance * (1.0 / n + mx * mx / sxx)).sqrt();
        let r_value = if syy == 0.0 {
            0.0
        } else {
            (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
        };

        let t = student_t_quantile(self.confidence.upper_tail(), df as f64)
            .ok_or(Error::insufficient("no Student-t quantile for this sample size"))?;
        let p_value = if slope_std_error == 0.0 {
            if slope == 0.0 { 1.0 } else { 0.0 }
        } else {
            student_t_two_sided_p_value(slope / slope_std_error, df as f64).unwrap_or(f64::NAN)
        };
        tracing::trace!(df, t, "linear fit");

        let interval = |value: f64, se: f64| Estimate::new(value, value - t * se, value + t * se);
        Ok(LinearResult {
            fit: RegressionResult {
                slope: interval(slope, slope_std_error),
                intercept: interval(intercept, intercept_std_error),
            },
            slope_std_error,
            intercept_std_error,
            r_value,
            p_value,
            residual_std_error: residual_variance.sqrt(),
            degrees_of_freedom: df,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;
    use crate::regression::test_data::{METHOD1, METHOD2};

    #[test]
    fn test_reference_dataset() {
        let sample = PairedSample::new(METHOD1, METHOD2).unwrap();
        let result = Linear::default().analyze(&sample).unwrap();

        let slope = result.fit.slope;
        assert_relative_eq!(slope.value, 1.005_706_766_9, epsilon = 1e-9);
        assert_abs_diff_eq!(slope.ci_low, 0.984_526_258_6, epsilon = 1e-6);
        assert_abs_diff_eq!(slope.ci_high, 1.026_887_275_2, epsilon = 1e-6);

        let intercept = result.fit.intercept;
        assert_abs_diff_eq!(intercept.value, -0.076_421_052_6, epsilon = 1e-9);
        assert_abs_diff_eq!(intercept.ci_low, -0.330_145_508_3, epsilon = 1e-5);
        assert_abs_diff_eq!(intercept.ci_high, 0.177_303_403_0, epsilon = 1e-5);

        assert_abs_diff_eq!(result.slope_std_error, 0.010_081_53, epsilon = 1e-7);
        assert_abs_diff_eq!(result.intercept_std_error, 0.120_768_14, epsilon = 1e-7);
        assert_abs_diff_eq!(result.r_value, 0.999_096_84, epsilon = 1e-7);
        assert!(result.p_value < 1e-10);
        assert_eq!(result.degrees_of_freedom, 18);
    }

    #[test]
    fn test_perfect_fit() {
        let sample = PairedSample::new([1.0, 2.0, 3.0, 4.0], [3.0, 5.0, 7.0, 9.0]).unwrap();
        let result = Linear::default().analyze(&sample).unwrap();
        assert_relative_eq!(result.fit.slope.value, 2.0);
        assert_relative_eq!(result.fit.intercept.value, 1.0);
        assert_eq!(result.fit.slope.width(), 0.0);
        assert_eq!(result.p_value, 0.0);
        assert_relative_eq!(result.r_value, 1.0);
    }

    #[test]
    fn test_constant_method2() {
        let sample = PairedSample::new([1.0, 2.0, 3.0], [4.0, 4.0, 4.0]).unwrap();
        let result = Linear::default().analyze(&sample).unwrap();
        assert_eq!(result.fit.slope.value, 0.0);
        assert_eq!(result.r_value, 0.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_insufficient_data() {
        let two = PairedSample::new([1.0, 2.0], [1.0, 2.0]).unwrap();
        assert!(Linear::default().analyze(&two).unwrap_err().is_insufficient_data());

        let vertical = PairedSample::new([1.0, 1.0, 1.0], [1.0, 2.0, 3.0]).unwrap();
        assert!(Linear::default().analyze(&vertical).unwrap_err().is_insufficient_data());
    }

    #[test]
    fn test_result_map_keys() {
        let sample = PairedSample::new(METHOD1, METHOD2).unwrap();
        let map = Linear::default().analyze(&sample).unwrap().to_result_map();
        for key in ["slope", "intercept", "slope_se", "intercept_se", "r_value", "p_value"] {
            assert!(map.contains_key(key), "missing {key}");
        }
    }
}
