//! Critical values of the reference distributions.
//!
//! Thin wrappers over [`statrs`] that return plain `f64` values so that the
//! estimators never deal with distribution construction errors themselves.

use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

/// Inverse CDF of the standard normal distribution.
///
/// Returns `-inf`/`+inf` at `p = 0`/`p = 1` and `NaN` outside `[0, 1]`.
///
/// # Examples
///
/// ```
/// use methcomp_stats::distribution::standard_normal_quantile;
///
/// assert!(standard_normal_quantile(0.5).abs() < 1e-12);
/// assert!((standard_normal_quantile(0.025) + 1.959_964).abs() < 1e-6);
/// ```
#[must_use]
pub fn standard_normal_quantile(p: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) {
        return f64::NAN;
    }
    Normal::new(0.0, 1.0).map_or(f64::NAN, |normal| normal.inverse_cdf(p))
}

/// Inverse CDF of the normal distribution with the given location and scale.
///
/// A zero scale collapses the distribution onto `mean`.
#[must_use]
pub fn normal_quantile(p: f64, mean: f64, std_dev: f64) -> f64 {
    if std_dev == 0.0 {
        return mean;
    }
    mean + std_dev * standard_normal_quantile(p)
}

/// Inverse CDF of Student's t distribution with `df` degrees of freedom.
///
/// # Returns
///
/// * `Some(t)` - the quantile
/// * `None` - if `df` is not positive or `p` is outside `[0, 1]`
///
/// # Examples
///
/// ```
/// use methcomp_stats::distribution::student_t_quantile;
///
/// let t = student_t_quantile(0.975, 18.0).unwrap();
/// assert!((t - 2.100_922).abs() < 1e-5);
/// assert!(student_t_quantile(0.975, 0.0).is_none());
/// ```
#[must_use]
pub fn student_t_quantile(p: f64, df: f64) -> Option<f64> {
    if !(0.0..=1.0).contains(&p) {
        return None;
    }
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some(dist.inverse_cdf(p))
}

/// Two-sided p-value of a t statistic with `df` degrees of freedom.
///
/// Returns `None` if `df` is not positive or `t` is `NaN`.
#[must_use]
pub fn student_t_two_sided_p_value(t: f64, df: f64) -> Option<f64> {
    if t.is_nan() {
        return None;
    }
    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    Some((2.0 * dist.sf(t.abs())).min(1.0))
}
