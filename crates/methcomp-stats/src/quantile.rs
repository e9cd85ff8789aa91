//! Quantiles by linear interpolation between order statistics.
//!
//! For `n` sorted values and probability `p`, the quantile sits at the
//! fractional 0-based position `h = (n - 1) * p` and is interpolated between
//! the two neighbouring order statistics. This is the "type 7" definition used
//! by most numerical packages.

/// Computes a single quantile of sorted values.
///
/// # Returns
///
/// * `Some(value)` - the interpolated quantile, with `p` clamped to `[0, 1]`
/// * `None` - if `sorted_values` is empty or `p` is `NaN`
///
/// # Examples
///
/// ```
/// use methcomp_stats::quantile;
///
/// let values = [1.0, 2.0, 4.0, 8.0];
/// assert_eq!(quantile::from_sorted(&values, 0.0), Some(1.0));
/// assert_eq!(quantile::from_sorted(&values, 0.5), Some(3.0));
/// assert_eq!(quantile::from_sorted(&values, 1.0), Some(8.0));
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn from_sorted(sorted_values: &[f64], p: f64) -> Option<f64> {
    if sorted_values.is_empty() || p.is_nan() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let last = sorted_values.len() - 1;
    let h = last as f64 * p;
    let lower = h.floor() as usize;
    let upper = (lower + 1).min(last);
    let frac = h - lower as f64;
    let lo = sorted_values[lower];
    let hi = sorted_values[upper];
    Some(lo + (hi - lo) * frac)
}

/// Returns `count` evenly spaced values from `start` to `end` inclusive.
///
/// A single point yields `[start]`.
///
/// # Examples
///
/// ```
/// use methcomp_stats::quantile::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(0.0, 1.0, 1), vec![0.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}
