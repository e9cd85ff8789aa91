//! Statistical primitives for the methcomp workspace.
//!
//! This crate provides the small set of numeric building blocks shared by
//! the method-comparison estimators:
//!
//! - **Descriptive statistics**: mean, median, population and sample variance
//! - **Quantiles**: linear interpolation between order statistics
//! - **Integration**: trapezoidal rule over sampled curves
//! - **Distributions**: normal and Student-t quantiles and p-values
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`quantile`]: Quantile computation on sorted data
//! - [`integrate`]: Numerical integration of sampled functions
//! - [`distribution`]: Inverse CDFs of the reference distributions
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use methcomp_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.variance, 2.0);
//! ```
//!
//! ## Computing quantiles
//!
//! ```
//! use methcomp_stats::quantile;
//!
//! let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
//! assert_eq!(quantile::from_sorted(&sorted, 0.5), Some(3.0));
//! assert_eq!(quantile::from_sorted(&sorted, 0.25), Some(2.0));
//! ```
//!
//! ## Looking up critical values
//!
//! ```
//! use methcomp_stats::distribution;
//!
//! let z = distribution::standard_normal_quantile(0.975);
//! assert!((z - 1.959_964).abs() < 1e-6);
//! ```

pub mod descriptive;
pub mod distribution;
pub mod integrate;
pub mod quantile;
