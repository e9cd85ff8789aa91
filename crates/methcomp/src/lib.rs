//! Agreement statistics for comparing two measurement methods.
//!
//! Given paired measurements of the same subjects by two methods (for
//! example two clinical-chemistry analyzers), this crate estimates how well
//! the methods agree:
//!
//! - **Regression**: Passing–Bablok, Deming and ordinary least squares fits of
//!   method2 on method1, each with confidence intervals ([`regression`])
//! - **Bland–Altman**: bias and limits of agreement ([`bland_altman`])
//! - **Mountain plot**: folded empirical distribution of differences
//!   ([`mountain`])
//!
//! Inputs are validated once by [`PairedSample`]. Each analysis implements
//! [`Analysis`]; a [`Comparer`] binds a sample to an analysis and caches the
//! result. Results convert into a flat [`ResultMap`] for rendering.
//!
//! # Examples
//!
//! ```
//! use methcomp::{Analysis, BlandAltman, PairedSample, ToResultMap};
//!
//! let sample = PairedSample::new(
//!     [1.0, 2.0, 3.0, 4.0, 5.0],
//!     [1.1, 2.1, 2.9, 4.2, 4.9],
//! )
//! .unwrap();
//! let result = BlandAltman::default().analyze(&sample).unwrap();
//! let map = result.to_result_map();
//! assert!(map.contains_key("loa_upper_CI"));
//! ```

pub use self::{
    bland_altman::{BlandAltman, BlandAltmanResult, DifferenceMode},
    comparer::{Analysis, Comparer, ComputeState},
    error::Error,
    mountain::{Mountain, MountainResult},
    result_map::{ResultMap, ResultValue, ToResultMap},
    sample::{ConfidenceLevel, PairedSample},
};

pub mod bland_altman;
pub mod comparer;
pub mod mountain;
pub mod regression;
pub mod result_map;

mod error;
mod sample;
