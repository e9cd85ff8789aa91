//! Glucose error-grid analyses.
//!
//! Error grids assign each reference/test pair of blood-glucose readings to a
//! clinical risk zone, from A (no effect on treatment) to E (dangerous
//! treatment). Both grids implement [`methcomp::Analysis`] and can be driven
//! through a [`methcomp::Comparer`].
//!
//! - [`ClarkeGrid`]: the Clarke error grid
//! - [`ParkesGrid`]: the Parkes consensus grid for type 1 or type 2 diabetes
//!
//! # Examples
//!
//! ```
//! use methcomp::{Comparer, ToResultMap};
//! use methcomp_glucose::{ErrorZone, GlucoseUnit, ParkesGrid, DiabetesType};
//!
//! let grid = ParkesGrid::new(DiabetesType::Type1, GlucoseUnit::MmolPerL);
//! let mut comparer = Comparer::from_values([5.5, 8.0, 12.0], [5.8, 7.1, 19.0], grid).unwrap();
//! let result = comparer.compute().unwrap();
//! assert_eq!(result.zones[0], ErrorZone::A);
//! assert_eq!(result.summary.total(), 3);
//! assert!(result.to_result_map().contains_key("zone_percentages"));
//! ```

mod clarke;
mod parkes;
mod polygon;
mod units;
mod zone;

pub use self::{
    clarke::ClarkeGrid,
    parkes::{DiabetesType, ParkesGrid},
    units::GlucoseUnit,
    zone::{ErrorZone, ZoneClassification, ZoneSummary},
};
