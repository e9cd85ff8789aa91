use methcomp::{Analysis, Error, PairedSample};
use serde::Serialize;

use crate::{ErrorZone, GlucoseUnit, ZoneClassification};

/// Clarke error grid (Clarke et al., 1987).
///
/// `method1` holds reference values and `method2` the values of the meter
/// under test.
///
/// # Examples
///
/// ```
/// use methcomp::{Analysis, PairedSample};
/// use methcomp_glucose::{ClarkeGrid, ErrorZone, GlucoseUnit};
///
/// let grid = ClarkeGrid::new(GlucoseUnit::MgPerDl);
/// assert_eq!(grid.classify_point(100.0, 110.0), ErrorZone::A);
/// assert_eq!(grid.classify_point(20.0, 300.0), ErrorZone::E);
///
/// let sample = PairedSample::new([100.0, 400.0], [110.0, 100.0]).unwrap();
/// let result = grid.analyze(&sample).unwrap();
/// assert_eq!(result.zones, vec![ErrorZone::A, ErrorZone::D]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClarkeGrid {
    unit: GlucoseUnit,
}

impl ClarkeGrid {
    #[must_use]
    pub fn new(unit: GlucoseUnit) -> Self {
        Self { unit }
    }

    #[must_use]
    pub fn unit(&self) -> GlucoseUnit {
        self.unit
    }

    /// Zone of a single reference/test pair.
    ///
    /// Starts from zone B; the E, D, C and A regions are then tested in that
    /// order and a later match overrides an earlier one.
    #[must_use]
    pub fn classify_point(&self, reference: f64, test: f64) -> ErrorZone {
        let t = |mg_dl| self.unit.threshold(mg_dl);
        let (r, p) = (reference, test);
        let relative_error = (p - r).abs() / r * 100.0;

        let mut zone = ErrorZone::B;
        if (r <= t(70.0) && p >= t(180.0)) || (r >= t(180.0) && p <= t(70.0)) {
            zone = ErrorZone::E;
        }
        if (r < t(70.0) || r > t(240.0)) && (t(70.0)..t(180.0)).contains(&p) {
            zone = ErrorZone::D;
        }
        if ((t(130.0)..=t(180.0)).contains(&r) && p < 1.4 * (r - t(130.0)))
            || (r > t(70.0) && p > t(180.0) && p > r + t(110.0))
        {
            zone = ErrorZone::C;
        }
        if relative_error <= 20.0 || (r < t(70.0) && p < t(70.0)) {
            zone = ErrorZone::A;
        }
        zone
    }
}

impl Analysis for ClarkeGrid {
    type Output = ZoneClassification;

    fn name(&self) -> &'static str {
        "clarke"
    }

    fn analyze(&self, sample: &PairedSample) -> Result<ZoneClassification, Error> {
        let zones = sample
            .pairs()
            .map(|(reference, test)| self.classify_point(reference, test))
            .collect::<Vec<_>>();
        tracing::trace!(unit = %self.unit, points = zones.len(), "clarke zones assigned");
        Ok(ZoneClassification::new(zones))
    }
}
