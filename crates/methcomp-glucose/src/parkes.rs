use std::{fmt, str::FromStr};

use methcomp::{Analysis, Error, PairedSample};
use serde::Serialize;

use crate::{
    ErrorZone, GlucoseUnit, ZoneClassification,
    polygon::{Point, Polygon},
};

/// Patient population of a Parkes (consensus) error grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum DiabetesType {
    #[default]
    #[serde(rename = "1")]
    Type1,
    #[serde(rename = "2")]
    Type2,
}

impl TryFrom<u8> for DiabetesType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Type1),
            2 => Ok(Self::Type2),
            _ => Err(Error::domain("diabetes type", "1 or 2", value)),
        }
    }
}

impl FromStr for DiabetesType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::Type1),
            "2" => Ok(Self::Type2),
            _ => Err(Error::domain("diabetes type", "1 or 2", s)),
        }
    }
}

impl fmt::Display for DiabetesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Type1 => "1",
            Self::Type2 => "2",
        })
    }
}

/// Parkes consensus error grid (Parkes et al., 2000; Pfützner et al., 2013).
///
/// Each zone B–E is bounded by two polygons, one above and one below the
/// identity line. Published boundaries end at 550 mg/dL; they are extended
/// along their last segment to cover the data. A point belongs to the
/// highest zone whose polygon strictly contains it, and to A otherwise.
///
/// # Examples
///
/// ```
/// use methcomp_glucose::{DiabetesType, ErrorZone, GlucoseUnit, ParkesGrid};
///
/// let grid = ParkesGrid::new(DiabetesType::Type1, GlucoseUnit::MgPerDl);
/// assert_eq!(grid.classify_point(100.0, 100.0), ErrorZone::A);
/// assert_eq!(grid.classify_point(100.0, 400.0), ErrorZone::D);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParkesGrid {
    diabetes_type: DiabetesType,
    unit: GlucoseUnit,
}

/// Published boundary vertices, in mg/dL, of one side of one zone.
///
/// `open_edge` is the last published segment, `(from, to)`. It is extended
/// to the border of the plane: towards `max_x` for boundaries below the
/// identity line, towards `max_y` for those above it.
struct Boundary {
    zone: ErrorZone,
    upper: bool,
    vertices: &'static [(f64, f64)],
    open_edge: ((f64, f64), (f64, f64)),
}

const TYPE_1: [Boundary; 7] = [
    Boundary {
        zone: ErrorZone::B,
        upper: false,
        vertices: &[(50.0, 0.0), (50.0, 30.0), (170.0, 145.0), (385.0, 300.0)],
        open_edge: ((385.0, 300.0), (550.0, 450.0)),
    },
    Boundary {
        zone: ErrorZone::B,
        upper: true,
        vertices: &[(0.0, 50.0), (30.0, 50.0), (140.0, 170.0), (280.0, 380.0)],
        open_edge: ((280.0, 380.0), (430.0, 550.0)),
    },
    Boundary {
        zone: ErrorZone::C,
        upper: false,
        vertices: &[(120.0, 0.0), (120.0, 30.0), (260.0, 130.0)],
        open_edge: ((260.0, 130.0), (550.0, 250.0)),
    },
    Boundary {
        zone: ErrorZone::C,
        upper: true,
        vertices: &[(0.0, 60.0), (30.0, 60.0), (50.0, 80.0), (70.0, 110.0)],
        open_edge: ((70.0, 110.0), (260.0, 550.0)),
    },
    Boundary {
        zone: ErrorZone::D,
        upper: false,
        vertices: &[(250.0, 0.0), (250.0, 40.0)],
        open_edge: ((250.0, 40.0), (550.0, 150.0)),
    },
    Boundary {
        zone: ErrorZone::D,
        upper: true,
        vertices: &[(0.0, 100.0), (25.0, 100.0), (50.0, 125.0), (80.0, 215.0)],
        open_edge: ((80.0, 215.0), (125.0, 550.0)),
    },
    Boundary {
        zone: ErrorZone::E,
        upper: true,
        vertices: &[(0.0, 150.0), (35.0, 155.0)],
        open_edge: ((35.0, 155.0), (50.0, 550.0)),
    },
];

const TYPE_2: [Boundary; 7] = [
    Boundary {
        zone: ErrorZone::B,
        upper: false,
        vertices: &[(50.0, 0.0), (50.0, 30.0), (90.0, 80.0), (330.0, 230.0)],
        open_edge: ((330.0, 230.0), (550.0, 450.0)),
    },
    Boundary {
        zone: ErrorZone::B,
        upper: true,
        vertices: &[(0.0, 50.0), (30.0, 50.0), (230.0, 330.0)],
        open_edge: ((230.0, 330.0), (440.0, 550.0)),
    },
    Boundary {
        zone: ErrorZone::C,
        upper: false,
        vertices: &[(90.0, 0.0), (260.0, 130.0)],
        open_edge: ((260.0, 130.0), (550.0, 250.0)),
    },
    Boundary {
        zone: ErrorZone::C,
        upper: true,
        vertices: &[(0.0, 60.0), (30.0, 60.0)],
        open_edge: ((30.0, 60.0), (280.0, 550.0)),
    },
    Boundary {
        zone: ErrorZone::D,
        upper: false,
        vertices: &[(250.0, 0.0), (250.0, 40.0), (410.0, 110.0)],
        open_edge: ((410.0, 110.0), (550.0, 160.0)),
    },
    Boundary {
        zone: ErrorZone::D,
        upper: true,
        vertices: &[(0.0, 80.0), (25.0, 80.0), (35.0, 90.0)],
        open_edge: ((35.0, 90.0), (125.0, 550.0)),
    },
    Boundary {
        zone: ErrorZone::E,
        upper: true,
        vertices: &[(0.0, 200.0), (35.0, 200.0)],
        open_edge: ((35.0, 200.0), (50.0, 550.0)),
    },
];

impl Boundary {
    /// Closes the published vertices into a polygon reaching the border of
    /// the `max_x` by `max_y` plane.
    fn polygon(&self, unit: GlucoseUnit, max_x: f64, max_y: f64) -> Polygon {
        let scale = |(x, y): (f64, f64)| Point::new(unit.threshold(x), unit.threshold(y));
        let ((x0, y0), (x1, y1)) = self.open_edge;
        let slope = (y1 - y0) / (x1 - x0);
        let start = scale(self.open_edge.0);

        let mut vertices = self.vertices.iter().copied().map(scale).collect::<Vec<_>>();
        if self.upper {
            let end_x = (max_y - start.y) / slope + start.x;
            vertices.push(Point::new(end_x, max_y));
            vertices.push(Point::new(0.0, max_y));
        } else {
            let end_y = (max_x - start.x) * slope + start.y;
            vertices.push(Point::new(max_x, end_y));
            vertices.push(Point::new(max_x, 0.0));
        }
        Polygon::new(vertices)
    }
}

impl ParkesGrid {
    #[must_use]
    pub fn new(diabetes_type: DiabetesType, unit: GlucoseUnit) -> Self {
        Self {
            diabetes_type,
            unit,
        }
    }

    #[must_use]
    pub fn diabetes_type(&self) -> DiabetesType {
        self.diabetes_type
    }

    #[must_use]
    pub fn unit(&self) -> GlucoseUnit {
        self.unit
    }

    fn boundaries(&self, reference: &[f64], test: &[f64]) -> Vec<(ErrorZone, Polygon)> {
        let t = |mg_dl| self.unit.threshold(mg_dl);
        let max_of = |values: &[f64]| values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let max_x = (max_of(reference) + t(20.0)).max(t(550.0));
        let max_y = (max_of(test) + t(20.0)).max(max_x).max(t(550.0));

        let table = match self.diabetes_type {
            DiabetesType::Type1 => &TYPE_1,
            DiabetesType::Type2 => &TYPE_2,
        };
        table
            .iter()
            .map(|boundary| (boundary.zone, boundary.polygon(self.unit, max_x, max_y)))
            .collect()
    }

    fn zone_of(boundaries: &[(ErrorZone, Polygon)], reference: f64, test: f64) -> ErrorZone {
        let point = Point::new(reference, test);
        boundaries
            .iter()
            .filter(|(_, polygon)| polygon.contains(point))
            .map(|(zone, _)| *zone)
            .max()
            .unwrap_or(ErrorZone::A)
    }

    /// Zone of a single reference/test pair, with the plane sized for that
    /// pair alone.
    #[must_use]
    pub fn classify_point(&self, reference: f64, test: f64) -> ErrorZone {
        let boundaries = self.boundaries(&[reference], &[test]);
        Self::zone_of(&boundaries, reference, test)
    }
}

impl Analysis for ParkesGrid {
    type Output = ZoneClassification;

    fn name(&self) -> &'static str {
        "parkes"
    }

    fn analyze(&self, sample: &PairedSample) -> Result<ZoneClassification, Error> {
        let boundaries = self.boundaries(sample.method1(), sample.method2());
        let zones = sample
            .pairs()
            .map(|(reference, test)| Self::zone_of(&boundaries, reference, test))
            .collect::<Vec<_>>();
        tracing::trace!(
            diabetes_type = %self.diabetes_type,
            unit = %self.unit,
            points = zones.len(),
            "parkes zones assigned"
        );
        Ok(ZoneClassification::new(zones))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::test_data::{REFERENCE_MMOL, TEST_MMOL, to_mg_dl};

    use ErrorZone::{A, B, C, D, E};

    fn classify(diabetes_type: DiabetesType, unit: GlucoseUnit, x: &[f64], y: &[f64]) -> Vec<ErrorZone> {
        let sample = PairedSample::new(x.iter().copied(), y.iter().copied()).unwrap();
        ParkesGrid::new(diabetes_type, unit)
            .analyze(&sample)
            .unwrap()
            .zones
    }

    #[test]
    fn test_type_1_reference_dataset() {
        let zones = classify(
            DiabetesType::Type1,
            GlucoseUnit::MmolPerL,
            &REFERENCE_MMOL,
            &TEST_MMOL,
        );
        assert_eq!(zones, vec![B, C, C, C, A, A, A, A, B, A]);

        let zones = classify(
            DiabetesType::Type1,
            GlucoseUnit::MgPerDl,
            &to_mg_dl(&REFERENCE_MMOL),
            &to_mg_dl(&TEST_MMOL),
        );
        assert_eq!(zones, vec![B, C, C, C, A, A, A, A, B, A]);
    }

    #[test]
    fn test_type_2_reference_dataset() {
        let zones = classify(
            DiabetesType::Type2,
            GlucoseUnit::MmolPerL,
            &REFERENCE_MMOL,
            &TEST_MMOL,
        );
        assert_eq!(zones, vec![B, C, C, C, A, A, A, A, A, A]);
    }

    #[test]
    fn test_single_points() {
        let type1 = ParkesGrid::new(DiabetesType::Type1, GlucoseUnit::MgPerDl);
        let type2 = ParkesGrid::new(DiabetesType::Type2, GlucoseUnit::MgPerDl);
        let cases = [
            ((100.0, 100.0), A, A),
            ((100.0, 125.0), A, A),
            ((100.0, 160.0), B, B),
            ((100.0, 250.0), C, C),
            ((100.0, 400.0), D, C),
            ((20.0, 300.0), E, E),
            ((300.0, 50.0), D, D),
            ((400.0, 100.0), C, D),
            ((60.0, 20.0), B, B),
            ((200.0, 40.0), C, C),
            ((300.0, 20.0), D, D),
        ];
        for ((reference, test), zone1, zone2) in cases {
            assert_eq!(type1.classify_point(reference, test), zone1, "type 1 ({reference}, {test})");
            assert_eq!(type2.classify_point(reference, test), zone2, "type 2 ({reference}, {test})");
        }
    }

    #[test]
    fn test_boundary_points_stay_in_lower_zone() {
        let grid = ParkesGrid::new(DiabetesType::Type1, GlucoseUnit::MgPerDl);
        // on the vertical edge of the lower B boundary
        assert_eq!(grid.classify_point(50.0, 10.0), A);
    }

    #[test]
    fn test_type_1_lower_d_edge_starts_at_its_corner() {
        let grid = ParkesGrid::new(DiabetesType::Type1, GlucoseUnit::MgPerDl);
        // the lower D edge runs from (250, 40) towards (550, 150)
        assert_eq!(grid.classify_point(500.0, 140.0), C);
        assert_eq!(grid.classify_point(500.0, 120.0), D);
        assert_eq!(grid.classify_point(400.0, 100.0), C);
    }

    #[test]
    fn test_parse_diabetes_type() {
        assert_eq!("2".parse::<DiabetesType>().unwrap(), DiabetesType::Type2);
        assert!("3".parse::<DiabetesType>().unwrap_err().is_domain());
        assert!(DiabetesType::try_from(0).unwrap_err().is_domain());
        assert_eq!(DiabetesType::try_from(1).unwrap(), DiabetesType::Type1);
    }

    proptest! {
        #[test]
        fn identical_readings_are_zone_a(value in 1.0f64..600.0, type2 in any::<bool>()) {
            let diabetes_type = if type2 { DiabetesType::Type2 } else { DiabetesType::Type1 };
            let grid = ParkesGrid::new(diabetes_type, GlucoseUnit::MgPerDl);
            prop_assert_eq!(grid.classify_point(value, value), A);
        }

        #[test]
        fn far_outliers_leave_zone_a(reference in 60.0f64..400.0) {
            let grid = ParkesGrid::new(DiabetesType::Type1, GlucoseUnit::MgPerDl);
            prop_assert!(grid.classify_point(reference, reference * 4.0 + 100.0) >= C);
        }
    }
}
