use methcomp::{ResultMap, ResultValue, ToResultMap};
use serde::Serialize;

/// Clinical risk zone of a glucose reading, from A (accurate) to E
/// (erroneous treatment).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, derive_more::Display,
)]
pub enum ErrorZone {
    A,
    B,
    C,
    D,
    E,
}

impl ErrorZone {
    pub const ALL: [Self; 5] = [Self::A, Self::B, Self::C, Self::D, Self::E];

    /// Numeric zone, `0` for A through `4` for E.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
        }
    }
}

/// Number and share of points in each zone.
///
/// # Examples
///
/// ```
/// use methcomp_glucose::{ErrorZone, ZoneSummary};
///
/// let summary = ZoneSummary::from_zones(&[ErrorZone::A, ErrorZone::A, ErrorZone::C, ErrorZone::A]);
/// assert_eq!(summary.count(ErrorZone::A), 3);
/// assert_eq!(summary.percentage(ErrorZone::C), 25.0);
/// assert_eq!(summary.percentage(ErrorZone::E), 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ZoneSummary {
    counts: [usize; 5],
    total: usize,
}

impl ZoneSummary {
    #[must_use]
    pub fn from_zones(zones: &[ErrorZone]) -> Self {
        let mut counts = [0; 5];
        for zone in zones {
            counts[zone.index()] += 1;
        }
        Self {
            counts,
            total: zones.len(),
        }
    }

    #[must_use]
    pub fn count(&self, zone: ErrorZone) -> usize {
        self.counts[zone.index()]
    }

    #[must_use]
    pub fn counts(&self) -> [usize; 5] {
        self.counts
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Share of points in `zone`, in percent. Zero for an empty summary.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn percentage(&self, zone: ErrorZone) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(zone) as f64 * 100.0 / self.total as f64
    }

    #[must_use]
    pub fn percentages(&self) -> [f64; 5] {
        ErrorZone::ALL.map(|zone| self.percentage(zone))
    }
}

/// Per-point zones of an error-grid analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneClassification {
    pub zones: Vec<ErrorZone>,
    pub summary: ZoneSummary,
}

impl ZoneClassification {
    #[must_use]
    pub fn new(zones: Vec<ErrorZone>) -> Self {
        let summary = ZoneSummary::from_zones(&zones);
        Self { zones, summary }
    }

    /// Zones as `0..=4`.
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        self.zones.iter().map(|zone| zone.index()).collect()
    }

    /// Zones as letters.
    #[must_use]
    pub fn letters(&self) -> Vec<char> {
        self.zones.iter().map(|zone| zone.letter()).collect()
    }
}

impl ToResultMap for ZoneClassification {
    fn to_result_map(&self) -> ResultMap {
        ResultMap::from([
            ("zones", ResultValue::Labels(self.letters())),
            ("zone_index", ResultValue::Counts(self.indices())),
            ("zone_counts", ResultValue::Counts(self.summary.counts().to_vec())),
            (
                "zone_percentages",
                ResultValue::Sequence(self.summary.percentages().to_vec()),
            ),
        ])
    }
}
