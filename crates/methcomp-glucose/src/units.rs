use std::{fmt, str::FromStr};

use methcomp::Error;
use serde::Serialize;

/// Unit of the glucose values fed to an error grid.
///
/// Zone boundaries are defined in mg/dL; values in mmol/L are compared
/// against boundaries divided by [`GlucoseUnit::MG_DL_PER_MMOL_L`].
///
/// # Examples
///
/// ```
/// use methcomp_glucose::GlucoseUnit;
///
/// assert_eq!("mmol".parse::<GlucoseUnit>().unwrap(), GlucoseUnit::MmolPerL);
/// assert_eq!("mg/dl".parse::<GlucoseUnit>().unwrap(), GlucoseUnit::MgPerDl);
/// assert_eq!("mgdl".parse::<GlucoseUnit>().unwrap(), GlucoseUnit::MgPerDl);
/// assert!("g/l".parse::<GlucoseUnit>().is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum GlucoseUnit {
    #[serde(rename = "mmol")]
    MmolPerL,
    #[default]
    #[serde(rename = "mg/dl")]
    MgPerDl,
}

impl GlucoseUnit {
    /// Approximate conversion factor used by the published grids.
    pub const MG_DL_PER_MMOL_L: f64 = 18.0;

    /// Converts a boundary given in mg/dL into this unit.
    #[must_use]
    pub fn threshold(self, value: f64) -> f64 {
        match self {
            Self::MmolPerL => value / Self::MG_DL_PER_MMOL_L,
            Self::MgPerDl => value,
        }
    }
}

impl FromStr for GlucoseUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mmol" => Ok(Self::MmolPerL),
            "mg/dl" | "mgdl" => Ok(Self::MgPerDl),
            _ => Err(Error::domain(
                "glucose unit",
                "one of 'mmol', 'mg/dl', 'mgdl'",
                s,
            )),
        }
    }
}

impl fmt::Display for GlucoseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MmolPerL => "mmol",
            Self::MgPerDl => "mg/dl",
        })
    }
}
