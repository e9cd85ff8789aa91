use methcomp_glucose::{ClarkeGrid, DiabetesType, GlucoseUnit, ParkesGrid};

use super::{IoArg, run_analysis};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ClarkeArg {
    #[clap(flatten)]
    io: IoArg,
    /// Unit of the readings: "mmol" or "mg/dl"
    #[arg(long, default_value = "mg/dl")]
    unit: GlucoseUnit,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ParkesArg {
    #[clap(flatten)]
    io: IoArg,
    /// Unit of the readings: "mmol" or "mg/dl"
    #[arg(long, default_value = "mg/dl")]
    unit: GlucoseUnit,
    /// Diabetes type of the patient population: 1 or 2
    #[arg(long = "type", default_value = "1")]
    diabetes_type: DiabetesType,
}

pub(crate) fn run_clarke(arg: &ClarkeArg) -> anyhow::Result<()> {
    run_analysis(&arg.io, ClarkeGrid::new(arg.unit))
}

pub(crate) fn run_parkes(arg: &ParkesArg) -> anyhow::Result<()> {
    run_analysis(&arg.io, ParkesGrid::new(arg.diabetes_type, arg.unit))
}
