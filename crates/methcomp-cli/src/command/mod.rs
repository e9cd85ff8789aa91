use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use methcomp::{Analysis, Comparer, ConfidenceLevel, ResultMap, ToResultMap};

use crate::util::{self, Output};

use self::{
    agreement::{BlandAltmanArg, MountainArg},
    glucose::{ClarkeArg, ParkesArg},
    regression::{DemingArg, LinearArg, PassingBablokArg},
};

mod agreement;
mod glucose;
mod regression;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Analysis to run on the paired measurements
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Passing-Bablok regression
    PassingBablok(#[clap(flatten)] PassingBablokArg),
    /// Deming regression, optionally bootstrapped
    Deming(#[clap(flatten)] DemingArg),
    /// Ordinary least squares regression
    Linear(#[clap(flatten)] LinearArg),
    /// Bland-Altman bias and limits of agreement
    BlandAltman(#[clap(flatten)] BlandAltmanArg),
    /// Mountain plot of the differences
    Mountain(#[clap(flatten)] MountainArg),
    /// Clarke glucose error grid
    Clarke(#[clap(flatten)] ClarkeArg),
    /// Parkes glucose error grid
    Parkes(#[clap(flatten)] ParkesArg),
}

/// Input and output shared by every analysis.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct IoArg {
    /// Input file (JSON or two-column CSV); reads stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output file path; writes stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

/// What the binary writes: the analysis name, the sample size and the flat
/// result map.
#[derive(Debug, serde::Serialize)]
struct Report {
    analysis: &'static str,
    n: usize,
    result: ResultMap,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::PassingBablok(arg) => regression::run_passing_bablok(&arg)?,
        Mode::Deming(arg) => regression::run_deming(&arg)?,
        Mode::Linear(arg) => regression::run_linear(&arg)?,
        Mode::BlandAltman(arg) => agreement::run_bland_altman(&arg)?,
        Mode::Mountain(arg) => agreement::run_mountain(&arg)?,
        Mode::Clarke(arg) => glucose::run_clarke(&arg)?,
        Mode::Parkes(arg) => glucose::run_parkes(&arg)?,
    }
    Ok(())
}

/// Run `analysis` on the input named by `io` and write its report
fn run_analysis<A>(io: &IoArg, analysis: A) -> anyhow::Result<()>
where
    A: Analysis,
    A::Output: ToResultMap,
{
    let sample = util::read_paired_sample(io.input.as_deref())?;
    let name = analysis.name();
    let n = sample.len();

    let mut comparer = Comparer::new(sample, analysis);
    let result = comparer
        .compute()
        .with_context(|| format!("Failed to compute {name}"))?;

    let report = Report {
        analysis: name,
        n,
        result: result.to_result_map(),
    };
    Output::save_json(&report, io.output.clone())
}

fn confidence_level(value: f64) -> anyhow::Result<ConfidenceLevel> {
    Ok(ConfidenceLevel::new(value)?)
}
