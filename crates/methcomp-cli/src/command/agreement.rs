use methcomp::{BlandAltman, DifferenceMode, Mountain};

use super::{IoArg, confidence_level, run_analysis};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BlandAltmanArg {
    #[clap(flatten)]
    io: IoArg,
    /// How differences are expressed: "absolute" or "percentage"
    #[arg(long, default_value = "absolute")]
    mode: DifferenceMode,
    /// Number of standard deviations spanned by the limits of agreement
    #[arg(long, default_value_t = BlandAltman::DEFAULT_LIMIT_OF_AGREEMENT)]
    limit_of_agreement: f64,
    /// Confidence level of the mean and limit intervals
    #[arg(long, default_value_t = 0.95)]
    confidence: f64,
    /// Skip the confidence intervals
    #[arg(long)]
    no_confidence: bool,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct MountainArg {
    #[clap(flatten)]
    io: IoArg,
    /// Number of quantile points
    #[arg(long, default_value_t = Mountain::DEFAULT_PERCENTILES)]
    percentiles: usize,
    /// Central percentage reported as the interquantile range
    #[arg(long, default_value_t = Mountain::DEFAULT_IQR)]
    iqr: f64,
}

pub(crate) fn run_bland_altman(arg: &BlandAltmanArg) -> anyhow::Result<()> {
    let confidence = if arg.no_confidence {
        None
    } else {
        Some(confidence_level(arg.confidence)?)
    };
    let analysis = BlandAltman::default()
        .with_mode(arg.mode)
        .with_limit_of_agreement(arg.limit_of_agreement)?
        .with_confidence(confidence);
    run_analysis(&arg.io, analysis)
}

pub(crate) fn run_mountain(arg: &MountainArg) -> anyhow::Result<()> {
    let analysis = Mountain::new(arg.percentiles, arg.iqr)?;
    run_analysis(&arg.io, analysis)
}
