use methcomp::regression::{Bootstrap, BootstrapSeed, Deming, Linear, PassingBablok};

use super::{IoArg, confidence_level, run_analysis};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PassingBablokArg {
    #[clap(flatten)]
    io: IoArg,
    /// Confidence level of the slope and intercept intervals
    #[arg(long, default_value_t = 0.95)]
    confidence: f64,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct DemingArg {
    #[clap(flatten)]
    io: IoArg,
    /// Confidence level of the bootstrap intervals
    #[arg(long, default_value_t = 0.95)]
    confidence: f64,
    /// Ratio of the error variances of the two methods
    #[arg(long)]
    variance_ratio: Option<f64>,
    /// Ratio of the error standard deviations, used when no variance ratio is given
    #[arg(long)]
    std_dev_ratio: Option<f64>,
    /// Number of bootstrap resamples
    #[arg(long, default_value_t = Bootstrap::DEFAULT_RESAMPLES)]
    resamples: usize,
    /// Seed of the bootstrap resampling; random when omitted
    #[arg(long)]
    seed: Option<u128>,
    /// Report the point estimate only
    #[arg(long)]
    no_bootstrap: bool,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct LinearArg {
    #[clap(flatten)]
    io: IoArg,
    /// Confidence level of the slope and intercept intervals
    #[arg(long, default_value_t = 0.95)]
    confidence: f64,
}

pub(crate) fn run_passing_bablok(arg: &PassingBablokArg) -> anyhow::Result<()> {
    let analysis = PassingBablok::new(confidence_level(arg.confidence)?);
    run_analysis(&arg.io, analysis)
}

pub(crate) fn run_deming(arg: &DemingArg) -> anyhow::Result<()> {
    let mut analysis = Deming::new(confidence_level(arg.confidence)?);
    if let Some(ratio) = arg.variance_ratio {
        analysis = analysis.with_variance_ratio(ratio)?;
    }
    if let Some(ratio) = arg.std_dev_ratio {
        analysis = analysis.with_std_dev_ratio(ratio)?;
    }
    analysis = if arg.no_bootstrap {
        analysis.without_bootstrap()
    } else {
        let mut bootstrap = Bootstrap::new(arg.resamples)?;
        if let Some(seed) = arg.seed {
            bootstrap = bootstrap.with_seed(BootstrapSeed::from_u128(seed));
        }
        tracing::debug!(
            seed = bootstrap.seed().as_u128(),
            resamples = bootstrap.resamples(),
            "bootstrap configured"
        );
        analysis.with_bootstrap(bootstrap)
    };
    run_analysis(&arg.io, analysis)
}

pub(crate) fn run_linear(arg: &LinearArg) -> anyhow::Result<()> {
    let analysis = Linear::new(confidence_level(arg.confidence)?);
    run_analysis(&arg.io, analysis)
}
