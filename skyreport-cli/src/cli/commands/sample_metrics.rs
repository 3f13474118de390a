use crate::cli::output::success;
use anyhow::{Context, Result};
use clap::Args;
use skyreport_core::TimeFrame;
use skyreport_engine::{MetricsProvider, SampleMetricsProvider};
use std::path::PathBuf;

#[derive(Args)]
pub struct SampleMetricsArgs {
    /// Granularity of the generated daily series
    #[arg(long, value_enum, default_value = "monthly")]
    pub time_frame: TimeFrame,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file (prints to stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: &SampleMetricsArgs) -> Result<()> {
    let provider = match args.seed {
        Some(seed) => SampleMetricsProvider::with_seed(seed),
        None => SampleMetricsProvider::new(),
    };
    let snapshot = provider.get_analytics(args.time_frame.scale())?;
    let json = serde_json::to_string_pretty(&snapshot)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            success(&format!(
                "{} days of sample metrics written to {}",
                snapshot.revenue_data.len(),
                path.display()
            ));
        }
        None => println!("{}", json),
    }
    Ok(())
}
