pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "skyreport",
    version,
    about = "Generate airline booking analytics reports",
    long_about = "SkyReport turns booking, revenue and feedback metrics into CSV, \
                  spreadsheet (xlsx) or paginated document (pdf) reports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use for batches (0 = all available)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,

    /// Engine configuration file (TOML)
    #[arg(short, long, value_name = "FILE", global = true, env = "SKYREPORT_CONFIG")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            skyreport_engine::get_available_cores()
        } else {
            self.threads
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a single report
    Generate(commands::generate::GenerateArgs),

    /// Generate every request in a JSON file in parallel
    Batch(commands::batch::BatchArgs),

    /// Dump a sample metrics snapshot as JSON
    SampleMetrics(commands::sample_metrics::SampleMetricsArgs),

    /// Write the default engine configuration
    InitConfig(commands::init_config::InitConfigArgs),
}
