use crate::cli::output::success;
use anyhow::{Context, Result};
use clap::Args;
use skyreport_core::config::default_config;
use skyreport_core::save_config;
use std::path::PathBuf;

#[derive(Args)]
pub struct InitConfigArgs {
    /// Destination file
    #[arg(short, long, value_name = "FILE", default_value = "skyreport.toml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitConfigArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }
    save_config(&args.output, &default_config())
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    success(&format!("Default configuration written to {}", args.output.display()));
    Ok(())
}
