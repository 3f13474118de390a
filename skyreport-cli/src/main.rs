use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;

use crate::cli::{Cli, Commands};
use skyreport_core::ReportError;

fn main() {
    // RUST_LOG wins, then SKYREPORT_LOG, then warn
    let log_level = std::env::var("SKYREPORT_LOG").unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(exit_code(&e));
    }
}

/// Map the underlying report error to a process exit code
fn exit_code(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<ReportError>() {
        Some(ReportError::InvalidRequest(_)) => 2,
        Some(ReportError::UnsupportedFormat(_)) => 3,
        Some(ReportError::RenderFailure(_)) => 4,
        Some(ReportError::Configuration(_)) => 5,
        Some(ReportError::Io(_)) => 6,
        _ => 1,
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose > 0 {
        eprintln!("Using {} threads", cli.effective_threads());
    }

    match cli.command {
        Commands::Generate(ref args) => crate::cli::commands::generate::run(&cli, args),
        Commands::Batch(ref args) => crate::cli::commands::batch::run(&cli, args),
        Commands::SampleMetrics(ref args) => crate::cli::commands::sample_metrics::run(args),
        Commands::InitConfig(ref args) => crate::cli::commands::init_config::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let code = |e: ReportError| exit_code(&anyhow::Error::from(e));
        assert_eq!(code(ReportError::InvalidRequest("x".into())), 2);
        assert_eq!(code(ReportError::UnsupportedFormat("xml".into())), 3);
        assert_eq!(code(ReportError::RenderFailure("x".into())), 4);
        assert_eq!(code(ReportError::Configuration("x".into())), 5);
        assert_eq!(code(ReportError::Cancelled), 1);
        assert_eq!(exit_code(&anyhow::anyhow!("plain")), 1);
    }

    #[test]
    fn test_exit_code_survives_context() {
        use anyhow::Context;
        let result: Result<(), ReportError> = Err(ReportError::UnsupportedFormat("xml".into()));
        let err = result.context("Failed to generate report").unwrap_err();
        assert_eq!(exit_code(&err), 3);
    }
}
