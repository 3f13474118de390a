use super::{build_engine, engine_config, write_report};
use crate::cli::output::{error, format_bytes, section_header, success, tree_item};
use crate::cli::Cli;
use anyhow::{Context, Result};
use clap::Args;
use skyreport_core::{RawReportRequest, ReportRequest};
use skyreport_engine::configure_thread_pool;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Args)]
pub struct BatchArgs {
    /// JSON array of requests, e.g. [{"type": "bookings", "format": "csv"}]
    #[arg(short, long, value_name = "FILE")]
    pub requests: PathBuf,

    /// Directory receiving the generated reports
    #[arg(short, long, value_name = "DIR", default_value = "reports")]
    pub out_dir: PathBuf,

    /// Metrics snapshot JSON (defaults to generated sample metrics)
    #[arg(short, long, value_name = "FILE")]
    pub metrics: Option<PathBuf>,

    /// Seed for sample metrics and occupancy values
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn read_requests(path: &Path) -> Result<Vec<RawReportRequest>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let requests = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse requests in {}", path.display()))?;
    Ok(requests)
}

/// `01-bookings`, `02-revenue`, ...
fn file_stem(index: usize, request: &ReportRequest) -> String {
    format!("{:02}-{}", index + 1, request.report_type.name())
}

pub fn run(cli: &Cli, args: &BatchArgs) -> Result<()> {
    if cli.threads > 0 {
        configure_thread_pool(cli.threads)?;
    }

    let raw_requests = read_requests(&args.requests)?;
    let config = engine_config(cli.config.as_deref(), args.seed)?;
    let engine = build_engine(config, args.metrics.as_ref(), args.seed)?;

    // Invalid entries are reported individually; the rest still render
    let mut valid = Vec::new();
    let mut failures = 0usize;
    for (i, raw) in raw_requests.iter().enumerate() {
        match ReportRequest::try_from(raw) {
            Ok(request) => valid.push((i, request)),
            Err(e) => {
                failures += 1;
                error(&format!("Request {}: {}", i + 1, e));
            }
        }
    }

    let requests: Vec<ReportRequest> = valid.iter().map(|(_, r)| r.clone()).collect();
    let results = engine.generate_batch(&requests);

    section_header("Batch results");
    let total = results.len();
    for (n, ((i, request), result)) in valid.iter().zip(results).enumerate() {
        let is_last = n + 1 == total;
        match result {
            Ok(report) => {
                let path = args.out_dir.join(report.file_name(&file_stem(*i, request)));
                write_report(&report, &path)?;
                tree_item(
                    is_last,
                    &path.display().to_string(),
                    Some(&format_bytes(report.bytes.len())),
                );
            }
            Err(e) => {
                failures += 1;
                warn!(index = i + 1, error = %e, "Batch request failed");
                tree_item(is_last, &format!("Request {}", i + 1), Some(&e.to_string()));
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} requests failed", failures, raw_requests.len());
    }
    success(&format!("{} reports written to {}", total, args.out_dir.display()));
    Ok(())
}
