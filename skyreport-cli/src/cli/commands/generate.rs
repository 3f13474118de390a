use super::{build_engine, engine_config, write_report};
use crate::cli::output::{info, success, tree_item, warning, format_bytes};
use crate::cli::Cli;
use anyhow::{Context, Result};
use clap::Args;
use skyreport_core::{RawDateRange, ReportFormat, ReportRequest, ReportType, TimeFrame};
use skyreport_engine::EncryptionPath;
use std::path::PathBuf;

#[derive(Args)]
pub struct GenerateArgs {
    /// Report type (bookings, revenue, cancellations, routes, feedback)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub report_type: String,

    /// Output format (csv, spreadsheet, document)
    #[arg(short, long, default_value = "csv")]
    pub format: String,

    /// Metrics granularity
    #[arg(long, value_enum, default_value = "monthly")]
    pub time_frame: TimeFrame,

    /// Range start (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", requires = "to")]
    pub from: Option<String>,

    /// Range end (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", requires = "from")]
    pub to: Option<String>,

    /// Destination filter ("all" for none)
    #[arg(long)]
    pub destination: Option<String>,

    /// Booking status filter ("all" for none)
    #[arg(long)]
    pub status: Option<String>,

    /// Attach customer data with protected contact fields
    #[arg(long)]
    pub include_customers: bool,

    /// Metrics snapshot JSON (defaults to generated sample metrics)
    #[arg(short, long, value_name = "FILE")]
    pub metrics: Option<PathBuf>,

    /// Seed for sample metrics and occupancy values
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output file (defaults to <type>-report.<ext>)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl GenerateArgs {
    pub fn to_request(&self) -> Result<ReportRequest> {
        let format: ReportFormat = self.format.parse()?;
        let range = RawDateRange {
            from: self.from.clone(),
            to: self.to.clone(),
        }
        .validate()?;

        let mut request = ReportRequest::new(ReportType::from_name(&self.report_type), format)
            .with_time_frame(self.time_frame)
            .with_customer_data(self.include_customers);
        request.date_range = range;
        request.destination = self.destination.clone();
        request.status = self.status.clone();
        Ok(request)
    }
}

pub fn run(cli: &Cli, args: &GenerateArgs) -> Result<()> {
    let request = args.to_request()?;
    let config = engine_config(cli.config.as_deref(), args.seed)?;
    let engine = build_engine(config, args.metrics.as_ref(), args.seed)?;

    let report = engine
        .generate(&request)
        .with_context(|| format!("Failed to generate {} report", request.report_type))?;

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(report.file_name(request.report_type.name())));
    write_report(&report, &path)?;

    success(&format!(
        "{} written to {}",
        report.model.title(),
        path.display()
    ));
    tree_item(false, "Media type", Some(report.media_type));
    tree_item(
        report.encryption_path.is_none(),
        "Size",
        Some(&format_bytes(report.bytes.len())),
    );
    match report.encryption_path {
        Some(EncryptionPath::ReversibleFallback) => {
            tree_item(true, "Contact fields", Some(&EncryptionPath::ReversibleFallback.to_string()));
            warning("Contact fields are base64 encoded, not encrypted");
        }
        Some(path) => tree_item(true, "Contact fields", Some(&path.to_string())),
        None => {}
    }
    if cli.verbose > 0 {
        info(&format!("Generated at {}", report.generated_at.to_rfc3339()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use skyreport_core::ReportError;

    fn parse(args: &[&str]) -> GenerateArgs {
        let mut argv = vec!["skyreport", "generate"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            crate::cli::Commands::Generate(args) => args,
            _ => panic!("Expected generate"),
        }
    }

    #[test]
    fn test_request_from_args() {
        let args = parse(&[
            "--type", "revenue", "--format", "xlsx", "--time-frame", "weekly",
            "--from", "2024-01-01", "--to", "2024-01-31", "--destination", "LON",
        ]);
        let request = args.to_request().unwrap();
        assert_eq!(request.report_type, ReportType::Revenue);
        assert_eq!(request.format, ReportFormat::Spreadsheet);
        assert_eq!(request.time_frame, TimeFrame::Weekly);
        assert!(request.date_range.is_some());
        assert_eq!(request.destination.as_deref(), Some("LON"));
    }

    #[test]
    fn test_unsupported_format() {
        let args = parse(&["--type", "bookings", "--format", "xml"]);
        let err = args.to_request().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReportError>(),
            Some(ReportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_reversed_range_is_invalid() {
        let args = parse(&["--type", "bookings", "--from", "2024-02-01", "--to", "2024-01-01"]);
        let err = args.to_request().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReportError>(),
            Some(ReportError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_half_range_rejected_by_parser() {
        let argv = ["skyreport", "generate", "--type", "bookings", "--from", "2024-01-01"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
