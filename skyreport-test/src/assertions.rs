//! Custom assertions for generated reports

use skyreport_core::ReportFormat;
use skyreport_engine::GeneratedReport;

/// Assert the report carries the media type and leading bytes of its format
pub fn assert_format_signature(report: &GeneratedReport) {
    assert_eq!(
        report.media_type,
        report.format.media_type(),
        "media type does not match format {}",
        report.format
    );
    match report.format {
        ReportFormat::Document => assert!(
            report.bytes.starts_with(b"%PDF"),
            "document output is not a PDF"
        ),
        // xlsx is a zip container
        ReportFormat::Spreadsheet => assert!(
            report.bytes.starts_with(b"PK"),
            "spreadsheet output is not a zip container"
        ),
        ReportFormat::Csv => assert!(
            std::str::from_utf8(&report.bytes).is_ok(),
            "csv output is not UTF-8"
        ),
    }
}

/// Assert that `needle` does not appear anywhere in the output bytes
pub fn assert_no_plaintext(bytes: &[u8], needle: &str) {
    let found = bytes
        .windows(needle.len().max(1))
        .any(|w| w == needle.as_bytes());
    assert!(!found, "plaintext {:?} leaked into report output", needle);
}

/// CSV text of a report, panicking on non-CSV output
pub fn csv_text(report: &GeneratedReport) -> &str {
    assert_eq!(report.format, ReportFormat::Csv);
    std::str::from_utf8(&report.bytes).expect("csv output is UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_plaintext_passes() {
        assert_no_plaintext(b"\"enc:6d6f\"", "a@b.com");
    }

    #[test]
    #[should_panic(expected = "leaked")]
    fn test_no_plaintext_detects_leak() {
        assert_no_plaintext(b"\"a@b.com\"", "a@b.com");
    }
}
