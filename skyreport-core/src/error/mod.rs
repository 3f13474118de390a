//! Core error types for SkyReport

use thiserror::Error;

/// Main error type for report generation
#[derive(Error, Debug)]
pub enum ReportError {
    /// The request cannot be turned into a report: unknown time frame,
    /// malformed date range, or a report type whose required metrics are
    /// missing from the snapshot.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The requested output format is outside {csv, spreadsheet, document}.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A renderer could not produce its byte stream. Encryption failures
    /// surface here as well.
    #[error("Render failure: {0}")]
    RenderFailure(String),

    #[error("Metrics provider error: {0}")]
    Metrics(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation cancelled")]
    Cancelled,
}

/// Result type alias for report operations
pub type ReportResult<T> = Result<T, ReportError>;

impl ReportError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        ReportError::InvalidRequest(msg.into())
    }

    pub fn render_failure(msg: impl Into<String>) -> Self {
        ReportError::RenderFailure(msg.into())
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for ReportError {
    fn from(err: anyhow::Error) -> Self {
        ReportError::RenderFailure(err.to_string())
    }
}
