//! Report request types and their validation

use crate::{ReportError, ReportResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which report to build.
///
/// The five named kinds each map to a canonical report variant. Any other
/// name is kept as `Other` and produces the generic "General Report".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Bookings,
    Revenue,
    Cancellations,
    Routes,
    Feedback,
    Other(String),
}

impl ReportType {
    /// Parse a report type name. Never fails: unknown names become `Other`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "bookings" => ReportType::Bookings,
            "revenue" => ReportType::Revenue,
            "cancellations" => ReportType::Cancellations,
            "routes" => ReportType::Routes,
            "feedback" => ReportType::Feedback,
            _ => ReportType::Other(name.trim().to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ReportType::Bookings => "bookings",
            ReportType::Revenue => "revenue",
            ReportType::Cancellations => "cancellations",
            ReportType::Routes => "routes",
            ReportType::Feedback => "feedback",
            ReportType::Other(name) => name,
        }
    }

    /// The five report types with a dedicated variant
    pub fn known() -> [ReportType; 5] {
        [
            ReportType::Bookings,
            ReportType::Revenue,
            ReportType::Cancellations,
            ReportType::Routes,
            ReportType::Feedback,
        ]
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Output encoding. A closed set: anything else is `UnsupportedFormat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Csv,
    Spreadsheet,
    Document,
}

impl ReportFormat {
    pub fn all() -> [ReportFormat; 3] {
        [ReportFormat::Csv, ReportFormat::Spreadsheet, ReportFormat::Document]
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "text/csv; charset=utf-8",
            ReportFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ReportFormat::Document => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Spreadsheet => "xlsx",
            ReportFormat::Document => "pdf",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Csv => write!(f, "csv"),
            ReportFormat::Spreadsheet => write!(f, "spreadsheet"),
            ReportFormat::Document => write!(f, "document"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "spreadsheet" | "excel" | "xlsx" => Ok(ReportFormat::Spreadsheet),
            "document" | "pdf" => Ok(ReportFormat::Document),
            _ => Err(ReportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Granularity requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum TimeFrame {
    Daily,
    Weekly,
    #[default]
    Monthly,
}

impl TimeFrame {
    /// Scale passed to the metrics provider
    pub fn scale(&self) -> TimeScale {
        match self {
            TimeFrame::Daily => TimeScale::Day,
            TimeFrame::Weekly => TimeScale::Week,
            TimeFrame::Monthly => TimeScale::Month,
        }
    }
}

impl FromStr for TimeFrame {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(TimeFrame::Daily),
            "weekly" => Ok(TimeFrame::Weekly),
            "monthly" => Ok(TimeFrame::Monthly),
            _ => Err(ReportError::InvalidRequest(format!("Unknown time frame: {}", s))),
        }
    }
}

/// Time window understood by the metrics provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeScale {
    Day,
    Week,
    Month,
}

impl TimeScale {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeScale::Day => "day",
            TimeScale::Week => "week",
            TimeScale::Month => "month",
        }
    }
}

/// Inclusive calendar range, `from <= to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DateRangeFields")]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

/// Wire shape of `DateRange`; deserialized values go through `DateRange::new`
#[derive(Deserialize)]
struct DateRangeFields {
    from: NaiveDate,
    to: NaiveDate,
}

impl TryFrom<DateRangeFields> for DateRange {
    type Error = ReportError;

    fn try_from(fields: DateRangeFields) -> Result<Self, Self::Error> {
        DateRange::new(fields.from, fields.to)
    }
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> ReportResult<Self> {
        if from > to {
            return Err(ReportError::InvalidRequest(format!(
                "Date range starts after it ends: {} > {}",
                from, to
            )));
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// "<from> to <to>" using the given strftime pattern
    pub fn display_with(&self, date_format: &str) -> String {
        format!(
            "{} to {}",
            self.from.format(date_format),
            self.to.format(date_format)
        )
    }
}

/// A validated report request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub date_range: Option<DateRange>,
    /// Destination filter; "all" means no filter
    pub destination: Option<String>,
    /// Booking status filter; "all" means no filter
    pub status: Option<String>,
    pub time_frame: TimeFrame,
    pub format: ReportFormat,
    /// Attach the snapshot's customer list to the report
    pub include_customer_data: bool,
}

impl ReportRequest {
    pub fn new(report_type: ReportType, format: ReportFormat) -> Self {
        Self {
            report_type,
            date_range: None,
            destination: None,
            status: None,
            time_frame: TimeFrame::default(),
            format,
            include_customer_data: false,
        }
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_time_frame(mut self, time_frame: TimeFrame) -> Self {
        self.time_frame = time_frame;
        self
    }

    pub fn with_customer_data(mut self, include: bool) -> Self {
        self.include_customer_data = include;
        self
    }
}

/// Date range as received over a transport: ISO-8601 date strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDateRange {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// Unvalidated request, shaped like the JSON a caller submits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReportRequest {
    #[serde(rename = "type")]
    pub report_type: String,
    #[serde(default)]
    pub date_range: Option<RawDateRange>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default = "default_time_frame")]
    pub time_frame: String,
    pub format: String,
    #[serde(default)]
    pub include_customer_data: bool,
}

fn default_time_frame() -> String {
    "monthly".to_string()
}

impl RawReportRequest {
    pub fn new(report_type: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            report_type: report_type.into(),
            date_range: None,
            destination: None,
            status: None,
            time_frame: default_time_frame(),
            format: format.into(),
            include_customer_data: false,
        }
    }
}

fn parse_date(value: &str) -> ReportResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| ReportError::InvalidRequest(format!("Malformed date '{}': {}", value, e)))
}

impl RawDateRange {
    /// Both endpoints or neither; a half-open range is malformed
    pub fn validate(&self) -> ReportResult<Option<DateRange>> {
        match (&self.from, &self.to) {
            (None, None) => Ok(None),
            (Some(from), Some(to)) => Ok(Some(DateRange::new(parse_date(from)?, parse_date(to)?)?)),
            _ => Err(ReportError::InvalidRequest(
                "Date range needs both 'from' and 'to'".to_string(),
            )),
        }
    }
}

impl TryFrom<&RawReportRequest> for ReportRequest {
    type Error = ReportError;

    fn try_from(raw: &RawReportRequest) -> Result<Self, Self::Error> {
        // Format first: an unsupported format must never fall through to a default
        let format: ReportFormat = raw.format.parse()?;
        let time_frame: TimeFrame = raw.time_frame.parse()?;
        let date_range = match &raw.date_range {
            Some(range) => range.validate()?,
            None => None,
        };

        Ok(ReportRequest {
            report_type: ReportType::from_name(&raw.report_type),
            date_range,
            destination: raw.destination.clone(),
            status: raw.status.clone(),
            time_frame,
            format,
            include_customer_data: raw.include_customer_data,
        })
    }
}
