//! Core types shared across all SkyReport crates

pub mod config;
pub mod error;
pub mod system;
pub mod types;

// Re-export commonly used types
pub use config::{load_config, save_config, EngineConfig};
pub use error::{ReportError, ReportResult};

pub use types::{
    ClassBookings, CustomerRecord, DailyRevenue, DateRange, MetricsSnapshot, QuarterMargin,
    RawDateRange, RawReportRequest, ReportFormat, ReportRequest, ReportType, RouteBookings, TimeFrame,
    TimeScale,
};

pub use system::{Clock, FixedClock, SystemClock};

/// Version information for the SkyReport project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
