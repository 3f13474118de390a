/// Core types shared across all SkyReport modules
pub mod metrics;
pub mod request;

// Re-export commonly used types at module level
pub use metrics::{
    ClassBookings, CustomerRecord, DailyRevenue, MetricsSnapshot, QuarterMargin, RouteBookings,
};
pub use request::{
    DateRange, RawDateRange, RawReportRequest, ReportFormat, ReportRequest, ReportType,
    TimeFrame, TimeScale,
};
