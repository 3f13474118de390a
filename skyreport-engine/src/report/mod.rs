/// Report generation
///
/// ## Pipeline
/// 1. `ModelBuilder::build` derives a canonical `ReportModel` from a request and a metrics snapshot
/// 2. `Reportable::to_document` projects the model into a `ReportDocument` for one render
/// 3. A `Renderer` encodes the document as delimited text, a workbook, or a paginated document
///
/// Formatting, rounding and redaction live in `format` and `protect` so every
/// renderer displays the same values.
pub mod builder;
pub mod context;
pub mod document;
pub mod format;
pub mod model;
pub mod protect;
pub mod renderers;

pub use builder::ModelBuilder;
pub use context::RenderContext;
pub use document::{
    Cell, CustomerTable, ListSection, Metric, ProtectedCustomer, ReportDocument, Reportable,
    Table,
};
pub use model::{
    BookingsReport, CancellationsReport, DailyBookings, DailyCancellations, DailyFinancials,
    FeedbackReport, Filter, GeneralReport, RatingBucket, ReportBody, ReportModel, RevenueReport,
    RoutePerformance, RoutesReport,
};
pub use protect::{
    Base64Fallback, ContactProtector, EncryptionError, EncryptionPath, Encryptor, FallbackPolicy,
};
pub use renderers::{renderer_for, CsvRenderer, DocumentRenderer, Renderer, SpreadsheetRenderer};
