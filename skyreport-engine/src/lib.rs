//! Report generation engine
//!
//! Turns a report request into bytes: the metrics provider supplies a
//! snapshot, the model builder derives one canonical report variant from
//! it, and one of three renderers (delimited text, spreadsheet, paginated
//! document) encodes the variant. All renderers share the formatting rules
//! in [`report::format`].

pub mod metrics;
pub mod orchestrator;
pub mod parallel;
pub mod report;

// Re-export commonly used types
pub use metrics::{JsonMetricsProvider, MetricsProvider, SampleMetricsProvider};
pub use orchestrator::{GeneratedReport, ReportEngine, ReportEngineBuilder};
pub use parallel::{configure_thread_pool, get_available_cores};
pub use report::{
    Base64Fallback, ContactProtector, EncryptionError, EncryptionPath, Encryptor, ModelBuilder,
    RenderContext, Renderer, ReportBody, ReportDocument, ReportModel,
};

pub use skyreport_core::{ReportError, ReportResult};
