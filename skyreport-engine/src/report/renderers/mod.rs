/// Output backends
///
/// Each renderer projects the model through `Reportable::to_document` and
/// encodes the result. Renderers hold no state between invocations.
pub mod csv;
pub mod pdf;
pub mod spreadsheet;

pub use csv::CsvRenderer;
pub use pdf::DocumentRenderer;
pub use spreadsheet::SpreadsheetRenderer;

use super::context::RenderContext;
use super::model::ReportModel;
use super::protect::FallbackPolicy;
use skyreport_core::config::SecurityConfig;
use skyreport_core::{ReportFormat, ReportResult};

pub trait Renderer: Send + Sync {
    fn format(&self) -> ReportFormat;

    /// How customer contact fields may be protected by this backend
    fn fallback_policy(&self) -> FallbackPolicy {
        FallbackPolicy::PrimaryOnly
    }

    fn render(&self, model: &ReportModel, ctx: &mut RenderContext) -> ReportResult<Vec<u8>>;
}

/// Renderer for a validated format
pub fn renderer_for(format: ReportFormat, security: &SecurityConfig) -> Box<dyn Renderer> {
    match format {
        ReportFormat::Csv => Box::new(CsvRenderer),
        ReportFormat::Spreadsheet => Box::new(SpreadsheetRenderer),
        ReportFormat::Document => Box::new(DocumentRenderer::new(security.allow_document_fallback)),
    }
}
