//! Report orchestration
//!
//! `ReportEngine` sequences one request: metrics fetch, model build,
//! renderer dispatch by format. Requests share nothing mutable, so a batch
//! fans out over rayon.

use crate::metrics::MetricsProvider;
use crate::parallel::should_parallelize;
use crate::report::protect::{ContactProtector, EncryptionPath, Encryptor};
use crate::report::renderers::renderer_for;
use crate::report::{ModelBuilder, RenderContext, ReportModel};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use skyreport_core::{
    Clock, EngineConfig, RawReportRequest, ReportError, ReportFormat, ReportRequest, ReportResult,
    SystemClock,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Rendered bytes plus everything a transport needs to ship them
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub model: ReportModel,
    pub bytes: Vec<u8>,
    pub format: ReportFormat,
    pub media_type: &'static str,
    pub file_extension: &'static str,
    pub generated_at: DateTime<Utc>,
    /// Set when the report carried customer data
    pub encryption_path: Option<EncryptionPath>,
}

impl GeneratedReport {
    /// `<stem>-report.<ext>`, e.g. `bookings-report.csv`
    pub fn file_name(&self, stem: &str) -> String {
        format!("{}-report.{}", stem, self.file_extension)
    }
}

pub struct ReportEngine {
    provider: Arc<dyn MetricsProvider>,
    encryptor: Option<Arc<dyn Encryptor>>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    builder: ModelBuilder,
}

impl ReportEngine {
    pub fn builder() -> ReportEngineBuilder {
        ReportEngineBuilder::default()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn generate(&self, request: &ReportRequest) -> ReportResult<GeneratedReport> {
        self.run(request, None)
    }

    /// Like [`generate`](Self::generate), aborting at the next detail row
    /// once `cancel` is set
    pub fn generate_with_cancel(
        &self,
        request: &ReportRequest,
        cancel: Arc<AtomicBool>,
    ) -> ReportResult<GeneratedReport> {
        self.run(request, Some(cancel))
    }

    /// Validate a transport-shaped request, then generate it
    pub fn generate_raw(&self, raw: &RawReportRequest) -> ReportResult<GeneratedReport> {
        let request = ReportRequest::try_from(raw)?;
        self.generate(&request)
    }

    /// Generate independent requests in parallel; results keep input order
    pub fn generate_batch(&self, requests: &[ReportRequest]) -> Vec<ReportResult<GeneratedReport>> {
        info!(count = requests.len(), "Generating report batch");
        if should_parallelize(requests.len()) {
            requests.par_iter().map(|r| self.generate(r)).collect()
        } else {
            requests.iter().map(|r| self.generate(r)).collect()
        }
    }

    /// Render an already built model; the model is not modified
    pub fn render_model(
        &self,
        model: &ReportModel,
        format: ReportFormat,
        cancel: Option<Arc<AtomicBool>>,
    ) -> ReportResult<(Vec<u8>, DateTime<Utc>, Option<EncryptionPath>)> {
        let generated_at = self.clock.now();
        let protector = ContactProtector::new(self.encryptor.clone());
        let mut ctx = RenderContext::new(generated_at, &self.config, protector);
        if let Some(flag) = cancel {
            ctx = ctx.with_cancel_flag(flag);
        }

        let renderer = renderer_for(format, &self.config.security);
        debug!(format = %renderer.format(), "Renderer selected");
        let bytes = renderer.render(model, &mut ctx)?;
        Ok((bytes, generated_at, ctx.encryption_path()))
    }

    fn run(
        &self,
        request: &ReportRequest,
        cancel: Option<Arc<AtomicBool>>,
    ) -> ReportResult<GeneratedReport> {
        let start = Instant::now();
        info!(
            report_type = %request.report_type,
            format = %request.format,
            time_frame = ?request.time_frame,
            "Generating report"
        );

        let scale = request.time_frame.scale();
        let metrics = self.provider.get_analytics(scale)?;
        debug!(
            scale = scale.as_str(),
            days = metrics.revenue_data.len(),
            routes = metrics.popular_routes.len(),
            "Fetched metrics"
        );

        let model = self.builder.build(&request.report_type, request, &metrics)?;
        let (bytes, generated_at, encryption_path) =
            self.render_model(&model, request.format, cancel)?;

        info!(
            title = model.title(),
            bytes = bytes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Report generated"
        );

        Ok(GeneratedReport {
            model,
            bytes,
            format: request.format,
            media_type: request.format.media_type(),
            file_extension: request.format.extension(),
            generated_at,
            encryption_path,
        })
    }
}

#[derive(Default)]
pub struct ReportEngineBuilder {
    provider: Option<Arc<dyn MetricsProvider>>,
    encryptor: Option<Arc<dyn Encryptor>>,
    clock: Option<Arc<dyn Clock>>,
    config: Option<EngineConfig>,
}

impl ReportEngineBuilder {
    pub fn provider(mut self, provider: Arc<dyn MetricsProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn encryptor(mut self, encryptor: Arc<dyn Encryptor>) -> Self {
        self.encryptor = Some(encryptor);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> ReportResult<ReportEngine> {
        let provider = self.provider.ok_or_else(|| {
            ReportError::Configuration("no metrics provider configured".to_string())
        })?;
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(ReportEngine {
            provider,
            encryptor: self.encryptor,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            builder: ModelBuilder::new(config.policy.clone()),
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{MockMetricsProvider, SampleMetricsProvider};
    use crate::report::protect::EncryptionError;
    use chrono::TimeZone;
    use mockall::predicate::eq;
    use skyreport_core::{FixedClock, ReportType, TimeFrame, TimeScale};
    use std::sync::atomic::Ordering;

    struct Hexify;

    impl Encryptor for Hexify {
        fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
            Ok(plaintext.bytes().map(|b| format!("{:02x}", b)).collect())
        }
    }

    fn fixed_clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap()))
    }

    fn engine() -> ReportEngine {
        ReportEngine::builder()
            .provider(Arc::new(SampleMetricsProvider::with_seed(11)))
            .encryptor(Arc::new(Hexify))
            .clock(fixed_clock())
            .build()
            .unwrap()
    }

    #[test]
    fn test_time_frame_maps_to_scale() {
        let mut provider = MockMetricsProvider::new();
        provider
            .expect_get_analytics()
            .with(eq(TimeScale::Week))
            .times(1)
            .returning(|scale| SampleMetricsProvider::with_seed(1).get_analytics(scale));

        let engine = ReportEngine::builder()
            .provider(Arc::new(provider))
            .clock(fixed_clock())
            .build()
            .unwrap();
        let request = ReportRequest::new(ReportType::Bookings, ReportFormat::Csv)
            .with_time_frame(TimeFrame::Weekly);
        let report = engine.generate(&request).unwrap();
        assert_eq!(report.model.body.detail_len(), 7);
    }

    #[test]
    fn test_provider_errors_propagate() {
        let mut provider = MockMetricsProvider::new();
        provider
            .expect_get_analytics()
            .returning(|_| Err(ReportError::Metrics("upstream down".to_string())));

        let engine = ReportEngine::builder().provider(Arc::new(provider)).build().unwrap();
        let result = engine.generate(&ReportRequest::new(ReportType::Routes, ReportFormat::Csv));
        assert!(matches!(result, Err(ReportError::Metrics(_))));
    }

    #[test]
    fn test_generated_metadata() {
        let report = engine()
            .generate(&ReportRequest::new(ReportType::Revenue, ReportFormat::Spreadsheet))
            .unwrap();
        assert_eq!(report.format, ReportFormat::Spreadsheet);
        assert_eq!(report.file_extension, "xlsx");
        assert_eq!(report.file_name("revenue"), "revenue-report.xlsx");
        assert_eq!(report.generated_at, Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap());
        assert!(report.encryption_path.is_none());
    }

    #[test]
    fn test_unsupported_raw_format() {
        let raw = RawReportRequest::new("bookings", "xml");
        match engine().generate_raw(&raw) {
            Err(ReportError::UnsupportedFormat(f)) => assert_eq!(f, "xml"),
            other => panic!("Expected UnsupportedFormat, got {:?}", other.map(|r| r.bytes.len())),
        }
    }

    #[test]
    fn test_batch_preserves_order() {
        let requests: Vec<ReportRequest> = ReportType::known()
            .into_iter()
            .map(|t| ReportRequest::new(t, ReportFormat::Csv))
            .collect();
        let results = engine().generate_batch(&requests);
        assert_eq!(results.len(), 5);
        let titles: Vec<&str> = results.iter().map(|r| r.as_ref().unwrap().model.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Bookings Report",
                "Revenue Report",
                "Cancellations Report",
                "Popular Routes Report",
                "Customer Feedback Report"
            ]
        );
    }

    #[test]
    fn test_cancelled_before_rows() {
        let flag = Arc::new(AtomicBool::new(false));
        flag.store(true, Ordering::Relaxed);
        let result = engine().generate_with_cancel(
            &ReportRequest::new(ReportType::Bookings, ReportFormat::Document),
            flag,
        );
        assert!(matches!(result, Err(ReportError::Cancelled)));
    }

    #[test]
    fn test_builder_requires_provider() {
        assert!(matches!(
            ReportEngine::builder().build(),
            Err(ReportError::Configuration(_))
        ));
    }
}
