use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use skyreport_core::{ReportFormat, ReportRequest, ReportType, TimeFrame};
use skyreport_engine::{ReportEngine, SampleMetricsProvider};
use std::hint::black_box;
use std::sync::Arc;

fn sample_engine() -> ReportEngine {
    let mut config = skyreport_core::EngineConfig::default();
    config.occupancy.seed = Some(1);
    ReportEngine::builder()
        .provider(Arc::new(SampleMetricsProvider::with_seed(1)))
        .encryptor(Arc::new(skyreport_test::MockEncryptor))
        .clock(skyreport_test::fixed_clock())
        .config(config)
        .build()
        .unwrap()
}

// ===== Per-format rendering =====

fn bench_render_formats(c: &mut Criterion) {
    let engine = sample_engine();
    let mut group = c.benchmark_group("render_format");

    for format in [ReportFormat::Csv, ReportFormat::Spreadsheet, ReportFormat::Document] {
        let request = ReportRequest::new(ReportType::Revenue, format)
            .with_time_frame(TimeFrame::Monthly);
        let model = engine.generate(&request).unwrap().model;

        group.bench_with_input(
            BenchmarkId::new("revenue_monthly", format.to_string()),
            &model,
            |b, model| b.iter(|| engine.render_model(black_box(model), format, None).unwrap()),
        );
    }

    group.finish();
}

// ===== End-to-end generation =====

fn bench_generate(c: &mut Criterion) {
    let engine = sample_engine();
    let mut group = c.benchmark_group("generate");

    for frame in [TimeFrame::Daily, TimeFrame::Weekly, TimeFrame::Monthly] {
        let request = ReportRequest::new(ReportType::Routes, ReportFormat::Csv).with_time_frame(frame);
        group.bench_with_input(
            BenchmarkId::new("routes_csv", format!("{:?}", frame)),
            &request,
            |b, request| b.iter(|| engine.generate(black_box(request)).unwrap()),
        );
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let engine = sample_engine();
    let requests: Vec<ReportRequest> = ReportType::known()
        .into_iter()
        .map(|t| ReportRequest::new(t, ReportFormat::Spreadsheet))
        .collect();

    c.bench_function("batch_all_types_xlsx", |b| {
        b.iter(|| engine.generate_batch(black_box(&requests)))
    });
}

criterion_group!(benches, bench_render_formats, bench_generate, bench_batch);
criterion_main!(benches);
