pub mod batch;
pub mod generate;
pub mod init_config;
pub mod sample_metrics;

use anyhow::{Context, Result};
use skyreport_core::{load_config, EngineConfig};
use skyreport_engine::{
    GeneratedReport, JsonMetricsProvider, MetricsProvider, ReportEngine, SampleMetricsProvider,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load the config file when given, then apply a command-line seed
pub fn engine_config(path: Option<&Path>, seed: Option<u64>) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if seed.is_some() {
        config.occupancy.seed = seed;
    }
    Ok(config)
}

/// Metrics from a JSON snapshot file, or the sample generator
pub fn metrics_provider(metrics: Option<&PathBuf>, seed: Option<u64>) -> Arc<dyn MetricsProvider> {
    match (metrics, seed) {
        (Some(path), _) => Arc::new(JsonMetricsProvider::new(path)),
        (None, Some(seed)) => Arc::new(SampleMetricsProvider::with_seed(seed)),
        (None, None) => Arc::new(SampleMetricsProvider::new()),
    }
}

/// The CLI has no encryption primitive; documents fall back, other formats
/// refuse customer data
pub fn build_engine(
    config: EngineConfig,
    metrics: Option<&PathBuf>,
    seed: Option<u64>,
) -> Result<ReportEngine> {
    let engine = ReportEngine::builder()
        .provider(metrics_provider(metrics, seed))
        .config(config)
        .build()?;
    Ok(engine)
}

/// Write report bytes, creating parent directories as needed
pub fn write_report(report: &GeneratedReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, &report.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyreport_core::save_config;
    use tempfile::TempDir;

    #[test]
    fn test_seed_overrides_config() {
        let config = engine_config(None, Some(9)).unwrap();
        assert_eq!(config.occupancy.seed, Some(9));
    }

    #[test]
    fn test_config_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skyreport.toml");
        let mut config = EngineConfig::default();
        config.output.organisation = "Test Air".to_string();
        save_config(&path, &config).unwrap();

        let loaded = engine_config(Some(&path), None).unwrap();
        assert_eq!(loaded.output.organisation, "Test Air");
    }

    #[test]
    fn test_missing_config_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(engine_config(Some(&dir.path().join("absent.toml")), None).is_err());
    }
}
