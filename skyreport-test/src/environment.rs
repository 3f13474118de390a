//! Test environment management
//!
//! Provides isolated test environments with automatic cleanup using RAII.

use anyhow::{Context, Result};
use skyreport_core::{save_config, EngineConfig, MetricsSnapshot};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated directory holding config, snapshot and output files
pub struct TestEnvironment {
    /// Root temporary directory
    temp_dir: Option<TempDir>,
    root_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::with_prefix("skyreport-test")
            .context("Failed to create temporary directory")?;
        let root_path = temp_dir.path().to_path_buf();
        std::fs::create_dir_all(root_path.join("output"))?;

        Ok(Self {
            temp_dir: Some(temp_dir),
            root_path,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// Directory where generated reports are written
    pub fn output_dir(&self) -> PathBuf {
        self.root_path.join("output")
    }

    /// Write a file in the test environment
    pub fn write_file(&self, path: impl AsRef<Path>, content: &[u8]) -> Result<PathBuf> {
        let full_path = self.root_path.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full_path, content)
            .with_context(|| format!("Failed to write {}", full_path.display()))?;
        Ok(full_path)
    }

    /// Read a file from the test environment
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let full_path = self.root_path.join(path);
        std::fs::read(&full_path).with_context(|| format!("Failed to read {}", full_path.display()))
    }

    /// Serialize a snapshot to `metrics.json` in the camelCase wire shape
    pub fn write_snapshot(&self, snapshot: &MetricsSnapshot) -> Result<PathBuf> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        self.write_file("metrics.json", &json)
    }

    /// Save an engine config to `skyreport.toml`
    pub fn write_config(&self, config: &EngineConfig) -> Result<PathBuf> {
        let path = self.root_path.join("skyreport.toml");
        save_config(&path, config)?;
        Ok(path)
    }

    /// Keep the directory after the test (for debugging)
    pub fn preserve(&mut self) {
        if let Some(temp_dir) = self.temp_dir.take() {
            let path = temp_dir.keep();
            println!("Test environment preserved at: {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::fixed_snapshot;

    #[test]
    fn test_environment_isolation() {
        let env1 = TestEnvironment::new().unwrap();
        let env2 = TestEnvironment::new().unwrap();
        assert_ne!(env1.root(), env2.root());

        env1.write_file("test.txt", b"env1").unwrap();
        assert!(!env2.root().join("test.txt").exists());
        assert_eq!(env1.read_file("test.txt").unwrap(), b"env1");
    }

    #[test]
    fn test_environment_cleanup() {
        let path = {
            let env = TestEnvironment::new().unwrap();
            let path = env.root().to_path_buf();
            assert!(env.output_dir().exists());
            path
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_snapshot_file_is_camel_case() {
        let env = TestEnvironment::new().unwrap();
        let path = env.write_snapshot(&fixed_snapshot()).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("\"totalRevenue\""));
        assert!(text.contains("\"avgTicketPrice\""));
    }

    #[test]
    fn test_config_round_trip() {
        let env = TestEnvironment::new().unwrap();
        let path = env.write_config(&EngineConfig::default()).unwrap();
        let loaded = skyreport_core::load_config(path).unwrap();
        assert_eq!(loaded.output.date_format, EngineConfig::default().output.date_format);
    }
}
