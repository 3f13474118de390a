//! Test utilities for the SkyReport workspace
//!
//! Common fixtures, mock collaborators and assertions for testing the report
//! engine and CLI.
//!
//! # Features
//!
//! - **Test Environment**: Isolated temp directory with config and snapshot files
//! - **Fixtures**: A fixed metrics snapshot, customers and a pinned clock
//! - **Mock Implementations**: Static metrics provider and deterministic encryptors
//! - **Assertions**: Output signature checks for each format

pub mod assertions;
pub mod environment;
pub mod fixtures;
pub mod mock;

// Re-export commonly used items
pub use environment::TestEnvironment;
pub use fixtures::{fixed_clock, fixed_snapshot, sample_customers, FIXED_TIMESTAMP};
pub use mock::{FailingEncryptor, MockEncryptor, StaticMetricsProvider};

// Re-export test dependencies for convenience
pub use anyhow::{Context, Result};
pub use tempfile;

use skyreport_engine::ReportEngine;
use std::sync::Arc;

/// Initialize test logging (safe to call from every test)
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("skyreport_engine=debug,skyreport_core=debug"))
        .with_test_writer()
        .try_init();
}

/// Engine over the fixed snapshot with a mock encryptor and pinned clock
pub fn test_engine() -> ReportEngine {
    engine_with(Some(Arc::new(MockEncryptor)))
}

/// Engine over the fixed snapshot with an optional encryption primitive
pub fn engine_with(encryptor: Option<Arc<dyn skyreport_engine::Encryptor>>) -> ReportEngine {
    let mut config = skyreport_core::EngineConfig::default();
    config.occupancy.seed = Some(7);

    let mut builder = ReportEngine::builder()
        .provider(Arc::new(StaticMetricsProvider::new(fixed_snapshot())))
        .clock(fixed_clock())
        .config(config);
    if let Some(encryptor) = encryptor {
        builder = builder.encryptor(encryptor);
    }
    // Default config always validates
    builder.build().expect("test engine configuration is valid")
}

/// Run a test inside a fresh environment
///
/// # Example
/// ```rust
/// use skyreport_test::with_test_env;
///
/// with_test_env(|env| {
///     let path = env.write_snapshot(&skyreport_test::fixed_snapshot())?;
///     assert!(path.exists());
///     Ok(())
/// }).unwrap();
/// ```
pub fn with_test_env<F, R>(f: F) -> Result<R>
where
    F: FnOnce(&TestEnvironment) -> Result<R>,
{
    let env = TestEnvironment::new()?;
    f(&env)
}
