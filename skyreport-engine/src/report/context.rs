//! Per-render state
//!
//! Everything a render may observe besides the model itself: the clock
//! reading, the occupancy RNG, the contact protector and a cancel flag.
//! A context is created for one render and dropped with it.

use super::protect::{ContactProtector, EncryptionPath};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use skyreport_core::{EngineConfig, ReportError, ReportResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub struct RenderContext {
    pub generated_at: DateTime<Utc>,
    pub date_format: String,
    pub organisation: String,
    pub occupancy_min: f64,
    pub occupancy_max: f64,
    pub rng: StdRng,
    pub protector: ContactProtector,
    cancel: Option<Arc<AtomicBool>>,
    encryption_path: Option<EncryptionPath>,
}

impl RenderContext {
    pub fn new(generated_at: DateTime<Utc>, config: &EngineConfig, protector: ContactProtector) -> Self {
        let rng = match config.occupancy.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            generated_at,
            date_format: config.output.date_format.clone(),
            organisation: config.output.organisation.clone(),
            occupancy_min: config.occupancy.min_percent,
            occupancy_max: config.occupancy.max_percent,
            rng,
            protector,
            cancel: None,
            encryption_path: None,
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Called once per detail row
    pub fn checkpoint(&self) -> ReportResult<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(ReportError::Cancelled),
            _ => Ok(()),
        }
    }

    pub fn record_encryption_path(&mut self, path: EncryptionPath) {
        self.encryption_path = Some(path);
    }

    /// Path used for customer data in the last render, if it had any
    pub fn encryption_path(&self) -> Option<EncryptionPath> {
        self.encryption_path
    }
}
