//! Metrics provider serving a fixed snapshot

use skyreport_core::{MetricsSnapshot, ReportResult, TimeScale};
use skyreport_engine::MetricsProvider;
use std::sync::Mutex;

/// Returns the same snapshot for every scale and records the scales asked for
#[derive(Debug)]
pub struct StaticMetricsProvider {
    snapshot: MetricsSnapshot,
    calls: Mutex<Vec<TimeScale>>,
}

impl StaticMetricsProvider {
    pub fn new(snapshot: MetricsSnapshot) -> Self {
        Self {
            snapshot,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Scales requested so far, in call order
    pub fn calls(&self) -> Vec<TimeScale> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl MetricsProvider for StaticMetricsProvider {
    fn get_analytics(&self, scale: TimeScale) -> ReportResult<MetricsSnapshot> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(scale);
        }
        Ok(self.snapshot.clone())
    }
}
