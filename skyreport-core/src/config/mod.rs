//! Configuration types for SkyReport

use crate::ReportError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub occupancy: OccupancyConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

/// Fixed ratios the model builder applies to the metrics snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfig {
    #[serde(default = "default_cancellation_rate")]
    pub cancellation_rate: f64,
    #[serde(default = "default_refund_fraction")]
    pub refund_fraction: f64,
    #[serde(default = "default_feedback_response_rate")]
    pub feedback_response_rate: f64,
    #[serde(default = "default_average_rating")]
    pub average_rating: f64,
    #[serde(default = "default_satisfaction_rate")]
    pub satisfaction_rate: f64,
    /// Ticket price used for route revenue when the snapshot has none
    #[serde(default = "default_fallback_ticket_price")]
    pub fallback_ticket_price: f64,
    /// Share of feedback per rating bucket, five stars first
    #[serde(default = "default_rating_shares")]
    pub rating_shares: [f64; 5],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OccupancyConfig {
    #[serde(default = "default_occupancy_min")]
    pub min_percent: f64,
    #[serde(default = "default_occupancy_max")]
    pub max_percent: f64,
    /// Pins the occupancy RNG; unset means a fresh entropy seed per render
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_organisation")]
    pub organisation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecurityConfig {
    /// Let the document renderer fall back to reversible base64 encoding of
    /// contact fields when no encryption primitive is configured
    #[serde(default = "default_allow_document_fallback")]
    pub allow_document_fallback: bool,
}

// Default value functions
fn default_cancellation_rate() -> f64 { 0.082 }
fn default_refund_fraction() -> f64 { 0.06 }
fn default_feedback_response_rate() -> f64 { 0.35 }
fn default_average_rating() -> f64 { 4.2 }
fn default_satisfaction_rate() -> f64 { 0.87 }
fn default_fallback_ticket_price() -> f64 { 250.0 }
fn default_rating_shares() -> [f64; 5] { [0.45, 0.30, 0.15, 0.07, 0.03] }
fn default_occupancy_min() -> f64 { 65.0 }
fn default_occupancy_max() -> f64 { 95.0 }
fn default_date_format() -> String { "%m/%d/%Y".to_string() }
fn default_organisation() -> String { "SkyWay Airlines".to_string() }
fn default_allow_document_fallback() -> bool { true }

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            cancellation_rate: default_cancellation_rate(),
            refund_fraction: default_refund_fraction(),
            feedback_response_rate: default_feedback_response_rate(),
            average_rating: default_average_rating(),
            satisfaction_rate: default_satisfaction_rate(),
            fallback_ticket_price: default_fallback_ticket_price(),
            rating_shares: default_rating_shares(),
        }
    }
}

impl Default for OccupancyConfig {
    fn default() -> Self {
        Self {
            min_percent: default_occupancy_min(),
            max_percent: default_occupancy_max(),
            seed: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            organisation: default_organisation(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allow_document_fallback: default_allow_document_fallback(),
        }
    }
}

impl EngineConfig {
    /// Reject settings the builder and renderers cannot work with
    pub fn validate(&self) -> Result<(), ReportError> {
        let unit = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ReportError::Configuration(format!(
                    "{} must be within 0..=1, got {}",
                    name, value
                )))
            }
        };

        unit("policy.cancellation_rate", self.policy.cancellation_rate)?;
        unit("policy.refund_fraction", self.policy.refund_fraction)?;
        unit("policy.feedback_response_rate", self.policy.feedback_response_rate)?;
        unit("policy.satisfaction_rate", self.policy.satisfaction_rate)?;
        for share in self.policy.rating_shares {
            unit("policy.rating_shares", share)?;
        }

        if !(0.0..=5.0).contains(&self.policy.average_rating) {
            return Err(ReportError::Configuration(format!(
                "policy.average_rating must be within 0..=5, got {}",
                self.policy.average_rating
            )));
        }

        if self.policy.fallback_ticket_price <= 0.0 {
            return Err(ReportError::Configuration(
                "policy.fallback_ticket_price must be positive".to_string(),
            ));
        }

        if self.occupancy.min_percent > self.occupancy.max_percent {
            return Err(ReportError::Configuration(format!(
                "occupancy range is empty: {} > {}",
                self.occupancy.min_percent, self.occupancy.max_percent
            )));
        }

        Ok(())
    }
}

pub fn default_config() -> EngineConfig {
    EngineConfig::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ReportError> {
    let contents = std::fs::read_to_string(path)?;
    let config: EngineConfig = toml::from_str(&contents)
        .map_err(|e| ReportError::Configuration(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &EngineConfig) -> Result<(), ReportError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| ReportError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
