//! Mock implementations for testing
//!
//! Stand-ins for the engine's external collaborators: the metrics source
//! and the field encryption primitive.

mod encryptor;
mod provider;

pub use encryptor::{FailingEncryptor, MockEncryptor};
pub use provider::StaticMetricsProvider;
