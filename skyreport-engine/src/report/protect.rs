//! Customer contact protection
//!
//! Email and phone values reach output only through [`ContactProtector::protect`].
//! The primary path calls an injected [`Encryptor`]; the reversible base64
//! path exists for the document renderer alone and only when no primitive
//! is configured.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use skyreport_core::{ReportError, ReportResult};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Encryption failed: {0}")]
pub struct EncryptionError(pub String);

/// Field-level encryption primitive. Deterministic per call, opaque to the engine.
pub trait Encryptor: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError>;
}

/// Which transform produced the protected contact fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncryptionPath {
    Primary,
    /// Base64 encoding. Reversible by anyone, not encryption.
    ReversibleFallback,
}

impl fmt::Display for EncryptionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptionPath::Primary => write!(f, "primary encryption"),
            EncryptionPath::ReversibleFallback => write!(f, "reversible base64 fallback"),
        }
    }
}

/// Whether a renderer may degrade to the reversible path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    PrimaryOnly,
    AllowReversible,
}

/// Reversible base64 transform used by the document fallback path
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Fallback;

impl Encryptor for Base64Fallback {
    fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
        Ok(STANDARD.encode(plaintext.as_bytes()))
    }
}

#[derive(Clone, Default)]
pub struct ContactProtector {
    primary: Option<Arc<dyn Encryptor>>,
}

impl fmt::Debug for ContactProtector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactProtector")
            .field("primary", &self.primary.is_some())
            .finish()
    }
}

impl ContactProtector {
    pub fn new(primary: Option<Arc<dyn Encryptor>>) -> Self {
        Self { primary }
    }

    /// Decide the path before any customer row is written
    pub fn select_path(&self, policy: FallbackPolicy) -> ReportResult<EncryptionPath> {
        match (&self.primary, policy) {
            (Some(_), _) => Ok(EncryptionPath::Primary),
            (None, FallbackPolicy::AllowReversible) => {
                warn!("No encryption primitive configured; contact fields use the reversible base64 fallback");
                Ok(EncryptionPath::ReversibleFallback)
            }
            (None, FallbackPolicy::PrimaryOnly) => Err(ReportError::render_failure(
                "customer data requires an encryption primitive",
            )),
        }
    }

    /// Protect one contact value. A failing primitive is a render failure:
    /// plaintext is never emitted in its place.
    pub fn protect(&self, path: EncryptionPath, value: &str) -> ReportResult<String> {
        let result = match path {
            EncryptionPath::Primary => match &self.primary {
                Some(encryptor) => encryptor.encrypt(value),
                None => {
                    return Err(ReportError::render_failure(
                        "primary encryption path selected without a primitive",
                    ))
                }
            },
            EncryptionPath::ReversibleFallback => Base64Fallback.encrypt(value),
        };
        result.map_err(|e| ReportError::render_failure(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Reverse;

    impl Encryptor for Reverse {
        fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
            Ok(plaintext.chars().rev().collect())
        }
    }

    struct Broken;

    impl Encryptor for Broken {
        fn encrypt(&self, _plaintext: &str) -> Result<String, EncryptionError> {
            Err(EncryptionError("key unavailable".to_string()))
        }
    }

    #[test]
    fn test_primary_path_uses_primitive() {
        let protector = ContactProtector::new(Some(Arc::new(Reverse)));
        let path = protector.select_path(FallbackPolicy::PrimaryOnly).unwrap();
        assert_eq!(path, EncryptionPath::Primary);
        assert_eq!(protector.protect(path, "a@b.com").unwrap(), "moc.b@a");
    }

    #[test]
    fn test_missing_primitive() {
        let protector = ContactProtector::default();
        assert!(matches!(
            protector.select_path(FallbackPolicy::PrimaryOnly),
            Err(ReportError::RenderFailure(_))
        ));

        let path = protector.select_path(FallbackPolicy::AllowReversible).unwrap();
        assert_eq!(path, EncryptionPath::ReversibleFallback);
        assert_eq!(protector.protect(path, "a@b.com").unwrap(), "YUBiLmNvbQ==");
    }

    #[test]
    fn test_failing_primitive_is_render_failure() {
        let protector = ContactProtector::new(Some(Arc::new(Broken)));
        let path = protector.select_path(FallbackPolicy::AllowReversible).unwrap();
        match protector.protect(path, "a@b.com") {
            Err(ReportError::RenderFailure(msg)) => assert!(msg.contains("key unavailable")),
            other => panic!("Expected RenderFailure, got {:?}", other),
        }
    }
}
