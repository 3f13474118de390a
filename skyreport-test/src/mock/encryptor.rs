//! Deterministic encryption primitives

use skyreport_engine::{EncryptionError, Encryptor};

/// Reproducible stand-in: `enc:` + hex of the reversed bytes. Never equals
/// the plaintext.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockEncryptor;

impl MockEncryptor {
    pub fn expected(plaintext: &str) -> String {
        let reversed: Vec<u8> = plaintext.bytes().rev().collect();
        format!("enc:{}", hex::encode(reversed))
    }
}

impl Encryptor for MockEncryptor {
    fn encrypt(&self, plaintext: &str) -> Result<String, EncryptionError> {
        Ok(Self::expected(plaintext))
    }
}

/// Always fails, as a primitive without its key would
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingEncryptor;

impl Encryptor for FailingEncryptor {
    fn encrypt(&self, _plaintext: &str) -> Result<String, EncryptionError> {
        Err(EncryptionError("key material unavailable".to_string()))
    }
}
