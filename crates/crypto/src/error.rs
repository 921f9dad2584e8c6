// Path: crates/crypto/src/error.rs
//! Local error types for the `strata-crypto` crate.

use thiserror::Error;

/// Errors raised by key parsing and signature verification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// A key could not be parsed.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    /// A signature could not be parsed or did not verify.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
}

impl From<ed25519_dalek::SignatureError> for CryptoError {
    fn from(e: ed25519_dalek::SignatureError) -> Self {
        CryptoError::InvalidSignature(e.to_string())
    }
}
