// Path: crates/crypto/src/sign/eddsa/mod.rs
//! Ed25519 signatures.
//!
//! Signing is deterministic: the same key and message always produce the
//! same signature bytes.

use crate::algorithms::hash::address_from_key_material;
use crate::error::CryptoError;
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

/// Ed25519 key pair
#[derive(Clone)]
pub struct Ed25519KeyPair {
    secret_key: SigningKey,
}

/// Ed25519 public key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519PublicKey(VerifyingKey);

/// Ed25519 signature
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ed25519Signature(ed25519_dalek::Signature);

impl Ed25519KeyPair {
    /// Generate a new key pair from the operating system's RNG.
    pub fn generate() -> Self {
        Self {
            secret_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            secret_key: SigningKey::from_bytes(seed),
        }
    }

    /// Create from a seed given as a byte slice.
    pub fn from_seed_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let seed: [u8; 32] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey("Invalid private key length: expected 32 bytes".to_string())
        })?;
        Ok(Self::from_seed(&seed))
    }

    /// The 32-byte seed.
    pub fn seed(&self) -> [u8; 32] {
        self.secret_key.to_bytes()
    }

    /// The public half of the pair.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.secret_key.verifying_key())
    }

    /// Signs `message`.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.secret_key.sign(message))
    }
}

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl Ed25519PublicKey {
    /// Parses raw public key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let raw: [u8; 32] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey(format!(
                "Invalid public key length: expected 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        VerifyingKey::from_bytes(&raw)
            .map(Ed25519PublicKey)
            .map_err(|e| CryptoError::InvalidKey(format!("Failed to parse public key: {}", e)))
    }

    /// Raw public key bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }

    /// The 20-byte address derived from this key.
    pub fn address(&self) -> Vec<u8> {
        address_from_key_material(self.0.as_bytes())
    }

    /// Verifies `signature` over `message`.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CryptoError> {
        self.0.verify(message, &signature.0).map_err(CryptoError::from)
    }
}

impl Ed25519Signature {
    /// Parses raw signature bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        ed25519_dalek::Signature::from_slice(bytes)
            .map(Ed25519Signature)
            .map_err(|e| CryptoError::InvalidSignature(format!("Failed to parse signature: {}", e)))
    }

    /// Raw signature bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests;
