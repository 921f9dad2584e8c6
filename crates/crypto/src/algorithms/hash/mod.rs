// Path: crates/crypto/src/algorithms/hash/mod.rs
//! Cryptographic hash functions.

use sha2::{Digest, Sha256};

/// Length in bytes of an address derived from a public key.
pub const ADDRESS_LEN: usize = 20;

/// Computes the SHA-256 digest of `message`.
pub fn sha256(message: impl AsRef<[u8]>) -> [u8; 32] {
    Sha256::digest(message.as_ref()).into()
}

/// Computes the SHA-256 digest over the concatenation of `parts`.
pub fn sha256_concat<I, T>(parts: I) -> [u8; 32]
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_ref());
    }
    hasher.finalize().into()
}

/// Derives the 20-byte address of a public key: the leading bytes of its SHA-256 digest.
pub fn address_from_key_material(public_key: &[u8]) -> Vec<u8> {
    let digest = sha256(public_key);
    digest.iter().take(ADDRESS_LEN).copied().collect()
}
