// Path: crates/crypto/src/lib.rs
//! # Strata Crypto Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! # Strata Cryptography
//!
//! Ed25519 signing keys and SHA-256 hashing used by the signature and
//! anti-replay layers of the transaction stack.

pub mod algorithms;
pub mod error;
pub mod sign;

pub use error::CryptoError;
