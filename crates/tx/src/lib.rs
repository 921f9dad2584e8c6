// Path: crates/tx/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]
//! # Strata Tx
//!
//! The transaction registry and the stateless halves of the standard
//! layers: signature production and verification, and the anti-replay
//! sequence bookkeeping the nonce middleware persists.

pub mod registry;
pub mod system;

pub use registry::{Registration, RegistryError, TxPayload, TxRegistry};
pub use system::validation::SignatureLayer;
