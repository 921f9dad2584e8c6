// Path: crates/state/src/lib.rs
//! # Strata State Crate Lints
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
//! # Strata State
//!
//! A storage backend for the transaction stack: an ordered in-memory store
//! with a working generation and a committed generation, sealed by a SHA-256
//! state root.

pub mod primitives;
pub mod tree;

/// A prelude for easily importing the most common types.
pub mod prelude {
    pub use crate::primitives::hash::state_root;
    pub use crate::tree::memory::MemoryStore;
}
