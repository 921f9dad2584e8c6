// Path: crates/api/src/lib.rs

//! # Strata API Crate Lints
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
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
#![deny(missing_docs)]
//! # Strata API
//!
//! Core traits and interfaces for the Strata transaction stack. This crate
//! defines the stable contract between the application driver, the
//! middleware stack and the module handlers: the key-value store
//! abstractions every layer reads and writes through, the per-invocation
//! [`Context`](transaction::context::Context), and the
//! [`Handler`](transaction::handler::Handler) /
//! [`Middleware`](transaction::handler::Middleware) protocol.

/// Re-exports the error types shared with `strata-types`.
pub mod error;
/// Key-value store traits, the scoped transactional view and the copy-on-write overlay.
pub mod state;
/// The execution context and the handler / middleware protocol.
pub mod transaction;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::error::{ErrorCode, ErrorKind, StateError, TxError};
    pub use crate::state::{CommitStore, KvStore, RootHash, ScopedStore, StateOverlay, StoreMode};
    pub use crate::transaction::context::Context;
    pub use crate::transaction::handler::{Handler, Middleware};
}
