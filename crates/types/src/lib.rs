// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
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

//! # Strata Types
//!
//! This crate is the foundational library for the Strata transaction stack,
//! containing the core data structures, error types, and configuration objects.
//!
//! ## Architectural Role
//!
//! As the base crate, `strata-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. It provides a stable,
//! canonical definition for shared types like `Tx`, `Actor`, `Coin`, and the
//! `TxError` enum that every layer of the stack returns.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::TxError> = std::result::Result<T, E>;

/// Core application-level data structures: actors, coins, transactions and results.
pub mod app;
/// The canonical, deterministic binary codec for consensus-critical state.
pub mod codec;
/// Application configuration loaded from TOML and the environment.
pub mod config;
/// A unified set of all error types used across the stack.
pub mod error;
/// Constants for well-known state keys and namespace helpers.
pub mod keys;
