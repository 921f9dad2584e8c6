// Path: crates/execution/src/lib.rs
//! # Strata Execution Crate Lints
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
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]
//! # Strata Execution
//!
//! This crate turns the consensus engine's calls into stack invocations.
//! It provides the [`StackBuilder`] that composes middlewares around a
//! terminal handler, the [`Dispatcher`] that routes payloads to module
//! handlers, the standard middlewares, and the [`App`] driver that owns the
//! deliver state and the check cache.

pub mod app;
pub mod dispatcher;
pub mod error;
pub mod middleware;
pub mod stack;

pub use crate::app::App;
pub use crate::dispatcher::Dispatcher;
pub use crate::error::ExecutionError;
pub use crate::stack::{MiddlewareClass, Stack, StackBuilder};
