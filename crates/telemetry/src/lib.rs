// Path: crates/telemetry/src/lib.rs
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

//! # Strata Telemetry
//!
//! This crate provides the observability infrastructure for the transaction
//! stack: structured logging initialization and an abstract sink that
//! decouples per-transaction metric instrumentation from any backend.

/// The initialization routine for global structured logging.
pub mod init;
/// Abstract traits (`*MetricsSink`) that define the contract for metrics reporting.
pub mod sinks;
/// A simple RAII timer for measuring the duration of a scope.
pub mod time;

pub use sinks::tx_metrics;
