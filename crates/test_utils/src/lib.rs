// Path: crates/test_utils/src/lib.rs
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

//! # Strata Test Utilities
//!
//! Utilities for testing the Strata transaction stack components: assertion
//! macros, deterministic keys, layered transaction builders and scripted
//! module handlers.

pub mod assertions;
pub mod fixtures;
pub mod handlers;
