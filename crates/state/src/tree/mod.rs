// Path: crates/state/src/tree/mod.rs
//! Store implementations.

pub mod memory;
