// Path: crates/api/src/transaction/mod.rs
//! The execution context and the handler / middleware protocol.

pub mod context;
pub mod handler;
