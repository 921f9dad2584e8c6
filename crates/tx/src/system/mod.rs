// Path: crates/tx/src/system/mod.rs
//! Core, non-optional system logic shared by the standard middlewares.

pub mod nonce;
pub mod validation;
