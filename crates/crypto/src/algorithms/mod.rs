// Path: crates/crypto/src/algorithms/mod.rs

pub mod hash;
