// Path: crates/state/src/primitives/mod.rs
//! Commitment primitives over store contents.

pub mod hash;
