// Path: crates/api/src/state/mod.rs
//! Core traits for state management.
//!
//! This module defines the interfaces every layer of the stack uses to reach
//! the key-value store:
//! - `KvStore`: basic key-value operations on absolute keys.
//! - `StateOverlay`: a copy-on-write cache over a read-only store.
//! - `ScopedStore`: a namespaced, checkpointable view handed to middlewares
//!   and module handlers.
//! - `CommitStore`: a store that can seal its pending writes into a root hash.

mod accessor;
mod manager;
mod overlay;
mod scoped;

pub use accessor::*;
pub use manager::*;
pub use overlay::*;
pub use scoped::{ScopedStore, StoreMode};
