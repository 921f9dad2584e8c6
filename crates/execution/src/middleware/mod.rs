// Path: crates/execution/src/middleware/mod.rs

//! The standard middlewares.
//!
//! Each claims a fixed name, which is also its store namespace and, for
//! the signature layer, the module of the actors it may grant.

pub mod chain;
pub mod checkpoint;
pub mod fee;
pub mod logger;
pub mod nonce;
pub mod recovery;
pub mod signatures;

pub use chain::Chain;
pub use checkpoint::Checkpoint;
pub use fee::Fee;
pub use logger::Logger;
pub use nonce::Nonce;
pub use recovery::Recovery;
pub use signatures::Signatures;
