// Path: crates/types/src/app/mod.rs
//! Core application-level data structures.

/// The principal identifier used for authorization.
pub mod actor;
/// Fungible token amounts.
pub mod coin;
/// Results returned by the check and deliver phases.
pub mod results;
/// The tagged transaction envelope and its layered wrappers.
pub mod tx;

pub use actor::Actor;
pub use coin::Coin;
pub use results::{CheckResult, DeliverResult, ValidatorUpdate};
pub use tx::{
    tags, ChainTx, CustomTx, FeeTx, MultiSigTx, NonceTx, OneSigTx, SendTx, Signed, Tx,
    MAX_TX_DEPTH,
};
