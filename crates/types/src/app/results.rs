// Path: crates/types/src/app/results.rs
//! Success values returned by the check and deliver phases.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A change to the consensus validator set requested by a delivered transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct ValidatorUpdate {
    /// The validator's consensus public key.
    #[serde(with = "hex::serde")]
    pub pub_key: Vec<u8>,
    /// The new voting power; zero removes the validator.
    pub power: u64,
}

/// The outcome of a successful `check_tx`. The zero value is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResult {
    /// Human-readable log line.
    pub log: String,
    /// Opaque result bytes.
    pub data: Vec<u8>,
    /// Gas the transaction expects to consume.
    pub gas_allocated: u64,
    /// Gas the transaction pays for (the mempool's priority signal).
    pub gas_payment: u64,
}

impl CheckResult {
    /// Creates a result carrying `data` and `log`.
    pub fn new(data: Vec<u8>, log: impl Into<String>) -> Self {
        Self {
            log: log.into(),
            data,
            ..Default::default()
        }
    }

    /// Sets the gas figures.
    pub fn with_gas(mut self, allocated: u64, payment: u64) -> Self {
        self.gas_allocated = allocated;
        self.gas_payment = payment;
        self
    }
}

/// The outcome of a successful `deliver_tx`. The zero value is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliverResult {
    /// Human-readable log line.
    pub log: String,
    /// Opaque result bytes.
    pub data: Vec<u8>,
    /// Validator set changes to report at the end of the block.
    pub diff: Vec<ValidatorUpdate>,
}

impl DeliverResult {
    /// Creates a result carrying `data` and `log`.
    pub fn new(data: Vec<u8>, log: impl Into<String>) -> Self {
        Self {
            log: log.into(),
            data,
            diff: Vec::new(),
        }
    }
}
