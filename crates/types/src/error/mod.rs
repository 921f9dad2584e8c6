// Path: crates/types/src/error/mod.rs
//! Core error types for the Strata transaction stack.

use crate::app::Coin;
use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors raised by key-value store backends and scoped views.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// An error occurred in the state backend.
    #[error("State backend error: {0}")]
    Backend(String),
    /// An error occurred while writing to the state.
    #[error("State write error: {0}")]
    WriteError(String),
    /// A stored value could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
    /// The operation was denied on a read-only view.
    #[error("Permission denied for state key: {0}")]
    PermissionDenied(String),
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::Backend(_) => "STATE_BACKEND_ERROR",
            Self::WriteError(_) => "STATE_WRITE_ERROR",
            Self::Decode(_) => "STATE_DECODE_ERROR",
            Self::PermissionDenied(_) => "STATE_PERMISSION_DENIED",
        }
    }
}

/// The category of a [`TxError`]. Each kind maps to one non-zero result code
/// reported to the consensus engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    /// The caller lacks a required permission.
    Unauthorized,
    /// The transaction type or target module is not known.
    UnknownTxType,
    /// A genesis option named a module the stack does not route to.
    UnknownModule,
    /// The transaction or a stored value is malformed.
    InvalidFormat,
    /// A balance cannot cover a debit.
    InsufficientFunds,
    /// The anti-replay sequence is not the expected one.
    BadNonce,
    /// The transaction is bound to another chain.
    WrongChain,
    /// The transaction's expiry height has passed.
    Expired,
    /// More signatures than allowed.
    TooManySignatures,
    /// A signature failed verification.
    InvalidSignature,
    /// A signature layer carries no signatures.
    MissingSignature,
    /// The fee is below the minimum.
    InsufficientFees,
    /// The fee is in the wrong denomination.
    WrongFeeDenom,
    /// An internal fault, including recovered panics.
    Internal,
}

impl ErrorKind {
    /// The numeric result code reported to the consensus engine. Zero is
    /// reserved for success and never returned here.
    pub fn abci_code(self) -> u32 {
        match self {
            Self::Internal => 1,
            Self::InvalidFormat => 2,
            Self::UnknownTxType => 3,
            Self::Unauthorized => 4,
            Self::InsufficientFunds => 5,
            Self::BadNonce => 6,
            Self::WrongChain => 7,
            Self::Expired => 8,
            Self::TooManySignatures => 9,
            Self::InvalidSignature => 10,
            Self::MissingSignature => 11,
            Self::InsufficientFees => 12,
            Self::WrongFeeDenom => 13,
            Self::UnknownModule => 14,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Errors returned by every layer of the transaction stack.
#[derive(Error, Debug)]
pub enum TxError {
    /// The caller lacks a required permission.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// The transaction type or target module is not known.
    #[error("Unknown transaction type: {0}")]
    UnknownTxType(String),
    /// A genesis option named a module the stack does not route to.
    #[error("Unknown module: {0}")]
    UnknownModule(String),
    /// The transaction or a stored value is malformed.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    /// A balance cannot cover a debit.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    /// The anti-replay sequence is not the expected one.
    #[error("Bad nonce. Expected: {expected}, Got: {got}")]
    BadNonce {
        /// The sequence presented by the transaction.
        got: u32,
        /// The stored sequence plus one.
        expected: u32,
    },
    /// The transaction is bound to another chain, or not bound at all.
    #[error("Wrong chain. Expected: '{expected}', Got: '{got}'")]
    WrongChain {
        /// The chain id of the executing context.
        expected: String,
        /// The chain id carried by the transaction; empty if the layer is absent.
        got: String,
    },
    /// The transaction's expiry height has passed.
    #[error("Transaction expired at height {expires_at} (current height {height})")]
    Expired {
        /// The expiry height carried by the transaction.
        expires_at: u64,
        /// The current block height.
        height: u64,
    },
    /// More signatures than allowed.
    #[error("Too many signatures: {count}, limit: {limit}")]
    TooManySignatures {
        /// Number of signatures present or attempted.
        count: usize,
        /// Maximum permitted.
        limit: usize,
    },
    /// A signature failed verification.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    /// A signature layer carries no signatures.
    #[error("Missing signature")]
    MissingSignature,
    /// The fee is below the minimum.
    #[error("Insufficient fees. Required: {required}, Got: {got}")]
    InsufficientFees {
        /// The configured minimum fee.
        required: Coin,
        /// The fee offered.
        got: Coin,
    },
    /// The fee is in the wrong denomination.
    #[error("Wrong fee denomination. Expected: {expected}, Got: {got}")]
    WrongFeeDenom {
        /// The configured fee denomination.
        expected: String,
        /// The denomination offered.
        got: String,
    },
    /// An internal fault, including recovered panics.
    #[error("Internal error: {0}")]
    Internal(String),
    /// An error originating from the state store.
    #[error("State error: {0}")]
    State(#[from] StateError),
    /// A canonical decode failed.
    #[error("Codec error: {0}")]
    Codec(#[from] parity_scale_codec::Error),
}

impl TxError {
    /// Collapses the variant onto its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::UnknownTxType(_) => ErrorKind::UnknownTxType,
            Self::UnknownModule(_) => ErrorKind::UnknownModule,
            Self::InvalidFormat(_) | Self::Codec(_) => ErrorKind::InvalidFormat,
            Self::InsufficientFunds(_) => ErrorKind::InsufficientFunds,
            Self::BadNonce { .. } => ErrorKind::BadNonce,
            Self::WrongChain { .. } => ErrorKind::WrongChain,
            Self::Expired { .. } => ErrorKind::Expired,
            Self::TooManySignatures { .. } => ErrorKind::TooManySignatures,
            Self::InvalidSignature(_) => ErrorKind::InvalidSignature,
            Self::MissingSignature => ErrorKind::MissingSignature,
            Self::InsufficientFees { .. } => ErrorKind::InsufficientFees,
            Self::WrongFeeDenom { .. } => ErrorKind::WrongFeeDenom,
            Self::Internal(_) | Self::State(_) => ErrorKind::Internal,
        }
    }

    /// The error raised when an actor required by a layer is not among the
    /// context's permissions.
    pub fn not_member(actor: &crate::app::Actor) -> Self {
        Self::Unauthorized(format!("{} is not a member of the signer set", actor))
    }
}

impl ErrorCode for TxError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "TX_UNAUTHORIZED",
            Self::UnknownTxType(_) => "TX_UNKNOWN_TYPE",
            Self::UnknownModule(_) => "TX_UNKNOWN_MODULE",
            Self::InvalidFormat(_) => "TX_INVALID_FORMAT",
            Self::InsufficientFunds(_) => "TX_INSUFFICIENT_FUNDS",
            Self::BadNonce { .. } => "TX_BAD_NONCE",
            Self::WrongChain { .. } => "TX_WRONG_CHAIN",
            Self::Expired { .. } => "TX_EXPIRED",
            Self::TooManySignatures { .. } => "TX_TOO_MANY_SIGNATURES",
            Self::InvalidSignature(_) => "TX_INVALID_SIGNATURE",
            Self::MissingSignature => "TX_MISSING_SIGNATURE",
            Self::InsufficientFees { .. } => "TX_INSUFFICIENT_FEES",
            Self::WrongFeeDenom { .. } => "TX_WRONG_FEE_DENOM",
            Self::Internal(_) => "TX_INTERNAL",
            Self::State(_) => "TX_STATE_ERROR",
            Self::Codec(_) => "TX_CODEC_ERROR",
        }
    }
}

impl From<serde_json::Error> for TxError {
    fn from(e: serde_json::Error) -> Self {
        TxError::InvalidFormat(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::error::Error as _;

    #[test]
    fn codes_are_unique_and_nonzero() {
        let kinds = [
            ErrorKind::Unauthorized,
            ErrorKind::UnknownTxType,
            ErrorKind::UnknownModule,
            ErrorKind::InvalidFormat,
            ErrorKind::InsufficientFunds,
            ErrorKind::BadNonce,
            ErrorKind::WrongChain,
            ErrorKind::Expired,
            ErrorKind::TooManySignatures,
            ErrorKind::InvalidSignature,
            ErrorKind::MissingSignature,
            ErrorKind::InsufficientFees,
            ErrorKind::WrongFeeDenom,
            ErrorKind::Internal,
        ];
        let codes: HashSet<u32> = kinds.iter().map(|k| k.abci_code()).collect();
        assert_eq!(codes.len(), kinds.len());
        assert!(!codes.contains(&0));
    }

    #[test]
    fn wrapped_errors_keep_their_cause() {
        let err: TxError = StateError::Backend("disk".into()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("disk"));
    }

    #[test]
    fn bad_nonce_message_names_both_sequences() {
        let err = TxError::BadNonce {
            got: 2,
            expected: 1,
        };
        assert_eq!(err.kind(), ErrorKind::BadNonce);
        assert_eq!(err.to_string(), "Bad nonce. Expected: 1, Got: 2");
    }
}
