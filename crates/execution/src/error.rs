// Path: crates/execution/src/error.rs
//! Errors raised while assembling a stack or a dispatcher.

use strata_types::error::{ErrorCode, TxError};
use thiserror::Error;

/// Configuration errors detected before any transaction runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// A stack may carry at most one IBC-capable middleware.
    #[error("Stack already has IBC-capable middleware '{first}', cannot add '{second}'")]
    MultipleIbcMiddlewares {
        /// The IBC-capable middleware declared first.
        first: String,
        /// The rejected one.
        second: String,
    },
    /// A component name is unusable as a store namespace.
    #[error("Invalid component name {0:?}")]
    InvalidName(String),
    /// Two module handlers claim the same name.
    #[error("Module '{0}' is already registered")]
    DuplicateModule(String),
    /// A module would share its namespace with a middleware layer, or
    /// claims the reserved base namespace.
    #[error("Namespace '{0}' is already claimed")]
    NamespaceCollision(String),
}

impl ErrorCode for ExecutionError {
    fn code(&self) -> &'static str {
        match self {
            Self::MultipleIbcMiddlewares { .. } => "EXEC_MULTIPLE_IBC",
            Self::InvalidName(_) => "EXEC_INVALID_NAME",
            Self::DuplicateModule(_) => "EXEC_DUPLICATE_MODULE",
            Self::NamespaceCollision(_) => "EXEC_NAMESPACE_COLLISION",
        }
    }
}

impl From<ExecutionError> for TxError {
    fn from(e: ExecutionError) -> Self {
        TxError::Internal(e.to_string())
    }
}

/// Rejects names that cannot serve as a namespace.
pub(crate) fn check_name(name: &str) -> Result<(), ExecutionError> {
    if name == strata_types::keys::BASE_NAMESPACE {
        return Err(ExecutionError::NamespaceCollision(name.to_string()));
    }
    if name.is_empty() || name.as_bytes().contains(&strata_types::keys::NAMESPACE_SEPARATOR) {
        return Err(ExecutionError::InvalidName(name.to_string()));
    }
    Ok(())
}
