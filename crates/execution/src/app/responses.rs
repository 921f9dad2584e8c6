// Path: crates/execution/src/app/responses.rs
//! Values returned to the consensus engine.

use strata_api::state::RootHash;
use strata_types::app::{CheckResult, DeliverResult};
use strata_types::error::TxError;

/// The result code of a successful call.
pub const CODE_OK: u32 = 0;

fn failure(e: &TxError) -> (u32, String) {
    (e.kind().abci_code(), e.to_string())
}

/// The answer to a `check_tx` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResponse {
    /// Zero on success, otherwise the error kind's code.
    pub code: u32,
    /// Opaque result bytes.
    pub data: Vec<u8>,
    /// The success log or the error message.
    pub log: String,
    /// Gas the transaction expects to consume.
    pub gas_allocated: u64,
    /// Gas the transaction pays for.
    pub gas_payment: u64,
}

impl CheckResponse {
    /// True if the transaction was accepted.
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

impl From<Result<CheckResult, TxError>> for CheckResponse {
    fn from(res: Result<CheckResult, TxError>) -> Self {
        match res {
            Ok(r) => Self {
                code: CODE_OK,
                data: r.data,
                log: r.log,
                gas_allocated: r.gas_allocated,
                gas_payment: r.gas_payment,
            },
            Err(e) => {
                let (code, log) = failure(&e);
                Self {
                    code,
                    log,
                    ..Default::default()
                }
            }
        }
    }
}

/// The answer to a `deliver_tx` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliverResponse {
    /// Zero on success, otherwise the error kind's code.
    pub code: u32,
    /// Opaque result bytes.
    pub data: Vec<u8>,
    /// The success log or the error message.
    pub log: String,
}

impl DeliverResponse {
    /// True if the transaction was applied.
    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }
}

impl From<Result<DeliverResult, TxError>> for DeliverResponse {
    fn from(res: Result<DeliverResult, TxError>) -> Self {
        match res {
            Ok(r) => Self {
                code: CODE_OK,
                data: r.data,
                log: r.log,
            },
            Err(e) => {
                let (code, log) = failure(&e);
                Self {
                    code,
                    log,
                    data: Vec::new(),
                }
            }
        }
    }
}

/// The answer to `init_chain`: one log line per genesis option applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitChainResponse {
    /// The chain id in effect after genesis.
    pub chain_id: String,
    /// Logs returned by the modules, in option order.
    pub logs: Vec<String>,
}

/// The answer to `commit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitResponse {
    /// The root hash of the newly committed state.
    pub app_hash: RootHash,
    /// The height just committed.
    pub height: u64,
}

/// The answer to `info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoResponse {
    /// The chain id, empty before genesis.
    pub chain_id: String,
    /// The last committed height.
    pub last_height: u64,
    /// The root hash of the last committed state.
    pub last_app_hash: RootHash,
}

/// The answer to `query`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    /// The height the value was read at.
    pub height: u64,
    /// The absolute key queried.
    pub key: Vec<u8>,
    /// The committed value, if any.
    pub value: Option<Vec<u8>>,
}
