// Path: crates/execution/src/app/mod.rs

//! The application driver.
//!
//! [`App`] turns the consensus engine's calls into stack invocations. It
//! owns two logical stores: the *deliver state*, the working generation of
//! a [`CommitStore`], and the *check cache*, a write set layered over the
//! last committed generation. Check-time writes live only in the cache,
//! which `commit` throws away.

mod responses;

pub use responses::{
    CheckResponse, CommitResponse, DeliverResponse, InfoResponse, InitChainResponse,
    QueryResponse, CODE_OK,
};

use crate::dispatcher::Dispatcher;
use crate::error::ExecutionError;
use crate::middleware::{Chain, Checkpoint, Fee, Logger, Nonce, Recovery, Signatures};
use crate::stack::{Stack, StackBuilder};
use std::sync::Arc;
use strata_api::state::{CommitStore, KvStore, ScopedStore, StateOverlay, WriteSet};
use strata_api::transaction::context::Context;
use strata_api::transaction::handler::Handler;
use strata_tx::TxRegistry;
use strata_types::app::{Tx, ValidatorUpdate};
use strata_types::codec::{from_bytes_canonical, to_bytes_canonical};
use strata_types::config::{is_valid_chain_id, AppConfig};
use strata_types::error::TxError;
use strata_types::keys::{namespaced_key, BASE_NAMESPACE, CHAIN_ID_KEY, CHAIN_ID_OPTION, HEIGHT_KEY};
use tracing::Span;

/// Composes the standard middleware order around `dispatcher`:
/// recovery, logger, signatures, chain, checkpoint, nonce, fee.
///
/// Savepoints sit inside the chain check and outside the nonce bump, so a
/// transaction failing below leaves neither its sequence nor its fee behind.
pub fn standard_stack(config: &AppConfig, dispatcher: Dispatcher) -> Result<Stack, ExecutionError> {
    StackBuilder::new()
        .middleware(Recovery)
        .middleware(Logger)
        .middleware(Signatures::new(config.max_signatures))
        .middleware(Chain)
        .middleware(Checkpoint::from(config.checkpoint))
        .middleware(Nonce)
        .middleware(Fee::from(config.fee.clone()))
        .build(dispatcher)
}

/// Drives a [`Stack`] over a [`CommitStore`].
pub struct App<S: CommitStore> {
    stack: Stack,
    registry: Arc<TxRegistry>,
    store: S,
    check_writes: WriteSet,
    chain_id: String,
    /// The height announced by `begin_block`; zero outside a block.
    height: u64,
    last_height: u64,
    /// False until the genesis generation has been committed.
    initialized: bool,
    pending_diff: Vec<ValidatorUpdate>,
    logger: Span,
}

impl<S: CommitStore> std::fmt::Debug for App<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("stack", &self.stack)
            .field("chain_id", &self.chain_id)
            .field("height", &self.height)
            .field("last_height", &self.last_height)
            .field("check_cache", &self.check_writes.len())
            .finish()
    }
}

fn chain_id_key() -> Vec<u8> {
    namespaced_key(BASE_NAMESPACE, CHAIN_ID_KEY)
}

fn height_key() -> Vec<u8> {
    namespaced_key(BASE_NAMESPACE, HEIGHT_KEY)
}

impl<S: CommitStore> App<S> {
    /// Creates a driver. If `config` names no chain id, the one persisted at
    /// genesis is loaded from the committed state. The last committed height
    /// is always loaded from it.
    pub fn new(
        stack: Stack,
        registry: Arc<TxRegistry>,
        store: S,
        config: &AppConfig,
    ) -> Result<Self, TxError> {
        config.validate()?;
        let chain_id = if config.chain_id.is_empty() {
            match store.committed().get(&chain_id_key())? {
                Some(bytes) => from_bytes_canonical::<String>(&bytes)?,
                None => String::new(),
            }
        } else {
            config.chain_id.clone()
        };
        let persisted = match store.committed().get(&height_key())? {
            Some(bytes) => Some(from_bytes_canonical::<u64>(&bytes)?),
            None => None,
        };
        let last_height = persisted.unwrap_or(0);
        let logger = tracing::info_span!("app", chain_id = %chain_id);
        tracing::info!(
            target: "app",
            parent: &logger,
            last_height,
            stack = ?stack.layer_names(),
            "application driver ready"
        );
        Ok(Self {
            stack,
            registry,
            store,
            check_writes: WriteSet::new(),
            chain_id,
            height: 0,
            last_height,
            initialized: persisted.is_some(),
            pending_diff: Vec::new(),
            logger,
        })
    }

    /// The chain id in effect.
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// The last committed height.
    pub fn last_height(&self) -> u64 {
        self.last_height
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The height of the next generation: genesis is 0, then each commit
    /// advances by one.
    fn next_height(&self) -> u64 {
        if self.initialized {
            self.last_height.saturating_add(1)
        } else {
            0
        }
    }

    fn deliver_height(&self) -> u64 {
        if self.height == 0 {
            self.next_height()
        } else {
            self.last_height.max(self.height)
        }
    }

    fn parse(&self, bytes: &[u8]) -> Result<Tx, TxError> {
        let tx = self.registry.decode(bytes)?;
        self.registry.validate_basic(&tx)?;
        Ok(tx)
    }

    /// Validates a transaction for the mempool against the committed state
    /// plus the writes of earlier checks since the last commit.
    pub fn check_tx(&mut self, bytes: &[u8]) -> CheckResponse {
        let res = self.parse(bytes).and_then(|tx| {
            let ctx = Context::new(
                self.chain_id.clone(),
                self.next_height(),
                tracing::debug_span!(parent: &self.logger, "check_tx"),
            );
            let mut overlay = StateOverlay::with_writes(
                self.store.committed(),
                std::mem::take(&mut self.check_writes),
            );
            let res = {
                let mut root = ScopedStore::new(&mut overlay);
                self.stack.check_tx(&ctx, &mut root, &tx)
            };
            self.check_writes = overlay.into_writes();
            res
        });
        res.into()
    }

    /// Applies a transaction to the deliver state.
    pub fn deliver_tx(&mut self, bytes: &[u8]) -> DeliverResponse {
        let res = self.parse(bytes).and_then(|tx| {
            let ctx = Context::new(
                self.chain_id.clone(),
                self.deliver_height(),
                tracing::debug_span!(parent: &self.logger, "deliver_tx"),
            );
            let mut root = ScopedStore::new(&mut self.store);
            self.stack.deliver_tx(&ctx, &mut root, &tx)
        });
        let res = res.map(|mut r| {
            self.pending_diff.append(&mut r.diff);
            r
        });
        res.into()
    }

    /// Applies genesis: every `(path, value)` option, then the initial
    /// validator set.
    ///
    /// `base/chain_id` sets and persists the chain id. Every other path
    /// must read `<module>/<key>` and is routed to the stack's
    /// `init_state`. Genesis is all or nothing: if any option fails, no
    /// option's writes reach the deliver state.
    pub fn init_chain(
        &mut self,
        validators: &[ValidatorUpdate],
        options: &[(String, String)],
    ) -> Result<InitChainResponse, TxError> {
        let mut logs = Vec::with_capacity(options.len());
        let mut chain_id = self.chain_id.clone();
        {
            let mut root = ScopedStore::new(&mut self.store);
            let mut genesis = root.checkpoint();
            for (path, value) in options {
                if path == CHAIN_ID_OPTION {
                    if !is_valid_chain_id(value) {
                        return Err(TxError::InvalidFormat(format!(
                            "invalid chain id '{}'",
                            value
                        )));
                    }
                    genesis.set(&chain_id_key(), &to_bytes_canonical(value))?;
                    chain_id = value.clone();
                    logs.push(format!("chain id set to {}", value));
                    continue;
                }
                let (module, key) = path.split_once('/').ok_or_else(|| {
                    TxError::InvalidFormat(format!(
                        "genesis option '{}' is not <module>/<key>",
                        path
                    ))
                })?;
                let log = self
                    .stack
                    .init_state(&self.logger, &mut genesis, module, key, value)?;
                logs.push(log);
            }
            self.stack.init_validate(&self.logger, &mut genesis, validators);
            genesis.commit()?;
        }
        self.chain_id = chain_id;
        tracing::info!(
            target: "app",
            parent: &self.logger,
            chain_id = %self.chain_id,
            options = options.len(),
            validators = validators.len(),
            "genesis applied"
        );
        Ok(InitChainResponse {
            chain_id: self.chain_id.clone(),
            logs,
        })
    }

    /// Opens block `height`.
    pub fn begin_block(&mut self, height: u64) {
        tracing::debug!(target: "app", parent: &self.logger, height, "begin block");
        self.height = height;
        self.pending_diff.clear();
    }

    /// Closes the block and returns the validator changes its transactions requested.
    pub fn end_block(&mut self) -> Vec<ValidatorUpdate> {
        let diff = std::mem::take(&mut self.pending_diff);
        tracing::debug!(
            target: "app",
            parent: &self.logger,
            height = self.height,
            validator_updates = diff.len(),
            "end block"
        );
        diff
    }

    /// Persists the deliver state, resets the check cache and returns the
    /// new root hash.
    ///
    /// The committed height is the one opened by `begin_block`. Without one,
    /// the first commit is genesis at height 0 and later ones advance by one.
    /// The height is persisted with the state, so a restarted driver resumes
    /// from it.
    pub fn commit(&mut self) -> Result<CommitResponse, TxError> {
        let height = self.deliver_height();
        self.store.insert(&height_key(), &to_bytes_canonical(&height))?;
        let app_hash = self.store.commit()?;
        self.last_height = height;
        self.initialized = true;
        self.height = 0;
        self.check_writes.clear();
        tracing::info!(
            target: "app",
            parent: &self.logger,
            event = "commit",
            height = self.last_height,
            app_hash = %hex::encode(app_hash)
        );
        Ok(CommitResponse {
            app_hash,
            height: self.last_height,
        })
    }

    /// The last committed height and root hash.
    pub fn info(&self) -> InfoResponse {
        InfoResponse {
            chain_id: self.chain_id.clone(),
            last_height: self.last_height,
            last_app_hash: self.store.root_hash(),
        }
    }

    /// Reads an absolute key from the last committed state.
    pub fn query(&self, key: &[u8]) -> Result<QueryResponse, TxError> {
        let value = self.store.committed().get(key)?;
        Ok(QueryResponse {
            height: self.last_height,
            key: key.to_vec(),
            value,
        })
    }
}
