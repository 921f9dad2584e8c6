// Path: crates/execution/src/middleware/checkpoint.rs

//! Savepoints around the rest of the stack.

use strata_api::state::ScopedStore;
use strata_api::transaction::context::Context;
use strata_api::transaction::handler::{Handler, Middleware};
use strata_types::app::{CheckResult, DeliverResult, Tx};
use strata_types::config::CheckpointConfig;
use strata_types::error::TxError;

/// Runs `next` against a checkpointed child of the store and commits the
/// child only if `next` succeeds, so a failed call leaves no trace.
///
/// Each phase can be switched off; a disabled phase passes straight through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    /// Wrap `check_tx`.
    pub on_check: bool,
    /// Wrap `deliver_tx`.
    pub on_deliver: bool,
}

impl Default for Checkpoint {
    fn default() -> Self {
        Self {
            on_check: true,
            on_deliver: true,
        }
    }
}

impl From<CheckpointConfig> for Checkpoint {
    fn from(cfg: CheckpointConfig) -> Self {
        Self {
            on_check: cfg.on_check,
            on_deliver: cfg.on_deliver,
        }
    }
}

impl Checkpoint {
    /// The name this middleware claims.
    pub const NAME: &'static str = "checkpoint";
}

fn savepoint<T>(
    enabled: bool,
    store: &mut ScopedStore<'_>,
    run: impl FnOnce(&mut ScopedStore<'_>) -> Result<T, TxError>,
) -> Result<T, TxError> {
    if !enabled {
        return run(store);
    }
    let mut child = store.checkpoint();
    match run(&mut child) {
        Ok(value) => {
            child.commit()?;
            Ok(value)
        }
        Err(e) => {
            tracing::debug!(target: "checkpoint", pending = child.pending(), "discarding savepoint");
            child.discard();
            Err(e)
        }
    }
}

impl Middleware for Checkpoint {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn check_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
        next: &dyn Handler,
    ) -> Result<CheckResult, TxError> {
        savepoint(self.on_check, store, |s| next.check_tx(ctx, s, tx))
    }

    fn deliver_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TxError> {
        savepoint(self.on_deliver, store, |s| next.deliver_tx(ctx, s, tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::testing::{ctx, store};
    use strata_api::state::KvStore;
    use strata_test_utils::fixtures::{keypair, send, sig_actor};
    use strata_test_utils::handlers::{FailingHandler, ProbeHandler, BEFORE_FAULT_KEY, DELIVERED_KEY};

    fn payload() -> Tx {
        send(&sig_actor(&keypair(1)), &sig_actor(&keypair(2)), 1)
    }

    #[test]
    fn failure_discards_writes_below() {
        let mut backing = store();
        {
            let mut root = ScopedStore::new(&mut backing);
            let err = Checkpoint::default()
                .deliver_tx(&ctx(1), &mut root, &payload(), &FailingHandler::new("coin"))
                .unwrap_err();
            assert!(matches!(err, TxError::Internal(_)));
        }
        assert_eq!(backing.get(BEFORE_FAULT_KEY).unwrap(), None);
    }

    #[test]
    fn success_commits_writes_below() {
        let mut backing = store();
        {
            let mut root = ScopedStore::new(&mut backing);
            Checkpoint::default()
                .deliver_tx(&ctx(1), &mut root, &payload(), &ProbeHandler::new("coin"))
                .unwrap();
        }
        assert!(backing.get(DELIVERED_KEY).unwrap().is_some());
    }

    #[test]
    fn disabled_phase_writes_through() {
        let cp = Checkpoint {
            on_check: false,
            on_deliver: true,
        };
        let mut backing = store();
        {
            let mut root = ScopedStore::new(&mut backing);
            cp.check_tx(&ctx(1), &mut root, &payload(), &FailingHandler::new("coin"))
                .unwrap_err();
        }
        assert_eq!(backing.get(BEFORE_FAULT_KEY).unwrap(), Some(b"1".to_vec()));
    }
}
