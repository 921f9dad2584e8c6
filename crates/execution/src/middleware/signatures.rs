// Path: crates/execution/src/middleware/signatures.rs

//! Verifies the signature layer and grants its signers.

use strata_api::state::ScopedStore;
use strata_api::transaction::context::Context;
use strata_api::transaction::handler::{Handler, Middleware};
use strata_tx::system::validation::signature_layer;
use strata_types::app::{Actor, CheckResult, DeliverResult, Tx};
use strata_types::error::TxError;

/// Default upper bound on signatures per transaction.
pub const DEFAULT_MAX_SIGNATURES: usize = 7;

/// Requires the outermost layer it sees to be a signature wrapper, checks
/// every signature against the wrapper's sign bytes, and calls `next` with
/// one `sigs` actor per signer added to the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signatures {
    /// Maximum number of signatures accepted.
    pub max_signatures: usize,
}

impl Default for Signatures {
    fn default() -> Self {
        Self {
            max_signatures: DEFAULT_MAX_SIGNATURES,
        }
    }
}

impl Signatures {
    /// The name this middleware claims and the module of the actors it grants.
    pub const NAME: &'static str = "sigs";

    /// A signature layer accepting at most `max_signatures`.
    pub fn new(max_signatures: usize) -> Self {
        Self { max_signatures }
    }

    /// The actor granted for a verified signer with `address`.
    pub fn actor(address: Vec<u8>) -> Actor {
        Actor::new(Self::NAME, address)
    }

    fn authenticate<'t>(&self, ctx: &Context, tx: &'t Tx) -> Result<(Context, &'t Tx), TxError> {
        let layer = signature_layer(tx).ok_or(TxError::MissingSignature)?;
        let count = layer.signature_count();
        if count > self.max_signatures {
            return Err(TxError::TooManySignatures {
                count,
                limit: self.max_signatures,
            });
        }
        let signers = layer.signers()?;
        let actors: Vec<Actor> = signers.iter().map(|pk| Self::actor(pk.address())).collect();
        tracing::trace!(target: "sigs", parent: ctx.logger(), signers = actors.len(), "signatures verified");
        let inner = tx.next().ok_or(TxError::MissingSignature)?;
        Ok((ctx.with_permissions(actors), inner))
    }
}

impl Middleware for Signatures {
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
        let (authed, inner) = self.authenticate(ctx, tx)?;
        next.check_tx(&authed, store, inner)
    }

    fn deliver_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TxError> {
        let (authed, inner) = self.authenticate(ctx, tx)?;
        next.deliver_tx(&authed, store, inner)
    }
}
