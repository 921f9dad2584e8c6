// Path: crates/execution/src/middleware/chain.rs

//! Binds transactions to the executing chain and enforces expiry.

use strata_api::state::ScopedStore;
use strata_api::transaction::context::Context;
use strata_api::transaction::handler::{Handler, Middleware};
use strata_types::app::{ChainTx, CheckResult, DeliverResult, Tx};
use strata_types::config::is_valid_chain_id;
use strata_types::error::TxError;

/// Requires the outermost layer it sees to be a [`Tx::Chain`] naming this
/// chain, and rejects it from its expiry height onwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chain;

impl Chain {
    /// The name this middleware claims.
    pub const NAME: &'static str = "chain";
}

fn unwrap_chain<'t>(ctx: &Context, tx: &'t Tx) -> Result<&'t Tx, TxError> {
    let Tx::Chain(ChainTx {
        chain_id,
        expires_at,
        inner,
    }) = tx
    else {
        return Err(TxError::WrongChain {
            expected: ctx.chain_id().to_string(),
            got: String::new(),
        });
    };
    if chain_id != ctx.chain_id() {
        return Err(TxError::WrongChain {
            expected: ctx.chain_id().to_string(),
            got: chain_id.clone(),
        });
    }
    if !is_valid_chain_id(chain_id) {
        return Err(TxError::InvalidFormat(format!(
            "invalid chain id '{}'",
            chain_id
        )));
    }
    let height = ctx.block_height();
    if *expires_at != 0 && *expires_at <= height {
        return Err(TxError::Expired {
            expires_at: *expires_at,
            height,
        });
    }
    Ok(inner.as_ref())
}

impl Middleware for Chain {
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
        let inner = unwrap_chain(ctx, tx)?;
        next.check_tx(ctx, store, inner)
    }

    fn deliver_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TxError> {
        let inner = unwrap_chain(ctx, tx)?;
        next.deliver_tx(ctx, store, inner)
    }
}
