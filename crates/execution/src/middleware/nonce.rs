// Path: crates/execution/src/middleware/nonce.rs

//! Anti-replay: every signer set advances a strictly increasing sequence.

use strata_api::state::ScopedStore;
use strata_api::transaction::context::Context;
use strata_api::transaction::handler::{Handler, Middleware};
use strata_tx::system::nonce::{assert_next_sequence, bump_sequence};
use strata_types::app::{CheckResult, DeliverResult, NonceTx, Tx};
use strata_types::error::TxError;

/// Requires a [`Tx::Nonce`] layer whose sequence is exactly one past the
/// stored sequence of its signer set, and whose signers have all been
/// authenticated further out.
///
/// The sequence is bumped in both phases. Check-phase bumps only reach the
/// check cache, which lets a client queue several transactions per block.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nonce;

impl Nonce {
    /// The name this middleware claims.
    pub const NAME: &'static str = "nonce";
}

fn advance<'t>(ctx: &Context, store: &mut ScopedStore<'_>, tx: &'t Tx) -> Result<&'t Tx, TxError> {
    let Tx::Nonce(nonce) = tx else {
        return Err(TxError::InvalidFormat(
            "transaction carries no nonce layer".into(),
        ));
    };
    let NonceTx { signers, inner, .. } = nonce;
    let (key, sequence) = assert_next_sequence(store, nonce)?;
    if let Some(missing) = signers.iter().find(|s| !ctx.has_permission(s)) {
        return Err(TxError::not_member(missing));
    }
    bump_sequence(store, &key, sequence)?;
    Ok(inner.as_ref())
}

impl Middleware for Nonce {
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
        let inner = advance(ctx, store, tx)?;
        next.check_tx(ctx, store, inner)
    }

    fn deliver_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TxError> {
        let inner = advance(ctx, store, tx)?;
        next.deliver_tx(ctx, store, inner)
    }
}
