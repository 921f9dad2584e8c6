// Path: crates/execution/src/middleware/fee.rs

//! Minimum-fee enforcement and collection.

use strata_api::state::ScopedStore;
use strata_api::transaction::context::Context;
use strata_api::transaction::handler::{Handler, Middleware};
use strata_types::app::{Actor, CheckResult, Coin, DeliverResult, FeeTx, SendTx, Tx};
use strata_types::config::FeeConfig;
use strata_types::error::TxError;

/// Requires a [`Tx::Fee`] layer paying at least `min_fee`, and moves the fee
/// from the payer to `collector` before the wrapped transaction runs.
///
/// The transfer goes through `next` as an ordinary coin send, so the coin
/// module enforces the payer's permission and balance. With a zero
/// `min_fee` the layer is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fee {
    /// The minimum fee; its denomination is the only one accepted.
    pub min_fee: Coin,
    /// The actor credited with collected fees.
    pub collector: Actor,
}

impl From<FeeConfig> for Fee {
    fn from(cfg: FeeConfig) -> Self {
        Self {
            min_fee: cfg.min_fee,
            collector: cfg.collector,
        }
    }
}

/// What the fee layer decided for one transaction.
enum Charge<'t> {
    /// Move `transfer` first, then run `inner`.
    Pay {
        transfer: Tx,
        amount: u64,
        inner: &'t Tx,
    },
    /// Run `inner` with nothing to collect.
    Free(&'t Tx),
}

impl Fee {
    /// The name this middleware claims.
    pub const NAME: &'static str = "fee";

    /// A fee layer requiring `min_fee`, paid to `collector`.
    pub fn new(min_fee: Coin, collector: Actor) -> Self {
        Self { min_fee, collector }
    }

    fn assess<'t>(&self, tx: &'t Tx) -> Result<Charge<'t>, TxError> {
        let Tx::Fee(FeeTx { fee, payer, inner }) = tx else {
            if self.min_fee.is_zero() {
                return Ok(Charge::Free(tx));
            }
            return Err(TxError::InsufficientFees {
                required: self.min_fee.clone(),
                got: Coin::zero(self.min_fee.denom.clone()),
            });
        };
        if fee.denom != self.min_fee.denom {
            return Err(TxError::WrongFeeDenom {
                expected: self.min_fee.denom.clone(),
                got: fee.denom.clone(),
            });
        }
        if fee.amount < self.min_fee.amount {
            return Err(TxError::InsufficientFees {
                required: self.min_fee.clone(),
                got: fee.clone(),
            });
        }
        if fee.is_zero() {
            return Ok(Charge::Free(inner.as_ref()));
        }
        Ok(Charge::Pay {
            transfer: Tx::Send(SendTx {
                from: payer.clone(),
                to: self.collector.clone(),
                amount: fee.clone(),
            }),
            amount: fee.amount,
            inner: inner.as_ref(),
        })
    }
}

impl Middleware for Fee {
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
        match self.assess(tx)? {
            Charge::Free(inner) => next.check_tx(ctx, store, inner),
            Charge::Pay {
                transfer,
                amount,
                inner,
            } => {
                let paid = next.check_tx(ctx, store, &transfer)?;
                let mut res = next.check_tx(ctx, store, inner)?;
                res.gas_payment = res
                    .gas_payment
                    .saturating_add(paid.gas_payment)
                    .saturating_add(amount);
                res.gas_allocated = res.gas_allocated.saturating_add(paid.gas_allocated);
                Ok(res)
            }
        }
    }

    fn deliver_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TxError> {
        match self.assess(tx)? {
            Charge::Free(inner) => next.deliver_tx(ctx, store, inner),
            Charge::Pay {
                transfer, inner, ..
            } => {
                next.deliver_tx(ctx, store, &transfer)?;
                tracing::debug!(target: "fee", parent: ctx.logger(), "fee collected");
                next.deliver_tx(ctx, store, inner)
            }
        }
    }
}
