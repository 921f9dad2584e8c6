// Path: crates/services/src/coin/mod.rs
//! The `coin` module: per-actor balances and transfers.
//!
//! A balance lives under the canonical encoding of `(actor, denom)` and
//! holds a SCALE-encoded [`Coin`]. A missing entry is a zero balance.

use serde::Deserialize;
use strata_api::state::ScopedStore;
use strata_api::transaction::context::Context;
use strata_api::transaction::handler::Handler;
use strata_types::app::{Actor, CheckResult, Coin, DeliverResult, SendTx, Tx, ValidatorUpdate};
use strata_types::codec::{from_bytes_canonical, to_bytes_canonical};
use strata_types::error::TxError;
use tracing::Span;

/// The genesis option that funds an account.
pub const ACCOUNT_OPTION: &str = "account";

/// The namespace and module name of the coin module.
pub const MODULE_NAME: &str = "coin";

/// The JSON value of an `coin/account` genesis option.
#[derive(Debug, Clone, Deserialize)]
pub struct GenesisAccount {
    /// The actor to fund.
    pub actor: Actor,
    /// Its initial balances, one per denomination.
    pub coins: Vec<Coin>,
}

/// The store key of `actor`'s balance in `denom`, relative to the module namespace.
pub fn balance_key(actor: &Actor, denom: &str) -> Vec<u8> {
    to_bytes_canonical(&(actor, denom))
}

/// Reads `actor`'s balance in `denom`.
pub fn balance(store: &ScopedStore<'_>, actor: &Actor, denom: &str) -> Result<Coin, TxError> {
    match store.get(&balance_key(actor, denom))? {
        Some(bytes) => from_bytes_canonical(&bytes),
        None => Ok(Coin::zero(denom)),
    }
}

fn write_balance(store: &mut ScopedStore<'_>, actor: &Actor, coin: &Coin) -> Result<(), TxError> {
    let key = balance_key(actor, &coin.denom);
    if coin.is_zero() {
        store.delete(&key)?;
    } else {
        store.set(&key, &to_bytes_canonical(coin))?;
    }
    Ok(())
}

/// The coin module handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoinModule;

impl CoinModule {
    /// Creates the module.
    pub fn new() -> Self {
        Self
    }

    fn send_tx<'t>(tx: &'t Tx) -> Result<&'t SendTx, TxError> {
        match tx {
            Tx::Send(send) => Ok(send),
            other => Err(TxError::UnknownTxType(format!(
                "coin module cannot execute tag 0x{:02x}",
                other.tag()
            ))),
        }
    }

    /// Stateful checks shared by both phases. Returns the sender's balance.
    fn validate(ctx: &Context, store: &ScopedStore<'_>, send: &SendTx) -> Result<Coin, TxError> {
        if !ctx.has_permission(&send.from) {
            return Err(TxError::Unauthorized(format!(
                "{} did not authorize this transfer",
                send.from
            )));
        }
        send.amount.validate()?;
        let have = balance(store, &send.from, &send.amount.denom)?;
        have.checked_sub(&send.amount)?;
        Ok(have)
    }

    /// Debits the sender and credits the recipient. In the check phase the
    /// writes land in the check cache, so later checks see the debit.
    fn transfer(ctx: &Context, store: &mut ScopedStore<'_>, send: &SendTx) -> Result<(), TxError> {
        let have = Self::validate(ctx, store, send)?;
        write_balance(store, &send.from, &have.checked_sub(&send.amount)?)?;
        let received = balance(store, &send.to, &send.amount.denom)?.checked_add(&send.amount)?;
        write_balance(store, &send.to, &received)
    }
}

impl Handler for CoinModule {
    fn name(&self) -> &str {
        MODULE_NAME
    }

    fn check_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<CheckResult, TxError> {
        let send = Self::send_tx(tx)?;
        Self::transfer(ctx, store, send)?;
        Ok(CheckResult::new(Vec::new(), "transfer ok"))
    }

    fn deliver_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<DeliverResult, TxError> {
        let send = Self::send_tx(tx)?;
        Self::transfer(ctx, store, send)?;
        tracing::debug!(
            target: "coin",
            parent: ctx.logger(),
            from = %send.from,
            to = %send.to,
            amount = %send.amount,
            "transfer applied"
        );
        Ok(DeliverResult::new(Vec::new(), format!("sent {}", send.amount)))
    }

    fn init_state(
        &self,
        logger: &Span,
        store: &mut ScopedStore<'_>,
        module: &str,
        key: &str,
        value: &str,
    ) -> Result<String, TxError> {
        if key != ACCOUNT_OPTION {
            return Err(TxError::InvalidFormat(format!(
                "unknown genesis option '{}/{}'",
                module, key
            )));
        }
        let account: GenesisAccount = serde_json::from_str(value)?;
        for coin in &account.coins {
            coin.validate()?;
            let total = balance(store, &account.actor, &coin.denom)?.checked_add(coin)?;
            write_balance(store, &account.actor, &total)?;
        }
        tracing::info!(
            target: "coin",
            parent: logger,
            actor = %account.actor,
            denoms = account.coins.len(),
            "genesis account funded"
        );
        Ok(format!("funded {}", account.actor))
    }

    fn init_validate(&self, logger: &Span, _store: &mut ScopedStore<'_>, validators: &[ValidatorUpdate]) {
        tracing::debug!(target: "coin", parent: logger, validators = validators.len(), "genesis validators observed");
    }
}

#[cfg(test)]
mod tests;
