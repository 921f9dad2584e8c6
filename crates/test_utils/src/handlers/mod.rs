//! Scripted module handlers for exercising the stack.

use strata_api::state::ScopedStore;
use strata_api::transaction::context::Context;
use strata_api::transaction::handler::Handler;
use strata_types::app::{Actor, CheckResult, DeliverResult, Tx, ValidatorUpdate};
use strata_types::codec::{from_bytes_canonical, to_bytes_canonical};
use strata_types::error::TxError;
use tracing::Span;

/// Where [`ProbeHandler`] records the last checked transaction.
pub const CHECKED_KEY: &[u8] = b"checked";
/// Where [`ProbeHandler`] records the last delivered transaction.
pub const DELIVERED_KEY: &[u8] = b"delivered";
/// Where [`ProbeHandler`] records the permissions it was called with.
pub const PERMISSIONS_KEY: &[u8] = b"permissions";
/// Where [`ProbeHandler`] records the genesis validator set.
pub const VALIDATORS_KEY: &[u8] = b"validators";
/// The key scripted failing handlers write before they fail.
pub const BEFORE_FAULT_KEY: &[u8] = b"before_fault";

/// Decodes what [`ProbeHandler`] stored under [`PERMISSIONS_KEY`].
pub fn decode_permissions(bytes: &[u8]) -> Result<Vec<Actor>, TxError> {
    from_bytes_canonical(bytes)
}

/// A module that succeeds on everything and leaves observable traces in its store.
#[derive(Debug, Clone)]
pub struct ProbeHandler {
    name: String,
    gas: u64,
}

impl ProbeHandler {
    /// A probe claiming the namespace `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            gas: 0,
        }
    }

    /// Reports `gas` as both allocated and paid from `check_tx`.
    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = gas;
        self
    }

    fn record(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
        key: &[u8],
    ) -> Result<(), TxError> {
        store.set(key, &tx.to_wire())?;
        let permissions: Vec<Actor> = ctx.permissions().cloned().collect();
        store.set(PERMISSIONS_KEY, &to_bytes_canonical(&permissions))?;
        Ok(())
    }
}

impl Handler for ProbeHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn check_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<CheckResult, TxError> {
        self.record(ctx, store, tx, CHECKED_KEY)?;
        Ok(CheckResult::new(tx.to_wire(), format!("{} checked", self.name))
            .with_gas(self.gas, self.gas))
    }

    fn deliver_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<DeliverResult, TxError> {
        self.record(ctx, store, tx, DELIVERED_KEY)?;
        Ok(DeliverResult::new(
            tx.to_wire(),
            format!("{} delivered", self.name),
        ))
    }

    fn init_state(
        &self,
        _logger: &Span,
        store: &mut ScopedStore<'_>,
        module: &str,
        key: &str,
        value: &str,
    ) -> Result<String, TxError> {
        store.set(key.as_bytes(), value.as_bytes())?;
        Ok(format!("{}/{} set", module, key))
    }

    fn init_validate(&self, logger: &Span, store: &mut ScopedStore<'_>, validators: &[ValidatorUpdate]) {
        if let Err(e) = store.set(VALIDATORS_KEY, &to_bytes_canonical(&validators.to_vec())) {
            tracing::warn!(target: "probe", parent: logger, error = %e, "failed to record validators");
        }
    }
}

/// A module that writes [`BEFORE_FAULT_KEY`] and then panics with a fixed message.
#[derive(Debug, Clone)]
pub struct PanicHandler {
    name: String,
    message: String,
}

impl PanicHandler {
    /// A handler claiming `name` that panics with `message`.
    pub fn new(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            message: message.to_string(),
        }
    }

    #[allow(clippy::panic)]
    fn fault(&self, store: &mut ScopedStore<'_>) -> ! {
        let _ = store.set(BEFORE_FAULT_KEY, b"1");
        panic!("{}", self.message)
    }
}

impl Handler for PanicHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn check_tx(&self, _: &Context, store: &mut ScopedStore<'_>, _: &Tx) -> Result<CheckResult, TxError> {
        self.fault(store)
    }

    fn deliver_tx(
        &self,
        _: &Context,
        store: &mut ScopedStore<'_>,
        _: &Tx,
    ) -> Result<DeliverResult, TxError> {
        self.fault(store)
    }

    fn init_state(
        &self,
        _: &Span,
        store: &mut ScopedStore<'_>,
        _: &str,
        _: &str,
        _: &str,
    ) -> Result<String, TxError> {
        self.fault(store)
    }

    fn init_validate(&self, _: &Span, store: &mut ScopedStore<'_>, _: &[ValidatorUpdate]) {
        self.fault(store)
    }
}

/// A module that writes [`BEFORE_FAULT_KEY`] and then returns an `Internal` error.
#[derive(Debug, Clone)]
pub struct FailingHandler {
    name: String,
}

impl FailingHandler {
    /// A handler claiming `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    fn fail(&self, store: &mut ScopedStore<'_>) -> TxError {
        match store.set(BEFORE_FAULT_KEY, b"1") {
            Ok(()) => TxError::Internal(format!("{} refused the transaction", self.name)),
            Err(e) => e.into(),
        }
    }
}

impl Handler for FailingHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn check_tx(&self, _: &Context, store: &mut ScopedStore<'_>, _: &Tx) -> Result<CheckResult, TxError> {
        Err(self.fail(store))
    }

    fn deliver_tx(
        &self,
        _: &Context,
        store: &mut ScopedStore<'_>,
        _: &Tx,
    ) -> Result<DeliverResult, TxError> {
        Err(self.fail(store))
    }

    fn init_state(
        &self,
        _: &Span,
        store: &mut ScopedStore<'_>,
        _: &str,
        _: &str,
        _: &str,
    ) -> Result<String, TxError> {
        Err(self.fail(store))
    }

    fn init_validate(&self, _: &Span, store: &mut ScopedStore<'_>, _: &[ValidatorUpdate]) {
        let _ = self.fail(store);
    }
}
