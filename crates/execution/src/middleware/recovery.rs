// Path: crates/execution/src/middleware/recovery.rs

//! Converts panics raised below this layer into `Internal` errors.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use strata_api::state::ScopedStore;
use strata_api::transaction::context::Context;
use strata_api::transaction::handler::{Handler, Middleware};
use strata_telemetry::tx_metrics;
use strata_types::app::{CheckResult, DeliverResult, Tx, ValidatorUpdate};
use strata_types::error::TxError;
use tracing::Span;

/// Outermost safety net. Place it first so nothing below can unwind into
/// the consensus engine. Writes made below are dropped as the panic
/// unwinds through any open savepoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recovery;

impl Recovery {
    /// The name this middleware claims.
    pub const NAME: &'static str = "recovery";
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

fn guarded<T>(op: &'static str, logger: &Span, run: impl FnOnce() -> Result<T, TxError>) -> Result<T, TxError> {
    match catch_unwind(AssertUnwindSafe(run)) {
        Ok(res) => res,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tx_metrics().inc_recovered_panics(op);
            tracing::error!(target: "recovery", parent: logger, op, panic = %message, "recovered panic");
            Err(TxError::Internal(format!(
                "recovered panic in {}: {}",
                op, message
            )))
        }
    }
}

impl Middleware for Recovery {
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
        guarded("check_tx", ctx.logger(), || next.check_tx(ctx, store, tx))
    }

    fn deliver_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TxError> {
        guarded("deliver_tx", ctx.logger(), || next.deliver_tx(ctx, store, tx))
    }

    fn init_state(
        &self,
        logger: &Span,
        store: &mut ScopedStore<'_>,
        module: &str,
        key: &str,
        value: &str,
        next: &dyn Handler,
    ) -> Result<String, TxError> {
        guarded("init_state", logger, || {
            next.init_state(logger, store, module, key, value)
        })
    }

    fn init_validate(
        &self,
        logger: &Span,
        store: &mut ScopedStore<'_>,
        validators: &[ValidatorUpdate],
        next: &dyn Handler,
    ) {
        // Nothing to return; the fault is already logged.
        let _ = guarded("init_validate", logger, || {
            next.init_validate(logger, store, validators);
            Ok(())
        });
    }
}
