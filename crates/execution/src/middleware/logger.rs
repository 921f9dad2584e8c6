// Path: crates/execution/src/middleware/logger.rs

//! Records the duration and outcome of every call below it.

use strata_api::state::ScopedStore;
use strata_api::transaction::context::Context;
use strata_api::transaction::handler::{Handler, Middleware};
use strata_telemetry::time::Timer;
use strata_telemetry::tx_metrics;
use strata_types::app::{CheckResult, DeliverResult, Tx};
use strata_types::error::{ErrorCode, TxError};
use tracing::{debug, error, info};

/// Structured per-transaction logging and metrics.
///
/// Check failures are routine mempool noise and log at `info`; deliver
/// failures log at `error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger;

impl Logger {
    /// The name this middleware claims.
    pub const NAME: &'static str = "logger";
}

fn outcome<T>(res: &Result<T, TxError>) -> &'static str {
    match res {
        Ok(_) => "ok",
        Err(e) => e.code(),
    }
}

impl Middleware for Logger {
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
        let timer = Timer::new(tx_metrics(), "check");
        let res = next.check_tx(ctx, store, tx);
        let elapsed = timer.elapsed();
        match &res {
            Ok(r) => debug!(
                target: "tx",
                parent: ctx.logger(),
                tag = tx.tag(),
                ?elapsed,
                gas_payment = r.gas_payment,
                "check_tx ok"
            ),
            Err(e) => info!(
                target: "tx",
                parent: ctx.logger(),
                tag = tx.tag(),
                ?elapsed,
                code = e.code(),
                error = %e,
                "check_tx rejected"
            ),
        }
        tx_metrics().inc_tx_processed("check", outcome(&res));
        res
    }

    fn deliver_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TxError> {
        let timer = Timer::new(tx_metrics(), "deliver");
        let res = next.deliver_tx(ctx, store, tx);
        let elapsed = timer.elapsed();
        match &res {
            Ok(r) => info!(
                target: "tx",
                parent: ctx.logger(),
                tag = tx.tag(),
                ?elapsed,
                validator_updates = r.diff.len(),
                "deliver_tx ok"
            ),
            Err(e) => error!(
                target: "tx",
                parent: ctx.logger(),
                tag = tx.tag(),
                ?elapsed,
                code = e.code(),
                error = %e,
                "deliver_tx failed"
            ),
        }
        tx_metrics().inc_tx_processed("deliver", outcome(&res));
        res
    }
}
