// Path: crates/api/src/transaction/handler.rs
//! Defines the `Handler` and `Middleware` traits every layer of the stack implements.

use crate::state::ScopedStore;
use crate::transaction::context::Context;
use strata_types::app::{CheckResult, DeliverResult, Tx, ValidatorUpdate};
use strata_types::error::TxError;
use tracing::Span;

/// A terminal component: a module, the dispatcher, or a whole composed stack.
///
/// A module handler reached through the dispatcher receives a store already
/// scoped to its own namespace. The terminal handler of a stack receives the
/// stack's root view.
pub trait Handler: Send + Sync {
    /// The namespace this handler claims.
    fn name(&self) -> &str;

    /// The store namespaces this handler writes below the root it is given.
    /// A stack refuses to wrap a handler whose namespaces overlap its layers.
    fn namespaces(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Validates `tx` against current state without committing to it.
    /// Writes made here only ever reach the check cache.
    fn check_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<CheckResult, TxError>;

    /// Executes `tx` against the deliver state.
    fn deliver_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<DeliverResult, TxError>;

    /// Applies one genesis option addressed to `module`. Returns a log line.
    fn init_state(
        &self,
        logger: &Span,
        store: &mut ScopedStore<'_>,
        module: &str,
        key: &str,
        value: &str,
    ) -> Result<String, TxError>;

    /// Observes the genesis validator set. Infallible: faults are logged, not returned.
    fn init_validate(&self, logger: &Span, store: &mut ScopedStore<'_>, validators: &[ValidatorUpdate]);
}

impl<T: Handler + ?Sized> Handler for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn namespaces(&self) -> Vec<&str> {
        (**self).namespaces()
    }

    fn check_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<CheckResult, TxError> {
        (**self).check_tx(ctx, store, tx)
    }

    fn deliver_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<DeliverResult, TxError> {
        (**self).deliver_tx(ctx, store, tx)
    }

    fn init_state(
        &self,
        logger: &Span,
        store: &mut ScopedStore<'_>,
        module: &str,
        key: &str,
        value: &str,
    ) -> Result<String, TxError> {
        (**self).init_state(logger, store, module, key, value)
    }

    fn init_validate(&self, logger: &Span, store: &mut ScopedStore<'_>, validators: &[ValidatorUpdate]) {
        (**self).init_validate(logger, store, validators)
    }
}

/// A reusable cross-cutting layer. Each operation receives `next`, the rest
/// of the stack, as its last argument.
///
/// A middleware may derive a new context before calling `next`, hand `next` a
/// different store (a savepoint, say), return without calling `next` at all,
/// or inspect and rewrite what `next` returns.
pub trait Middleware: Send + Sync {
    /// The namespace this middleware claims. The stack scopes the store to it
    /// before every call.
    fn name(&self) -> &str;

    /// The check-phase hook.
    fn check_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
        next: &dyn Handler,
    ) -> Result<CheckResult, TxError>;

    /// The deliver-phase hook.
    fn deliver_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
        next: &dyn Handler,
    ) -> Result<DeliverResult, TxError>;

    /// The genesis-option hook. The default passes straight through.
    fn init_state(
        &self,
        logger: &Span,
        store: &mut ScopedStore<'_>,
        module: &str,
        key: &str,
        value: &str,
        next: &dyn Handler,
    ) -> Result<String, TxError> {
        next.init_state(logger, store, module, key, value)
    }

    /// The genesis-validator hook. The default passes straight through.
    fn init_validate(
        &self,
        logger: &Span,
        store: &mut ScopedStore<'_>,
        validators: &[ValidatorUpdate],
        next: &dyn Handler,
    ) {
        next.init_validate(logger, store, validators)
    }
}
