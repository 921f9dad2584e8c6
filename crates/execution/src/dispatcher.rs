// Path: crates/execution/src/dispatcher.rs

//! Routes payloads to the module handler that owns them.

use crate::error::{check_name, ExecutionError};
use std::collections::BTreeMap;
use std::sync::Arc;
use strata_api::state::ScopedStore;
use strata_api::transaction::context::Context;
use strata_api::transaction::handler::Handler;
use strata_tx::TxRegistry;
use strata_types::app::{CheckResult, DeliverResult, Tx, ValidatorUpdate};
use strata_types::error::TxError;
use tracing::Span;

/// The terminal handler of a standard stack.
///
/// The registry names the module of every payload type; the dispatcher
/// looks that module up among its registered handlers and calls it with a
/// store scoped to the module's namespace and a context owned by it.
pub struct Dispatcher {
    registry: Arc<TxRegistry>,
    handlers: BTreeMap<String, Box<dyn Handler>>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("modules", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Dispatcher {
    /// A dispatcher with no modules.
    pub fn new(registry: Arc<TxRegistry>) -> Self {
        Self {
            registry,
            handlers: BTreeMap::new(),
        }
    }

    /// Registers `handler` under its own name.
    pub fn register<H: Handler + 'static>(&mut self, handler: H) -> Result<(), ExecutionError> {
        let name = handler.name().to_string();
        check_name(&name)?;
        if self.handlers.contains_key(&name) {
            return Err(ExecutionError::DuplicateModule(name));
        }
        tracing::debug!(target: "dispatcher", module = %name, "registered module handler");
        self.handlers.insert(name, Box::new(handler));
        Ok(())
    }

    /// Builder-style [`Dispatcher::register`].
    pub fn with<H: Handler + 'static>(mut self, handler: H) -> Result<Self, ExecutionError> {
        self.register(handler)?;
        Ok(self)
    }

    /// The names of the registered modules, in order.
    pub fn modules(&self) -> impl Iterator<Item = &str> + '_ {
        self.handlers.keys().map(String::as_str)
    }

    /// The registry this dispatcher routes with.
    pub fn registry(&self) -> &Arc<TxRegistry> {
        &self.registry
    }

    fn route(&self, tx: &Tx) -> Result<(&str, &dyn Handler), TxError> {
        let module = self.registry.module_of(tx)?;
        match self.handlers.get_key_value(module) {
            Some((name, handler)) => Ok((name.as_str(), handler.as_ref())),
            None => Err(TxError::UnknownTxType(format!(
                "no handler for module '{}'",
                module
            ))),
        }
    }
}

impl Handler for Dispatcher {
    fn name(&self) -> &str {
        "dispatcher"
    }

    fn namespaces(&self) -> Vec<&str> {
        self.modules().collect()
    }

    fn check_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<CheckResult, TxError> {
        let (module, handler) = self.route(tx)?;
        let mut scoped = store.namespace(module)?;
        handler.check_tx(&ctx.with_app(module), &mut scoped, tx.innermost())
    }

    fn deliver_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<DeliverResult, TxError> {
        let (module, handler) = self.route(tx)?;
        let mut scoped = store.namespace(module)?;
        handler.deliver_tx(&ctx.with_app(module), &mut scoped, tx.innermost())
    }

    fn init_state(
        &self,
        logger: &Span,
        store: &mut ScopedStore<'_>,
        module: &str,
        key: &str,
        value: &str,
    ) -> Result<String, TxError> {
        let handler = self
            .handlers
            .get(module)
            .ok_or_else(|| TxError::UnknownModule(module.to_string()))?;
        let mut scoped = store.namespace(module)?;
        handler.init_state(logger, &mut scoped, module, key, value)
    }

    fn init_validate(&self, logger: &Span, store: &mut ScopedStore<'_>, validators: &[ValidatorUpdate]) {
        for (name, handler) in &self.handlers {
            match store.namespace(name) {
                Ok(mut scoped) => handler.init_validate(logger, &mut scoped, validators),
                Err(e) => tracing::error!(
                    target: "dispatcher",
                    parent: logger,
                    module = %name,
                    error = %e,
                    "cannot scope store for init_validate"
                ),
            }
        }
    }
}
