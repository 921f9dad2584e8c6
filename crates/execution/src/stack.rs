// Path: crates/execution/src/stack.rs

//! Composes middlewares and a terminal handler into a single [`Handler`].
//!
//! Invoking the composed stack runs `m0` with `next = ⟨m1 … mN, H⟩`. Before
//! each layer runs, the stack re-roots whatever store the previous layer
//! handed on and scopes it to the layer's own namespace, so a middleware
//! only ever sees `<name>\x00…` keys. The terminal handler receives the
//! re-rooted store unscoped; the dispatcher applies module namespaces itself.
//!
//! Re-rooting goes through the store the previous layer passed, so a
//! savepoint opened by one layer captures every write made below it.

use crate::error::{check_name, ExecutionError};
use std::sync::Arc;
use strata_api::state::ScopedStore;
use strata_api::transaction::context::Context;
use strata_api::transaction::handler::{Handler, Middleware};
use strata_types::app::{Actor, CheckResult, DeliverResult, Tx, ValidatorUpdate};
use strata_types::error::TxError;
use tracing::Span;

/// The permission scope of a middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiddlewareClass {
    /// May only grant actors of its own module.
    Ordinary,
    /// May additionally grant actors of remote chains.
    Ibc,
}

#[derive(Clone)]
struct Layer {
    middleware: Arc<dyn Middleware>,
    class: MiddlewareClass,
}

impl Layer {
    fn name(&self) -> &str {
        self.middleware.name()
    }

    fn enter(&self, ctx: &Context) -> Context {
        let owned = ctx.with_app(self.name());
        match self.class {
            MiddlewareClass::Ordinary => owned,
            MiddlewareClass::Ibc => owned.with_ibc(),
        }
    }

    fn may_grant(&self, actor: &Actor) -> bool {
        if actor.is_local() {
            actor.module == self.name()
        } else {
            self.class == MiddlewareClass::Ibc
        }
    }
}

/// Collects middlewares in declaration order, outermost first.
///
/// Building does not consume the builder, and every build yields an
/// operationally equivalent stack.
#[derive(Clone, Default)]
pub struct StackBuilder {
    layers: Vec<Layer>,
}

impl StackBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an ordinary middleware.
    pub fn middleware<M: Middleware + 'static>(self, middleware: M) -> Self {
        self.push(Arc::new(middleware), MiddlewareClass::Ordinary)
    }

    /// Appends an IBC-capable middleware.
    pub fn ibc_middleware<M: Middleware + 'static>(self, middleware: M) -> Self {
        self.push(Arc::new(middleware), MiddlewareClass::Ibc)
    }

    /// Appends a shared middleware with an explicit class.
    pub fn push(mut self, middleware: Arc<dyn Middleware>, class: MiddlewareClass) -> Self {
        self.layers.push(Layer { middleware, class });
        self
    }

    /// Number of middlewares declared so far.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// True if no middleware has been declared.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Terminates the declared middlewares with `terminal`.
    pub fn build<H: Handler + 'static>(&self, terminal: H) -> Result<Stack, ExecutionError> {
        let mut ibc: Option<&str> = None;
        for layer in &self.layers {
            check_name(layer.name())?;
            if layer.class == MiddlewareClass::Ibc {
                if let Some(first) = ibc {
                    return Err(ExecutionError::MultipleIbcMiddlewares {
                        first: first.to_string(),
                        second: layer.name().to_string(),
                    });
                }
                ibc = Some(layer.name());
            }
        }
        for claimed in terminal.namespaces() {
            if self.layers.iter().any(|layer| layer.name() == claimed) {
                return Err(ExecutionError::NamespaceCollision(claimed.to_string()));
            }
        }
        tracing::debug!(
            target: "stack",
            layers = ?self.layers.iter().map(Layer::name).collect::<Vec<_>>(),
            terminal = terminal.name(),
            "built middleware stack"
        );
        Ok(Stack {
            layers: self.layers.clone(),
            terminal: Box::new(terminal),
        })
    }
}

/// A composed middleware stack, itself a [`Handler`].
pub struct Stack {
    layers: Vec<Layer>,
    terminal: Box<dyn Handler>,
}

impl std::fmt::Debug for Stack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stack")
            .field(
                "layers",
                &self.layers.iter().map(Layer::name).collect::<Vec<_>>(),
            )
            .field("terminal", &self.terminal.name())
            .finish()
    }
}

impl Stack {
    /// The names of the middlewares, outermost first.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(Layer::name).collect()
    }

    fn check_at(
        &self,
        index: usize,
        root: &[u8],
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<CheckResult, TxError> {
        let mut view = store.rebase(root.to_vec());
        match self.layers.get(index) {
            Some(layer) => {
                let owned = layer.enter(ctx);
                let mut scoped = view.namespace(layer.name())?;
                let next = Link::new(self, index, root, Some(&owned));
                layer.middleware.check_tx(&owned, &mut scoped, tx, &next)
            }
            None => self.terminal.check_tx(ctx, &mut view, tx),
        }
    }

    fn deliver_at(
        &self,
        index: usize,
        root: &[u8],
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<DeliverResult, TxError> {
        let mut view = store.rebase(root.to_vec());
        match self.layers.get(index) {
            Some(layer) => {
                let owned = layer.enter(ctx);
                let mut scoped = view.namespace(layer.name())?;
                let next = Link::new(self, index, root, Some(&owned));
                layer.middleware.deliver_tx(&owned, &mut scoped, tx, &next)
            }
            None => self.terminal.deliver_tx(ctx, &mut view, tx),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn init_state_at(
        &self,
        index: usize,
        root: &[u8],
        logger: &Span,
        store: &mut ScopedStore<'_>,
        module: &str,
        key: &str,
        value: &str,
    ) -> Result<String, TxError> {
        let mut view = store.rebase(root.to_vec());
        match self.layers.get(index) {
            Some(layer) => {
                let mut scoped = view.namespace(layer.name())?;
                let next = Link::new(self, index, root, None);
                layer
                    .middleware
                    .init_state(logger, &mut scoped, module, key, value, &next)
            }
            None => self
                .terminal
                .init_state(logger, &mut view, module, key, value),
        }
    }

    fn init_validate_at(
        &self,
        index: usize,
        root: &[u8],
        logger: &Span,
        store: &mut ScopedStore<'_>,
        validators: &[ValidatorUpdate],
    ) {
        let mut view = store.rebase(root.to_vec());
        match self.layers.get(index) {
            Some(layer) => match view.namespace(layer.name()) {
                Ok(mut scoped) => {
                    let next = Link::new(self, index, root, None);
                    layer
                        .middleware
                        .init_validate(logger, &mut scoped, validators, &next)
                }
                Err(e) => tracing::error!(
                    target: "stack",
                    parent: logger,
                    layer = layer.name(),
                    error = %e,
                    "cannot scope store for init_validate"
                ),
            },
            None => self.terminal.init_validate(logger, &mut view, validators),
        }
    }
}

impl Handler for Stack {
    fn name(&self) -> &str {
        self.terminal.name()
    }

    fn namespaces(&self) -> Vec<&str> {
        let mut claimed: Vec<&str> = self.layers.iter().map(Layer::name).collect();
        claimed.extend(self.terminal.namespaces());
        claimed
    }

    fn check_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<CheckResult, TxError> {
        let root = store.prefix().to_vec();
        self.check_at(0, &root, ctx, store, tx)
    }

    fn deliver_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<DeliverResult, TxError> {
        let root = store.prefix().to_vec();
        self.deliver_at(0, &root, ctx, store, tx)
    }

    fn init_state(
        &self,
        logger: &Span,
        store: &mut ScopedStore<'_>,
        module: &str,
        key: &str,
        value: &str,
    ) -> Result<String, TxError> {
        let root = store.prefix().to_vec();
        self.init_state_at(0, &root, logger, store, module, key, value)
    }

    fn init_validate(&self, logger: &Span, store: &mut ScopedStore<'_>, validators: &[ValidatorUpdate]) {
        let root = store.prefix().to_vec();
        self.init_validate_at(0, &root, logger, store, validators)
    }
}

/// The `next` continuation handed to the middleware at `owner`.
struct Link<'s> {
    stack: &'s Stack,
    owner: usize,
    root: &'s [u8],
    parent: Option<&'s Context>,
}

impl<'s> Link<'s> {
    fn new(stack: &'s Stack, owner: usize, root: &'s [u8], parent: Option<&'s Context>) -> Self {
        Self {
            stack,
            owner,
            root,
            parent,
        }
    }

    /// Ensures the owning middleware only granted actors within its scope.
    fn authorize(&self, ctx: &Context) -> Result<(), TxError> {
        let (Some(parent), Some(layer)) = (self.parent, self.stack.layers.get(self.owner)) else {
            return Ok(());
        };
        if let Some(actor) = ctx.granted_since(parent).find(|a| !layer.may_grant(a)) {
            tracing::warn!(
                target: "stack",
                parent: ctx.logger(),
                middleware = layer.name(),
                actor = %actor,
                "middleware granted a permission outside its scope"
            );
            return Err(TxError::Unauthorized(format!(
                "middleware '{}' cannot grant {}",
                layer.name(),
                actor
            )));
        }
        Ok(())
    }
}

impl Handler for Link<'_> {
    fn name(&self) -> &str {
        match self.stack.layers.get(self.owner + 1) {
            Some(layer) => layer.name(),
            None => self.stack.terminal.name(),
        }
    }

    fn check_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<CheckResult, TxError> {
        self.authorize(ctx)?;
        self.stack.check_at(self.owner + 1, self.root, ctx, store, tx)
    }

    fn deliver_tx(
        &self,
        ctx: &Context,
        store: &mut ScopedStore<'_>,
        tx: &Tx,
    ) -> Result<DeliverResult, TxError> {
        self.authorize(ctx)?;
        self.stack
            .deliver_at(self.owner + 1, self.root, ctx, store, tx)
    }

    fn init_state(
        &self,
        logger: &Span,
        store: &mut ScopedStore<'_>,
        module: &str,
        key: &str,
        value: &str,
    ) -> Result<String, TxError> {
        self.stack
            .init_state_at(self.owner + 1, self.root, logger, store, module, key, value)
    }

    fn init_validate(&self, logger: &Span, store: &mut ScopedStore<'_>, validators: &[ValidatorUpdate]) {
        self.stack
            .init_validate_at(self.owner + 1, self.root, logger, store, validators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use strata_api::state::KvStore;
    use strata_state::tree::memory::MemoryStore;
    use strata_test_utils::fixtures::{keypair, send, sig_actor, TEST_CHAIN_ID};
    use strata_test_utils::handlers::{decode_permissions, ProbeHandler, DELIVERED_KEY, PERMISSIONS_KEY};
    use strata_tx::TxRegistry;
    use strata_types::error::ErrorKind;
    use strata_types::keys::namespaced_key;

    /// Writes its name under `mark`, then grants `grant` to `next`.
    struct Granting {
        name: &'static str,
        grant: Option<Actor>,
    }

    impl Granting {
        fn new(name: &'static str) -> Self {
            Self { name, grant: None }
        }

        fn granting(name: &'static str, actor: Actor) -> Self {
            Self {
                name,
                grant: Some(actor),
            }
        }

        fn derive(&self, ctx: &Context, store: &mut ScopedStore<'_>) -> Result<Context, TxError> {
            store.set(b"mark", self.name.as_bytes())?;
            Ok(ctx.with_permissions(self.grant.clone()))
        }
    }

    impl Middleware for Granting {
        fn name(&self) -> &str {
            self.name
        }

        fn check_tx(
            &self,
            ctx: &Context,
            store: &mut ScopedStore<'_>,
            tx: &Tx,
            next: &dyn Handler,
        ) -> Result<CheckResult, TxError> {
            let ctx = self.derive(ctx, store)?;
            next.check_tx(&ctx, store, tx)
        }

        fn deliver_tx(
            &self,
            ctx: &Context,
            store: &mut ScopedStore<'_>,
            tx: &Tx,
            next: &dyn Handler,
        ) -> Result<DeliverResult, TxError> {
            let ctx = self.derive(ctx, store)?;
            next.deliver_tx(&ctx, store, tx)
        }
    }

    fn payload() -> Tx {
        send(&sig_actor(&keypair(1)), &sig_actor(&keypair(2)), 1)
    }

    fn ctx() -> Context {
        Context::new(TEST_CHAIN_ID, 1, Span::none())
    }

    #[test]
    fn layers_write_into_their_own_namespace() {
        let stack = StackBuilder::new()
            .middleware(Granting::new("alpha"))
            .middleware(Granting::new("beta"))
            .build(ProbeHandler::new("probe"))
            .unwrap();
        assert_eq!(stack.name(), "probe");
        assert_eq!(stack.layer_names(), vec!["alpha", "beta"]);

        let mut store = MemoryStore::new();
        {
            let mut root = ScopedStore::new(&mut store);
            stack.deliver_tx(&ctx(), &mut root, &payload()).unwrap();
        }
        assert_eq!(
            store.get(&namespaced_key("alpha", b"mark")).unwrap(),
            Some(b"alpha".to_vec())
        );
        assert_eq!(
            store.get(&namespaced_key("beta", b"mark")).unwrap(),
            Some(b"beta".to_vec())
        );
        // The terminal handler is not scoped by the stack.
        assert!(store.get(DELIVERED_KEY).unwrap().is_some());
    }

    #[test]
    fn layers_may_grant_only_their_own_actors() {
        let own = Actor::new("alpha", vec![1; 20]);
        let stack = StackBuilder::new()
            .middleware(Granting::granting("alpha", own.clone()))
            .build(ProbeHandler::new("probe"))
            .unwrap();
        let mut store = MemoryStore::new();
        let mut root = ScopedStore::new(&mut store);
        stack.check_tx(&ctx(), &mut root, &payload()).unwrap();
        let seen = decode_permissions(&root.get(PERMISSIONS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(seen, vec![own]);

        let forged = StackBuilder::new()
            .middleware(Granting::granting("alpha", Actor::new("sigs", vec![1; 20])))
            .build(ProbeHandler::new("probe"))
            .unwrap();
        let err = forged.check_tx(&ctx(), &mut root, &payload()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn only_ibc_layers_grant_remote_actors() {
        let remote = Actor::new("transfer", vec![9; 20]).on_chain("hub");
        let ordinary = StackBuilder::new()
            .middleware(Granting::granting("relay", remote.clone()))
            .build(ProbeHandler::new("probe"))
            .unwrap();
        let ibc = StackBuilder::new()
            .ibc_middleware(Granting::granting("relay", remote))
            .build(ProbeHandler::new("probe"))
            .unwrap();

        let mut store = MemoryStore::new();
        let mut root = ScopedStore::new(&mut store);
        assert_eq!(
            ordinary
                .deliver_tx(&ctx(), &mut root, &payload())
                .unwrap_err()
                .kind(),
            ErrorKind::Unauthorized
        );
        assert!(ibc.deliver_tx(&ctx(), &mut root, &payload()).is_ok());
    }

    #[test]
    fn builder_rejects_second_ibc_layer_and_bad_names() {
        let builder = StackBuilder::new()
            .ibc_middleware(Granting::new("one"))
            .ibc_middleware(Granting::new("two"));
        assert_eq!(
            builder.build(ProbeHandler::new("probe")).unwrap_err(),
            ExecutionError::MultipleIbcMiddlewares {
                first: "one".into(),
                second: "two".into(),
            }
        );
        let bad = StackBuilder::new().middleware(Granting::new("a\0b"));
        assert!(matches!(
            bad.build(ProbeHandler::new("probe")),
            Err(ExecutionError::InvalidName(_))
        ));
    }

    #[test]
    fn modules_may_not_shadow_layer_namespaces() {
        let registry = Arc::new(TxRegistry::new());
        let dispatcher = Dispatcher::new(registry.clone())
            .with(ProbeHandler::new("nonce"))
            .unwrap();
        let err = StackBuilder::new()
            .middleware(Granting::new("nonce"))
            .build(dispatcher)
            .unwrap_err();
        assert_eq!(err, ExecutionError::NamespaceCollision("nonce".into()));

        let dispatcher = Dispatcher::new(registry).with(ProbeHandler::new("coin")).unwrap();
        let stack = StackBuilder::new()
            .middleware(Granting::new("nonce"))
            .build(dispatcher)
            .unwrap();
        assert_eq!(stack.namespaces(), vec!["nonce", "coin"]);
    }

    #[test]
    fn builder_is_reusable() {
        let builder = StackBuilder::new().middleware(Granting::new("alpha"));
        let first = builder.build(ProbeHandler::new("probe")).unwrap();
        let second = builder.build(ProbeHandler::new("probe")).unwrap();
        assert_eq!(first.layer_names(), second.layer_names());
        assert_eq!(builder.len(), 1);
    }
}
