// Path: crates/api/src/transaction/context.rs
//! Defines the immutable context threaded through the stack.

use std::collections::BTreeSet;
use strata_types::app::Actor;
use tracing::Span;

/// Provides stable, read-only context to middlewares and module handlers for
/// the duration of one `check_tx` or `deliver_tx` call.
///
/// A `Context` is never mutated in place. Every `with_*` method returns a new
/// value, so a middleware that grants permissions to `next` cannot leak them
/// to its siblings or its caller.
#[derive(Debug, Clone)]
pub struct Context {
    chain_id: String,
    block_height: u64,
    logger: Span,
    permissions: BTreeSet<Actor>,
    app: Option<String>,
    ibc: bool,
}

impl Context {
    /// Creates a root context with no permissions.
    pub fn new(chain_id: impl Into<String>, block_height: u64, logger: Span) -> Self {
        Self {
            chain_id: chain_id.into(),
            block_height,
            logger,
            permissions: BTreeSet::new(),
            app: None,
            ibc: false,
        }
    }

    /// The chain this invocation executes on.
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// The height of the block being built or checked against.
    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    /// The span every log line of this invocation is recorded under.
    pub fn logger(&self) -> &Span {
        &self.logger
    }

    /// A new context whose permissions are the union of these and `actors`.
    pub fn with_permissions<I>(&self, actors: I) -> Context
    where
        I: IntoIterator<Item = Actor>,
    {
        let mut next = self.clone();
        next.permissions.extend(actors);
        next
    }

    /// True if `actor` has been granted to this context.
    pub fn has_permission(&self, actor: &Actor) -> bool {
        self.permissions.contains(actor)
    }

    /// Every actor granted to this context, in canonical order.
    pub fn permissions(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.permissions.iter()
    }

    /// Actors granted here that `parent` does not hold.
    pub fn granted_since<'c>(&'c self, parent: &'c Context) -> impl Iterator<Item = &'c Actor> + 'c {
        self.permissions.difference(&parent.permissions)
    }

    /// A new context that logs under `logger`, typically a child span of
    /// [`Context::logger`] carrying extra fields.
    pub fn with_logger(&self, logger: Span) -> Context {
        let mut next = self.clone();
        next.logger = logger;
        next
    }

    /// A new context owned by the component `name`. The stack and the
    /// dispatcher set this before handing control to a middleware or module.
    pub fn with_app(&self, name: &str) -> Context {
        let mut next = self.with_logger(tracing::debug_span!(parent: &self.logger, "app", name = %name));
        next.app = Some(name.to_string());
        next.ibc = false;
        next
    }

    /// A new context carrying the cross-chain permission marker.
    pub fn with_ibc(&self) -> Context {
        let mut next = self.clone();
        next.ibc = true;
        next
    }

    /// The component currently executing, if any.
    pub fn app(&self) -> Option<&str> {
        self.app.as_deref()
    }

    /// True when the current component may grant cross-chain actors.
    pub fn is_ibc(&self) -> bool {
        self.ibc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivations_never_touch_the_original() {
        let root = Context::new("test-chain", 7, Span::none());
        let alice = Actor::new("sigs", vec![1]);
        let derived = root.with_permissions([alice.clone()]);

        assert!(derived.has_permission(&alice));
        assert!(!root.has_permission(&alice));
        assert_eq!(derived.chain_id(), "test-chain");
        assert_eq!(derived.block_height(), 7);
    }

    #[test]
    fn permissions_are_a_union() {
        let a = Actor::new("sigs", vec![1]);
        let b = Actor::new("sigs", vec![2]);
        let ctx = Context::new("c", 1, Span::none())
            .with_permissions([a.clone()])
            .with_permissions([a.clone(), b.clone()]);
        assert_eq!(ctx.permissions().count(), 2);

        let parent = Context::new("c", 1, Span::none()).with_permissions([a]);
        let granted: Vec<_> = ctx.granted_since(&parent).cloned().collect();
        assert_eq!(granted, vec![b]);
    }

    #[test]
    fn app_ownership_resets_ibc_marker() {
        let ctx = Context::new("c", 1, Span::none()).with_ibc();
        assert!(ctx.is_ibc());
        let owned = ctx.with_app("coin");
        assert_eq!(owned.app(), Some("coin"));
        assert!(!owned.is_ibc());
    }
}
