//! Decorator chain builder.

use std::sync::Arc;

use cc_01_kv_store::KvStore;
use shared_types::ChainResult;

use crate::domain::{CheckResult, Context, DeliverResult, Tx};
use crate::ports::{Decorator, Handler};

/// Ordered list of decorators, outermost first.
#[derive(Default, Clone)]
pub struct Chain {
    decorators: Vec<Arc<dyn Decorator>>,
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decorator inside the ones already added.
    pub fn with(mut self, decorator: impl Decorator + 'static) -> Self {
        self.decorators.push(Arc::new(decorator));
        self
    }

    pub fn with_arc(mut self, decorator: Arc<dyn Decorator>) -> Self {
        self.decorators.push(decorator);
        self
    }

    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }

    /// Close the chain over the innermost handler.
    pub fn wrap(self, handler: Arc<dyn Handler>) -> ChainedHandler {
        ChainedHandler {
            decorators: self.decorators.into(),
            handler,
        }
    }
}

/// A handler made of decorators around an inner handler.
#[derive(Clone)]
pub struct ChainedHandler {
    decorators: Arc<[Arc<dyn Decorator>]>,
    handler: Arc<dyn Handler>,
}

impl ChainedHandler {
    fn step(&self) -> Step<'_> {
        Step {
            decorators: &self.decorators,
            handler: self.handler.as_ref(),
        }
    }
}

impl Handler for ChainedHandler {
    fn check(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<CheckResult> {
        self.step().check(ctx, store, tx)
    }

    fn deliver(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<DeliverResult> {
        self.step().deliver(ctx, store, tx)
    }
}

/// The remainder of a chain, handed to each decorator as `next`.
struct Step<'a> {
    decorators: &'a [Arc<dyn Decorator>],
    handler: &'a dyn Handler,
}

impl Handler for Step<'_> {
    fn check(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<CheckResult> {
        match self.decorators.split_first() {
            None => self.handler.check(ctx, store, tx),
            Some((first, rest)) => {
                let next = Step {
                    decorators: rest,
                    handler: self.handler,
                };
                first.check(ctx, store, tx, &next)
            }
        }
    }

    fn deliver(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<DeliverResult> {
        match self.decorators.split_first() {
            None => self.handler.deliver(ctx, store, tx),
            Some((first, rest)) => {
                let next = Step {
                    decorators: rest,
                    handler: self.handler,
                };
                first.deliver(ctx, store, tx, &next)
            }
        }
    }
}
