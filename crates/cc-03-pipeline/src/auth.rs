//! Authenticators backed by the execution context.

use std::sync::Arc;

use cc_01_kv_store::KvStore;
use shared_types::Condition;

use crate::domain::Context;
use crate::ports::Authenticator;

/// Reads the conditions a decorator (or the scheduler) attached to the
/// context under `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextAuthenticator {
    source: &'static str,
}

impl ContextAuthenticator {
    pub const fn new(source: &'static str) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &'static str {
        self.source
    }
}

impl Authenticator for ContextAuthenticator {
    fn conditions(&self, ctx: &Context, _store: &dyn KvStore) -> Vec<Condition> {
        ctx.conditions(self.source).to_vec()
    }
}

/// Union of several authenticators, in registration order.
#[derive(Default, Clone)]
pub struct ChainAuth {
    authenticators: Vec<Arc<dyn Authenticator>>,
}

impl ChainAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, auth: impl Authenticator + 'static) -> Self {
        self.authenticators.push(Arc::new(auth));
        self
    }
}

impl Authenticator for ChainAuth {
    fn conditions(&self, ctx: &Context, store: &dyn KvStore) -> Vec<Condition> {
        self.authenticators
            .iter()
            .flat_map(|a| a.conditions(ctx, store))
            .collect()
    }
}
