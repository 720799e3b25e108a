//! Path-based message dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;

use cc_01_kv_store::KvStore;
use shared_types::{ChainError, ChainResult};
use tracing::debug;

use crate::domain::{CheckResult, Context, DeliverResult, Tx};
use crate::ports::Handler;

/// Maps message paths to handlers. Each path has exactly one handler.
#[derive(Default, Clone)]
pub struct Router {
    routes: BTreeMap<String, Arc<dyn Handler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `path` to `handler`. Binding a path twice is a wiring bug.
    pub fn handle(&mut self, path: &str, handler: Arc<dyn Handler>) -> ChainResult<()> {
        if self.routes.contains_key(path) {
            return Err(ChainError::human(format!("path {path} already registered")));
        }
        debug!(path, "route registered");
        self.routes.insert(path.to_string(), handler);
        Ok(())
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    fn route(&self, tx: &dyn Tx) -> ChainResult<&dyn Handler> {
        let path = tx.msg()?.path();
        self.routes
            .get(path)
            .map(|h| &**h)
            .ok_or_else(|| ChainError::wrong_type(format!("no handler for message path {path}")))
    }
}

impl Handler for Router {
    fn check(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<CheckResult> {
        self.route(tx)?.check(ctx, store, tx)
    }

    fn deliver(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<DeliverResult> {
        self.route(tx)?.deliver(ctx, store, tx)
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.routes.keys()).finish()
    }
}
