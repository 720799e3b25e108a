//! Pipeline ports.

use cc_01_kv_store::KvStore;
use shared_types::{Address, ChainResult, Condition};

use crate::domain::{CheckResult, Context, DeliverResult, Tx};

/// Business logic for one message type, or anything that looks like it
/// (routers, decorated chains).
///
/// `check` must leave the store as it found it. `deliver` repeats the same
/// validation before mutating.
pub trait Handler: Send + Sync {
    fn check(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
    ) -> ChainResult<CheckResult>;

    fn deliver(&self, ctx: &Context, store: &mut dyn KvStore, tx: &dyn Tx)
        -> ChainResult<DeliverResult>;
}

/// Middleware around a [`Handler`]. `next` is the remainder of the chain.
pub trait Decorator: Send + Sync {
    fn check(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<CheckResult>;

    fn deliver(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<DeliverResult>;
}

/// Source of the conditions a transaction is authorized by.
pub trait Authenticator: Send + Sync {
    fn conditions(&self, ctx: &Context, store: &dyn KvStore) -> Vec<Condition>;

    fn has_address(&self, ctx: &Context, store: &dyn KvStore, addr: &Address) -> bool {
        self.conditions(ctx, store)
            .iter()
            .any(|c| &c.address() == addr)
    }
}
