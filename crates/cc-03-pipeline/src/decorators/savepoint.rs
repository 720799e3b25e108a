use cc_01_kv_store::{CacheWrap, KvStore};
use shared_types::ChainResult;
use tracing::trace;

use crate::domain::{CheckResult, Context, DeliverResult, Tx};
use crate::ports::{Decorator, Handler};

/// Runs the rest of the chain on a [`CacheWrap`] and writes it back only
/// if the call succeeded.
///
/// Enabled per phase. The user stack places a check savepoint before
/// signature checks and a deliver savepoint after fee collection, so a
/// failing message still pays its fee.
#[derive(Debug, Clone, Copy, Default)]
pub struct Savepoint {
    check: bool,
    deliver: bool,
}

impl Savepoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_check(mut self) -> Self {
        self.check = true;
        self
    }

    pub fn on_deliver(mut self) -> Self {
        self.deliver = true;
        self
    }
}

/// Run `op` on a savepoint over `store`, keep its writes only on success.
pub fn with_savepoint<T>(
    store: &mut dyn KvStore,
    op: impl FnOnce(&mut dyn KvStore) -> ChainResult<T>,
) -> ChainResult<T> {
    let mut cache = CacheWrap::new(store);
    match op(&mut cache) {
        Ok(res) => {
            cache.write()?;
            Ok(res)
        }
        Err(err) => {
            trace!(discarded = cache.pending_len(), "savepoint rolled back");
            cache.discard();
            Err(err)
        }
    }
}

impl Decorator for Savepoint {
    fn check(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<CheckResult> {
        if !self.check {
            return next.check(ctx, store, tx);
        }
        with_savepoint(store, |s| next.check(ctx, s, tx))
    }

    fn deliver(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<DeliverResult> {
        if !self.deliver {
            return next.deliver(ctx, store, tx);
        }
        with_savepoint(store, |s| next.deliver(ctx, s, tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Chain;
    use crate::decorators::test_support::{Write, Writer};
    use crate::domain::MsgTx;
    use cc_01_kv_store::MemStore;
    use std::sync::Arc;

    fn run_deliver(savepoint: Savepoint, fail: bool) -> MemStore {
        let handler = Chain::new()
            .with(savepoint)
            .wrap(Arc::new(Writer { fail, panic: false }));
        let mut store = MemStore::new();
        let _ = handler.deliver(&Context::new("t"), &mut store, &MsgTx::new(Write));
        store
    }

    #[test]
    fn test_failed_deliver_rolls_back() {
        assert!(run_deliver(Savepoint::new().on_deliver(), true).is_empty());
    }

    #[test]
    fn test_successful_deliver_is_kept() {
        let store = run_deliver(Savepoint::new().on_deliver(), false);
        assert!(store.has(b"test/write").unwrap());
    }

    #[test]
    fn test_disabled_phase_passes_through() {
        // Check-only savepoint does not protect deliver.
        let store = run_deliver(Savepoint::new().on_check(), true);
        assert!(store.has(b"test/write").unwrap());
    }

    #[test]
    fn test_check_savepoint_rolls_back() {
        let handler = Chain::new()
            .with(Savepoint::new().on_check())
            .wrap(Arc::new(Writer { fail: true, panic: false }));
        let mut store = MemStore::new();
        assert!(handler
            .check(&Context::new("t"), &mut store, &MsgTx::new(Write))
            .is_err());
        assert!(store.is_empty());
    }
}
