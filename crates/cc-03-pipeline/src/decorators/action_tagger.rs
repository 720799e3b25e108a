use cc_01_kv_store::KvStore;
use shared_types::ChainResult;

use crate::domain::{CheckResult, Context, DeliverResult, Tag, Tx};
use crate::ports::{Decorator, Handler};

/// Tag key carrying the delivered message path.
pub const ACTION_TAG: &str = "action";

/// Adds `action` → message path to every successful deliver.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionTagger;

impl Decorator for ActionTagger {
    fn check(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<CheckResult> {
        next.check(ctx, store, tx)
    }

    fn deliver(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<DeliverResult> {
        let mut res = next.deliver(ctx, store, tx)?;
        res.tags.push(Tag::new(ACTION_TAG, tx.msg()?.path()));
        Ok(res)
    }
}
