use cc_01_kv_store::{KeyOp, KvStore, RecordingStore};
use shared_types::ChainResult;

use crate::domain::{CheckResult, Context, DeliverResult, Tag, Tx};
use crate::ports::{Decorator, Handler};

/// Reports every key written during deliver as a tag:
/// upper-case hex key → `s` (set) or `d` (delete).
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyTagger;

impl Decorator for KeyTagger {
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
        let mut recording = RecordingStore::new(store);
        let mut res = next.deliver(ctx, &mut recording, tx)?;
        res.tags.extend(recording.touched().map(|(key, op)| {
            let value = match op {
                KeyOp::Set => "s",
                KeyOp::Delete => "d",
            };
            Tag::new(hex::encode_upper(key), value)
        }));
        Ok(res)
    }
}
