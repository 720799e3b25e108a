use std::marker::PhantomData;

use cc_01_kv_store::KvStore;
use cc_03_pipeline::{CheckResult, Context, Decorator, DeliverResult, Handler, Msg, Tx};
use shared_types::codec::{decode, encode};
use shared_types::{ChainError, ChainResult, FeeInfo, StdSignature};
use tracing::debug;

/// Largest number of messages a single batch may carry.
pub const MAX_BATCH_MESSAGES: usize = 10;

/// A message that wraps a list of other messages.
pub trait BatchMsg: Msg {
    /// Unpack every inner message. All entries are decoded before any is
    /// returned; an entry with no message set fails the whole list with
    /// `Type`.
    fn msg_list(&self) -> ChainResult<Vec<Box<dyn Msg>>>;
}

/// Structural checks shared by every batch type.
pub fn validate_batch(count: usize) -> ChainResult<()> {
    if count == 0 {
        return Err(ChainError::empty("batch has no messages").field("Messages"));
    }
    if count > MAX_BATCH_MESSAGES {
        return Err(ChainError::input(format!(
            "batch of {count} messages exceeds the limit of {MAX_BATCH_MESSAGES}"
        ))
        .field("Messages"));
    }
    Ok(())
}

/// Decode the `data` of a delivered batch into per-message results.
pub fn decode_results(data: &[u8]) -> ChainResult<Vec<Vec<u8>>> {
    decode(data)
}

/// Unpacks messages of type `B` and runs the remaining chain on each.
/// Anything else passes through untouched.
pub struct BatchDecorator<B: BatchMsg> {
    _batch: PhantomData<fn() -> B>,
}

impl<B: BatchMsg> BatchDecorator<B> {
    pub fn new() -> Self {
        Self {
            _batch: PhantomData,
        }
    }
}

impl<B: BatchMsg> Default for BatchDecorator<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Inner transaction: one unpacked message plus the outer envelope's
/// authentication and fees.
struct BatchTx<'a> {
    outer: &'a dyn Tx,
    msg: &'a dyn Msg,
}

impl Tx for BatchTx<'_> {
    fn msg(&self) -> ChainResult<&dyn Msg> {
        Ok(self.msg)
    }

    fn signatures(&self) -> &[StdSignature] {
        self.outer.signatures()
    }

    fn sign_bytes(&self) -> ChainResult<Vec<u8>> {
        self.outer.sign_bytes()
    }

    fn fees(&self) -> Option<&FeeInfo> {
        self.outer.fees()
    }
}

fn unpack<B: BatchMsg>(tx: &dyn Tx) -> ChainResult<Option<Vec<Box<dyn Msg>>>> {
    let Some(batch) = tx.msg()?.as_any().downcast_ref::<B>() else {
        return Ok(None);
    };
    batch.validate()?;
    let msgs = batch.msg_list()?;
    validate_batch(msgs.len())?;
    Ok(Some(msgs))
}

impl<B: BatchMsg> Decorator for BatchDecorator<B> {
    fn check(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<CheckResult> {
        let Some(msgs) = unpack::<B>(tx)? else {
            return next.check(ctx, store, tx);
        };
        let mut total = CheckResult::default();
        let mut logs = Vec::with_capacity(msgs.len());
        for (i, msg) in msgs.iter().enumerate() {
            let inner = BatchTx { outer: tx, msg: &**msg };
            let res = next
                .check(ctx, store, &inner)
                .map_err(|e| e.wrap(format!("batch message {i}")))?;
            total.gas_allocated = total.gas_allocated.saturating_add(res.gas_allocated);
            total.gas_payment = total.gas_payment.saturating_add(res.gas_payment);
            if !res.log.is_empty() {
                logs.push(res.log);
            }
        }
        total.log = logs.join("\n");
        Ok(total)
    }

    fn deliver(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<DeliverResult> {
        let Some(msgs) = unpack::<B>(tx)? else {
            return next.deliver(ctx, store, tx);
        };
        let mut total = DeliverResult::default();
        let mut datas = Vec::with_capacity(msgs.len());
        let mut logs = Vec::with_capacity(msgs.len());
        for (i, msg) in msgs.iter().enumerate() {
            let inner = BatchTx { outer: tx, msg: &**msg };
            let res = next
                .deliver(ctx, store, &inner)
                .map_err(|e| e.wrap(format!("batch message {i}")))?;
            datas.push(res.data);
            if !res.log.is_empty() {
                logs.push(res.log);
            }
            total.gas_used = total.gas_used.saturating_add(res.gas_used);
            total.tags.extend(res.tags);
        }
        debug!(messages = datas.len(), gas_used = total.gas_used, "batch delivered");
        total.data = encode(&datas)?;
        total.log = logs.join("\n");
        Ok(total)
    }
}
