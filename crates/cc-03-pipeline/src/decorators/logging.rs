use std::time::Instant;

use cc_01_kv_store::KvStore;
use shared_types::ChainResult;
use tracing::{debug, info, warn};

use crate::domain::{CheckResult, Context, DeliverResult, Tx};
use crate::ports::{Decorator, Handler};

/// Logs every call with its message path, outcome and duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logging;

fn path_of(tx: &dyn Tx) -> &'static str {
    tx.msg().map(|m| m.path()).unwrap_or("<none>")
}

impl Decorator for Logging {
    fn check(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<CheckResult> {
        let start = Instant::now();
        let res = next.check(ctx, store, tx);
        let elapsed_us = start.elapsed().as_micros() as u64;
        match &res {
            Ok(r) => debug!(
                path = path_of(tx),
                height = ctx.height(),
                gas = r.gas_allocated,
                elapsed_us,
                "check ok"
            ),
            Err(e) => debug!(
                path = path_of(tx),
                height = ctx.height(),
                code = e.code(),
                error = %e,
                elapsed_us,
                "check failed"
            ),
        }
        res
    }

    fn deliver(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<DeliverResult> {
        let start = Instant::now();
        let res = next.deliver(ctx, store, tx);
        let elapsed_us = start.elapsed().as_micros() as u64;
        match &res {
            Ok(r) => info!(
                path = path_of(tx),
                height = ctx.height(),
                gas = r.gas_used,
                tags = r.tags.len(),
                elapsed_us,
                "deliver ok"
            ),
            Err(e) => warn!(
                path = path_of(tx),
                height = ctx.height(),
                code = e.code(),
                error = %e,
                elapsed_us,
                "deliver failed"
            ),
        }
        res
    }
}
