use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use cc_01_kv_store::KvStore;
use shared_types::{ChainError, ChainResult};
use tracing::error;

use crate::domain::{CheckResult, Context, DeliverResult, Tx};
use crate::ports::{Decorator, Handler};

/// Turns a panic anywhere below into a `Panic` error.
///
/// Place it outside the savepoints so partial writes of the panicking call
/// are discarded with the error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recovery;

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn recover<T>(run: impl FnOnce() -> ChainResult<T>) -> ChainResult<T> {
    catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|payload| {
        let msg = panic_message(payload);
        error!(panic = %msg, "recovered from handler panic");
        Err(ChainError::panic(msg))
    })
}

impl Decorator for Recovery {
    fn check(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<CheckResult> {
        recover(|| next.check(ctx, store, tx))
    }

    fn deliver(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        tx: &dyn Tx,
        next: &dyn Handler,
    ) -> ChainResult<DeliverResult> {
        recover(|| next.deliver(ctx, store, tx))
    }
}
