use std::sync::Arc;

use cc_01_kv_store::KvStore;
use cc_02_orm::ModelBucket;
use cc_03_pipeline::{with_savepoint, Context, ContextAuthenticator, DeliverResult, Handler, MsgTx};
use shared_types::{ChainResult, Metadata, UnixTime};
use tracing::{debug, info, warn};

use crate::result::TaskResult;
use crate::scheduler::TaskScheduler;

/// Context source under which a task's stored conditions are published.
pub const CRON_SOURCE: &str = "cron";

/// Authenticator over the conditions stored with the running task.
pub const fn authenticator() -> ContextAuthenticator {
    ContextAuthenticator::new(CRON_SOURCE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickerConfig {
    /// Tasks executed per block at most. Due tasks over the cap wait for
    /// the next block, still in deadline order.
    pub max_tasks_per_tick: usize,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            max_tasks_per_tick: 256,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub executed: usize,
    pub failed: usize,
    /// More tasks were due than the cap allowed.
    pub capped: bool,
}

/// Pops due tasks at the start of each block and delivers them through the
/// cron handler stack.
pub struct Ticker {
    scheduler: Arc<TaskScheduler>,
    handler: Arc<dyn Handler>,
    results: ModelBucket<TaskResult>,
    config: TickerConfig,
}

impl Ticker {
    pub fn new(
        scheduler: Arc<TaskScheduler>,
        handler: Arc<dyn Handler>,
        results: ModelBucket<TaskResult>,
        config: TickerConfig,
    ) -> Self {
        Self {
            scheduler,
            handler,
            results,
            config,
        }
    }

    pub fn config(&self) -> &TickerConfig {
        &self.config
    }

    /// Run every task due at the context's block time, up to the cap.
    ///
    /// Task failures are recorded and do not stop the tick. Store errors
    /// while popping or recording do.
    pub fn tick(&self, ctx: &Context, store: &mut dyn KvStore) -> ChainResult<TickReport> {
        let now = ctx.block_time()?;
        let cap = self.config.max_tasks_per_tick;
        let mut due = self.scheduler.due(store, now, cap.saturating_add(1))?;

        let mut report = TickReport {
            capped: due.len() > cap,
            ..TickReport::default()
        };
        due.truncate(cap);
        let schema = self.results.schema()?;

        for (task_id, raw) in due {
            self.scheduler.remove(store, &task_id)?;
            let outcome = with_savepoint(store, |s| self.run_task(ctx, s, &raw));

            let result = match outcome {
                Ok(res) => {
                    debug!(
                        task_id = %hex::encode(&task_id),
                        height = ctx.height(),
                        "task executed"
                    );
                    task_result(schema, true, res.log, now, ctx.height())
                }
                Err(err) => {
                    warn!(
                        task_id = %hex::encode(&task_id),
                        height = ctx.height(),
                        code = err.code(),
                        error = %err,
                        "task failed"
                    );
                    report.failed += 1;
                    task_result(schema, false, err.to_string(), now, ctx.height())
                }
            };
            self.results.put(store, &task_id, &result)?;
            report.executed += 1;
        }

        if report.executed > 0 {
            info!(
                height = ctx.height(),
                executed = report.executed,
                failed = report.failed,
                capped = report.capped,
                "cron tick"
            );
        }
        Ok(report)
    }

    fn run_task(
        &self,
        ctx: &Context,
        store: &mut dyn KvStore,
        raw: &[u8],
    ) -> ChainResult<DeliverResult> {
        let (auth, msg) = self.scheduler.marshaler().unmarshal_task(raw)?;
        let task_ctx = ctx.with_conditions(CRON_SOURCE, auth);
        self.handler.deliver(&task_ctx, store, &MsgTx::from_boxed(msg))
    }
}

fn task_result(
    schema: u32,
    successful: bool,
    info: String,
    exec_time: UnixTime,
    exec_height: u64,
) -> TaskResult {
    TaskResult {
        metadata: Metadata::new(schema),
        successful,
        info,
        exec_time,
        exec_height,
    }
}
