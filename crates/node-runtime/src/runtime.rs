//! # Dev Block Loop
//!
//! Stand-in for an external consensus engine. Checked transactions queue in
//! a bounded mempool; every interval the loop begins a block at wall-clock
//! time, delivers the queue in arrival order and commits.
//!
//! ```text
//!   submit(raw) ─→ check_tx ─ok─→ mempool ──┐
//!                                           ▼
//!   interval ─→ begin_block (cron tick) → deliver_tx* → commit
//! ```

use std::sync::Arc;
use std::time::Duration;

use cc_01_kv_store::CommitId;
use cc_07_cron::TickReport;
use parking_lot::Mutex;
use shared_types::{ChainResult, UnixTime};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use crate::app::{Application, TxResponse};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("mempool is full")]
    MempoolFull,

    #[error("node is shutting down")]
    Closed,
}

/// Client handle: checks a transaction against the check state and queues
/// it for the next block.
#[derive(Clone)]
pub struct TxSubmitter {
    app: Arc<Mutex<Application>>,
    queue: mpsc::Sender<Vec<u8>>,
}

impl TxSubmitter {
    /// Rejected transactions are returned without being queued.
    pub fn submit(&self, raw: Vec<u8>) -> Result<TxResponse, SubmitError> {
        let response = self.app.lock().check_tx(&raw);
        if response.is_ok() {
            self.queue.try_send(raw).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => SubmitError::MempoolFull,
                mpsc::error::TrySendError::Closed(_) => SubmitError::Closed,
            })?;
        }
        Ok(response)
    }
}

/// What one produced block did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSummary {
    pub height: u64,
    pub time: UnixTime,
    pub tick: TickReport,
    pub delivered: usize,
    pub rejected: usize,
    pub commit: CommitId,
}

pub struct NodeRuntime {
    app: Arc<Mutex<Application>>,
    queue_tx: mpsc::Sender<Vec<u8>>,
    queue_rx: mpsc::Receiver<Vec<u8>>,
    interval: Duration,
}

impl NodeRuntime {
    pub fn new(app: Application, interval: Duration, mempool_capacity: usize) -> Self {
        let (queue_tx, queue_rx) = mpsc::channel(mempool_capacity.max(1));
        Self {
            app: Arc::new(Mutex::new(app)),
            queue_tx,
            queue_rx,
            interval,
        }
    }

    pub fn submitter(&self) -> TxSubmitter {
        TxSubmitter {
            app: Arc::clone(&self.app),
            queue: self.queue_tx.clone(),
        }
    }

    pub fn app(&self) -> Arc<Mutex<Application>> {
        Arc::clone(&self.app)
    }

    /// Produce one block at `time`, clamped to never run backwards.
    pub fn produce_block(&mut self, time: UnixTime) -> ChainResult<BlockSummary> {
        let mut app = self.app.lock();
        let height = app.height() + 1;
        let time = if time.before(app.block_time()) {
            app.block_time()
        } else {
            time
        };

        let tick = app.begin_block(height, time)?;
        let mut delivered = 0;
        let mut rejected = 0;
        while let Ok(raw) = self.queue_rx.try_recv() {
            if app.deliver_tx(&raw).is_ok() {
                delivered += 1;
            } else {
                rejected += 1;
            }
        }
        let commit = app.commit()?;

        Ok(BlockSummary {
            height,
            time,
            tick,
            delivered,
            rejected,
            commit,
        })
    }

    /// Produce blocks until `shutdown` flips to `true` or its sender drops.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> ChainResult<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        info!(interval_ms = self.interval.as_millis() as u64, "block production started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.produce_block(UnixTime::now()) {
                        Ok(block) => info!(
                            height = block.height,
                            txs = block.delivered,
                            rejected = block.rejected,
                            cron_tasks = block.tick.executed,
                            "block produced"
                        ),
                        Err(e) => {
                            error!(error = %e, "block production failed");
                            return Err(e);
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("block production stopped");
                        return Ok(());
                    }
                }
            }
        }
    }
}
