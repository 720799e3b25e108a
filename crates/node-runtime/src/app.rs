//! # Application
//!
//! The state machine a consensus engine drives:
//!
//! | Call | Store | Effect |
//! |------|-------|--------|
//! | `init_chain` | deliver | genesis, first commit |
//! | `begin_block` | deliver | cron tick at the block time |
//! | `check_tx` | check | speculative run, kept for later checks in the same block |
//! | `deliver_tx` | deliver | final run |
//! | `commit` | deliver | seal version, reset check and query views |
//! | `query` | committed | bucket reads |
//!
//! Calls are serialized by the caller. Nothing here runs concurrently.

use cc_01_kv_store::{CommitId, CommitKvStore, MemStore};
use cc_02_orm::QueryModel;
use cc_03_pipeline::{Context, Handler, Tag};
use cc_07_cron::{TickReport, TickerConfig};
use chain_telemetry::{
    HistogramTimer, BATCH_SIZE, BLOCK_HEIGHT, CRON_TASKS, CRON_TICKS_CAPPED, TXS_CHECKED,
    TXS_DELIVERED, TX_DELIVER_DURATION,
};
use serde::{Deserialize, Serialize};
use shared_types::{ChainError, ChainResult, UnixTime};
use tracing::{debug, info};

use crate::container::Stacks;
use crate::genesis::{GenesisConfig, GenesisError};
use crate::tx::{Tx, TxSum};

/// Outcome of one check or deliver call. `code` 0 is success, anything
/// else is the error kind's code with the error text in `log`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    pub code: u32,
    pub log: String,
    /// Path of the message the transaction carried, when it decoded.
    pub path: String,
    pub data: Vec<u8>,
    pub gas_wanted: u64,
    pub gas_used: u64,
    pub tags: Vec<Tag>,
}

impl TxResponse {
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }

    fn failed(path: String, err: &ChainError) -> Self {
        Self {
            code: err.code(),
            log: err.to_string(),
            path,
            ..Self::default()
        }
    }
}

/// Bucket read against the last committed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub height: u64,
    pub models: Vec<QueryModel>,
}

pub struct Application {
    chain_id: String,
    stacks: Stacks,
    deliver: MemStore,
    check: MemStore,
    committed: MemStore,
    height: u64,
    block_time: UnixTime,
}

impl Application {
    pub fn new(chain_id: impl Into<String>, ticker: TickerConfig) -> ChainResult<Self> {
        Ok(Self {
            chain_id: chain_id.into(),
            stacks: Stacks::build(ticker)?,
            deliver: MemStore::new(),
            check: MemStore::new(),
            committed: MemStore::new(),
            height: 0,
            block_time: UnixTime::ZERO,
        })
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Height of the last block begun.
    pub fn height(&self) -> u64 {
        self.height
    }

    pub fn block_time(&self) -> UnixTime {
        self.block_time
    }

    pub fn stacks(&self) -> &Stacks {
        &self.stacks
    }

    pub fn last_commit(&self) -> CommitId {
        self.deliver.last_commit()
    }

    /// Apply genesis at `time` and commit it. Only valid on a fresh
    /// application.
    pub fn init_chain(
        &mut self,
        time: UnixTime,
        genesis: &GenesisConfig,
    ) -> Result<CommitId, GenesisError> {
        if !self.deliver.is_empty() || self.deliver.last_commit().version > 0 {
            return Err(ChainError::human("chain already initialized").into());
        }
        self.block_time = time;
        genesis.apply(&self.chain_id, &mut self.deliver, &self.stacks)?;
        Ok(self.commit()?)
    }

    /// Start block `height` at `time` and run every due task.
    pub fn begin_block(&mut self, height: u64, time: UnixTime) -> ChainResult<TickReport> {
        if height <= self.height {
            return Err(ChainError::input(format!(
                "block height {height} does not follow {}",
                self.height
            )));
        }
        if time.before(self.block_time) {
            return Err(ChainError::input(format!(
                "block time {time} is before {}",
                self.block_time
            )));
        }
        self.height = height;
        self.block_time = time;
        BLOCK_HEIGHT.set(height as f64);

        let ctx = self.context();
        let report = self.stacks.ticker.tick(&ctx, &mut self.deliver)?;
        CRON_TASKS
            .with_label_values(&["success"])
            .inc_by((report.executed - report.failed) as f64);
        CRON_TASKS
            .with_label_values(&["failure"])
            .inc_by(report.failed as f64);
        if report.capped {
            CRON_TICKS_CAPPED.inc();
        }
        debug!(height, time = %time, executed = report.executed, "block begun");
        Ok(report)
    }

    pub fn check_tx(&mut self, raw: &[u8]) -> TxResponse {
        let ctx = self.context();
        let res = run(raw, |tx| self.stacks.user.check(&ctx, &mut self.check, tx));
        let response = match res {
            Ok((path, res)) => TxResponse {
                path,
                data: res.data,
                log: res.log,
                gas_wanted: res.gas_allocated,
                ..TxResponse::default()
            },
            Err((path, err)) => TxResponse::failed(path, &err),
        };
        TXS_CHECKED.with_label_values(&[outcome(&response)]).inc();
        response
    }

    pub fn deliver_tx(&mut self, raw: &[u8]) -> TxResponse {
        let _timer = HistogramTimer::new(&TX_DELIVER_DURATION);
        let ctx = self.context();
        let res = run(raw, |tx| {
            let res = self.stacks.user.deliver(&ctx, &mut self.deliver, tx)?;
            if let Some(TxSum::ExecuteBatch(batch)) = &tx.sum {
                BATCH_SIZE.observe(batch.messages.len() as f64);
            }
            Ok(res)
        });
        let response = match res {
            Ok((path, res)) => TxResponse {
                path,
                data: res.data,
                log: res.log,
                gas_used: res.gas_used,
                tags: res.tags,
                ..TxResponse::default()
            },
            Err((path, err)) => TxResponse::failed(path, &err),
        };
        TXS_DELIVERED.with_label_values(&[outcome(&response)]).inc();
        response
    }

    /// Seal the deliver state and reset the check and query views to it.
    pub fn commit(&mut self) -> ChainResult<CommitId> {
        let id = self.deliver.commit()?;
        self.check = self.deliver.clone();
        self.committed = self.deliver.clone();
        info!(
            height = self.height,
            version = id.version,
            app_hash = %hex::encode(id.hash),
            "state committed"
        );
        Ok(id)
    }

    /// Read from the last committed state. A `?prefix` suffix on `path`
    /// switches from exact id to prefix scan.
    pub fn query(&self, path: &str, data: &[u8]) -> ChainResult<QueryResponse> {
        let models = self.stacks.queries.query(&self.committed, path, data)?;
        Ok(QueryResponse {
            height: self.height,
            models,
        })
    }

    fn context(&self) -> Context {
        Context::new(self.chain_id.clone())
            .with_height(self.height)
            .with_block_time(self.block_time)
    }
}

/// Decode `raw` and hand it to `op`, keeping the message path for the
/// response either way.
fn run<T>(
    raw: &[u8],
    op: impl FnOnce(&Tx) -> ChainResult<T>,
) -> Result<(String, T), (String, ChainError)> {
    let tx = Tx::decode(raw).map_err(|e| (String::new(), e))?;
    let path = tx
        .sum
        .as_ref()
        .map(|sum| sum.as_msg().path().to_string())
        .unwrap_or_default();
    match op(&tx) {
        Ok(res) => Ok((path, res)),
        Err(err) => Err((path, err)),
    }
}

fn outcome(response: &TxResponse) -> &'static str {
    if response.is_ok() {
        "accepted"
    } else {
        "rejected"
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("chain_id", &self.chain_id)
            .field("height", &self.height)
            .field("block_time", &self.block_time)
            .field("last_commit", &self.deliver.last_commit())
            .finish()
    }
}
