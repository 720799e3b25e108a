//! # cc-07-cron
//!
//! Deadline-driven tasks that re-enter the pipeline as synthetic,
//! self-authenticated transactions.
//!
//! ## Task Lifecycle
//!
//! ```text
//!   schedule(run_at, auth, msg)
//!            │
//!            ▼
//!   ┌──────────────┐  block time ≥ run_at  ┌──────────┐  tick()  ┌───────────┐
//!   │   PENDING    │ ────────────────────→ │   DUE    │ ───────→ │ DELIVERED │
//!   └──────────────┘                       └──────────┘          └───────────┘
//!            │ delete(task_id)                                     (removed,
//!            ▼                                                  result stored)
//!        cancelled
//! ```
//!
//! - Tasks live under `_crontask:`, keyed by `run_at (8B BE) ++ seq (8B BE)`,
//!   so a range scan yields them in deadline order, ties in insertion order.
//! - A popped task is removed before it runs: execution is at most once and
//!   failures are recorded in `cronres`, never retried.
//! - Encoding is delegated to a [`TaskMarshaler`]; the scheduler never looks
//!   inside a task.

pub mod marshaler;
pub mod result;
pub mod scheduler;
pub mod ticker;

pub use marshaler::TaskMarshaler;
pub use result::{register_migrations, register_query, results_bucket, TaskResult, RESULTS_BUCKET};
pub use scheduler::{Scheduler, TaskScheduler, TASK_ID_LENGTH};
pub use ticker::{authenticator, TickReport, Ticker, TickerConfig, CRON_SOURCE};

/// Package name for cron-owned records.
pub const PACKAGE: &str = "cron";
