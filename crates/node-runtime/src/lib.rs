//! # Node Runtime Library
//!
//! The application wired from the module crates, exposed for the binary
//! and the workspace test suite.
//!
//! ## Modular Structure
//!
//! - `tx/` - Transaction envelope, batch union and cron task encoding
//! - `container/` - Configuration and handler stack wiring
//! - `genesis/` - Genesis document and initial state
//! - `app` - Check/Deliver/BeginBlock/Commit/Query state machine
//! - `runtime` - Dev block loop with a bounded mempool

#![allow(clippy::type_complexity)]

pub mod app;
pub mod container;
pub mod genesis;
pub mod runtime;
pub mod tx;

pub use app::{Application, QueryResponse, TxResponse};
pub use container::{ConfigError, NodeConfig, Stacks};
pub use genesis::{GenesisConfig, GenesisError};
pub use runtime::{BlockSummary, NodeRuntime, SubmitError, TxSubmitter};
pub use tx::{BatchSum, BatchUnion, CronTaskMarshaler, ExecuteBatchMsg, Tx, TxSum};
