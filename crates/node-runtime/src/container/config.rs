//! # Node Configuration
//!
//! Runtime parameters of the dev-mode node. Every field has a default and
//! an environment override.
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `CC_CHAIN_ID` | `chain_id` | `chain-cron-dev` |
//! | `CC_BLOCK_INTERVAL_MS` | `block_interval_ms` | `1000` |
//! | `CC_MAX_CRON_TASKS_PER_TICK` | `max_cron_tasks_per_tick` | `256` |
//! | `CC_MEMPOOL_CAPACITY` | `mempool_capacity` | `1024` |
//! | `CC_GENESIS` | `genesis_path` | unset (built-in dev genesis) |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_CHAIN_ID: &str = "chain-cron-dev";

/// Complete node configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    /// Chain id bound into every signature.
    pub chain_id: String,
    /// Time between produced blocks.
    pub block_interval_ms: u64,
    /// Scheduled tasks executed per block at most.
    pub max_cron_tasks_per_tick: usize,
    /// Checked transactions waiting for the next block at most.
    pub mempool_capacity: usize,
    /// Genesis document. `None` starts from the dev genesis.
    pub genesis_path: Option<PathBuf>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID.to_string(),
            block_interval_ms: 1_000,
            max_cron_tasks_per_tick: 256,
            mempool_capacity: 1_024,
            genesis_path: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: cannot parse {value:?}")]
    Parse { var: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("chain id must be 1 to 255 bytes")]
    ChainId,
}

impl NodeConfig {
    /// Defaults overridden from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(chain_id) = lookup("CC_CHAIN_ID") {
            config.chain_id = chain_id;
        }
        if let Some(value) = lookup("CC_BLOCK_INTERVAL_MS") {
            config.block_interval_ms = parse("CC_BLOCK_INTERVAL_MS", value)?;
        }
        if let Some(value) = lookup("CC_MAX_CRON_TASKS_PER_TICK") {
            config.max_cron_tasks_per_tick = parse("CC_MAX_CRON_TASKS_PER_TICK", value)?;
        }
        if let Some(value) = lookup("CC_MEMPOOL_CAPACITY") {
            config.mempool_capacity = parse("CC_MEMPOOL_CAPACITY", value)?;
        }
        if let Some(path) = lookup("CC_GENESIS") {
            config.genesis_path = Some(PathBuf::from(path));
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // Sign bytes carry the chain id behind a one-byte length.
        if self.chain_id.is_empty() || self.chain_id.len() > u8::MAX as usize {
            return Err(ConfigError::ChainId);
        }
        if self.block_interval_ms == 0 {
            return Err(ConfigError::Zero("block_interval_ms"));
        }
        if self.max_cron_tasks_per_tick == 0 {
            return Err(ConfigError::Zero("max_cron_tasks_per_tick"));
        }
        if self.mempool_capacity == 0 {
            return Err(ConfigError::Zero("mempool_capacity"));
        }
        Ok(())
    }

    pub fn block_interval(&self) -> Duration {
        Duration::from_millis(self.block_interval_ms)
    }
}

fn parse<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Parse { var, value })
}
