//! # Chain Telemetry
//!
//! Log subscriber installation and Prometheus metrics for the node.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chain_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     // tracing macros and metrics are live from here on
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `CC_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directives |
//! | `CC_JSON_LOGS` | `false` | JSON lines instead of pretty output |
//! | `CC_SERVICE_NAME` | `chain-cron` | Service name attached to the startup event |

mod config;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, BATCH_SIZE, BLOCK_HEIGHT, CRON_TASKS,
    CRON_TICKS_CAPPED, TXS_CHECKED, TXS_DELIVERED, TX_DELIVER_DURATION,
};
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install log subscriber: {0}")]
    TracingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Install the log subscriber and register all metrics.
///
/// Call once at process start; a second call fails because the global
/// subscriber is already set.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_tracing(config)
}
