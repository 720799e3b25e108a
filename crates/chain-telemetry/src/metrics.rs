//! Prometheus metrics for the application.
//!
//! All metrics follow the naming convention: `cc_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., cron_ticks_capped_total)
//! - **Gauge**: Value that can go up or down (e.g., block_height)
//! - **Histogram**: Distribution of values (e.g., tx_deliver_duration_seconds)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, linear_buckets, Counter, CounterVec, Encoder, Gauge, Histogram,
    HistogramOpts, Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // TRANSACTIONS
    // =========================================================================

    /// Check calls by outcome (accepted/rejected)
    pub static ref TXS_CHECKED: CounterVec = CounterVec::new(
        Opts::new("cc_app_txs_checked_total", "Transactions run through check"),
        &["outcome"]
    ).expect("metric creation failed");

    /// Deliver calls by outcome (accepted/rejected)
    pub static ref TXS_DELIVERED: CounterVec = CounterVec::new(
        Opts::new("cc_app_txs_delivered_total", "Transactions run through deliver"),
        &["outcome"]
    ).expect("metric creation failed");

    /// Deliver duration histogram
    pub static ref TX_DELIVER_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "cc_app_tx_deliver_duration_seconds",
            "Time spent delivering one transaction"
        ).buckets(exponential_buckets(0.00001, 2.0, 16).expect("metric creation failed"))
    ).expect("metric creation failed");

    /// Messages per delivered batch
    pub static ref BATCH_SIZE: Histogram = Histogram::with_opts(
        HistogramOpts::new("cc_batch_messages", "Inner messages per batch transaction")
            .buckets(linear_buckets(1.0, 1.0, 10).expect("metric creation failed"))
    ).expect("metric creation failed");

    // =========================================================================
    // CRON
    // =========================================================================

    /// Executed tasks by outcome (success/failure)
    pub static ref CRON_TASKS: CounterVec = CounterVec::new(
        Opts::new("cc_cron_tasks_total", "Scheduled tasks executed"),
        &["outcome"]
    ).expect("metric creation failed");

    /// Ticks that left due tasks for the next block
    pub static ref CRON_TICKS_CAPPED: Counter = Counter::new(
        "cc_cron_ticks_capped_total",
        "Ticks that hit the per-block task cap"
    ).expect("metric creation failed");

    // =========================================================================
    // CHAIN
    // =========================================================================

    /// Height of the block being processed
    pub static ref BLOCK_HEIGHT: Gauge = Gauge::new(
        "cc_chain_block_height",
        "Current block height"
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(TXS_CHECKED.clone()),
        Box::new(TXS_DELIVERED.clone()),
        Box::new(TX_DELIVER_DURATION.clone()),
        Box::new(BATCH_SIZE.clone()),
        Box::new(CRON_TASKS.clone()),
        Box::new(CRON_TICKS_CAPPED.clone()),
        Box::new(BLOCK_HEIGHT.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
