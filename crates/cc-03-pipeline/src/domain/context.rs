use std::collections::BTreeMap;

use shared_types::{ChainError, ChainResult, Condition, UnixTime};

/// Per-call execution context.
///
/// Carries block identity and the conditions that authenticated the
/// current transaction, grouped by the source that established them
/// (`sigs` for signatures, `cron` for scheduled tasks). Contexts are
/// values: decorators derive a new one rather than mutating the caller's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    chain_id: String,
    height: u64,
    block_time: Option<UnixTime>,
    conditions: BTreeMap<String, Vec<Condition>>,
}

impl Context {
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            ..Self::default()
        }
    }

    pub fn with_height(mut self, height: u64) -> Self {
        self.height = height;
        self
    }

    pub fn with_block_time(mut self, time: UnixTime) -> Self {
        self.block_time = Some(time);
        self
    }

    /// Copy of this context with `conditions` attached under `source`.
    pub fn with_conditions(&self, source: &str, conditions: Vec<Condition>) -> Self {
        let mut next = self.clone();
        next.conditions.insert(source.to_string(), conditions);
        next
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    pub fn height(&self) -> u64 {
        self.height
    }

    /// Current block time; a context without one is a wiring bug.
    pub fn block_time(&self) -> ChainResult<UnixTime> {
        self.block_time
            .ok_or_else(|| ChainError::human("block time not set in context"))
    }

    pub fn conditions(&self, source: &str) -> &[Condition] {
        self.conditions
            .get(source)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
