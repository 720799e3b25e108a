use std::sync::Arc;

use cc_02_orm::{no_modification, IdPolicy, MigrationRegistry, ModelBucket, QueryRouter, Versioned};
use serde::{Deserialize, Serialize};
use shared_types::{ChainResult, FieldErrors, Metadata, UnixTime, Validate};

use crate::PACKAGE;

pub const RESULTS_BUCKET: &str = "cronres";

/// Outcome of one executed task, stored under the task id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    pub metadata: Metadata,
    pub successful: bool,
    /// Delivery log on success, the error on failure.
    pub info: String,
    pub exec_time: UnixTime,
    pub exec_height: u64,
}

impl Versioned for TaskResult {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

impl Validate for TaskResult {
    fn validate(&self) -> ChainResult<()> {
        FieldErrors::new()
            .append("Metadata", self.metadata.validate())
            .append("ExecTime", self.exec_time.validate())
            .into_result()
    }
}

pub fn register_migrations(registry: &mut MigrationRegistry) -> ChainResult<()> {
    registry.register::<TaskResult, _>(PACKAGE, 1, no_modification)
}

pub fn results_bucket(migrations: Arc<MigrationRegistry>) -> ChainResult<ModelBucket<TaskResult>> {
    ModelBucket::new(RESULTS_BUCKET, PACKAGE, IdPolicy::Natural, migrations)
}

pub fn register_query(
    queries: &mut QueryRouter,
    results: &ModelBucket<TaskResult>,
) -> ChainResult<()> {
    queries.register("/cronres", Arc::new(results.clone()))
}
