use std::sync::Arc;

use cc_02_orm::{no_modification, IdPolicy, MigrationRegistry, ModelBucket, Versioned};
use serde::{Deserialize, Serialize};
use shared_types::{ChainError, ChainResult, FieldErrors, Metadata, Validate};

pub const PACKAGE: &str = "sigs";

/// Bucket holding one [`UserData`] per signer address.
pub const USER_BUCKET: &str = "sigs";

/// Replay-protection state of a signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub metadata: Metadata,
    pub pubkey: Vec<u8>,
    /// Sequence the next signature must carry.
    pub sequence: u64,
}

impl UserData {
    pub fn new(pubkey: Vec<u8>) -> Self {
        Self {
            metadata: Metadata::new(1),
            pubkey,
            sequence: 0,
        }
    }
}

impl Versioned for UserData {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

impl Validate for UserData {
    fn validate(&self) -> ChainResult<()> {
        let mut errs = FieldErrors::new().append("Metadata", self.metadata.validate());
        if self.pubkey.is_empty() {
            errs = errs.push("Pubkey", ChainError::empty("required"));
        }
        errs.into_result()
    }
}

pub fn register_migrations(registry: &mut MigrationRegistry) -> ChainResult<()> {
    registry.register::<UserData, _>(PACKAGE, 1, no_modification)
}

pub fn user_bucket(migrations: Arc<MigrationRegistry>) -> ChainResult<ModelBucket<UserData>> {
    ModelBucket::new(USER_BUCKET, PACKAGE, IdPolicy::Natural, migrations)
}
