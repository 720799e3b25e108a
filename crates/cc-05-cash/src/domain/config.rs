use cc_01_kv_store::KvStore;
use cc_02_orm::{MigrationRegistry, Versioned};
use serde::{Deserialize, Serialize};
use shared_types::codec::{decode, encode};
use shared_types::{Address, ChainError, ChainResult, Coin, FieldErrors, Metadata, Validate};

use super::wallet::PACKAGE;

const CONFIG_KEY: &[u8] = b"_c:cash";

/// Fee settings, written at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashConfig {
    pub metadata: Metadata,
    pub collector: Address,
    pub minimal_fee: Coin,
}

impl CashConfig {
    pub fn new(collector: Address, minimal_fee: Coin) -> Self {
        Self {
            metadata: Metadata::new(1),
            collector,
            minimal_fee,
        }
    }

    pub fn load(store: &dyn KvStore, migrations: &MigrationRegistry) -> ChainResult<Self> {
        let raw = store
            .get(CONFIG_KEY)?
            .ok_or_else(|| ChainError::not_found("cash configuration"))?;
        let mut config: CashConfig = decode(&raw)?;
        migrations.migrate(PACKAGE, &mut config)?;
        Ok(config)
    }

    pub fn save(&self, store: &mut dyn KvStore) -> ChainResult<()> {
        self.validate()?;
        store.set(CONFIG_KEY.to_vec(), encode(self)?)
    }
}

impl Versioned for CashConfig {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

impl Validate for CashConfig {
    fn validate(&self) -> ChainResult<()> {
        let mut errs = FieldErrors::new()
            .append("Metadata", self.metadata.validate())
            .append("Collector", self.collector.validate());
        // A zero minimal fee may leave the ticker unset.
        if !self.minimal_fee.is_zero() {
            errs = errs.append("MinimalFee", self.minimal_fee.validate());
        }
        errs.into_result()
    }
}
