use std::sync::Arc;

use cc_02_orm::{no_modification, IdPolicy, MigrationRegistry, ModelBucket, Versioned};
use serde::{Deserialize, Serialize};
use shared_types::{ChainResult, Coin, FieldErrors, Metadata, Validate};

use super::config::CashConfig;
use super::msg::SendMsg;

pub const PACKAGE: &str = "cash";
pub const WALLET_BUCKET: &str = "cash";

/// Coins held by one address, at most one entry per ticker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub metadata: Metadata,
    pub coins: Vec<Coin>,
}

impl Wallet {
    pub fn new(coins: Vec<Coin>) -> Self {
        Self {
            metadata: Metadata::new(1),
            coins,
        }
    }

    pub fn balance(&self, ticker: &str) -> u64 {
        self.coins
            .iter()
            .find(|c| c.ticker == ticker)
            .map_or(0, |c| c.amount)
    }

    pub fn add(&mut self, amount: &Coin) -> ChainResult<()> {
        match self.coins.iter_mut().find(|c| c.same_currency(amount)) {
            Some(coin) => *coin = coin.checked_add(amount)?,
            None => self.coins.push(amount.clone()),
        }
        Ok(())
    }

    pub fn subtract(&mut self, amount: &Coin) -> ChainResult<()> {
        let held = self
            .coins
            .iter()
            .find(|c| c.same_currency(amount))
            .cloned()
            .unwrap_or_else(|| Coin::new(amount.ticker.clone(), 0));
        let left = held.checked_sub(amount)?;
        self.coins.retain(|c| !c.same_currency(amount));
        if !left.is_zero() {
            self.coins.push(left);
        }
        Ok(())
    }
}

impl Versioned for Wallet {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

impl Validate for Wallet {
    fn validate(&self) -> ChainResult<()> {
        let mut errs = FieldErrors::new().append("Metadata", self.metadata.validate());
        for (i, coin) in self.coins.iter().enumerate() {
            errs = errs.append(&format!("Coins.{i}"), coin.validate());
        }
        errs.into_result()
    }
}

pub fn register_migrations(registry: &mut MigrationRegistry) -> ChainResult<()> {
    registry.register::<Wallet, _>(PACKAGE, 1, no_modification)?;
    registry.register::<CashConfig, _>(PACKAGE, 1, no_modification)?;
    registry.register::<SendMsg, _>(PACKAGE, 1, no_modification)
}

pub fn wallet_bucket(migrations: Arc<MigrationRegistry>) -> ChainResult<ModelBucket<Wallet>> {
    ModelBucket::new(WALLET_BUCKET, PACKAGE, IdPolicy::Natural, migrations)
}
