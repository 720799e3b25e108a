//! Balance bookkeeping shared by the send handler and the fee decorator.

use std::sync::Arc;

use cc_01_kv_store::KvStore;
use cc_02_orm::{MigrationRegistry, ModelBucket};
use shared_types::{Address, ChainError, ChainResult, Coin, Validate};
use tracing::debug;

use crate::domain::{wallet_bucket, Wallet};

#[derive(Debug, Clone)]
pub struct Controller {
    wallets: ModelBucket<Wallet>,
}

impl Controller {
    pub fn new(migrations: Arc<MigrationRegistry>) -> ChainResult<Self> {
        Ok(Self {
            wallets: wallet_bucket(migrations)?,
        })
    }

    pub fn wallets(&self) -> &ModelBucket<Wallet> {
        &self.wallets
    }

    /// Coins held by `addr`; unknown addresses hold nothing.
    pub fn balance(&self, store: &dyn KvStore, addr: &Address) -> ChainResult<Vec<Coin>> {
        Ok(self
            .wallets
            .get(store, addr.as_bytes())?
            .map(|w| w.coins)
            .unwrap_or_default())
    }

    /// Create coins out of thin air. Only genesis does this.
    pub fn issue(&self, store: &mut dyn KvStore, dest: &Address, amount: &Coin) -> ChainResult<()> {
        check_amount(amount)?;
        let mut wallet = self.load_or_default(store, dest)?;
        wallet.add(amount)?;
        self.wallets.put(store, dest.as_bytes(), &wallet)?;
        Ok(())
    }

    /// Move `amount` from `src` to `dest`. Nothing is written on failure.
    pub fn move_coins(
        &self,
        store: &mut dyn KvStore,
        src: &Address,
        dest: &Address,
        amount: &Coin,
    ) -> ChainResult<()> {
        check_amount(amount)?;
        let mut from = self
            .wallets
            .get(store, src.as_bytes())?
            .ok_or_else(|| ChainError::insufficient_amount(format!("{src} holds no coins")))?;
        from.subtract(amount)?;

        if src == dest {
            return Ok(());
        }
        let mut to = self.load_or_default(store, dest)?;
        to.add(amount)?;

        self.wallets.put(store, src.as_bytes(), &from)?;
        self.wallets.put(store, dest.as_bytes(), &to)?;
        debug!(%src, %dest, %amount, "coins moved");
        Ok(())
    }

    fn load_or_default(&self, store: &dyn KvStore, addr: &Address) -> ChainResult<Wallet> {
        match self.wallets.get(store, addr.as_bytes())? {
            Some(wallet) => Ok(wallet),
            None => {
                let mut wallet = Wallet::new(Vec::new());
                wallet.metadata.schema = self.wallets.schema()?;
                Ok(wallet)
            }
        }
    }
}

fn check_amount(amount: &Coin) -> ChainResult<()> {
    if amount.is_zero() {
        return Err(ChainError::input("amount must be positive"));
    }
    amount.validate()
}
