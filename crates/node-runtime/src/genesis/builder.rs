//! # Genesis Document
//!
//! Addresses and keys are hex strings so the document stays editable by
//! hand:
//!
//! ```json
//! {
//!   "chain_id": "chain-cron-dev",
//!   "wallets": [{ "address": "…40 hex…", "coins": [{ "ticker": "CRN", "amount": 1000 }] }],
//!   "cash": { "collector": "…40 hex…", "minimal_fee": { "ticker": "CRN", "amount": 0 } },
//!   "users": [{ "pubkey": "…64 hex…" }]
//! }
//! ```

use std::path::{Path, PathBuf};

use cc_01_kv_store::KvStore;
use cc_04_sigs::{PrivateKey, PublicKey, UserData};
use cc_05_cash::CashConfig;
use serde::{Deserialize, Serialize};
use shared_types::{Address, ChainError, Coin};
use thiserror::Error;
use tracing::info;

use crate::container::Stacks;

/// Currency of the dev genesis.
pub const DEV_FEE_TICKER: &str = "CRN";

/// Genesis loading and application errors.
#[derive(Debug, Error)]
pub enum GenesisError {
    #[error("failed to read genesis file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid genesis document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field}: invalid hex: {source}")]
    Hex {
        field: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("genesis chain id {found:?} does not match node chain id {expected:?}")]
    ChainIdMismatch { expected: String, found: String },

    #[error("failed to apply genesis: {0}")]
    Chain(#[from] ChainError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisWallet {
    pub address: String,
    pub coins: Vec<Coin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisCash {
    pub collector: String,
    pub minimal_fee: Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisUser {
    pub pubkey: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    pub chain_id: String,
    #[serde(default)]
    pub wallets: Vec<GenesisWallet>,
    pub cash: GenesisCash,
    #[serde(default)]
    pub users: Vec<GenesisUser>,
}

impl GenesisConfig {
    pub fn from_json(json: &str) -> Result<Self, GenesisError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, GenesisError> {
        let json = std::fs::read_to_string(path).map_err(|source| GenesisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, GenesisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Single funded user whose key is derived from a fixed seed. Fees are
    /// disabled and collected by that same user.
    pub fn dev(chain_id: &str) -> Self {
        let key = dev_key();
        let pubkey = key.public_key();
        let address = hex::encode(pubkey.address().as_bytes());
        Self {
            chain_id: chain_id.to_string(),
            wallets: vec![GenesisWallet {
                address: address.clone(),
                coins: vec![Coin::new(DEV_FEE_TICKER, 1_000_000)],
            }],
            cash: GenesisCash {
                collector: address,
                minimal_fee: Coin::new(DEV_FEE_TICKER, 0),
            },
            users: vec![GenesisUser {
                pubkey: hex::encode(pubkey.as_bytes()),
            }],
        }
    }

    /// Write the initial state. The store is expected to be empty.
    pub fn apply(
        &self,
        chain_id: &str,
        store: &mut dyn KvStore,
        stacks: &Stacks,
    ) -> Result<(), GenesisError> {
        if self.chain_id != chain_id {
            return Err(GenesisError::ChainIdMismatch {
                expected: chain_id.to_string(),
                found: self.chain_id.clone(),
            });
        }

        for (i, wallet) in self.wallets.iter().enumerate() {
            let address = parse_address(&format!("wallets.{i}.address"), &wallet.address)?;
            for coin in &wallet.coins {
                stacks.cash.issue(store, &address, coin)?;
            }
        }

        let collector = parse_address("cash.collector", &self.cash.collector)?;
        let mut config = CashConfig::new(collector, self.cash.minimal_fee.clone());
        config.metadata.schema = stacks
            .migrations
            .latest_version::<CashConfig>(cc_05_cash::PACKAGE)?;
        config.save(store)?;

        for (i, user) in self.users.iter().enumerate() {
            let field = format!("users.{i}.pubkey");
            let raw = decode_hex(&field, &user.pubkey)?;
            let pubkey = PublicKey::from_bytes(&raw).map_err(|e| e.wrap(&field))?;
            let mut record = UserData::new(raw);
            record.metadata.schema = stacks.users.schema()?;
            stacks
                .users
                .put(store, pubkey.address().as_bytes(), &record)?;
        }

        info!(
            chain_id,
            wallets = self.wallets.len(),
            users = self.users.len(),
            minimal_fee = %self.cash.minimal_fee,
            "genesis applied"
        );
        Ok(())
    }
}

/// Signing key of the dev genesis user.
pub fn dev_key() -> PrivateKey {
    PrivateKey::from_seed([7u8; 32])
}

fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>, GenesisError> {
    hex::decode(value).map_err(|source| GenesisError::Hex {
        field: field.to_string(),
        source,
    })
}

fn parse_address(field: &str, value: &str) -> Result<Address, GenesisError> {
    let address = Address::new(decode_hex(field, value)?);
    shared_types::Validate::validate(&address).map_err(|e| e.wrap(field))?;
    Ok(address)
}
