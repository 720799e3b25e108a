//! Shared builders for the integration scenarios.

use cc_05_cash::{SendMsg, Wallet};
use cc_07_cron::TickerConfig;
use cc_08_custom::{CreateStateMsg, CreateTimedStateMsg, InnerState, InnerStateEnum};
use node_runtime::genesis::{dev_key, DEV_FEE_TICKER};
use node_runtime::{Application, GenesisConfig, Tx, TxSum};
use shared_types::codec::decode;
use shared_types::{Address, Coin, Metadata, UnixTime};

pub const CHAIN: &str = "integration-chain";

/// Genesis time. Block `n` in these scenarios runs at `T0 + n` unless a
/// test needs a jump.
pub const T0: i64 = 1_700_000_000;

pub fn at(offset: i64) -> UnixTime {
    UnixTime::from_seconds(T0 + offset)
}

pub fn app_with(genesis: &GenesisConfig) -> Application {
    let mut app = Application::new(CHAIN, TickerConfig::default()).unwrap();
    app.init_chain(at(0), genesis).unwrap();
    app
}

pub fn app() -> Application {
    app_with(&GenesisConfig::dev(CHAIN))
}

pub fn create_state(address: Address) -> CreateStateMsg {
    CreateStateMsg {
        metadata: Metadata::new(1),
        inner_state: InnerState { st1: 7, st2: -7 },
        address,
    }
}

pub fn timed(delete_at: UnixTime) -> CreateTimedStateMsg {
    CreateTimedStateMsg {
        metadata: Metadata::new(1),
        inner_state_enum: InnerStateEnum::CaseOne,
        str: "cstm-integration".to_string(),
        byte: vec![0xab, 0xcd],
        delete_at,
    }
}

pub fn send(destination: Address, amount: u64) -> SendMsg {
    SendMsg {
        metadata: Metadata::new(1),
        source: dev_key().public_key().address(),
        destination,
        amount: Coin::new(DEV_FEE_TICKER, amount),
        memo: "integration".to_string(),
    }
}

pub fn unsigned(sum: TxSum) -> Vec<u8> {
    Tx::new(sum).encode().unwrap()
}

pub fn signed(tx: Tx, sequence: u64) -> Vec<u8> {
    tx.sign(&dev_key(), CHAIN, sequence).unwrap().encode().unwrap()
}

/// Decoded record at `path` under `id` in the committed state.
pub fn fetch<T: serde::de::DeserializeOwned>(
    app: &Application,
    path: &str,
    id: &[u8],
) -> Option<T> {
    app.query(path, id)
        .unwrap()
        .models
        .first()
        .map(|m| decode(&m.value).unwrap())
}

pub fn count(app: &Application, path: &str) -> usize {
    app.query(&format!("{path}?prefix"), &[]).unwrap().models.len()
}

pub fn balance(app: &Application, address: &Address) -> u64 {
    fetch::<Wallet>(app, "/wallets", address.as_bytes())
        .map(|w| w.balance(DEV_FEE_TICKER))
        .unwrap_or(0)
}
