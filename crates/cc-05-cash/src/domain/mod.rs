pub mod config;
pub mod msg;
pub mod wallet;

pub use config::CashConfig;
pub use msg::{SendMsg, SEND_PATH};
pub use wallet::{register_migrations, wallet_bucket, Wallet, PACKAGE, WALLET_BUCKET};
