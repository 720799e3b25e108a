//! # Genesis Module
//!
//! Initial chain state, loaded from JSON.
//!
//! ## Initialization Sequence
//!
//! 1. Parse the document (file from `CC_GENESIS`, or the dev genesis)
//! 2. Check the chain id against the node configuration
//! 3. Issue wallet balances
//! 4. Store the cash configuration (fee collector and minimal fee)
//! 5. Register user keys with sequence 0
//! 6. Commit as version 1

pub mod builder;

pub use builder::{
    dev_key, GenesisCash, GenesisConfig, GenesisError, GenesisUser, GenesisWallet, DEV_FEE_TICKER,
};
