//! # Application Container
//!
//! Node configuration and the wiring of module crates into handler stacks.

pub mod config;
pub mod stacks;

pub use config::{ConfigError, NodeConfig, DEFAULT_CHAIN_ID};
pub use stacks::{build_registry, Stacks};
