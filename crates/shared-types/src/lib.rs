//! # Shared Types Crate
//!
//! Errors and value types shared by every subsystem of the node.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: cross-crate types (addresses, conditions,
//!   block time, schema metadata, coins) are defined here and nowhere else.
//! - **Coded Errors**: every failure carries an [`ErrorKind`] with a stable
//!   numeric code; validation returns field-tagged aggregates.
//! - **Deterministic Encoding**: [`codec`] is the only path to durable bytes.

pub mod codec;
pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
