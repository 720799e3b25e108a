//! # cc-02-orm
//!
//! Versioned persistence over a [`KvStore`](cc_01_kv_store::KvStore).
//!
//! ## Pieces
//!
//! | Type | Responsibility |
//! |------|----------------|
//! | [`ModelBucket`] | Namespaced record storage, id allocation, migrate-on-read |
//! | [`Sequence`] | Monotonic per-bucket counter, 8-byte big-endian ids |
//! | [`MigrationRegistry`] | Per `(package, type)` schema upgrade steps |
//! | [`QueryRouter`] | Path → bucket lookups for client queries |
//!
//! ## Migration Contract
//!
//! - Every record type stored in a bucket must be registered before the
//!   bucket is built; [`ModelBucket::new`] fails with `Human` otherwise.
//! - [`MigrationRegistry::verify`] rejects gaps in registered versions, so a
//!   missing step is found at startup rather than on a later read.
//! - Reads upgrade the decoded value in memory; a record already at the
//!   latest version is returned unchanged.

pub mod bucket;
pub mod domain;
pub mod query;

pub use bucket::{IdPolicy, ModelBucket};
pub use domain::*;
pub use query::{QueryHandler, QueryMode, QueryModel, QueryRouter};
