//! # cc-01-kv-store
//!
//! Key/value store contracts and the in-memory stores the node runs on.
//!
//! ## Role in System
//!
//! - **Ports**: [`KvStore`] is the only storage surface buckets, handlers and
//!   the scheduler see; [`CommitKvStore`] is what the application commits.
//! - **Savepoints**: [`CacheWrap`] buffers writes over a parent store and is
//!   either written back or dropped.
//! - **Touched keys**: [`RecordingStore`] records every key a handler set or
//!   deleted so tagging middleware can report them.
//!
//! ```text
//! MemStore (committed) ─┬─ CacheWrap (deliver savepoint) ─ RecordingStore ─ handler
//!                       └─ clone (check state, reset on commit)
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
