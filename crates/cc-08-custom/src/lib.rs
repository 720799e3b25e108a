//! # cc-08-custom
//!
//! Sample module with two record kinds: plain [`State`] records and
//! [`TimedState`] records that delete themselves at a deadline.
//!
//! ## Timed Record Lifecycle
//!
//! ```text
//! CreateTimedStateMsg ──→ put record ──→ schedule DeleteTimedStateMsg
//!                          (id = N)        auth = custom/timed_state/N
//!                                                     │
//!                               block time ≥ delete_at │ (cron ticker)
//!                                                     ▼
//!                                  DeleteTimedStateHandler (cron router only)
//!                                                     │
//!                                                     ▼
//!                                              record removed
//! ```
//!
//! | Path | Router | Gas |
//! |------|--------|-----|
//! | `custom/create_state` | user | 100 |
//! | `custom/create_timed_state` | user, batchable | 100 |
//! | `custom/delete_timed_state` | cron | 100 |

pub mod domain;
pub mod handlers;

pub use domain::*;
pub use handlers::{
    register_cron_routes, register_query, register_routes, CreateStateHandler,
    CreateTimedStateHandler, DeleteTimedStateHandler,
};
