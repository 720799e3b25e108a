//! # cc-03-pipeline
//!
//! Two-phase transaction execution: decorators wrapped around a router that
//! dispatches each message to exactly one handler.
//!
//! ## Execution Flow
//!
//! ```text
//! tx ──→ [Logging] → [Recovery] → [KeyTagger] → [Savepoint] → ... → [Router]
//!                                                                     │
//!                                              path "custom/create_state"
//!                                                                     ↓
//!                                                                 [Handler] ──→ bucket
//! ```
//!
//! Each decorator receives "the rest of the chain" as a [`Handler`] and may
//! run code before and after it, swap the store for a savepoint, or stop
//! the call. Order is fixed by the [`Chain`] builder, outermost first.
//!
//! ## Phases
//!
//! | Phase | Store | Result |
//! |-------|-------|--------|
//! | `check` | check state, reset every commit | [`CheckResult`] with gas estimate |
//! | `deliver` | deliver state, committed per block | [`DeliverResult`] with data and tags |
//!
//! Execution is synchronous and single threaded; the host drives the calls
//! in order and nothing here blocks or spawns.

pub mod auth;
pub mod chain;
pub mod decorators;
pub mod domain;
pub mod ports;
pub mod router;

pub use auth::{ChainAuth, ContextAuthenticator};
pub use chain::{Chain, ChainedHandler};
pub use decorators::{
    with_savepoint, ActionTagger, KeyTagger, Logging, Recovery, Savepoint, ACTION_TAG,
};
pub use domain::*;
pub use ports::*;
pub use router::Router;
