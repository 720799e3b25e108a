//! # cc-06-batch
//!
//! Atomic execution of up to [`MAX_BATCH_MESSAGES`] messages inside one
//! transaction.
//!
//! [`BatchDecorator`] recognises a batch message, unpacks it and runs the
//! rest of the chain once per inner message, each time with a derived
//! transaction that keeps the outer signatures and fees. The first failure
//! aborts the whole batch; callers place a savepoint above this decorator
//! so that earlier inner writes are rolled back with it.
//!
//! ## Results
//!
//! | Phase | Combined result |
//! |-------|-----------------|
//! | check | `gas_allocated` and `gas_payment` summed, logs joined |
//! | deliver | `data` = encoded list of inner `data`, gas summed, tags concatenated |

pub mod decorator;

pub use decorator::{decode_results, validate_batch, BatchDecorator, BatchMsg, MAX_BATCH_MESSAGES};
