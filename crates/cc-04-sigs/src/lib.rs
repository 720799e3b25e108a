//! # cc-04-sigs
//!
//! Ed25519 signature authentication for user transactions.
//!
//! ## Flow
//!
//! 1. [`SigCheckDecorator`] verifies every signature on the envelope over
//!    `sign_bytes(chain_id, sequence, tx)`.
//! 2. Each signer's stored sequence must match the signature; it is bumped
//!    on success (replay protection, in check and deliver state alike).
//! 3. The signers' conditions (`sigs/ed25519/<pubkey>`) are attached to the
//!    context under [`SIGS_SOURCE`] for [`authenticator`] to read.
//!
//! Unsigned transactions pass through with no `sigs` conditions; handlers
//! that need a signer fail them with `Unauthorized`.

pub mod decorator;
pub mod domain;

pub use decorator::{authenticator, SigCheckDecorator, SIGS_SOURCE};
pub use domain::*;
