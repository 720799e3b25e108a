//! # Chain-Cron Test Suite
//!
//! Cross-crate scenarios run against the wired application.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs              # Application, messages, signing helpers
//!     ├── timed_state_lifecycle.rs # create → tick → gone
//!     ├── scheduling.rs            # due-set boundaries, cancellation
//!     ├── batch.rs                 # atomicity and unsupported entries
//!     ├── validation.rs            # check/deliver agreement, id lengths
//!     ├── marshaler.rs             # stored task round trip
//!     ├── migration.rs             # read-time upgrades
//!     └── fees.rs                  # signatures, fees, replay
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p cc-tests
//! cargo test -p cc-tests integration::batch::
//! ```

pub mod integration;
