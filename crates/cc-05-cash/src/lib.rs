//! # cc-05-cash
//!
//! Coin balances, the `cash/send` message and transaction fees.
//!
//! ## Fees
//!
//! [`FeeDecorator`] sits between signature checks and the deliver
//! savepoint: the fee moves from payer to collector before the message
//! runs, and survives when the message fails.
//!
//! | Config field | Meaning |
//! |--------------|---------|
//! | `collector` | Address receiving every fee |
//! | `minimal_fee` | Lowest fee accepted; zero disables fees |

pub mod controller;
pub mod domain;
pub mod fee;
pub mod handler;

pub use controller::Controller;
pub use domain::*;
pub use fee::FeeDecorator;
pub use handler::{register_query, register_routes, SendHandler};
