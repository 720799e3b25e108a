//! Wire types of this application.
//!
//! | Type | Carries | Closed set |
//! |------|---------|------------|
//! | [`Tx`] | one user message, signatures, fees | [`TxSum`] |
//! | [`ExecuteBatchMsg`] | up to ten user messages | [`BatchSum`] |
//! | [`CronTask`] | stored conditions and one cron message | [`CronTaskSum`] |

pub mod batch;
pub mod envelope;
pub mod marshaler;

pub use batch::{BatchUnion, BatchSum, ExecuteBatchMsg, BATCH_PATH};
pub use envelope::{Tx, TxSum};
pub use marshaler::{CronTask, CronTaskMarshaler, CronTaskSum};
