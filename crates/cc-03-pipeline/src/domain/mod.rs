pub mod context;
pub mod msg;
pub mod results;

pub use context::Context;
pub use msg::{load_msg, AsAny, Msg, MsgTx, Tx};
pub use results::{CheckResult, DeliverResult, Tag};
