use cc_03_pipeline::Msg;
use shared_types::{ChainResult, Condition};

/// Encode boundary between an authenticated message and its stored form.
///
/// The set of supported messages is closed: an implementation must fail
/// with `Type` on anything it does not explicitly know, at schedule time
/// rather than when the task comes due.
pub trait TaskMarshaler: Send + Sync {
    fn marshal_task(&self, auth: &[Condition], msg: &dyn Msg) -> ChainResult<Vec<u8>>;

    fn unmarshal_task(&self, raw: &[u8]) -> ChainResult<(Vec<Condition>, Box<dyn Msg>)>;
}
