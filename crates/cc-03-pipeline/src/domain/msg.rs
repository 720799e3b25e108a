use std::any::{type_name, Any};
use std::fmt::Debug;

use shared_types::{ChainError, ChainResult, FeeInfo, StdSignature, Validate};

/// Downcasting support for trait objects.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// One requested state transition.
///
/// [`Validate`] is pure: no store access, same answer in check and deliver.
/// Checks that depend on block time live in the handler.
pub trait Msg: AsAny + Validate + Debug + Send + Sync {
    /// Routing path, `"{package}/{action}"`.
    fn path(&self) -> &'static str;
}

/// Envelope around exactly one message.
///
/// Optional capabilities (signatures, fees) default to "absent" so that
/// synthetic transactions only implement what they carry.
pub trait Tx: Send + Sync {
    /// The single active message. Envelopes with none set fail with `Type`.
    fn msg(&self) -> ChainResult<&dyn Msg>;

    fn signatures(&self) -> &[StdSignature] {
        &[]
    }

    /// Bytes covered by signatures (the envelope without its signatures).
    fn sign_bytes(&self) -> ChainResult<Vec<u8>> {
        Err(ChainError::wrong_type("transaction does not support signing"))
    }

    fn fees(&self) -> Option<&FeeInfo> {
        None
    }
}

/// Extract the transaction's message as a concrete type.
pub fn load_msg<M: Msg>(tx: &dyn Tx) -> ChainResult<&M> {
    let msg = tx.msg()?;
    msg.as_any().downcast_ref::<M>().ok_or_else(|| {
        ChainError::wrong_type(format!(
            "expected {}, got {}",
            type_name::<M>(),
            msg.path()
        ))
    })
}

/// Transaction carrying a single boxed message and no signatures.
///
/// Used for synthetic transactions (scheduled tasks) where authentication
/// comes from the context rather than the envelope.
#[derive(Debug)]
pub struct MsgTx {
    msg: Box<dyn Msg>,
    fees: Option<FeeInfo>,
}

impl MsgTx {
    pub fn new(msg: impl Msg) -> Self {
        Self::from_boxed(Box::new(msg))
    }

    pub fn from_boxed(msg: Box<dyn Msg>) -> Self {
        Self { msg, fees: None }
    }

    pub fn with_fees(mut self, fees: FeeInfo) -> Self {
        self.fees = Some(fees);
        self
    }
}

impl Tx for MsgTx {
    fn msg(&self) -> ChainResult<&dyn Msg> {
        Ok(&*self.msg)
    }

    fn fees(&self) -> Option<&FeeInfo> {
        self.fees.as_ref()
    }
}
