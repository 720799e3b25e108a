use cc_03_pipeline::Msg;
use cc_05_cash::SendMsg;
use cc_06_batch::{validate_batch, BatchMsg};
use cc_08_custom::{CreateStateMsg, CreateTimedStateMsg};
use serde::de::{self, DeserializeOwned};
use serde::ser;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use shared_types::codec::{decode, encode};
use shared_types::{ChainError, ChainResult, FieldErrors, Metadata, Validate};

pub const BATCH_PATH: &str = "batch/execute";

/// Messages allowed inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchSum {
    CashSend(SendMsg),
    CreateState(CreateStateMsg),
    CreateTimedState(CreateTimedStateMsg),
}

impl BatchSum {
    fn into_msg(self) -> Box<dyn Msg> {
        match self {
            BatchSum::CashSend(msg) => Box::new(msg),
            BatchSum::CreateState(msg) => Box::new(msg),
            BatchSum::CreateTimedState(msg) => Box::new(msg),
        }
    }
}

/// One batch slot. An unset slot is a message this application does not
/// know how to batch.
///
/// On the wire a slot is `(tag, payload)` with the message bincode-encoded
/// in `payload`, so an unknown tag decodes to an unset slot instead of
/// failing the whole envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchUnion {
    pub sum: Option<BatchSum>,
}

const UNSET_TAG: u32 = 0;
const CASH_SEND_TAG: u32 = 1;
const CREATE_STATE_TAG: u32 = 2;
const CREATE_TIMED_STATE_TAG: u32 = 3;

#[derive(Serialize, Deserialize)]
struct WireSlot {
    tag: u32,
    payload: Vec<u8>,
}

impl Serialize for BatchUnion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (tag, payload) = match &self.sum {
            None => (UNSET_TAG, Ok(Vec::new())),
            Some(BatchSum::CashSend(msg)) => (CASH_SEND_TAG, encode(msg)),
            Some(BatchSum::CreateState(msg)) => (CREATE_STATE_TAG, encode(msg)),
            Some(BatchSum::CreateTimedState(msg)) => (CREATE_TIMED_STATE_TAG, encode(msg)),
        };
        let payload = payload.map_err(<S::Error as ser::Error>::custom)?;
        WireSlot { tag, payload }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BatchUnion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let slot = WireSlot::deserialize(deserializer)?;
        let sum = match slot.tag {
            CASH_SEND_TAG => Some(BatchSum::CashSend(payload::<_, D::Error>(&slot)?)),
            CREATE_STATE_TAG => Some(BatchSum::CreateState(payload::<_, D::Error>(&slot)?)),
            CREATE_TIMED_STATE_TAG => {
                Some(BatchSum::CreateTimedState(payload::<_, D::Error>(&slot)?))
            }
            _ => None,
        };
        Ok(Self { sum })
    }
}

fn payload<T: DeserializeOwned, E: de::Error>(slot: &WireSlot) -> Result<T, E> {
    decode(&slot.payload).map_err(E::custom)
}

impl From<BatchSum> for BatchUnion {
    fn from(sum: BatchSum) -> Self {
        Self { sum: Some(sum) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteBatchMsg {
    pub metadata: Metadata,
    pub messages: Vec<BatchUnion>,
}

impl ExecuteBatchMsg {
    pub fn new(messages: impl IntoIterator<Item = BatchSum>) -> Self {
        Self {
            metadata: Metadata::new(1),
            messages: messages.into_iter().map(BatchUnion::from).collect(),
        }
    }
}

impl Msg for ExecuteBatchMsg {
    fn path(&self) -> &'static str {
        BATCH_PATH
    }
}

impl Validate for ExecuteBatchMsg {
    fn validate(&self) -> ChainResult<()> {
        FieldErrors::new()
            .append("Metadata", self.metadata.validate())
            .into_result()?;
        validate_batch(self.messages.len())
    }
}

impl BatchMsg for ExecuteBatchMsg {
    fn msg_list(&self) -> ChainResult<Vec<Box<dyn Msg>>> {
        self.messages
            .iter()
            .enumerate()
            .map(|(i, union)| {
                union.sum.clone().map(BatchSum::into_msg).ok_or_else(|| {
                    ChainError::wrong_type(format!("batch message {i}: unsupported message type"))
                })
            })
            .collect()
    }
}
