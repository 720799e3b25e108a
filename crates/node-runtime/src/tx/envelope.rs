use cc_03_pipeline::Msg;
use cc_04_sigs::{sign_tx, PrivateKey};
use cc_05_cash::SendMsg;
use cc_08_custom::{CreateStateMsg, CreateTimedStateMsg};
use serde::{Deserialize, Serialize};
use shared_types::codec::{decode, encode};
use shared_types::{ChainError, ChainResult, FeeInfo, StdSignature};

use super::batch::ExecuteBatchMsg;

/// Every message a user may submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxSum {
    CashSend(SendMsg),
    CreateState(CreateStateMsg),
    CreateTimedState(CreateTimedStateMsg),
    ExecuteBatch(ExecuteBatchMsg),
}

impl TxSum {
    pub fn as_msg(&self) -> &dyn Msg {
        match self {
            TxSum::CashSend(msg) => msg,
            TxSum::CreateState(msg) => msg,
            TxSum::CreateTimedState(msg) => msg,
            TxSum::ExecuteBatch(msg) => msg,
        }
    }
}

/// Transaction envelope as submitted by clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub sum: Option<TxSum>,
    pub signatures: Vec<StdSignature>,
    pub fees: Option<FeeInfo>,
}

impl Tx {
    pub fn new(sum: TxSum) -> Self {
        Self {
            sum: Some(sum),
            ..Self::default()
        }
    }

    pub fn with_fees(mut self, fees: FeeInfo) -> Self {
        self.fees = Some(fees);
        self
    }

    pub fn encode(&self) -> ChainResult<Vec<u8>> {
        encode(self)
    }

    pub fn decode(raw: &[u8]) -> ChainResult<Self> {
        decode(raw)
    }

    /// Envelope bytes covered by signatures: everything but the signatures.
    pub fn signed_bytes(&self) -> ChainResult<Vec<u8>> {
        encode(&(&self.sum, &self.fees))
    }

    /// Append a signature by `key` at the signer's current `sequence`.
    pub fn sign(mut self, key: &PrivateKey, chain_id: &str, sequence: u64) -> ChainResult<Self> {
        let bytes = self.signed_bytes()?;
        self.signatures.push(sign_tx(key, &bytes, chain_id, sequence));
        Ok(self)
    }
}

impl cc_03_pipeline::Tx for Tx {
    fn msg(&self) -> ChainResult<&dyn Msg> {
        self.sum
            .as_ref()
            .map(TxSum::as_msg)
            .ok_or_else(|| ChainError::wrong_type("transaction carries no message"))
    }

    fn signatures(&self) -> &[StdSignature] {
        &self.signatures
    }

    fn sign_bytes(&self) -> ChainResult<Vec<u8>> {
        self.signed_bytes()
    }

    fn fees(&self) -> Option<&FeeInfo> {
        self.fees.as_ref()
    }
}
