use cc_02_orm::Versioned;
use cc_03_pipeline::Msg;
use serde::{Deserialize, Serialize};
use shared_types::{Address, ChainError, ChainResult, Coin, FieldErrors, Metadata, Validate};

pub const SEND_PATH: &str = "cash/send";

const MAX_MEMO_LENGTH: usize = 128;

/// Move coins between two addresses. The source must authorize it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMsg {
    pub metadata: Metadata,
    pub source: Address,
    pub destination: Address,
    pub amount: Coin,
    pub memo: String,
}

impl Msg for SendMsg {
    fn path(&self) -> &'static str {
        SEND_PATH
    }
}

impl Versioned for SendMsg {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

impl Validate for SendMsg {
    fn validate(&self) -> ChainResult<()> {
        let amount = if self.amount.is_zero() {
            Err(ChainError::input("amount must be positive"))
        } else {
            self.amount.validate()
        };
        let memo = if self.memo.len() > MAX_MEMO_LENGTH {
            Err(ChainError::input(format!("memo longer than {MAX_MEMO_LENGTH} bytes")))
        } else {
            Ok(())
        };
        FieldErrors::new()
            .append("Metadata", self.metadata.validate())
            .append("Source", self.source.validate())
            .append("Destination", self.destination.validate())
            .append("Amount", amount)
            .append("Memo", memo)
            .into_result()
    }
}
