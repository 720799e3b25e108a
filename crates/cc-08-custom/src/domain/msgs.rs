use cc_02_orm::Versioned;
use cc_03_pipeline::Msg;
use serde::{Deserialize, Serialize};
use shared_types::{
    validate_id, Address, ChainError, ChainResult, FieldErrors, Metadata, UnixTime, Validate,
};

use super::models::{InnerState, InnerStateEnum};
use super::validate_custom_string;

pub const CREATE_STATE_PATH: &str = "custom/create_state";
pub const CREATE_TIMED_STATE_PATH: &str = "custom/create_timed_state";
pub const DELETE_TIMED_STATE_PATH: &str = "custom/delete_timed_state";

macro_rules! versioned {
    ($($ty:ty),*) => {
        $(
            impl Versioned for $ty {
                fn metadata(&self) -> &Metadata {
                    &self.metadata
                }

                fn metadata_mut(&mut self) -> &mut Metadata {
                    &mut self.metadata
                }
            }
        )*
    };
}

versioned!(CreateStateMsg, CreateTimedStateMsg, DeleteTimedStateMsg);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStateMsg {
    pub metadata: Metadata,
    pub inner_state: InnerState,
    pub address: Address,
}

impl Msg for CreateStateMsg {
    fn path(&self) -> &'static str {
        CREATE_STATE_PATH
    }
}

impl Validate for CreateStateMsg {
    fn validate(&self) -> ChainResult<()> {
        FieldErrors::new()
            .append("Metadata", self.metadata.validate())
            .append("Address", self.address.validate())
            .into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTimedStateMsg {
    pub metadata: Metadata,
    pub inner_state_enum: InnerStateEnum,
    pub str: String,
    pub byte: Vec<u8>,
    pub delete_at: UnixTime,
}

impl CreateTimedStateMsg {
    /// Full validation against the block being processed. A zero deadline
    /// is exempt; anything else may not lie strictly in the past. Reported
    /// together with every stateless field error.
    pub fn validate_at(&self, now: UnixTime) -> ChainResult<()> {
        let delete_at = if !self.delete_at.is_zero() && self.delete_at.before(now) {
            Err(ChainError::input(format!(
                "delete time {} is before block time {}",
                self.delete_at, now
            )))
        } else {
            self.delete_at.validate()
        };
        self.field_errors(delete_at).into_result()
    }

    fn field_errors(&self, delete_at: ChainResult<()>) -> FieldErrors {
        FieldErrors::new()
            .append("Metadata", self.metadata.validate())
            .append("InnerStateEnum", self.inner_state_enum.validate())
            .append("Str", validate_custom_string(&self.str))
            .append("DeleteAt", delete_at)
    }
}

impl Msg for CreateTimedStateMsg {
    fn path(&self) -> &'static str {
        CREATE_TIMED_STATE_PATH
    }
}

impl Validate for CreateTimedStateMsg {
    fn validate(&self) -> ChainResult<()> {
        self.field_errors(self.delete_at.validate()).into_result()
    }
}

/// Issued by the scheduler only; users cannot route it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTimedStateMsg {
    pub metadata: Metadata,
    pub timed_state_id: Vec<u8>,
}

impl Msg for DeleteTimedStateMsg {
    fn path(&self) -> &'static str {
        DELETE_TIMED_STATE_PATH
    }
}

impl Validate for DeleteTimedStateMsg {
    fn validate(&self) -> ChainResult<()> {
        FieldErrors::new()
            .append("Metadata", self.metadata.validate())
            .append("TimedStateID", validate_id(&self.timed_state_id))
            .into_result()
    }
}
