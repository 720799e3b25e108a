use cc_02_orm::Versioned;
use cc_07_cron::TASK_ID_LENGTH;
use serde::{Deserialize, Serialize};
use shared_types::{Address, ChainError, ChainResult, FieldErrors, Metadata, UnixTime, Validate};

use super::validate_custom_string;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerState {
    pub st1: i64,
    pub st2: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InnerStateEnum {
    #[default]
    Invalid,
    CaseOne,
    CaseTwo,
}

impl Validate for InnerStateEnum {
    fn validate(&self) -> ChainResult<()> {
        match self {
            InnerStateEnum::Invalid => Err(ChainError::state("unset state")),
            InnerStateEnum::CaseOne | InnerStateEnum::CaseTwo => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub metadata: Metadata,
    pub inner_state: InnerState,
    pub address: Address,
    /// Block time of creation, set by the handler.
    pub created_at: UnixTime,
}

impl Versioned for State {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

impl Validate for State {
    fn validate(&self) -> ChainResult<()> {
        let created_at = if self.created_at.is_zero() {
            Err(ChainError::empty("required"))
        } else {
            self.created_at.validate()
        };
        FieldErrors::new()
            .append("Metadata", self.metadata.validate())
            .append("Address", self.address.validate())
            .append("CreatedAt", created_at)
            .into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedState {
    pub metadata: Metadata,
    pub inner_state_enum: InnerStateEnum,
    pub str: String,
    pub byte: Vec<u8>,
    /// Zero means the record is never deleted automatically.
    pub delete_at: UnixTime,
    /// Scheduled deletion task, empty while none is pending.
    pub delete_task_id: Vec<u8>,
}

impl Versioned for TimedState {
    fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

impl Validate for TimedState {
    fn validate(&self) -> ChainResult<()> {
        let task_id = if !self.delete_task_id.is_empty()
            && self.delete_task_id.len() != TASK_ID_LENGTH
        {
            Err(ChainError::input(format!("must be {TASK_ID_LENGTH} bytes")))
        } else {
            Ok(())
        };
        FieldErrors::new()
            .append("Metadata", self.metadata.validate())
            .append("InnerStateEnum", self.inner_state_enum.validate())
            .append("Str", validate_custom_string(&self.str))
            .append("DeleteAt", self.delete_at.validate())
            .append("DeleteTaskID", task_id)
            .into_result()
    }
}
