//! Durable encoding shared by records, transactions and scheduled tasks.
//!
//! Everything persisted or hashed goes through `bincode` so that the same
//! value always produces the same bytes.

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::{ChainError, ChainResult};

pub fn encode<T: Serialize + ?Sized>(value: &T) -> ChainResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| ChainError::encoding(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> ChainResult<T> {
    bincode::deserialize(bytes).map_err(|e| ChainError::encoding(e.to_string()))
}
