use serde::{Deserialize, Serialize};

/// Key/value event attached to a delivered transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Outcome of a successful check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResult {
    pub data: Vec<u8>,
    pub log: String,
    /// Gas the transaction may consume.
    pub gas_allocated: u64,
    /// Gas the transaction pays for (fees).
    pub gas_payment: u64,
}

impl CheckResult {
    pub fn with_gas(gas_allocated: u64) -> Self {
        Self {
            gas_allocated,
            ..Self::default()
        }
    }
}

/// Outcome of a successful deliver.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliverResult {
    /// Opaque result, typically the id of the record written.
    pub data: Vec<u8>,
    pub log: String,
    pub gas_used: u64,
    pub tags: Vec<Tag>,
}

impl DeliverResult {
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }
}
