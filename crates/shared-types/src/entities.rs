//! # Core Domain Entities
//!
//! Value types exchanged by every subsystem.
//!
//! ## Clusters
//!
//! - **Identity**: [`Address`], [`Condition`]
//! - **Time**: [`UnixTime`]
//! - **Records**: [`Metadata`], record identifiers ([`sequence_id`], [`validate_id`])
//! - **Value transfer**: [`Coin`], [`FeeInfo`]
//! - **Authentication**: [`StdSignature`]

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{ChainError, ChainResult, FieldErrors};

/// Types that can check their own invariants without store access.
pub trait Validate {
    fn validate(&self) -> ChainResult<()>;
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Length in bytes of every account address.
pub const ADDRESS_LENGTH: usize = 20;

/// A 20-byte account address, derived from a [`Condition`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub Vec<u8>);

impl Address {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Address(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Validate for Address {
    /// Missing and malformed are reported as distinct kinds.
    fn validate(&self) -> ChainResult<()> {
        if self.0.is_empty() {
            return Err(ChainError::empty("address required"));
        }
        if self.0.len() != ADDRESS_LENGTH {
            return Err(ChainError::input(format!(
                "address must be {} bytes, got {}",
                ADDRESS_LENGTH,
                self.0.len()
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(&self.0))
    }
}

/// A permission a transaction can carry: `extension/type/data`.
///
/// Signatures produce `sigs/ed25519/<pubkey>`, modules produce their own
/// conditions (e.g. `custom/timed_state/<id>`) to authenticate scheduled work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Condition {
    pub extension: String,
    pub typ: String,
    pub data: Vec<u8>,
}

impl Condition {
    pub fn new(
        extension: impl Into<String>,
        typ: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            extension: extension.into(),
            typ: typ.into(),
            data: data.into(),
        }
    }

    /// Address controlled by this condition: first 20 bytes of
    /// SHA-256(`extension/type/` ++ data).
    pub fn address(&self) -> Address {
        let mut hasher = Sha256::new();
        hasher.update(self.extension.as_bytes());
        hasher.update(b"/");
        hasher.update(self.typ.as_bytes());
        hasher.update(b"/");
        hasher.update(&self.data);
        let digest = hasher.finalize();
        Address(digest[..ADDRESS_LENGTH].to_vec())
    }
}

impl Validate for Condition {
    fn validate(&self) -> ChainResult<()> {
        FieldErrors::new()
            .append("Extension", non_empty(&self.extension))
            .append("Type", non_empty(&self.typ))
            .into_result()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.extension, self.typ, hex::encode_upper(&self.data))
    }
}

fn non_empty(value: &str) -> ChainResult<()> {
    if value.is_empty() {
        Err(ChainError::empty("required"))
    } else {
        Ok(())
    }
}

// =============================================================================
// TIME
// =============================================================================

/// Seconds since the Unix epoch. Zero is the "unset" sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnixTime(pub i64);

impl UnixTime {
    pub const ZERO: UnixTime = UnixTime(0);

    pub fn now() -> Self {
        UnixTime(Utc::now().timestamp())
    }

    pub fn from_seconds(seconds: i64) -> Self {
        UnixTime(seconds)
    }

    pub fn seconds(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Shift by a signed number of seconds, saturating at the i64 bounds.
    pub fn add_seconds(self, seconds: i64) -> Self {
        UnixTime(self.0.saturating_add(seconds))
    }

    /// `true` if `self` is strictly before `other`.
    pub fn before(self, other: UnixTime) -> bool {
        self.0 < other.0
    }
}

impl Validate for UnixTime {
    fn validate(&self) -> ChainResult<()> {
        if self.0 < 0 {
            return Err(ChainError::input("time before the Unix epoch"));
        }
        Ok(())
    }
}

impl fmt::Display for UnixTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::<Utc>::from_timestamp(self.0, 0) {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}s", self.0),
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// Schema version tag carried by every persisted record and message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metadata {
    pub schema: u32,
}

impl Metadata {
    pub fn new(schema: u32) -> Self {
        Self { schema }
    }
}

impl Validate for Metadata {
    fn validate(&self) -> ChainResult<()> {
        if self.schema == 0 {
            return Err(ChainError::metadata("schema version missing"));
        }
        Ok(())
    }
}

/// Length of generated and caller-supplied record identifiers.
pub const ID_LENGTH: usize = 8;

/// Encode a sequence value as an 8-byte big-endian identifier.
pub fn sequence_id(value: u64) -> Vec<u8> {
    value.to_be_bytes().to_vec()
}

/// Decode an 8-byte big-endian identifier back to its sequence value.
pub fn id_to_sequence(id: &[u8]) -> ChainResult<u64> {
    let bytes: [u8; ID_LENGTH] = id
        .try_into()
        .map_err(|_| ChainError::input("must be 8 bytes"))?;
    Ok(u64::from_be_bytes(bytes))
}

/// A record identifier field: empty is `Empty`, any length but 8 is `Input`.
pub fn validate_id(id: &[u8]) -> ChainResult<()> {
    if id.is_empty() {
        return Err(ChainError::empty("required"));
    }
    if id.len() != ID_LENGTH {
        return Err(ChainError::input("must be 8 bytes"));
    }
    Ok(())
}

// =============================================================================
// VALUE TRANSFER
// =============================================================================

/// An amount of a single currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub ticker: String,
    pub amount: u64,
}

impl Coin {
    pub fn new(ticker: impl Into<String>, amount: u64) -> Self {
        Self {
            ticker: ticker.into(),
            amount,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn same_currency(&self, other: &Coin) -> bool {
        self.ticker == other.ticker
    }

    /// `true` if same currency and at least `other.amount`.
    pub fn is_gte(&self, other: &Coin) -> bool {
        self.same_currency(other) && self.amount >= other.amount
    }

    pub fn checked_add(&self, other: &Coin) -> ChainResult<Coin> {
        if !self.same_currency(other) {
            return Err(ChainError::input(format!(
                "currency mismatch: {} vs {}",
                self.ticker, other.ticker
            )));
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or_else(|| ChainError::overflow("coin amount"))?;
        Ok(Coin::new(self.ticker.clone(), amount))
    }

    pub fn checked_sub(&self, other: &Coin) -> ChainResult<Coin> {
        if !self.same_currency(other) {
            return Err(ChainError::input(format!(
                "currency mismatch: {} vs {}",
                self.ticker, other.ticker
            )));
        }
        let amount = self.amount.checked_sub(other.amount).ok_or_else(|| {
            ChainError::insufficient_amount(format!("have {}, need {}", self, other))
        })?;
        Ok(Coin::new(self.ticker.clone(), amount))
    }
}

impl Validate for Coin {
    /// Tickers are 3 or 4 upper-case ASCII letters.
    fn validate(&self) -> ChainResult<()> {
        let len = self.ticker.len();
        if !(3..=4).contains(&len) || !self.ticker.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ChainError::input(format!("invalid ticker {:?}", self.ticker)));
        }
        Ok(())
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.ticker)
    }
}

/// Who pays how much for a transaction. `payer` defaults to the first signer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeInfo {
    pub payer: Option<Address>,
    pub fees: Option<Coin>,
}

impl Validate for FeeInfo {
    fn validate(&self) -> ChainResult<()> {
        let mut errs = FieldErrors::new();
        if let Some(payer) = &self.payer {
            errs = errs.append("Payer", payer.validate());
        }
        if let Some(fees) = &self.fees {
            errs = errs.append("Fees", fees.validate());
        }
        errs.into_result()
    }
}

// =============================================================================
// AUTHENTICATION
// =============================================================================

/// A signature over a transaction's sign bytes, bound to a signer sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    pub sequence: u64,
    pub pubkey: Vec<u8>,
    pub signature: Vec<u8>,
}

impl Validate for StdSignature {
    fn validate(&self) -> ChainResult<()> {
        let mut errs = FieldErrors::new();
        if self.pubkey.is_empty() {
            errs = errs.push("Pubkey", ChainError::empty("required"));
        }
        if self.signature.is_empty() {
            errs = errs.push("Signature", ChainError::empty("required"));
        }
        errs.into_result()
    }
}
