//! # Error Types
//!
//! Every subsystem reports failures through [`ChainError`]: a coded error
//! that carries an [`ErrorKind`] plus a human readable context, or a
//! field-tagged aggregate produced by record and message validation.
//!
//! ## Kinds and Codes
//!
//! | Kind | Code | Typical source |
//! |------|------|----------------|
//! | `Internal` | 1 | Invariant broken inside the node |
//! | `Unauthorized` | 2 | Missing signature or condition |
//! | `NotFound` | 3 | Identifier absent from a bucket or task queue |
//! | `Duplicate` | 4 | Record already exists |
//! | `Human` | 5 | Registration/configuration bug, fail loudly |
//! | `Empty` | 6 | Required field missing |
//! | `State` | 7 | Enum value outside the allowed non-zero set |
//! | `Type` | 8 | Unrecognized message variant |
//! | `InsufficientAmount` | 9 | Fee or balance too small |
//! | `Input` | 10 | Malformed value (length, prefix, shape) |
//! | `Expired` | 11 | Deadline already passed |
//! | `Metadata` | 12 | Missing or unsupported schema version |
//! | `Schema` | 13 | Migration step failed |
//! | `Database` | 14 | Store read or write failed |
//! | `Encoding` | 15 | Serialization failed |
//! | `Panic` | 16 | Handler panicked (recovered) |
//! | `Overflow` | 17 | Arithmetic overflow |
//!
//! ## Field Aggregation
//!
//! Validation never short-circuits. Each field result is appended to a
//! [`FieldErrors`] builder so one response lists every violation:
//!
//! ```rust
//! use shared_types::{ChainError, ErrorKind, FieldErrors};
//!
//! let err = FieldErrors::new()
//!     .append("Metadata", Err(ChainError::metadata("schema version missing")))
//!     .append("Str", Err(ChainError::empty("required")))
//!     .into_result()
//!     .unwrap_err();
//!
//! assert!(err.is(ErrorKind::Metadata));
//! assert!(err.is(ErrorKind::Empty));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used across the workspace.
pub type ChainResult<T> = Result<T, ChainError>;

// =============================================================================
// ERROR KINDS
// =============================================================================

/// Classification of a failure, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Internal,
    Unauthorized,
    NotFound,
    Duplicate,
    Human,
    Empty,
    State,
    Type,
    InsufficientAmount,
    Input,
    Expired,
    Metadata,
    Schema,
    Database,
    Encoding,
    Panic,
    Overflow,
}

impl ErrorKind {
    /// Numeric code reported in transaction responses. Zero is success.
    pub fn code(self) -> u32 {
        match self {
            ErrorKind::Internal => 1,
            ErrorKind::Unauthorized => 2,
            ErrorKind::NotFound => 3,
            ErrorKind::Duplicate => 4,
            ErrorKind::Human => 5,
            ErrorKind::Empty => 6,
            ErrorKind::State => 7,
            ErrorKind::Type => 8,
            ErrorKind::InsufficientAmount => 9,
            ErrorKind::Input => 10,
            ErrorKind::Expired => 11,
            ErrorKind::Metadata => 12,
            ErrorKind::Schema => 13,
            ErrorKind::Database => 14,
            ErrorKind::Encoding => 15,
            ErrorKind::Panic => 16,
            ErrorKind::Overflow => 17,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            ErrorKind::Internal => "internal",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::NotFound => "not found",
            ErrorKind::Duplicate => "duplicate",
            ErrorKind::Human => "coding error",
            ErrorKind::Empty => "empty",
            ErrorKind::State => "invalid state",
            ErrorKind::Type => "invalid type",
            ErrorKind::InsufficientAmount => "insufficient amount",
            ErrorKind::Input => "invalid input",
            ErrorKind::Expired => "expired",
            ErrorKind::Metadata => "invalid metadata",
            ErrorKind::Schema => "invalid schema",
            ErrorKind::Database => "database",
            ErrorKind::Encoding => "encoding",
            ErrorKind::Panic => "panic",
            ErrorKind::Overflow => "overflow",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

// =============================================================================
// CHAIN ERROR
// =============================================================================

/// The error type returned by every handler, bucket and decorator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// A single classified failure.
    #[error("{message}: {kind}")]
    Coded { kind: ErrorKind, message: String },

    /// One or more field-tagged failures collected during validation.
    #[error("{0}")]
    Fields(FieldErrors),
}

macro_rules! coded_constructors {
    ($($name:ident => $kind:ident),* $(,)?) => {
        $(
            #[doc = concat!("Build a `", stringify!($kind), "` error.")]
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorKind::$kind, message)
            }
        )*
    };
}

impl ChainError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        ChainError::Coded {
            kind,
            message: message.into(),
        }
    }

    coded_constructors! {
        internal => Internal,
        unauthorized => Unauthorized,
        not_found => NotFound,
        duplicate => Duplicate,
        human => Human,
        empty => Empty,
        state => State,
        wrong_type => Type,
        insufficient_amount => InsufficientAmount,
        input => Input,
        expired => Expired,
        metadata => Metadata,
        schema => Schema,
        database => Database,
        encoding => Encoding,
        panic => Panic,
        overflow => Overflow,
    }

    /// Kind of this error. For an aggregate, the kind of the first field error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChainError::Coded { kind, .. } => *kind,
            ChainError::Fields(fields) => fields
                .iter()
                .next()
                .map(|(_, err)| err.kind())
                .unwrap_or(ErrorKind::Internal),
        }
    }

    /// True if this error, or any error in the aggregate, has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        match self {
            ChainError::Coded { kind: k, .. } => *k == kind,
            ChainError::Fields(fields) => fields.iter().any(|(_, err)| err.is(kind)),
        }
    }

    /// ABCI-style response code.
    pub fn code(&self) -> u32 {
        self.kind().code()
    }

    /// Prefix additional context to the message.
    pub fn wrap(self, context: impl fmt::Display) -> Self {
        let context = context.to_string();
        match self {
            ChainError::Coded { kind, message } => ChainError::Coded {
                kind,
                message: format!("{context}: {message}"),
            },
            ChainError::Fields(fields) => ChainError::Fields(FieldErrors {
                entries: fields
                    .entries
                    .into_iter()
                    .map(|(name, err)| (name, err.wrap(context.as_str())))
                    .collect(),
            }),
        }
    }

    /// Tag this error with a field name.
    pub fn field(self, name: impl Into<String>) -> Self {
        ChainError::Fields(FieldErrors::new().push(name, self))
    }

    /// The error reported for `name`, if this is an aggregate that has one.
    pub fn field_error(&self, name: &str) -> Option<&ChainError> {
        match self {
            ChainError::Fields(fields) => fields.get(name),
            ChainError::Coded { .. } => None,
        }
    }
}

/// Context helpers for `ChainResult`.
pub trait ResultExt<T> {
    fn wrap_err(self, context: impl fmt::Display) -> ChainResult<T>;
}

impl<T> ResultExt<T> for ChainResult<T> {
    fn wrap_err(self, context: impl fmt::Display) -> ChainResult<T> {
        self.map_err(|e| e.wrap(context))
    }
}

// =============================================================================
// FIELD AGGREGATE
// =============================================================================

/// Ordered collection of `(field, error)` pairs.
///
/// Nested aggregates are flattened with dotted names, so a failing
/// `Metadata` inside `State` is reported as `State.Metadata`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(String, ChainError)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of validating `field`. `Ok` results are ignored.
    pub fn append(self, field: &str, result: ChainResult<()>) -> Self {
        match result {
            Ok(()) => self,
            Err(err) => self.push(field, err),
        }
    }

    /// Record an error for `field`, flattening nested aggregates.
    pub fn push(mut self, field: impl Into<String>, err: ChainError) -> Self {
        let field = field.into();
        match err {
            ChainError::Fields(inner) => {
                for (name, err) in inner.entries {
                    self.entries.push((format!("{field}.{name}"), err));
                }
            }
            coded => self.entries.push((field, coded)),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, field: &str) -> Option<&ChainError> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, err)| err)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChainError)> {
        self.entries.iter().map(|(name, err)| (name.as_str(), err))
    }

    /// Field names in report order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// `Ok(())` if nothing was recorded.
    pub fn into_result(self) -> ChainResult<()> {
        if self.entries.is_empty() {
            Ok(())
        } else {
            Err(ChainError::Fields(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, err)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{name}: {err}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coded_display_and_code() {
        let err = ChainError::input("must be 8 bytes");
        assert_eq!(err.to_string(), "must be 8 bytes: invalid input");
        assert_eq!(err.code(), 10);
        assert!(err.is(ErrorKind::Input));
        assert!(!err.is(ErrorKind::Empty));
    }

    #[test]
    fn test_wrap_prefixes_context() {
        let err = ChainError::not_found("no such key").wrap("load state");
        assert_eq!(err.to_string(), "load state: no such key: not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_field_errors_collects_all() {
        let err = FieldErrors::new()
            .append("Metadata", Err(ChainError::metadata("schema version missing")))
            .append("Address", Ok(()))
            .append("Str", Err(ChainError::empty("required")))
            .into_result()
            .unwrap_err();

        match &err {
            ChainError::Fields(fields) => {
                assert_eq!(fields.names(), vec!["Metadata", "Str"]);
            }
            other => panic!("expected aggregate, got {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::Metadata);
        assert!(err.is(ErrorKind::Empty));
        assert!(err.field_error("Str").is_some());
    }

    #[test]
    fn test_nested_fields_flatten() {
        let inner = FieldErrors::new()
            .append("Schema", Err(ChainError::metadata("missing")))
            .into_result();
        let outer = FieldErrors::new().append("Metadata", inner);
        assert_eq!(outer.names(), vec!["Metadata.Schema"]);
    }

    #[test]
    fn test_empty_aggregate_is_ok() {
        assert!(FieldErrors::new().append("A", Ok(())).into_result().is_ok());
    }

    #[test]
    fn test_result_ext_wrap() {
        let res: ChainResult<()> = Err(ChainError::database("closed"));
        let err = res.wrap_err("commit").unwrap_err();
        assert!(err.to_string().starts_with("commit: closed"));
    }
}
