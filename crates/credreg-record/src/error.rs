//! # Record Errors
//!
//! Validation and decode failures. Every variant names the field involved
//! and the expected vs actual value, so a rejected issue is diagnosable
//! without re-running it.

use thiserror::Error;

use credreg_core::Timestamp;

use crate::layout::{Field, RecordVersion};

/// A length constraint on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthRule {
    /// The field must be exactly this many bytes.
    Exactly(usize),
    /// The field may be at most this many bytes.
    AtMost(usize),
}

impl std::fmt::Display for LengthRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exactly(n) => write!(f, "exactly {n}"),
            Self::AtMost(n) => write!(f, "at most {n}"),
        }
    }
}

/// Why a byte sequence is not a well-formed record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// The input length does not match the requested version.
    #[error("{version} record must be {expected} bytes, got {actual}")]
    Length {
        /// Requested version.
        version: RecordVersion,
        /// Declared size for that version.
        expected: usize,
        /// Input length.
        actual: usize,
    },

    /// The input length matches no known version.
    #[error("no record version is {0} bytes long")]
    UnknownLength(usize),

    /// The revoked flag holds something other than 0 or 1.
    #[error("revoked flag must be 0 or 1, got {0}")]
    RevokedFlag(u8),
}

/// Errors raised by the validator and the codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Schema code outside the closed enumeration.
    #[error("invalid schema code {0}: expected 1 (visa), 2 (education), or 3 (employment)")]
    InvalidSchema(u64),

    /// A field failed its exact or maximum length check.
    #[error("{field} must be {rule} bytes, got {actual}")]
    FieldLength {
        /// The offending field.
        field: Field,
        /// The rule it violated.
        rule: LengthRule,
        /// Its actual length.
        actual: usize,
    },

    /// Decode-time structural failure.
    #[error("malformed record: {0}")]
    MalformedRecord(#[from] MalformedReason),

    /// Expiry does not fall after the issue time while the registry
    /// requires it to.
    #[error("expires_at {expires_at} is not after issued_at {issued_at}")]
    ExpiryNotAfterIssue {
        /// Stamped issue time.
        issued_at: Timestamp,
        /// Requested expiry.
        expires_at: Timestamp,
    },
}
