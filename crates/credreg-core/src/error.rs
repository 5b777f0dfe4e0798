//! # Error Types
//!
//! Errors raised by the foundational types. Record- and registry-level
//! failures live in their own crates and wrap these where needed.

use thiserror::Error;

/// Error while parsing or constructing a core identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A hex string contained a non-hex character or had odd length.
    #[error("invalid hex for {what}: {reason}")]
    InvalidHex {
        /// What was being parsed (e.g. "address").
        what: &'static str,
        /// Why parsing failed.
        reason: String,
    },

    /// A fixed-width value had the wrong number of bytes.
    #[error("{what} must be exactly {expected} bytes, got {actual}")]
    WrongLength {
        /// What was being constructed.
        what: &'static str,
        /// Required byte length.
        expected: usize,
        /// Actual byte length.
        actual: usize,
    },

    /// A bounded value exceeded its maximum width.
    #[error("{what} must be at most {max} bytes, got {actual}")]
    TooLong {
        /// What was being constructed.
        what: &'static str,
        /// Maximum byte length.
        max: usize,
        /// Actual byte length.
        actual: usize,
    },

    /// A schema code or credential type name outside the enumeration.
    #[error("unknown schema: {0}")]
    UnknownSchema(String),

    /// A timestamp string that is not valid RFC 3339.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Parser message.
        reason: String,
    },
}

/// Error during canonical serialization of a claim.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// The claim could not be represented as a JSON value.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
