//! # Registry Errors
//!
//! Every failure the registry reports to a caller. Record-level rejections
//! (schema, field length, malformed bytes) pass through unchanged from
//! `credreg-record`, so a caller sees the same error kind whether the
//! validator or the decoder raised it.
//!
//! Nothing here is retried internally. A failed `issue` or `revoke` leaves
//! the store exactly as it was.

use thiserror::Error;

use credreg_core::{Address, CanonicalizationError, CredentialId};
use credreg_record::RecordError;

use crate::backend::BoxError;

/// Errors returned by [`crate::Registry`] operations.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The caller is not the registry's issuer.
    #[error("caller {caller} is not the registry issuer")]
    Unauthorized {
        /// Address that attempted the write.
        caller: Address,
    },

    /// `issue` on an identifier that already holds a record.
    #[error("credential {0} already exists")]
    DuplicateKey(CredentialId),

    /// The identifier holds no record.
    #[error("credential {0} not found")]
    NotFound(CredentialId),

    /// Validation or decode failure from the record layer.
    #[error(transparent)]
    Record(#[from] RecordError),

    /// A claim passed to `verify` could not be canonicalized.
    #[error("claim hashing failed: {0}")]
    Claim(#[from] CanonicalizationError),

    /// The storage substrate refused a write the registry considered valid.
    #[error("store fault: {0}")]
    Store(#[source] BoxError),
}

/// Coarse classification of a [`RegistryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller is not the issuer.
    Unauthorized,
    /// Identifier already in use.
    DuplicateKey,
    /// Identifier unknown.
    NotFound,
    /// Schema code outside the enumeration.
    InvalidSchema,
    /// A field failed its length rule.
    FieldLength,
    /// Stored bytes are not a well-formed record.
    MalformedRecord,
    /// Issue time ordering rejected by configuration.
    Expiry,
    /// Claim canonicalization failed.
    Claim,
    /// Substrate fault.
    Store,
}

impl ErrorKind {
    /// Stable name used in logs and CLI output.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::DuplicateKey => "duplicate_key",
            Self::NotFound => "not_found",
            Self::InvalidSchema => "invalid_schema",
            Self::FieldLength => "field_length",
            Self::MalformedRecord => "malformed_record",
            Self::Expiry => "expiry",
            Self::Claim => "claim",
            Self::Store => "store",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RegistryError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::DuplicateKey(_) => ErrorKind::DuplicateKey,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Record(RecordError::InvalidSchema(_)) => ErrorKind::InvalidSchema,
            Self::Record(RecordError::FieldLength { .. }) => ErrorKind::FieldLength,
            Self::Record(RecordError::MalformedRecord(_)) => ErrorKind::MalformedRecord,
            Self::Record(RecordError::ExpiryNotAfterIssue { .. }) => ErrorKind::Expiry,
            Self::Claim(_) => ErrorKind::Claim,
            Self::Store(_) => ErrorKind::Store,
        }
    }
}
