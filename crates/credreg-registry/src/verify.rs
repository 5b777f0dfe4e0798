//! # Offline Verification
//!
//! Checks a presented claim document against the record stored for it.
//! The checks run in a fixed order and the first failure is the outcome:
//!
//! 1. canonical hash of the claim differs from `cred_hash`
//! 2. record subject differs from the expected holder
//! 3. the claim's `issuer` is not the record's issuer address
//! 4. the claim's `type` does not name the record's schema code
//! 5. revoked flag set
//! 6. expired (`now >= expires_at`)
//!
//! Checks 3 and 4 apply only when the claim is a JSON object carrying that
//! field. A present field must be a string that matches; anything else is a
//! mismatch.
//!
//! Verification never touches the store; the registry reads the record and
//! hands it here.

use serde::Serialize;
use serde_json::Value;

use credreg_core::{hash_claim, Address, CanonicalizationError, CredHash, SchemaCode, Timestamp};
use credreg_record::CredentialRecord;

/// Result of verifying a claim against its record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// Every check passed.
    Valid,
    /// The presented claim is not the one that was issued.
    HashMismatch {
        /// Digest in the record.
        stored: CredHash,
        /// Digest of the presented claim.
        presented: CredHash,
    },
    /// The credential belongs to someone else.
    SubjectMismatch {
        /// Subject in the record.
        stored: Address,
        /// Subject the verifier expected.
        expected: Address,
    },
    /// The claim names a different issuer than the one that wrote the record.
    IssuerMismatch {
        /// Issuer in the record.
        stored: Address,
        /// `issuer` as written in the claim.
        presented: String,
    },
    /// The claim's type is not the record's schema.
    TypeMismatch {
        /// Schema code in the record.
        stored: SchemaCode,
        /// `type` as written in the claim.
        presented: String,
    },
    /// The issuer revoked the credential.
    Revoked,
    /// The credential's expiry has passed.
    Expired {
        /// Stored expiry.
        expires_at: Timestamp,
    },
}

impl VerificationOutcome {
    /// Whether verification succeeded.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Short machine-readable name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::HashMismatch { .. } => "hash_mismatch",
            Self::SubjectMismatch { .. } => "subject_mismatch",
            Self::IssuerMismatch { .. } => "issuer_mismatch",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::Revoked => "revoked",
            Self::Expired { .. } => "expired",
        }
    }
}

impl std::fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => f.write_str("valid"),
            Self::HashMismatch { stored, presented } => write!(
                f,
                "claim hash mismatch: record holds {stored}, claim hashes to {presented}"
            ),
            Self::SubjectMismatch { stored, expected } => {
                write!(f, "subject mismatch: record holds {stored}, expected {expected}")
            }
            Self::IssuerMismatch { stored, presented } => {
                write!(f, "issuer mismatch: record holds {stored}, claim names {presented}")
            }
            Self::TypeMismatch { stored, presented } => write!(
                f,
                "credential type mismatch: record holds {}, claim is {presented}",
                stored.type_name()
            ),
            Self::Revoked => f.write_str("credential has been revoked"),
            Self::Expired { expires_at } => {
                write!(f, "credential expired at {}", expires_at.to_iso8601())
            }
        }
    }
}

/// Verify `claim` against `record` as of `now`.
///
/// # Errors
///
/// Only if the claim cannot be canonicalized. Every verification failure is
/// an `Ok` outcome.
pub fn verify(
    record: &CredentialRecord,
    claim: &impl Serialize,
    expected_subject: &Address,
    now: Timestamp,
) -> Result<VerificationOutcome, CanonicalizationError> {
    let fields = record.fields();
    let claim = serde_json::to_value(claim)?;

    let presented = hash_claim(&claim)?;
    if presented != fields.cred_hash {
        return Ok(VerificationOutcome::HashMismatch {
            stored: fields.cred_hash,
            presented,
        });
    }

    if &fields.subject != expected_subject {
        return Ok(VerificationOutcome::SubjectMismatch {
            stored: fields.subject,
            expected: *expected_subject,
        });
    }

    if let Some(issuer) = claim.get("issuer") {
        let named = issuer.as_str().and_then(|s| Address::from_hex(s).ok());
        if named != Some(fields.issuer) {
            return Ok(VerificationOutcome::IssuerMismatch {
                stored: fields.issuer,
                presented: text_of(issuer),
            });
        }
    }

    if let Some(type_name) = claim.get("type") {
        let named = type_name
            .as_str()
            .and_then(|s| SchemaCode::from_type_name(s).ok());
        if named != Some(fields.schema_code) {
            return Ok(VerificationOutcome::TypeMismatch {
                stored: fields.schema_code,
                presented: text_of(type_name),
            });
        }
    }

    if fields.revoked {
        return Ok(VerificationOutcome::Revoked);
    }
    if now >= fields.expires_at {
        return Ok(VerificationOutcome::Expired {
            expires_at: fields.expires_at,
        });
    }

    Ok(VerificationOutcome::Valid)
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
