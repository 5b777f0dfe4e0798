//! # Credential Claim Document
//!
//! The off-registry document an issuer hands to the credential holder. Its
//! canonical hash is what the registry record stores in `cred_hash`; the
//! document itself lives wherever the record's content pointer says.
//!
//! Field names serialize in camelCase to match the documents verifiers
//! already receive.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::digest::{hash_claim, CredHash};
use crate::error::{CanonicalizationError, CoreError};
use crate::schema::SchemaCode;
use crate::temporal::Timestamp;

/// A structured credential claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDocument {
    /// Credential type name, e.g. `"VisaCredential"`.
    #[serde(rename = "type")]
    pub credential_type: String,
    /// The registry key this document is issued under.
    pub credential_id: String,
    /// Human-readable issuer identifier.
    pub issuer: String,
    /// Human-readable subject identifier.
    pub subject: String,
    /// Category-specific claim body.
    pub claim: Map<String, Value>,
    /// RFC 3339 issuance time as written by the issuer.
    pub issued_at: String,
    /// Optional RFC 3339 start of validity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    /// RFC 3339 expiry time.
    pub expires_at: String,
}

impl CredentialDocument {
    /// Canonical hash of the whole document.
    pub fn hash(&self) -> Result<CredHash, CanonicalizationError> {
        hash_claim(self)
    }

    /// The schema code implied by the document's type name.
    pub fn schema_code(&self) -> Result<SchemaCode, CoreError> {
        SchemaCode::from_type_name(&self.credential_type)
    }

    /// The document's expiry as epoch seconds.
    pub fn expires_at_timestamp(&self) -> Result<Timestamp, CoreError> {
        let dt = DateTime::parse_from_rfc3339(&self.expires_at).map_err(|e| {
            CoreError::InvalidTimestamp {
                value: self.expires_at.clone(),
                reason: e.to_string(),
            }
        })?;
        u64::try_from(dt.timestamp())
            .map(Timestamp::from_epoch_secs)
            .map_err(|_| CoreError::InvalidTimestamp {
                value: self.expires_at.clone(),
                reason: "before the Unix epoch".to_string(),
            })
    }
}
