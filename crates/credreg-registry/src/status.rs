//! # Credential Status
//!
//! Lifecycle per identifier: `Nonexistent → Active → Revoked`. Revoked is
//! terminal. `Expired` is not stored; it is derived from `expires_at` and
//! the reader's clock each time a record is read.

use serde::Serialize;

use credreg_core::{CredentialId, Timestamp};
use credreg_record::CredentialRecord;

/// Status of a stored credential at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    /// Not revoked and not yet expired.
    Active,
    /// Not revoked, but `now >= expires_at`.
    Expired,
    /// Revoked by the issuer.
    Revoked,
}

impl CredentialStatus {
    /// Derive the status of `record` as seen at `now`.
    pub fn at(record: &CredentialRecord, now: Timestamp) -> Self {
        if record.is_revoked() {
            Self::Revoked
        } else if now >= record.fields().expires_at {
            Self::Expired
        } else {
            Self::Active
        }
    }

    /// Lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
        }
    }
}

impl std::fmt::Display for CredentialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record as returned by a read, with its time-derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialEntry {
    /// The key the record is stored under.
    pub id: CredentialId,
    /// The decoded record.
    pub record: CredentialRecord,
    /// Status at `observed_at`.
    pub status: CredentialStatus,
    /// Registry time the status was derived at.
    pub observed_at: Timestamp,
}

impl CredentialEntry {
    /// Build an entry, deriving the status at `now`.
    pub fn new(id: CredentialId, record: CredentialRecord, now: Timestamp) -> Self {
        let status = CredentialStatus::at(&record, now);
        Self {
            id,
            record,
            status,
            observed_at: now,
        }
    }

    /// `!revoked && now < expires_at`.
    pub fn is_active(&self) -> bool {
        self.status == CredentialStatus::Active
    }
}
