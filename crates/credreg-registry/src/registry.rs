//! # Registry — Issue, Revoke, Read
//!
//! The keyed credential registry. Writes go through the authority check,
//! the validator and the codec before touching the store; reads decode
//! whatever the store holds and derive status against the registry clock.
//!
//! ## Write paths
//!
//! - **issue**: authorize, duplicate pre-check, validate, stamp
//!   `issued_at` from the registry clock, encode, then one atomic create.
//!   The create itself also rejects an existing key, which settles two
//!   racing issues on the same identifier.
//!
//! - **revoke**: authorize, then a single one-byte replace at the
//!   `revoked` offset for the stored record's version. No other byte of
//!   the record is rewritten.

use std::sync::Arc;

use serde::Serialize;

use credreg_core::{Address, AssetRef, Clock, CredentialId, SystemClock};
use credreg_record::{
    check_expiry, decode_any, encode, field_offset, validate_issue, CredentialRecord, Field,
    IssueInput, MalformedReason, RecordError, RecordVersion,
};

use crate::authority::AuthorityContext;
use crate::backend::{BoxError, BoxStore, MemoryBoxStore};
use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::status::CredentialEntry;
use crate::verify::{verify, VerificationOutcome};

/// Revoked flag value written by `revoke`.
const REVOKED: u8 = 1;

/// What a successful `revoke` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevokeOutcome {
    /// The flag moved from 0 to 1.
    Revoked,
    /// The flag was already 1 and was rewritten with the same value.
    AlreadyRevoked,
}

/// A credential registry over a [`BoxStore`].
pub struct Registry<S: BoxStore = MemoryBoxStore> {
    authority: AuthorityContext,
    config: RegistryConfig,
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: BoxStore> std::fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("issuer", self.authority.issuer())
            .field("record_version", &self.config.record_version)
            .field("records", &self.store.len())
            .finish()
    }
}

impl Registry<MemoryBoxStore> {
    /// An empty in-memory registry on the system clock.
    pub fn in_memory(config: RegistryConfig) -> Self {
        Self::new(config, MemoryBoxStore::new(), Arc::new(SystemClock))
    }
}

impl<S: BoxStore> Registry<S> {
    /// Build a registry over `store`, timestamping with `clock`.
    pub fn new(config: RegistryConfig, store: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            authority: AuthorityContext::new(config.issuer),
            config,
            store,
            clock,
        }
    }

    /// The authorized issuer.
    pub fn issuer(&self) -> &Address {
        self.authority.issuer()
    }

    /// Layout new records are written in.
    pub fn record_version(&self) -> RecordVersion {
        self.config.record_version
    }

    /// The registry's configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create the record for `id`.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `caller` is not the issuer.
    /// - `DuplicateKey` if `id` already holds a record.
    /// - `Record(..)` for any validator rejection.
    ///
    /// On every error path the store is unchanged.
    pub fn issue(
        &self,
        caller: &Address,
        id: &CredentialId,
        input: &IssueInput<'_>,
    ) -> Result<CredentialRecord, RegistryError> {
        self.authority.authorize(caller, "issue")?;

        if self.store.contains(id.as_bytes()) {
            return Err(RegistryError::DuplicateKey(id.clone()));
        }

        let version = self.config.record_version;
        let validated = validate_issue(input, version)?;

        let issued_at = self.clock.now();
        check_expiry(issued_at, validated.expires_at, self.config.require_future_expiry)?;

        let record = validated.into_record(*self.authority.issuer(), issued_at);
        let bytes = encode(&record);

        self.store
            .create(id.as_bytes(), version.record_len(), &bytes)
            .map_err(|e| match e {
                BoxError::Exists => RegistryError::DuplicateKey(id.clone()),
                other => RegistryError::Store(other),
            })?;

        tracing::info!(
            credential_id = %id,
            subject = %record.fields().subject,
            schema = %record.fields().schema_code,
            issued_at = issued_at.epoch_secs(),
            expires_at = record.fields().expires_at.epoch_secs(),
            version = %version,
            "credential issued"
        );

        Ok(record)
    }

    /// Set the revoked flag of `id`.
    ///
    /// Revoking an already-revoked record rewrites the same byte and
    /// reports [`RevokeOutcome::AlreadyRevoked`]; it is not an error.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if `caller` is not the issuer.
    /// - `NotFound` if `id` holds no record.
    /// - `MalformedRecord` if the stored box has no known record length.
    pub fn revoke(
        &self,
        caller: &Address,
        id: &CredentialId,
    ) -> Result<RevokeOutcome, RegistryError> {
        self.authority.authorize(caller, "revoke")?;

        let size = self
            .store
            .size(id.as_bytes())
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        let version = RecordVersion::from_len(size)
            .ok_or(RecordError::MalformedRecord(MalformedReason::UnknownLength(size)))?;
        let span = field_offset(Field::Revoked, version)
            .ok_or(RecordError::MalformedRecord(MalformedReason::UnknownLength(size)))?;

        let previous = self
            .store
            .replace(id.as_bytes(), span.start, &[REVOKED])
            .map_err(|e| match e {
                BoxError::Missing => RegistryError::NotFound(id.clone()),
                other => RegistryError::Store(other),
            })?;

        if previous.as_slice() == [REVOKED] {
            tracing::debug!(credential_id = %id, "credential already revoked");
            Ok(RevokeOutcome::AlreadyRevoked)
        } else {
            tracing::info!(credential_id = %id, "credential revoked");
            Ok(RevokeOutcome::Revoked)
        }
    }

    /// Read and decode the record for `id`, with status as of now.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `id` holds no record.
    /// - `Record(..)` if the stored bytes do not decode.
    pub fn get(&self, id: &CredentialId) -> Result<CredentialEntry, RegistryError> {
        let bytes = self
            .store
            .read(id.as_bytes())
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;
        let record = decode_any(&bytes)?;
        let entry = CredentialEntry::new(id.clone(), record, self.clock.now());
        tracing::debug!(
            credential_id = %id,
            status = %entry.status,
            version = %entry.record.version(),
            "credential read"
        );
        Ok(entry)
    }

    /// The asset reference of `id`, or `None` for a v1 record.
    pub fn get_asset_ref(&self, id: &CredentialId) -> Result<Option<AssetRef>, RegistryError> {
        self.get(id).map(|entry| entry.record.asset_ref())
    }

    /// Verify a presented claim against the record for `id`.
    ///
    /// # Errors
    ///
    /// `NotFound` when `id` holds no record. Verification failures are `Ok`
    /// outcomes.
    pub fn verify(
        &self,
        id: &CredentialId,
        claim: &impl Serialize,
        expected_subject: &Address,
    ) -> Result<VerificationOutcome, RegistryError> {
        let entry = self.get(id)?;
        let outcome = verify(&entry.record, claim, expected_subject, entry.observed_at)?;
        tracing::debug!(credential_id = %id, outcome = outcome.as_str(), "claim verified");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credreg_core::{FixedClock, Timestamp};
    use credreg_record::LengthRule;

    const ISSUER: Address = Address::from_bytes([0xAA; 32]);
    const SUBJECT: [u8; 32] = [0x01; 32];
    const HASH: [u8; 32] = [0x02; 32];

    fn registry(version: RecordVersion) -> (Registry, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(Timestamp::from_epoch_secs(1_000)));
        let config = RegistryConfig::new(ISSUER).with_record_version(version);
        (Registry::new(config, MemoryBoxStore::new(), clock.clone()), clock)
    }

    fn input() -> IssueInput<'static> {
        IssueInput {
            subject: &SUBJECT,
            schema_code: 1,
            cred_hash: &HASH,
            expires_at: Timestamp::from_epoch_secs(2_000),
            cid_pointer: b"bafy",
            asset_ref: None,
        }
    }

    fn id(s: &str) -> CredentialId {
        CredentialId::try_from(s).unwrap()
    }

    #[test]
    fn issue_stamps_issuer_and_clock() {
        let (reg, _) = registry(RecordVersion::V1);
        let record = reg.issue(&ISSUER, &id("a"), &input()).unwrap();
        assert_eq!(record.fields().issuer, ISSUER);
        assert_eq!(record.fields().issued_at.epoch_secs(), 1_000);
        assert!(!record.is_revoked());
        assert_eq!(reg.store().size(b"a"), Some(146));
    }

    #[test]
    fn non_issuer_cannot_write() {
        let (reg, _) = registry(RecordVersion::V1);
        let stranger = Address::from_bytes([0xBB; 32]);
        assert!(matches!(
            reg.issue(&stranger, &id("a"), &input()),
            Err(RegistryError::Unauthorized { .. })
        ));
        assert!(reg.store().is_empty());

        reg.issue(&ISSUER, &id("a"), &input()).unwrap();
        assert!(matches!(
            reg.revoke(&stranger, &id("a")),
            Err(RegistryError::Unauthorized { .. })
        ));
        assert!(!reg.get(&id("a")).unwrap().record.is_revoked());
    }

    #[test]
    fn unauthorized_checked_before_duplicate() {
        let (reg, _) = registry(RecordVersion::V1);
        reg.issue(&ISSUER, &id("a"), &input()).unwrap();
        let stranger = Address::from_bytes([0xBB; 32]);
        assert!(matches!(
            reg.issue(&stranger, &id("a"), &input()),
            Err(RegistryError::Unauthorized { .. })
        ));
    }

    #[test]
    fn revoke_flips_one_byte() {
        let (reg, _) = registry(RecordVersion::V2);
        let asset = 42u64.to_be_bytes();
        let v2 = IssueInput {
            asset_ref: Some(&asset),
            ..input()
        };
        reg.issue(&ISSUER, &id("a"), &v2).unwrap();
        let before = reg.store().read(b"a").unwrap();

        assert_eq!(reg.revoke(&ISSUER, &id("a")).unwrap(), RevokeOutcome::Revoked);
        let after = reg.store().read(b"a").unwrap();

        let diff: Vec<usize> = (0..before.len()).filter(|i| before[*i] != after[*i]).collect();
        assert_eq!(diff, vec![120]);
        assert_eq!(after[120], 1);
    }

    #[test]
    fn re_revoke_reports_already_revoked() {
        let (reg, _) = registry(RecordVersion::V1);
        reg.issue(&ISSUER, &id("a"), &input()).unwrap();
        reg.revoke(&ISSUER, &id("a")).unwrap();
        let first = reg.store().read(b"a").unwrap();
        assert_eq!(
            reg.revoke(&ISSUER, &id("a")).unwrap(),
            RevokeOutcome::AlreadyRevoked
        );
        assert_eq!(reg.store().read(b"a").unwrap(), first);
    }

    #[test]
    fn revoke_missing_is_not_found() {
        let (reg, _) = registry(RecordVersion::V1);
        assert!(matches!(
            reg.revoke(&ISSUER, &id("ghost")),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn revoke_rejects_unknown_box_size() {
        let (reg, _) = registry(RecordVersion::V1);
        reg.store().create(b"odd", 10, &[0; 10]).unwrap();
        assert!(matches!(
            reg.revoke(&ISSUER, &id("odd")),
            Err(RegistryError::Record(RecordError::MalformedRecord(_)))
        ));
        assert_eq!(reg.store().read(b"odd").unwrap(), vec![0; 10]);
    }

    #[test]
    fn status_follows_clock() {
        let (reg, clock) = registry(RecordVersion::V1);
        reg.issue(&ISSUER, &id("a"), &input()).unwrap();
        assert!(reg.get(&id("a")).unwrap().is_active());
        clock.set(Timestamp::from_epoch_secs(2_000));
        assert!(!reg.get(&id("a")).unwrap().is_active());
    }

    #[test]
    fn asset_ref_by_version() {
        let (v1, _) = registry(RecordVersion::V1);
        v1.issue(&ISSUER, &id("a"), &input()).unwrap();
        assert_eq!(v1.get_asset_ref(&id("a")).unwrap(), None);

        let (v2, _) = registry(RecordVersion::V2);
        let asset = 1013u64.to_be_bytes();
        v2.issue(
            &ISSUER,
            &id("a"),
            &IssueInput {
                asset_ref: Some(&asset),
                ..input()
            },
        )
        .unwrap();
        assert_eq!(
            v2.get_asset_ref(&id("a")).unwrap(),
            Some(AssetRef::from_u64(1013))
        );
    }

    #[test]
    fn v2_requires_asset_ref() {
        let (reg, _) = registry(RecordVersion::V2);
        let err = reg.issue(&ISSUER, &id("a"), &input()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Record(RecordError::FieldLength {
                field: Field::AssetRef,
                rule: LengthRule::Exactly(8),
                actual: 0
            })
        ));
        assert!(reg.store().is_empty());
    }

    #[test]
    fn future_expiry_policy() {
        let clock = Arc::new(FixedClock::new(Timestamp::from_epoch_secs(5_000)));
        let config = RegistryConfig::new(ISSUER).with_require_future_expiry(true);
        let reg = Registry::new(config, MemoryBoxStore::new(), clock);
        let err = reg.issue(&ISSUER, &id("a"), &input()).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Record(RecordError::ExpiryNotAfterIssue { .. })
        ));
        assert!(reg.store().is_empty());

        let (permissive, clock) = registry(RecordVersion::V1);
        clock.set(Timestamp::from_epoch_secs(5_000));
        assert!(permissive.issue(&ISSUER, &id("a"), &input()).is_ok());
    }

    #[test]
    fn debug_does_not_dump_records() {
        let (reg, _) = registry(RecordVersion::V1);
        reg.issue(&ISSUER, &id("a"), &input()).unwrap();
        let dbg = format!("{reg:?}");
        assert!(dbg.contains("records: 1"));
    }
}
