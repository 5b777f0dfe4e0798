//! # Field Validator
//!
//! Pure checks that run before a record is created. The validator turns raw
//! caller input into typed fields or fails on the first violation; it never
//! produces a partially valid record.
//!
//! Checks run in a fixed order: subject address, credential hash, schema
//! code, content pointer, asset reference.

use credreg_core::digest::CRED_HASH_LEN;
use credreg_core::identity::{ADDRESS_LEN, ASSET_REF_LEN, CID_POINTER_MAX_LEN};
use credreg_core::{Address, AssetRef, CidPointer, CredHash, SchemaCode, Timestamp};

use crate::codec::{CredentialRecord, RecordFields};
use crate::error::{LengthRule, RecordError};
use crate::layout::{Field, RecordVersion};

/// Raw, unvalidated issue arguments in positional order.
#[derive(Debug, Clone, Copy)]
pub struct IssueInput<'a> {
    /// Subject address bytes.
    pub subject: &'a [u8],
    /// Numeric schema code.
    pub schema_code: u64,
    /// Claim digest bytes.
    pub cred_hash: &'a [u8],
    /// Requested expiry.
    pub expires_at: Timestamp,
    /// Content pointer bytes (may be empty).
    pub cid_pointer: &'a [u8],
    /// Asset reference bytes, required by v2.
    pub asset_ref: Option<&'a [u8]>,
}

/// Issue arguments that passed every field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedIssue {
    /// Subject address.
    pub subject: Address,
    /// Claim category.
    pub schema_code: SchemaCode,
    /// Claim digest.
    pub cred_hash: CredHash,
    /// Requested expiry.
    pub expires_at: Timestamp,
    /// Content pointer.
    pub cid_pointer: CidPointer,
    /// Asset reference, present exactly when the version carries one.
    pub asset_ref: Option<AssetRef>,
    /// Layout the record will be written in.
    pub version: RecordVersion,
}

impl ValidatedIssue {
    /// Assemble the record to store, stamped with the issuer and issue time.
    pub fn into_record(self, issuer: Address, issued_at: Timestamp) -> CredentialRecord {
        let fields = RecordFields {
            issuer,
            subject: self.subject,
            schema_code: self.schema_code,
            cred_hash: self.cred_hash,
            issued_at,
            expires_at: self.expires_at,
            revoked: false,
            cid_pointer: self.cid_pointer,
        };
        match (self.version, self.asset_ref) {
            (RecordVersion::V2, Some(asset_ref)) => CredentialRecord::V2 { fields, asset_ref },
            _ => CredentialRecord::V1(fields),
        }
    }
}

/// Validate raw issue arguments for a record of `version`.
///
/// # Errors
///
/// - `FieldLength` for a subject or hash that is not 32 bytes, a content
///   pointer over 32 bytes, a missing or mis-sized asset reference on v2,
///   or any asset reference on v1.
/// - `InvalidSchema` for a schema code outside 1..=3.
pub fn validate_issue(
    input: &IssueInput<'_>,
    version: RecordVersion,
) -> Result<ValidatedIssue, RecordError> {
    let subject = Address::from_slice(input.subject).map_err(|_| RecordError::FieldLength {
        field: Field::SubjectAddress,
        rule: LengthRule::Exactly(ADDRESS_LEN),
        actual: input.subject.len(),
    })?;

    let cred_hash = CredHash::from_slice(input.cred_hash).map_err(|_| RecordError::FieldLength {
        field: Field::CredHash,
        rule: LengthRule::Exactly(CRED_HASH_LEN),
        actual: input.cred_hash.len(),
    })?;

    let schema_code = SchemaCode::try_from(input.schema_code)
        .map_err(|_| RecordError::InvalidSchema(input.schema_code))?;

    let cid_pointer =
        CidPointer::new(input.cid_pointer).map_err(|_| RecordError::FieldLength {
            field: Field::CidPointer,
            rule: LengthRule::AtMost(CID_POINTER_MAX_LEN),
            actual: input.cid_pointer.len(),
        })?;

    let asset_ref = validate_asset_ref(input.asset_ref, version)?;

    Ok(ValidatedIssue {
        subject,
        schema_code,
        cred_hash,
        expires_at: input.expires_at,
        cid_pointer,
        asset_ref,
        version,
    })
}

fn validate_asset_ref(
    asset_ref: Option<&[u8]>,
    version: RecordVersion,
) -> Result<Option<AssetRef>, RecordError> {
    match (version.has_asset_ref(), asset_ref) {
        (true, Some(bytes)) => AssetRef::from_slice(bytes)
            .map(Some)
            .map_err(|_| RecordError::FieldLength {
                field: Field::AssetRef,
                rule: LengthRule::Exactly(ASSET_REF_LEN),
                actual: bytes.len(),
            }),
        (true, None) => Err(RecordError::FieldLength {
            field: Field::AssetRef,
            rule: LengthRule::Exactly(ASSET_REF_LEN),
            actual: 0,
        }),
        (false, Some(bytes)) => Err(RecordError::FieldLength {
            field: Field::AssetRef,
            rule: LengthRule::Exactly(0),
            actual: bytes.len(),
        }),
        (false, None) => Ok(None),
    }
}

/// Check the expiry against the stamped issue time.
///
/// Only enforced when `require_future_expiry` is set; otherwise any expiry
/// is accepted, including one already in the past.
pub fn check_expiry(
    issued_at: Timestamp,
    expires_at: Timestamp,
    require_future_expiry: bool,
) -> Result<(), RecordError> {
    if require_future_expiry && expires_at <= issued_at {
        return Err(RecordError::ExpiryNotAfterIssue {
            issued_at,
            expires_at,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBJECT: [u8; 32] = [1u8; 32];
    const HASH: [u8; 32] = [2u8; 32];

    fn input() -> IssueInput<'static> {
        IssueInput {
            subject: &SUBJECT,
            schema_code: 2,
            cred_hash: &HASH,
            expires_at: Timestamp::from_epoch_secs(4_102_444_800),
            cid_pointer: b"",
            asset_ref: None,
        }
    }

    #[test]
    fn test_valid_v1() {
        let ok = validate_issue(&input(), RecordVersion::V1).unwrap();
        assert_eq!(ok.schema_code, SchemaCode::Education);
        assert!(ok.cid_pointer.is_empty());
        assert!(ok.asset_ref.is_none());
    }

    #[test]
    fn test_short_subject() {
        let subject = [1u8; 31];
        let bad = IssueInput {
            subject: &subject,
            ..input()
        };
        assert_eq!(
            validate_issue(&bad, RecordVersion::V1).unwrap_err(),
            RecordError::FieldLength {
                field: Field::SubjectAddress,
                rule: LengthRule::Exactly(32),
                actual: 31,
            }
        );
    }

    #[test]
    fn test_long_hash() {
        let hash = [2u8; 33];
        let bad = IssueInput {
            cred_hash: &hash,
            ..input()
        };
        assert!(matches!(
            validate_issue(&bad, RecordVersion::V1),
            Err(RecordError::FieldLength { field: Field::CredHash, actual: 33, .. })
        ));
    }

    #[test]
    fn test_schema_out_of_range() {
        for code in [0, 4, 255, u64::MAX] {
            let bad = IssueInput {
                schema_code: code,
                ..input()
            };
            assert_eq!(
                validate_issue(&bad, RecordVersion::V1).unwrap_err(),
                RecordError::InvalidSchema(code)
            );
        }
    }

    #[test]
    fn test_cid_pointer_limit() {
        let max = [b'q'; 32];
        let ok = IssueInput {
            cid_pointer: &max,
            ..input()
        };
        assert!(validate_issue(&ok, RecordVersion::V1).is_ok());

        let over = [b'q'; 33];
        let bad = IssueInput {
            cid_pointer: &over,
            ..input()
        };
        assert_eq!(
            validate_issue(&bad, RecordVersion::V1).unwrap_err(),
            RecordError::FieldLength {
                field: Field::CidPointer,
                rule: LengthRule::AtMost(32),
                actual: 33,
            }
        );
    }

    #[test]
    fn test_asset_ref_rules() {
        let asset = 1013u64.to_be_bytes();
        let v2 = IssueInput {
            asset_ref: Some(&asset),
            ..input()
        };
        let ok = validate_issue(&v2, RecordVersion::V2).unwrap();
        assert_eq!(ok.asset_ref, Some(AssetRef::from_u64(1013)));

        assert!(matches!(
            validate_issue(&input(), RecordVersion::V2),
            Err(RecordError::FieldLength { field: Field::AssetRef, actual: 0, .. })
        ));

        let short = [0u8; 4];
        let bad = IssueInput {
            asset_ref: Some(&short),
            ..input()
        };
        assert!(matches!(
            validate_issue(&bad, RecordVersion::V2),
            Err(RecordError::FieldLength { field: Field::AssetRef, actual: 4, .. })
        ));

        assert!(matches!(
            validate_issue(&v2, RecordVersion::V1),
            Err(RecordError::FieldLength {
                field: Field::AssetRef,
                rule: LengthRule::Exactly(0),
                actual: 8
            })
        ));
    }

    #[test]
    fn test_first_violation_wins() {
        let subject = [0u8; 5];
        let bad = IssueInput {
            subject: &subject,
            schema_code: 9,
            ..input()
        };
        assert!(matches!(
            validate_issue(&bad, RecordVersion::V1),
            Err(RecordError::FieldLength { field: Field::SubjectAddress, .. })
        ));
    }

    #[test]
    fn test_into_record_starts_active() {
        let asset = 5u64.to_be_bytes();
        let ok = validate_issue(
            &IssueInput {
                asset_ref: Some(&asset),
                ..input()
            },
            RecordVersion::V2,
        )
        .unwrap();
        let record = ok.into_record(Address::from_bytes([9; 32]), Timestamp::from_epoch_secs(10));
        assert_eq!(record.version(), RecordVersion::V2);
        assert!(!record.is_revoked());
        assert_eq!(record.fields().issued_at.epoch_secs(), 10);
        assert_eq!(record.asset_ref(), Some(AssetRef::from_u64(5)));
    }

    #[test]
    fn test_check_expiry() {
        let t = Timestamp::from_epoch_secs;
        assert!(check_expiry(t(100), t(50), false).is_ok());
        assert!(check_expiry(t(100), t(101), true).is_ok());
        assert!(matches!(
            check_expiry(t(100), t(100), true),
            Err(RecordError::ExpiryNotAfterIssue { .. })
        ));
    }
}
