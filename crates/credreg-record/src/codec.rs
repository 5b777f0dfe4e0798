//! # Record Codec
//!
//! Encodes typed credential records into their fixed-width binary form and
//! back. Integers are big-endian; the content pointer is zero-padded to its
//! slot. Every byte position comes from [`crate::layout`].
//!
//! ## Version dispatch
//!
//! `CredentialRecord` is a tagged variant. `V1` and `V2` share the common
//! [`RecordFields`]; `V2` adds the asset reference. [`decode_any()`] picks
//! the variant from the input length, so callers never branch on raw sizes.

use serde::Serialize;

use credreg_core::{Address, AssetRef, CidPointer, CredHash, SchemaCode, Timestamp};

use crate::error::{MalformedReason, RecordError};
use crate::layout::{field_offset, layout, Field, RecordVersion};

/// The fields every record version carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFields {
    /// Address of the authority that issued the record.
    pub issuer: Address,
    /// Address of the credential holder.
    pub subject: Address,
    /// Claim category.
    pub schema_code: SchemaCode,
    /// Digest of the off-registry claim document.
    pub cred_hash: CredHash,
    /// Registry time at issue.
    pub issued_at: Timestamp,
    /// Caller-supplied expiry.
    pub expires_at: Timestamp,
    /// Whether the credential has been revoked.
    pub revoked: bool,
    /// Pointer to the claim document.
    pub cid_pointer: CidPointer,
}

/// A decoded credential record, tagged by layout version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "version", rename_all = "lowercase")]
pub enum CredentialRecord {
    /// 146-byte layout.
    V1(RecordFields),
    /// 161-byte layout with an asset reference.
    V2 {
        /// Common fields.
        #[serde(flatten)]
        fields: RecordFields,
        /// External asset identifier.
        asset_ref: AssetRef,
    },
}

impl CredentialRecord {
    /// The layout version of this record.
    pub fn version(&self) -> RecordVersion {
        match self {
            Self::V1(_) => RecordVersion::V1,
            Self::V2 { .. } => RecordVersion::V2,
        }
    }

    /// The fields common to every version.
    pub fn fields(&self) -> &RecordFields {
        match self {
            Self::V1(fields) | Self::V2 { fields, .. } => fields,
        }
    }

    /// The asset reference, present only on v2 records.
    pub fn asset_ref(&self) -> Option<AssetRef> {
        match self {
            Self::V1(_) => None,
            Self::V2 { asset_ref, .. } => Some(*asset_ref),
        }
    }

    /// Whether the revoked flag is set.
    pub fn is_revoked(&self) -> bool {
        self.fields().revoked
    }

    /// Exact encoded length of this record.
    pub fn encoded_len(&self) -> usize {
        self.version().record_len()
    }
}

/// Serialize a record into its fixed-width binary form.
pub fn encode(record: &CredentialRecord) -> Vec<u8> {
    let version = record.version();
    let fields = record.fields();
    let mut out = vec![0u8; version.record_len()];

    for span in layout(version) {
        let slot = &mut out[span.range()];
        match span.field {
            Field::IssuerAddress => slot.copy_from_slice(fields.issuer.as_bytes()),
            Field::SubjectAddress => slot.copy_from_slice(fields.subject.as_bytes()),
            Field::SchemaCode => write_uint(slot, u64::from(fields.schema_code.code())),
            Field::CredHash => slot.copy_from_slice(fields.cred_hash.as_bytes()),
            Field::IssuedAt => write_uint(slot, fields.issued_at.epoch_secs()),
            Field::ExpiresAt => write_uint(slot, fields.expires_at.epoch_secs()),
            Field::Revoked => write_uint(slot, u64::from(fields.revoked)),
            Field::CidPointer => slot.copy_from_slice(fields.cid_pointer.padded()),
            Field::AssetRef => {
                if let Some(asset) = record.asset_ref() {
                    slot.copy_from_slice(asset.as_bytes());
                }
            }
        }
    }
    out
}

/// Parse a record of a known version.
///
/// # Errors
///
/// - `MalformedRecord` if `bytes` is not exactly the declared size for
///   `version`, or the revoked flag is not 0/1.
/// - `InvalidSchema` if the stored schema code is outside the enumeration.
pub fn decode(bytes: &[u8], version: RecordVersion) -> Result<CredentialRecord, RecordError> {
    if bytes.len() != version.record_len() {
        return Err(MalformedReason::Length {
            version,
            expected: version.record_len(),
            actual: bytes.len(),
        }
        .into());
    }

    let slot = |field: Field| field_slot(bytes, version, field);

    let raw_schema = read_uint(slot(Field::SchemaCode));
    let schema_code =
        SchemaCode::try_from(raw_schema).map_err(|_| RecordError::InvalidSchema(raw_schema))?;

    let revoked = match slot(Field::Revoked) {
        [0] => false,
        [1] => true,
        [other] => return Err(MalformedReason::RevokedFlag(*other).into()),
        _ => return Err(MalformedReason::RevokedFlag(u8::MAX).into()),
    };

    let fields = RecordFields {
        issuer: Address::from_bytes(fixed(slot(Field::IssuerAddress))),
        subject: Address::from_bytes(fixed(slot(Field::SubjectAddress))),
        schema_code,
        cred_hash: CredHash::from_bytes(fixed(slot(Field::CredHash))),
        issued_at: Timestamp::from_epoch_secs(read_uint(slot(Field::IssuedAt))),
        expires_at: Timestamp::from_epoch_secs(read_uint(slot(Field::ExpiresAt))),
        revoked,
        cid_pointer: CidPointer::from_padded(fixed(slot(Field::CidPointer))),
    };

    Ok(match version {
        RecordVersion::V1 => CredentialRecord::V1(fields),
        RecordVersion::V2 => CredentialRecord::V2 {
            fields,
            asset_ref: AssetRef::from_bytes(fixed(slot(Field::AssetRef))),
        },
    })
}

/// Parse a record, detecting its version from the input length.
pub fn decode_any(bytes: &[u8]) -> Result<CredentialRecord, RecordError> {
    let version = RecordVersion::from_len(bytes.len())
        .ok_or(MalformedReason::UnknownLength(bytes.len()))?;
    decode(bytes, version)
}

/// The bytes of `field`, or an empty slice if the version has no such field.
fn field_slot(bytes: &[u8], version: RecordVersion, field: Field) -> &[u8] {
    field_offset(field, version).map_or(&[][..], |span| &bytes[span.range()])
}

/// Write `value` big-endian into the whole of `slot` (at most 8 bytes).
fn write_uint(slot: &mut [u8], value: u64) {
    let be = value.to_be_bytes();
    slot.copy_from_slice(&be[be.len() - slot.len()..]);
}

/// Read a big-endian unsigned integer from a slot of at most 8 bytes.
fn read_uint(slot: &[u8]) -> u64 {
    slot.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
}

/// Copy a slot into a fixed-width array. Slot widths come from the layout
/// tables, which match the array widths of the corresponding types.
fn fixed<const N: usize>(slot: &[u8]) -> [u8; N] {
    debug_assert_eq!(slot.len(), N, "layout slot width differs from field type width");
    let mut out = [0u8; N];
    let n = slot.len().min(N);
    out[..n].copy_from_slice(&slot[..n]);
    out
}
