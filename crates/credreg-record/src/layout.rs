//! # Record Layout — Field Offsets per Schema Version
//!
//! The byte layout of a credential record, as compile-time tables. Every
//! offset in the workspace is derived from these tables through
//! [`field_offset()`]; nothing else hard-codes a position.
//!
//! ```text
//! V1 (146 bytes)                         V2 (161 bytes)
//! ┌──────────────┬─────┬─────┐           ┌──────────────┬─────┬─────┐
//! │ issuer       │   0 │  32 │           │ issuer       │   0 │  32 │
//! │ subject      │  32 │  32 │           │ subject      │  32 │  32 │
//! │ schema_code  │  64 │   1 │           │ schema_code  │  64 │   8 │
//! │ cred_hash    │  65 │  32 │           │ cred_hash    │  72 │  32 │
//! │ issued_at    │  97 │   8 │           │ issued_at    │ 104 │   8 │
//! │ expires_at   │ 105 │   8 │           │ expires_at   │ 112 │   8 │
//! │ revoked      │ 113 │   1 │           │ revoked      │ 120 │   1 │
//! │ cid_pointer  │ 114 │  32 │           │ cid_pointer  │ 121 │  32 │
//! └──────────────┴─────┴─────┘           │ asset_ref    │ 153 │   8 │
//!                                        └──────────────┴─────┴─────┘
//! ```
//!
//! The two versions differ in total length, so a decoder can tell which one
//! it holds from the length alone.

use std::ops::Range;

use credreg_core::digest::CRED_HASH_LEN;
use credreg_core::identity::{ADDRESS_LEN, ASSET_REF_LEN, CID_POINTER_MAX_LEN};
use serde::{Deserialize, Serialize};

/// Width of an epoch-second timestamp field.
const TIMESTAMP_LEN: usize = 8;
/// Width of the revoked flag.
const FLAG_LEN: usize = 1;

/// A field of a credential record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Issuer account address.
    IssuerAddress,
    /// Subject account address.
    SubjectAddress,
    /// Claim category code.
    SchemaCode,
    /// SHA-256 digest of the claim document.
    CredHash,
    /// Issue time, stamped by the registry.
    IssuedAt,
    /// Caller-supplied expiry time.
    ExpiresAt,
    /// Revocation flag (0 active, 1 revoked).
    Revoked,
    /// Zero-padded content pointer.
    CidPointer,
    /// External asset reference (v2 only).
    AssetRef,
}

impl Field {
    /// Snake-case field name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::IssuerAddress => "issuer_address",
            Self::SubjectAddress => "subject_address",
            Self::SchemaCode => "schema_code",
            Self::CredHash => "cred_hash",
            Self::IssuedAt => "issued_at",
            Self::ExpiresAt => "expires_at",
            Self::Revoked => "revoked",
            Self::CidPointer => "cid_pointer",
            Self::AssetRef => "asset_ref",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The byte range a field occupies within a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpan {
    /// The field.
    pub field: Field,
    /// Offset of the first byte.
    pub start: usize,
    /// Width in bytes.
    pub len: usize,
}

impl FieldSpan {
    /// One past the last byte.
    pub const fn end(&self) -> usize {
        self.start + self.len
    }

    /// The span as a slice range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Record schema version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordVersion {
    /// 146-byte record, 1-byte schema code, no asset reference.
    #[default]
    V1,
    /// 161-byte record, 8-byte schema code, trailing 8-byte asset reference.
    V2,
}

impl RecordVersion {
    /// Exact encoded length of a record of this version.
    pub const fn record_len(&self) -> usize {
        match self {
            Self::V1 => V1_LEN,
            Self::V2 => V2_LEN,
        }
    }

    /// Identify the version from an encoded length.
    pub const fn from_len(len: usize) -> Option<Self> {
        match len {
            V1_LEN => Some(Self::V1),
            V2_LEN => Some(Self::V2),
            _ => None,
        }
    }

    /// Whether records of this version carry an asset reference.
    pub const fn has_asset_ref(&self) -> bool {
        matches!(self, Self::V2)
    }
}

impl std::fmt::Display for RecordVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V1 => f.write_str("v1"),
            Self::V2 => f.write_str("v2"),
        }
    }
}

impl std::str::FromStr for RecordVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            other => Err(format!("unknown record version: {other}")),
        }
    }
}

/// Lay fields end to end in declaration order.
const fn pack<const N: usize>(widths: [(Field, usize); N]) -> [FieldSpan; N] {
    let mut out = [FieldSpan {
        field: Field::IssuerAddress,
        start: 0,
        len: 0,
    }; N];
    let mut start = 0;
    let mut i = 0;
    while i < N {
        out[i] = FieldSpan {
            field: widths[i].0,
            start,
            len: widths[i].1,
        };
        start += widths[i].1;
        i += 1;
    }
    out
}

const V1_LAYOUT: [FieldSpan; 8] = pack([
    (Field::IssuerAddress, ADDRESS_LEN),
    (Field::SubjectAddress, ADDRESS_LEN),
    (Field::SchemaCode, 1),
    (Field::CredHash, CRED_HASH_LEN),
    (Field::IssuedAt, TIMESTAMP_LEN),
    (Field::ExpiresAt, TIMESTAMP_LEN),
    (Field::Revoked, FLAG_LEN),
    (Field::CidPointer, CID_POINTER_MAX_LEN),
]);

const V2_LAYOUT: [FieldSpan; 9] = pack([
    (Field::IssuerAddress, ADDRESS_LEN),
    (Field::SubjectAddress, ADDRESS_LEN),
    (Field::SchemaCode, 8),
    (Field::CredHash, CRED_HASH_LEN),
    (Field::IssuedAt, TIMESTAMP_LEN),
    (Field::ExpiresAt, TIMESTAMP_LEN),
    (Field::Revoked, FLAG_LEN),
    (Field::CidPointer, CID_POINTER_MAX_LEN),
    (Field::AssetRef, ASSET_REF_LEN),
]);

/// Encoded length of a v1 record.
pub const V1_LEN: usize = V1_LAYOUT[V1_LAYOUT.len() - 1].end();
/// Encoded length of a v2 record.
pub const V2_LEN: usize = V2_LAYOUT[V2_LAYOUT.len() - 1].end();

const _: () = assert!(V1_LEN == 146);
const _: () = assert!(V2_LEN == 161);
const _: () = assert!(V1_LAYOUT[6].start == 113);
const _: () = assert!(V2_LAYOUT[6].start == 120);

/// Every field span of a version, in record order.
pub fn layout(version: RecordVersion) -> &'static [FieldSpan] {
    match version {
        RecordVersion::V1 => &V1_LAYOUT,
        RecordVersion::V2 => &V2_LAYOUT,
    }
}

/// The byte range of `field` within a record of `version`.
///
/// Returns `None` when the version has no such field (asset_ref in v1).
pub fn field_offset(field: Field, version: RecordVersion) -> Option<FieldSpan> {
    layout(version).iter().copied().find(|span| span.field == field)
}
