//! # Identifier Newtypes
//!
//! Newtype wrappers for every identifier that appears in a credential
//! record or addresses one. These prevent accidental confusion: you cannot
//! pass a subject `Address` where a `CredHash` is expected, and a content
//! pointer can never be longer than its slot.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Width of an account address in bytes.
pub const ADDRESS_LEN: usize = 32;
/// Maximum width of a content pointer; shorter pointers are zero-padded.
pub const CID_POINTER_MAX_LEN: usize = 32;
/// Width of an external asset reference in bytes.
pub const ASSET_REF_LEN: usize = 8;
/// Maximum length of a credential identifier key.
pub const CREDENTIAL_ID_MAX_LEN: usize = 64;

/// A 32-byte account address (issuer or subject public key).
///
/// Serializes as a lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Wrap raw address bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Build from a slice, rejecting anything that is not exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let arr: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| CoreError::WrongLength {
            what: "address",
            expected: ADDRESS_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Parse a 64-character hex address.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        parse_hex_array("address", s).map(Self)
    }

    /// The raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_hex()
    }
}

impl TryFrom<String> for Address {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

/// Caller-chosen key under which a credential record is stored.
///
/// Serializes as text when the key is UTF-8, otherwise as `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CredentialId(Vec<u8>);

impl CredentialId {
    /// Create an identifier from raw bytes.
    ///
    /// The key must be non-empty and at most 64 bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, CoreError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(CoreError::WrongLength {
                what: "credential_id",
                expected: 1,
                actual: 0,
            });
        }
        if bytes.len() > CREDENTIAL_ID_MAX_LEN {
            return Err(CoreError::TooLong {
                what: "credential_id",
                max: CREDENTIAL_ID_MAX_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    /// The key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_text_or_hex(f, &self.0)
    }
}

impl TryFrom<&str> for CredentialId {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.as_bytes())
    }
}

impl From<CredentialId> for String {
    fn from(id: CredentialId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for CredentialId {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(text_or_hex("credential_id", &s)?)
    }
}

/// Opaque reference to the off-registry claim document (e.g. an IPFS CID).
///
/// Stored zero-padded to 32 bytes. Two pointers that differ only in
/// trailing zero bytes occupy the same slot and compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CidPointer([u8; CID_POINTER_MAX_LEN]);

impl CidPointer {
    /// The empty pointer (all zero bytes).
    pub const EMPTY: Self = Self([0u8; CID_POINTER_MAX_LEN]);

    /// Create a pointer from at most 32 bytes.
    pub fn new(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.len() > CID_POINTER_MAX_LEN {
            return Err(CoreError::TooLong {
                what: "cid_pointer",
                max: CID_POINTER_MAX_LEN,
                actual: bytes.len(),
            });
        }
        let mut padded = [0u8; CID_POINTER_MAX_LEN];
        padded[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(padded))
    }

    /// Rebuild a pointer from its padded on-record form.
    pub const fn from_padded(padded: [u8; CID_POINTER_MAX_LEN]) -> Self {
        Self(padded)
    }

    /// The full 32-byte padded slot.
    pub fn padded(&self) -> &[u8; CID_POINTER_MAX_LEN] {
        &self.0
    }

    /// The pointer with trailing zero padding removed.
    pub fn as_bytes(&self) -> &[u8] {
        let end = self.0.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        &self.0[..end]
    }

    /// Whether no pointer was supplied.
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl Default for CidPointer {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Display for CidPointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_text_or_hex(f, self.as_bytes())
    }
}

impl From<CidPointer> for String {
    fn from(cid: CidPointer) -> Self {
        cid.to_string()
    }
}

impl TryFrom<String> for CidPointer {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(&text_or_hex("cid_pointer", &s)?)
    }
}

/// External asset identifier carried by v2 records (e.g. a token id).
///
/// Serializes as its big-endian numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u64", from = "u64")]
pub struct AssetRef([u8; ASSET_REF_LEN]);

impl AssetRef {
    /// Wrap raw bytes.
    pub const fn from_bytes(bytes: [u8; ASSET_REF_LEN]) -> Self {
        Self(bytes)
    }

    /// Build from a slice, rejecting anything that is not exactly 8 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let arr: [u8; ASSET_REF_LEN] = bytes.try_into().map_err(|_| CoreError::WrongLength {
            what: "asset_ref",
            expected: ASSET_REF_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Encode a numeric asset id big-endian.
    pub const fn from_u64(id: u64) -> Self {
        Self(id.to_be_bytes())
    }

    /// Interpret the reference as a big-endian numeric asset id.
    pub const fn as_u64(&self) -> u64 {
        u64::from_be_bytes(self.0)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8; ASSET_REF_LEN] {
        &self.0
    }

    /// Parse 16 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        Self::from_slice(&hex_decode("asset_ref", s)?)
    }

    /// Lowercase hex, 16 characters.
    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u64())
    }
}

impl From<AssetRef> for u64 {
    fn from(asset: AssetRef) -> Self {
        asset.as_u64()
    }
}

impl From<u64> for AssetRef {
    fn from(id: u64) -> Self {
        Self::from_u64(id)
    }
}

/// Encode bytes as lowercase hex.
pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode a hex string (optional `0x` prefix) into bytes.
pub fn hex_decode(what: &'static str, s: &str) -> Result<Vec<u8>, CoreError> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.len() % 2 != 0 {
        return Err(CoreError::InvalidHex {
            what,
            reason: format!("odd length {}", s.len()),
        });
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            s.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| CoreError::InvalidHex {
                    what,
                    reason: format!("invalid digit at position {i}"),
                })
        })
        .collect()
}

/// Write bytes as text when they are UTF-8, otherwise as `0x`-prefixed hex.
fn write_text_or_hex(f: &mut std::fmt::Formatter<'_>, bytes: &[u8]) -> std::fmt::Result {
    match std::str::from_utf8(bytes) {
        Ok(s) if !s.starts_with("0x") => f.write_str(s),
        _ => write!(f, "0x{}", hex_encode(bytes)),
    }
}

/// Inverse of [`write_text_or_hex`].
fn text_or_hex(what: &'static str, s: &str) -> Result<Vec<u8>, CoreError> {
    if s.starts_with("0x") {
        hex_decode(what, s)
    } else {
        Ok(s.as_bytes().to_vec())
    }
}

/// Decode a hex string into a fixed-width array.
pub(crate) fn parse_hex_array<const N: usize>(
    what: &'static str,
    s: &str,
) -> Result<[u8; N], CoreError> {
    let bytes = hex_decode(what, s)?;
    bytes.as_slice().try_into().map_err(|_| CoreError::WrongLength {
        what,
        expected: N,
        actual: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_hex_roundtrip() {
        let mut raw = [0u8; 32];
        raw[31] = 1;
        let addr = Address::from_bytes(raw);
        let hex = addr.to_hex();
        assert!(hex.ends_with("01"));
        assert_eq!(Address::from_hex(&hex).unwrap(), addr);
        assert_eq!(Address::from_hex(&format!("0x{hex}")).unwrap(), addr);
    }

    #[test]
    fn test_address_wrong_length() {
        assert!(matches!(
            Address::from_slice(&[0u8; 31]),
            Err(CoreError::WrongLength { expected: 32, actual: 31, .. })
        ));
        assert!(Address::from_hex("abcd").is_err());
    }

    #[test]
    fn test_hex_decode_rejects_garbage() {
        assert!(matches!(
            hex_decode("test", "zz"),
            Err(CoreError::InvalidHex { .. })
        ));
        assert!(matches!(
            hex_decode("test", "abc"),
            Err(CoreError::InvalidHex { .. })
        ));
        // A multi-byte character must not panic on a non-boundary slice.
        assert!(hex_decode("test", "\u{00e9}\u{00e9}").is_err());
    }

    #[test]
    fn test_credential_id_bounds() {
        assert!(CredentialId::new(Vec::new()).is_err());
        assert!(CredentialId::new(vec![b'a'; 64]).is_ok());
        assert!(matches!(
            CredentialId::new(vec![b'a'; 65]),
            Err(CoreError::TooLong { max: 64, actual: 65, .. })
        ));
        let id = CredentialId::try_from("cred-1").unwrap();
        assert_eq!(id.to_string(), "cred-1");
    }

    #[test]
    fn test_cid_pointer_padding() {
        let cid = CidPointer::new(b"bafy").unwrap();
        assert_eq!(cid.as_bytes(), b"bafy");
        assert_eq!(&cid.padded()[..4], b"bafy");
        assert!(cid.padded()[4..].iter().all(|b| *b == 0));
        assert_eq!(CidPointer::from_padded(*cid.padded()), cid);
        assert_eq!(cid.to_string(), "bafy");
    }

    #[test]
    fn test_cid_pointer_bounds() {
        assert!(CidPointer::new(&[7u8; 32]).is_ok());
        assert!(matches!(
            CidPointer::new(&[7u8; 33]),
            Err(CoreError::TooLong { max: 32, actual: 33, .. })
        ));
        assert!(CidPointer::new(b"").unwrap().is_empty());
        assert_eq!(CidPointer::default(), CidPointer::EMPTY);
    }

    #[test]
    fn test_serde_text_forms() {
        let addr = Address::from_bytes([0xAB; 32]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(32)));
        assert_eq!(serde_json::from_str::<Address>(&json).unwrap(), addr);

        let id = CredentialId::new(vec![0xff, 0x00]).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0xff00\"");
        assert_eq!(serde_json::from_str::<CredentialId>(&json).unwrap(), id);

        let cid = CidPointer::new(b"bafy").unwrap();
        assert_eq!(serde_json::to_string(&cid).unwrap(), "\"bafy\"");
        assert_eq!(serde_json::to_string(&AssetRef::from_u64(9)).unwrap(), "9");
    }

    #[test]
    fn test_hex_looking_text_survives_roundtrip() {
        let id = CredentialId::try_from("0xdead").unwrap();
        let back: CredentialId = String::from(id.clone()).try_into().unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_asset_ref() {
        let asset = AssetRef::from_u64(1013);
        assert_eq!(asset.as_u64(), 1013);
        assert_eq!(asset.as_bytes(), &1013u64.to_be_bytes());
        assert!(AssetRef::from_slice(&[0u8; 7]).is_err());
        assert_eq!(AssetRef::from_slice(&[0, 0, 0, 0, 0, 0, 3, 245]).unwrap(), asset);
        assert_eq!(asset.to_hex(), "00000000000003f5");
        assert_eq!(AssetRef::from_hex("00000000000003f5").unwrap(), asset);
        assert!(AssetRef::from_hex("03f5").is_err());
    }
}
