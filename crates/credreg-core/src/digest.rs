//! # Credential Hash — The Record Integrity Anchor
//!
//! `CredHash` is the 32-byte SHA-256 digest stored in a credential record's
//! `cred_hash` field. It anchors the off-registry claim document: anyone
//! holding the document can recompute the digest and compare.
//!
//! ## Invariant
//!
//! [`sha256_digest()`] accepts only `&CanonicalBytes`, so every digest the
//! hasher produces went through the key-order-independent serializer. A raw
//! 32-byte value can still be wrapped with [`CredHash::from_bytes()`] when it
//! arrives from an external issuer or is decoded from a record.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::{CanonicalizationError, CoreError};
use crate::identity::{hex_encode, parse_hex_array};

/// Width of the digest in bytes.
pub const CRED_HASH_LEN: usize = 32;

/// A 32-byte SHA-256 credential digest. Serializes as 64 hex chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CredHash([u8; CRED_HASH_LEN]);

impl CredHash {
    /// Wrap an existing 32-byte digest.
    pub const fn from_bytes(bytes: [u8; CRED_HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Build from a slice, rejecting anything that is not exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let arr: [u8; CRED_HASH_LEN] = bytes.try_into().map_err(|_| CoreError::WrongLength {
            what: "cred_hash",
            expected: CRED_HASH_LEN,
            actual: bytes.len(),
        })?;
        Ok(Self(arr))
    }

    /// Parse a 64-character hex digest.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        parse_hex_array("cred_hash", s).map(Self)
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; CRED_HASH_LEN] {
        &self.0
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex_encode(&self.0)
    }
}

impl std::fmt::Display for CredHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

impl From<CredHash> for String {
    fn from(hash: CredHash) -> Self {
        hash.to_hex()
    }
}

impl TryFrom<String> for CredHash {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

/// Compute a SHA-256 digest from canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> CredHash {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; CRED_HASH_LEN];
    bytes.copy_from_slice(&hash);
    CredHash(bytes)
}

/// The Credential Hasher.
///
/// Canonicalizes an arbitrary structured claim and returns its SHA-256
/// digest. The result is invariant under reordering of map keys at any
/// depth and depends on nothing but the claim's content.
///
/// # Errors
///
/// Returns `CanonicalizationError` if the claim cannot be represented as JSON.
pub fn hash_claim(claim: &impl Serialize) -> Result<CredHash, CanonicalizationError> {
    let canonical = CanonicalBytes::new(claim)?;
    Ok(sha256_digest(&canonical))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_known_sha256_vector() {
        // SHA256("{}")
        let digest = hash_claim(&serde_json::json!({})).unwrap();
        assert_eq!(
            digest.to_hex(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_key_order_does_not_change_hash() {
        let one = serde_json::json!({
            "type": "EmploymentCredential",
            "credentialId": "emp-123",
            "claim": {"position": "Software Engineer", "department": "Engineering"},
        });
        let two = serde_json::json!({
            "claim": {"department": "Engineering", "position": "Software Engineer"},
            "credentialId": "emp-123",
            "type": "EmploymentCredential",
        });
        assert_eq!(hash_claim(&one).unwrap(), hash_claim(&two).unwrap());
    }

    #[test]
    fn test_struct_and_map_agree() {
        #[derive(Serialize)]
        struct Claim {
            zeta: u32,
            alpha: &'static str,
        }
        let mut map = BTreeMap::new();
        map.insert("alpha", serde_json::json!("a"));
        map.insert("zeta", serde_json::json!(7));
        assert_eq!(
            hash_claim(&Claim { zeta: 7, alpha: "a" }).unwrap(),
            hash_claim(&map).unwrap()
        );
    }

    #[test]
    fn test_different_content_different_hash() {
        let a = hash_claim(&serde_json::json!({"a": 1})).unwrap();
        let b = hash_claim(&serde_json::json!({"a": 2})).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_hex_roundtrip_and_display() {
        let digest = hash_claim(&serde_json::json!({"k": "v"})).unwrap();
        let hex = digest.to_hex();
        assert_eq!(hex.len(), 64);
        assert_eq!(CredHash::from_hex(&hex).unwrap(), digest);
        assert!(digest.to_string().starts_with("sha256:"));
    }

    #[test]
    fn test_from_slice_rejects_short() {
        let err = CredHash::from_slice(&[0u8; 31]).unwrap_err();
        assert_eq!(
            err,
            CoreError::WrongLength {
                what: "cred_hash",
                expected: 32,
                actual: 31
            }
        );
    }
}
