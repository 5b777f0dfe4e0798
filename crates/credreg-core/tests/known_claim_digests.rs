//! # Known Claim Digest Vectors
//!
//! Fixed inputs whose canonical form and SHA-256 digest were computed by an
//! independent sorted-key, compact-separator JSON serializer. If these fail,
//! issuers and verifiers using other tooling will disagree on `cred_hash`.

use credreg_core::{hash_claim, CanonicalBytes, CredentialDocument};

fn canonical_str(data: &serde_json::Value) -> String {
    let cb = CanonicalBytes::new(data).expect("canonicalization should succeed");
    String::from_utf8(cb.as_bytes().to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Vector 1: employment claim, keys in arbitrary order
// ---------------------------------------------------------------------------

#[test]
fn employment_claim_vector() {
    let data = serde_json::json!({
        "type": "EmploymentVerification",
        "credentialId": "emp-123",
        "issuer": "company-abc",
        "subject": "employee-xyz",
        "claim": {"position": "Software Engineer", "department": "Engineering"},
        "issuedAt": "2024-01-01T00:00:00Z",
        "expiresAt": "2025-01-01T00:00:00Z"
    });
    assert_eq!(
        canonical_str(&data),
        r#"{"claim":{"department":"Engineering","position":"Software Engineer"},"credentialId":"emp-123","expiresAt":"2025-01-01T00:00:00Z","issuedAt":"2024-01-01T00:00:00Z","issuer":"company-abc","subject":"employee-xyz","type":"EmploymentVerification"}"#
    );
    assert_eq!(
        hash_claim(&data).unwrap().to_hex(),
        "1b124342e7ac9dd650c33d825f96cfe4c8801ae34f3af940612df9b5fe82b768"
    );
}

// ---------------------------------------------------------------------------
// Vector 2: visa claim
// ---------------------------------------------------------------------------

#[test]
fn visa_claim_vector() {
    let data = serde_json::json!({
        "expiresAt": "2026-01-01T00:00:00Z",
        "claim": {"country": "USA", "visaType": "Work Visa"},
        "type": "VisaVerification",
        "credentialId": "visa-456",
        "issuer": "immigration-office",
        "subject": "applicant-789",
        "issuedAt": "2024-01-01T00:00:00Z"
    });
    assert_eq!(
        hash_claim(&data).unwrap().to_hex(),
        "96ba96b9d066ca843a340e41c9b5ec691701ddcc724fc07896ce45181e31466b"
    );
}

// ---------------------------------------------------------------------------
// Vector 3: nested arrays, null, and booleans
// ---------------------------------------------------------------------------

#[test]
fn nested_mixed_vector() {
    let data = serde_json::json!({"b": [1, 2, {"d": true, "c": null}], "a": 1});
    assert_eq!(canonical_str(&data), r#"{"a":1,"b":[1,2,{"c":null,"d":true}]}"#);
    assert_eq!(
        hash_claim(&data).unwrap().to_hex(),
        "4641785c01db28ced93a957532bada4936a88bc93c0f7451aa3420711e30b33d"
    );
}

// ---------------------------------------------------------------------------
// Typed document and raw JSON produce the same digest
// ---------------------------------------------------------------------------

#[test]
fn typed_document_matches_raw_json() {
    let raw = serde_json::json!({
        "type": "EducationCredential",
        "credentialId": "edu-9",
        "issuer": "university",
        "subject": "graduate",
        "claim": {"degree": "BSc", "year": 2024},
        "issuedAt": "2024-06-01T00:00:00Z",
        "validFrom": "2024-06-01T00:00:00Z",
        "expiresAt": "2099-01-01T00:00:00Z"
    });
    let doc: CredentialDocument = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(doc.hash().unwrap(), hash_claim(&raw).unwrap());
}
