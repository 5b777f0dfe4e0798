//! # Verify Subcommand
//!
//! Offline verification of a claim document against a record dump, the way
//! a relying party checks a credential it was handed: revoked, expired,
//! tampered, or presented by the wrong holder.
//!
//! Exit code 0 when valid, 1 otherwise.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use credreg_core::{Address, Timestamp};
use credreg_record::decode_any;
use credreg_registry::{verify, VerificationOutcome};

use crate::{read_json, read_record_hex};

/// Arguments for the `credreg verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// File holding the hex-encoded record.
    #[arg(long, value_name = "FILE")]
    pub record: PathBuf,

    /// JSON claim document presented by the holder.
    #[arg(long, value_name = "FILE")]
    pub claim: PathBuf,

    /// Expected subject address (64 hex chars).
    #[arg(long, value_name = "HEX")]
    pub subject: String,

    /// Evaluate expiry at this epoch second instead of now.
    #[arg(long, value_name = "SECS")]
    pub now: Option<u64>,
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let outcome = check(args)?;
    if outcome.is_valid() {
        println!("OK: credential valid");
        Ok(0)
    } else {
        println!("FAIL: {outcome}");
        Ok(1)
    }
}

fn check(args: &VerifyArgs) -> Result<VerificationOutcome> {
    let bytes = read_record_hex(None, Some(&args.record))?;
    let record = decode_any(&bytes).map_err(|e| anyhow::anyhow!("cannot decode record: {e}"))?;
    let claim = read_json(&args.claim)?;
    let subject =
        Address::from_hex(&args.subject).map_err(|e| anyhow::anyhow!("invalid subject: {e}"))?;
    let now = args.now.map_or_else(Timestamp::now, Timestamp::from_epoch_secs);

    let outcome = verify(&record, &claim, &subject, now)?;
    tracing::info!(outcome = outcome.as_str(), "verification finished");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use credreg_core::identity::hex_encode;
    use credreg_core::{hash_claim, CidPointer, SchemaCode};
    use credreg_record::{encode, CredentialRecord, RecordFields};
    use serde_json::json;
    use std::path::Path;

    const SUBJECT: [u8; 32] = [0x5A; 32];

    fn claim() -> serde_json::Value {
        json!({"type": "EducationCredential", "claim": {"degree": "BSc"}})
    }

    fn write_fixture(dir: &Path, revoked: bool) -> (PathBuf, PathBuf) {
        let record = CredentialRecord::V1(RecordFields {
            issuer: Address::from_bytes([1; 32]),
            subject: Address::from_bytes(SUBJECT),
            schema_code: SchemaCode::Education,
            cred_hash: hash_claim(&claim()).unwrap(),
            issued_at: Timestamp::from_epoch_secs(100),
            expires_at: Timestamp::from_epoch_secs(1_000),
            revoked,
            cid_pointer: CidPointer::default(),
        });
        let record_path = dir.join("record.hex");
        std::fs::write(&record_path, hex_encode(&encode(&record))).unwrap();
        let claim_path = dir.join("claim.json");
        std::fs::write(&claim_path, claim().to_string()).unwrap();
        (record_path, claim_path)
    }

    fn args(record: PathBuf, claim: PathBuf, now: u64) -> VerifyArgs {
        VerifyArgs {
            record,
            claim,
            subject: hex_encode(&SUBJECT),
            now: Some(now),
        }
    }

    #[test]
    fn valid_credential_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let (record, claim) = write_fixture(dir.path(), false);
        assert_eq!(run_verify(&args(record, claim, 500)).unwrap(), 0);
    }

    #[test]
    fn revoked_credential_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let (record, claim) = write_fixture(dir.path(), true);
        let a = args(record, claim, 500);
        assert_eq!(check(&a).unwrap(), VerificationOutcome::Revoked);
        assert_eq!(run_verify(&a).unwrap(), 1);
    }

    #[test]
    fn expired_credential() {
        let dir = tempfile::tempdir().unwrap();
        let (record, claim) = write_fixture(dir.path(), false);
        assert_eq!(check(&args(record, claim, 1_000)).unwrap().as_str(), "expired");
    }

    #[test]
    fn wrong_holder() {
        let dir = tempfile::tempdir().unwrap();
        let (record, claim) = write_fixture(dir.path(), false);
        let mut a = args(record, claim, 500);
        a.subject = "00".repeat(32);
        assert_eq!(check(&a).unwrap().as_str(), "subject_mismatch");
    }

    #[test]
    fn bad_subject_hex_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let (record, claim) = write_fixture(dir.path(), false);
        let mut a = args(record, claim, 500);
        a.subject = "xyz".to_string();
        assert!(run_verify(&a).is_err());
    }
}
