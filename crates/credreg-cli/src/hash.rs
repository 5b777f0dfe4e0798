//! # Hash Subcommand
//!
//! Computes the canonical hash an issuer submits as `cred_hash`. With
//! `--document` the file is parsed as a full credential document and its
//! schema code and expiry are reported alongside the digest, ready to feed
//! into an issue call.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use credreg_core::{hash_claim, CredentialDocument};

use crate::read_json;

/// Arguments for the `credreg hash` subcommand.
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Path to the JSON claim file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Treat the file as a credential document and report its schema code
    /// and expiry.
    #[arg(long)]
    pub document: bool,
}

/// Execute the hash subcommand.
pub fn run_hash(args: &HashArgs) -> Result<u8> {
    let value = read_json(&args.file)?;

    if !args.document {
        let digest = hash_claim(&value).context("failed to canonicalize claim")?;
        println!("{}", digest.to_hex());
        return Ok(0);
    }

    let summary = document_summary(value)?;
    println!("{summary}");
    Ok(0)
}

/// One-line report for a credential document.
fn document_summary(value: serde_json::Value) -> Result<String> {
    let doc: CredentialDocument =
        serde_json::from_value(value).context("file is not a credential document")?;
    let digest = doc.hash().context("failed to canonicalize document")?;
    let schema = doc
        .schema_code()
        .map_err(|e| anyhow::anyhow!("document type: {e}"))?;
    let expires_at = doc
        .expires_at_timestamp()
        .map_err(|e| anyhow::anyhow!("document expiry: {e}"))?;
    tracing::debug!(credential_id = %doc.credential_id, "hashed credential document");
    Ok(format!(
        "cred_hash={} schema_code={} type={} expires_at={}",
        digest.to_hex(),
        schema.code(),
        schema.type_name(),
        expires_at.epoch_secs()
    ))
}
