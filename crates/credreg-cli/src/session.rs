//! # Run Subcommand — Scripted Registry Sessions
//!
//! Executes a YAML script of registry operations against a fresh in-process
//! registry and prints one JSON report per step. Useful for exercising the
//! issue / revoke / read lifecycle without a ledger behind it.
//!
//! ```yaml
//! now: 1700000000
//! steps:
//!   - op: issue
//!     id: cred-1
//!     subject: "0000000000000000000000000000000000000000000000000000000000000001"
//!     schema_code: 2
//!     claim: { degree: BSc }
//!     expires_at: 4102444800
//!   - op: revoke
//!     id: cred-1
//!   - op: get
//!     id: cred-1
//! ```
//!
//! The registry clock is fixed at `now` (default: wall-clock time at start)
//! and moves only through `advance` steps. Writes default to the configured
//! issuer as caller; set `caller` to try another identity.
//!
//! Exit code 0 when every step succeeded, 1 otherwise.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use credreg_core::identity::hex_decode;
use credreg_core::{hash_claim, Address, Clock, CredentialId, FixedClock, Timestamp};
use credreg_record::IssueInput;
use credreg_registry::{MemoryBoxStore, Registry, RegistryConfig, RegistryError};

use crate::load_config;

/// Arguments for the `credreg run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the YAML session script.
    #[arg(value_name = "SCRIPT")]
    pub script: PathBuf,
}

/// A session script.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Initial registry time in epoch seconds.
    #[serde(default)]
    pub now: Option<u64>,
    /// Operations, run in order.
    pub steps: Vec<Step>,
}

/// One scripted operation.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Create a record.
    Issue {
        id: String,
        #[serde(default)]
        caller: Option<String>,
        /// Hex subject address.
        subject: String,
        schema_code: u64,
        /// Hex digest. Mutually exclusive with `claim`.
        #[serde(default)]
        cred_hash: Option<String>,
        /// Claim to hash into `cred_hash`.
        #[serde(default)]
        claim: Option<serde_json::Value>,
        expires_at: u64,
        #[serde(default)]
        cid_pointer: String,
        #[serde(default)]
        asset_ref: Option<u64>,
    },
    /// Set the revoked flag.
    Revoke {
        id: String,
        #[serde(default)]
        caller: Option<String>,
    },
    /// Read a record.
    Get { id: String },
    /// Read a record's asset reference.
    GetAssetRef { id: String },
    /// Verify a claim against a record.
    Verify {
        id: String,
        claim: serde_json::Value,
        /// Hex address of the expected holder.
        subject: String,
    },
    /// Move the registry clock forward.
    Advance { secs: u64 },
}

impl Step {
    fn op(&self) -> &'static str {
        match self {
            Self::Issue { .. } => "issue",
            Self::Revoke { .. } => "revoke",
            Self::Get { .. } => "get",
            Self::GetAssetRef { .. } => "get_asset_ref",
            Self::Verify { .. } => "verify",
            Self::Advance { .. } => "advance",
        }
    }
}

/// Outcome of one step.
#[derive(Debug, Serialize)]
pub struct StepReport {
    /// Zero-based step index.
    pub step: usize,
    /// Operation name.
    pub op: &'static str,
    /// Whether the registry accepted the operation.
    pub ok: bool,
    /// Operation result on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Error kind on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    /// Error message on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Execute the run subcommand.
pub fn run_session(args: &RunArgs, config_path: Option<&Path>) -> Result<u8> {
    let config = load_config(config_path)?;
    let text = std::fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read script: {}", args.script.display()))?;
    let script: Script = serde_yaml::from_str(&text)
        .with_context(|| format!("failed to parse script: {}", args.script.display()))?;

    let reports = execute(&script, config)?;
    for report in &reports {
        println!("{}", serde_json::to_string(report)?);
    }
    Ok(if reports.iter().all(|r| r.ok) { 0 } else { 1 })
}

/// Run every step of `script` against a fresh registry.
///
/// Registry rejections become failed reports. Malformed script input (bad
/// hex, a missing hash) aborts the session.
pub fn execute(script: &Script, config: RegistryConfig) -> Result<Vec<StepReport>> {
    let start = script.now.map_or_else(Timestamp::now, Timestamp::from_epoch_secs);
    let clock = Arc::new(FixedClock::new(start));
    let registry = Registry::new(config, MemoryBoxStore::new(), clock.clone());
    tracing::info!(
        issuer = %registry.issuer(),
        version = %registry.record_version(),
        steps = script.steps.len(),
        "session started"
    );

    let mut reports = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.iter().enumerate() {
        let result = apply(&registry, &clock, step)
            .with_context(|| format!("step {index} ({})", step.op()))?;
        reports.push(StepReport::new(index, step.op(), result));
    }
    Ok(reports)
}

impl StepReport {
    fn new(step: usize, op: &'static str, result: StepResult) -> Self {
        match result {
            Ok(value) => Self {
                step,
                op,
                ok: true,
                value,
                error: None,
                message: None,
            },
            Err(e) => Self {
                step,
                op,
                ok: false,
                value: None,
                error: Some(e.kind()),
                message: Some(e.to_string()),
            },
        }
    }
}

/// Why a step produced no value.
#[derive(Debug)]
enum StepError {
    /// The registry rejected the operation.
    Registry(RegistryError),
    /// The operation succeeded but its result could not be rendered as JSON.
    Encode(serde_json::Error),
}

impl StepError {
    fn kind(&self) -> &'static str {
        match self {
            Self::Registry(e) => e.kind().as_str(),
            Self::Encode(_) => "encode",
        }
    }
}

impl std::fmt::Display for StepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registry(e) => write!(f, "{e}"),
            Self::Encode(e) => write!(f, "cannot render result: {e}"),
        }
    }
}

type StepResult = std::result::Result<Option<serde_json::Value>, StepError>;

fn apply(registry: &Registry, clock: &FixedClock, step: &Step) -> Result<StepResult> {
    match step {
        Step::Issue {
            id,
            caller,
            subject,
            schema_code,
            cred_hash,
            claim,
            expires_at,
            cid_pointer,
            asset_ref,
        } => {
            let id = parse_id(id)?;
            let caller = parse_caller(registry, caller.as_deref())?;
            let subject = hex_decode("subject", subject)?;
            let hash = match (cred_hash, claim) {
                (Some(hex), None) => hex_decode("cred_hash", hex)?,
                (None, Some(claim)) => hash_claim(claim)?.as_bytes().to_vec(),
                _ => bail!("issue needs exactly one of cred_hash or claim"),
            };
            let asset = asset_ref.map(u64::to_be_bytes);
            let input = IssueInput {
                subject: &subject,
                schema_code: *schema_code,
                cred_hash: &hash,
                expires_at: Timestamp::from_epoch_secs(*expires_at),
                cid_pointer: cid_pointer.as_bytes(),
                asset_ref: asset.as_ref().map(|a| &a[..]),
            };
            Ok(to_value(registry.issue(&caller, &id, &input)))
        }
        Step::Revoke { id, caller } => {
            let id = parse_id(id)?;
            let caller = parse_caller(registry, caller.as_deref())?;
            Ok(to_value(registry.revoke(&caller, &id)))
        }
        Step::Get { id } => Ok(to_value(registry.get(&parse_id(id)?))),
        Step::GetAssetRef { id } => Ok(to_value(registry.get_asset_ref(&parse_id(id)?))),
        Step::Verify { id, claim, subject } => {
            let subject = Address::from_hex(subject)?;
            Ok(to_value(registry.verify(&parse_id(id)?, claim, &subject)))
        }
        Step::Advance { secs } => {
            clock.advance(*secs);
            Ok(Ok(Some(serde_json::json!({ "now": clock.now().epoch_secs() }))))
        }
    }
}

fn to_value<T: Serialize>(result: std::result::Result<T, RegistryError>) -> StepResult {
    let value = result.map_err(StepError::Registry)?;
    serde_json::to_value(value).map(Some).map_err(StepError::Encode)
}

fn parse_id(id: &str) -> Result<CredentialId> {
    CredentialId::try_from(id).map_err(|e| anyhow::anyhow!("invalid credential id: {e}"))
}

fn parse_caller(registry: &Registry, caller: Option<&str>) -> Result<Address> {
    match caller {
        Some(hex) => Address::from_hex(hex).map_err(|e| anyhow::anyhow!("invalid caller: {e}")),
        None => Ok(*registry.issuer()),
    }
}
