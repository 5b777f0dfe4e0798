//! # Layout and Decode Subcommands
//!
//! `layout` prints the field table of a record version straight from
//! `credreg_record::layout`. `decode` parses a hex record dump, detecting
//! the version from its length, and prints it as JSON with the status it
//! would have at the given time.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use credreg_core::Timestamp;
use credreg_record::{decode_any, layout, CredentialRecord, FieldSpan, RecordVersion};
use credreg_registry::CredentialStatus;

use crate::read_record_hex;

/// Arguments for the `credreg layout` subcommand.
#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Record version to describe (v1 or v2).
    #[arg(long, default_value = "v1")]
    pub record_version: RecordVersion,

    /// Emit JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `credreg decode` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex-encoded record.
    #[arg(value_name = "HEX")]
    pub hex: Option<String>,

    /// Read the hex-encoded record from a file instead.
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Evaluate status at this epoch second instead of now.
    #[arg(long, value_name = "SECS")]
    pub now: Option<u64>,
}

#[derive(Serialize)]
struct LayoutView<'a> {
    version: RecordVersion,
    length: usize,
    fields: &'a [FieldSpan],
}

#[derive(Serialize)]
struct DecodedView<'a> {
    length: usize,
    record: &'a CredentialRecord,
    status: CredentialStatus,
    issued_at_iso: String,
    expires_at_iso: String,
}

/// Execute the layout subcommand.
pub fn run_layout(args: &LayoutArgs) -> Result<u8> {
    println!("{}", render_layout(args.record_version, args.json)?);
    Ok(0)
}

/// Execute the decode subcommand.
pub fn run_decode(args: &DecodeArgs) -> Result<u8> {
    let bytes = read_record_hex(args.hex.as_deref(), args.file.as_deref())?;
    let now = args.now.map_or_else(Timestamp::now, Timestamp::from_epoch_secs);
    println!("{}", render_decoded(&bytes, now)?);
    Ok(0)
}

fn render_layout(version: RecordVersion, json: bool) -> Result<String> {
    let fields = layout(version);
    if json {
        let view = LayoutView {
            version,
            length: version.record_len(),
            fields,
        };
        return Ok(serde_json::to_string_pretty(&view)?);
    }

    let mut out = format!("{version} ({} bytes)\n", version.record_len());
    out.push_str(&format!("{:<16} {:>6} {:>6}\n", "field", "offset", "length"));
    for span in fields {
        out.push_str(&format!(
            "{:<16} {:>6} {:>6}\n",
            span.field.name(),
            span.start,
            span.len
        ));
    }
    Ok(out.trim_end().to_string())
}

fn render_decoded(bytes: &[u8], now: Timestamp) -> Result<String> {
    let record = decode_any(bytes).map_err(|e| anyhow::anyhow!("cannot decode record: {e}"))?;
    let fields = record.fields();
    let view = DecodedView {
        length: bytes.len(),
        status: CredentialStatus::at(&record, now),
        issued_at_iso: fields.issued_at.to_iso8601(),
        expires_at_iso: fields.expires_at.to_iso8601(),
        record: &record,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}
