//! # credreg-cli — Credential Registry Command-Line Interface
//!
//! Thin tooling over the registry crates. Every handler delegates to
//! `credreg-core`, `credreg-record` or `credreg-registry`; nothing here
//! re-implements hashing, layout or validation.
//!
//! ## Subcommands
//!
//! - `credreg hash`: canonical hash of a JSON claim
//! - `credreg layout`: byte layout of a record version
//! - `credreg decode`: decode a hex record dump
//! - `credreg verify`: verify a claim against a hex record dump
//! - `credreg run`: execute a YAML session script against an in-process
//!   registry
//!
//! ```bash
//! credreg hash claim.json
//! credreg layout --record-version v2
//! credreg decode --file record.hex
//! credreg run session.yaml --config registry.yaml
//! ```

pub mod hash;
pub mod record;
pub mod session;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};

use credreg_core::identity::hex_decode;
use credreg_registry::RegistryConfig;

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse JSON: {}", path.display()))
}

/// Read a hex record dump, given inline or as a file.
pub fn read_record_hex(inline: Option<&str>, file: Option<&Path>) -> Result<Vec<u8>> {
    let text = match (inline, file) {
        (Some(hex), None) => hex.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read record dump: {}", path.display()))?,
        (Some(_), Some(_)) => anyhow::bail!("pass either a hex record or --file, not both"),
        (None, None) => anyhow::bail!("no record given: pass a hex string or --file"),
    };
    let compact: String = text.split_whitespace().collect();
    hex_decode("record", &compact).map_err(|e| anyhow::anyhow!("invalid record dump: {e}"))
}

/// Registry configuration from `--config`, falling back to the environment.
pub fn load_config(path: Option<&Path>) -> Result<RegistryConfig> {
    match path {
        Some(path) => RegistryConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => RegistryConfig::from_env().context("failed to load config from environment"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_record_hex_inline_and_file() {
        assert_eq!(read_record_hex(Some("0a0b"), None).unwrap(), vec![10, 11]);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0a 0b\n0c").unwrap();
        assert_eq!(
            read_record_hex(None, Some(file.path())).unwrap(),
            vec![10, 11, 12]
        );
    }

    #[test]
    fn read_record_hex_requires_exactly_one_source() {
        assert!(read_record_hex(None, None).is_err());
        assert!(read_record_hex(Some("00"), Some(Path::new("x"))).is_err());
        let err = read_record_hex(Some("zz"), None).unwrap_err().to_string();
        assert!(err.contains("invalid record dump"), "{err}");
    }

    #[test]
    fn read_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = format!("{:#}", read_json(&path).unwrap_err());
        assert!(err.contains("failed to parse JSON"), "{err}");
    }

    #[test]
    fn load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "issuer: \"{}\"", "ab".repeat(32)).unwrap();
        let cfg = load_config(Some(file.path())).unwrap();
        assert_eq!(cfg.issuer.to_hex(), "ab".repeat(32));
    }
}
