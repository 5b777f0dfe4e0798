//! # credreg CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use credreg_cli::hash::{run_hash, HashArgs};
use credreg_cli::record::{run_decode, run_layout, DecodeArgs, LayoutArgs};
use credreg_cli::session::{run_session, RunArgs};
use credreg_cli::verify::{run_verify, VerifyArgs};

/// Credential registry toolchain.
///
/// Hashes claim documents, describes and decodes fixed-layout credential
/// records, verifies presented claims offline, and runs scripted registry
/// sessions in process.
#[derive(Parser, Debug)]
#[command(name = "credreg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    /// Path to a YAML registry configuration. Defaults to CREDREG_* variables.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Canonical SHA-256 hash of a JSON claim.
    Hash(HashArgs),

    /// Print the byte layout of a record version.
    Layout(LayoutArgs),

    /// Decode a hex-encoded record.
    Decode(DecodeArgs),

    /// Verify a claim document against a hex-encoded record.
    Verify(VerifyArgs),

    /// Run a YAML session script against an in-process registry.
    Run(RunArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    tracing::debug!("credreg CLI starting");

    let result = match &cli.command {
        Commands::Hash(args) => run_hash(args),
        Commands::Layout(args) => run_layout(args),
        Commands::Decode(args) => run_decode(args),
        Commands::Verify(args) => run_verify(args),
        Commands::Run(args) => run_session(args, cli.config.as_deref()),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Verbosity picks the default filter; `RUST_LOG` overrides it when set.
fn init_tracing(verbose: u8, format: LogFormat) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
