//! # credreg-registry — Credential Registry Store
//!
//! A keyed registry of fixed-layout credential records with one write
//! authority.
//!
//! ## Modules
//!
//! - `authority`: the single issuer and the caller check.
//! - `backend`: [`BoxStore`], the keyed byte-box substrate, and the
//!   in-memory [`MemoryBoxStore`].
//! - `config`: [`RegistryConfig`] from environment or YAML.
//! - `registry`: [`Registry`]: issue, revoke, get, get_asset_ref, verify.
//! - `status`: time-derived credential status.
//! - `verify`: offline claim verification against a record.
//!
//! ## Concurrency
//!
//! Writes are serialized by the store. Two concurrent issues on one
//! identifier produce exactly one success and one `DuplicateKey`. The
//! authority and configuration are immutable and shared without locking.

pub mod authority;
pub mod backend;
pub mod config;
pub mod error;
pub mod registry;
pub mod status;
pub mod verify;

pub use authority::AuthorityContext;
pub use backend::{BoxError, BoxStore, MemoryBoxStore};
pub use config::{ConfigError, RegistryConfig};
pub use error::{ErrorKind, RegistryError};
pub use registry::{Registry, RevokeOutcome};
pub use status::{CredentialEntry, CredentialStatus};
pub use verify::{verify, VerificationOutcome};
