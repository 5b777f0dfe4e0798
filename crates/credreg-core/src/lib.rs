//! # credreg-core — Foundational Types for the Credential Registry
//!
//! This crate is the leaf of the workspace. It defines the primitives every
//! other crate builds on:
//!
//! 1. **`CanonicalBytes` newtype.** All claim hashing flows through
//!    `CanonicalBytes::new()`. The same claim content yields the same bytes
//!    regardless of map key order.
//!
//! 2. **`CredHash`.** The 32-byte SHA-256 digest stored in a credential
//!    record's integrity field. [`hash_claim()`] is the Credential Hasher.
//!
//! 3. **Identifier newtypes.** `Address`, `CredentialId`, `CidPointer`,
//!    `AssetRef`, each with a validating constructor. No bare byte vectors
//!    cross crate boundaries.
//!
//! 4. **`SchemaCode`.** A closed enumeration (visa, education, employment).
//!    Adding a schema forces every `match` to handle it.
//!
//! 5. **`Timestamp` and `Clock`.** Unsigned epoch seconds plus an injected
//!    clock so the registry never trusts caller-supplied issue times.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `credreg-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod claim;
pub mod digest;
pub mod error;
pub mod identity;
pub mod schema;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use claim::CredentialDocument;
pub use digest::{hash_claim, sha256_digest, CredHash};
pub use error::{CanonicalizationError, CoreError};
pub use identity::{Address, AssetRef, CidPointer, CredentialId};
pub use schema::{SchemaCode, SCHEMA_CODE_COUNT};
pub use temporal::{Clock, FixedClock, SystemClock, Timestamp};
