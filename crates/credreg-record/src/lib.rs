//! # credreg-record — Fixed-Layout Credential Records
//!
//! The storage format of the credential registry:
//!
//! - **Layout** (`layout.rs`): per-version field tables and
//!   [`field_offset()`], the single source of truth for byte positions.
//!
//! - **Codec** (`codec.rs`): [`encode()`] / [`decode()`] between typed
//!   [`CredentialRecord`]s and their binary form; [`decode_any()`] detects
//!   the version from the length.
//!
//! - **Validator** (`validate.rs`): field-level checks on raw issue input,
//!   run before anything is encoded or stored.
//!
//! ## Crate Policy
//!
//! - Depends only on `credreg-core` internally.
//! - Pure: no I/O, no clocks, no locks.

pub mod codec;
pub mod error;
pub mod layout;
pub mod validate;

pub use codec::{decode, decode_any, encode, CredentialRecord, RecordFields};
pub use error::{LengthRule, MalformedReason, RecordError};
pub use layout::{field_offset, layout, Field, FieldSpan, RecordVersion, V1_LEN, V2_LEN};
pub use validate::{check_expiry, validate_issue, IssueInput, ValidatedIssue};
