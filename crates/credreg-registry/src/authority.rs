//! # Authority Context
//!
//! The single issuer permitted to write to a registry. Fixed when the
//! registry is built and never changed afterwards, so it needs no lock.
//!
//! Caller comparison is constant-time over the 32 address bytes.

use subtle::ConstantTimeEq;

use credreg_core::Address;

use crate::error::RegistryError;

/// The registry's write authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorityContext {
    issuer: Address,
}

impl AuthorityContext {
    /// Bind the authority to `issuer`.
    pub const fn new(issuer: Address) -> Self {
        Self { issuer }
    }

    /// The authorized issuer.
    pub fn issuer(&self) -> &Address {
        &self.issuer
    }

    /// Whether `caller` is the issuer.
    pub fn is_issuer(&self, caller: &Address) -> bool {
        caller.as_bytes()[..].ct_eq(&self.issuer.as_bytes()[..]).into()
    }

    /// Reject any caller other than the issuer.
    ///
    /// `operation` names the attempted write in the rejection log.
    pub fn authorize(
        &self,
        caller: &Address,
        operation: &'static str,
    ) -> Result<(), RegistryError> {
        if self.is_issuer(caller) {
            return Ok(());
        }
        tracing::warn!(
            caller = %caller,
            operation,
            "rejected write from non-issuer"
        );
        Err(RegistryError::Unauthorized { caller: *caller })
    }
}
