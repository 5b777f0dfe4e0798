//! # Schema Codes
//!
//! The closed enumeration tagging a credential's claim category. The
//! numeric code is what a record stores; the type name is what a claim
//! document carries in its `type` field.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Total number of schema codes.
pub const SCHEMA_CODE_COUNT: usize = 3;

/// Claim category of a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum SchemaCode {
    /// Visa / residency permit.
    Visa = 1,
    /// Degree, diploma, or certificate.
    Education = 2,
    /// Employment verification.
    Employment = 3,
}

impl SchemaCode {
    /// All schema codes in numeric order.
    pub const ALL: [SchemaCode; SCHEMA_CODE_COUNT] =
        [Self::Visa, Self::Education, Self::Employment];

    /// The numeric code stored in a record.
    pub const fn code(&self) -> u8 {
        *self as u8
    }

    /// Credential type name used in claim documents.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Visa => "VisaCredential",
            Self::Education => "EducationCredential",
            Self::Employment => "EmploymentCredential",
        }
    }

    /// Look up a schema by its credential type name.
    pub fn from_type_name(name: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|s| s.type_name() == name)
            .ok_or_else(|| CoreError::UnknownSchema(name.to_string()))
    }
}

impl TryFrom<u64> for SchemaCode {
    type Error = CoreError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Visa),
            2 => Ok(Self::Education),
            3 => Ok(Self::Employment),
            other => Err(CoreError::UnknownSchema(other.to_string())),
        }
    }
}

impl std::fmt::Display for SchemaCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Visa => "visa",
            Self::Education => "education",
            Self::Employment => "employment",
        };
        f.write_str(s)
    }
}
