//! Domain error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// A column that must be unique across all supplier records.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniqueField {
    #[serde(rename = "taxId")]
    TaxId,
    #[serde(rename = "contactEmail")]
    ContactEmail,
}

impl UniqueField {
    /// Wire name of the field, as used in forms and error payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueField::TaxId => "taxId",
            UniqueField::ContactEmail => "contactEmail",
        }
    }
}

impl core::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-level error.
///
/// Every variant is recoverable from the caller's point of view and is meant to be
/// rendered to the end user; none of them should ever take the process down.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required form field was missing or unusable.
    #[error("missing or invalid required field: {field}")]
    Validation { field: &'static str },

    /// Tax id or email already belongs to another supplier.
    #[error("{field} is already registered")]
    DuplicateKey { field: UniqueField },

    /// Unknown, already used, or expired validation token.
    ///
    /// The cases are deliberately not distinguished.
    #[error("validation token is invalid or has expired")]
    InvalidOrExpiredToken,

    /// A requested record was not found.
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(field: &'static str) -> Self {
        Self::Validation { field }
    }

    pub fn duplicate(field: UniqueField) -> Self {
        Self::DuplicateKey { field }
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Name of the offending field, when the error is about one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            DomainError::Validation { field } => Some(field),
            DomainError::DuplicateKey { field } => Some(field.as_str()),
            DomainError::InvalidOrExpiredToken | DomainError::NotFound => None,
        }
    }
}
