use thiserror::Error;

use supplierbank_core::DomainError;

use crate::store::StoreError;

/// Failure of a registration or validation request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// Caused by the request itself; safe to show to the registrant.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The store failed. Not the registrant's fault.
    #[error("supplier store failure: {0}")]
    Store(String),
}

impl WorkflowError {
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            WorkflowError::Domain(e) => Some(e),
            WorkflowError::Store(_) => None,
        }
    }
}

impl From<StoreError> for WorkflowError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateKey(field) => WorkflowError::Domain(DomainError::duplicate(field)),
            StoreError::NotFound(_) => WorkflowError::Domain(DomainError::not_found()),
            other @ (StoreError::AlreadyValidated(_) | StoreError::Backend(_)) => {
                WorkflowError::Store(other.to_string())
            }
        }
    }
}
