use chrono::{DateTime, Utc};

use supplierbank_core::{DomainError, SupplierId};
use supplierbank_suppliers::ValidationToken;

use crate::store::{StoreError, SupplierStore};

use super::WorkflowError;

/// Outcome of a successful validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validated {
    pub id: SupplierId,
}

/// Consumes validation tokens.
///
/// Unknown, expired and already-used tokens all fail the same way, so a caller
/// cannot probe which tokens exist.
#[derive(Debug, Clone)]
pub struct Validator<S> {
    store: S,
}

impl<S> Validator<S>
where
    S: SupplierStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn validate(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Validated, WorkflowError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DomainError::InvalidOrExpiredToken.into());
        }

        let Some(record) = self
            .store
            .find_by_token(&ValidationToken::new(token))
            .await?
        else {
            return Err(DomainError::InvalidOrExpiredToken.into());
        };

        if record.token_expired_at(now) {
            tracing::info!(supplier_id = %record.id, "validation token expired");
            return Err(DomainError::InvalidOrExpiredToken.into());
        }

        match self.store.mark_validated(record.id).await {
            Ok(()) => {
                tracing::info!(supplier_id = %record.id, "supplier validated");
                Ok(Validated { id: record.id })
            }
            // Lost a race with a concurrent validation of the same token.
            Err(StoreError::NotFound(_) | StoreError::AlreadyValidated(_)) => {
                Err(DomainError::InvalidOrExpiredToken.into())
            }
            Err(err) => Err(err.into()),
        }
    }
}
