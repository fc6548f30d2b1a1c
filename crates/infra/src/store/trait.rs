use std::sync::Arc;

use thiserror::Error;

use supplierbank_core::{SupplierId, UniqueField};
use supplierbank_suppliers::{NewSupplier, SupplierRecord, ValidationToken};

/// Record store operation error.
///
/// These are **storage-boundary errors** as opposed to form validation errors,
/// which never reach the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique constraint fired; the field names which one.
    #[error("duplicate key: {0}")]
    DuplicateKey(UniqueField),

    #[error("supplier {0} not found")]
    NotFound(SupplierId),

    /// The record exists but already left the pending state.
    #[error("supplier {0} is already validated")]
    AlreadyValidated(SupplierId),

    /// The backend failed (IO, pool, corrupt row, poisoned lock).
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Persistent table of supplier records.
///
/// ## Implementation Requirements
///
/// Implementations must:
/// - reject an insert whose tax id or contact email already exists, atomically
///   (nothing is written) and report which key collided
/// - assign ids monotonically, starting at 1
/// - keep `validation_token` unique while present
/// - apply `mark_validated` only to pending records, in one atomic step that sets
///   `is_validated` and clears both token and expiry
#[async_trait::async_trait]
pub trait SupplierStore: Send + Sync {
    /// Insert a new pending record and return its assigned id.
    async fn insert(&self, supplier: NewSupplier) -> Result<SupplierId, StoreError>;

    /// Look up the record currently holding exactly this token.
    async fn find_by_token(
        &self,
        token: &ValidationToken,
    ) -> Result<Option<SupplierRecord>, StoreError>;

    /// All validated records, newest `created_at` first (ties: higher id first).
    async fn find_validated(&self) -> Result<Vec<SupplierRecord>, StoreError>;

    /// Transition a pending record to validated, retiring its token.
    async fn mark_validated(&self, id: SupplierId) -> Result<(), StoreError>;

    async fn get(&self, id: SupplierId) -> Result<Option<SupplierRecord>, StoreError>;
}

#[async_trait::async_trait]
impl<S> SupplierStore for Arc<S>
where
    S: SupplierStore + ?Sized,
{
    async fn insert(&self, supplier: NewSupplier) -> Result<SupplierId, StoreError> {
        (**self).insert(supplier).await
    }

    async fn find_by_token(
        &self,
        token: &ValidationToken,
    ) -> Result<Option<SupplierRecord>, StoreError> {
        (**self).find_by_token(token).await
    }

    async fn find_validated(&self) -> Result<Vec<SupplierRecord>, StoreError> {
        (**self).find_validated().await
    }

    async fn mark_validated(&self, id: SupplierId) -> Result<(), StoreError> {
        (**self).mark_validated(id).await
    }

    async fn get(&self, id: SupplierId) -> Result<Option<SupplierRecord>, StoreError> {
        (**self).get(id).await
    }
}
