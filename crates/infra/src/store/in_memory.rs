use std::collections::BTreeMap;
use std::sync::RwLock;

use supplierbank_core::{SupplierId, UniqueField};
use supplierbank_suppliers::{NewSupplier, SupplierRecord, ValidationToken};

use super::r#trait::{StoreError, SupplierStore};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<SupplierId, SupplierRecord>,
    last_id: i64,
}

impl Table {
    fn collision(&self, supplier: &NewSupplier) -> Option<UniqueField> {
        if self.rows.values().any(|r| r.tax_id == supplier.tax_id) {
            return Some(UniqueField::TaxId);
        }
        if self
            .rows
            .values()
            .any(|r| r.contact_email.eq_ignore_ascii_case(&supplier.contact_email))
        {
            return Some(UniqueField::ContactEmail);
        }
        None
    }
}

/// In-memory supplier table.
///
/// Intended for tests/dev. A single lock serializes writers, so unique-key checks
/// and the insert they guard happen atomically.
#[derive(Debug, Default)]
pub struct InMemorySupplierStore {
    table: RwLock<Table>,
}

impl InMemorySupplierStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Backend("lock poisoned".to_string())
    }
}

#[async_trait::async_trait]
impl SupplierStore for InMemorySupplierStore {
    async fn insert(&self, supplier: NewSupplier) -> Result<SupplierId, StoreError> {
        let mut table = self.table.write().map_err(|_| Self::poisoned())?;

        if let Some(field) = table.collision(&supplier) {
            return Err(StoreError::DuplicateKey(field));
        }
        if table
            .rows
            .values()
            .any(|r| r.validation_token.as_ref() == Some(&supplier.validation_token))
        {
            return Err(StoreError::Backend("validation token collision".to_string()));
        }

        table.last_id += 1;
        let id = SupplierId::new(table.last_id);
        table.rows.insert(id, SupplierRecord::from_new(id, supplier));
        Ok(id)
    }

    async fn find_by_token(
        &self,
        token: &ValidationToken,
    ) -> Result<Option<SupplierRecord>, StoreError> {
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(table
            .rows
            .values()
            .find(|r| r.validation_token.as_ref() == Some(token))
            .cloned())
    }

    async fn find_validated(&self) -> Result<Vec<SupplierRecord>, StoreError> {
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        let mut validated: Vec<SupplierRecord> = table
            .rows
            .values()
            .filter(|r| r.is_validated)
            .cloned()
            .collect();
        validated.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(validated)
    }

    async fn mark_validated(&self, id: SupplierId) -> Result<(), StoreError> {
        let mut table = self.table.write().map_err(|_| Self::poisoned())?;
        let record = table.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if !record.mark_validated() {
            return Err(StoreError::AlreadyValidated(id));
        }
        Ok(())
    }

    async fn get(&self, id: SupplierId) -> Result<Option<SupplierRecord>, StoreError> {
        let table = self.table.read().map_err(|_| Self::poisoned())?;
        Ok(table.rows.get(&id).cloned())
    }
}
