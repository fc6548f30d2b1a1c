//! SQLite-backed supplier store.
//!
//! Records live in a single `suppliers` table. Uniqueness of tax id, contact email
//! and validation token is enforced by the table itself, so an insert that would
//! violate one of them fails atomically inside SQLite.
//!
//! ## Error Mapping
//!
//! | SQLx Error | Constraint | StoreError |
//! |------------|------------|------------|
//! | Database (unique violation) | `suppliers.tax_id` | `DuplicateKey(TaxId)` |
//! | Database (unique violation) | `suppliers.contact_email` | `DuplicateKey(ContactEmail)` |
//! | Database (other) / pool / IO | any | `Backend` |
//!
//! Timestamps are stored as RFC 3339 text with a fixed nanosecond precision so that
//! lexical order matches chronological order.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Row, SqlitePool};
use tracing::instrument;

use supplierbank_core::{SupplierId, UniqueField};
use supplierbank_suppliers::{
    NewSupplier, ServiceCategory, SocialLinks, SupplierRecord, ValidationToken,
};

use super::r#trait::{StoreError, SupplierStore};

const SELECT_COLUMNS: &str = r#"
    SELECT
        id,
        name,
        contact_email,
        tax_id,
        primary_phone,
        secondary_phone,
        city,
        category,
        description,
        linkedin,
        website,
        facebook,
        instagram,
        consent_at,
        validation_token,
        token_expires_at,
        is_validated,
        created_at
    FROM suppliers
"#;

/// SQLite-backed supplier table.
///
/// `SqlitePool` is `Send + Sync` and cheap to clone; so is this store.
#[derive(Debug, Clone)]
pub struct SqliteSupplierStore {
    pool: SqlitePool,
}

impl SqliteSupplierStore {
    /// Wrap an existing pool. Call [`SqliteSupplierStore::migrate`] before use.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating the file if needed) the database at `url` and ensure the schema.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::Backend(format!("invalid database url {url}: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Private in-memory database (single connection, so every query sees the same data).
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Create the `suppliers` table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS suppliers (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                name             TEXT NOT NULL,
                contact_email    TEXT NOT NULL UNIQUE COLLATE NOCASE,
                tax_id           TEXT NOT NULL UNIQUE,
                primary_phone    TEXT NOT NULL,
                secondary_phone  TEXT NULL,
                city             TEXT NOT NULL,
                category         TEXT NOT NULL,
                description      TEXT NOT NULL,
                linkedin         TEXT NULL,
                website          TEXT NULL,
                facebook         TEXT NULL,
                instagram        TEXT NULL,
                consent_at       TEXT NOT NULL,
                validation_token TEXT NULL UNIQUE,
                token_expires_at TEXT NULL,
                is_validated     INTEGER NOT NULL DEFAULT 0,
                created_at       TEXT NOT NULL,
                CHECK (is_validated = 0 OR (validation_token IS NULL AND token_expires_at IS NULL)),
                CHECK (validation_token IS NULL OR token_expires_at IS NOT NULL)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("migrate", e))?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl SupplierStore for SqliteSupplierStore {
    #[instrument(skip(self, supplier), fields(category = %supplier.category), err)]
    async fn insert(&self, supplier: NewSupplier) -> Result<SupplierId, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO suppliers (
                name,
                contact_email,
                tax_id,
                primary_phone,
                secondary_phone,
                city,
                category,
                description,
                linkedin,
                website,
                facebook,
                instagram,
                consent_at,
                validation_token,
                token_expires_at,
                is_validated,
                created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, 0, ?16)
            "#,
        )
        .bind(&supplier.name)
        .bind(&supplier.contact_email)
        .bind(&supplier.tax_id)
        .bind(&supplier.primary_phone)
        .bind(&supplier.secondary_phone)
        .bind(&supplier.city)
        .bind(supplier.category.as_str())
        .bind(&supplier.description)
        .bind(&supplier.links.linkedin)
        .bind(&supplier.links.website)
        .bind(&supplier.links.facebook)
        .bind(&supplier.links.instagram)
        .bind(format_ts(supplier.consent_at))
        .bind(supplier.validation_token.as_str())
        .bind(format_ts(supplier.token_expires_at))
        .bind(format_ts(supplier.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_supplier", e))?;

        Ok(SupplierId::new(result.last_insert_rowid()))
    }

    async fn find_by_token(
        &self,
        token: &ValidationToken,
    ) -> Result<Option<SupplierRecord>, StoreError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE validation_token = ?1"))
            .bind(token.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_token", e))?;

        row.map(|r| decode_row(&r)).transpose()
    }

    async fn find_validated(&self) -> Result<Vec<SupplierRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE is_validated = 1 ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_validated", e))?;

        rows.iter().map(decode_row).collect()
    }

    #[instrument(skip(self), fields(supplier_id = %id), err)]
    async fn mark_validated(&self, id: SupplierId) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE suppliers
            SET is_validated = 1,
                validation_token = NULL,
                token_expires_at = NULL
            WHERE id = ?1 AND is_validated = 0
            "#,
        )
        .bind(id.value())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("mark_validated", e))?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        // Nothing changed: either the row is missing or it already left the pending state.
        match self.get(id).await? {
            Some(_) => Err(StoreError::AlreadyValidated(id)),
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn get(&self, id: SupplierId) -> Result<Option<SupplierRecord>, StoreError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_supplier", e))?;

        row.map(|r| decode_row(&r)).transpose()
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            let msg = db_err.message();
            if msg.contains("suppliers.tax_id") {
                StoreError::DuplicateKey(UniqueField::TaxId)
            } else if msg.contains("suppliers.contact_email") {
                StoreError::DuplicateKey(UniqueField::ContactEmail)
            } else {
                StoreError::Backend(format!("unique violation in {operation}: {msg}"))
            }
        }
        sqlx::Error::Database(db_err) => {
            StoreError::Backend(format!("database error in {operation}: {}", db_err.message()))
        }
        other => StoreError::Backend(format!("{operation} failed: {other}")),
    }
}

fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_ts(column: &str, value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Backend(format!("invalid {column} timestamp {value:?}: {e}")))
}

// SQLx row types

#[derive(Debug)]
struct SupplierRow {
    id: i64,
    name: String,
    contact_email: String,
    tax_id: String,
    primary_phone: String,
    secondary_phone: Option<String>,
    city: String,
    category: String,
    description: String,
    linkedin: Option<String>,
    website: Option<String>,
    facebook: Option<String>,
    instagram: Option<String>,
    consent_at: String,
    validation_token: Option<String>,
    token_expires_at: Option<String>,
    is_validated: bool,
    created_at: String,
}

impl<'r> FromRow<'r, SqliteRow> for SupplierRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(SupplierRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            contact_email: row.try_get("contact_email")?,
            tax_id: row.try_get("tax_id")?,
            primary_phone: row.try_get("primary_phone")?,
            secondary_phone: row.try_get("secondary_phone")?,
            city: row.try_get("city")?,
            category: row.try_get("category")?,
            description: row.try_get("description")?,
            linkedin: row.try_get("linkedin")?,
            website: row.try_get("website")?,
            facebook: row.try_get("facebook")?,
            instagram: row.try_get("instagram")?,
            consent_at: row.try_get("consent_at")?,
            validation_token: row.try_get("validation_token")?,
            token_expires_at: row.try_get("token_expires_at")?,
            is_validated: row.try_get("is_validated")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl TryFrom<SupplierRow> for SupplierRecord {
    type Error = StoreError;

    fn try_from(row: SupplierRow) -> Result<Self, Self::Error> {
        let category = ServiceCategory::from_str(&row.category).map_err(|_| {
            StoreError::Backend(format!("unknown category {:?} in row {}", row.category, row.id))
        })?;
        let token_expires_at = row
            .token_expires_at
            .as_deref()
            .map(|v| parse_ts("token_expires_at", v))
            .transpose()?;

        Ok(SupplierRecord {
            id: SupplierId::new(row.id),
            name: row.name,
            contact_email: row.contact_email,
            tax_id: row.tax_id,
            primary_phone: row.primary_phone,
            secondary_phone: row.secondary_phone,
            city: row.city,
            category,
            description: row.description,
            links: SocialLinks {
                linkedin: row.linkedin,
                website: row.website,
                facebook: row.facebook,
                instagram: row.instagram,
            },
            consent_at: parse_ts("consent_at", &row.consent_at)?,
            validation_token: row.validation_token.map(ValidationToken::new),
            token_expires_at,
            is_validated: row.is_validated,
            created_at: parse_ts("created_at", &row.created_at)?,
        })
    }
}

fn decode_row(row: &SqliteRow) -> Result<SupplierRecord, StoreError> {
    let row = SupplierRow::from_row(row)
        .map_err(|e| StoreError::Backend(format!("failed to deserialize supplier row: {e}")))?;
    row.try_into()
}
