//! Supplier record store boundary.
//!
//! The store is the sole mutator of supplier records. Everything else reads or
//! requests mutations through [`SupplierStore`].

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

pub use in_memory::InMemorySupplierStore;
pub use sqlite::SqliteSupplierStore;
pub use r#trait::{StoreError, SupplierStore};

#[cfg(test)]
pub(crate) mod contract;
