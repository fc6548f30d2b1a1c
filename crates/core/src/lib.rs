//! `supplierbank-core`: shared building blocks for the supplier registration workflow.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult, UniqueField};
pub use id::SupplierId;
