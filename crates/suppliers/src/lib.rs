//! Suppliers domain module (registration records, sign-up form, validation tokens).
//!
//! This crate contains business rules for supplier registration, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage). The only impurity is
//! the randomness consumed by [`TokenIssuer`].

pub mod form;
pub mod supplier;
pub mod token;

pub use form::{SupplierForm, REQUIRED_FIELDS};
pub use supplier::{NewSupplier, ServiceCategory, SocialLinks, SupplierRecord, SupplierStatus};
pub use token::{IssuedToken, TokenIssuer, ValidationToken, DEFAULT_TOKEN_TTL_HOURS};
