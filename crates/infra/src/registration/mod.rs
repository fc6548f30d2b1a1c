//! Registration and validation workflows.
//!
//! Both services are request-scoped: they hold no mutable state of their own and
//! share the store (and notifier) they were built with.

mod error;
mod orchestrator;
mod validator;

pub use error::WorkflowError;
pub use orchestrator::{Registration, RegistrationService};
pub use validator::{Validated, Validator};
