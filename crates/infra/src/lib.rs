//! Infrastructure layer: supplier storage, email delivery, workflow services, config.

pub mod config;
pub mod notifier;
pub mod registration;
pub mod store;

pub use config::{AppConfig, ConfigError, SmtpConfig};
pub use notifier::{DeliveryError, Notifier, ValidationNotice};
pub use registration::{Registration, RegistrationService, Validated, Validator, WorkflowError};
pub use store::{StoreError, SupplierStore};
