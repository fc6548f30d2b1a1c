//! Outbound validation notices.
//!
//! A notice carries the raw token (for manual entry) and a clickable validation link.
//! Delivery is best-effort: a failure is reported to the caller but never undoes the
//! registration that triggered it.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use supplierbank_suppliers::ValidationToken;

pub mod in_memory;
pub mod log;
pub mod smtp;

pub use in_memory::InMemoryNotifier;
pub use log::LogNotifier;
pub use smtp::SmtpNotifier;

/// Subject line of the validation email.
pub const VALIDATION_SUBJECT: &str = "Validação do seu cadastro - Banco de Fornecedores";

/// Everything needed to tell a registrant how to validate their sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationNotice {
    pub contact_email: String,
    pub supplier_name: String,
    pub token: ValidationToken,
    pub validation_link: String,
}

impl ValidationNotice {
    /// Build a notice whose link points at `{app_base_url}/validate?token={token}`.
    pub fn new(
        contact_email: impl Into<String>,
        supplier_name: impl Into<String>,
        token: ValidationToken,
        app_base_url: &str,
    ) -> Self {
        let validation_link = validation_link(app_base_url, &token);
        Self {
            contact_email: contact_email.into(),
            supplier_name: supplier_name.into(),
            token,
            validation_link,
        }
    }

    /// Plain-text body: greeting, raw code, and link.
    pub fn body(&self) -> String {
        format!(
            "Olá, {name}!\n\
             \n\
             Obrigado por se cadastrar no Banco de Fornecedores.\n\
             \n\
             Para validar seu cadastro, acesse o link abaixo:\n\
             {link}\n\
             \n\
             Ou informe manualmente o código de validação:\n\
             {token}\n\
             \n\
             Atenciosamente,\n\
             Equipe Banco de Fornecedores\n",
            name = self.supplier_name,
            link = self.validation_link,
            token = self.token.as_str(),
        )
    }
}

/// `{app_base_url}/validate?token={token}`; a trailing slash on the base is ignored.
///
/// Tokens are URL-safe base64, so no query escaping is needed.
pub fn validation_link(app_base_url: &str, token: &ValidationToken) -> String {
    format!(
        "{}/validate?token={}",
        app_base_url.trim_end_matches('/'),
        token.as_str()
    )
}

/// Email delivery failure. Advisory only; the cause is meant for an operator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("invalid email address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Message(String),

    /// Connection refused, TLS failure, DNS, and similar.
    #[error("smtp transport failure: {0}")]
    Transport(String),

    /// Permanent negative reply, e.g. authentication failure.
    #[error("smtp server rejected the message: {0}")]
    Rejected(String),

    #[error("delivery timed out after {0:?}")]
    Timeout(Duration),
}

impl DeliveryError {
    /// Human-readable cause, suitable for logs and operator dashboards.
    pub fn cause(&self) -> String {
        self.to_string()
    }
}

/// Sends validation notices to registrants.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notice: &ValidationNotice) -> Result<(), DeliveryError>;
}

#[async_trait::async_trait]
impl<N> Notifier for Arc<N>
where
    N: Notifier + ?Sized,
{
    async fn notify(&self, notice: &ValidationNotice) -> Result<(), DeliveryError> {
        (**self).notify(notice).await
    }
}
