//! SMTP delivery of validation notices.

use std::time::Duration;

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

use super::{DeliveryError, Notifier, VALIDATION_SUBJECT, ValidationNotice};

/// Sends notices through an SMTP relay.
///
/// Every send is bounded by `timeout`, both at the transport level and as an outer
/// deadline around the whole exchange.
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    timeout: Duration,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig, timeout: Duration) -> Result<Self, DeliveryError> {
        let from = parse_mailbox(&config.from)?;

        let mut builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
                .map_err(|e| DeliveryError::Transport(e.to_string()))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server)
        };
        builder = builder.port(config.port).timeout(Some(timeout));

        if let Some((username, password)) = &config.credentials {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            timeout,
        })
    }

    fn build_message(&self, notice: &ValidationNotice) -> Result<Message, DeliveryError> {
        Message::builder()
            .from(self.from.clone())
            .to(parse_mailbox(&notice.contact_email)?)
            .subject(VALIDATION_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(notice.body())
            .map_err(|e| DeliveryError::Message(e.to_string()))
    }

    fn map_smtp_error(&self, err: lettre::transport::smtp::Error) -> DeliveryError {
        if err.is_timeout() {
            DeliveryError::Timeout(self.timeout)
        } else if err.is_permanent() {
            DeliveryError::Rejected(err.to_string())
        } else {
            DeliveryError::Transport(err.to_string())
        }
    }
}

impl core::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("from", &self.from.to_string())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, notice: &ValidationNotice) -> Result<(), DeliveryError> {
        let message = self.build_message(notice)?;

        match tokio::time::timeout(self.timeout, self.transport.send(message)).await {
            Ok(Ok(_response)) => {
                tracing::info!(to = %notice.contact_email, "validation email sent");
                Ok(())
            }
            Ok(Err(e)) => Err(self.map_smtp_error(e)),
            Err(_elapsed) => Err(DeliveryError::Timeout(self.timeout)),
        }
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| DeliveryError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}
