use super::{DeliveryError, Notifier, ValidationNotice};

/// Writes the validation link to the log instead of sending email.
///
/// Used when no SMTP relay is configured, so a developer can still complete a
/// registration by copying the link from the logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notice: &ValidationNotice) -> Result<(), DeliveryError> {
        tracing::info!(
            to = %notice.contact_email,
            supplier = %notice.supplier_name,
            link = %notice.validation_link,
            "smtp not configured; validation link logged instead of emailed"
        );
        Ok(())
    }
}
