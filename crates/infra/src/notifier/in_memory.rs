use std::sync::Mutex;

use super::{DeliveryError, Notifier, ValidationNotice};

#[derive(Debug, Default)]
struct Outbox {
    sent: Vec<ValidationNotice>,
    fail_with: Option<DeliveryError>,
}

/// Records notices instead of sending them.
///
/// Intended for tests/dev. `fail_with` makes every later send fail with the given error.
#[derive(Debug, Default)]
pub struct InMemoryNotifier {
    outbox: Mutex<Outbox>,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every delivery fails with `error`.
    pub fn failing(error: DeliveryError) -> Self {
        let notifier = Self::new();
        notifier.fail_with(Some(error));
        notifier
    }

    pub fn fail_with(&self, error: Option<DeliveryError>) {
        if let Ok(mut outbox) = self.outbox.lock() {
            outbox.fail_with = error;
        }
    }

    /// Notices delivered so far, oldest first.
    pub fn sent(&self) -> Vec<ValidationNotice> {
        self.outbox
            .lock()
            .map(|outbox| outbox.sent.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<ValidationNotice> {
        self.outbox
            .lock()
            .ok()
            .and_then(|outbox| outbox.sent.last().cloned())
    }
}

#[async_trait::async_trait]
impl Notifier for InMemoryNotifier {
    async fn notify(&self, notice: &ValidationNotice) -> Result<(), DeliveryError> {
        let mut outbox = self
            .outbox
            .lock()
            .map_err(|_| DeliveryError::Transport("outbox lock poisoned".to_string()))?;

        if let Some(err) = &outbox.fail_with {
            return Err(err.clone());
        }
        outbox.sent.push(notice.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supplierbank_suppliers::ValidationToken;

    fn notice(n: u32) -> ValidationNotice {
        ValidationNotice::new(
            format!("contato{n}@example.com"),
            format!("Fornecedor {n}"),
            ValidationToken::new(format!("token-{n}")),
            "http://localhost:8080",
        )
    }

    #[tokio::test]
    async fn records_in_order() {
        let notifier = InMemoryNotifier::new();
        notifier.notify(&notice(1)).await.unwrap();
        notifier.notify(&notice(2)).await.unwrap();

        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].contact_email, "contato1@example.com");
        assert_eq!(notifier.last().unwrap().token.as_str(), "token-2");
    }

    #[tokio::test]
    async fn failing_notifier_records_nothing() {
        let notifier =
            InMemoryNotifier::failing(DeliveryError::Transport("connection refused".to_string()));

        let err = notifier.notify(&notice(1)).await.unwrap_err();
        assert_eq!(err, DeliveryError::Transport("connection refused".to_string()));
        assert!(notifier.sent().is_empty());

        notifier.fail_with(None);
        notifier.notify(&notice(2)).await.unwrap();
        assert_eq!(notifier.sent().len(), 1);
    }
}
