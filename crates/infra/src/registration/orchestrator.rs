use std::time::Duration;

use chrono::{DateTime, Utc};

use supplierbank_core::SupplierId;
use supplierbank_suppliers::{SupplierForm, TokenIssuer};

use crate::config::DEFAULT_NOTIFY_TIMEOUT_SECS;
use crate::notifier::{DeliveryError, Notifier, ValidationNotice};
use crate::store::SupplierStore;

use super::WorkflowError;

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub id: SupplierId,
    /// Whether the validation email went out. `false` still means the record exists.
    pub email_sent: bool,
    pub token_expires_at: DateTime<Utc>,
}

/// Checks a submitted form, stores the pending record and sends the validation notice.
///
/// ```text
/// form -> check -> issue token -> insert -> notify (best effort)
/// ```
///
/// Nothing is written when the form is rejected. Once the insert succeeded the
/// record stays, whatever happens to the email.
#[derive(Debug, Clone)]
pub struct RegistrationService<S, N> {
    store: S,
    notifier: N,
    issuer: TokenIssuer,
    app_base_url: String,
    notify_timeout: Duration,
}

impl<S, N> RegistrationService<S, N>
where
    S: SupplierStore,
    N: Notifier,
{
    pub fn new(store: S, notifier: N, issuer: TokenIssuer, app_base_url: impl Into<String>) -> Self {
        Self {
            store,
            notifier,
            issuer,
            app_base_url: app_base_url.into(),
            notify_timeout: Duration::from_secs(DEFAULT_NOTIFY_TIMEOUT_SECS),
        }
    }

    pub fn with_notify_timeout(mut self, timeout: Duration) -> Self {
        self.notify_timeout = timeout;
        self
    }

    pub async fn register(
        &self,
        form: &SupplierForm,
        now: DateTime<Utc>,
    ) -> Result<Registration, WorkflowError> {
        let checked = form.check()?;
        let supplier_name = checked.name().to_string();
        let contact_email = checked.contact_email().to_string();

        let issued = self.issuer.issue(now);
        let token = issued.token.clone();
        let token_expires_at = issued.expires_at;

        let id = self
            .store
            .insert(checked.into_new_supplier(issued, now))
            .await?;
        tracing::info!(supplier_id = %id, "supplier registered, pending validation");

        let notice = ValidationNotice::new(contact_email, supplier_name, token, &self.app_base_url);
        let email_sent = match self.send(&notice).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(
                    supplier_id = %id,
                    cause = %err.cause(),
                    "failed to send validation email; record stays pending"
                );
                false
            }
        };

        Ok(Registration {
            id,
            email_sent,
            token_expires_at,
        })
    }

    async fn send(&self, notice: &ValidationNotice) -> Result<(), DeliveryError> {
        tokio::time::timeout(self.notify_timeout, self.notifier.notify(notice))
            .await
            .map_err(|_| DeliveryError::Timeout(self.notify_timeout))?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;

    use supplierbank_core::{DomainError, UniqueField};
    use supplierbank_suppliers::{SupplierStatus, ValidationToken};

    use super::*;
    use crate::notifier::InMemoryNotifier;
    use crate::store::InMemorySupplierStore;

    type Service = RegistrationService<Arc<InMemorySupplierStore>, Arc<InMemoryNotifier>>;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
    }

    fn service() -> (Service, Arc<InMemorySupplierStore>, Arc<InMemoryNotifier>) {
        let store = Arc::new(InMemorySupplierStore::new());
        let notifier = Arc::new(InMemoryNotifier::new());
        let service = RegistrationService::new(
            store.clone(),
            notifier.clone(),
            TokenIssuer::default(),
            "http://localhost:8080/",
        );
        (service, store, notifier)
    }

    fn buffet_form() -> SupplierForm {
        SupplierForm {
            name: Some("Buffet Estrela".to_string()),
            contact_email: Some("oi@buffet.com".to_string()),
            tax_id: Some("12.345.678/0001-90".to_string()),
            primary_phone: Some("+55 11 98888-7777".to_string()),
            city: Some("Campinas".to_string()),
            category: Some("catering".to_string()),
            description: Some("Buffet completo para casamentos".to_string()),
            lgpd_consent: true,
            ..SupplierForm::default()
        }
    }

    #[tokio::test]
    async fn registers_pending_record_and_emails_link() {
        let (service, store, notifier) = service();

        let registration = service.register(&buffet_form(), now()).await.unwrap();
        assert!(registration.email_sent);
        assert_eq!(registration.token_expires_at, now() + chrono::Duration::hours(24));

        let record = store.get(registration.id).await.unwrap().unwrap();
        assert!(!record.is_validated);
        assert_eq!(record.status_at(now()), SupplierStatus::Pending);
        assert_eq!(record.contact_email, "oi@buffet.com");

        let notice = notifier.last().unwrap();
        let token: &ValidationToken = record.validation_token.as_ref().unwrap();
        assert_eq!(&notice.token, token);
        assert_eq!(notice.contact_email, "oi@buffet.com");
        assert_eq!(notice.supplier_name, "Buffet Estrela");
        assert_eq!(
            notice.validation_link,
            format!("http://localhost:8080/validate?token={}", token.as_str())
        );
    }

    #[tokio::test]
    async fn rejected_form_writes_nothing_and_sends_nothing() {
        let (service, store, notifier) = service();
        let mut form = buffet_form();
        form.tax_id = Some("   ".to_string());

        let err = service.register(&form, now()).await.unwrap_err();
        assert_eq!(err, WorkflowError::Domain(DomainError::validation("taxId")));
        assert!(store.get(SupplierId::new(1)).await.unwrap().is_none());
        assert!(notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn unknown_category_is_a_validation_error() {
        let (service, _, _) = service();
        let mut form = buffet_form();
        form.category = Some("fireworks".to_string());

        let err = service.register(&form, now()).await.unwrap_err();
        assert_eq!(err, WorkflowError::Domain(DomainError::validation("category")));
    }

    #[tokio::test]
    async fn duplicate_email_is_reported_by_field() {
        let (service, _, notifier) = service();
        service.register(&buffet_form(), now()).await.unwrap();

        let mut again = buffet_form();
        again.tax_id = Some("98.765.432/0001-10".to_string());
        again.contact_email = Some("OI@Buffet.com".to_string());

        let err = service.register(&again, now()).await.unwrap_err();
        assert_eq!(
            err,
            WorkflowError::Domain(DomainError::duplicate(UniqueField::ContactEmail))
        );
        assert_eq!(notifier.sent().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_tax_id_is_reported_by_field() {
        let (service, _, _) = service();
        service.register(&buffet_form(), now()).await.unwrap();

        let mut again = buffet_form();
        again.contact_email = Some("outro@buffet.com".to_string());

        let err = service.register(&again, now()).await.unwrap_err();
        assert_eq!(
            err,
            WorkflowError::Domain(DomainError::duplicate(UniqueField::TaxId))
        );
    }

    #[tokio::test]
    async fn delivery_failure_keeps_record_pending() {
        let store = Arc::new(InMemorySupplierStore::new());
        let notifier = Arc::new(InMemoryNotifier::failing(DeliveryError::Rejected(
            "535 authentication failed".to_string(),
        )));
        let service = RegistrationService::new(
            store.clone(),
            notifier,
            TokenIssuer::default(),
            "http://localhost:8080",
        );

        let registration = service.register(&buffet_form(), now()).await.unwrap();
        assert!(!registration.email_sent);

        let record = store.get(registration.id).await.unwrap().unwrap();
        assert!(!record.is_validated);
        assert!(record.validation_token.is_some());
    }

    struct StalledNotifier;

    #[async_trait::async_trait]
    impl Notifier for StalledNotifier {
        async fn notify(&self, _notice: &ValidationNotice) -> Result<(), DeliveryError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn stalled_delivery_is_cut_off() {
        let store = Arc::new(InMemorySupplierStore::new());
        let service = RegistrationService::new(
            store.clone(),
            StalledNotifier,
            TokenIssuer::default(),
            "http://localhost:8080",
        )
        .with_notify_timeout(Duration::from_millis(50));

        let registration = service.register(&buffet_form(), now()).await.unwrap();
        assert!(!registration.email_sent);
        assert!(store.get(registration.id).await.unwrap().is_some());
    }
}
