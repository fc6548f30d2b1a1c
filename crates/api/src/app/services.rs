use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};

use supplierbank_infra::notifier::{LogNotifier, SmtpNotifier};
use supplierbank_infra::store::{InMemorySupplierStore, SqliteSupplierStore};
use supplierbank_infra::{
    AppConfig, Notifier, Registration, RegistrationService, SupplierStore, Validated, Validator,
    WorkflowError,
};
use supplierbank_suppliers::{SupplierForm, SupplierRecord, TokenIssuer};

type SharedStore = Arc<dyn SupplierStore>;
type SharedNotifier = Arc<dyn Notifier>;

/// Everything the handlers need, shared across requests.
pub struct AppServices {
    store: SharedStore,
    registrations: RegistrationService<SharedStore, SharedNotifier>,
    validator: Validator<SharedStore>,
}

impl AppServices {
    pub fn new(store: SharedStore, notifier: SharedNotifier, config: &AppConfig) -> Self {
        let registrations = RegistrationService::new(
            store.clone(),
            notifier,
            TokenIssuer::new(config.token_ttl),
            config.app_base_url.clone(),
        )
        .with_notify_timeout(config.notify_timeout);

        Self {
            validator: Validator::new(store.clone()),
            registrations,
            store,
        }
    }

    pub async fn register(
        &self,
        form: &SupplierForm,
        now: DateTime<Utc>,
    ) -> Result<Registration, WorkflowError> {
        self.registrations.register(form, now).await
    }

    pub async fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Validated, WorkflowError> {
        self.validator.validate(token, now).await
    }

    /// Validated suppliers, newest first.
    pub async fn directory(&self) -> Result<Vec<SupplierRecord>, WorkflowError> {
        Ok(self.store.find_validated().await?)
    }
}

impl core::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppServices").finish_non_exhaustive()
    }
}

/// Pick backends from configuration.
///
/// Without `DATABASE_URL` records live in memory and are lost on restart; without
/// `SMTP_SERVER` validation links only reach the log. Both are logged as warnings.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store: SharedStore = match &config.database_url {
        Some(url) => {
            let store = SqliteSupplierStore::connect(url)
                .await
                .with_context(|| format!("failed to open supplier database {url}"))?;
            tracing::info!("using sqlite supplier store");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory supplier store");
            Arc::new(InMemorySupplierStore::new())
        }
    };

    let notifier: SharedNotifier = match &config.smtp {
        Some(smtp) => {
            let notifier = SmtpNotifier::new(smtp, config.notify_timeout)
                .context("invalid SMTP configuration")?;
            tracing::info!(server = %smtp.server, port = smtp.port, "using smtp notifier");
            Arc::new(notifier)
        }
        None => {
            tracing::warn!("SMTP_SERVER not set; validation links will be logged, not emailed");
            Arc::new(LogNotifier::new())
        }
    };

    Ok(AppServices::new(store, notifier, config))
}
