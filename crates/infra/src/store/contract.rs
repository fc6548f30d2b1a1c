//! Behaviour every `SupplierStore` backend must share, run against each of them.

use chrono::{DateTime, Duration, TimeZone, Utc};

use supplierbank_core::{SupplierId, UniqueField};
use supplierbank_suppliers::{NewSupplier, ServiceCategory, SocialLinks, ValidationToken};

use super::{StoreError, SupplierStore};

pub(crate) fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
}

pub(crate) fn new_supplier(n: u32, created_at: DateTime<Utc>) -> NewSupplier {
    NewSupplier {
        name: format!("Fornecedor {n}"),
        contact_email: format!("contato{n}@example.com"),
        tax_id: format!("11.222.333/0001-{n:02}"),
        primary_phone: "+55 11 90000-0000".to_string(),
        secondary_phone: None,
        city: "São Paulo".to_string(),
        category: ServiceCategory::Venue,
        description: "Espaço para eventos".to_string(),
        links: SocialLinks {
            website: Some(format!("https://fornecedor{n}.example")),
            ..SocialLinks::default()
        },
        consent_at: created_at,
        validation_token: ValidationToken::new(format!("token-{n}")),
        token_expires_at: created_at + Duration::hours(24),
        created_at,
    }
}

pub(crate) async fn insert_assigns_sequential_ids(store: &dyn SupplierStore) {
    let now = base_time();
    let first = store.insert(new_supplier(1, now)).await.unwrap();
    let second = store.insert(new_supplier(2, now)).await.unwrap();

    assert_eq!(first, SupplierId::new(1));
    assert_eq!(second, SupplierId::new(2));

    let record = store.get(first).await.unwrap().unwrap();
    assert_eq!(record.name, "Fornecedor 1");
    assert!(!record.is_validated);
    assert_eq!(record.validation_token, Some(ValidationToken::new("token-1")));
    assert_eq!(record.token_expires_at, Some(now + Duration::hours(24)));
    assert_eq!(record.created_at, now);
    assert_eq!(record.links.website.as_deref(), Some("https://fornecedor1.example"));

    assert!(store.get(SupplierId::new(99)).await.unwrap().is_none());
}

pub(crate) async fn duplicate_keys_are_rejected_without_writing(store: &dyn SupplierStore) {
    let now = base_time();
    store.insert(new_supplier(1, now)).await.unwrap();

    let mut same_tax_id = new_supplier(2, now);
    same_tax_id.tax_id = new_supplier(1, now).tax_id;
    assert_eq!(
        store.insert(same_tax_id).await.unwrap_err(),
        StoreError::DuplicateKey(UniqueField::TaxId)
    );

    let mut same_email = new_supplier(3, now);
    same_email.contact_email = new_supplier(1, now).contact_email;
    assert_eq!(
        store.insert(same_email).await.unwrap_err(),
        StoreError::DuplicateKey(UniqueField::ContactEmail)
    );

    let mut shouting = new_supplier(5, now);
    shouting.contact_email = "CONTATO1@Example.com".to_string();
    assert_eq!(
        store.insert(shouting).await.unwrap_err(),
        StoreError::DuplicateKey(UniqueField::ContactEmail)
    );

    // Neither rejected insert left a row or consumed its token.
    assert!(
        store
            .find_by_token(&ValidationToken::new("token-2"))
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        store
            .find_by_token(&ValidationToken::new("token-3"))
            .await
            .unwrap()
            .is_none()
    );
    let next = store.insert(new_supplier(4, now)).await.unwrap();
    assert!(next.value() >= 2);
}

pub(crate) async fn token_lookup_is_exact(store: &dyn SupplierStore) {
    let now = base_time();
    let id = store.insert(new_supplier(1, now)).await.unwrap();

    let found = store
        .find_by_token(&ValidationToken::new("token-1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, id);

    for miss in ["token-", "TOKEN-1", "token-1 ", ""] {
        assert!(
            store
                .find_by_token(&ValidationToken::new(miss))
                .await
                .unwrap()
                .is_none(),
            "{miss:?} should not match"
        );
    }
}

pub(crate) async fn mark_validated_transitions_once(store: &dyn SupplierStore) {
    let now = base_time();
    let id = store.insert(new_supplier(1, now)).await.unwrap();

    store.mark_validated(id).await.unwrap();

    let record = store.get(id).await.unwrap().unwrap();
    assert!(record.is_validated);
    assert!(record.validation_token.is_none());
    assert!(record.token_expires_at.is_none());
    assert!(
        store
            .find_by_token(&ValidationToken::new("token-1"))
            .await
            .unwrap()
            .is_none()
    );

    assert_eq!(
        store.mark_validated(id).await.unwrap_err(),
        StoreError::AlreadyValidated(id)
    );
    let missing = SupplierId::new(42);
    assert_eq!(
        store.mark_validated(missing).await.unwrap_err(),
        StoreError::NotFound(missing)
    );
}

pub(crate) async fn find_validated_is_newest_first(store: &dyn SupplierStore) {
    let t0 = base_time();
    let older = store.insert(new_supplier(1, t0)).await.unwrap();
    let pending = store
        .insert(new_supplier(2, t0 + Duration::minutes(1)))
        .await
        .unwrap();
    let newer = store
        .insert(new_supplier(3, t0 + Duration::minutes(2)))
        .await
        .unwrap();
    let same_instant = store
        .insert(new_supplier(4, t0 + Duration::minutes(2)))
        .await
        .unwrap();

    assert!(store.find_validated().await.unwrap().is_empty());

    store.mark_validated(older).await.unwrap();
    store.mark_validated(newer).await.unwrap();
    store.mark_validated(same_instant).await.unwrap();

    let ids: Vec<SupplierId> = store
        .find_validated()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![same_instant, newer, older]);
    assert!(!ids.contains(&pending));
}
