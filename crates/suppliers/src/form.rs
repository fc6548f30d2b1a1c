//! Sign-up form input and field-presence validation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use supplierbank_core::{DomainError, DomainResult};

use crate::supplier::{NewSupplier, ServiceCategory, SocialLinks};
use crate::token::IssuedToken;

/// Required fields, in the order they are checked. The first missing one is reported.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "name",
    "contactEmail",
    "taxId",
    "primaryPhone",
    "city",
    "category",
    "description",
];

/// Raw sign-up form as handed over by the UI shell.
///
/// Every text field is optional here; presence is decided by [`SupplierForm::check`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplierForm {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub tax_id: Option<String>,
    pub primary_phone: Option<String>,
    pub secondary_phone: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    /// Acceptance of the personal-data processing terms (LGPD).
    pub lgpd_consent: bool,
}

/// A form whose required fields are all present, with values normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedForm {
    name: String,
    contact_email: String,
    tax_id: String,
    primary_phone: String,
    secondary_phone: Option<String>,
    city: String,
    category: ServiceCategory,
    description: String,
    links: SocialLinks,
}

impl SupplierForm {
    /// Build a form from a field-name → value mapping (camelCase wire names).
    ///
    /// Unknown keys are ignored. `lgpdConsent` accepts `true`, `on`, `yes` or `1`.
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let get = |key: &str| fields.get(key).cloned();
        let consent = fields
            .get("lgpdConsent")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "on" | "yes" | "1"))
            .unwrap_or(false);

        Self {
            name: get("name"),
            contact_email: get("contactEmail"),
            tax_id: get("taxId"),
            primary_phone: get("primaryPhone"),
            secondary_phone: get("secondaryPhone"),
            city: get("city"),
            category: get("category"),
            description: get("description"),
            linkedin: get("linkedin"),
            website: get("website"),
            facebook: get("facebook"),
            instagram: get("instagram"),
            lgpd_consent: consent,
        }
    }

    /// Check presence of every required field, then consent.
    pub fn check(&self) -> DomainResult<CheckedForm> {
        let name = required(&self.name, "name")?;
        let contact_email = required(&self.contact_email, "contactEmail")?.to_lowercase();
        let tax_id = required(&self.tax_id, "taxId")?;
        let primary_phone = required(&self.primary_phone, "primaryPhone")?;
        let city = required(&self.city, "city")?;
        let category: ServiceCategory = required(&self.category, "category")?.parse()?;
        let description = required(&self.description, "description")?;

        if !self.lgpd_consent {
            return Err(DomainError::validation("lgpdConsent"));
        }

        Ok(CheckedForm {
            name,
            contact_email,
            tax_id,
            primary_phone,
            secondary_phone: optional(&self.secondary_phone),
            city,
            category,
            description,
            links: SocialLinks {
                linkedin: optional(&self.linkedin),
                website: optional(&self.website),
                facebook: optional(&self.facebook),
                instagram: optional(&self.instagram),
            },
        })
    }
}

impl CheckedForm {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact_email(&self) -> &str {
        &self.contact_email
    }

    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }

    pub fn category(&self) -> ServiceCategory {
        self.category
    }

    /// Attach the issued token; `now` becomes both the creation and consent time.
    pub fn into_new_supplier(self, issued: IssuedToken, now: DateTime<Utc>) -> NewSupplier {
        NewSupplier {
            name: self.name,
            contact_email: self.contact_email,
            tax_id: self.tax_id,
            primary_phone: self.primary_phone,
            secondary_phone: self.secondary_phone,
            city: self.city,
            category: self.category,
            description: self.description,
            links: self.links,
            consent_at: now,
            validation_token: issued.token,
            token_expires_at: issued.expires_at,
            created_at: now,
        }
    }
}

fn required(value: &Option<String>, field: &'static str) -> DomainResult<String> {
    optional(value).ok_or(DomainError::validation(field))
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenIssuer;

    fn valid_form() -> SupplierForm {
        SupplierForm {
            name: Some("Foto & Cia".to_string()),
            contact_email: Some("  Contato@FotoCia.com ".to_string()),
            tax_id: Some("11.222.333/0001-44".to_string()),
            primary_phone: Some("+55 21 98888-7777".to_string()),
            secondary_phone: Some("   ".to_string()),
            city: Some("Rio de Janeiro".to_string()),
            category: Some("photography".to_string()),
            description: Some("Cobertura fotográfica de eventos".to_string()),
            linkedin: None,
            website: Some("https://fotocia.example".to_string()),
            facebook: None,
            instagram: Some("".to_string()),
            lgpd_consent: true,
        }
    }

    fn set_field(form: &mut SupplierForm, field: &str, value: Option<String>) {
        match field {
            "name" => form.name = value,
            "contactEmail" => form.contact_email = value,
            "taxId" => form.tax_id = value,
            "primaryPhone" => form.primary_phone = value,
            "city" => form.city = value,
            "category" => form.category = value,
            "description" => form.description = value,
            other => panic!("unknown field {other}"),
        }
    }

    #[test]
    fn check_normalizes_values() {
        let checked = valid_form().check().unwrap();

        assert_eq!(checked.contact_email(), "contato@fotocia.com");
        assert_eq!(checked.category(), ServiceCategory::Photography);
        assert_eq!(checked.secondary_phone, None);
        assert_eq!(checked.links.website.as_deref(), Some("https://fotocia.example"));
        assert_eq!(checked.links.instagram, None);
    }

    #[test]
    fn secondary_phone_is_optional() {
        let mut form = valid_form();
        form.secondary_phone = None;
        assert!(form.check().is_ok());
    }

    #[test]
    fn first_missing_field_is_reported() {
        let mut form = valid_form();
        form.city = None;
        form.description = None;

        assert_eq!(form.check().unwrap_err(), DomainError::validation("city"));
    }

    #[test]
    fn missing_consent_is_rejected_after_fields() {
        let mut form = valid_form();
        form.lgpd_consent = false;
        assert_eq!(form.check().unwrap_err(), DomainError::validation("lgpdConsent"));

        form.name = None;
        assert_eq!(form.check().unwrap_err(), DomainError::validation("name"));
    }

    #[test]
    fn unknown_category_is_a_validation_error() {
        let mut form = valid_form();
        form.category = Some("plumbing".to_string());
        assert_eq!(form.check().unwrap_err(), DomainError::validation("category"));
    }

    #[test]
    fn from_fields_reads_wire_names() {
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), "Som Total".to_string());
        fields.insert("contactEmail".to_string(), "som@total.com".to_string());
        fields.insert("taxId".to_string(), "123.456.789-00".to_string());
        fields.insert("primaryPhone".to_string(), "11 3333-4444".to_string());
        fields.insert("city".to_string(), "Campinas".to_string());
        fields.insert("category".to_string(), "audio_visual".to_string());
        fields.insert("description".to_string(), "Som e luz".to_string());
        fields.insert("lgpdConsent".to_string(), "on".to_string());
        fields.insert("unexpected".to_string(), "ignored".to_string());

        let form = SupplierForm::from_fields(&fields);
        assert!(form.lgpd_consent);
        assert_eq!(form.tax_id.as_deref(), Some("123.456.789-00"));
        assert_eq!(form.check().unwrap().category(), ServiceCategory::AudioVisual);
    }

    #[test]
    fn from_fields_defaults_consent_to_false() {
        let form = SupplierForm::from_fields(&HashMap::new());
        assert!(!form.lgpd_consent);
        assert_eq!(form.check().unwrap_err(), DomainError::validation("name"));
    }

    #[test]
    fn json_uses_camel_case() {
        let form: SupplierForm = serde_json::from_value(serde_json::json!({
            "name": "Decora Mais",
            "contactEmail": "oi@decora.com",
            "lgpdConsent": true
        }))
        .unwrap();
        assert_eq!(form.contact_email.as_deref(), Some("oi@decora.com"));
        assert!(form.lgpd_consent);
        assert_eq!(form.check().unwrap_err(), DomainError::validation("taxId"));
    }

    #[test]
    fn into_new_supplier_carries_token_and_timestamps() {
        let now = Utc::now();
        let issued = TokenIssuer::default().issue(now);
        let expected_token = issued.token.clone();

        let new = valid_form().check().unwrap().into_new_supplier(issued, now);
        assert_eq!(new.validation_token, expected_token);
        assert_eq!(new.created_at, now);
        assert_eq!(new.consent_at, now);
        assert!(new.token_expires_at > now);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 128,
                ..ProptestConfig::default()
            })]

            /// Property: blanking any required field makes the check fail on exactly that field.
            #[test]
            fn blank_required_field_is_always_reported(
                idx in 0usize..REQUIRED_FIELDS.len(),
                blank in prop_oneof![Just(None), Just(Some(String::new())), "[ \t]{1,4}".prop_map(Some)],
            ) {
                let field = REQUIRED_FIELDS[idx];
                let mut form = valid_form();
                set_field(&mut form, field, blank);

                prop_assert_eq!(form.check().unwrap_err(), DomainError::validation(field));
            }

            /// Property: any non-blank values for text fields pass the presence check.
            #[test]
            fn non_blank_values_pass(
                name in "[A-Za-z][A-Za-z ]{0,20}",
                tax_id in "[0-9./-]{1,18}",
                phone in "[0-9 +-]{0,14}[0-9]",
            ) {
                let mut form = valid_form();
                form.name = Some(name.clone());
                form.tax_id = Some(tax_id.clone());
                form.primary_phone = Some(phone);

                let checked = form.check().unwrap();
                prop_assert_eq!(checked.name(), name.trim());
                prop_assert_eq!(checked.tax_id(), tax_id.trim());
            }
        }
    }
}
