use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use supplierbank_infra::{Registration, Validated};
use supplierbank_suppliers::{SupplierForm, SupplierRecord};

/// Flatten a JSON object of field → value into a [`SupplierForm`].
///
/// Strings pass through; booleans and numbers are stringified; `null`, arrays and
/// nested objects are treated as absent.
pub fn form_from_json(body: &Map<String, Value>) -> SupplierForm {
    let fields: HashMap<String, String> = body
        .iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => return None,
            };
            Some((key.clone(), value))
        })
        .collect();
    SupplierForm::from_fields(&fields)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSupplierResponse {
    pub id: i64,
    pub status: &'static str,
    pub email_sent: bool,
    pub token_expires_at: String,
}

impl From<Registration> for RegisterSupplierResponse {
    fn from(value: Registration) -> Self {
        Self {
            id: value.id.value(),
            status: "pending",
            email_sent: value.email_sent,
            token_expires_at: rfc3339(value.token_expires_at),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidateResponse {
    pub id: i64,
    pub status: &'static str,
}

impl From<Validated> for ValidateResponse {
    fn from(value: Validated) -> Self {
        Self {
            id: value.id.value(),
            status: "validated",
        }
    }
}

/// Directory entry. Tokens and expiry never leave the server.
pub fn supplier_to_json(record: SupplierRecord) -> Value {
    serde_json::json!({
        "id": record.id.value(),
        "name": record.name,
        "contactEmail": record.contact_email,
        "taxId": record.tax_id,
        "primaryPhone": record.primary_phone,
        "secondaryPhone": record.secondary_phone,
        "city": record.city,
        "category": record.category.as_str(),
        "description": record.description,
        "links": {
            "linkedin": record.links.linkedin,
            "website": record.links.website,
            "facebook": record.links.facebook,
            "instagram": record.links.instagram,
        },
        "status": "validated",
        "createdAt": rfc3339(record.created_at),
    })
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
