use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use supplierbank_core::{DomainError, SupplierId};

use crate::token::ValidationToken;

/// Fixed set of service categories a supplier can register under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    Catering,
    Decoration,
    AudioVisual,
    Photography,
    Venue,
    Entertainment,
    Logistics,
    Other,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 8] = [
        ServiceCategory::Catering,
        ServiceCategory::Decoration,
        ServiceCategory::AudioVisual,
        ServiceCategory::Photography,
        ServiceCategory::Venue,
        ServiceCategory::Entertainment,
        ServiceCategory::Logistics,
        ServiceCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Catering => "catering",
            ServiceCategory::Decoration => "decoration",
            ServiceCategory::AudioVisual => "audio_visual",
            ServiceCategory::Photography => "photography",
            ServiceCategory::Venue => "venue",
            ServiceCategory::Entertainment => "entertainment",
            ServiceCategory::Logistics => "logistics",
            ServiceCategory::Other => "other",
        }
    }
}

impl core::fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceCategory {
    type Err = DomainError;

    /// Case-insensitive; `-` and spaces are accepted in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        ServiceCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or(DomainError::validation("category"))
    }
}

/// Optional web presence collected on the sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub linkedin: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
}

/// Derived lifecycle state of a supplier record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierStatus {
    /// Registered, token still usable.
    Pending,
    /// Registered, token past its expiry. Never purged automatically.
    ExpiredPending,
    /// Terminal state; token retired.
    Validated,
}

/// A validated sign-up, ready to be inserted by a record store.
///
/// The store assigns the `SupplierId`; everything else is decided before insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupplier {
    pub name: String,
    pub contact_email: String,
    pub tax_id: String,
    pub primary_phone: String,
    pub secondary_phone: Option<String>,
    pub city: String,
    pub category: ServiceCategory,
    pub description: String,
    pub links: SocialLinks,
    pub consent_at: DateTime<Utc>,
    pub validation_token: ValidationToken,
    pub token_expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Persisted supplier record.
///
/// Invariant: `is_validated` implies `validation_token` and `token_expires_at` are
/// both `None`. Use [`SupplierRecord::mark_validated`] to transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplierRecord {
    pub id: SupplierId,
    pub name: String,
    pub contact_email: String,
    pub tax_id: String,
    pub primary_phone: String,
    pub secondary_phone: Option<String>,
    pub city: String,
    pub category: ServiceCategory,
    pub description: String,
    pub links: SocialLinks,
    pub consent_at: DateTime<Utc>,
    pub validation_token: Option<ValidationToken>,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub is_validated: bool,
    pub created_at: DateTime<Utc>,
}

impl SupplierRecord {
    /// Materialize a freshly inserted record (pending state).
    pub fn from_new(id: SupplierId, new: NewSupplier) -> Self {
        Self {
            id,
            name: new.name,
            contact_email: new.contact_email,
            tax_id: new.tax_id,
            primary_phone: new.primary_phone,
            secondary_phone: new.secondary_phone,
            city: new.city,
            category: new.category,
            description: new.description,
            links: new.links,
            consent_at: new.consent_at,
            validation_token: Some(new.validation_token),
            token_expires_at: Some(new.token_expires_at),
            is_validated: false,
            created_at: new.created_at,
        }
    }

    /// Whether the token has passed its expiry at `now`.
    ///
    /// A record without an expiry (validated) is never considered expired.
    pub fn token_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.token_expires_at, Some(expires_at) if now > expires_at)
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> SupplierStatus {
        if self.is_validated {
            SupplierStatus::Validated
        } else if self.token_expired_at(now) {
            SupplierStatus::ExpiredPending
        } else {
            SupplierStatus::Pending
        }
    }

    /// Transition pending → validated, retiring the token.
    ///
    /// Returns `false` (and changes nothing) if the record was already validated.
    pub fn mark_validated(&mut self) -> bool {
        if self.is_validated {
            return false;
        }
        self.is_validated = true;
        self.validation_token = None;
        self.token_expires_at = None;
        true
    }
}
