//! Validation tokens: generation and expiry.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

/// Default lifetime of a validation token.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Number of random bytes behind each token (256 bits).
const TOKEN_BYTES: usize = 32;

/// Opaque, single-use credential proving ownership of a registered email address.
///
/// `Debug` never prints the secret so records can be logged safely.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationToken(String);

impl ValidationToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Debug for ValidationToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("ValidationToken(***)")
    }
}

impl core::fmt::Display for ValidationToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A freshly issued token and the instant after which it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: ValidationToken,
    pub expires_at: DateTime<Utc>,
}

/// Issues collision-resistant, time-bounded validation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenIssuer {
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a new token valid until `now + ttl`.
    pub fn issue(&self, now: DateTime<Utc>) -> IssuedToken {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);

        IssuedToken {
            token: ValidationToken(URL_SAFE_NO_PAD.encode(bytes)),
            expires_at: now + self.ttl,
        }
    }
}

impl Default for TokenIssuer {
    fn default() -> Self {
        Self::new(Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }
}
