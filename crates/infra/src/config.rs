//! Start-up configuration read from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use supplierbank_suppliers::DEFAULT_TOKEN_TTL_HOURS;

pub const DEFAULT_APP_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} is required when {because} is set")]
    Missing { key: &'static str, because: &'static str },

    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Outbound SMTP relay settings. Present only when `SMTP_SERVER` is set.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub from: String,
    /// `(username, password)`.
    pub credentials: Option<(String, String)>,
    /// STARTTLS upgrade; turned off only for local relays.
    pub starttls: bool,
}

impl core::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("from", &self.from)
            .field(
                "username",
                &self.credentials.as_ref().map(|(user, _)| user.as_str()),
            )
            .field("starttls", &self.starttls)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// SQLite URL. `None` runs on the in-memory store.
    pub database_url: Option<String>,
    pub app_base_url: String,
    pub token_ttl: chrono::Duration,
    pub notify_timeout: Duration,
    /// `None` logs validation links instead of emailing them.
    pub smtp: Option<SmtpConfig>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = parse_or("BIND_ADDR", get("BIND_ADDR"), default_bind_addr())?;

        let token_ttl_hours: i64 = parse_or(
            "TOKEN_TTL_HOURS",
            get("TOKEN_TTL_HOURS"),
            DEFAULT_TOKEN_TTL_HOURS,
        )?;
        if token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL_HOURS",
                value: token_ttl_hours.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let notify_timeout_secs: u64 = parse_or(
            "NOTIFY_TIMEOUT_SECS",
            get("NOTIFY_TIMEOUT_SECS"),
            DEFAULT_NOTIFY_TIMEOUT_SECS,
        )?;
        if notify_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "NOTIFY_TIMEOUT_SECS",
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let app_base_url = get("APP_BASE_URL").unwrap_or_else(|| DEFAULT_APP_BASE_URL.to_string());
        if !(app_base_url.starts_with("http://") || app_base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "APP_BASE_URL",
                value: app_base_url,
                reason: "must start with http:// or https://".to_string(),
            });
        }

        let smtp = match get("SMTP_SERVER") {
            None => None,
            Some(server) => {
                let port = parse_or("SMTP_PORT", get("SMTP_PORT"), DEFAULT_SMTP_PORT)?;
                let from = get("SMTP_FROM").ok_or(ConfigError::Missing {
                    key: "SMTP_FROM",
                    because: "SMTP_SERVER",
                })?;
                let credentials = match (get("SMTP_USERNAME"), get("SMTP_PASSWORD")) {
                    (Some(user), Some(pass)) => Some((user, pass)),
                    (None, None) => None,
                    (Some(_), None) => {
                        return Err(ConfigError::Missing {
                            key: "SMTP_PASSWORD",
                            because: "SMTP_USERNAME",
                        });
                    }
                    (None, Some(_)) => {
                        return Err(ConfigError::Missing {
                            key: "SMTP_USERNAME",
                            because: "SMTP_PASSWORD",
                        });
                    }
                };
                let starttls = parse_bool("SMTP_STARTTLS", get("SMTP_STARTTLS"), true)?;

                Some(SmtpConfig {
                    server,
                    port,
                    from,
                    credentials,
                    starttls,
                })
            }
        };

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL"),
            app_base_url,
            token_ttl: chrono::Duration::hours(token_ttl_hours),
            notify_timeout: Duration::from_secs(notify_timeout_secs),
            smtp,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database_url: None,
            app_base_url: DEFAULT_APP_BASE_URL.to_string(),
            token_ttl: chrono::Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            notify_timeout: Duration::from_secs(DEFAULT_NOTIFY_TIMEOUT_SECS),
            smtp: None,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    let Some(value) = raw else {
        return Ok(default);
    };
    value.parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

fn parse_bool(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value,
            reason: "expected true or false".to_string(),
        }),
    }
}
