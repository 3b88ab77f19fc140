//! Client configuration.

use std::fmt;
use std::str::FromStr;

use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration errors, raised while loading from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required variable is unset or empty.
    #[error("missing required environment variable: {name}")]
    Missing { name: &'static str },

    /// Variable is set but cannot be interpreted.
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Tenant credentials. Immutable after load, never persisted.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Upstream location id.
    pub location_id: String,

    /// Tenant name (unit number).
    pub tenant: String,

    /// Tenant password. Also sent as `token` when creating permits.
    pub tenant_password: String,

    /// Address that receives cancellation notices.
    pub cancel_email: String,

    /// Monthly quota, in the same unit as upstream usage.
    pub monthly_quota: Decimal,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("location_id", &self.location_id)
            .field("tenant", &self.tenant)
            .field("tenant_password", &"<redacted>")
            .field("cancel_email", &self.cancel_email)
            .field("monthly_quota", &self.monthly_quota)
            .finish()
    }
}

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the ParkingBoss API (without `/v1`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    pub credentials: Credentials,

    /// Timezone used for offset viewpoints and validity windows.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,

    /// Request timeout in seconds. Unset means the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// How long a fetched permit list may be served from cache.
    #[serde(default = "default_permit_cache_ttl")]
    pub permit_cache_ttl_secs: u64,
}

fn default_base_url() -> String {
    "https://api.parkingboss.com".to_string()
}

fn default_timezone() -> Tz {
    Tz::UTC
}

fn default_permit_cache_ttl() -> u64 {
    50
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            base_url: default_base_url(),
            credentials,
            timezone: default_timezone(),
            timeout_secs: None,
            permit_cache_ttl_secs: default_permit_cache_ttl(),
        }
    }

    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `PARKING_API_URL` | API base URL |
    /// | `LOCATION_ID` | Location id (required) |
    /// | `TENANT` | Tenant name (required) |
    /// | `TENANT_PW` | Tenant password (required) |
    /// | `CANCEL_EMAIL` | Cancellation notice address (required) |
    /// | `MONTHLY_USAGE_QUOTA` | Monthly quota (required, decimal) |
    /// | `TIMEZONE` | IANA timezone name (default `UTC`) |
    /// | `PARKING_API_TIMEOUT` | Request timeout in seconds |
    /// | `PARKING_PERMIT_CACHE_TTL` | Permit list cache TTL in seconds (default 50) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let quota_raw = required("MONTHLY_USAGE_QUOTA")?;
        let monthly_quota =
            Decimal::from_str(quota_raw.trim()).map_err(|e| ConfigError::Invalid {
                name: "MONTHLY_USAGE_QUOTA",
                reason: e.to_string(),
            })?;

        let credentials = Credentials {
            location_id: required("LOCATION_ID")?,
            tenant: required("TENANT")?,
            tenant_password: required("TENANT_PW")?,
            cancel_email: required("CANCEL_EMAIL")?,
            monthly_quota,
        };

        let timezone = match optional("TIMEZONE") {
            Some(name) => name.parse::<Tz>().map_err(|e| ConfigError::Invalid {
                name: "TIMEZONE",
                reason: e.to_string(),
            })?,
            None => default_timezone(),
        };

        let timeout_secs = optional("PARKING_API_TIMEOUT")
            .map(|v| parse_secs("PARKING_API_TIMEOUT", &v))
            .transpose()?;

        let permit_cache_ttl_secs = optional("PARKING_PERMIT_CACHE_TTL")
            .map(|v| parse_secs("PARKING_PERMIT_CACHE_TTL", &v))
            .transpose()?
            .unwrap_or_else(default_permit_cache_ttl);

        Ok(Self {
            base_url: optional("PARKING_API_URL").unwrap_or_else(default_base_url),
            credentials,
            timezone,
            timeout_secs,
            permit_cache_ttl_secs,
        })
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the timezone.
    pub fn with_timezone(mut self, tz: Tz) -> Self {
        self.timezone = tz;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set the permit list cache TTL.
    pub fn with_permit_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.permit_cache_ttl_secs = secs;
        self
    }
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing { name })
}

fn parse_secs(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        reason: format!("expected whole seconds, got {:?}", value),
    })
}
