//! Records returned by the client.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Default permit duration (ISO 8601).
pub const DEFAULT_PERMIT_DURATION: &str = "PT1H";

/// Tenant id and bearer token from one token exchange.
///
/// Valid for the single operation it was obtained for; never cached.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub tenant_id: String,
    pub bearer: String,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("tenant_id", &self.tenant_id)
            .field("bearer", &"<redacted>")
            .finish()
    }
}

impl AuthSession {
    /// Value of the `Authorization` query parameter.
    pub fn authorization(&self) -> String {
        format!("bearer {}", self.bearer)
    }
}

/// Current usage and the active issuance policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Used amount with the unit suffix stripped, e.g. `"79.92"`.
    pub usage: String,
    pub policy_id: String,
}

/// A currently valid permit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permit {
    pub id: String,
    pub license_plate: String,
    /// Upstream `lifecycle.invalid` timestamp, verbatim.
    pub expiration: String,
}

/// Parameters of a new temporary permit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPermit {
    pub license_plate: String,
    /// ISO 8601 duration; defaults to one hour.
    pub duration: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl NewPermit {
    pub fn new(license_plate: impl Into<String>) -> Self {
        Self {
            license_plate: license_plate.into(),
            duration: DEFAULT_PERMIT_DURATION.to_string(),
            email: None,
            phone: None,
        }
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// Result of expiring a permit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelConfirmation {
    pub success: bool,
    pub permit_id: String,
}

impl CancelConfirmation {
    pub(crate) fn confirmed(permit_id: impl Into<String>) -> Self {
        Self {
            success: true,
            permit_id: permit_id.into(),
        }
    }
}

/// Remaining monthly quota.
///
/// `Degraded` means usage could not be read and was taken as zero. Both
/// render as a two-decimal string.
#[derive(Debug, Clone, PartialEq)]
pub enum RemainingQuota {
    /// Computed from live usage.
    Live { remaining: Decimal },

    /// Usage defaulted to zero after `cause`.
    Degraded { remaining: Decimal, cause: ApiError },
}

impl RemainingQuota {
    pub fn remaining(&self) -> Decimal {
        match self {
            Self::Live { remaining } | Self::Degraded { remaining, .. } => *remaining,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

impl fmt::Display for RemainingQuota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.remaining())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_session_debug_redacts_bearer() {
        let session = AuthSession {
            tenant_id: "T1".into(),
            bearer: "secret-token".into(),
        };
        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("secret-token"));
        assert_eq!(session.authorization(), "bearer secret-token");
    }

    #[test]
    fn test_new_permit_defaults() {
        let permit = NewPermit::new("ABC1234");
        assert_eq!(permit.duration, "PT1H");
        assert!(permit.email.is_none());
        assert!(permit.phone.is_none());

        let permit = permit
            .with_duration("PT4H")
            .with_email("guest@example.com")
            .with_phone("5551234");
        assert_eq!(permit.duration, "PT4H");
        assert_eq!(permit.email.as_deref(), Some("guest@example.com"));
        assert_eq!(permit.phone.as_deref(), Some("5551234"));
    }

    #[test]
    fn test_remaining_quota_display_keeps_scale() {
        let live = RemainingQuota::Live {
            remaining: Decimal::new(2008, 2),
        };
        assert_eq!(live.to_string(), "20.08");
        assert!(!live.is_degraded());

        let degraded = RemainingQuota::Degraded {
            remaining: Decimal::new(10000, 2),
            cause: ApiError::transport("down"),
        };
        assert_eq!(degraded.to_string(), "100.00");
        assert!(degraded.is_degraded());
    }

    #[test]
    fn test_cancel_confirmation_serializes() {
        let confirmation = CancelConfirmation::confirmed("PID1");
        assert_eq!(
            serde_json::to_value(&confirmation).unwrap(),
            serde_json::json!({"success": true, "permit_id": "PID1"})
        );
    }
}
