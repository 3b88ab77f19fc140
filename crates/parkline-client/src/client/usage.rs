//! Usage, issuance policy and remaining quota.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use super::ParkingClient;
use crate::error::{ApiError, ApiResult};
use crate::json::{first_value, path, string};
use crate::types::{RemainingQuota, UsageSnapshot};

/// Usage is sampled over the last day.
const USAGE_SAMPLE: &str = "PT24H";

impl ParkingClient {
    /// Fetch current usage and the active issuance policy id.
    pub async fn usage_and_policy(&self) -> ApiResult<UsageSnapshot> {
        let session = self.authenticate().await?;
        let url = self.usage_url(&session.tenant_id);
        let viewpoint = self.timestamps.now_with_offset();
        debug!(url = %url, viewpoint = %viewpoint, "fetching usage and policy");

        let request = self.http.client.get(&url).query(&[
            ("viewpoint", viewpoint.as_str()),
            ("Authorization", session.authorization().as_str()),
            ("sample", USAGE_SAMPLE),
        ]);

        let body = self.http.send_json(request, "usage lookup").await?;
        let snapshot = parse_usage_snapshot(&body).inspect_err(|e| {
            error!(detail = e.detail(), "malformed usage response");
        })?;

        info!(usage = %snapshot.usage, policy_id = %snapshot.policy_id, "read usage and policy");
        Ok(snapshot)
    }

    /// Monthly quota minus current usage.
    ///
    /// Never fails: if usage cannot be read, it counts as zero and the
    /// result is tagged `Degraded`.
    pub async fn remaining_quota(&self) -> RemainingQuota {
        let quota = self.config.credentials.monthly_quota;
        let usage = self
            .usage_and_policy()
            .await
            .and_then(|snapshot| parse_usage_amount(&snapshot.usage));

        match usage {
            Ok(usage) => RemainingQuota::Live {
                remaining: quota_remaining(quota, usage),
            },
            Err(cause) => {
                warn!(
                    error = %cause,
                    detail = cause.detail(),
                    "usage unavailable, computing remaining quota with zero usage"
                );
                RemainingQuota::Degraded {
                    remaining: quota_remaining(quota, Decimal::ZERO),
                    cause,
                }
            }
        }
    }
}

/// Extract usage and policy id from a usage response.
///
/// Usage is `display` of the first `used` entry of the first usage item, cut
/// at the first space to drop the unit. Policy is `policy` of the first
/// issuer.
pub fn parse_usage_snapshot(body: &Value) -> ApiResult<UsageSnapshot> {
    let usage_item = first_value(path(body, &["usage", "items"])?, "usage.items")?;
    let used = first_value(path(usage_item, &["used"])?, "usage.items[0].used")?;
    let display = string(path(used, &["display"])?, "used.display")?;
    let usage = display.split(' ').next().unwrap_or_default().to_string();

    let issuer = first_value(path(body, &["issuers", "items"])?, "issuers.items")?;
    let policy_id = string(path(issuer, &["policy"])?, "issuers.items[0].policy")?;

    Ok(UsageSnapshot { usage, policy_id })
}

fn parse_usage_amount(usage: &str) -> ApiResult<Decimal> {
    Decimal::from_str(usage.trim())
        .map_err(|e| ApiError::parse(format!("usage {:?} is not a decimal: {}", usage, e)))
}

/// `quota - usage`, each rounded half-even to two places first.
///
/// Not clamped: overuse yields a negative remainder.
pub fn quota_remaining(quota: Decimal, usage: Decimal) -> Decimal {
    to_hundredths(quota) - to_hundredths(usage)
}

fn to_hundredths(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(2);
    rounded
}
