//! Permit listing, creation and expiry.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use super::ParkingClient;
use crate::error::{ApiError, ApiResult};
use crate::json::{object, path, string, string_at};
use crate::types::{CancelConfirmation, NewPermit, Permit, DEFAULT_PERMIT_DURATION};

/// Fields of a temporary-permit request.
///
/// Sent twice: as the query string (with `viewpoint`, and `duration` pinned
/// to one hour) and as the form body (with the requested `duration`).
/// Upstream has not told us which copy wins, so both are sent as-is.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct PermitFields<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    viewpoint: Option<&'a str>,
    location: &'a str,
    policy: &'a str,
    vehicle: &'a str,
    tenant: &'a str,
    token: &'a str,
    start_date: &'a str,
    duration: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tel: Option<&'a str>,
}

impl ParkingClient {
    /// List permits valid from now through the next thirty days.
    ///
    /// Order is whatever order upstream sent `permits.items` in.
    pub async fn list_permits(&self) -> ApiResult<Vec<Permit>> {
        let session = self.authenticate().await?;
        let url = self.permits_url(&session.tenant_id);
        let valid = self.timestamps.validity_window();
        let viewpoint = self.timestamps.now_with_offset();
        debug!(url = %url, valid = %valid, viewpoint = %viewpoint, "listing permits");

        let request = self.http.client.get(&url).query(&[
            ("valid", valid.as_str()),
            ("viewpoint", viewpoint.as_str()),
            ("Authorization", session.authorization().as_str()),
        ]);

        let body = self.http.send_json(request, "permit listing").await?;
        let permits = parse_permit_list(&body).inspect_err(|e| {
            error!(detail = e.detail(), "malformed permit listing");
        })?;

        info!(count = permits.len(), "listed permits");
        Ok(permits)
    }

    /// Create a temporary permit and return its id.
    ///
    /// Looks up the active policy first, which costs its own token exchange.
    pub async fn create_permit(&self, permit: &NewPermit) -> ApiResult<String> {
        let policy_id = self.usage_and_policy().await?.policy_id;
        let credentials = &self.config.credentials;
        let url = self.create_url();
        let viewpoint = self.timestamps.now_utc_zulu();

        let form = PermitFields {
            viewpoint: None,
            location: &credentials.location_id,
            policy: &policy_id,
            vehicle: &permit.license_plate,
            tenant: &credentials.tenant,
            token: &credentials.tenant_password,
            start_date: "",
            duration: &permit.duration,
            email: permit.email.as_deref(),
            tel: permit.phone.as_deref(),
        };
        let query = PermitFields {
            viewpoint: Some(&viewpoint),
            duration: DEFAULT_PERMIT_DURATION,
            ..form
        };

        debug!(
            url = %url,
            vehicle = %permit.license_plate,
            policy_id = %policy_id,
            duration = %permit.duration,
            "creating permit"
        );

        let request = self.http.client.post(&url).query(&query).form(&form);
        let body = self.http.send_json(request, "permit creation").await?;
        let permit_id = parse_created_permit(&body).inspect_err(|e| {
            error!(detail = e.detail(), "malformed permit creation response");
        })?;

        info!(permit_id = %permit_id, vehicle = %permit.license_plate, "created permit");
        Ok(permit_id)
    }

    /// Expire a permit now, notifying the cancellation address.
    pub async fn delete_permit(&self, permit_id: &str) -> ApiResult<CancelConfirmation> {
        let url = self.expire_url(permit_id)?;
        let viewpoint = self.timestamps.now_utc_zulu();
        debug!(url = %url, permit_id, "expiring permit");

        let request = self.http.client.put(&url).query(&[
            ("viewpoint", viewpoint.as_str()),
            ("permit", permit_id),
            ("to", self.config.credentials.cancel_email.as_str()),
            ("_method", "PUT"),
        ]);

        self.http.send(request, "permit expiry").await?;

        info!(permit_id, "expired permit");
        Ok(CancelConfirmation::confirmed(permit_id))
    }
}

/// Join `permits.items` against `vehicles.items`.
///
/// A permit whose vehicle is not in the same response fails the whole list.
pub fn parse_permit_list(body: &Value) -> ApiResult<Vec<Permit>> {
    let items = object(path(body, &["permits", "items"])?, "permits.items")?;

    items
        .iter()
        .map(|(permit_id, record)| -> ApiResult<Permit> {
            let vehicle_id = string(path(record, &["vehicle"])?, "permit.vehicle")?;
            let vehicles = object(path(body, &["vehicles", "items"])?, "vehicles.items")?;
            let vehicle = vehicles.get(&vehicle_id).ok_or_else(|| {
                ApiError::parse(format!(
                    "permit {} references unknown vehicle {}",
                    permit_id, vehicle_id
                ))
            })?;

            Ok(Permit {
                id: permit_id.clone(),
                license_plate: string(path(vehicle, &["display"])?, "vehicle.display")?,
                expiration: string_at(record, &["lifecycle", "invalid"])?,
            })
        })
        .collect()
}

/// Read the new permit id (`permits.item`).
pub fn parse_created_permit(body: &Value) -> ApiResult<String> {
    string_at(body, &["permits", "item"])
}
