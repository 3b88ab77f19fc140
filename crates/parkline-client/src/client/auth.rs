//! Token exchange.

use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, error};

use super::ParkingClient;
use crate::error::ApiResult;
use crate::json::string_at;
use crate::types::AuthSession;

impl ParkingClient {
    /// Exchange the tenant credentials for a bearer token.
    ///
    /// One attempt, no caching: every caller gets a brand new session.
    pub async fn authenticate(&self) -> ApiResult<AuthSession> {
        let url = self.token_url();
        let credentials = &self.config.credentials;
        let viewpoint = self.timestamps.now_utc_zulu();
        debug!(
            url = %url,
            viewpoint = %viewpoint,
            tenant = %credentials.tenant,
            "requesting tenant token"
        );

        let request = self
            .http
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .query(&[
                ("viewpoint", viewpoint.as_str()),
                ("location", credentials.location_id.as_str()),
                ("tenant", credentials.tenant.as_str()),
                ("password", credentials.tenant_password.as_str()),
            ]);

        let body = self.http.send_json(request, "token exchange").await?;
        parse_token_response(&body).inspect_err(|e| {
            error!(detail = e.detail(), "malformed token response");
        })
    }
}

/// Read `accounts.item` and `token` from a token exchange response.
pub fn parse_token_response(body: &Value) -> ApiResult<AuthSession> {
    Ok(AuthSession {
        tenant_id: string_at(body, &["accounts", "item"])?,
        bearer: string_at(body, &["token"])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use serde_json::json;

    #[test]
    fn test_parse_token_response() {
        let body = json!({"accounts": {"item": "12345"}, "token": "thisismyauthtoken"});
        let session = parse_token_response(&body).unwrap();
        assert_eq!(session.tenant_id, "12345");
        assert_eq!(session.bearer, "thisismyauthtoken");
    }

    #[test]
    fn test_parse_token_response_missing_token() {
        let body = json!({"accounts": {"item": "12345"}});
        let err = parse_token_response(&body).unwrap_err();
        assert!(matches!(err, ApiError::Parse { .. }));
    }

    #[test]
    fn test_parse_token_response_unrelated_body() {
        let err = parse_token_response(&json!({"asdf": "gg"})).unwrap_err();
        assert!(matches!(err, ApiError::Parse { .. }));
        assert_eq!(err.detail(), "missing field `accounts.item`");
    }
}
