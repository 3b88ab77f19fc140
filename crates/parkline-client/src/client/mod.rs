//! ParkingBoss API client.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.
//!
//! Every operation authenticates afresh; no token outlives the call that
//! obtained it.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::timestamp::{Clock, SystemClock, Timestamps};

mod auth;
mod http;
mod permits;
mod usage;

use http::HttpBackend;

pub use auth::parse_token_response;
pub use permits::{parse_created_permit, parse_permit_list};
pub use usage::{parse_usage_snapshot, quota_remaining};

const USER_AGENT_VALUE: &str = concat!("parkline-client/", env!("CARGO_PKG_VERSION"));

/// Client for the ParkingBoss tenant API.
#[derive(Debug, Clone)]
pub struct ParkingClient {
    http: HttpBackend,
    config: Arc<ClientConfig>,
    timestamps: Timestamps,
}

impl ParkingClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a client whose viewpoints are read from `clock`.
    pub fn with_clock(config: ClientConfig, clock: Arc<dyn Clock>) -> ApiResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let mut builder = reqwest::Client::builder().default_headers(default_headers);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::transport(format!("failed to create HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let timestamps = Timestamps::new(clock, config.timezone);

        Ok(Self {
            http: HttpBackend { client, base_url },
            config: Arc::new(config),
            timestamps,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.http.base_url
    }

    fn token_url(&self) -> String {
        self.http.url("/v1/accounts/auth/tokens")
    }

    fn tenant_url(&self, tenant_id: &str) -> String {
        self.http.url(&format!(
            "/v1/locations/{}/tenants/{}",
            self.config.credentials.location_id, tenant_id
        ))
    }

    fn usage_url(&self, tenant_id: &str) -> String {
        format!("{}/permits/temporary/usage", self.tenant_url(tenant_id))
    }

    fn permits_url(&self, tenant_id: &str) -> String {
        format!("{}/permits", self.tenant_url(tenant_id))
    }

    fn create_url(&self) -> String {
        self.http.url("/v1/permits/temporary")
    }

    /// The permit id becomes a single escaped path segment.
    fn expire_url(&self, permit_id: &str) -> ApiResult<String> {
        if matches!(permit_id, "" | "." | "..") {
            return Err(ApiError::transport(format!(
                "invalid permit id `{}`",
                permit_id
            )));
        }
        Ok(self.http.url(&format!(
            "/v1/permits/{}/expires",
            urlencoding::encode(permit_id)
        )))
    }
}
