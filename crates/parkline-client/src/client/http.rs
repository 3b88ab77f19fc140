//! HTTP layer: send, status mapping, JSON body.
//!
//! This is the ONLY place for status code handling. The operation modules
//! never interpret status codes; anything non-2xx is a transport failure.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};

/// Upstream bodies are logged, truncated to this many characters.
const LOGGED_BODY_CHARS: usize = 200;

/// HTTP backend for making requests (holds reqwest client and base URL).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
}

impl HttpBackend {
    /// Send a prepared request once; non-2xx becomes `ApiError::Transport`.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> ApiResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            warn!(operation, error = %e, "request to parking API failed");
            ApiError::transport(format!("{}: {}", operation, e))
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(operation, status = status.as_u16(), "parking API request succeeded");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let body: String = body.chars().take(LOGGED_BODY_CHARS).collect();
        warn!(
            operation,
            status = status.as_u16(),
            body = %body,
            "parking API returned an error status"
        );
        Err(ApiError::transport(format!(
            "{}: HTTP {}",
            operation,
            status.as_u16()
        )))
    }

    /// Send and decode the body as JSON.
    ///
    /// A body that is not JSON fails the same way an unreadable body does:
    /// as a transport failure. Missing fields inside valid JSON are the
    /// caller's parse failures.
    pub(crate) async fn send_json(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> ApiResult<Value> {
        let response = self.send(request, operation).await?;
        response.json::<Value>().await.map_err(|e| {
            warn!(operation, error = %e, "parking API returned an undecodable body");
            ApiError::transport(format!("{}: invalid JSON body: {}", operation, e))
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
