use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, warn};

use sf_core::api::{ApiError, ApiResponse};
use sf_core::ports::{ApiTransportPort, ClientStoragePort, HttpMethod};
use sf_core::session::AUTH_TOKEN_KEY;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";

/// REST client for the festival backend.
///
/// The bearer token is read from client storage on every call, so a login or
/// logout elsewhere in the process takes effect on the next request.
pub struct ReqwestApiClient {
    client: reqwest::Client,
    base_url: String,
    storage: Arc<dyn ClientStoragePort>,
}

impl ReqwestApiClient {
    /// An empty `base_url` falls back to [`DEFAULT_API_BASE_URL`]; `timeout`
    /// of `None` leaves requests unbounded.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
        storage: Arc<dyn ClientStoragePort>,
    ) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = base_url.into();
        let base_url = if base_url.trim().is_empty() {
            DEFAULT_API_BASE_URL.to_string()
        } else {
            base_url.trim().trim_end_matches('/').to_string()
        };

        Ok(Self {
            client,
            base_url,
            storage,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn bearer(&self) -> Option<HeaderValue> {
        let token = match self.storage.get_string(AUTH_TOKEN_KEY).await {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return None,
            Err(e) => {
                warn!(error = %e, "failed to read auth token, sending anonymous request");
                return None;
            }
        };
        HeaderValue::from_str(&format!("Bearer {token}")).ok()
    }
}

fn method_of(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

/// Empty body → `Null`; non-JSON text is kept as a string.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn network_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Network(format!("request timed out: {e}"))
    } else {
        ApiError::Network(e.to_string())
    }
}

#[async_trait]
impl ApiTransportPort for ReqwestApiClient {
    async fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.url(path);
        let mut request = self
            .client
            .request(method_of(method), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(auth) = self.bearer().await {
            request = request.header(AUTHORIZATION, auth);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(network_error)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(network_error)?;
        let body = parse_body(&text);

        if !(200..300).contains(&status) {
            let err = ApiError::from_status(status, &body);
            debug!(%method, path, status, error = %err, "api call failed");
            return Err(err);
        }

        debug!(%method, path, status, "api call ok");
        Ok(ApiResponse::new(status, body))
    }
}
