//! Reverse Proxy Dispatcher
//!
//! Replays an inbound request against the backend resolved by the locator
//! and relays the response verbatim in status and body shape.

use axum::http::{header, Method, StatusCode};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

use crate::locator::BackendLocator;

/// Deadline for one outbound call so a hung backend cannot hang the
/// proxied request indefinitely
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Upstream returned a non-JSON body: {0}")]
    InvalidBody(String),
}

/// Transient value describing one inbound call to be replayed upstream.
///
/// `authorization` and `body` are relayed byte-transparently: the proxy
/// never inspects or mutates either.
#[derive(Debug, Clone)]
pub struct ProxiedRequest {
    pub method: Method,
    /// Forwarded path, always `/`-prefixed
    pub path: String,
    /// Original query string, forwarded verbatim when non-empty
    pub query: Option<String>,
    /// Opaque bearer token header value, passed through verbatim
    pub authorization: Option<String>,
    /// JSON body for POST/PUT/PATCH; GET/DELETE never carry one
    pub body: Option<Value>,
}

/// Forwards inbound requests to the resolved backend instance
pub struct ProxyService {
    locator: BackendLocator,
    client: Client,
}

impl ProxyService {
    pub fn new(locator: BackendLocator) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .map_err(|e| {
                error!("Failed to create HTTP client: {}", e);
                GatewayError::ClientBuild(e.to_string())
            })?;

        Ok(Self { locator, client })
    }

    /// Replay one request against the backend selected for `host`.
    ///
    /// A single best-effort attempt: no retries, no circuit breaking. The
    /// backend's status code and JSON body are returned untransformed.
    pub async fn forward(
        &self,
        host: Option<&str>,
        request: ProxiedRequest,
    ) -> Result<(StatusCode, Value), GatewayError> {
        let target = self.locator.resolve(host);

        let mut url = format!("{}{}", target.base_url, request.path);
        if let Some(query) = request.query.as_deref().filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }

        debug!("Forwarding {} {}", request.method, url);

        let mut outbound = self
            .client
            .request(request.method, &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(ref auth) = request.authorization {
            outbound = outbound.header(header::AUTHORIZATION, auth);
        }

        if let Some(ref body) = request.body {
            outbound = outbound.json(body);
        }

        let response = outbound.send().await.map_err(|e| {
            error!("Upstream request to {} failed: {}", url, e);
            GatewayError::Upstream(e.to_string())
        })?;

        let status = response.status();

        let body = response.json::<Value>().await.map_err(|e| {
            error!("Upstream response from {} was not JSON: {}", url, e);
            GatewayError::InvalidBody(e.to_string())
        })?;

        Ok((status, body))
    }
}
