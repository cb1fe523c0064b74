//! HTTP handlers for the reverse proxy
//!
//! Mounted at `/api/proxy` and `/api/proxy/{*path}` for the five HTTP
//! methods the article backend serves. Upstream failures never leak the
//! underlying error: the client always gets a fixed 500 JSON payload naming
//! the failed action, while the detail goes to the server log only.

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;
use utoipa::OpenApi;

use crate::service::{ProxiedRequest, ProxyService};

/// State for proxy routes
#[derive(Clone)]
pub struct GatewayState {
    pub proxy_service: Arc<ProxyService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(proxy_get, proxy_post, proxy_put, proxy_patch, proxy_delete),
    info(
        title = "Gateway API",
        description = "Reverse proxy forwarding API calls to the article backend \
        selected by the inbound Host header.",
        version = "1.0.0"
    ),
    tags(
        (name = "Proxy", description = "Backend reverse proxy endpoints")
    )
)]
pub struct GatewayApiDoc;

pub fn configure_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route(
            "/api/proxy",
            get(proxy_get)
                .post(proxy_post)
                .put(proxy_put)
                .patch(proxy_patch)
                .delete(proxy_delete),
        )
        .route(
            "/api/proxy/{*path}",
            get(proxy_get)
                .post(proxy_post)
                .put(proxy_put)
                .patch(proxy_patch)
                .delete(proxy_delete),
        )
}

/// Forward a GET request to the article backend
#[utoipa::path(
    get,
    path = "/api/proxy/{path}",
    tag = "Proxy",
    responses(
        (status = 200, description = "Backend response relayed verbatim"),
        (status = 500, description = "Backend unreachable or returned a non-JSON body")
    ),
    params(
        ("path" = String, Path, description = "Backend path to forward to")
    )
)]
async fn proxy_get(
    State(state): State<Arc<GatewayState>>,
    path: Option<Path<String>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    dispatch(state, Method::GET, path, query, headers, None, "fetch").await
}

/// Forward a POST request to the article backend
#[utoipa::path(
    post,
    path = "/api/proxy/{path}",
    tag = "Proxy",
    responses(
        (status = 200, description = "Backend response relayed verbatim"),
        (status = 500, description = "Backend unreachable or returned a non-JSON body")
    ),
    params(
        ("path" = String, Path, description = "Backend path to forward to")
    )
)]
async fn proxy_post(
    State(state): State<Arc<GatewayState>>,
    path: Option<Path<String>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let body = body.map(|Json(value)| value);
    dispatch(state, Method::POST, path, query, headers, body, "create").await
}

/// Forward a PUT request to the article backend
#[utoipa::path(
    put,
    path = "/api/proxy/{path}",
    tag = "Proxy",
    responses(
        (status = 200, description = "Backend response relayed verbatim"),
        (status = 500, description = "Backend unreachable or returned a non-JSON body")
    ),
    params(
        ("path" = String, Path, description = "Backend path to forward to")
    )
)]
async fn proxy_put(
    State(state): State<Arc<GatewayState>>,
    path: Option<Path<String>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let body = body.map(|Json(value)| value);
    dispatch(state, Method::PUT, path, query, headers, body, "update").await
}

/// Forward a PATCH request to the article backend
#[utoipa::path(
    patch,
    path = "/api/proxy/{path}",
    tag = "Proxy",
    responses(
        (status = 200, description = "Backend response relayed verbatim"),
        (status = 500, description = "Backend unreachable or returned a non-JSON body")
    ),
    params(
        ("path" = String, Path, description = "Backend path to forward to")
    )
)]
async fn proxy_patch(
    State(state): State<Arc<GatewayState>>,
    path: Option<Path<String>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Response {
    let body = body.map(|Json(value)| value);
    dispatch(state, Method::PATCH, path, query, headers, body, "patch").await
}

/// Forward a DELETE request to the article backend
#[utoipa::path(
    delete,
    path = "/api/proxy/{path}",
    tag = "Proxy",
    responses(
        (status = 200, description = "Backend response relayed verbatim"),
        (status = 500, description = "Backend unreachable or returned a non-JSON body")
    ),
    params(
        ("path" = String, Path, description = "Backend path to forward to")
    )
)]
async fn proxy_delete(
    State(state): State<Arc<GatewayState>>,
    path: Option<Path<String>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    dispatch(state, Method::DELETE, path, query, headers, None, "delete").await
}

async fn dispatch(
    state: Arc<GatewayState>,
    method: Method,
    path: Option<Path<String>>,
    query: Option<String>,
    headers: HeaderMap,
    body: Option<Value>,
    action: &str,
) -> Response {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok());

    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    // Empty wildcard remainder forwards to the backend root
    let path = match path {
        Some(Path(segments)) => format!("/{}", segments),
        None => "/".to_string(),
    };

    let request = ProxiedRequest {
        method,
        path,
        query,
        authorization,
        body,
    };

    match state.proxy_service.forward(host, request).await {
        Ok((status, body)) => (status, Json(body)).into_response(),
        Err(e) => {
            error!("Proxy {} failed: {}", action, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": format!("Failed to {} data from backend", action)
                })),
            )
                .into_response()
        }
    }
}
