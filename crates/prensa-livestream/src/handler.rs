//! HTTP handlers for the live-stream configuration
//!
//! The write path checks only that a `Bearer` scheme is presented; token
//! verification belongs to the external authentication backend. A
//! production deployment must place this endpoint behind the
//! authenticating gateway.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

use prensa_core::error_builder;
use prensa_core::problemdetails::Problem;

use crate::service::{LiveStreamError, LiveStreamService, LiveStreamUpdate};
use crate::store::LiveStreamConfig;

/// State for live-stream routes
pub struct LiveStreamState {
    pub live_stream_service: Arc<LiveStreamService>,
}

/// Response for a successful configuration update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LiveStreamUpdateResponse {
    pub success: bool,
    pub message: String,
    pub data: LiveStreamConfig,
}

#[derive(OpenApi)]
#[openapi(
    paths(get_live_stream, update_live_stream),
    components(schemas(LiveStreamConfig, LiveStreamUpdate, LiveStreamUpdateResponse)),
    info(
        title = "Live Stream API",
        description = "API endpoints for the live broadcast banner configuration.",
        version = "1.0.0"
    ),
    tags(
        (name = "LiveStream", description = "Live-stream configuration endpoints")
    )
)]
pub struct LiveStreamApiDoc;

pub fn configure_routes() -> Router<Arc<LiveStreamState>> {
    Router::new()
        .route("/live-stream", get(get_live_stream))
        .route("/live-stream", post(update_live_stream))
}

/// Get the live-stream configuration
#[utoipa::path(
    tag = "LiveStream",
    get,
    path = "/live-stream",
    responses(
        (status = 200, description = "Current live-stream configuration", body = LiveStreamConfig)
    )
)]
async fn get_live_stream(State(state): State<Arc<LiveStreamState>>) -> impl IntoResponse {
    Json(state.live_stream_service.get_config().await)
}

/// Replace the live-stream configuration
#[utoipa::path(
    tag = "LiveStream",
    post,
    path = "/live-stream",
    request_body = LiveStreamUpdate,
    responses(
        (status = 200, description = "Configuration updated", body = LiveStreamUpdateResponse),
        (status = 400, description = "Bad request - invalid stream URL"),
        (status = 401, description = "Unauthorized - missing or malformed bearer token"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
async fn update_live_stream(
    State(state): State<Arc<LiveStreamState>>,
    headers: HeaderMap,
    body: Option<Json<LiveStreamUpdate>>,
) -> Result<impl IntoResponse, Problem> {
    let has_bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("Bearer "))
        .unwrap_or(false);

    if !has_bearer {
        return Err(error_builder::unauthorized()
            .detail("A bearer token is required to update the live stream")
            .build());
    }

    let update = body.map(|Json(update)| update).unwrap_or_default();

    match state.live_stream_service.update_config(update).await {
        Ok(config) => Ok((
            StatusCode::OK,
            Json(LiveStreamUpdateResponse {
                success: true,
                message: "Live stream configuration updated".to_string(),
                data: config,
            }),
        )),
        Err(LiveStreamError::InvalidUrl(e)) => {
            tracing::warn!("Rejected live-stream update with invalid URL: {}", e);
            Err(error_builder::bad_request()
                .detail("The stream URL must be a valid absolute URL")
                .build())
        }
        Err(e) => {
            tracing::error!("Failed to persist live-stream configuration: {}", e);
            Err(error_builder::internal_server_error().build())
        }
    }
}
