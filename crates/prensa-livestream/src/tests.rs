use crate::handler::{configure_routes, LiveStreamState};
use crate::service::{LiveStreamService, LiveStreamUpdate};
use crate::store::{FileStore, LiveStreamConfig, LiveStreamStore, DEFAULT_DESCRIPTION, DEFAULT_TITLE};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn test_app(dir: &TempDir) -> Router {
    let store: Arc<dyn LiveStreamStore> =
        Arc::new(FileStore::new(dir.path().join("live_stream.json")));
    let live_stream_service = Arc::new(LiveStreamService::new(store));
    configure_routes().with_state(Arc::new(LiveStreamState {
        live_stream_service,
    }))
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn get_config(app: &Router) -> Value {
    let request = Request::builder()
        .method("GET")
        .uri("/live-stream")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    response_json(response).await
}

async fn post_config(
    app: &Router,
    authorization: Option<&str>,
    body: Value,
) -> axum::response::Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/live-stream")
        .header("content-type", "application/json");

    if let Some(authorization) = authorization {
        builder = builder.header("authorization", authorization);
    }

    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

fn updated_at(value: &Value) -> DateTime<Utc> {
    value["updated_at"]
        .as_str()
        .expect("updated_at string")
        .parse()
        .expect("RFC 3339 timestamp")
}

#[tokio::test]
async fn test_get_on_fresh_system_returns_default() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let config = get_config(&app).await;
    assert_eq!(config["url"], "");
    assert_eq!(config["title"], DEFAULT_TITLE);
    assert_eq!(config["description"], DEFAULT_DESCRIPTION);
    assert_eq!(config["active"], false);
}

#[tokio::test]
async fn test_post_then_get_round_trip() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let before = updated_at(&get_config(&app).await);

    let response = post_config(
        &app,
        Some("Bearer admin-token"),
        json!({
            "url": "https://youtube.com/watch?v=abc123",
            "title": "Consejo municipal en vivo",
            "description": "Sesión ordinaria",
            "active": true
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["url"], "https://youtube.com/watch?v=abc123");

    let config = get_config(&app).await;
    assert_eq!(config["url"], "https://youtube.com/watch?v=abc123");
    assert_eq!(config["title"], "Consejo municipal en vivo");
    assert_eq!(config["description"], "Sesión ordinaria");
    assert_eq!(config["active"], true);
    assert!(updated_at(&config) >= before);
}

#[tokio::test]
async fn test_identical_posts_only_advance_timestamp() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let body = json!({
        "url": "https://stream.example.com/live",
        "title": "Noticias",
        "description": "",
        "active": true
    });

    let first = response_json(post_config(&app, Some("Bearer t"), body.clone()).await).await;
    let second = response_json(post_config(&app, Some("Bearer t"), body).await).await;

    assert_eq!(first["data"]["url"], second["data"]["url"]);
    assert_eq!(first["data"]["title"], second["data"]["title"]);
    assert_eq!(first["data"]["description"], second["data"]["description"]);
    assert_eq!(first["data"]["active"], second["data"]["active"]);
    assert!(updated_at(&second["data"]) >= updated_at(&first["data"]));
}

#[tokio::test]
async fn test_empty_url_is_valid() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = post_config(&app, Some("Bearer t"), json!({ "url": "" })).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_url_rejected_and_previous_record_kept() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = post_config(
        &app,
        Some("Bearer t"),
        json!({ "url": "https://ok.example.com/live", "title": "Antes" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_config(
        &app,
        Some("Bearer t"),
        json!({ "url": "not a url", "title": "Después" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let config = get_config(&app).await;
    assert_eq!(config["url"], "https://ok.example.com/live");
    assert_eq!(config["title"], "Antes");
}

#[tokio::test]
async fn test_missing_or_non_bearer_auth_rejected_without_state_change() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let response = post_config(&app, None, json!({ "active": true })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_config(&app, Some("Basic xyz"), json!({ "active": true })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Storage untouched: GET still synthesizes the default
    let config = get_config(&app).await;
    assert_eq!(config["url"], "");
    assert_eq!(config["active"], false);
}

#[tokio::test]
async fn test_missing_fields_get_defaults_and_explicit_false_is_kept() {
    let dir = TempDir::new().unwrap();
    let app = test_app(&dir);

    let body = response_json(post_config(&app, Some("Bearer t"), json!({})).await).await;
    assert_eq!(body["data"]["url"], "");
    assert_eq!(body["data"]["title"], DEFAULT_TITLE);
    assert_eq!(body["data"]["description"], "");
    assert_eq!(body["data"]["active"], false);

    let body = response_json(
        post_config(&app, Some("Bearer t"), json!({ "active": false })).await,
    )
    .await;
    assert_eq!(body["data"]["active"], false);
}

#[tokio::test]
async fn test_service_update_validates_url() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn LiveStreamStore> =
        Arc::new(FileStore::new(dir.path().join("live_stream.json")));
    let service = LiveStreamService::new(store);

    let result = service
        .update_config(LiveStreamUpdate {
            url: Some("://missing-scheme".to_string()),
            ..Default::default()
        })
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_concurrent_updates_never_blend_records() {
    let dir = TempDir::new().unwrap();
    let store: Arc<dyn LiveStreamStore> =
        Arc::new(FileStore::new(dir.path().join("live_stream.json")));
    let service = LiveStreamService::new(store.clone());

    let first = LiveStreamUpdate {
        url: Some("https://a.example.com/live".to_string()),
        title: Some("Emisión A".to_string()),
        description: Some("Canal A".to_string()),
        active: Some(true),
    };
    let second = LiveStreamUpdate {
        url: Some("https://b.example.com/live".to_string()),
        title: Some("Emisión B".to_string()),
        description: Some("Canal B".to_string()),
        active: Some(false),
    };

    let (first_result, second_result) = tokio::join!(
        service.update_config(first),
        service.update_config(second)
    );
    first_result.unwrap();
    second_result.unwrap();

    // Writes are serialized: the surviving record is one update as a whole,
    // never a mix of fields from both
    let persisted = store.read().await.expect("record persisted");
    let is_first = persisted.url == "https://a.example.com/live"
        && persisted.title == "Emisión A"
        && persisted.description == "Canal A"
        && persisted.active;
    let is_second = persisted.url == "https://b.example.com/live"
        && persisted.title == "Emisión B"
        && persisted.description == "Canal B"
        && !persisted.active;
    assert!(is_first || is_second);
}

#[tokio::test]
async fn test_file_store_round_trip_and_no_temp_residue() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("live_stream.json");
    let store = FileStore::new(path.clone());

    let mut config = LiveStreamConfig::default_record();
    config.url = "https://stream.example.com/live".to_string();
    config.active = true;

    store.write(&config).await.unwrap();
    assert_eq!(store.read().await, Some(config));
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn test_file_store_swallows_corrupt_record() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("live_stream.json");
    tokio::fs::write(&path, b"{ not json").await.unwrap();

    let store = FileStore::new(path);
    assert_eq!(store.read().await, None);
}
