#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use cinedex_core::memory::InMemoryMovieStore;
use cinedex_core::store::MovieStore;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use cinedex_api::config::ServerConfig;
use cinedex_api::router::build_app_router;
use cinedex_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
    }
}

/// Build the full application router over a fresh in-memory store.
pub fn build_test_app() -> Router {
    build_test_app_with_store(Arc::new(InMemoryMovieStore::new()))
}

/// Build the full application router over `store`, so a test can reach the
/// store directly (e.g. to simulate a concurrent writer).
pub fn build_test_app_with_store(store: Arc<dyn MovieStore>) -> Router {
    let config = test_config();
    let state = AppState {
        config: Arc::new(config.clone()),
        movies: store,
    };
    build_app_router(state, &config)
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send `body` verbatim, for payloads that are not valid JSON.
pub async fn send_raw(app: Router, method: Method, uri: &str, body: impl Into<Body>) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send_raw(app, Method::POST, uri, body.to_string()).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response {
    send_raw(app, Method::PATCH, uri, body.to_string()).await
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a movie through the API and return its `data` object.
pub async fn create_movie(app: Router, body: Value) -> Value {
    let response = post_json(app, "/api/v1/movies", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
