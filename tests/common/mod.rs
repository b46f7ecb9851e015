#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, Response};
use axum::Router;
use sqlx::PgPool;
use http_body_util::BodyExt;
use tower::ServiceExt;

use authgate::app::build_app;
use authgate::config::{AppConfig, JwtConfig};
use authgate::state::AppState;

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        max_connections: 1,
        host: "127.0.0.1".into(),
        port: 0,
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "authgate-test".into(),
            audience: "authgate-test-users".into(),
            ttl_minutes: 5,
        },
    }
}

/// Full router over a fresh in-memory store.
pub fn build_test_app() -> Router {
    let state = AppState::in_memory(&test_config()).expect("state should build");
    build_app(state)
}

/// Full router over a migrated test database.
pub fn build_pg_test_app(pool: PgPool) -> Router {
    let state = AppState::postgres(pool, &test_config()).expect("state should build");
    build_app(state)
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.clone().oneshot(request).await.expect("router is infallible")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be json")
}
