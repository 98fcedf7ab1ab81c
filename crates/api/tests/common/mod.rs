//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use vitrine_api::config::ServerConfig;
use vitrine_api::router::build_app_router;
use vitrine_api::state::AppState;
use vitrine_sites::SiteService;

/// Build a test `ServerConfig` with safe defaults and no refinement engine.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        preview_ttl_secs: 3600,
        refinement_url: None,
        refinement_timeout_secs: 5,
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let sites = SiteService::new(pool.clone(), config.site_service_config());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        sites: Arc::new(sites),
    };
    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

/// POST without a body.
pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

async fn send_json(app: Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A publishable document whose hero headline is `headline`.
pub fn document(headline: &str) -> Value {
    json!({
        "metadata": { "title": "Loja", "description": "" },
        "theme": { "primary_color": "#336699", "font_family": "Inter" },
        "pages": [{
            "name": "Home",
            "sections": [
                { "type": "hero", "content": { "headline": headline } },
                { "type": "footer", "content": {
                    "text": "© Loja",
                    "links": [{ "label": "Instagram", "href": "https://instagram.com/loja" }]
                }}
            ]
        }]
    })
}

/// Create a site through the API and return its `data` payload.
pub async fn create_site(app: &Router, name: &str) -> Value {
    let response = post_json(
        app.clone(),
        "/api/v1/sites",
        json!({ "owner_id": 1, "name": name, "document": document("v1") }),
    )
    .await;
    assert_eq!(response.status(), 201);
    body_json(response).await["data"].clone()
}
