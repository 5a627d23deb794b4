use std::str::FromStr;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::{Layer, ServiceExt};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::db;
use crate::routes;


type TestApp = NormalizePath<Router>;

/// Router over a fresh in-memory database, wrapped the same way `main` wraps it.
/// A single connection keeps the in-memory database alive across requests.
async fn test_app() -> TestApp {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    db::init(&pool).await.unwrap();

    NormalizePathLayer::trim_trailing_slash().layer(routes::create_router(pool))
}

async fn send(app: &TestApp, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Like `send`, but with a raw body for payloads that are not valid JSON.
async fn send_raw(app: &TestApp, method: &str, uri: &str, body: &str) -> StatusCode {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    app.clone().oneshot(request).await.unwrap().status()
}

async fn create_article(app: &TestApp, title: &str, body: &str) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/api/news/",
        Some(serde_json::json!({ "title": title, "body": body })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json
}

async fn create_comment(app: &TestApp, article_id: i64, body: &str) -> Value {
    let (status, json) = send(
        app,
        "POST",
        "/api/comments/",
        Some(serde_json::json!({ "article": article_id, "body": body })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json
}

#[tokio::test]
async fn health_check_responds() {
    let app = test_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
