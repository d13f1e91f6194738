#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use user_api::{
    app::build_app,
    config::{AdminSeed, AppConfig, LogConfig},
    db,
    state::AppState,
};

/// In-memory database with the schema applied and `admin`/`adminpass` seeded.
pub async fn create_test_app_state() -> AppState {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    // In-memory needs a single connection that is never recycled
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    db::migrate(&pool).await.expect("Failed to run migrations");

    let admin = AdminSeed {
        name: "admin".into(),
        password: "adminpass".into(),
        email: Some("admin@example.com".into()),
    };
    db::seed_admin(&pool, &admin).await.expect("Failed to seed admin");

    let config = Arc::new(AppConfig {
        database_path: ":memory:".into(),
        max_connections: 1,
        admin: Some(admin),
        listen_addr: ([127, 0, 0, 1], 0).into(),
        log: LogConfig {
            filter: "user_api=debug".into(),
            json: false,
        },
    });
    AppState::from_parts(pool, config)
}

pub async fn test_app() -> (AppState, Router) {
    let state = create_test_app_state().await;
    let app = build_app(state.clone());
    (state, app)
}

/// Sends one request and returns the status plus the parsed JSON body
/// (`Value::Null` for an empty body).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
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

/// Creates a user through the API and returns its id.
pub async fn create_user(app: &Router, body: Value) -> i64 {
    let (status, json) = send(app, "POST", "/users", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
    json["id"].as_i64().unwrap()
}
