use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use casedesk::api::router;
use casedesk::assistant::Assistant;
use casedesk::db::SqliteStore;
use casedesk::services::{SessionStore, seed_sample_data};
use casedesk::state::AppState;

/// App over a fresh in-memory database seeded with the sample records.
pub async fn build_test_app(now: DateTime<Utc>) -> Router {
    let store = SqliteStore::in_memory()
        .await
        .expect("Failed to create test db");
    seed_sample_data(&store, now)
        .await
        .expect("Failed to seed test db");
    let store = Arc::new(store);

    router(AppState {
        repo: store.clone(),
        auth: store,
        sessions: SessionStore::new(chrono::Duration::hours(1)),
        assistant: Arc::new(Assistant::default()),
    })
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn guest_token(app: &Router) -> String {
    let (status, body) = send(app, Method::POST, "/auth/guest", None, None).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().expect("token").to_string()
}
