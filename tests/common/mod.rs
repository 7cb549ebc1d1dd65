// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use octofit_tracker::config::Config;
use octofit_tracker::db::MemoryDb;
use octofit_tracker::middleware::auth::create_jwt;
use octofit_tracker::routes::create_router;
use octofit_tracker::services::auth::NewUser;
use octofit_tracker::AppState;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test app over an empty store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with_config(Config::test_default())
}

/// Create a test app with a specific config.
#[allow(dead_code)]
pub fn create_test_app_with_config(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, MemoryDb::new()));
    (create_router(state.clone()), state)
}

/// Create a test app loaded with the sample students and teams.
#[allow(dead_code)]
pub fn create_seeded_test_app() -> (Router, Arc<AppState>) {
    let db = MemoryDb::new();
    octofit_tracker::seed::load_sample_data(&db, chrono::Utc::now(), true)
        .expect("Failed to load sample data");
    let state = Arc::new(AppState::new(Config::test_default(), db));
    (create_router(state.clone()), state)
}

/// Create a test JWT token for a user, signed like a real session.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: u64, signing_key: &[u8]) -> String {
    create_jwt(user_id, signing_key).expect("Failed to create JWT")
}

/// Register a user directly through the service and return (user ID, token).
#[allow(dead_code)]
pub fn create_test_user(state: &AppState, username: &str) -> (u64, String) {
    let user = state
        .auth_service
        .register(
            NewUser {
                username: username.to_string(),
                email: format!("{}@mergington.edu", username.to_lowercase()),
                password: "password123".to_string(),
                first_name: username.to_string(),
                last_name: "Test".to_string(),
                grade_level: None,
            },
            chrono::Utc::now(),
        )
        .expect("Failed to register test user");
    let token = create_test_jwt(user.id, &state.config.jwt_signing_key);
    (user.id, token)
}

/// Build a request with an optional Bearer token and JSON body.
#[allow(dead_code)]
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request and decode the JSON body (`Value::Null` when empty).
#[allow(dead_code)]
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, headers, body)
}
