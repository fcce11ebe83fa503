//! Common test utilities

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::util::ServiceExt;

use core_banking::api::{self, AppState};

pub const API_PREFIX: &str = "/api/v1";

/// Router over a fresh in-memory ledger, mounted the way the server mounts it
pub fn setup_app() -> Router {
    Router::new()
        .nest(API_PREFIX, api::create_router())
        .with_state(AppState::in_memory())
}

/// Send one request and return status plus the decoded JSON body (Null when empty)
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(format!("{API_PREFIX}{uri}"));

    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Create an account and return its id
pub async fn create_account(app: &Router, document_number: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/accounts",
        Some(serde_json::json!({ "documentNumber": document_number })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "account creation failed: {body}");
    body["accountId"].as_str().unwrap().to_string()
}

pub async fn balance_of(app: &Router, account_id: &str) -> i64 {
    let (status, body) = send(app, "GET", &format!("/accounts/balance?account_id={account_id}"), None).await;
    assert_eq!(status, StatusCode::OK, "balance lookup failed: {body}");
    body["balance"].as_i64().unwrap()
}
