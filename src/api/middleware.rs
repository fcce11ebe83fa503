//! API Middleware
//!
//! Request logging. Business rejections (4xx) are logged at `warn`, server
//! failures at `error`, everything else at `info`.

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::Response,
};

/// Header carrying the per-request id set by the outer request-id layer
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Headers never written to logs in clear
const SENSITIVE_HEADERS: &[&str] = &["authorization", "proxy-authorization", "cookie", "set-cookie"];

/// Header list safe for logging, sensitive values replaced
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let value = if SENSITIVE_HEADERS.contains(&name.as_str()) {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("[invalid utf8]")
            };
            (name.to_string(), value.to_string())
        })
        .collect()
}

fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Ok,
    Rejected,
    Failed,
}

impl From<StatusCode> for Outcome {
    fn from(status: StatusCode) -> Self {
        if status.is_server_error() {
            Outcome::Failed
        } else if status.is_client_error() {
            Outcome::Rejected
        } else {
            Outcome::Ok
        }
    }
}

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request_id(request.headers());

    tracing::debug!(
        method = %method,
        uri = %uri,
        request_id = ?request_id,
        headers = ?mask_headers_for_logging(request.headers()),
        "Incoming request"
    );

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    match Outcome::from(status) {
        Outcome::Failed => tracing::error!(
            method = %method, uri = %uri, status = %status, elapsed_ms, request_id = ?request_id,
            "Request failed"
        ),
        Outcome::Rejected => tracing::warn!(
            method = %method, uri = %uri, status = %status, elapsed_ms, request_id = ?request_id,
            "Request rejected"
        ),
        Outcome::Ok => tracing::info!(
            method = %method, uri = %uri, status = %status, elapsed_ms, request_id = ?request_id,
            "Request completed"
        ),
    }

    response
}
