//! Response types and conversions for the API.

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::Response,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use slack_bot_sdk::webhook::WebhookResponse;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Convert the SDK's webhook answer into an HTTP response.
///
/// Empty acknowledgments carry no `content-type` header.
pub fn into_http_response(webhook: WebhookResponse) -> Response {
    let status =
        StatusCode::from_u16(webhook.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut response = Response::new(Body::from(webhook.body()));
    *response.status_mut() = status;

    if let Some(content_type) = webhook.content_type() {
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }

    response
}

#[cfg(test)]
#[path = "responses_tests.rs"]
mod tests;
