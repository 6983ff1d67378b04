//! `X-API-Key` authentication for the REST API.
//!
//! A single static key protects every rendering and profile endpoint;
//! `/health` stays open. When no key is configured the middleware admits
//! everything — `run_server` logs a warning about that at startup.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::AppContext;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Validate an `X-API-Key` header value against the expected key.
pub fn validate_api_key(header_value: Option<&str>, expected: &str) -> bool {
    header_value.map(|k| k == expected).unwrap_or(false)
}

/// Axum middleware enforcing the API key on protected routes.
pub async fn require_api_key(
    State(ctx): State<Arc<AppContext>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = ctx.config.api_key.as_deref() else {
        // Auth disabled.
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if validate_api_key(provided, expected) {
        next.run(request).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid or missing API key" })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_required() {
        assert!(validate_api_key(Some("secret"), "secret"));
        assert!(!validate_api_key(Some("secret "), "secret"));
        assert!(!validate_api_key(Some("SECRET"), "secret"));
        assert!(!validate_api_key(Some(""), "secret"));
        assert!(!validate_api_key(None, "secret"));
    }
}
