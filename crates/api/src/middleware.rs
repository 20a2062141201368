// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Middleware module for HTTP request processing
//!
//! Request spans and endpoint counters for API routes, plus the handlers that
//! keep every failure inside the response envelope: panics, timeouts, unknown
//! routes and unsupported methods.

use std::any::Any;

use axum::{
    BoxError,
    extract::{MatchedPath, Request},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower::timeout::error::Elapsed;
use tracing::{Instrument, Level, error, span, warn};

use crate::{envelope::ApiFailure, metrics};

/// Route prefixes whose second path segment names a chain
const CHAIN_SCOPED_PREFIXES: &[&str] = &["chain", "token"];

/// Opens an `api_request` span for a routed API call
///
/// The span carries the matched route template and, for chain-scoped routes,
/// the raw chain segment. The request is also counted per endpoint.
pub async fn api_request_middleware(req: Request, next: Next) -> Response {
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| req.uri().path().to_string(), |p| p.as_str().to_string());
    let chain = chain_segment(req.uri().path()).unwrap_or_default();

    metrics::inc_requests_by_endpoint(&endpoint);

    let span = span!(
        Level::INFO,
        "api_request",
        endpoint = %endpoint,
        chain = %chain,
    );

    next.run(req).instrument(span).await
}

/// Extract the chain segment from `/chain/{chain}/...` or `/token/{chain}/...`
fn chain_segment(path: &str) -> Option<String> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let prefix = segments.next()?;
    if CHAIN_SCOPED_PREFIXES.contains(&prefix) {
        segments.next().map(str::to_lowercase)
    } else {
        None
    }
}

/// Turns a handler panic into a 500 failure envelope
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = detail, "handler panicked");

    ApiFailure::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}

/// Turns an error from the server-wide layers into a failure envelope
///
/// An elapsed request timeout is a 408; anything else is unexpected.
pub async fn handle_layer_error(err: BoxError) -> Response {
    if err.is::<Elapsed>() {
        warn!("request timed out");
        return ApiFailure::new(StatusCode::REQUEST_TIMEOUT, "request timeout").into_response();
    }

    error!(error = %err, "middleware failed");
    ApiFailure::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}

/// Fallback for paths no route matches
pub async fn not_found() -> ApiFailure {
    ApiFailure::new(StatusCode::NOT_FOUND, "not found")
}

/// Fallback for a known path requested with an unsupported method
pub async fn method_not_allowed() -> ApiFailure {
    ApiFailure::new(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        Router, body::Body, body::to_bytes, error_handling::HandleErrorLayer, routing::get,
    };
    use serde_json::Value;
    use tower::{ServiceBuilder, ServiceExt, timeout::TimeoutLayer};
    use tower_http::catch_panic::CatchPanicLayer;

    use super::*;

    async fn body_of(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn chain_segment_from_path() {
        assert_eq!(
            chain_segment("/chain/Ethereum/block/1"),
            Some("ethereum".to_string())
        );
        assert_eq!(
            chain_segment("/token/avax/0xabc/holders"),
            Some("avax".to_string())
        );
        assert_eq!(chain_segment("/address/0xabc/history"), None);
        assert_eq!(chain_segment("/status"), None);
        assert_eq!(chain_segment("/"), None);
    }

    #[allow(clippy::panic)]
    async fn exploding_handler() -> &'static str {
        panic!("boom")
    }

    #[tokio::test]
    async fn panics_become_internal_server_error_envelopes() {
        let app = Router::new()
            .route("/explode", get(exploding_handler))
            .layer(CatchPanicLayer::custom(handle_panic));

        let response = app
            .oneshot(Request::builder().uri("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "internal server error");
    }

    #[tokio::test]
    async fn slow_handlers_become_request_timeout_envelopes() {
        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(handle_layer_error))
                    .layer(TimeoutLayer::new(Duration::from_millis(20))),
            );

        let response = app
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            body_of(response).await,
            serde_json::json!({ "success": false, "error": "request timeout" })
        );
    }

    #[tokio::test]
    async fn other_layer_errors_are_internal() {
        let response = handle_layer_error(BoxError::from("broken pipe")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await["error"], "internal server error");
    }

    #[tokio::test]
    async fn unknown_routes_become_not_found_envelopes() {
        let app = Router::new()
            .route("/status", get(|| async { "ok" }))
            .fallback(not_found);

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_of(response).await["error"], "not found");
    }

    #[tokio::test]
    async fn api_requests_are_counted_by_route_template() {
        let app = Router::new()
            .route("/chain/{chain}/block/{block}", get(|| async { "ok" }))
            .route_layer(axum::middleware::from_fn(api_request_middleware));

        let before = metrics::REQUESTS_BY_ENDPOINT
            .with_label_values(&["/chain/{chain}/block/{block}"])
            .get();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/chain/ethereum/block/12")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let after = metrics::REQUESTS_BY_ENDPOINT
            .with_label_values(&["/chain/{chain}/block/{block}"])
            .get();
        assert_eq!(after, before + 1);
    }
}
