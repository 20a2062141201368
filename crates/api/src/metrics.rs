// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics module
//!
//! Provides global metrics using the default Prometheus registry via macros and
//! an Axum-compatible metrics handler.

use std::sync::LazyLock;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use prometheus::{
    Encoder, HistogramVec, IntCounterVec, TextEncoder, register_histogram_vec,
    register_int_counter_vec,
};
use tracing::error;

/// Total number of API requests received, labeled by matched route.
pub static REQUESTS_BY_ENDPOINT: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "indexer_api_requests_total",
        "Total number of API requests, labeled by endpoint",
        &["endpoint"]
    )
    .expect("Failed to create indexer_api_requests_total counter vec")
});

/// Histogram for indexer query durations in seconds.
pub static UPSTREAM_REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "indexer_api_upstream_request_duration",
        "Indexer GraphQL request durations in seconds",
        &["operation", "result"],
        vec![0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("Failed to create upstream request duration histogram")
});

/// Increment the requests counter for a matched route template
pub fn inc_requests_by_endpoint(endpoint: &str) {
    REQUESTS_BY_ENDPOINT.with_label_values(&[endpoint]).inc();
}

/// Observe the duration of one indexer query
///
/// # Arguments
/// * `operation` - GraphQL operation name
/// * `result` - `success` or `error`
/// * `duration_secs` - The duration of the request in seconds
pub fn observe_upstream_duration(operation: &str, result: &str, duration_secs: f64) {
    UPSTREAM_REQUEST_DURATION
        .with_label_values(&[operation, result])
        .observe(duration_secs);
}

/// Axum handler that exports metrics in Prometheus text format
pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    )
        .into_response()
}
