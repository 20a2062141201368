// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Routes module
//!
//! This module provides the route table of the indexer API server. API routes
//! are wrapped in the `api_request` middleware; documentation and operational
//! routes are not. Unknown paths and methods answer with a failure envelope.

pub mod address;
pub mod chain;
pub mod health;
pub mod status;
pub mod token;

use axum::{
    Router,
    http::{StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::get,
};

use crate::{
    metrics::metrics_handler,
    middleware::{api_request_middleware, method_not_allowed, not_found},
    openapi::{openapi_spec, swagger_ui},
    state::ServerState,
};

/// Path of the Swagger UI
pub const DOCS_PATH: &str = "/docs";

/// Create application routes
pub fn create_routes() -> Router<ServerState> {
    let api_routes = Router::new()
        .route("/status", get(status::chain_status))
        .route("/address/{address}/history", get(address::history))
        .route("/address/{address}/interacted", get(address::interacted))
        .route("/address/{address}/tokens", get(address::tokens))
        .route("/address/{address}/balances", get(address::balances))
        .route("/address/{address}/contracts", get(address::contracts))
        .route("/chain/{chain}/block/{block}", get(chain::block))
        .route("/chain/{chain}/contract/{contract}", get(chain::contract))
        .route("/chain/{chain}/tx/{hash}", get(chain::transaction))
        .route("/token/{chain}/{token}/holders", get(token::holders))
        .route_layer(middleware::from_fn(api_request_middleware));

    let docs_routes = Router::new()
        .route("/", get(redirect_to_docs))
        .route(DOCS_PATH, get(swagger_ui))
        .route("/docs/openapi.json", get(openapi_spec));

    let operational_routes = Router::new()
        .route("/health", get(health::health))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(api_routes)
        .merge(docs_routes)
        .merge(operational_routes)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

/// `302 Found` pointing at the Swagger UI
async fn redirect_to_docs() -> impl IntoResponse {
    (StatusCode::FOUND, [(header::LOCATION, DOCS_PATH)])
}
