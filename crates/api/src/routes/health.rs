// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Service health endpoint

use axum::extract::State;

use crate::{
    envelope::ApiSuccess,
    state::{HealthCheck, ServerState},
};

/// Health check endpoint handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Health check endpoint",
    description = "Returns the health of the API service including version, environment and the status of the indexer connection.",
    responses(
        (status = 200, description = "Health report", body = ApiSuccess<HealthCheck>)
    )
)]
pub async fn health(State(state): State<ServerState>) -> ApiSuccess<HealthCheck> {
    ApiSuccess::new(state.health_check().await)
}
