// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Indexing progress endpoint

use axum::extract::State;
use indexer_client::ChainsIndexedState;
use indexer_graph::queries;

use crate::{
    envelope::{ApiFailure, ApiSuccess},
    error::ServerResult,
    models::ChainStatus,
    state::ServerState,
};

/// Number of indexed blocks per chain
#[utoipa::path(
    get,
    path = "/status",
    tag = "status",
    summary = "Indexing status",
    description = "Returns the number of blocks the indexer has processed on each chain.",
    responses(
        (status = 200, description = "Per-chain progress", body = ApiSuccess<Vec<ChainStatus>>),
        (status = 502, description = "Indexer request failed", body = ApiFailure)
    )
)]
pub async fn chain_status(
    State(state): State<ServerState>,
) -> ServerResult<ApiSuccess<Vec<ChainStatus>>> {
    let payload: ChainsIndexedState = state.query(&queries::chains_indexed_state()).await?;

    Ok(ApiSuccess::new(
        payload
            .chains_indexed_state
            .into_iter()
            .map(ChainStatus::from)
            .collect(),
    ))
}
