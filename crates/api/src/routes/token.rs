// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Token holder endpoint

use axum::extract::State;
use indexer_client::TokenHolders;
use indexer_graph::queries;
use tracing::debug;

use crate::{
    envelope::{ApiFailure, ApiSuccess},
    error::ServerResult,
    extractors::{
        HoldersParams, PageFallback, PathParams, QueryParams, page_window, parse_chain,
        parse_hex, parse_holders_limit, parse_page,
    },
    models::TokenHolderPage,
    state::ServerState,
};

/// Holders of an ERC20 token
#[utoipa::path(
    get,
    path = "/token/{chain}/{token}/holders",
    tag = "token",
    summary = "Token holders",
    description = "Returns the holders of a token on the chain, largest balance first, with the number of holders and the total supply held.",
    params(
        ("chain" = String, Path, description = "Public chain name, e.g. `ethereum`"),
        ("token" = String, Path, description = "0x-prefixed token address"),
        HoldersParams
    ),
    responses(
        (status = 200, description = "One page of holders", body = ApiSuccess<TokenHolderPage>),
        (status = 400, description = "Invalid token, chain, page or limit", body = ApiFailure),
        (status = 502, description = "Indexer request failed", body = ApiFailure)
    )
)]
pub async fn holders(
    State(state): State<ServerState>,
    PathParams((chain, token)): PathParams<(String, String)>,
    QueryParams(params): QueryParams<HoldersParams>,
) -> ServerResult<ApiSuccess<TokenHolderPage>> {
    let token = parse_hex(&token, "invalid token address")?;
    let chain = parse_chain(&chain)?;
    let page = parse_page(params.page.as_deref(), PageFallback::Reject)?;
    let limit = parse_holders_limit(params.limit.as_deref())?;
    let window = page_window(page, limit)?;

    debug!(%token, %chain, page, limit, "fetching token holders");

    let payload: TokenHolders = state
        .query(&queries::token_holders(
            &token,
            &chain,
            window.limit,
            window.offset(),
        ))
        .await?;

    let summary = window.summarize(payload.erc20_balances_aggregate.aggregate.count);
    Ok(ApiSuccess::new(TokenHolderPage::new(payload, summary)))
}
