// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Address endpoints
//!
//! Everything the indexer knows about one address across all chains: its
//! transaction history, the contracts and tokens it interacted with, its
//! token balances and, when the address is a contract, its metadata.

use axum::extract::State;
use indexer_client::{
    Contracts, Interactions, TokenBalances, TokenInteractions, TransactionHistoryPage,
};
use indexer_graph::queries;
use tracing::debug;

use crate::{
    envelope::{ApiFailure, ApiSuccess},
    error::ServerResult,
    extractors::{
        HistoryParams, PageFallback, PathParams, QueryParams, page_window, parse_hex,
        parse_history_filters, parse_page,
    },
    models::{Contract, Interaction, TokenBalance, TokenInteraction, TransactionHistory},
    pagination::HISTORY_PAGE_SIZE,
    state::ServerState,
};

/// Transactions sent or received by an address
#[utoipa::path(
    get,
    path = "/address/{address}/history",
    tag = "address",
    summary = "Transaction history",
    description = "Returns the transactions across all chains sent or received by the address, newest first, 50 per page. `chains` and `protocols` narrow the result; a transaction matching either list is kept.",
    params(
        ("address" = String, Path, description = "0x-prefixed address"),
        HistoryParams
    ),
    responses(
        (status = 200, description = "One page of transactions", body = ApiSuccess<TransactionHistory>),
        (status = 400, description = "Invalid address, chain or protocol", body = ApiFailure),
        (status = 502, description = "Indexer request failed", body = ApiFailure)
    )
)]
pub async fn history(
    State(state): State<ServerState>,
    PathParams(address): PathParams<String>,
    QueryParams(params): QueryParams<HistoryParams>,
) -> ServerResult<ApiSuccess<TransactionHistory>> {
    let address = parse_hex(&address, "invalid address")?;
    let filters = parse_history_filters(&params)?;
    let page = parse_page(params.page.as_deref(), PageFallback::FirstPage)?;
    let window = page_window(page, HISTORY_PAGE_SIZE)?;

    debug!(%address, page, ?filters, "fetching transaction history");

    let payload: TransactionHistoryPage = state
        .query(&queries::transaction_history(
            &address,
            window.limit,
            window.offset(),
            &filters,
        ))
        .await?;

    let summary = window.summarize(payload.transactions_aggregate.aggregate.count);
    Ok(ApiSuccess::new(TransactionHistory::new(
        payload.transactions,
        summary,
    )))
}

/// Contracts an address has called
#[utoipa::path(
    get,
    path = "/address/{address}/interacted",
    tag = "address",
    summary = "Contract interactions",
    description = "Returns the distinct contracts the address has sent transactions to, with their protocol when known.",
    params(("address" = String, Path, description = "0x-prefixed address")),
    responses(
        (status = 200, description = "Contracts called", body = ApiSuccess<Vec<Interaction>>),
        (status = 400, description = "Invalid address", body = ApiFailure),
        (status = 502, description = "Indexer request failed", body = ApiFailure)
    )
)]
pub async fn interacted(
    State(state): State<ServerState>,
    PathParams(address): PathParams<String>,
) -> ServerResult<ApiSuccess<Vec<Interaction>>> {
    let address = parse_hex(&address, "invalid address")?;
    let payload: Interactions = state
        .query(&queries::contracts_interacted(&address))
        .await?;

    Ok(ApiSuccess::new(
        payload
            .transactions
            .into_iter()
            .map(Interaction::from)
            .collect(),
    ))
}

/// ERC20 tokens an address has transferred
#[utoipa::path(
    get,
    path = "/address/{address}/tokens",
    tag = "address",
    summary = "Token interactions",
    description = "Returns the distinct ERC20 tokens the address has sent or received.",
    params(("address" = String, Path, description = "0x-prefixed address")),
    responses(
        (status = 200, description = "Tokens transferred", body = ApiSuccess<Vec<TokenInteraction>>),
        (status = 400, description = "Invalid address", body = ApiFailure),
        (status = 502, description = "Indexer request failed", body = ApiFailure)
    )
)]
pub async fn tokens(
    State(state): State<ServerState>,
    PathParams(address): PathParams<String>,
) -> ServerResult<ApiSuccess<Vec<TokenInteraction>>> {
    let address = parse_hex(&address, "invalid address")?;
    let payload: TokenInteractions = state.query(&queries::tokens_interacted(&address)).await?;

    Ok(ApiSuccess::new(
        payload
            .erc20_transfers
            .into_iter()
            .map(TokenInteraction::from)
            .collect(),
    ))
}

/// ERC20 balances of an address
#[utoipa::path(
    get,
    path = "/address/{address}/balances",
    tag = "address",
    summary = "Token balances",
    description = "Returns the current ERC20 balances of the address on every chain.",
    params(("address" = String, Path, description = "0x-prefixed address")),
    responses(
        (status = 200, description = "Balances", body = ApiSuccess<Vec<TokenBalance>>),
        (status = 400, description = "Invalid address", body = ApiFailure),
        (status = 502, description = "Indexer request failed", body = ApiFailure)
    )
)]
pub async fn balances(
    State(state): State<ServerState>,
    PathParams(address): PathParams<String>,
) -> ServerResult<ApiSuccess<Vec<TokenBalance>>> {
    let address = parse_hex(&address, "invalid address")?;
    let payload: TokenBalances = state.query(&queries::token_balances(&address)).await?;

    Ok(ApiSuccess::new(
        payload
            .erc20_balances
            .into_iter()
            .map(TokenBalance::from)
            .collect(),
    ))
}

/// Contract metadata for an address on every chain
#[utoipa::path(
    get,
    path = "/address/{address}/contracts",
    tag = "address",
    summary = "Contract metadata",
    description = "Returns the contract deployed at the address on each chain, with its verified ABI and protocol when known. Empty when the address is not a contract anywhere.",
    params(("address" = String, Path, description = "0x-prefixed address")),
    responses(
        (status = 200, description = "Contracts at this address", body = ApiSuccess<Vec<Contract>>),
        (status = 400, description = "Invalid address", body = ApiFailure),
        (status = 500, description = "Stored ABI is not valid JSON", body = ApiFailure),
        (status = 502, description = "Indexer request failed", body = ApiFailure)
    )
)]
pub async fn contracts(
    State(state): State<ServerState>,
    PathParams(address): PathParams<String>,
) -> ServerResult<ApiSuccess<Vec<Contract>>> {
    let address = parse_hex(&address, "invalid address")?;
    let payload: Contracts = state
        .query(&queries::contracts_by_address(&address))
        .await?;

    let contracts = payload
        .contracts
        .into_iter()
        .map(Contract::try_from)
        .collect::<ServerResult<Vec<_>>>()?;
    Ok(ApiSuccess::new(contracts))
}
