// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Chain-scoped lookups of a single block, contract or transaction
//!
//! Each lookup answers 400 with `<thing> not found` when the indexer has no
//! matching row.

use axum::extract::State;
use indexer_client::{Blocks, Contracts, Transactions};
use indexer_graph::queries;

use crate::{
    envelope::{ApiFailure, ApiSuccess},
    error::{ServerError, ServerResult},
    extractors::{BlockRef, PathParams, parse_chain, parse_hex},
    models::{Block, Contract, Transaction},
    state::ServerState,
};

/// Block by number or hash
#[utoipa::path(
    get,
    path = "/chain/{chain}/block/{block}",
    tag = "chain",
    summary = "Block",
    description = "Returns a block of the chain. A 0x-prefixed hex `block` is looked up as a hash, a decimal as a height.",
    params(
        ("chain" = String, Path, description = "Public chain name, e.g. `ethereum`"),
        ("block" = String, Path, description = "Block height or hash")
    ),
    responses(
        (status = 200, description = "The block", body = ApiSuccess<Block>),
        (status = 400, description = "Invalid chain or block, or block not found", body = ApiFailure),
        (status = 502, description = "Indexer request failed", body = ApiFailure)
    )
)]
pub async fn block(
    State(state): State<ServerState>,
    PathParams((chain, block)): PathParams<(String, String)>,
) -> ServerResult<ApiSuccess<Block>> {
    let chain = parse_chain(&chain)?;
    let query = match BlockRef::parse(&block)? {
        BlockRef::Hash(hash) => queries::block_by_hash(&chain, &hash),
        BlockRef::Number(number) => queries::block_by_number(&chain, number),
    };

    let payload: Blocks = state.query(&query).await?;
    payload
        .blocks
        .into_iter()
        .next()
        .map(|row| ApiSuccess::new(Block::from(row)))
        .ok_or_else(|| ServerError::not_found("block not found"))
}

/// Contract metadata on one chain
#[utoipa::path(
    get,
    path = "/chain/{chain}/contract/{contract}",
    tag = "chain",
    summary = "Contract",
    description = "Returns the metadata of a contract on the chain, with its verified ABI and protocol when known.",
    params(
        ("chain" = String, Path, description = "Public chain name, e.g. `ethereum`"),
        ("contract" = String, Path, description = "0x-prefixed contract address")
    ),
    responses(
        (status = 200, description = "The contract", body = ApiSuccess<Contract>),
        (status = 400, description = "Invalid input or contract not found", body = ApiFailure),
        (status = 500, description = "Stored ABI is not valid JSON", body = ApiFailure),
        (status = 502, description = "Indexer request failed", body = ApiFailure)
    )
)]
pub async fn contract(
    State(state): State<ServerState>,
    PathParams((chain, contract)): PathParams<(String, String)>,
) -> ServerResult<ApiSuccess<Contract>> {
    let chain = parse_chain(&chain)?;
    let contract = parse_hex(&contract, "invalid address")?;

    let payload: Contracts = state
        .query(&queries::contract_for_chain(&chain, &contract))
        .await?;
    let row = payload
        .contracts
        .into_iter()
        .next()
        .ok_or_else(|| ServerError::not_found("contract not found"))?;

    Ok(ApiSuccess::new(Contract::try_from(row)?))
}

/// Transaction by hash
#[utoipa::path(
    get,
    path = "/chain/{chain}/tx/{hash}",
    tag = "chain",
    summary = "Transaction",
    description = "Returns a transaction of the chain with its token transfers.",
    params(
        ("chain" = String, Path, description = "Public chain name, e.g. `ethereum`"),
        ("hash" = String, Path, description = "0x-prefixed transaction hash")
    ),
    responses(
        (status = 200, description = "The transaction", body = ApiSuccess<Transaction>),
        (status = 400, description = "Invalid input or transaction not found", body = ApiFailure),
        (status = 502, description = "Indexer request failed", body = ApiFailure)
    )
)]
pub async fn transaction(
    State(state): State<ServerState>,
    PathParams((chain, hash)): PathParams<(String, String)>,
) -> ServerResult<ApiSuccess<Transaction>> {
    let chain = parse_chain(&chain)?;
    let hash = parse_hex(&hash, "invalid transaction hash")?;

    let payload: Transactions = state
        .query(&queries::transaction_by_hash(&chain, &hash))
        .await?;
    payload
        .transactions
        .into_iter()
        .next()
        .map(|row| ApiSuccess::new(Transaction::from(row)))
        .ok_or_else(|| ServerError::not_found("transaction not found"))
}
