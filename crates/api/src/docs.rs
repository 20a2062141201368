// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! `OpenAPI` document of the public surface

use utoipa::OpenApi;

use crate::{
    envelope::ApiFailure,
    models::{
        Block, ChainStatus, Contract, HolderBalance, Interaction, TokenBalance, TokenHolderPage,
        TokenInteraction, TokenTransfer, Transaction, TransactionHistory,
    },
    routes::{address, chain, health, status, token},
    state::{HealthCheck, HealthStatus},
};

/// Aggregated `OpenAPI` specification
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "EVM Indexer API",
        description = "Read-only REST access to the EVM indexer.",
    ),
    paths(
        status::chain_status,
        address::history,
        address::interacted,
        address::tokens,
        address::balances,
        address::contracts,
        chain::block,
        chain::contract,
        chain::transaction,
        token::holders,
        health::health,
    ),
    components(schemas(
        ApiFailure,
        Block,
        ChainStatus,
        Contract,
        HealthCheck,
        HealthStatus,
        HolderBalance,
        Interaction,
        TokenBalance,
        TokenHolderPage,
        TokenInteraction,
        TokenTransfer,
        Transaction,
        TransactionHistory,
    )),
    tags(
        (name = "status", description = "Indexing progress"),
        (name = "address", description = "Activity of one address across chains"),
        (name = "chain", description = "Single block, contract and transaction lookups"),
        (name = "token", description = "ERC20 token holders"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;
