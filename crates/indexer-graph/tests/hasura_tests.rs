// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for `HasuraClient`
//!
//! Every query builder is executed against a wiremock indexer and decoded into
//! the row types the HTTP handlers consume.

use indexer_client::{
    Blocks, ChainsIndexedState, Contracts, IndexerClient, IndexerError, TokenHolders,
    TransactionHistoryPage, Transactions,
};
use indexer_graph::{HasuraClient, HasuraConfig, HistoryFilters, queries};
use serde_json::json;
use shared_types::{ChainName, HexString};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method},
};

use fixtures::*;

const TEST_TIMEOUT_SECONDS: u64 = 10;
const TEST_HEALTH_CHECK_TIMEOUT_SECONDS: u64 = 5;

fn create_client(server: &MockServer) -> HasuraClient {
    let config = HasuraConfig::new(
        &server.uri(),
        ADMIN_SECRET,
        TEST_TIMEOUT_SECONDS,
        TEST_HEALTH_CHECK_TIMEOUT_SECONDS,
    )
    .unwrap();
    HasuraClient::new(config).unwrap()
}

fn ethereum() -> ChainName {
    ChainName::from_public("ethereum").unwrap()
}

fn hex(value: &str) -> HexString {
    HexString::parse(value).unwrap()
}

#[tokio::test]
async fn chains_indexed_state_decodes_numbers_and_strings() {
    let server = MockServer::start().await;
    mount_data(&server, "getChainsIndexedState", chains_indexed_state()).await;

    let state: ChainsIndexedState = create_client(&server)
        .execute(&queries::chains_indexed_state())
        .await
        .unwrap();

    let amounts: Vec<(String, u64)> = state
        .chains_indexed_state
        .into_iter()
        .map(|row| (row.chain, row.indexed_blocks_amount))
        .collect();
    assert_eq!(
        amounts,
        vec![
            ("avalanche".to_string(), 31_000_000),
            ("mainnet".to_string(), 17_000_000)
        ]
    );
}

#[tokio::test]
async fn transaction_history_sends_filters_as_variables() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "getTransactionHistory",
            "variables": {
                "limit": 50,
                "offset": 50,
                "where": {
                    "_and": [
                        {
                            "_or": [
                                { "from_address": { "_eq": ADDRESS } },
                                { "to_address": { "_eq": ADDRESS } }
                            ]
                        },
                        {
                            "_or": [
                                { "chain": { "_eq": "mainnet" } },
                                { "contract_interacted": { "adapter": { "adapter_id": { "_eq": "circle" } } } }
                            ]
                        }
                    ]
                }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": transaction_history(120) })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let filters = HistoryFilters {
        chains: vec![ethereum()],
        protocols: vec!["circle".to_string()],
    };
    let page: TransactionHistoryPage = create_client(&server)
        .execute(&queries::transaction_history(
            &hex(&ADDRESS.to_uppercase().replace("0X", "0x")),
            50,
            50,
            &filters,
        ))
        .await
        .unwrap();

    assert_eq!(page.transactions_aggregate.aggregate.count, 120);
    assert_eq!(page.transactions.len(), 2);
    let first = &page.transactions[0];
    assert_eq!(first.block_number.as_str(), "17000000");
    assert_eq!(first.gas_price.as_str(), "30000000000");
    assert_eq!(first.token_transfers_aggregate.nodes.len(), 2);
}

#[tokio::test]
async fn token_holders_keeps_aggregates() {
    let server = MockServer::start().await;
    mount_data(&server, "getTokenHolders", token_holders()).await;

    let holders: TokenHolders = create_client(&server)
        .execute(&queries::token_holders(&hex(TOKEN), &ethereum(), 50, 0))
        .await
        .unwrap();

    let stats = holders.erc20_balances_aggregate.aggregate;
    assert_eq!(stats.count, 125);
    assert_eq!(stats.sum.unwrap().balance, json!(1_000_000_000));
    assert_eq!(holders.erc20_balances[1].balance.as_str(), "100000000");
}

#[tokio::test]
async fn block_lookup_decodes_block_rows() {
    let server = MockServer::start().await;
    mount_data(&server, "getBlockByNumber", json!({ "blocks": [block()] })).await;

    let blocks: Blocks = create_client(&server)
        .execute(&queries::block_by_number(&ethereum(), 17_000_000))
        .await
        .unwrap();

    let block = &blocks.blocks[0];
    assert_eq!(block.number, 17_000_000);
    assert_eq!(block.size, 65_432);
    assert_eq!(block.transactions_data_aggregate.nodes[0].hash, TX_HASH);
}

#[tokio::test]
async fn contract_lookup_with_and_without_abi() {
    let server = MockServer::start().await;
    mount_data(
        &server,
        "getContracts",
        json!({
            "contracts": [
                contract("mainnet", Some(r#"[{"type":"function","name":"transfer"}]"#)),
                contract("polygon", None)
            ]
        }),
    )
    .await;

    let contracts: Contracts = create_client(&server)
        .execute(&queries::contracts_by_address(&hex(TOKEN)))
        .await
        .unwrap();

    assert_eq!(contracts.contracts.len(), 2);
    assert!(contracts.contracts[0].abi.is_some());
    assert!(contracts.contracts[1].abi.is_none());
    assert_eq!(contracts.contracts[0].block, 6_082_465);
}

#[tokio::test]
async fn transaction_lookup_with_no_rows() {
    let server = MockServer::start().await;
    mount_data(&server, "getTransaction", json!({ "transactions": [] })).await;

    let transactions: Transactions = create_client(&server)
        .execute(&queries::transaction_by_hash(&ethereum(), &hex(TX_HASH)))
        .await
        .unwrap();

    assert!(transactions.transactions.is_empty());
}

#[tokio::test]
async fn graphql_errors_are_surfaced() {
    let server = MockServer::start().await;
    mount_errors(&server, "getTokensBalances", "field 'erc20_balances' not found").await;

    let error = create_client(&server)
        .execute::<serde_json::Value>(&queries::token_balances(&hex(ADDRESS)))
        .await
        .unwrap_err();

    match error {
        IndexerError::GraphQl { messages } => {
            assert_eq!(messages, vec!["field 'erc20_balances' not found".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn wrong_secret_is_not_matched() {
    let server = MockServer::start().await;
    mount_data(&server, "getChainsIndexedState", chains_indexed_state()).await;

    let config = HasuraConfig::new(
        &server.uri(),
        "wrong-secret",
        TEST_TIMEOUT_SECONDS,
        TEST_HEALTH_CHECK_TIMEOUT_SECONDS,
    )
    .unwrap();
    let client = HasuraClient::new(config).unwrap();

    // wiremock answers unmatched requests with 404
    let error = client
        .execute::<ChainsIndexedState>(&queries::chains_indexed_state())
        .await
        .unwrap_err();
    assert!(matches!(error, IndexerError::Upstream { status: 404, .. }));
}
