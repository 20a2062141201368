// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs, dead_code)]

//! Test fixtures for endpoint tests
//!
//! Starts the API against a wiremock indexer and provides canned Hasura
//! payloads keyed by `operationName`.

use std::{net::SocketAddr, time::Duration};

use api::{Server, ServerConfig, ShutdownConfig};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method},
};

pub const ADMIN_SECRET: &str = "test-admin-secret";
pub const ADDRESS: &str = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045";
pub const TOKEN: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
pub const TX_HASH: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

/// API server backed by a mock indexer
pub struct TestApi {
    pub indexer: MockServer,
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: CancellationToken,
}

impl TestApi {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start with `configure` applied to the testing configuration
    pub async fn start_with(configure: impl FnOnce(&mut ServerConfig)) -> Self {
        let indexer = MockServer::start().await;
        let mut config = ServerConfig::for_testing()
            .with_indexer_url(&format!("{}/v1/graphql", indexer.uri()))
            .expect("mock indexer url is valid");
        configure(&mut config);
        let (addr, shutdown) = Server::new(config, ShutdownConfig::default())
            .expect("Failed to create server")
            .run_for_testing()
            .await
            .expect("Failed to start test server");

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to build client");

        Self {
            indexer,
            addr,
            client,
            shutdown,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Status and JSON body of a GET
    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = self.get(path).await;
        let status = response.status().as_u16();
        let body = response.json().await.expect("body is JSON");
        (status, body)
    }

    /// Answer `operation` with `data`
    pub async fn mount_data(&self, operation: &str, data: Value) {
        Mock::given(method("POST"))
            .and(header("x-hasura-admin-secret", ADMIN_SECRET))
            .and(body_partial_json(json!({ "operationName": operation })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
            .mount(&self.indexer)
            .await;
    }

    /// Answer `operation` with `data`, only for matching variables
    pub async fn mount_data_for(&self, operation: &str, variables: Value, data: Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(
                json!({ "operationName": operation, "variables": variables }),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
            .expect(1)
            .mount(&self.indexer)
            .await;
    }

    /// Answer `operation` with `data` after `delay`
    pub async fn mount_delayed(&self, operation: &str, data: Value, delay: Duration) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "operationName": operation })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": data }))
                    .set_delay(delay),
            )
            .mount(&self.indexer)
            .await;
    }

    /// Answer `operation` with a GraphQL error
    pub async fn mount_errors(&self, operation: &str, message: &str) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "operationName": operation })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "errors": [{ "message": message }] })),
            )
            .mount(&self.indexer)
            .await;
    }

    /// Answer every request with an HTTP failure
    pub async fn mount_status(&self, status: u16) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream unavailable"))
            .mount(&self.indexer)
            .await;
    }

    /// Number of requests the mock indexer received
    pub async fn indexer_requests(&self) -> usize {
        self.indexer
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }
}

impl Drop for TestApi {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

pub fn chains_indexed_state() -> Value {
    json!({
        "chains_indexed_state": [
            { "chain": "mainnet", "indexed_blocks_amount": "17000000" },
            { "chain": "avalanche", "indexed_blocks_amount": 31000000 },
            { "chain": "polygon", "indexed_blocks_amount": 52000000 }
        ]
    })
}

pub fn transaction(chain: &str, log_indexes: &[u64]) -> Value {
    let transfers: Vec<Value> = log_indexes
        .iter()
        .map(|log_index| {
            json!({
                "token": TOKEN,
                "from_address": ADDRESS,
                "to_address": "0x28c6c06298d514db089934071355e5743bf21d60",
                "log_index": log_index,
                "value": "2500000",
                "token_details": { "decimals": 6, "name": "USD Coin", "symbol": "USDC" }
            })
        })
        .collect();

    json!({
        "chain": chain,
        "block_number": 17000000,
        "timestamp": "1681338000",
        "hash": TX_HASH,
        "from_address": ADDRESS,
        "to_address": TOKEN,
        "gas": "65000",
        "gas_price": "30000000000",
        "value": "0",
        "method_name": { "name": "transfer" },
        "receipts": { "status": "1" },
        "contract_interacted": {
            "contract": TOKEN,
            "chain": chain,
            "adapter": { "adapter_id": "circle" }
        },
        "token_transfers_aggregate": { "nodes": transfers }
    })
}

pub fn transaction_history(count: u64) -> Value {
    json!({
        "transactions": [transaction("mainnet", &[3, 1]), transaction("avalanche", &[])],
        "transactions_aggregate": { "aggregate": { "count": count } }
    })
}

pub fn token_holders(count: u64) -> Value {
    json!({
        "erc20_balances": [
            { "address": "0x28c6c06298d514db089934071355e5743bf21d60", "balance": "900000000" },
            { "address": ADDRESS, "balance": "100000000" }
        ],
        "erc20_balances_aggregate": {
            "aggregate": { "count": count, "sum": { "balance": 1000000000 } }
        }
    })
}

pub fn block() -> Value {
    json!({
        "chain": "mainnet",
        "number": "17000000",
        "block_hash": "0x2c9b5c7b5b8a2f9c7f3b0d1f5d0b4e8e7a0c0b1d2e3f405162738495a6b7c8d9",
        "parent_hash": "0x1c9b5c7b5b8a2f9c7f3b0d1f5d0b4e8e7a0c0b1d2e3f405162738495a6b7c8d9",
        "miner": "0x95222290dd7278aa3ddd389cc1e1d165cc4bafe5",
        "base_fee_per_gas": "25000000000",
        "gas_limit": "30000000",
        "gas_used": "12000000",
        "difficulty": "0",
        "total_difficulty": "58750003716598352816469",
        "extra_data": "0x6265617665726275696c642e6f7267",
        "logs_bloom": "0x00",
        "mix_hash": "0x3d5b",
        "nonce": "0x0000000000000000",
        "receipts_root": "0x4e",
        "sha3_uncles": "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347",
        "state_root": "0x5f",
        "timestamp": "1681338000",
        "size": 65432,
        "transactions": 2,
        "uncles": [],
        "transactions_data_aggregate": {
            "nodes": [{ "hash": TX_HASH }, { "hash": "0x01" }]
        }
    })
}

pub fn contract(chain: &str, abi: Option<&str>) -> Value {
    json!({
        "block": 6082465,
        "chain": chain,
        "contract": TOKEN,
        "creator": "0x95ba4cf87d6723ad9c0db21737d862be80e93911",
        "hash": "0xe7e0fe390354509cd08c9a0168536938600ddc552b3f7cb96030ebef62e75895",
        "abi": abi.map(|abi| json!({ "abi": abi })),
        "adapter": { "adapter_id": "circle" }
    })
}
