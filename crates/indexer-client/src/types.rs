// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! GraphQL envelope and indexer row types
//!
//! Row types mirror the indexer schema one-to-one and are decoded strictly.
//! Numeric scalars are tolerant of representation only: Postgres `numeric`
//! and `bigint` columns may be served as JSON strings or JSON numbers.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

/// A GraphQL request as sent to the indexer
///
/// The document is always static text; every caller supplied value travels in
/// `variables`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQuery {
    /// Query document
    pub query: &'static str,
    /// Operation to execute within the document
    pub operation_name: &'static str,
    /// Variable values, keyed by variable name
    pub variables: serde_json::Value,
}

impl GraphQuery {
    /// Build a query with variables
    pub fn new(
        operation_name: &'static str,
        query: &'static str,
        variables: serde_json::Value,
    ) -> Self {
        Self {
            query,
            operation_name,
            variables,
        }
    }

    /// Look up a variable by name
    pub fn variable(&self, name: &str) -> Option<&serde_json::Value> {
        self.variables.get(name)
    }
}

/// GraphQL response envelope
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GraphResponse<T> {
    /// Payload, absent when the whole operation failed
    #[serde(default)]
    pub data: Option<T>,
    /// Errors reported by the GraphQL engine
    #[serde(default)]
    pub errors: Option<Vec<GraphError>>,
}

/// A single GraphQL error
#[derive(Debug, Clone, Deserialize)]
pub struct GraphError {
    /// Human readable message
    pub message: String,
}

/// A unit-less decimal quantity
///
/// Balances, gas and wei values overflow every native integer type the indexer
/// could hand us, so they are carried through as the decimal text the indexer
/// stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Quantity(String);

impl Quantity {
    /// Borrow the decimal text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Text(text) => Self(text),
            Repr::Number(number) => Self(number.to_string()),
        })
    }
}

/// `{ nodes: [...] }` wrapper used by Hasura aggregate relationships
#[derive(Debug, Clone, Deserialize)]
pub struct Nodes<T> {
    /// Rows
    pub nodes: Vec<T>,
}

impl<T> Default for Nodes<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

/// Indexing progress for one chain
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct IndexedChainState {
    /// Chain name (indexer vocabulary)
    pub chain: String,
    /// Number of blocks indexed so far
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub indexed_blocks_amount: u64,
}

/// Payload of `getChainsIndexedState`
#[derive(Debug, Clone, Deserialize)]
pub struct ChainsIndexedState {
    #[allow(missing_docs)]
    pub chains_indexed_state: Vec<IndexedChainState>,
}

/// Reference to a recognized protocol adapter
#[derive(Debug, Clone, Deserialize)]
pub struct AdapterRef {
    #[allow(missing_docs)]
    pub adapter_id: String,
}

/// The contract a transaction called
#[derive(Debug, Clone, Deserialize)]
pub struct InteractedContract {
    /// Contract address
    pub contract: String,
    /// Chain the contract lives on (indexer vocabulary)
    #[serde(default)]
    pub chain: Option<String>,
    /// Protocol adapter, if the contract belongs to one
    #[serde(default)]
    pub adapter: Option<AdapterRef>,
}

/// Decoded method signature
#[derive(Debug, Clone, Deserialize)]
pub struct MethodName {
    #[allow(missing_docs)]
    pub name: String,
}

/// Transaction receipt
#[derive(Debug, Clone, Deserialize)]
pub struct Receipt {
    /// `"1"` for success
    #[serde(default)]
    pub status: Option<Quantity>,
}

/// Token metadata known to the indexer
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenDetails {
    #[allow(missing_docs)]
    #[serde(default)]
    pub address: Option<String>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub chain: Option<String>,
    #[allow(missing_docs)]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub decimals: Option<u32>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub name: Option<String>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub symbol: Option<String>,
}

/// An ERC20 transfer emitted inside a transaction
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct TokenTransfer {
    /// Token contract
    pub token: String,
    #[allow(missing_docs)]
    pub from_address: String,
    #[allow(missing_docs)]
    pub to_address: String,
    /// Position of the log within its block
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub log_index: u64,
    /// Raw transferred amount
    pub value: Quantity,
    #[allow(missing_docs)]
    #[serde(default)]
    pub token_details: Option<TokenDetails>,
}

/// A transaction row
#[derive(Debug, Clone, Deserialize)]
pub struct IndexerTransaction {
    #[allow(missing_docs)]
    pub chain: String,
    #[allow(missing_docs)]
    pub block_number: Quantity,
    #[allow(missing_docs)]
    pub timestamp: Quantity,
    #[allow(missing_docs)]
    pub hash: String,
    #[allow(missing_docs)]
    pub from_address: String,
    /// Absent for contract creations
    #[serde(default)]
    pub to_address: Option<String>,
    /// Gas used by the transaction
    pub gas: Quantity,
    #[allow(missing_docs)]
    pub gas_price: Quantity,
    /// Native value in wei
    pub value: Quantity,
    #[allow(missing_docs)]
    #[serde(default)]
    pub method_name: Option<MethodName>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub receipts: Option<Receipt>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub contract_interacted: Option<InteractedContract>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub token_transfers_aggregate: Nodes<TokenTransfer>,
}

/// `{ aggregate: { count } }`
#[derive(Debug, Clone, Deserialize)]
pub struct CountAggregate {
    #[allow(missing_docs)]
    pub aggregate: Count,
}

/// Row count of an aggregate
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct Count {
    #[allow(missing_docs)]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub count: u64,
}

/// Payload of `getTransactionHistory`
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionHistoryPage {
    /// The requested page of transactions
    pub transactions: Vec<IndexerTransaction>,
    /// Count over the whole filtered set
    pub transactions_aggregate: CountAggregate,
}

/// Payload of `getTransaction`
#[derive(Debug, Clone, Deserialize)]
pub struct Transactions {
    #[allow(missing_docs)]
    pub transactions: Vec<IndexerTransaction>,
}

/// A transaction reduced to the contract it called
#[derive(Debug, Clone, Deserialize)]
pub struct InteractionRow {
    #[allow(missing_docs)]
    pub contract_interacted: InteractedContract,
}

/// Payload of `getContractsInteracted`
#[derive(Debug, Clone, Deserialize)]
pub struct Interactions {
    #[allow(missing_docs)]
    pub transactions: Vec<InteractionRow>,
}

/// A transfer reduced to the token it moved
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInteractionRow {
    #[allow(missing_docs)]
    pub token: String,
    #[allow(missing_docs)]
    #[serde(default)]
    pub chain: Option<String>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub token_details: Option<TokenDetails>,
}

/// Payload of `getTokensInteracted`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInteractions {
    #[allow(missing_docs)]
    pub erc20_transfers: Vec<TokenInteractionRow>,
}

/// Balance of one token held by one address
#[derive(Debug, Clone, Deserialize)]
pub struct Erc20Balance {
    #[allow(missing_docs)]
    pub token: String,
    #[allow(missing_docs)]
    pub chain: String,
    #[allow(missing_docs)]
    pub balance: Quantity,
    #[allow(missing_docs)]
    #[serde(default)]
    pub token_details: Option<TokenDetails>,
}

/// Payload of `getTokensBalances`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenBalances {
    #[allow(missing_docs)]
    pub erc20_balances: Vec<Erc20Balance>,
}

/// A holder of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holder {
    #[allow(missing_docs)]
    pub address: String,
    #[allow(missing_docs)]
    pub balance: Quantity,
}

/// Holder count and supply over non-zero balances
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceAggregate {
    #[allow(missing_docs)]
    pub aggregate: HolderStats,
}

/// Aggregate values for a token's holders
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct HolderStats {
    /// Number of holders with a positive balance
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub count: u64,
    /// Sum of balances, `null` when there are no holders
    #[serde(default)]
    pub sum: Option<BalanceSum>,
}

/// `sum { balance }`, passed through exactly as the indexer renders it
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceSum {
    #[allow(missing_docs)]
    #[serde(default)]
    pub balance: serde_json::Value,
}

/// Payload of `getTokenHolders`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenHolders {
    /// The requested page of holders
    pub erc20_balances: Vec<Holder>,
    #[allow(missing_docs)]
    pub erc20_balances_aggregate: BalanceAggregate,
}

/// Hash of a transaction included in a block
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionHash {
    #[allow(missing_docs)]
    pub hash: String,
}

/// A block row
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct IndexerBlock {
    pub chain: String,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub number: u64,
    pub block_hash: String,
    pub parent_hash: String,
    pub miner: String,
    /// Absent before London
    #[serde(default)]
    pub base_fee_per_gas: Option<Quantity>,
    pub gas_limit: Quantity,
    pub gas_used: Quantity,
    pub difficulty: Quantity,
    #[serde(default)]
    pub total_difficulty: Option<Quantity>,
    pub extra_data: String,
    #[serde(default)]
    pub logs_bloom: Option<String>,
    #[serde(default)]
    pub mix_hash: Option<String>,
    pub nonce: String,
    pub receipts_root: String,
    pub sha3_uncles: String,
    pub state_root: String,
    pub timestamp: Quantity,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub size: u64,
    /// Number of transactions in the block
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub transactions: u64,
    #[serde(default)]
    pub uncles: Vec<String>,
    #[serde(default)]
    pub transactions_data_aggregate: Nodes<TransactionHash>,
}

/// Payload of `getBlockByNumber` and `getBlockByHash`
#[derive(Debug, Clone, Deserialize)]
pub struct Blocks {
    #[allow(missing_docs)]
    pub blocks: Vec<IndexerBlock>,
}

/// Verified ABI, stored by the indexer as JSON text
#[derive(Debug, Clone, Deserialize)]
pub struct AbiBlob {
    #[allow(missing_docs)]
    pub abi: String,
}

/// A contract row
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct IndexerContract {
    /// Creation block
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub block: u64,
    #[allow(missing_docs)]
    pub chain: String,
    /// Contract address
    pub contract: String,
    #[allow(missing_docs)]
    #[serde(default)]
    pub creator: Option<String>,
    /// Creation transaction hash
    #[serde(default)]
    pub hash: Option<String>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub abi: Option<AbiBlob>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub adapter: Option<AdapterRef>,
}

/// Payload of `getContracts` and `getContractForChain`
#[derive(Debug, Clone, Deserialize)]
pub struct Contracts {
    #[allow(missing_docs)]
    pub contracts: Vec<IndexerContract>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn graph_query_uses_wire_names() {
        let query = GraphQuery::new(
            "getThing",
            "query getThing($id: String!) { thing(id: $id) { id } }",
            json!({ "id": "0xabc" }),
        );
        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(body["operationName"], "getThing");
        assert_eq!(body["variables"]["id"], "0xabc");
        assert_eq!(query.variable("id"), Some(&json!("0xabc")));
    }

    #[test]
    fn quantity_accepts_strings_and_numbers() {
        let text: Quantity = serde_json::from_value(json!("1000000000000000000000")).unwrap();
        assert_eq!(text.as_str(), "1000000000000000000000");

        let number: Quantity = serde_json::from_value(json!(21000)).unwrap();
        assert_eq!(number.as_str(), "21000");
        assert_eq!(serde_json::to_value(&number).unwrap(), json!("21000"));

        assert!(serde_json::from_value::<Quantity>(json!({ "x": 1 })).is_err());
    }

    #[test]
    fn counts_accept_strings_and_numbers() {
        let count: Count = serde_json::from_value(json!({ "count": 125 })).unwrap();
        assert_eq!(count.count, 125);
        let count: Count = serde_json::from_value(json!({ "count": "125" })).unwrap();
        assert_eq!(count.count, 125);
        assert!(serde_json::from_value::<Count>(json!({ "count": "many" })).is_err());
    }

    #[test]
    fn graph_response_with_errors_only() {
        let response: GraphResponse<Blocks> = serde_json::from_value(json!({
            "errors": [{ "message": "field 'blocks' not found", "extensions": {} }]
        }))
        .unwrap();
        assert!(response.data.is_none());
        assert_eq!(
            response.errors.unwrap()[0].message,
            "field 'blocks' not found"
        );
    }

    #[test]
    fn transaction_row_tolerates_missing_relationships() {
        let row: IndexerTransaction = serde_json::from_value(json!({
            "chain": "mainnet",
            "block_number": 17000000,
            "timestamp": "1681338000",
            "hash": "0xaa",
            "from_address": "0x01",
            "to_address": null,
            "gas": "21000",
            "gas_price": "30000000000",
            "value": "0"
        }))
        .unwrap();
        assert!(row.receipts.is_none());
        assert!(row.to_address.is_none());
        assert!(row.token_transfers_aggregate.nodes.is_empty());
        assert_eq!(row.block_number.as_str(), "17000000");
    }

    #[test]
    fn transaction_row_rejects_wrong_shape() {
        let result = serde_json::from_value::<IndexerTransaction>(json!({
            "chain": "mainnet",
            "hash": 42
        }));
        assert!(result.is_err());
    }

    #[test]
    fn holder_stats_without_holders() {
        let stats: HolderStats =
            serde_json::from_value(json!({ "count": 0, "sum": { "balance": null } })).unwrap();
        assert_eq!(stats.count, 0);
        assert!(stats.sum.unwrap().balance.is_null());
    }
}
