// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Query builders for the indexer schema
//!
//! Every builder is a pure function returning a [`GraphQuery`]. Documents are
//! `'static` text declaring GraphQL variables; arguments are placed in the
//! variables map, where JSON encoding is the only escaping they need.

use indexer_client::GraphQuery;
use serde_json::{Value, json};
use shared_types::{ChainName, HexString};

/// Selection set shared by the history and single transaction lookups
macro_rules! transaction_fields {
    () => {
        r"
    chain
    block_number
    timestamp
    hash
    from_address
    to_address
    gas
    gas_price
    value
    method_name {
      name
    }
    receipts {
      status
    }
    contract_interacted {
      contract
      chain
      adapter {
        adapter_id
      }
    }
    token_transfers_aggregate(order_by: { log_index: asc }) {
      nodes {
        token
        from_address
        to_address
        log_index
        value
        token_details {
          decimals
          name
          symbol
        }
      }
    }"
    };
}

macro_rules! block_fields {
    () => {
        r"
    chain
    number
    block_hash
    parent_hash
    miner
    base_fee_per_gas
    gas_limit
    gas_used
    difficulty
    total_difficulty
    extra_data
    logs_bloom
    mix_hash
    nonce
    receipts_root
    sha3_uncles
    state_root
    timestamp
    size
    transactions
    uncles
    transactions_data_aggregate {
      nodes {
        hash
      }
    }"
    };
}

macro_rules! contract_fields {
    () => {
        r"
    block
    chain
    contract
    creator
    hash
    abi {
      abi
    }
    adapter {
      adapter_id
    }"
    };
}

const HEALTH_CHECK: &str = "query healthCheck { __typename }";

const CHAINS_INDEXED_STATE: &str = r"query getChainsIndexedState {
  chains_indexed_state(order_by: { chain: asc }) {
    chain
    indexed_blocks_amount
  }
}";

const TRANSACTION_HISTORY: &str = concat!(
    r"query getTransactionHistory($where: transactions_bool_exp!, $limit: Int!, $offset: Int!) {
  transactions(where: $where, limit: $limit, offset: $offset, order_by: { timestamp: desc }) {",
    transaction_fields!(),
    r"
  }
  transactions_aggregate(where: $where) {
    aggregate {
      count
    }
  }
}"
);

const CONTRACTS_INTERACTED: &str = r"query getContractsInteracted($address: String!) {
  transactions(
    where: { from_address: { _eq: $address }, contract_interacted: { contract: { _is_null: false } } }
    distinct_on: to_address
  ) {
    contract_interacted {
      contract
      chain
      adapter {
        adapter_id
      }
    }
  }
}";

const TOKENS_INTERACTED: &str = r"query getTokensInteracted($address: String!) {
  erc20_transfers(
    distinct_on: token
    where: { _or: [{ from_address: { _eq: $address } }, { to_address: { _eq: $address } }] }
  ) {
    token
    chain
    token_details {
      address
      chain
      decimals
      name
      symbol
    }
  }
}";

const TOKENS_BALANCES: &str = r"query getTokensBalances($address: String!) {
  erc20_balances(where: { address: { _eq: $address } }) {
    balance
    chain
    token
    token_details {
      name
      symbol
      decimals
    }
  }
}";

const TOKEN_HOLDERS: &str = r#"query getTokenHolders($token: String!, $chain: String!, $limit: Int!, $offset: Int!) {
  erc20_balances(
    where: { token: { _eq: $token }, chain: { _eq: $chain } }
    limit: $limit
    offset: $offset
    order_by: { balance: desc }
  ) {
    address
    balance
  }
  erc20_balances_aggregate(
    where: { token: { _eq: $token }, chain: { _eq: $chain }, balance: { _gt: "0" } }
  ) {
    aggregate {
      count
      sum {
        balance
      }
    }
  }
}"#;

const BLOCK_BY_NUMBER: &str = concat!(
    r"query getBlockByNumber($chain: String!, $number: numeric!) {
  blocks(where: { chain: { _eq: $chain }, number: { _eq: $number } }) {",
    block_fields!(),
    r"
  }
}"
);

const BLOCK_BY_HASH: &str = concat!(
    r"query getBlockByHash($chain: String!, $hash: String!) {
  blocks(where: { chain: { _eq: $chain }, block_hash: { _eq: $hash } }) {",
    block_fields!(),
    r"
  }
}"
);

const CONTRACTS: &str = concat!(
    r"query getContracts($contract: String!) {
  contracts(where: { contract: { _eq: $contract } }) {",
    contract_fields!(),
    r"
  }
}"
);

const CONTRACT_FOR_CHAIN: &str = concat!(
    r"query getContractForChain($chain: String!, $contract: String!) {
  contracts(where: { chain: { _eq: $chain }, contract: { _eq: $contract } }) {",
    contract_fields!(),
    r"
  }
}"
);

const TRANSACTION: &str = concat!(
    r"query getTransaction($chain: String!, $hash: String!) {
  transactions(where: { chain: { _eq: $chain }, hash: { _eq: $hash } }) {",
    transaction_fields!(),
    r"
  }
}"
);

/// Optional narrowing of an address history
///
/// Chains and protocols are alternatives: a transaction is kept when it is on
/// any listed chain *or* called a contract of any listed protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilters {
    /// Chains to include
    pub chains: Vec<ChainName>,
    /// Protocol adapter ids to include
    pub protocols: Vec<String>,
}

impl HistoryFilters {
    /// Whether no filter was requested
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty() && self.protocols.is_empty()
    }
}

/// Minimal query used to check indexer availability
pub fn health_check() -> GraphQuery {
    GraphQuery::new("healthCheck", HEALTH_CHECK, json!({}))
}

/// Number of indexed blocks per chain
pub fn chains_indexed_state() -> GraphQuery {
    GraphQuery::new("getChainsIndexedState", CHAINS_INDEXED_STATE, json!({}))
}

/// One page of transactions sent or received by `address`, newest first,
/// together with the size of the whole filtered set
pub fn transaction_history(
    address: &HexString,
    limit: u64,
    offset: u64,
    filters: &HistoryFilters,
) -> GraphQuery {
    GraphQuery::new(
        "getTransactionHistory",
        TRANSACTION_HISTORY,
        json!({
            "where": history_where(address, filters),
            "limit": limit,
            "offset": offset,
        }),
    )
}

/// Boolean expression shared by the history rows and their aggregate
fn history_where(address: &HexString, filters: &HistoryFilters) -> Value {
    let mut clauses = vec![json!({
        "_or": [
            { "from_address": { "_eq": address.as_str() } },
            { "to_address": { "_eq": address.as_str() } },
        ]
    })];

    if !filters.is_empty() {
        let alternatives: Vec<Value> = filters
            .chains
            .iter()
            .map(|chain| json!({ "chain": { "_eq": chain.indexer_name() } }))
            .chain(filters.protocols.iter().map(|protocol| {
                json!({
                    "contract_interacted": {
                        "adapter": { "adapter_id": { "_eq": protocol } }
                    }
                })
            }))
            .collect();
        clauses.push(json!({ "_or": alternatives }));
    }

    json!({ "_and": clauses })
}

/// Distinct contracts `address` has sent transactions to
pub fn contracts_interacted(address: &HexString) -> GraphQuery {
    GraphQuery::new(
        "getContractsInteracted",
        CONTRACTS_INTERACTED,
        json!({ "address": address.as_str() }),
    )
}

/// Distinct ERC20 tokens `address` has sent or received
pub fn tokens_interacted(address: &HexString) -> GraphQuery {
    GraphQuery::new(
        "getTokensInteracted",
        TOKENS_INTERACTED,
        json!({ "address": address.as_str() }),
    )
}

/// Current ERC20 balances of `address` on every chain
pub fn token_balances(address: &HexString) -> GraphQuery {
    GraphQuery::new(
        "getTokensBalances",
        TOKENS_BALANCES,
        json!({ "address": address.as_str() }),
    )
}

/// One page of holders of `token`, largest balance first, with holder count
/// and supply over positive balances
pub fn token_holders(token: &HexString, chain: &ChainName, limit: u64, offset: u64) -> GraphQuery {
    GraphQuery::new(
        "getTokenHolders",
        TOKEN_HOLDERS,
        json!({
            "token": token.as_str(),
            "chain": chain.indexer_name(),
            "limit": limit,
            "offset": offset,
        }),
    )
}

/// Block at height `number`
///
/// The height is sent as decimal text, which Hasura accepts for `numeric`.
pub fn block_by_number(chain: &ChainName, number: u64) -> GraphQuery {
    GraphQuery::new(
        "getBlockByNumber",
        BLOCK_BY_NUMBER,
        json!({
            "chain": chain.indexer_name(),
            "number": number.to_string(),
        }),
    )
}

/// Block with hash `hash`
pub fn block_by_hash(chain: &ChainName, hash: &HexString) -> GraphQuery {
    GraphQuery::new(
        "getBlockByHash",
        BLOCK_BY_HASH,
        json!({
            "chain": chain.indexer_name(),
            "hash": hash.as_str(),
        }),
    )
}

/// Contract metadata for `contract` on every chain
pub fn contracts_by_address(contract: &HexString) -> GraphQuery {
    GraphQuery::new(
        "getContracts",
        CONTRACTS,
        json!({ "contract": contract.as_str() }),
    )
}

/// Contract metadata for `contract` on one chain
pub fn contract_for_chain(chain: &ChainName, contract: &HexString) -> GraphQuery {
    GraphQuery::new(
        "getContractForChain",
        CONTRACT_FOR_CHAIN,
        json!({
            "chain": chain.indexer_name(),
            "contract": contract.as_str(),
        }),
    )
}

/// Transaction with hash `hash`
pub fn transaction_by_hash(chain: &ChainName, hash: &HexString) -> GraphQuery {
    GraphQuery::new(
        "getTransaction",
        TRANSACTION,
        json!({
            "chain": chain.indexer_name(),
            "hash": hash.as_str(),
        }),
    )
}
