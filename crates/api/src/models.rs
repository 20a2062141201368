// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Public response types
//!
//! Indexer rows are decoded into the types of `indexer_client` at the transport
//! boundary; this module reshapes them into the public JSON contract. Chain
//! names are translated to the public vocabulary on every type that carries
//! one, and optional fields are omitted rather than rendered as `null`.

use indexer_client::{
    Erc20Balance, Holder, IndexedChainState, IndexerBlock, IndexerContract, IndexerTransaction,
    InteractionRow, TokenDetails, TokenHolders, TokenInteractionRow,
};
use serde::Serialize;
use serde_json::Value;
use serde_with::{DisplayFromStr, serde_as, skip_serializing_none};
use shared_types::public_chain_name;
use utoipa::ToSchema;

use crate::{error::ServerError, pagination::PageSummary};

fn public_chain(indexer_name: &str) -> String {
    public_chain_name(indexer_name).to_string()
}

/// Indexing progress of one chain
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChainStatus {
    /// Public chain name
    pub chain: String,
    /// Number of blocks indexed so far
    pub indexed_blocks_amount: u64,
}

impl From<IndexedChainState> for ChainStatus {
    fn from(row: IndexedChainState) -> Self {
        Self {
            chain: public_chain(&row.chain),
            indexed_blocks_amount: row.indexed_blocks_amount,
        }
    }
}

/// ERC20 transfer inside a transaction
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenTransfer {
    /// Token contract
    pub token_address: String,
    #[allow(missing_docs)]
    pub from_address: String,
    #[allow(missing_docs)]
    pub to_address: String,
    /// Raw amount, not scaled by `decimals`
    #[schema(value_type = String)]
    pub value: indexer_client::Quantity,
    #[allow(missing_docs)]
    pub name: Option<String>,
    #[allow(missing_docs)]
    pub symbol: Option<String>,
    #[allow(missing_docs)]
    pub decimals: Option<u32>,
}

impl From<indexer_client::TokenTransfer> for TokenTransfer {
    fn from(row: indexer_client::TokenTransfer) -> Self {
        let details = row.token_details.unwrap_or_default();
        Self {
            token_address: row.token,
            from_address: row.from_address,
            to_address: row.to_address,
            value: row.value,
            name: details.name,
            symbol: details.symbol,
            decimals: details.decimals,
        }
    }
}

/// A transaction with its token transfers
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Transaction {
    /// Public chain name
    pub chain: String,
    #[schema(value_type = String)]
    #[allow(missing_docs)]
    pub block_number: indexer_client::Quantity,
    /// Unix timestamp in seconds
    #[schema(value_type = String)]
    pub timestamp: indexer_client::Quantity,
    #[allow(missing_docs)]
    pub hash: String,
    #[allow(missing_docs)]
    pub from_address: String,
    /// Absent for contract creations
    pub to_address: Option<String>,
    #[schema(value_type = String)]
    #[allow(missing_docs)]
    pub gas_used: indexer_client::Quantity,
    #[schema(value_type = String)]
    #[allow(missing_docs)]
    pub gas_price: indexer_client::Quantity,
    /// Decoded name of the called method
    pub input_function_name: Option<String>,
    /// Whether the receipt status is `1`
    pub success: bool,
    /// Protocol adapter of the called contract
    pub adapter_id: Option<String>,
    /// Native value in wei
    #[schema(value_type = String)]
    pub value: indexer_client::Quantity,
    /// Transfers ordered by log index
    pub token_transfers: Vec<TokenTransfer>,
}

impl From<IndexerTransaction> for Transaction {
    fn from(row: IndexerTransaction) -> Self {
        let mut transfers = row.token_transfers_aggregate.nodes;
        transfers.sort_by_key(|transfer| transfer.log_index);

        Self {
            chain: public_chain(&row.chain),
            block_number: row.block_number,
            timestamp: row.timestamp,
            hash: row.hash,
            from_address: row.from_address,
            to_address: row.to_address,
            gas_used: row.gas,
            gas_price: row.gas_price,
            input_function_name: row.method_name.map(|method| method.name),
            success: row
                .receipts
                .and_then(|receipt| receipt.status)
                .is_some_and(|status| status.as_str() == "1"),
            adapter_id: row
                .contract_interacted
                .and_then(|contract| contract.adapter)
                .map(|adapter| adapter.adapter_id),
            value: row.value,
            token_transfers: transfers.into_iter().map(TokenTransfer::from).collect(),
        }
    }
}

/// One page of an address history
///
/// Page numbers are rendered as strings.
#[serde_as]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionHistory {
    #[allow(missing_docs)]
    pub transactions: Vec<Transaction>,
    #[serde_as(as = "DisplayFromStr")]
    #[schema(value_type = String, example = "3")]
    #[allow(missing_docs)]
    pub total_pages: u64,
    #[serde_as(as = "DisplayFromStr")]
    #[schema(value_type = String, example = "1")]
    #[allow(missing_docs)]
    pub current_page: u64,
    #[serde_as(as = "DisplayFromStr")]
    #[schema(value_type = String, example = "2")]
    #[allow(missing_docs)]
    pub next_page: u64,
}

impl TransactionHistory {
    /// Assemble a history page
    pub fn new(transactions: Vec<IndexerTransaction>, summary: PageSummary) -> Self {
        Self {
            transactions: transactions.into_iter().map(Transaction::from).collect(),
            total_pages: summary.total_pages,
            current_page: summary.current_page,
            next_page: summary.next_page,
        }
    }
}

/// A contract an address has called
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Interaction {
    #[allow(missing_docs)]
    pub contract: String,
    /// Protocol adapter of the contract
    pub adapter: Option<String>,
    /// Public chain name
    pub chain: Option<String>,
}

impl From<InteractionRow> for Interaction {
    fn from(row: InteractionRow) -> Self {
        let contract = row.contract_interacted;
        Self {
            contract: contract.contract,
            adapter: contract.adapter.map(|adapter| adapter.adapter_id),
            chain: contract.chain.as_deref().map(public_chain),
        }
    }
}

/// An ERC20 token an address has sent or received
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenInteraction {
    /// Token contract
    pub token: String,
    #[allow(missing_docs)]
    pub decimals: Option<u32>,
    #[allow(missing_docs)]
    pub symbol: Option<String>,
    #[allow(missing_docs)]
    pub name: Option<String>,
    /// Public chain name
    pub chain: Option<String>,
}

impl From<TokenInteractionRow> for TokenInteraction {
    fn from(row: TokenInteractionRow) -> Self {
        let TokenDetails {
            address,
            chain,
            decimals,
            name,
            symbol,
        } = row.token_details.unwrap_or_default();

        Self {
            token: address.unwrap_or(row.token),
            decimals,
            symbol,
            name,
            chain: chain.or(row.chain).as_deref().map(public_chain),
        }
    }
}

/// ERC20 balance of an address
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenBalance {
    /// Token contract
    pub token: String,
    /// Raw balance, not scaled by `decimals`
    #[schema(value_type = String)]
    pub balance: indexer_client::Quantity,
    /// Public chain name
    pub chain: String,
    #[allow(missing_docs)]
    pub name: Option<String>,
    #[allow(missing_docs)]
    pub decimals: Option<u32>,
    #[allow(missing_docs)]
    pub symbol: Option<String>,
}

impl From<Erc20Balance> for TokenBalance {
    fn from(row: Erc20Balance) -> Self {
        let details = row.token_details.unwrap_or_default();
        Self {
            token: row.token,
            balance: row.balance,
            chain: public_chain(&row.chain),
            name: details.name,
            decimals: details.decimals,
            symbol: details.symbol,
        }
    }
}

/// A block header with its transaction hashes
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
#[allow(missing_docs)]
pub struct Block {
    #[schema(value_type = Option<String>)]
    pub base_fee_per_gas: Option<indexer_client::Quantity>,
    pub block_hash: String,
    /// Public chain name
    pub chain: String,
    #[schema(value_type = String)]
    pub difficulty: indexer_client::Quantity,
    pub extra_data: String,
    #[schema(value_type = String)]
    pub gas_limit: indexer_client::Quantity,
    #[schema(value_type = String)]
    pub gas_used: indexer_client::Quantity,
    pub logs_bloom: Option<String>,
    pub miner: String,
    pub mix_hash: Option<String>,
    pub nonce: String,
    pub number: u64,
    pub parent_hash: String,
    pub receipts_root: String,
    pub sha3_uncles: String,
    pub size: u64,
    pub state_root: String,
    #[schema(value_type = String)]
    pub timestamp: indexer_client::Quantity,
    #[schema(value_type = Option<String>)]
    pub total_difficulty: Option<indexer_client::Quantity>,
    /// Number of transactions
    pub transactions: u64,
    pub transactions_hashes: Vec<String>,
    pub uncles: Vec<String>,
}

impl From<IndexerBlock> for Block {
    fn from(row: IndexerBlock) -> Self {
        Self {
            base_fee_per_gas: row.base_fee_per_gas,
            block_hash: row.block_hash,
            chain: public_chain(&row.chain),
            difficulty: row.difficulty,
            extra_data: row.extra_data,
            gas_limit: row.gas_limit,
            gas_used: row.gas_used,
            logs_bloom: row.logs_bloom,
            miner: row.miner,
            mix_hash: row.mix_hash,
            nonce: row.nonce,
            number: row.number,
            parent_hash: row.parent_hash,
            receipts_root: row.receipts_root,
            sha3_uncles: row.sha3_uncles,
            size: row.size,
            state_root: row.state_root,
            timestamp: row.timestamp,
            total_difficulty: row.total_difficulty,
            transactions: row.transactions,
            transactions_hashes: row
                .transactions_data_aggregate
                .nodes
                .into_iter()
                .map(|tx| tx.hash)
                .collect(),
            uncles: row.uncles,
        }
    }
}

/// Contract metadata
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Contract {
    /// Creation block
    pub block: u64,
    /// Public chain name
    pub chain: String,
    /// Contract address
    pub contract: String,
    #[allow(missing_docs)]
    pub creator: Option<String>,
    /// Creation transaction hash
    pub hash: Option<String>,
    /// Protocol adapter id
    pub protocol: Option<String>,
    /// Verified ABI
    #[schema(value_type = Option<Object>)]
    pub abi: Option<Value>,
}

impl TryFrom<IndexerContract> for Contract {
    type Error = ServerError;

    fn try_from(row: IndexerContract) -> Result<Self, Self::Error> {
        let abi = row
            .abi
            .map(|blob| serde_json::from_str::<Value>(&blob.abi))
            .transpose()
            .map_err(|_| ServerError::internal("invalid contract abi"))?;

        Ok(Self {
            block: row.block,
            chain: public_chain(&row.chain),
            contract: row.contract,
            creator: row.creator,
            hash: row.hash,
            protocol: row.adapter.map(|adapter| adapter.adapter_id),
            abi,
        })
    }
}

/// Balance of one holder
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HolderBalance {
    #[allow(missing_docs)]
    pub address: String,
    /// Raw balance, not scaled by decimals
    #[schema(value_type = String)]
    pub balance: indexer_client::Quantity,
}

impl From<Holder> for HolderBalance {
    fn from(row: Holder) -> Self {
        Self {
            address: row.address,
            balance: row.balance,
        }
    }
}

/// One page of token holders with aggregates over all holders
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenHolderPage {
    /// Holders, largest balance first
    pub balances: Vec<HolderBalance>,
    #[allow(missing_docs)]
    pub total_pages: u64,
    #[allow(missing_docs)]
    pub current_page: u64,
    #[allow(missing_docs)]
    pub next_page: u64,
    /// Holders with a positive balance
    pub total_holders: u64,
    /// Sum of positive balances as the indexer renders it
    #[schema(value_type = String)]
    pub total_supply: Value,
}

impl TokenHolderPage {
    /// Assemble a holder page
    pub fn new(payload: TokenHolders, summary: PageSummary) -> Self {
        let stats = payload.erc20_balances_aggregate.aggregate;
        Self {
            balances: payload
                .erc20_balances
                .into_iter()
                .map(HolderBalance::from)
                .collect(),
            total_pages: summary.total_pages,
            current_page: summary.current_page,
            next_page: summary.next_page,
            total_holders: stats.count,
            total_supply: stats.sum.map(|sum| sum.balance).unwrap_or_default(),
        }
    }
}
