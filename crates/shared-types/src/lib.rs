// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared types for the EVM indexer API service
//!
//! This crate provides the identifiers that cross the boundary between the
//! public API and the indexer: chain names in both vocabularies and validated
//! hexadecimal identifiers (addresses, token contracts, hashes).

pub mod chains;
pub mod hex;

pub use chains::{ChainName, ChainNameError, indexer_chain_name, public_chain_name};
pub use hex::{HexParseError, HexString, is_hex};
