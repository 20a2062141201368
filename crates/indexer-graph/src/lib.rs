// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! GraphQL access to the EVM indexer
//!
//! This crate turns typed request parameters into indexer queries and executes
//! them against a Hasura endpoint.
//!
//! # Architecture
//!
//! - **Query Builder**: [`queries`] - pure functions producing parameterized [`indexer_client::GraphQuery`] values
//! - **Transport Client**: [`hasura::HasuraClient`] - one POST per query, strict decoding of the response envelope
//! - **Validation Utilities**: [`non_empty_string::NonEmptyString`] - ensures non-empty configuration values
//!
//! Query documents are static. Addresses, chain names, numbers and filter
//! values are always passed as GraphQL variables, so no caller input ever
//! becomes part of the document text.

pub mod hasura;
pub mod non_empty_string;
pub mod queries;

pub use hasura::*;
pub use non_empty_string::NonEmptyString;
pub use queries::HistoryFilters;
