// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Indexer client abstractions
//!
//! This crate provides the seam between the HTTP API and the GraphQL indexer
//! that backs it.
//!
//! # Core Abstractions
//!
//! - **`IndexerClient` Trait**: executes a [`GraphQuery`] and decodes its `data` payload
//! - **Health Check System**: standardized health status reporting for the indexer
//! - **Error Handling**: [`IndexerError`] separates transport, decoding and GraphQL failures
//! - **Data Types**: the GraphQL request/response envelope and the indexer row types
//!
//! Rows are decoded strictly: a payload that does not match the expected shape
//! is an [`IndexerError::InvalidResponse`], never a half-filled value.

use serde::de::DeserializeOwned;
use thiserror::Error;

pub mod health;
pub mod types;

pub use health::*;
pub use types::*;

/// Generic trait for indexer clients
///
/// One call to [`IndexerClient::execute`] maps to exactly one request against
/// the indexer. Implementations do not retry.
pub trait IndexerClient: Send + Sync {
    /// Check the health of the indexer
    ///
    /// # Errors
    ///
    /// Returns an error if the health check request cannot be sent
    fn health_check(&self) -> impl Future<Output = Result<HealthStatus, IndexerError>> + Send;

    /// Execute a query and decode the `data` member of the response into `T`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the indexer answers with a
    /// non-success status or a GraphQL `errors` array, or the payload does not
    /// decode into `T`
    fn execute<T>(
        &self,
        query: &GraphQuery,
    ) -> impl Future<Output = Result<T, IndexerError>> + Send
    where
        T: DeserializeOwned + Send;
}

/// Errors that can occur when talking to the indexer
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum IndexerError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {message}")]
    Http { message: String },

    /// The admin credential was rejected
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The indexer answered with a non-success HTTP status
    #[error("Indexer returned status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The indexer answered with a GraphQL `errors` array
    #[error("GraphQL errors: {}", messages.join("; "))]
    GraphQl { messages: Vec<String> },

    /// The response body does not have the expected shape
    #[error("Invalid response format: {message}")]
    InvalidResponse { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Network timeout
    #[error("Request timeout after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },
}

impl IndexerError {
    /// Whether the failure is a timeout rather than an error answer
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
