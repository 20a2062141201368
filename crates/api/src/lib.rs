// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! EVM Indexer API Server Implementation
//!
//! This crate provides the HTTP server that exposes the EVM indexer as a small,
//! read-only REST surface. Each endpoint validates its input, runs one GraphQL
//! query against the indexer and reshapes the rows into a stable JSON contract
//! wrapped in a `{success, data}` / `{success, error}` envelope.
//!
//! # Module Structure
//!
//! - [`config`]: Server configuration and environment management with hierarchical loading
//! - [`error`]: Error types and their mapping onto failure envelopes
//! - [`envelope`]: The uniform response wrapper
//! - [`state`]: Shared application state holding the indexer client
//! - [`server`]: Main server implementation, lifecycle, and coordinated shutdown
//! - [`routes`]: Route table and one handler module per resource
//! - [`extractors`]: Path and query parameter parsing and validation
//! - [`models`]: Public response types and the reshaping from indexer rows
//! - [`pagination`]: Page arithmetic shared by paginated endpoints
//! - [`middleware`]: Request spans, fault catching and the not-found fallback
//! - [`metrics`]: Prometheus counters and histograms
//! - [`docs`] / [`openapi`]: `OpenAPI` specification and Swagger UI
//!
//! # Key Features
//!
//! - **Parameterized Queries**: caller input only ever reaches the indexer as GraphQL variables
//! - **Chain Vocabulary Translation**: public chain names in, public chain names out
//! - **Graceful Shutdown**: Coordinated termination using `CancellationToken`
//! - **Fault Containment**: panics and unknown routes still produce an envelope

pub mod config;
pub mod docs;
pub mod envelope;
pub mod error;
pub mod extractors;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod pagination;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{Environment, IndexerConfig, ServerConfig};
pub use error::{ServerError, ServerResult};
pub use server::{Server, ShutdownConfig};
pub use state::{HealthCheck, ServerState};
