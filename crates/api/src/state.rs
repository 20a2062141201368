// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server state management module
//!
//! This module provides shared application state for the indexer API server:
//! configuration, the indexer client and coordinated cancellation.

use std::sync::Arc;

use indexer_client::{GraphQuery, IndexerClient};
use indexer_graph::HasuraClient;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::{
    config::{Environment, ServerConfig},
    error::ServerResult,
    metrics,
};

/// Shared application state with cancellation token support
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Server configuration
    config: ServerConfig,
    /// Client for the indexer's GraphQL endpoint
    indexer: Arc<HasuraClient>,
    /// Cancellation token for coordinated shutdown
    pub cancellation_token: CancellationToken,
}

impl ServerState {
    /// Create new server state
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `indexer` - Indexer client shared by all handlers
    /// * `cancellation_token` - Token for coordinated cancellation
    pub fn new(
        config: ServerConfig,
        indexer: Arc<HasuraClient>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            indexer,
            cancellation_token,
        }
    }

    /// Server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The indexer client
    pub fn indexer(&self) -> &Arc<HasuraClient> {
        &self.indexer
    }

    /// Run one indexer query and record its duration
    pub async fn query<T>(&self, query: &GraphQuery) -> ServerResult<T>
    where
        T: DeserializeOwned + Send,
    {
        let started = Instant::now();
        let result = self.indexer.execute::<T>(query).await;
        let outcome = if result.is_ok() { "success" } else { "error" };
        metrics::observe_upstream_duration(
            query.operation_name,
            outcome,
            started.elapsed().as_secs_f64(),
        );
        Ok(result?)
    }

    /// Perform health check operations
    pub async fn health_check(&self) -> HealthCheck {
        let indexer_health = self
            .indexer
            .health_check()
            .await
            .unwrap_or_else(|e| indexer_client::HealthStatus::Down {
                reason: e.to_string(),
            });

        let status = match indexer_health.reason() {
            None => HealthStatus::Up,
            Some(reason) => HealthStatus::Degraded {
                reason: format!("indexer unavailable: {reason}").into_boxed_str(),
            },
        };
        let indexer = HealthStatus::from(indexer_health);

        HealthCheck {
            status,
            version: Box::from(env!("CARGO_PKG_VERSION")),
            environment: self.config.environment,
            timestamp: chrono::Utc::now().to_rfc3339(),
            indexer,
        }
    }
}

/// Health status of a service or dependency
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum HealthStatus {
    /// Service is fully operational and responding normally
    Up,

    /// Service is not operational or has critical failures
    Down {
        /// Human-readable explanation of why the service is down
        reason: Box<str>,
    },

    /// Service is operational but experiencing performance issues or partial failures
    Degraded {
        /// Human-readable explanation of the degradation condition
        reason: Box<str>,
    },
}

impl From<indexer_client::HealthStatus> for HealthStatus {
    fn from(status: indexer_client::HealthStatus) -> Self {
        match status {
            indexer_client::HealthStatus::Up => Self::Up,
            indexer_client::HealthStatus::Degraded { reason } => Self::Degraded {
                reason: reason.into_boxed_str(),
            },
            indexer_client::HealthStatus::Down { reason } => Self::Down {
                reason: reason.into_boxed_str(),
            },
        }
    }
}

/// Health check status
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthCheck {
    /// Service status
    pub status: HealthStatus,
    /// Service version
    #[schema(value_type = String)]
    pub version: Box<str>,
    /// Environment
    pub environment: Environment,
    /// Timestamp
    pub timestamp: String,
    /// Status of the indexer connection
    pub indexer: HealthStatus,
}

#[cfg(test)]
mod tests {
    use indexer_graph::HasuraConfig;

    use super::*;

    fn indexer() -> Arc<HasuraClient> {
        Arc::new(HasuraClient::new(HasuraConfig::default_test()).unwrap())
    }

    #[test]
    fn server_state_with_cancellation_token() {
        let token = CancellationToken::new();
        let state = ServerState::new(ServerConfig::for_testing(), indexer(), token.clone());

        assert!(!state.cancellation_token.is_cancelled());

        token.cancel();
        assert!(state.cancellation_token.is_cancelled());
    }

    #[test]
    fn health_status_conversion() {
        assert_eq!(
            HealthStatus::from(indexer_client::HealthStatus::Up),
            HealthStatus::Up
        );
        assert_eq!(
            HealthStatus::from(indexer_client::HealthStatus::Down {
                reason: "Authentication failed".to_string()
            }),
            HealthStatus::Down {
                reason: Box::from("Authentication failed")
            }
        );
    }
}
