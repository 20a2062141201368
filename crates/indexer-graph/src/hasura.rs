// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Hasura transport
//!
//! This module provides the [`IndexerClient`] implementation that talks to the
//! indexer's Hasura GraphQL endpoint. Each query is one POST carrying
//! `{query, operationName, variables}` and the admin secret header; the
//! response envelope is checked for HTTP failures and GraphQL `errors` before
//! `data` is decoded into the caller's type.

use std::{fmt, time::Duration};

use indexer_client::{GraphQuery, GraphResponse, HealthStatus, IndexerClient, IndexerError};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::time::{Instant, timeout};
use tracing::{debug, info, warn};
use url::Url;

use crate::{non_empty_string::NonEmptyString, queries};

/// Default outbound request timeout
pub const DEFAULT_HASURA_TIMEOUT_SECONDS: u64 = 30;
/// Default health check timeout
pub const DEFAULT_HASURA_HEALTH_CHECK_TIMEOUT_SECONDS: u64 = 5;
/// Header carrying the admin credential
pub const ADMIN_SECRET_HEADER: &str = "x-hasura-admin-secret";

/// Configuration for the Hasura client
/// This type is always valid by construction.
#[derive(Clone)]
pub struct HasuraConfig {
    /// GraphQL endpoint, e.g. `https://indexer.example.com/v1/graphql`
    pub endpoint: Url,
    /// Value of the `x-hasura-admin-secret` header
    pub admin_secret: NonEmptyString,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Health check timeout in seconds
    pub health_check_timeout_seconds: u64,
}

impl fmt::Debug for HasuraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HasuraConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("admin_secret", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .field(
                "health_check_timeout_seconds",
                &self.health_check_timeout_seconds,
            )
            .finish()
    }
}

impl HasuraConfig {
    /// Create a new `HasuraConfig` with validation
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute `http(s)` URL, the
    /// secret is blank or a timeout is zero
    pub fn new(
        endpoint: &str,
        admin_secret: impl Into<String>,
        timeout_seconds: u64,
        health_check_timeout_seconds: u64,
    ) -> Result<Self, HasuraError> {
        let endpoint = parse_endpoint(endpoint)?;
        let admin_secret = NonEmptyString::new(admin_secret)
            .map_err(|e| HasuraError::Config(format!("admin secret: {e}")))?;
        if timeout_seconds == 0 || health_check_timeout_seconds == 0 {
            return Err(HasuraError::Config(
                "timeouts must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            endpoint,
            admin_secret,
            timeout_seconds,
            health_check_timeout_seconds,
        })
    }

    /// Create default configuration for testing
    #[allow(clippy::missing_panics_doc)]
    pub fn default_test() -> Self {
        Self::new(
            "http://localhost:8080/v1/graphql",
            "test-admin-secret",
            DEFAULT_HASURA_TIMEOUT_SECONDS,
            DEFAULT_HASURA_HEALTH_CHECK_TIMEOUT_SECONDS,
        )
        .expect("test configuration is valid")
    }
}

/// Parse and check an indexer endpoint URL
///
/// # Errors
///
/// Returns an error if the URL does not parse or is not `http`/`https`
pub fn parse_endpoint(endpoint: &str) -> Result<Url, HasuraError> {
    let url = Url::parse(endpoint)
        .map_err(|e| HasuraError::Config(format!("invalid indexer URL {endpoint:?}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(HasuraError::Config(format!(
            "unsupported indexer URL scheme {scheme:?}"
        ))),
    }
}

/// Hasura client implementation
#[derive(Debug, Clone)]
pub struct HasuraClient {
    client: Client,
    config: HasuraConfig,
}

/// Errors specific to the Hasura client
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum HasuraError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Indexer returned a non-success status
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Admin secret rejected
    #[error("Authentication failed with status {status}")]
    Unauthorized { status: u16 },

    /// GraphQL engine reported errors
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// Envelope carried neither `data` nor `errors`
    #[error("response has no data")]
    MissingData,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Timeout error
    #[error("Request timeout")]
    Timeout { seconds: u64 },
}

impl From<HasuraError> for IndexerError {
    fn from(value: HasuraError) -> Self {
        match value {
            HasuraError::Http(error) => IndexerError::Http {
                message: error.to_string(),
            },
            HasuraError::Json(error) => IndexerError::InvalidResponse {
                message: error.to_string(),
            },
            HasuraError::ApiError { status, message } => {
                IndexerError::Upstream { status, message }
            }
            HasuraError::Unauthorized { .. } => IndexerError::Authentication {
                message: value.to_string(),
            },
            HasuraError::GraphQl(messages) => IndexerError::GraphQl { messages },
            HasuraError::MissingData => IndexerError::InvalidResponse {
                message: value.to_string(),
            },
            HasuraError::Config(message) => IndexerError::Configuration { message },
            HasuraError::Timeout { seconds } => IndexerError::Timeout {
                timeout_seconds: seconds,
            },
        }
    }
}

impl HasuraClient {
    /// Create a new Hasura client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: HasuraConfig) -> Result<Self, HasuraError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("evm-indexer-api/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(HasuraError::Http)?;

        Ok(Self { client, config })
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &HasuraConfig {
        &self.config
    }

    /// POST a query and unwrap its envelope
    async fn post<T>(&self, query: &GraphQuery, timeout_seconds: u64) -> Result<T, HasuraError>
    where
        T: DeserializeOwned,
    {
        debug!(
            operation = query.operation_name,
            variables = %query.variables,
            "executing indexer query"
        );

        let request = self
            .client
            .post(self.config.endpoint.clone())
            .header(ADMIN_SECRET_HEADER, self.config.admin_secret.as_str())
            .json(query);

        let response = timeout(Duration::from_secs(timeout_seconds), request.send())
            .await
            .map_err(|_| HasuraError::Timeout {
                seconds: timeout_seconds,
            })?
            .map_err(|error| {
                if error.is_timeout() {
                    HasuraError::Timeout {
                        seconds: timeout_seconds,
                    }
                } else {
                    HasuraError::Http(error)
                }
            })?;

        match response.status() {
            status if status.is_success() => {
                let body = response.bytes().await.map_err(HasuraError::Http)?;
                let envelope: GraphResponse<serde_json::Value> = serde_json::from_slice(&body)?;
                decode_envelope(envelope)
            }
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                Err(HasuraError::Unauthorized {
                    status: status.as_u16(),
                })
            }
            status => {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                warn!(
                    status = status.as_u16(),
                    error = error_text,
                    operation = query.operation_name,
                    "indexer returned an error status"
                );
                Err(HasuraError::ApiError {
                    status: status.as_u16(),
                    message: error_text,
                })
            }
        }
    }
}

/// Turn a GraphQL envelope into its payload
///
/// A non-empty `errors` array wins over any partial `data`.
fn decode_envelope<T>(envelope: GraphResponse<serde_json::Value>) -> Result<T, HasuraError>
where
    T: DeserializeOwned,
{
    if let Some(errors) = envelope.errors
        && !errors.is_empty()
    {
        return Err(HasuraError::GraphQl(
            errors.into_iter().map(|error| error.message).collect(),
        ));
    }

    match envelope.data {
        Some(serde_json::Value::Null) | None => Err(HasuraError::MissingData),
        Some(data) => Ok(serde_json::from_value(data)?),
    }
}

impl IndexerClient for HasuraClient {
    async fn health_check(&self) -> Result<HealthStatus, IndexerError> {
        let query = queries::health_check();
        let start_time = Instant::now();

        match self
            .post::<serde_json::Value>(&query, self.config.health_check_timeout_seconds)
            .await
        {
            Ok(_) => {
                info!("indexer health check passed in {:?}", start_time.elapsed());
                Ok(HealthStatus::Up)
            }
            Err(HasuraError::Unauthorized { status }) => {
                warn!(status, "indexer health check failed: unauthorized");
                Ok(HealthStatus::Down {
                    reason: "Authentication failed".to_string(),
                })
            }
            Err(HasuraError::ApiError { status, .. }) => {
                warn!(status, "indexer health check failed");
                Ok(HealthStatus::Degraded {
                    reason: format!("API returned status {status}"),
                })
            }
            Err(
                error @ (HasuraError::GraphQl(_) | HasuraError::Json(_) | HasuraError::MissingData),
            ) => {
                warn!(%error, "indexer health check returned an unexpected body");
                Ok(HealthStatus::Degraded {
                    reason: error.to_string(),
                })
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn execute<T>(&self, query: &GraphQuery) -> Result<T, IndexerError>
    where
        T: DeserializeOwned + Send,
    {
        self.post(query, self.config.timeout_seconds)
            .await
            .map_err(|error| {
                warn!(
                    operation = query.operation_name,
                    %error,
                    "indexer query failed"
                );
                error.into()
            })
    }
}
