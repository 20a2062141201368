// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server configuration module
//!
//! This module provides configuration structures and logic for the indexer API
//! server, supporting different environments and validation of configuration
//! parameters. Values that must never be wrong at runtime (port, timeouts,
//! indexer URL, admin secret) are validated newtypes, so a loaded
//! [`ServerConfig`] is always usable.

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::Path,
    time::Duration,
};

use anyhow::{Result, anyhow, ensure};
use config::{
    Config, ConfigBuilder, ConfigError, Environment as ConfigEnv, File, builder::DefaultState,
};
use indexer_graph::{HasuraConfig, NonEmptyString, parse_endpoint};
use serde::{Deserialize, Deserializer, Serialize, de};
use url::Url;

use crate::error::{ServerError, ServerResult};

/// Legacy variable naming the indexer GraphQL endpoint
pub const INDEXER_URL_ENV: &str = "HASURA_API_URL";
/// Legacy variable carrying the indexer admin secret
pub const INDEXER_SECRET_ENV: &str = "HASURA_KEY";

const DEFAULT_INDEXER_URL: &str = "http://localhost:8080/v1/graphql";

/// A validated server port that ensures the value is appropriate for the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServerPort {
    port: u16,
    environment: Environment,
}

impl ServerPort {
    /// Create a new `ServerPort`, ensuring it's valid for the given environment
    ///
    /// # Errors
    ///
    /// Returns an error if the port is 0 in non-testing environments
    pub fn new(port: u16, environment: Environment) -> Result<Self> {
        if port == 0 && environment != Environment::Testing {
            return Err(anyhow!("port cannot be 0 in non-testing environments"));
        }
        Ok(Self { port, environment })
    }

    /// Create a safe testing port (port 0)
    pub const fn testing() -> Self {
        Self {
            port: 0,
            environment: Environment::Testing,
        }
    }

    /// Get the port value
    pub fn value(&self) -> u16 {
        self.port
    }
}

impl<'de> Deserialize<'de> for ServerPort {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let port = u16::deserialize(deserializer)?;
        // Re-validated once the environment is known
        Ok(Self {
            port,
            environment: Environment::Development,
        })
    }
}

/// A validated timeout duration in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeoutSeconds(Duration);

impl TimeoutSeconds {
    /// Create a new `TimeoutSeconds`, ensuring the value is within valid bounds
    ///
    /// # Errors
    ///
    /// Returns an error if timeout is 0 or greater than 300 seconds
    pub fn new(seconds: u64) -> Result<Self> {
        ensure!(seconds != 0, "timeout must be greater than 0");
        ensure!(seconds <= 300, "timeout cannot exceed 300");
        Ok(Self(Duration::from_secs(seconds)))
    }

    /// Default for one outbound indexer query (25 seconds)
    ///
    /// Stays below the 30 second server default so a slow indexer is reported
    /// as an upstream timeout.
    pub const fn indexer_default() -> Self {
        Self(Duration::from_secs(25))
    }

    /// Default for indexer health checks (5 seconds)
    pub const fn health_check_default() -> Self {
        Self(Duration::from_secs(5))
    }

    /// Create a safe testing timeout (5 seconds)
    pub const fn testing() -> Self {
        Self(Duration::from_secs(5))
    }

    /// Indexer timeout used with [`TimeoutSeconds::testing`] (2 seconds)
    pub const fn indexer_testing() -> Self {
        Self(Duration::from_secs(2))
    }

    /// Get the timeout value
    pub fn value(&self) -> Duration {
        self.0
    }
}

impl<'de> Deserialize<'de> for TimeoutSeconds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = u64::deserialize(deserializer)?;
        Self::new(seconds).map_err(|e| de::Error::custom(e.to_string()))
    }
}

/// An absolute `http`/`https` URL of the indexer GraphQL endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexerUrl(Url);

impl IndexerUrl {
    /// Parse and validate an endpoint URL
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an absolute `http(s)` URL
    pub fn parse(value: &str) -> Result<Self> {
        parse_endpoint(value)
            .map(Self)
            .map_err(|e| anyhow!("invalid indexer url: {e}"))
    }

    /// Get the URL
    pub fn value(&self) -> &Url {
        &self.0
    }
}

impl<'de> Deserialize<'de> for IndexerUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(|e| de::Error::custom(e.to_string()))
    }
}

/// Connection settings for the indexer
#[derive(Clone, Deserialize)]
pub struct IndexerConfig {
    /// GraphQL endpoint
    pub url: IndexerUrl,
    /// Admin credential forwarded on every query
    pub admin_secret: NonEmptyString,
    /// Timeout of one outbound query
    #[serde(default = "TimeoutSeconds::indexer_default")]
    pub timeout_seconds: TimeoutSeconds,
    /// Timeout of the health check
    #[serde(default = "TimeoutSeconds::health_check_default")]
    pub health_check_timeout_seconds: TimeoutSeconds,
}

impl fmt::Debug for IndexerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexerConfig")
            .field("url", &self.url.value().as_str())
            .field("admin_secret", &"<redacted>")
            .field("timeout_seconds", &self.timeout_seconds)
            .field(
                "health_check_timeout_seconds",
                &self.health_check_timeout_seconds,
            )
            .finish()
    }
}

impl IndexerConfig {
    /// Settings for the Hasura transport
    pub fn hasura_config(&self) -> HasuraConfig {
        HasuraConfig {
            endpoint: self.url.value().clone(),
            admin_secret: self.admin_secret.clone(),
            timeout_seconds: self.timeout_seconds.value().as_secs(),
            health_check_timeout_seconds: self.health_check_timeout_seconds.value().as_secs(),
        }
    }
}

/// Environment types for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Production environment
    Production,
    /// Development environment
    Development,
    /// Testing environment
    Testing,
}

/// Server configuration for different environments
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: IpAddr,
    /// Server port (validated for environment compatibility)
    pub port: ServerPort,
    /// Request timeout in seconds (validated range: 1-300)
    pub timeout_seconds: TimeoutSeconds,
    /// Environment type
    pub environment: Environment,
    /// Indexer connection
    pub indexer: IndexerConfig,
}

impl ServerConfig {
    /// Create configuration from environment variables and optional configuration files
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if configuration is invalid or cannot be loaded.
    pub fn from_env() -> ServerResult<Self> {
        Self::load().map_err(|e| ServerError::Config {
            message: format!("failed to load configuration: {e}"),
        })
    }

    /// Load configuration using the config crate with hierarchical sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. Configuration file (config.json)
    /// 3. Environment-specific files (config.{env}.json)
    /// 4. Environment variables with `SERVER_` prefix, `__` between nested keys
    ///    (`SERVER_INDEXER__URL`)
    /// 5. `HASURA_API_URL` and `HASURA_KEY`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let env_var = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let mut config_builder = Self::defaults()?
            .add_source(File::with_name("config.json").required(false))
            .add_source(
                File::with_name(&format!("config.{}.json", env_var.to_lowercase())).required(false),
            )
            .add_source(
                ConfigEnv::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        if std::env::var("ENVIRONMENT").is_ok() {
            config_builder = config_builder.set_override("environment", env_var.to_lowercase())?;
        }
        if let Ok(url) = std::env::var(INDEXER_URL_ENV) {
            config_builder = config_builder.set_override("indexer.url", url)?;
        }
        if let Ok(secret) = std::env::var(INDEXER_SECRET_ENV) {
            config_builder = config_builder.set_override("indexer.admin_secret", secret)?;
        }

        Self::finish(config_builder.build()?)
    }

    /// Load configuration from defaults and a single file, ignoring the environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or holds invalid values.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::defaults()?
            .add_source(File::from(path.as_ref()))
            .build()?;
        Self::finish(config)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3000)?
            .set_default("timeout_seconds", 30)?
            .set_default("environment", "development")?
            .set_default("indexer.url", DEFAULT_INDEXER_URL)?
            .set_default("indexer.timeout_seconds", 25)?
            .set_default("indexer.health_check_timeout_seconds", 5)
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        let mut server_config: Self = config.try_deserialize()?;

        // Fix the ServerPort to have the correct environment context
        server_config.port = ServerPort::new(server_config.port.value(), server_config.environment)
            .map_err(|e| ConfigError::Message(format!("invalid port configuration: {e}")))?;

        server_config
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid timeout configuration: {e}")))?;

        Ok(server_config)
    }

    /// Check relations between fields that each newtype validates alone
    ///
    /// The request timeout must outlast every indexer call made inside it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request timeout is not strictly greater than
    /// the indexer query and health check timeouts.
    pub fn validate(&self) -> Result<()> {
        let request = self.timeout_seconds.value();
        ensure!(
            request > self.indexer.timeout_seconds.value(),
            "timeout_seconds ({}s) must exceed indexer.timeout_seconds ({}s)",
            request.as_secs(),
            self.indexer.timeout_seconds.value().as_secs(),
        );
        ensure!(
            request > self.indexer.health_check_timeout_seconds.value(),
            "timeout_seconds ({}s) must exceed indexer.health_check_timeout_seconds ({}s)",
            request.as_secs(),
            self.indexer.health_check_timeout_seconds.value().as_secs(),
        );
        Ok(())
    }

    /// Create configuration optimized for testing
    ///
    /// The indexer points at a local placeholder; tests swap in their mock
    /// server with [`ServerConfig::with_indexer_url`].
    #[allow(clippy::missing_panics_doc, clippy::expect_used)]
    pub fn for_testing() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: ServerPort::testing(), // let OS choose available port
            timeout_seconds: TimeoutSeconds::testing(),
            environment: Environment::Testing,
            indexer: IndexerConfig {
                url: IndexerUrl::parse(DEFAULT_INDEXER_URL).expect("default url is valid"),
                admin_secret: NonEmptyString::new("test-admin-secret")
                    .expect("test secret is not blank"),
                timeout_seconds: TimeoutSeconds::indexer_testing(),
                health_check_timeout_seconds: TimeoutSeconds::indexer_testing(),
            },
        }
    }

    /// Point the indexer connection at another endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not an absolute `http(s)` URL
    pub fn with_indexer_url(mut self, url: &str) -> Result<Self> {
        self.indexer.url = IndexerUrl::parse(url)?;
        Ok(self)
    }

    /// Get socket address for binding
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port.value())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
            Environment::Testing => write!(f, "testing"),
        }
    }
}
