// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error handling module
//!
//! [`ServerError`] covers both server lifecycle failures and request failures.
//! Request failures render as a failure envelope through [`IntoResponse`], so a
//! handler only has to return `Err`.

use std::net::SocketAddr;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use indexer_client::IndexerError;
use thiserror::Error;
use tracing::{error, warn};

use crate::envelope::ApiFailure;

/// Comprehensive error types for server operations
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Network binding errors
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        /// Socket address that failed to bind
        address: SocketAddr,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server startup errors
    #[error("Server startup failed: {source}")]
    Startup {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Server shutdown errors
    #[error("Server shutdown failed: {source}")]
    Shutdown {
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Malformed request input; the message is returned verbatim
    #[error("{0}")]
    InvalidInput(String),

    /// A single-item lookup matched no rows
    #[error("{0}")]
    NotFound(String),

    /// The indexer query failed; the detail is logged, never returned
    #[error("indexer request failed")]
    Upstream(#[from] IndexerError),

    /// The handler could not shape an otherwise valid upstream answer
    #[error("{message}")]
    Internal {
        /// Error message
        message: String,
    },
}

/// Result type for server operations
pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// Shorthand for [`ServerError::InvalidInput`]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Shorthand for [`ServerError::NotFound`]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Shorthand for [`ServerError::Internal`]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status the error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::NotFound(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(source) if source.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Config { .. }
            | Self::Bind { .. }
            | Self::Startup { .. }
            | Self::Shutdown { .. }
            | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::Upstream(source) => {
                warn!(%source, status = status.as_u16(), "indexer request failed");
            }
            _ if status.is_server_error() => {
                error!(error = %self, status = status.as_u16(), "request failed");
            }
            _ => {}
        }
        ApiFailure::new(status, self.to_string()).into_response()
    }
}
