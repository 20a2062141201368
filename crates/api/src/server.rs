// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Server implementation module
//!
//! This module provides the main server struct for the indexer API server:
//! lifecycle management, the middleware stack around the route table, and
//! coordinated graceful shutdown using `CancellationToken`.

use std::{future::IntoFuture, net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, error_handling::HandleErrorLayer, http::HeaderName};
use hyper::Request;
use indexer_graph::HasuraClient;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::{ServiceBuilder, timeout::TimeoutLayer};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info, info_span, warn};

use crate::{
    config::ServerConfig,
    error::{ServerError, ServerResult},
    middleware::{handle_layer_error, handle_panic},
    routes::create_routes,
    state::ServerState,
};

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
const DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for server shutdown behavior
#[derive(Debug, Clone)]
pub struct ShutdownConfig {
    /// How long in-flight requests may run after shutdown starts
    pub graceful_timeout: Duration,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            graceful_timeout: Duration::from_secs(DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT_SECONDS),
        }
    }
}

/// Main server struct
#[derive(Debug)]
pub struct Server {
    config: ServerConfig,
    router: Router,
    state: ServerState,
    /// Cancelled to stop accepting connections
    cancellation_token: CancellationToken,
    shutdown_config: ShutdownConfig,
}

impl Server {
    /// Create new server instance
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Config` if the indexer client cannot be built.
    pub fn new(config: ServerConfig, shutdown_config: ShutdownConfig) -> ServerResult<Self> {
        let indexer = HasuraClient::new(config.indexer.hasura_config()).map_err(|e| {
            ServerError::Config {
                message: format!("failed to create indexer client: {e}"),
            }
        })?;
        Ok(Self::with_indexer(config, shutdown_config, Arc::new(indexer)))
    }

    /// Create server around an existing indexer client
    pub fn with_indexer(
        config: ServerConfig,
        shutdown_config: ShutdownConfig,
        indexer: Arc<HasuraClient>,
    ) -> Self {
        let cancellation_token = CancellationToken::new();
        let state = ServerState::new(config.clone(), indexer, cancellation_token.child_token());
        let router = Self::create_router(state.clone());

        Self {
            config,
            router,
            state,
            cancellation_token,
            shutdown_config,
        }
    }

    /// Route table wrapped in request ids, tracing, CORS, the request timeout
    /// and panic recovery
    fn create_router(state: ServerState) -> Router {
        let timeout_duration = state.config().timeout_seconds.value();

        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
                    if let Some(request_id) = req.headers().get(REQUEST_ID_HEADER) {
                        info_span!("http_request", ?request_id, method = %req.method(), uri = %req.uri())
                    } else {
                        error!("failed to extract id from request");
                        info_span!("http_request", request_id = "unknown")
                    }
                }),
            )
            .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
            .layer(CorsLayer::permissive())
            .layer(HandleErrorLayer::new(handle_layer_error))
            .layer(TimeoutLayer::new(timeout_duration))
            .layer(CatchPanicLayer::custom(handle_panic));

        create_routes().layer(middleware).with_state(state)
    }

    async fn bind(&self) -> ServerResult<(TcpListener, SocketAddr)> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                address: addr,
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Startup { source })?;
        Ok((listener, local_addr))
    }

    /// Run the server until a shutdown signal or [`Server::shutdown`]
    ///
    /// In-flight requests get [`ShutdownConfig::graceful_timeout`] to finish.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if unable to bind to the configured address,
    /// or `ServerError::Startup` if the server fails to start.
    pub async fn run(self) -> ServerResult<()> {
        let (listener, local_addr) = self.bind().await?;

        info!(
            address = %local_addr,
            environment = %self.config.environment,
            indexer = %self.config.indexer.url.value(),
            "indexer API server starting",
        );

        tokio::spawn(Self::shutdown_signal_handler(self.cancellation_token.clone()));

        let stop = self.cancellation_token.clone();
        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { stop.cancelled().await })
            .into_future();
        tokio::pin!(serve);

        let graceful_timeout = self.shutdown_config.graceful_timeout;
        let drain_deadline = async {
            self.cancellation_token.cancelled().await;
            info!(timeout = ?graceful_timeout, "draining in-flight requests");
            tokio::time::sleep(graceful_timeout).await;
        };

        tokio::select! {
            result = &mut serve => match result {
                Ok(()) => {
                    info!("indexer API server shut down gracefully");
                    Ok(())
                }
                Err(source) => {
                    error!(error = ?source, "server error during shutdown");
                    Err(ServerError::Shutdown { source })
                }
            },
            () = drain_deadline => {
                warn!("graceful shutdown timed out, dropping remaining connections");
                Ok(())
            }
        }
    }

    /// Cancel `cancellation_token` on SIGINT or SIGTERM
    async fn shutdown_signal_handler(cancellation_token: CancellationToken) {
        let signal_received = async {
            #[cfg(unix)]
            #[allow(clippy::expect_used)]
            {
                use tokio::signal::unix::{SignalKind, signal};

                let mut sigterm =
                    signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
                let mut sigint =
                    signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

                tokio::select! {
                    _ = sigterm.recv() => "SIGTERM",
                    _ = sigint.recv() => "SIGINT",
                }
            }

            #[cfg(not(unix))]
            #[allow(clippy::expect_used)]
            {
                tokio::signal::ctrl_c()
                    .await
                    .expect("Failed to install CTRL+C signal handler");
                "CTRL+C"
            }
        };

        tokio::select! {
            signal_name = signal_received => {
                warn!(signal = signal_name, "shutdown signal received, cancelling all operations");
                cancellation_token.cancel();
            },
            () = cancellation_token.cancelled() => {}
        }
    }

    /// Returns a clone of the cancellation token for coordinated shutdown
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// Initiates graceful shutdown by cancelling the server's cancellation token
    pub fn shutdown(&self) {
        info!("programmatic shutdown requested");
        self.cancellation_token.cancel();
    }

    /// Serve in the background on the configured address
    ///
    /// Returns the bound address and a token that stops the server when
    /// cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if unable to bind to the configured address.
    pub async fn run_for_testing(self) -> ServerResult<(SocketAddr, CancellationToken)> {
        let (listener, local_addr) = self.bind().await?;

        let token = self.cancellation_token.child_token();
        let stop = token.child_token();
        tokio::spawn(async move {
            let _ = axum::serve(listener, self.router)
                .with_graceful_shutdown(async move { stop.cancelled().await })
                .await;
        });

        Ok((local_addr, token))
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get server state for testing
    pub fn state(&self) -> &ServerState {
        &self.state
    }

    /// The fully layered router, for driving requests without a socket
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Method, StatusCode, header},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Environment;

    fn server() -> Server {
        Server::new(ServerConfig::for_testing(), ShutdownConfig::default()).unwrap()
    }

    async fn send(method: Method, uri: &str) -> axum::response::Response {
        server()
            .router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn server_creation() {
        let server = server();
        assert_eq!(server.config().environment, Environment::Testing);
        assert!(!server.cancellation_token().is_cancelled());
    }

    #[tokio::test]
    async fn programmatic_shutdown() {
        let server = server();
        let state_token = server.state().cancellation_token.clone();

        server.shutdown();

        assert!(server.cancellation_token().is_cancelled());
        assert!(state_token.is_cancelled());
    }

    #[test]
    fn shutdown_config_default() {
        assert_eq!(
            ShutdownConfig::default().graceful_timeout,
            Duration::from_secs(DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT_SECONDS)
        );
    }

    #[tokio::test]
    async fn root_redirects_to_docs() {
        let response = send(Method::GET, "/").await;
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/docs");
    }

    #[tokio::test]
    async fn unknown_route_is_an_envelope() {
        let response = send(Method::GET, "/address/0xabc/unknown").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "not found");
    }

    #[tokio::test]
    async fn wrong_method_is_an_envelope() {
        let response = send(Method::POST, "/status").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(json_body(response).await["error"], "method not allowed");
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_indexer() {
        let response = send(Method::GET, "/address/not-hex/history").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "invalid address");
    }

    #[tokio::test]
    async fn docs_are_served() {
        let response = send(Method::GET, "/docs").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = send(Method::GET, "/docs/openapi.json").await;
        assert_eq!(response.status(), StatusCode::OK);
        let doc = json_body(response).await;
        assert_eq!(doc["info"]["title"], "EVM Indexer API");
    }
}
