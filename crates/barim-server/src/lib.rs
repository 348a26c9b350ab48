// SPDX-License-Identifier: Apache-2.0

//! HTTP API exposing Barim projects backed by a GitHub repository.
//!
//! Every `/api` route requires `Authorization: Bearer <github token>`; the
//! token is forwarded to GitHub and all data lives in the caller's backing
//! repository. The server itself keeps no state between requests.

mod auth;
mod error;
pub mod logging;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use barim_core::{AppConfig, IssueTracker, TrackerConnector};
use tokio::net::TcpListener;

pub use auth::{AUTH_SOURCE, BearerToken};
pub use error::ApiError;
pub use routes::build_router;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Turns a request's bearer token into a tracker capability.
    pub connector: Arc<dyn TrackerConnector>,
}

impl AppState {
    /// Creates state from configuration and a connector.
    pub fn new(config: AppConfig, connector: Arc<dyn TrackerConnector>) -> Self {
        Self {
            config: Arc::new(config),
            connector,
        }
    }

    /// Tracker bound to the request's credential.
    pub(crate) fn tracker(
        &self,
        token: &BearerToken,
        context: &str,
    ) -> Result<Arc<dyn IssueTracker>, ApiError> {
        self.connector
            .connect(&token.0)
            .map_err(|e| ApiError::from_core(e, context))
    }

    /// Name of the backing repository.
    pub(crate) fn store_name(&self) -> &str {
        &self.config.store.repo_name
    }
}

/// Serve the API on `host:port` until Ctrl+C.
pub async fn run_http(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    tracing::info!("Starting barim server on {}:{}", host, port);

    // Handle both IPv4 and IPv6 addresses
    let addr: SocketAddr = if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
    .parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received Ctrl+C, shutting down gracefully");
        })
        .await?;

    Ok(())
}
