// SPDX-License-Identifier: Apache-2.0

//! Binary entry point for the Barim server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use barim_core::{GitHubConnector, load_config, load_config_from};
use barim_server::{AppState, logging, run_http};
use clap::Parser;

/// Barim HTTP API server.
#[derive(Parser)]
#[command(name = "barim-server", version, about)]
struct Cli {
    /// Interface to bind (overrides `server.host`).
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides `server.port`).
    #[arg(long)]
    port: Option<u16>,

    /// Configuration file (defaults to the per-user config path).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging();

    let config = match &cli.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => load_config().context("Failed to load config")?,
    };

    let host = cli.host.unwrap_or_else(|| config.server.host.clone());
    let port = cli.port.unwrap_or(config.server.port);

    let connector = Arc::new(GitHubConnector::new(&config.github));
    run_http(AppState::new(config, connector), &host, port).await
}
