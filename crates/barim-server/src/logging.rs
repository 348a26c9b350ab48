// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the Barim server.
//!
//! Uses `tracing` with `tracing-subscriber` for structured logging.
//! Log level can be controlled via the `RUST_LOG` environment variable.
//!
//! # Examples
//!
//! ```bash
//! # Default: info for barim, errors only for octocrab
//! barim-server
//!
//! # Debug output for troubleshooting pagination and label counts
//! RUST_LOG=barim_core=debug barim-server
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "barim_core=info,barim_server=info,octocrab=error";

/// Initialize the logging subsystem.
///
/// Logs go to stderr. Bearer tokens are never recorded.
pub fn init_logging() {
    let fmt_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
