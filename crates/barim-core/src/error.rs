// SPDX-License-Identifier: Apache-2.0

//! Error types for Barim.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Binaries should use `anyhow::Result` for top-level error handling.

use thiserror::Error;

/// Errors that can occur during Barim operations.
#[derive(Error, Debug)]
pub enum BarimError {
    /// No usable credential was supplied by the caller.
    #[error("Not authenticated. Please provide a valid Authorization header.")]
    Unauthenticated,

    /// GitHub rejected the credential (HTTP 401).
    #[error("GitHub rejected the credential: {message}")]
    Unauthorized {
        /// Upstream error message.
        message: String,
    },

    /// The credential lacks the required scope (HTTP 403).
    #[error("GitHub denied access: {message}")]
    Forbidden {
        /// Upstream error message.
        message: String,
    },

    /// An expected resource is absent (HTTP 404).
    #[error("{resource} not found")]
    NotFound {
        /// Human-readable description of the missing resource.
        resource: String,
    },

    /// The resource being created already exists.
    #[error("{message}")]
    Conflict {
        /// Conflict description.
        message: String,
    },

    /// Required input is missing or malformed.
    #[error("{message}")]
    Validation {
        /// Validation failure description.
        message: String,
    },

    /// Any other upstream failure (network, 5xx, unexpected status).
    #[error("GitHub API error: {message}")]
    Upstream {
        /// HTTP status code, when the failure carried one.
        status: Option<u16>,
        /// Error message.
        message: String,
    },

    /// An upstream call did not complete within the configured deadline.
    #[error("GitHub call `{operation}` timed out after {seconds}s")]
    Timeout {
        /// Name of the tracker operation that timed out.
        operation: &'static str,
        /// Deadline in seconds.
        seconds: u64,
    },

    /// Configuration file or environment error.
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },
}

impl BarimError {
    /// Shorthand for a [`BarimError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`BarimError::NotFound`].
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Returns true for an expected-absence signal.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true when the upstream refused a create because the resource exists.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns true for failures that may succeed on a later attempt.
    ///
    /// Nothing in Barim retries; this only drives classification and logging.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Upstream { status, .. } => {
                status.is_none_or(|code| matches!(code, 429 | 500 | 502 | 503 | 504))
            }
            _ => false,
        }
    }
}

/// Maps a GitHub status code and message onto the error taxonomy.
///
/// GitHub answers a duplicate repository or label create with 422. The
/// repository case says "already exists" in prose, the label case carries an
/// `already_exists` error code; both become [`BarimError::Conflict`].
#[must_use]
pub fn classify_status(status: u16, message: String) -> BarimError {
    match status {
        401 => BarimError::Unauthorized { message },
        403 => BarimError::Forbidden { message },
        404 => BarimError::NotFound { resource: message },
        409 => BarimError::Conflict { message },
        422 if reports_duplicate(&message) => BarimError::Conflict { message },
        _ => BarimError::Upstream {
            status: Some(status),
            message,
        },
    }
}

fn reports_duplicate(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("already exist") || message.contains("already_exists")
}

/// True when a GitHub validation error detail carries `code: already_exists`.
fn has_duplicate_code(details: &[serde_json::Value]) -> bool {
    details.iter().any(|detail| {
        detail.get("code").and_then(serde_json::Value::as_str) == Some("already_exists")
    })
}

impl From<octocrab::Error> for BarimError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => {
                let status = source.status_code.as_u16();
                let mut message = source.message.clone();
                let mut duplicate = false;
                if let Some(details) = source.errors.as_ref() {
                    duplicate = has_duplicate_code(details);
                    let details = serde_json::to_string(details).unwrap_or_default();
                    message = format!("{message} {details}");
                }
                if status == 422 && duplicate {
                    return BarimError::Conflict { message };
                }
                classify_status(status, message)
            }
            other => BarimError::Upstream {
                status: None,
                message: other.to_string(),
            },
        }
    }
}

impl From<config::ConfigError> for BarimError {
    fn from(err: config::ConfigError) -> Self {
        BarimError::Config {
            message: err.to_string(),
        }
    }
}
