// SPDX-License-Identifier: Apache-2.0

//! Conversion from barim-core errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use barim_core::BarimError;
use serde_json::json;

const INVALID_TOKEN: &str =
    "Invalid or expired GitHub token. Please check your authentication credentials.";
const FORBIDDEN: &str = "Access forbidden. Please check your GitHub token permissions.";

/// An error response with a `{"message": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Builds an error with an explicit status.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Maps a core error onto a response.
    ///
    /// Failures without a client-facing meaning become a 500 carrying
    /// `context` (e.g. "Error fetching project labels"); the underlying
    /// error is logged, not returned.
    pub fn from_core(err: BarimError, context: &str) -> Self {
        match err {
            BarimError::Unauthenticated => Self::new(StatusCode::UNAUTHORIZED, err.to_string()),
            BarimError::Unauthorized { .. } => Self::new(StatusCode::UNAUTHORIZED, INVALID_TOKEN),
            BarimError::Forbidden { .. } => Self::new(StatusCode::FORBIDDEN, FORBIDDEN),
            BarimError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            BarimError::Conflict { message } => Self::new(StatusCode::CONFLICT, message),
            BarimError::Validation { message } => Self::new(StatusCode::BAD_REQUEST, message),
            BarimError::Upstream { .. } | BarimError::Timeout { .. } | BarimError::Config { .. } => {
                tracing::error!(error = %err, transient = err.is_transient(), "{context}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, context)
            }
        }
    }

    /// Response status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}
