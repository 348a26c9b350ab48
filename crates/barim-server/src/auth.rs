// SPDX-License-Identifier: Apache-2.0

//! Bearer credential extraction.
//!
//! The caller's GitHub token arrives as `Authorization: Bearer <token>` and
//! is forwarded to GitHub unchanged. Requests without one are rejected before
//! any handler logic runs.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use barim_core::BarimError;
use secrecy::SecretString;

use crate::error::ApiError;

/// Where a request's credential came from, echoed as `meta.authSource`.
pub const AUTH_SOURCE: &str = "header";

/// The forwarded bearer token.
pub struct BearerToken(pub SecretString);

fn parse(header: Option<&str>) -> Option<SecretString> {
    let token = header?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(SecretString::from(token.to_string()))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        parse(header).map(BearerToken).ok_or_else(|| {
            tracing::debug!(path = %parts.uri.path(), "Rejected request without bearer token");
            ApiError::from_core(BarimError::Unauthenticated, "Not authenticated")
        })
    }
}
