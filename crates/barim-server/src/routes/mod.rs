// SPDX-License-Identifier: Apache-2.0

//! Route table and request-body helpers.

mod health;
mod issues;
mod projects;
mod repos;

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::routing::{get, post};

use crate::AppState;
use crate::error::ApiError;

/// Builds the API router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route("/api/repos", get(repos::list_repositories))
        .route("/api/repos/{name}", get(repos::find_repository))
        .route("/api/issues/{number}", post(issues::update_issue))
        .route("/api/issues/{number}/comments", post(issues::create_comment))
        .with_state(state)
}

/// Turns a malformed JSON body into a 400.
fn bad_body(rejection: &JsonRejection) -> ApiError {
    ApiError::new(
        StatusCode::BAD_REQUEST,
        format!("Invalid request body: {}", rejection.body_text()),
    )
}
