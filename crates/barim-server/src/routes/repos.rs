// SPDX-License-Identifier: Apache-2.0

use axum::Json;
use axum::extract::{Path, State};
use serde_json::{Value, json};

use crate::auth::{AUTH_SOURCE, BearerToken};
use crate::error::ApiError;
use crate::AppState;

const LIST_FAILED: &str = "Error fetching repositories";
const LOOKUP_FAILED: &str = "Error fetching repository";

pub(super) async fn list_repositories(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<Value>, ApiError> {
    let tracker = state.tracker(&token, LIST_FAILED)?;
    let repositories = barim_core::list_repositories(
        tracker.as_ref(),
        state.store_name(),
        state.config.pagination.repos(),
    )
    .await
    .map_err(|e| ApiError::from_core(e, LIST_FAILED))?;

    Ok(Json(json!({
        "repositories": repositories,
        "meta": {
            "authSource": AUTH_SOURCE,
            "totalCount": repositories.len(),
            "note": format!("GitHub repositories (excluding {})", state.store_name()),
        }
    })))
}

pub(super) async fn find_repository(
    State(state): State<AppState>,
    token: BearerToken,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let tracker = state.tracker(&token, LOOKUP_FAILED)?;
    let lookup =
        barim_core::find_repository(tracker.as_ref(), &name, state.config.pagination.repos())
            .await
            .map_err(|e| ApiError::from_core(e, LOOKUP_FAILED))?;

    Ok(Json(json!({
        "repository": lookup.repository,
        "meta": {
            "authSource": AUTH_SOURCE,
            "searchedPages": lookup.searched_pages,
            "totalSearchedRepos": lookup.scanned,
        }
    })))
}
