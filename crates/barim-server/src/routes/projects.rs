// SPDX-License-Identifier: Apache-2.0

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use barim_core::{ProjectService, validate_project_name};
use serde::Deserialize;
use serde_json::{Value, json};

use super::bad_body;
use crate::auth::{AUTH_SOURCE, BearerToken};
use crate::error::ApiError;
use crate::AppState;

const LIST_FAILED: &str = "Error fetching project labels";
const CREATE_FAILED: &str = "Error creating project";

#[derive(Debug, Deserialize)]
pub(super) struct CreateProjectRequest {
    #[serde(default, alias = "projectName")]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

pub(super) async fn list_projects(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<Value>, ApiError> {
    let tracker = state.tracker(&token, LIST_FAILED)?;
    let listing = ProjectService::new(tracker, &state.config)
        .list_projects()
        .await
        .map_err(|e| ApiError::from_core(e, LIST_FAILED))?;

    let store = state.store_name();
    Ok(Json(json!({
        "projects": listing.projects,
        "meta": {
            "authSource": AUTH_SOURCE,
            "totalCount": listing.projects.len(),
            "physicalRepo": store,
            "owner": listing.owner,
            "note": format!("Projects are based on 'project:xxx' labels from {store} repository"),
            "failedLabels": listing.failed_labels,
        }
    })))
}

pub(super) async fn create_project(
    State(state): State<AppState>,
    token: BearerToken,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(request) = payload.map_err(|e| bad_body(&e))?;
    let name = validate_project_name(request.name.as_deref().unwrap_or_default())
        .map_err(|e| ApiError::from_core(e, CREATE_FAILED))?;

    let tracker = state.tracker(&token, CREATE_FAILED)?;
    let service = ProjectService::new(tracker, &state.config);

    let owner = service
        .resolve_owner()
        .await
        .map_err(|e| ApiError::from_core(e, CREATE_FAILED))?;
    let project = service
        .create_project(&owner, name, request.description.as_deref())
        .await
        .map_err(|e| ApiError::from_core(e, CREATE_FAILED))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "project": project,
            "meta": {
                "authSource": AUTH_SOURCE,
                "createdBy": owner,
                "physicalRepo": state.store_name(),
            }
        })),
    ))
}
