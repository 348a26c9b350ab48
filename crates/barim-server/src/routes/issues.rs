// SPDX-License-Identifier: Apache-2.0

//! Issue edits and comments. Always target the backing repository.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use barim_core::IssueUpdate;
use serde::Deserialize;
use serde_json::{Value, json};

use super::bad_body;
use crate::auth::{AUTH_SOURCE, BearerToken};
use crate::error::ApiError;
use crate::AppState;

const UPDATE_FAILED: &str = "Error updating issue";
const COMMENT_FAILED: &str = "Error creating comment";

#[derive(Debug, Deserialize)]
pub(super) struct CommentRequest {
    #[serde(default)]
    body: Option<String>,
}

fn issue_number(path: Result<Path<u64>, PathRejection>) -> Result<u64, ApiError> {
    path.map(|Path(number)| number)
        .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "Issue number must be a positive integer"))
}

pub(super) async fn update_issue(
    State(state): State<AppState>,
    token: BearerToken,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<IssueUpdate>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let number = issue_number(path)?;
    let Json(update) = payload.map_err(|e| bad_body(&e))?;

    let tracker = state.tracker(&token, UPDATE_FAILED)?;
    let owner = tracker
        .authenticated_login()
        .await
        .map_err(|e| ApiError::from_core(e, UPDATE_FAILED))?;
    let issue =
        barim_core::update_issue(tracker.as_ref(), &owner, state.store_name(), number, &update)
            .await
            .map_err(|e| ApiError::from_core(e, UPDATE_FAILED))?;

    Ok(Json(json!({
        "issue": issue,
        "meta": {
            "authSource": AUTH_SOURCE,
            "updatedBy": owner,
            "repository": state.store_name(),
        }
    })))
}

pub(super) async fn create_comment(
    State(state): State<AppState>,
    token: BearerToken,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let number = issue_number(path)?;
    let Json(request) = payload.map_err(|e| bad_body(&e))?;
    let body = request.body.unwrap_or_default();

    let tracker = state.tracker(&token, COMMENT_FAILED)?;
    let owner = tracker
        .authenticated_login()
        .await
        .map_err(|e| ApiError::from_core(e, COMMENT_FAILED))?;
    let comment =
        barim_core::create_comment(tracker.as_ref(), &owner, state.store_name(), number, &body)
            .await
            .map_err(|e| ApiError::from_core(e, COMMENT_FAILED))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "comment": comment,
            "meta": {
                "authSource": AUTH_SOURCE,
                "createdBy": owner,
                "repository": state.store_name(),
                "issueNumber": number,
            }
        })),
    ))
}
