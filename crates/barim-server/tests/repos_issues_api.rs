// SPDX-License-Identifier: Apache-2.0

//! Router-level tests for `/api/repos` and `/api/issues`.

mod common;

use axum::http::StatusCode;
use barim_core::IssueState;
use barim_core::testing::InMemoryTracker;
use common::{app, get, post};

fn with_repos(count: usize) -> InMemoryTracker {
    (0..count).fold(
        InMemoryTracker::new("octocat").with_repository("barim-data"),
        |tracker, i| tracker.with_repository(&format!("repo-{i}")),
    )
}

fn with_issue() -> InMemoryTracker {
    InMemoryTracker::new("octocat")
        .with_repository("barim-data")
        .with_label("project:web", "ff0000", None)
        .with_issue("project:web", IssueState::Open, None)
}

#[tokio::test]
async fn lists_repositories_without_backing_store() {
    let tracker = with_repos(2);

    let (status, body) = get(app(&tracker), "/api/repos").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["repositories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["repo-1", "repo-0"]);
    assert_eq!(body["meta"]["totalCount"], 2);
    assert_eq!(body["meta"]["note"], "GitHub repositories (excluding barim-data)");
}

#[tokio::test]
async fn finds_repository_by_name() {
    let tracker = with_repos(3);

    let (status, body) = get(app(&tracker), "/api/repos/repo-0").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["repository"]["full_name"], "octocat/repo-0");
    assert_eq!(body["meta"]["searchedPages"], 1);
    assert_eq!(body["meta"]["totalSearchedRepos"], 4);
}

#[tokio::test]
async fn unknown_repository_is_404() {
    let tracker = with_repos(3);

    let (status, body) = get(app(&tracker), "/api/repos/missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Repository 'missing' not found");
}

#[tokio::test]
async fn repository_listing_failure_is_generic_500() {
    let tracker = InMemoryTracker::new("octocat").reject_credential(500);

    let (status, body) = get(app(&tracker), "/api/repos").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Error fetching repositories");
}

#[tokio::test]
async fn closes_issue() {
    let tracker = with_issue();

    let (status, body) = post(
        app(&tracker),
        "/api/issues/1",
        r#"{"state": "closed", "state_reason": "not_planned"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issue"]["state"], "closed");
    assert_eq!(body["issue"]["state_reason"], "not_planned");
    assert_eq!(body["meta"]["updatedBy"], "octocat");
    assert_eq!(body["meta"]["repository"], "barim-data");
    assert_eq!(tracker.issues()[0].state, IssueState::Closed);
}

#[tokio::test]
async fn unknown_update_field_is_400() {
    let tracker = with_issue();

    let (status, _) = post(
        app(&tracker),
        "/api/issues/1",
        r#"{"assignees": ["octocat"]}"#,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(tracker.issues()[0].state, IssueState::Open);
}

#[tokio::test]
async fn empty_update_is_400() {
    let tracker = with_issue();

    let (status, _) = post(app(&tracker), "/api/issues/1", "{}").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_numeric_issue_number_is_400() {
    let tracker = with_issue();

    let (status, body) = post(app(&tracker), "/api/issues/abc", r#"{"title": "x"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Issue number must be a positive integer");
}

#[tokio::test]
async fn updating_missing_issue_is_404() {
    let tracker = with_issue();

    let (status, _) = post(app(&tracker), "/api/issues/42", r#"{"title": "x"}"#).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_on_issue() {
    let tracker = with_issue();

    let (status, body) = post(
        app(&tracker),
        "/api/issues/1/comments",
        r#"{"body": "Shipped"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["comment"]["body"], "Shipped");
    assert_eq!(body["meta"]["createdBy"], "octocat");
    assert_eq!(body["meta"]["issueNumber"], 1);
}

#[tokio::test]
async fn blank_comment_is_400() {
    let tracker = with_issue();

    let (status, body) = post(app(&tracker), "/api/issues/1/comments", r#"{"body": "  "}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Comment body is required");
}
