// SPDX-License-Identifier: Apache-2.0

//! Issue edits and comments on the backing repository.

use tracing::{debug, instrument};

use crate::Result;
use crate::error::BarimError;
use crate::github::IssueTracker;
use crate::models::{Comment, Issue, IssueState, IssueUpdate, StateReason};

fn validate_update(update: &IssueUpdate) -> Result<()> {
    if update.is_empty() {
        return Err(BarimError::validation(
            "Update must change at least one of: title, body, state, state_reason, labels",
        ));
    }

    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(BarimError::validation("Issue title cannot be empty"));
    }

    if update.state == Some(IssueState::Open)
        && update
            .state_reason
            .is_some_and(|reason| reason != StateReason::Reopened)
    {
        return Err(BarimError::validation(
            "Only state_reason \"reopened\" is allowed when opening an issue",
        ));
    }

    Ok(())
}

/// Applies `update` to issue `number` on `owner/repo`.
///
/// # Errors
///
/// - `Validation` for an empty update, a blank title, or a closing reason
///   combined with `state = open`
/// - `NotFound` when the issue does not exist
#[instrument(skip(tracker, update))]
pub async fn update_issue(
    tracker: &dyn IssueTracker,
    owner: &str,
    repo: &str,
    number: u64,
    update: &IssueUpdate,
) -> Result<Issue> {
    validate_update(update)?;
    let issue = tracker.update_issue(owner, repo, number, update).await?;
    debug!(number, state = ?issue.state, "Updated issue");
    Ok(issue)
}

/// Adds a comment to issue `number` on `owner/repo`.
///
/// # Errors
///
/// - `Validation` for a blank body
/// - `NotFound` when the issue does not exist
#[instrument(skip(tracker, body))]
pub async fn create_comment(
    tracker: &dyn IssueTracker,
    owner: &str,
    repo: &str,
    number: u64,
    body: &str,
) -> Result<Comment> {
    if body.trim().is_empty() {
        return Err(BarimError::validation("Comment body is required"));
    }
    let comment = tracker.create_comment(owner, repo, number, body).await?;
    debug!(number, comment_id = comment.id, "Created comment");
    Ok(comment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryTracker;

    fn tracker() -> InMemoryTracker {
        InMemoryTracker::new("octocat")
            .with_repository("barim-data")
            .with_label("project:web", "ff0000", None)
            .with_issue("project:web", IssueState::Open, None)
    }

    #[tokio::test]
    async fn closes_issue_as_not_planned() {
        let tracker = tracker();
        let update = IssueUpdate {
            state: Some(IssueState::Closed),
            state_reason: Some(StateReason::NotPlanned),
            ..IssueUpdate::default()
        };

        let issue = update_issue(&tracker, "octocat", "barim-data", 1, &update)
            .await
            .unwrap();

        assert_eq!(issue.state, IssueState::Closed);
        assert_eq!(issue.state_reason.as_deref(), Some("not_planned"));
    }

    #[tokio::test]
    async fn replaces_labels_and_title() {
        let tracker = tracker();
        let update = IssueUpdate {
            title: Some("Ship landing page".to_string()),
            labels: Some(vec!["project:web".to_string(), "bug".to_string()]),
            ..IssueUpdate::default()
        };

        let issue = update_issue(&tracker, "octocat", "barim-data", 1, &update)
            .await
            .unwrap();

        assert_eq!(issue.title, "Ship landing page");
        let labels: Vec<_> = issue.labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(labels, ["project:web", "bug"]);
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let err = update_issue(&tracker(), "octocat", "barim-data", 1, &IssueUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BarimError::Validation { .. }));
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let update = IssueUpdate {
            title: Some("  ".to_string()),
            ..IssueUpdate::default()
        };
        let err = update_issue(&tracker(), "octocat", "barim-data", 1, &update)
            .await
            .unwrap_err();
        assert!(matches!(err, BarimError::Validation { .. }));
    }

    #[tokio::test]
    async fn reopening_accepts_only_reopened_reason() {
        let tracker = tracker();
        let bad = IssueUpdate {
            state: Some(IssueState::Open),
            state_reason: Some(StateReason::Completed),
            ..IssueUpdate::default()
        };
        let good = IssueUpdate {
            state: Some(IssueState::Open),
            state_reason: Some(StateReason::Reopened),
            ..IssueUpdate::default()
        };

        let err = update_issue(&tracker, "octocat", "barim-data", 1, &bad)
            .await
            .unwrap_err();
        assert!(matches!(err, BarimError::Validation { .. }));

        let issue = update_issue(&tracker, "octocat", "barim-data", 1, &good)
            .await
            .unwrap();
        assert_eq!(issue.state_reason.as_deref(), Some("reopened"));
    }

    #[tokio::test]
    async fn missing_issue_is_not_found() {
        let update = IssueUpdate {
            body: Some("details".to_string()),
            ..IssueUpdate::default()
        };
        let err = update_issue(&tracker(), "octocat", "barim-data", 99, &update)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn comments_on_issue() {
        let comment = create_comment(&tracker(), "octocat", "barim-data", 1, "Looks good")
            .await
            .unwrap();

        assert_eq!(comment.body.as_deref(), Some("Looks good"));
        assert_eq!(comment.user.unwrap().login, "octocat");
    }

    #[tokio::test]
    async fn blank_comment_is_rejected() {
        let err = create_comment(&tracker(), "octocat", "barim-data", 1, " \n ")
            .await
            .unwrap_err();
        assert!(matches!(err, BarimError::Validation { .. }));
    }
}
