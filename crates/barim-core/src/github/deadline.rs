// SPDX-License-Identifier: Apache-2.0

//! Per-call deadline for tracker operations.
//!
//! [`DeadlineTracker`] bounds every call with `tokio::time::timeout` and
//! reports expiry as [`BarimError::Timeout`].

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::IssueTracker;
use crate::Result;
use crate::error::BarimError;
use crate::models::{Comment, Issue, IssueUpdate, Label, NewLabel, NewRepository, Repository};
use crate::paginate::PageRequest;

/// Runs `call`, failing with [`BarimError::Timeout`] once `limit` elapses.
pub async fn with_deadline<T, Fut>(operation: &'static str, limit: Duration, call: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    if let Ok(result) = tokio::time::timeout(limit, call).await {
        result
    } else {
        warn!(operation, timeout_secs = limit.as_secs(), "GitHub call timed out");
        Err(BarimError::Timeout {
            operation,
            seconds: limit.as_secs(),
        })
    }
}

/// Decorates a tracker so that every call is deadline-bounded.
pub struct DeadlineTracker<T> {
    inner: T,
    limit: Duration,
}

impl<T> DeadlineTracker<T> {
    /// Wraps `inner` with a per-call deadline of `limit`.
    pub fn new(inner: T, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl<T: IssueTracker> IssueTracker for DeadlineTracker<T> {
    async fn authenticated_login(&self) -> Result<String> {
        with_deadline("authenticated_login", self.limit, self.inner.authenticated_login()).await
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository> {
        with_deadline("get_repository", self.limit, self.inner.get_repository(owner, repo)).await
    }

    async fn create_repository(&self, new_repo: &NewRepository) -> Result<Repository> {
        with_deadline("create_repository", self.limit, self.inner.create_repository(new_repo)).await
    }

    async fn list_owned_repositories(&self, page: PageRequest) -> Result<Vec<Repository>> {
        with_deadline(
            "list_owned_repositories",
            self.limit,
            self.inner.list_owned_repositories(page),
        )
        .await
    }

    async fn list_labels(&self, owner: &str, repo: &str, page: PageRequest) -> Result<Vec<Label>> {
        with_deadline("list_labels", self.limit, self.inner.list_labels(owner, repo, page)).await
    }

    async fn create_label(&self, owner: &str, repo: &str, label: &NewLabel) -> Result<Label> {
        with_deadline("create_label", self.limit, self.inner.create_label(owner, repo, label)).await
    }

    async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        label: &str,
        page: PageRequest,
    ) -> Result<Vec<Issue>> {
        with_deadline(
            "list_issues",
            self.limit,
            self.inner.list_issues(owner, repo, label, page),
        )
        .await
    }

    async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        update: &IssueUpdate,
    ) -> Result<Issue> {
        with_deadline(
            "update_issue",
            self.limit,
            self.inner.update_issue(owner, repo, number, update),
        )
        .await
    }

    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<Comment> {
        with_deadline(
            "create_comment",
            self.limit,
            self.inner.create_comment(owner, repo, number, body),
        )
        .await
    }
}
