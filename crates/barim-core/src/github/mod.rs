// SPDX-License-Identifier: Apache-2.0

//! Issue-tracker capability.
//!
//! Everything Barim needs from GitHub goes through [`IssueTracker`], a
//! capability bound to one authenticated principal. The production
//! implementation wraps octocrab; tests use the in-memory tracker from
//! [`crate::testing`].

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::Result;
use crate::models::{Comment, Issue, IssueUpdate, Label, NewLabel, NewRepository, Repository};
use crate::paginate::PageRequest;

pub mod client;
pub mod deadline;

pub use client::{GitHubConnector, GitHubTracker};
pub use deadline::DeadlineTracker;

/// Operations consumed from the upstream issue-tracking service.
///
/// Implementations map upstream failures onto [`crate::BarimError`]; in
/// particular an absent resource must surface as `NotFound` and a create
/// that collides with an existing resource as `Conflict`.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Login of the principal the credential belongs to.
    async fn authenticated_login(&self) -> Result<String>;

    /// Reads a repository by owner and name.
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository>;

    /// Creates a repository under the authenticated account.
    async fn create_repository(&self, new_repo: &NewRepository) -> Result<Repository>;

    /// Lists repositories owned by the principal, most recently updated first.
    async fn list_owned_repositories(&self, page: PageRequest) -> Result<Vec<Repository>>;

    /// Lists one page of labels on a repository.
    async fn list_labels(&self, owner: &str, repo: &str, page: PageRequest) -> Result<Vec<Label>>;

    /// Creates a label.
    async fn create_label(&self, owner: &str, repo: &str, label: &NewLabel) -> Result<Label>;

    /// Lists one page of issues carrying `label`, in any state.
    async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        label: &str,
        page: PageRequest,
    ) -> Result<Vec<Issue>>;

    /// Applies a typed partial update to an issue.
    async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        update: &IssueUpdate,
    ) -> Result<Issue>;

    /// Adds a comment to an issue.
    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<Comment>;
}

/// Turns a forwarded bearer credential into a tracker capability.
pub trait TrackerConnector: Send + Sync {
    /// Builds a tracker bound to the principal owning `token`.
    fn connect(&self, token: &SecretString) -> Result<Arc<dyn IssueTracker>>;
}
