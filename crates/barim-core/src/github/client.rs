// SPDX-License-Identifier: Apache-2.0

//! Octocrab-backed [`IssueTracker`].
//!
//! Uses raw REST routes with Barim's own payload types so that fields such
//! as `state_reason` are read exactly as GitHub sends them.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, instrument};

use super::{DeadlineTracker, IssueTracker, TrackerConnector};
use crate::Result;
use crate::config::GitHubConfig;
use crate::error::BarimError;
use crate::models::{
    Author, Comment, Issue, IssueUpdate, Label, NewLabel, NewRepository, Repository,
};
use crate::paginate::PageRequest;

#[derive(Serialize)]
struct PageQuery {
    per_page: u8,
    page: u32,
}

impl From<PageRequest> for PageQuery {
    fn from(req: PageRequest) -> Self {
        Self {
            per_page: req.per_page,
            page: req.page,
        }
    }
}

#[derive(Serialize)]
struct OwnedReposQuery {
    #[serde(rename = "type")]
    kind: &'static str,
    sort: &'static str,
    #[serde(flatten)]
    page: PageQuery,
}

#[derive(Serialize)]
struct IssuesQuery<'a> {
    labels: &'a str,
    state: &'static str,
    #[serde(flatten)]
    page: PageQuery,
}

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// Tracker bound to one GitHub credential.
#[derive(Clone)]
pub struct GitHubTracker {
    client: Octocrab,
}

impl GitHubTracker {
    /// Wraps an already-authenticated Octocrab client.
    #[must_use]
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client from a bearer token.
    ///
    /// The client is built without octocrab's retry layer.
    #[instrument(skip(token))]
    pub fn with_token(token: &SecretString, api_base_url: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.expose_secret().to_string());

        if let Some(base) = api_base_url {
            builder = builder.base_uri(base).map_err(|e| BarimError::Config {
                message: format!("Invalid github.api_base_url '{base}': {e}"),
            })?;
        }

        let client = builder.build().map_err(BarimError::from)?;
        debug!("Created authenticated GitHub client");
        Ok(Self { client })
    }
}

#[async_trait]
impl IssueTracker for GitHubTracker {
    async fn authenticated_login(&self) -> Result<String> {
        let user: Author = self.client.get("/user", None::<&()>).await?;
        Ok(user.login)
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository> {
        let route = format!("/repos/{owner}/{repo}");
        self.client
            .get(route, None::<&()>)
            .await
            .map_err(|e| match BarimError::from(e) {
                BarimError::NotFound { .. } => {
                    BarimError::not_found(format!("Repository '{owner}/{repo}'"))
                }
                other => other,
            })
    }

    async fn create_repository(&self, new_repo: &NewRepository) -> Result<Repository> {
        Ok(self.client.post("/user/repos", Some(new_repo)).await?)
    }

    async fn list_owned_repositories(&self, page: PageRequest) -> Result<Vec<Repository>> {
        let query = OwnedReposQuery {
            kind: "owner",
            sort: "updated",
            page: page.into(),
        };
        Ok(self.client.get("/user/repos", Some(&query)).await?)
    }

    async fn list_labels(&self, owner: &str, repo: &str, page: PageRequest) -> Result<Vec<Label>> {
        let route = format!("/repos/{owner}/{repo}/labels");
        Ok(self.client.get(route, Some(&PageQuery::from(page))).await?)
    }

    async fn create_label(&self, owner: &str, repo: &str, label: &NewLabel) -> Result<Label> {
        let route = format!("/repos/{owner}/{repo}/labels");
        Ok(self.client.post(route, Some(label)).await?)
    }

    async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        label: &str,
        page: PageRequest,
    ) -> Result<Vec<Issue>> {
        let route = format!("/repos/{owner}/{repo}/issues");
        let query = IssuesQuery {
            labels: label,
            state: "all",
            page: page.into(),
        };
        Ok(self.client.get(route, Some(&query)).await?)
    }

    async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        update: &IssueUpdate,
    ) -> Result<Issue> {
        let route = format!("/repos/{owner}/{repo}/issues/{number}");
        self.client
            .patch(route, Some(update))
            .await
            .map_err(|e| match BarimError::from(e) {
                BarimError::NotFound { .. } => {
                    BarimError::not_found(format!("Issue #{number} in '{owner}/{repo}'"))
                }
                other => other,
            })
    }

    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<Comment> {
        let route = format!("/repos/{owner}/{repo}/issues/{number}/comments");
        self.client
            .post(route, Some(&CommentBody { body }))
            .await
            .map_err(|e| match BarimError::from(e) {
                BarimError::NotFound { .. } => {
                    BarimError::not_found(format!("Issue #{number} in '{owner}/{repo}'"))
                }
                other => other,
            })
    }
}

/// Connects bearer tokens to deadline-bounded GitHub trackers.
#[derive(Debug, Clone)]
pub struct GitHubConnector {
    api_base_url: Option<String>,
    call_timeout: Duration,
}

impl GitHubConnector {
    /// Creates a connector from the GitHub section of the configuration.
    #[must_use]
    pub fn new(config: &GitHubConfig) -> Self {
        Self {
            api_base_url: config.api_base_url.clone(),
            call_timeout: config.call_timeout(),
        }
    }
}

impl TrackerConnector for GitHubConnector {
    fn connect(&self, token: &SecretString) -> Result<Arc<dyn IssueTracker>> {
        let tracker = GitHubTracker::with_token(token, self.api_base_url.as_deref())?;
        Ok(Arc::new(DeadlineTracker::new(tracker, self.call_timeout)))
    }
}
