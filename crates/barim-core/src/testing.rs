// SPDX-License-Identifier: Apache-2.0

//! In-memory [`IssueTracker`] for tests.
//!
//! Simulates the subset of GitHub behavior Barim depends on: page-numbered
//! listings, 404 for absent repositories, 422-style conflicts on duplicate
//! creates, plus injectable failures and latency.
//!
//! Enabled for downstream crates with the `test-util` feature:
//!
//! ```toml
//! [dev-dependencies]
//! barim-core = { path = "../barim-core", features = ["test-util"] }
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::Result;
use crate::error::{BarimError, classify_status};
use crate::github::{IssueTracker, TrackerConnector};
use crate::models::{
    Author, Comment, Issue, IssueState, IssueUpdate, Label, NewLabel, NewRepository, Repository,
};
use crate::paginate::PageRequest;

#[derive(Default)]
struct State {
    repositories: Vec<Repository>,
    labels: Vec<Label>,
    issues: Vec<Issue>,
    comments: Vec<Comment>,
    failing_issue_labels: HashSet<String>,
    fail_label_listing: bool,
    repository_lookup_failure: Option<u16>,
    repository_create_failure: Option<u16>,
    created_elsewhere: bool,
    credential_failure: Option<u16>,
    repository_creations: usize,
    label_list_calls: usize,
    issue_pages: HashMap<String, usize>,
}

/// Shared, cloneable in-memory tracker.
#[derive(Clone)]
pub struct InMemoryTracker {
    login: String,
    latency: Option<Duration>,
    state: Arc<Mutex<State>>,
}

fn page_of<T: Clone>(items: &[T], page: PageRequest) -> Vec<T> {
    let per_page = usize::from(page.per_page);
    let start = (page.page.saturating_sub(1) as usize).saturating_mul(per_page);
    items.iter().skip(start).take(per_page).cloned().collect()
}

impl InMemoryTracker {
    /// Creates an empty tracker for the principal `login`.
    #[must_use]
    pub fn new(login: &str) -> Self {
        Self {
            login: login.to_string(),
            latency: None,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Delays every call by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Adds a repository owned by the principal.
    #[must_use]
    pub fn with_repository(self, name: &str) -> Self {
        {
            let mut state = self.state();
            let id = state.repositories.len() as u64 + 1;
            state.repositories.push(Repository {
                id,
                name: name.to_string(),
                full_name: format!("{}/{name}", self.login),
                description: None,
                private: false,
                updated_at: None,
                html_url: Some(format!("https://github.com/{}/{name}", self.login)),
            });
        }
        self
    }

    /// Adds a label to the backing repository.
    #[must_use]
    pub fn with_label(self, name: &str, color: &str, description: Option<&str>) -> Self {
        self.state().labels.push(Label {
            name: name.to_string(),
            color: color.to_string(),
            description: description.map(str::to_string),
        });
        self
    }

    /// Adds an issue carrying `label` with the given state and reason.
    #[must_use]
    pub fn with_issue(self, label: &str, state: IssueState, state_reason: Option<&str>) -> Self {
        {
            let mut guard = self.state();
            let number = guard.issues.len() as u64 + 1;
            let label = guard
                .labels
                .iter()
                .find(|l| l.name == label)
                .cloned()
                .unwrap_or_else(|| Label {
                    name: label.to_string(),
                    color: "ededed".to_string(),
                    description: None,
                });
            guard.issues.push(Issue {
                number,
                title: format!("Issue {number}"),
                body: None,
                state,
                state_reason: state_reason.map(str::to_string),
                labels: vec![label],
                html_url: None,
            });
        }
        self
    }

    /// Adds `count` open issues carrying `label`.
    #[must_use]
    pub fn with_open_issues(self, label: &str, count: usize) -> Self {
        (0..count).fold(self, |tracker, _| {
            tracker.with_issue(label, IssueState::Open, None)
        })
    }

    /// Makes issue listing fail with a 502 for `label`.
    #[must_use]
    pub fn fail_issues_for(self, label: &str) -> Self {
        self.state().failing_issue_labels.insert(label.to_string());
        self
    }

    /// Makes every label listing fail with a 502.
    #[must_use]
    pub fn fail_label_listing(self) -> Self {
        self.state().fail_label_listing = true;
        self
    }

    /// Makes repository reads fail with `status`.
    #[must_use]
    pub fn fail_repository_lookup(self, status: u16) -> Self {
        self.state().repository_lookup_failure = Some(status);
        self
    }

    /// Makes repository creation fail with `status`.
    #[must_use]
    pub fn fail_repository_create(self, status: u16) -> Self {
        self.state().repository_create_failure = Some(status);
        self
    }

    /// Simulates a concurrent first-time caller: the read sees no repository,
    /// but the create collides with one that appeared in between.
    #[must_use]
    pub fn created_elsewhere(self) -> Self {
        self.state().created_elsewhere = true;
        self
    }

    /// Makes every call fail as if GitHub rejected the credential with `status`.
    #[must_use]
    pub fn reject_credential(self, status: u16) -> Self {
        self.state().credential_failure = Some(status);
        self
    }

    /// Repositories currently stored.
    #[must_use]
    pub fn repositories(&self) -> Vec<Repository> {
        self.state().repositories.clone()
    }

    /// Labels currently stored.
    #[must_use]
    pub fn labels(&self) -> Vec<Label> {
        self.state().labels.clone()
    }

    /// Issues currently stored.
    #[must_use]
    pub fn issues(&self) -> Vec<Issue> {
        self.state().issues.clone()
    }

    /// Number of successful repository creations.
    #[must_use]
    pub fn repository_creations(&self) -> usize {
        self.state().repository_creations
    }

    /// Number of label page requests served.
    #[must_use]
    pub fn label_list_calls(&self) -> usize {
        self.state().label_list_calls
    }

    /// Number of issue page requests served for `label`.
    #[must_use]
    pub fn issue_pages_for(&self, label: &str) -> usize {
        self.state().issue_pages.get(label).copied().unwrap_or(0)
    }

    async fn enter(&self) -> Result<()> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match self.state().credential_failure {
            Some(status) => Err(classify_status(status, "Bad credentials".to_string())),
            None => Ok(()),
        }
    }

    fn bad_gateway() -> BarimError {
        BarimError::Upstream {
            status: Some(502),
            message: "Bad Gateway".to_string(),
        }
    }
}

#[async_trait]
impl IssueTracker for InMemoryTracker {
    async fn authenticated_login(&self) -> Result<String> {
        self.enter().await?;
        Ok(self.login.clone())
    }

    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository> {
        self.enter().await?;
        let state = self.state();
        if let Some(status) = state.repository_lookup_failure {
            return Err(classify_status(status, "lookup failed".to_string()));
        }
        if state.created_elsewhere {
            return Err(BarimError::not_found(format!("Repository '{owner}/{repo}'")));
        }
        let full_name = format!("{owner}/{repo}");
        state
            .repositories
            .iter()
            .find(|r| r.full_name == full_name)
            .cloned()
            .ok_or_else(|| BarimError::not_found(format!("Repository '{full_name}'")))
    }

    async fn create_repository(&self, new_repo: &NewRepository) -> Result<Repository> {
        self.enter().await?;
        let mut state = self.state();
        if let Some(status) = state.repository_create_failure {
            return Err(classify_status(status, "create failed".to_string()));
        }
        let full_name = format!("{}/{}", self.login, new_repo.name);
        if state.created_elsewhere || state.repositories.iter().any(|r| r.full_name == full_name)
        {
            return Err(classify_status(
                422,
                "Repository creation failed: name already exists on this account".to_string(),
            ));
        }
        state.repository_creations += 1;
        let repository = Repository {
            id: state.repositories.len() as u64 + 1,
            name: new_repo.name.clone(),
            full_name,
            description: Some(new_repo.description.clone()),
            private: new_repo.private,
            updated_at: None,
            html_url: None,
        };
        state.repositories.push(repository.clone());
        Ok(repository)
    }

    async fn list_owned_repositories(&self, page: PageRequest) -> Result<Vec<Repository>> {
        self.enter().await?;
        let state = self.state();
        let newest_first: Vec<Repository> = state.repositories.iter().rev().cloned().collect();
        Ok(page_of(&newest_first, page))
    }

    async fn list_labels(&self, _owner: &str, _repo: &str, page: PageRequest) -> Result<Vec<Label>> {
        self.enter().await?;
        let mut state = self.state();
        state.label_list_calls += 1;
        if state.fail_label_listing {
            return Err(Self::bad_gateway());
        }
        Ok(page_of(&state.labels, page))
    }

    async fn create_label(&self, _owner: &str, _repo: &str, label: &NewLabel) -> Result<Label> {
        self.enter().await?;
        let mut state = self.state();
        if state.labels.iter().any(|l| l.name == label.name) {
            return Err(classify_status(
                422,
                r#"Validation Failed [{"resource":"Label","code":"already_exists","field":"name"}]"#
                    .to_string(),
            ));
        }
        let created = Label {
            name: label.name.clone(),
            color: label.color.clone(),
            description: Some(label.description.clone()),
        };
        state.labels.push(created.clone());
        Ok(created)
    }

    async fn list_issues(
        &self,
        _owner: &str,
        _repo: &str,
        label: &str,
        page: PageRequest,
    ) -> Result<Vec<Issue>> {
        self.enter().await?;
        let mut state = self.state();
        *state.issue_pages.entry(label.to_string()).or_default() += 1;
        if state.failing_issue_labels.contains(label) {
            return Err(Self::bad_gateway());
        }
        let matching: Vec<Issue> = state
            .issues
            .iter()
            .filter(|issue| issue.labels.iter().any(|l| l.name == label))
            .cloned()
            .collect();
        Ok(page_of(&matching, page))
    }

    async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        update: &IssueUpdate,
    ) -> Result<Issue> {
        self.enter().await?;
        let mut state = self.state();
        let known_labels = state.labels.clone();
        let issue = state
            .issues
            .iter_mut()
            .find(|issue| issue.number == number)
            .ok_or_else(|| BarimError::not_found(format!("Issue #{number} in '{owner}/{repo}'")))?;

        if let Some(title) = &update.title {
            issue.title.clone_from(title);
        }
        if let Some(body) = &update.body {
            issue.body = Some(body.clone());
        }
        if let Some(new_state) = update.state {
            issue.state = new_state;
            if new_state == IssueState::Closed && update.state_reason.is_none() {
                issue.state_reason = Some("completed".to_string());
            }
        }
        if let Some(reason) = update.state_reason {
            issue.state_reason = serde_json::to_value(reason)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string));
        }
        if let Some(names) = &update.labels {
            issue.labels = names
                .iter()
                .map(|name| {
                    known_labels
                        .iter()
                        .find(|l| &l.name == name)
                        .cloned()
                        .unwrap_or_else(|| Label {
                            name: name.clone(),
                            color: "ededed".to_string(),
                            description: None,
                        })
                })
                .collect();
        }
        Ok(issue.clone())
    }

    async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<Comment> {
        self.enter().await?;
        let mut state = self.state();
        if !state.issues.iter().any(|issue| issue.number == number) {
            return Err(BarimError::not_found(format!(
                "Issue #{number} in '{owner}/{repo}'"
            )));
        }
        let comment = Comment {
            id: state.comments.len() as u64 + 1,
            body: Some(body.to_string()),
            html_url: None,
            user: Some(Author {
                login: self.login.clone(),
            }),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }
}

/// Connector that hands out the same in-memory tracker for one accepted token.
pub struct InMemoryConnector {
    token: String,
    tracker: InMemoryTracker,
}

impl InMemoryConnector {
    /// Accepts only `token`; any other token is rejected as a GitHub 401 would be.
    #[must_use]
    pub fn new(token: &str, tracker: InMemoryTracker) -> Self {
        Self {
            token: token.to_string(),
            tracker,
        }
    }
}

impl TrackerConnector for InMemoryConnector {
    fn connect(&self, token: &SecretString) -> Result<Arc<dyn IssueTracker>> {
        if token.expose_secret() == self.token {
            Ok(Arc::new(self.tracker.clone()))
        } else {
            // Fresh state, so the shared tracker keeps accepting the valid token.
            Ok(Arc::new(InMemoryTracker::new(&self.tracker.login).reject_credential(401)))
        }
    }
}
