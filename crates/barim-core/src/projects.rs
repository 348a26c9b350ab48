// SPDX-License-Identifier: Apache-2.0

//! Project listing and creation for one authenticated principal.
//!
//! A [`ProjectService`] is built per request from the caller's tracker
//! capability. It holds no state beyond configuration; every call re-reads
//! the backing repository.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::Result;
use crate::aggregate::aggregate;
use crate::config::{AppConfig, PaginationConfig, StoreConfig};
use crate::error::BarimError;
use crate::github::IssueTracker;
use crate::labels::{default_description, discover_project_labels, project_label, random_color};
use crate::models::{Label, NewLabel, Project};
use crate::paginate::PageRequest;
use crate::provision::ensure_exists;

/// Sorted projects of one owner.
#[derive(Debug, Clone)]
pub struct ProjectListing {
    /// Login of the principal owning the backing repository.
    pub owner: String,
    /// Projects sorted by name.
    pub projects: Vec<Project>,
    /// Labels whose issue count could not be fetched (reported as zero).
    pub failed_labels: Vec<String>,
}

/// Project operations on the caller's backing repository.
pub struct ProjectService {
    tracker: Arc<dyn IssueTracker>,
    store: StoreConfig,
    pagination: PaginationConfig,
    concurrency: usize,
}

impl ProjectService {
    /// Creates a service bound to `tracker`.
    #[must_use]
    pub fn new(tracker: Arc<dyn IssueTracker>, config: &AppConfig) -> Self {
        Self {
            tracker,
            store: config.store.clone(),
            pagination: config.pagination.clone(),
            concurrency: config.aggregation.concurrency,
        }
    }

    /// `owner/name` of the backing repository.
    #[must_use]
    pub fn physical_repo(&self, owner: &str) -> String {
        format!("{owner}/{}", self.store.repo_name)
    }

    /// Login of the principal the credential belongs to.
    ///
    /// # Errors
    ///
    /// Returns the upstream failure, typically `Unauthorized` for a bad token.
    pub async fn resolve_owner(&self) -> Result<String> {
        self.tracker.authenticated_login().await
    }

    /// Lists every project of the caller with its issue count.
    ///
    /// Provisions the backing repository first. Failures while counting a
    /// single label do not fail the listing.
    ///
    /// # Errors
    ///
    /// Returns owner resolution, provisioning, and label discovery failures.
    #[instrument(skip(self))]
    pub async fn list_projects(&self) -> Result<ProjectListing> {
        let owner = self.resolve_owner().await?;
        ensure_exists(self.tracker.as_ref(), &owner, &self.store).await?;

        let labels = discover_project_labels(
            self.tracker.as_ref(),
            &owner,
            &self.store.repo_name,
            self.pagination.labels(),
        )
        .await?;

        let aggregation = aggregate(
            self.tracker.as_ref(),
            &owner,
            &self.store.repo_name,
            &labels,
            self.pagination.issues(),
            self.concurrency,
        )
        .await;

        Ok(ProjectListing {
            owner,
            projects: aggregation.projects,
            failed_labels: aggregation
                .failures
                .into_iter()
                .map(|failure| failure.label)
                .collect(),
        })
    }

    /// Creates the project `name` under `owner`.
    ///
    /// The name is trimmed. The returned project has no issues yet.
    ///
    /// # Errors
    ///
    /// - `Validation` for a blank name
    /// - `Conflict` when the project label already exists
    /// - provisioning and label creation failures otherwise
    #[instrument(skip(self, description))]
    pub async fn create_project(
        &self,
        owner: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Project> {
        let name = validate_project_name(name)?;

        ensure_exists(self.tracker.as_ref(), owner, &self.store).await?;

        let label_name = project_label(name);
        if self
            .existing_labels(owner)
            .await
            .iter()
            .any(|label| label.name == label_name)
        {
            return Err(already_exists(name));
        }

        let new_label = NewLabel {
            name: label_name,
            color: random_color(),
            description: description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map_or_else(|| default_description(name), str::to_string),
        };

        let created = self
            .tracker
            .create_label(owner, &self.store.repo_name, &new_label)
            .await
            .map_err(|e| if e.is_conflict() { already_exists(name) } else { e })?;

        info!(project = name, "Created project");
        Ok(Project::builder()
            .name(name.to_string())
            .label(created.name)
            .color(created.color)
            .description(created.description.unwrap_or(new_label.description))
            .issue_count(0)
            .build())
    }

    /// Single-page read of existing labels; a failed read counts as none.
    async fn existing_labels(&self, owner: &str) -> Vec<Label> {
        let first_page = PageRequest {
            page: 1,
            per_page: self.pagination.label_page_size,
        };
        match self
            .tracker
            .list_labels(owner, &self.store.repo_name, first_page)
            .await
        {
            Ok(labels) => labels,
            Err(e) => {
                warn!(error = %e, "Could not read existing labels, continuing");
                Vec::new()
            }
        }
    }
}

/// Trims `name`, rejecting it when nothing is left.
///
/// # Errors
///
/// Returns `Validation` for a blank name.
pub fn validate_project_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        Err(BarimError::validation("Project name is required"))
    } else {
        Ok(name)
    }
}

fn already_exists(name: &str) -> BarimError {
    BarimError::Conflict {
        message: format!("Project \"{name}\" already exists"),
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;
    use futures::future::BoxFuture;

    use super::*;
    use crate::models::IssueState;
    use crate::testing::InMemoryTracker;

    fn service(tracker: &InMemoryTracker) -> ProjectService {
        ProjectService::new(Arc::new(tracker.clone()), &AppConfig::default())
    }

    #[tokio::test]
    async fn lists_projects_for_authenticated_owner() {
        let tracker = InMemoryTracker::new("octocat")
            .with_repository("barim-data")
            .with_label("project:web", "ff0000", Some("Website"))
            .with_label("bug", "d73a4a", None)
            .with_issue("project:web", IssueState::Open, None)
            .with_issue("project:web", IssueState::Closed, Some("completed"))
            .with_issue("project:web", IssueState::Closed, Some("not_planned"));

        let listing = service(&tracker).list_projects().await.unwrap();

        assert_eq!(listing.owner, "octocat");
        assert_eq!(listing.projects.len(), 1);
        let web = &listing.projects[0];
        assert_eq!(web.name, "web");
        assert_eq!(web.description, "Website");
        assert_eq!(web.issue_count, 2);
        assert!(listing.failed_labels.is_empty());
    }

    #[tokio::test]
    async fn listing_provisions_store_on_first_use() {
        let tracker = InMemoryTracker::new("octocat");

        let listing = service(&tracker).list_projects().await.unwrap();

        assert!(listing.projects.is_empty());
        assert_eq!(tracker.repository_creations(), 1);
    }

    #[tokio::test]
    async fn listing_surfaces_failed_labels() {
        let tracker = InMemoryTracker::new("octocat")
            .with_repository("barim-data")
            .with_label("project:A", "ededed", None)
            .with_label("project:B", "ededed", None)
            .with_open_issues("project:A", 1)
            .with_open_issues("project:B", 1)
            .fail_issues_for("project:B");

        let listing = service(&tracker).list_projects().await.unwrap();

        assert_eq!(listing.projects.len(), 2);
        assert_eq!(listing.failed_labels, ["project:B"]);
    }

    #[tokio::test]
    async fn label_discovery_failure_fails_listing() {
        let tracker = InMemoryTracker::new("octocat")
            .with_repository("barim-data")
            .fail_label_listing();

        assert!(service(&tracker).list_projects().await.is_err());
    }

    #[tokio::test]
    async fn creates_project_label() {
        let tracker = InMemoryTracker::new("octocat");

        let project = service(&tracker)
            .create_project("octocat", "  Launch  ", None)
            .await
            .unwrap();

        assert_eq!(project.name, "Launch");
        assert_eq!(project.label, "project:Launch");
        assert_eq!(project.description, "Project: Launch");
        assert_eq!(project.issue_count, 0);
        assert_eq!(project.color.len(), 6);
        assert_eq!(tracker.labels().len(), 1);
        assert_eq!(tracker.repository_creations(), 1);
    }

    #[tokio::test]
    async fn keeps_given_description() {
        let tracker = InMemoryTracker::new("octocat").with_repository("barim-data");

        let project = service(&tracker)
            .create_project("octocat", "docs", Some("Docs site"))
            .await
            .unwrap();

        assert_eq!(project.description, "Docs site");
    }

    #[tokio::test]
    async fn blank_name_is_rejected_without_side_effects() {
        let tracker = InMemoryTracker::new("octocat");

        for name in ["", "   ", "\t\n"] {
            let err = service(&tracker)
                .create_project("octocat", name, None)
                .await
                .unwrap_err();
            assert!(matches!(err, BarimError::Validation { .. }));
        }
        assert_eq!(tracker.repository_creations(), 0);
        assert!(tracker.labels().is_empty());
    }

    #[tokio::test]
    async fn duplicate_project_is_a_conflict() {
        let tracker = InMemoryTracker::new("octocat")
            .with_repository("barim-data")
            .with_label("project:foo", "ff0000", Some("Original"));

        let err = service(&tracker)
            .create_project("octocat", "foo", Some("Replacement"))
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "Project \"foo\" already exists");

        let labels = tracker.labels();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].color, "ff0000");
        assert_eq!(labels[0].description.as_deref(), Some("Original"));
    }

    #[tokio::test]
    async fn flaky_label_read_does_not_block_creation() {
        let tracker = InMemoryTracker::new("octocat")
            .with_repository("barim-data")
            .fail_label_listing();

        let project = service(&tracker)
            .create_project("octocat", "new", None)
            .await
            .unwrap();

        assert_eq!(project.label, "project:new");
    }

    #[tokio::test]
    async fn upstream_duplicate_past_precheck_is_a_conflict() {
        // The pre-check read fails, so only the create sees the duplicate.
        let tracker = InMemoryTracker::new("octocat")
            .with_repository("barim-data")
            .with_label("project:foo", "ff0000", None)
            .fail_label_listing();

        let err = service(&tracker)
            .create_project("octocat", "foo", None)
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(err.to_string(), "Project \"foo\" already exists");
        assert_eq!(tracker.labels()[0].color, "ff0000");
    }

    #[test]
    fn service_futures_are_send() {
        fn assert_send<T: Send>(_: &T) {}

        let tracker = InMemoryTracker::new("octocat");
        let service = service(&tracker);

        assert_send(&service.list_projects());
        assert_send(&service.create_project("octocat", "foo", None));
        assert_send(&service.resolve_owner());
    }

    #[tokio::test]
    async fn listing_runs_as_spawned_task() {
        fn listing_task(
            service: Arc<ProjectService>,
        ) -> BoxFuture<'static, Result<ProjectListing>> {
            async move { service.list_projects().await }.boxed()
        }

        let tracker = InMemoryTracker::new("octocat")
            .with_repository("barim-data")
            .with_label("project:web", "ff0000", None)
            .with_open_issues("project:web", 2);

        let listing = tokio::spawn(listing_task(Arc::new(service(&tracker))))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(listing.projects[0].issue_count, 2);
    }

    #[test]
    fn physical_repo_uses_configured_store() {
        let tracker = InMemoryTracker::new("octocat");
        assert_eq!(service(&tracker).physical_repo("octocat"), "octocat/barim-data");
    }
}
