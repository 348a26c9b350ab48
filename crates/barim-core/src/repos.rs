// SPDX-License-Identifier: Apache-2.0

//! Repositories owned by the caller.

use tracing::{debug, instrument};

use crate::Result;
use crate::error::BarimError;
use crate::github::IssueTracker;
use crate::models::Repository;
use crate::paginate::{PageLimits, PageRequest, paginate_until};

/// Outcome of a repository lookup by name.
#[derive(Debug, Clone)]
pub struct RepoLookup {
    /// The matching repository.
    pub repository: Repository,
    /// Pages fetched before the match.
    pub searched_pages: u32,
    /// Repositories examined.
    pub scanned: usize,
}

/// Most recently updated repositories of the caller, without the backing store.
///
/// Reads a single page of `limits.per_page` entries.
///
/// # Errors
///
/// Returns the upstream failure.
#[instrument(skip(tracker))]
pub async fn list_repositories(
    tracker: &dyn IssueTracker,
    store_name: &str,
    limits: PageLimits,
) -> Result<Vec<Repository>> {
    let page = tracker
        .list_owned_repositories(PageRequest {
            page: 1,
            per_page: limits.per_page,
        })
        .await?;

    Ok(page
        .into_iter()
        .filter(|repo| repo.name != store_name)
        .collect())
}

/// Finds an owned repository by exact name.
///
/// Scans pages in upstream order and stops at the first page containing it.
///
/// # Errors
///
/// Returns `NotFound` when no scanned page contains `name`, or the upstream failure.
#[instrument(skip(tracker))]
pub async fn find_repository(
    tracker: &dyn IssueTracker,
    name: &str,
    limits: PageLimits,
) -> Result<RepoLookup> {
    let search = paginate_until(
        limits,
        |page| tracker.list_owned_repositories(page),
        |repo| repo.name == name,
    )
    .await?;

    debug!(pages = search.pages_fetched, scanned = search.scanned, "Repository search finished");

    search
        .found
        .map(|repository| RepoLookup {
            repository,
            searched_pages: search.pages_fetched,
            scanned: search.scanned,
        })
        .ok_or_else(|| BarimError::not_found(format!("Repository '{name}'")))
}
