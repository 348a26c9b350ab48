// SPDX-License-Identifier: Apache-2.0

//! Per-label issue counting.
//!
//! Labels are counted concurrently (bounded by `concurrency`); each label runs
//! its own sequential pagination over issues in every state. A label whose
//! count cannot be fetched is still reported, with a count of zero, and the
//! failure is returned alongside the projects.

use std::cmp::Ordering;

use feruca::Collator;
use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt, stream};
use tracing::{debug, instrument, warn};

use crate::Result;
use crate::classify::is_countable;
use crate::error::BarimError;
use crate::github::IssueTracker;
use crate::labels::{default_description, project_name};
use crate::models::{Label, Project};
use crate::paginate::{PageLimits, paginate};

/// A label whose issues could not be counted.
#[derive(Debug)]
pub struct LabelFailure {
    /// Full label name.
    pub label: String,
    /// What went wrong.
    pub error: BarimError,
}

/// Projects sorted by name, plus the labels that could not be counted.
#[derive(Debug, Default)]
pub struct Aggregation {
    /// One project per input label, sorted by [`sort_by_name`].
    pub projects: Vec<Project>,
    /// Labels reported with a zero count because their fetch failed.
    pub failures: Vec<LabelFailure>,
}

/// Orders project names by Unicode collation (CLDR root).
///
/// Accents and case only break ties between otherwise equal names, with
/// lowercase before uppercase.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    Collator::default().collate(a, b)
}

/// Sorts projects by name with the ordering of [`compare_names`].
pub fn sort_by_name(projects: &mut [Project]) {
    let mut collator = Collator::default();
    projects.sort_by(|a, b| collator.collate(a.name.as_str(), b.name.as_str()));
}

async fn count_label(
    tracker: &dyn IssueTracker,
    owner: &str,
    repo: &str,
    label: &str,
    limits: PageLimits,
) -> Result<u64> {
    let issues = paginate(limits, |page| tracker.list_issues(owner, repo, label, page)).await?;
    let count = issues.items.iter().filter(|issue| is_countable(issue)).count();
    debug!(
        label,
        fetched = issues.items.len(),
        count,
        pages = issues.pages_fetched,
        "Counted label"
    );
    Ok(count as u64)
}

fn to_project(label: &Label, issue_count: u64) -> Project {
    let name = project_name(&label.name).unwrap_or(&label.name).to_string();
    let description = label
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| default_description(&name));

    Project::builder()
        .label(label.name.clone())
        .color(label.color.clone())
        .description(description)
        .issue_count(issue_count)
        .name(name)
        .build()
}

/// Counts the issues of every label and assembles the sorted project list.
///
/// Never fails as a whole: per-label failures are logged and collected in
/// [`Aggregation::failures`].
#[instrument(skip(tracker, labels), fields(label_count = labels.len()))]
pub async fn aggregate(
    tracker: &dyn IssueTracker,
    owner: &str,
    repo: &str,
    labels: &[Label],
    limits: PageLimits,
    concurrency: usize,
) -> Aggregation {
    let pending: Vec<BoxFuture<'_, (&Label, Result<u64>)>> = labels
        .iter()
        .map(|label| {
            async move {
                let count = count_label(tracker, owner, repo, &label.name, limits).await;
                (label, count)
            }
            .boxed()
        })
        .collect();

    let outcomes: Vec<(&Label, Result<u64>)> = stream::iter(pending)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut result = Aggregation::default();
    for (label, outcome) in outcomes {
        let count = match outcome {
            Ok(count) => count,
            Err(error) => {
                warn!(label = %label.name, error = %error, "Failed to count issues for label");
                result.failures.push(LabelFailure {
                    label: label.name.clone(),
                    error,
                });
                0
            }
        };
        result.projects.push(to_project(label, count));
    }

    sort_by_name(&mut result.projects);
    result.failures.sort_by(|a, b| a.label.cmp(&b.label));
    result
}
