// SPDX-License-Identifier: Apache-2.0

//! Project label discovery and naming.

use tracing::{debug, instrument};

use crate::Result;
use crate::github::IssueTracker;
use crate::models::Label;
use crate::paginate::{PageLimits, paginate};

/// Prefix marking a label as a project. Matching is case-sensitive.
pub const PROJECT_LABEL_PREFIX: &str = "project:";

/// Returns the project name for a project label, or `None` for any other label.
#[must_use]
pub fn project_name(label: &str) -> Option<&str> {
    label.strip_prefix(PROJECT_LABEL_PREFIX)
}

/// Full label name for the project `name`.
#[must_use]
pub fn project_label(name: &str) -> String {
    format!("{PROJECT_LABEL_PREFIX}{name}")
}

/// Description used when a project label carries none.
#[must_use]
pub fn default_description(name: &str) -> String {
    format!("Project: {name}")
}

/// Random label color as six lowercase hex digits.
#[must_use]
pub fn random_color() -> String {
    format!("{:06x}", fastrand::u32(..0x0100_0000))
}

/// Lists every label on the backing repository whose name marks a project.
///
/// # Errors
///
/// Returns the first failed page fetch.
#[instrument(skip(tracker))]
pub async fn discover_project_labels(
    tracker: &dyn IssueTracker,
    owner: &str,
    repo: &str,
    limits: PageLimits,
) -> Result<Vec<Label>> {
    let all = paginate(limits, |page| tracker.list_labels(owner, repo, page)).await?;
    let total = all.items.len();

    let projects: Vec<Label> = all
        .items
        .into_iter()
        .filter(|label| project_name(&label.name).is_some())
        .collect();

    debug!(total, projects = projects.len(), "Discovered project labels");
    Ok(projects)
}
