// SPDX-License-Identifier: Apache-2.0

//! Data model shared by the tracker capability and the facade.
//!
//! Wire types mirror the subset of GitHub REST payloads Barim reads;
//! unknown upstream fields are ignored.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// A named, colored tag on the backing repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name, unique within a repository.
    pub name: String,
    /// Color as six hex digits, without `#`.
    pub color: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Lifecycle state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Issue is open.
    Open,
    /// Issue is closed.
    Closed,
}

/// An issue on the backing repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number.
    pub number: u64,
    /// Issue title.
    #[serde(default)]
    pub title: String,
    /// Issue body (markdown).
    #[serde(default)]
    pub body: Option<String>,
    /// Lifecycle state.
    pub state: IssueState,
    /// Why the issue was closed (or reopened), e.g. `completed`, `not_planned`.
    #[serde(default)]
    pub state_reason: Option<String>,
    /// Labels attached to the issue.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// A repository owned by the authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Numeric repository id.
    pub id: u64,
    /// Short name.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the repository is private.
    #[serde(default)]
    pub private: bool,
    /// Last update timestamp (ISO 8601).
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Login of a GitHub account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Account login.
    pub login: String,
}

/// A comment on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment id.
    pub id: u64,
    /// Comment body (markdown).
    #[serde(default)]
    pub body: Option<String>,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Comment author.
    #[serde(default)]
    pub user: Option<Author>,
}

/// Payload for creating a repository under the authenticated account.
#[derive(Debug, Clone, Serialize)]
pub struct NewRepository {
    /// Repository name.
    pub name: String,
    /// Repository description.
    pub description: String,
    /// Create as private.
    pub private: bool,
    /// Create an initial commit with a README.
    pub auto_init: bool,
}

/// Payload for creating a label.
#[derive(Debug, Clone, Serialize)]
pub struct NewLabel {
    /// Label name.
    pub name: String,
    /// Color as six hex digits.
    pub color: String,
    /// Description.
    pub description: String,
}

/// Why an issue changed state, as accepted by the update endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateReason {
    /// Closed because the work is done.
    Completed,
    /// Closed without doing the work.
    NotPlanned,
    /// Closed as a duplicate.
    Duplicate,
    /// Reopened.
    Reopened,
}

/// Typed partial update of an issue.
///
/// Only the listed fields can be changed; anything else in a request body
/// is rejected during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssueUpdate {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// New lifecycle state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueState>,
    /// Reason accompanying a state change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_reason: Option<StateReason>,
    /// Full replacement label set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl IssueUpdate {
    /// Returns true when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.body.is_none()
            && self.state.is_none()
            && self.state_reason.is_none()
            && self.labels.is_none()
    }
}

/// A project: derived view over a `project:` label with its issue count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project name (label suffix).
    pub name: String,
    /// Full label name.
    pub label: String,
    /// Label color.
    pub color: String,
    /// Label description or the generated default.
    pub description: String,
    /// Number of countable issues.
    pub issue_count: u64,
}
