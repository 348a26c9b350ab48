// SPDX-License-Identifier: Apache-2.0

//! Which issues count toward a project.

use crate::models::{Issue, IssueState};

/// Returns true when `issue` counts toward its project.
///
/// Open issues always count. Closed issues count only when closed as
/// `completed`; `not_planned`, `duplicate`, an unknown reason, or no reason
/// at all excludes them.
#[must_use]
pub fn is_countable(issue: &Issue) -> bool {
    match issue.state {
        IssueState::Open => true,
        IssueState::Closed => issue.state_reason.as_deref() == Some("completed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(state: IssueState, reason: Option<&str>) -> Issue {
        Issue {
            number: 1,
            title: String::new(),
            body: None,
            state,
            state_reason: reason.map(str::to_string),
            labels: vec![],
            html_url: None,
        }
    }

    #[test]
    fn open_issues_count_regardless_of_reason() {
        assert!(is_countable(&issue(IssueState::Open, None)));
        assert!(is_countable(&issue(IssueState::Open, Some("reopened"))));
        assert!(is_countable(&issue(IssueState::Open, Some("not_planned"))));
    }

    #[test]
    fn closed_as_completed_counts() {
        assert!(is_countable(&issue(IssueState::Closed, Some("completed"))));
    }

    #[test]
    fn other_closed_issues_do_not_count() {
        assert!(!is_countable(&issue(IssueState::Closed, Some("not_planned"))));
        assert!(!is_countable(&issue(IssueState::Closed, Some("duplicate"))));
        assert!(!is_countable(&issue(IssueState::Closed, Some("something_new"))));
        assert!(!is_countable(&issue(IssueState::Closed, None)));
    }
}
