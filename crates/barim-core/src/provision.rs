// SPDX-License-Identifier: Apache-2.0

//! Backing-store provisioning.
//!
//! Every project operation runs against a repository named by
//! [`StoreConfig::repo_name`] under the caller's account. It is created on
//! first use. Calling [`ensure_exists`] again, or from two requests racing
//! on a first use, never yields a second repository.

use tracing::{debug, info, instrument};

use crate::Result;
use crate::config::StoreConfig;
use crate::github::IssueTracker;
use crate::models::NewRepository;

/// What [`ensure_exists`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioning {
    /// The repository was already there (or appeared concurrently).
    Existing,
    /// This call created the repository.
    Created,
}

/// Makes sure the backing repository exists under `owner`.
///
/// An absent repository is created with the configured description and
/// visibility. A create that collides with a repository created in the
/// meantime counts as [`Provisioning::Existing`].
///
/// # Errors
///
/// Returns any read failure other than not-found, and any create failure
/// other than a name conflict.
#[instrument(skip(tracker, store), fields(repo = %store.repo_name))]
pub async fn ensure_exists(
    tracker: &dyn IssueTracker,
    owner: &str,
    store: &StoreConfig,
) -> Result<Provisioning> {
    match tracker.get_repository(owner, &store.repo_name).await {
        Ok(_) => {
            debug!("Backing repository present");
            return Ok(Provisioning::Existing);
        }
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(e),
    }

    let new_repo = NewRepository {
        name: store.repo_name.clone(),
        description: store.description.clone(),
        private: store.private,
        auto_init: store.auto_init,
    };

    match tracker.create_repository(&new_repo).await {
        Ok(_) => {
            info!(owner, "Created backing repository");
            Ok(Provisioning::Created)
        }
        Err(e) if e.is_conflict() => {
            info!(owner, "Backing repository created concurrently");
            Ok(Provisioning::Existing)
        }
        Err(e) => Err(e),
    }
}
