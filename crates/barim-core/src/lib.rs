// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # Barim Core
//!
//! Core library for Barim - projects modeled as labels on a GitHub backing repository.
//!
//! A "project" is a label named `project:<name>` on the caller's backing
//! repository (`barim-data` by default). Its issue count is the number of
//! issues carrying the label that are open or were closed as completed.
//!
//! This crate provides:
//! - The [`IssueTracker`] capability and its octocrab implementation
//! - Bounded pagination over page-numbered listings
//! - Backing-store provisioning, label discovery and project aggregation
//! - Issue edits and comments on the backing store
//! - Configuration management
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use barim_core::{GitHubConnector, ProjectService, TrackerConnector, load_config};
//! use secrecy::SecretString;
//!
//! # async fn example() -> barim_core::Result<()> {
//! let config = load_config()?;
//! let connector = GitHubConnector::new(&config.github);
//!
//! let token = SecretString::from("ghp_example".to_string());
//! let tracker = connector.connect(&token)?;
//!
//! let service = ProjectService::new(tracker, &config);
//! let listing = service.list_projects().await?;
//! for project in &listing.projects {
//!     println!("{}: {}", project.name, project.issue_count);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`aggregate`] - Concurrent per-label issue counting
//! - [`classify`] - Which issues count toward a project
//! - [`config`] - Configuration loading and paths
//! - [`error`] - Error types
//! - [`github`] - Tracker capability and octocrab client
//! - [`issues`] - Issue edits and comments
//! - [`labels`] - Project label discovery
//! - [`paginate`] - Bounded pagination
//! - [`projects`] - Project listing and creation facade
//! - [`provision`] - Backing-store provisioning
//! - [`repos`] - Owned repository listing and lookup

// ============================================================================
// Error Handling
// ============================================================================

pub use error::BarimError;

/// Convenience Result type for Barim operations.
///
/// This is equivalent to `std::result::Result<T, BarimError>`.
pub type Result<T> = std::result::Result<T, BarimError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{
    AggregationConfig, AppConfig, GitHubConfig, PaginationConfig, ServerConfig, StoreConfig,
    config_dir, config_file_path, load_config, load_config_from,
};

// ============================================================================
// GitHub Integration
// ============================================================================

pub use github::{DeadlineTracker, GitHubConnector, GitHubTracker, IssueTracker, TrackerConnector};
pub use paginate::{PageLimits, PageRequest, PageSearch, Paginated, paginate, paginate_until};

// ============================================================================
// Data Model
// ============================================================================

pub use models::{
    Author, Comment, Issue, IssueState, IssueUpdate, Label, NewLabel, NewRepository, Project,
    Repository, StateReason,
};

// ============================================================================
// Projects
// ============================================================================

pub use aggregate::{Aggregation, LabelFailure, aggregate};
pub use classify::is_countable;
pub use labels::{PROJECT_LABEL_PREFIX, discover_project_labels, project_name};
pub use projects::{ProjectListing, ProjectService, validate_project_name};
pub use provision::{Provisioning, ensure_exists};

// ============================================================================
// Issues and Repositories
// ============================================================================

pub use issues::{create_comment, update_issue};
pub use repos::{RepoLookup, find_repository, list_repositories};

// ============================================================================
// Modules
// ============================================================================

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod github;
pub mod issues;
pub mod labels;
pub mod models;
pub mod paginate;
pub mod projects;
pub mod provision;
pub mod repos;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;
