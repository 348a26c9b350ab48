// SPDX-License-Identifier: Apache-2.0

//! Configuration management for Barim.
//!
//! Provides layered configuration from files and environment variables.
//! Uses XDG-compliant paths with environment variable support.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `BARIM_`)
//! 2. Config file: `~/.config/barim/config.toml`
//! 3. Built-in defaults
//!
//! # Examples
//!
//! ```bash
//! # Shrink the issue page size via environment variable
//! BARIM_PAGINATION__ISSUE_PAGE_SIZE=50 barim-server
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::BarimError;
use crate::paginate::PageLimits;

/// Largest page size the GitHub REST API accepts.
pub const MAX_PAGE_SIZE: u8 = 100;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitHub API settings.
    pub github: GitHubConfig,
    /// Backing repository settings.
    pub store: StoreConfig,
    /// Page sizes and page-count ceilings.
    pub pagination: PaginationConfig,
    /// Per-label fan-out settings.
    pub aggregation: AggregationConfig,
    /// HTTP listener settings.
    pub server: ServerConfig,
}

/// GitHub API settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Per-call timeout in seconds.
    pub api_timeout_seconds: u64,
    /// Alternative API root (GitHub Enterprise).
    pub api_base_url: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_timeout_seconds: 10,
            api_base_url: None,
        }
    }
}

impl GitHubConfig {
    /// Per-call deadline as a [`Duration`].
    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.api_timeout_seconds)
    }
}

/// Backing repository settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Name of the repository holding every project label and issue.
    pub repo_name: String,
    /// Description used when the repository is created.
    pub description: String,
    /// Create the repository as private.
    pub private: bool,
    /// Initialise the repository with a README so it is immediately usable.
    pub auto_init: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            repo_name: "barim-data".to_string(),
            description: "Personal task and note management repository for Barim app"
                .to_string(),
            private: false,
            auto_init: true,
        }
    }
}

/// Page sizes and page-count ceilings for every paginated listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Labels per page.
    pub label_page_size: u8,
    /// Maximum label pages fetched.
    pub label_max_pages: u32,
    /// Issues per page.
    pub issue_page_size: u8,
    /// Maximum issue pages fetched per label.
    pub issue_max_pages: u32,
    /// Repositories per page.
    pub repo_page_size: u8,
    /// Maximum repository pages scanned during lookup.
    pub repo_max_pages: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            label_page_size: 100,
            label_max_pages: 20,
            issue_page_size: 100,
            issue_max_pages: 20,
            repo_page_size: 100,
            repo_max_pages: 50,
        }
    }
}

impl PaginationConfig {
    /// Limits for label discovery.
    #[must_use]
    pub fn labels(&self) -> PageLimits {
        PageLimits::new(self.label_page_size, self.label_max_pages)
    }

    /// Limits for per-label issue listing.
    #[must_use]
    pub fn issues(&self) -> PageLimits {
        PageLimits::new(self.issue_page_size, self.issue_max_pages)
    }

    /// Limits for repository scans.
    #[must_use]
    pub fn repos(&self) -> PageLimits {
        PageLimits::new(self.repo_page_size, self.repo_max_pages)
    }

    fn validate(&self) -> Result<(), BarimError> {
        let sizes = [
            ("label_page_size", self.label_page_size),
            ("issue_page_size", self.issue_page_size),
            ("repo_page_size", self.repo_page_size),
        ];
        for (key, size) in sizes {
            if size == 0 || size > MAX_PAGE_SIZE {
                return Err(BarimError::Config {
                    message: format!("pagination.{key} must be between 1 and {MAX_PAGE_SIZE}, got {size}"),
                });
            }
        }

        let ceilings = [
            ("label_max_pages", self.label_max_pages),
            ("issue_max_pages", self.issue_max_pages),
            ("repo_max_pages", self.repo_max_pages),
        ];
        for (key, pages) in ceilings {
            if pages == 0 {
                return Err(BarimError::Config {
                    message: format!("pagination.{key} must be at least 1"),
                });
            }
        }
        Ok(())
    }
}

/// Per-label fan-out settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// How many labels are counted concurrently.
    pub concurrency: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self { concurrency: 5 }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl AppConfig {
    /// Checks cross-field constraints the deserializer cannot express.
    pub fn validate(&self) -> Result<(), BarimError> {
        self.pagination.validate()?;
        if self.aggregation.concurrency == 0 {
            return Err(BarimError::Config {
                message: "aggregation.concurrency must be at least 1".to_string(),
            });
        }
        if self.github.api_timeout_seconds == 0 {
            return Err(BarimError::Config {
                message: "github.api_timeout_seconds must be at least 1".to_string(),
            });
        }
        if self.store.repo_name.trim().is_empty() {
            return Err(BarimError::Config {
                message: "store.repo_name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Returns the Barim configuration directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config/barim`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return PathBuf::from(xdg_config).join("barim");
    }
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".config")
        .join("barim")
}

/// Returns the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load application configuration from the default file location.
///
/// # Errors
///
/// Returns `BarimError::Config` if the config file exists but is invalid.
pub fn load_config() -> Result<AppConfig, BarimError> {
    load_config_from(&config_file_path())
}

/// Load application configuration from an explicit file path.
///
/// The file is optional. Environment variables use the prefix `BARIM_`
/// and double underscore for nested keys (e.g., `BARIM_STORE__REPO_NAME`).
pub fn load_config_from(path: &Path) -> Result<AppConfig, BarimError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("BARIM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;
    app_config.validate()?;

    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn parse(toml: &str) -> Result<AppConfig, BarimError> {
        let config = Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    #[test]
    fn defaults_match_backing_store_conventions() {
        let config = AppConfig::default();
        assert_eq!(config.store.repo_name, "barim-data");
        assert!(!config.store.private);
        assert!(config.store.auto_init);
        assert_eq!(config.pagination.label_page_size, 100);
        assert_eq!(config.pagination.label_max_pages, 20);
        assert_eq!(config.pagination.issue_page_size, 100);
        assert_eq!(config.pagination.issue_max_pages, 20);
        assert_eq!(config.pagination.repo_max_pages, 50);
        assert_eq!(config.github.call_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = parse(
            r#"
[store]
repo_name = "my-tasks"

[pagination]
issue_page_size = 50
"#,
        )
        .expect("should parse");

        assert_eq!(config.store.repo_name, "my-tasks");
        assert_eq!(config.pagination.issue_page_size, 50);
        assert_eq!(config.pagination.label_page_size, 100);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn rejects_page_size_above_upstream_cap() {
        let err = parse("[pagination]\nlabel_page_size = 101\n").unwrap_err();
        assert!(matches!(err, BarimError::Config { .. }));
        assert!(err.to_string().contains("label_page_size"));
    }

    #[test]
    fn rejects_zero_ceiling() {
        let err = parse("[pagination]\nissue_max_pages = 0\n").unwrap_err();
        assert!(err.to_string().contains("issue_max_pages"));
    }

    #[test]
    fn rejects_zero_concurrency() {
        let err = parse("[aggregation]\nconcurrency = 0\n").unwrap_err();
        assert!(err.to_string().contains("concurrency"));
    }

    #[test]
    #[serial]
    fn loads_from_explicit_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("tempfile");
        writeln!(file, "[server]\nport = 8088\n[github]\napi_timeout_seconds = 3").unwrap();

        let config = load_config_from(file.path()).expect("should load");
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.github.api_timeout_seconds, 3);
    }

    #[test]
    #[serial]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).expect("should load");
        assert_eq!(config.store.repo_name, "barim-data");
    }

    #[test]
    #[serial]
    #[allow(unsafe_code)]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        // SAFETY: serialised with other env-mutating tests.
        unsafe {
            std::env::set_var("BARIM_STORE__REPO_NAME", "env-store");
        }
        let config = load_config_from(&dir.path().join("absent.toml"));
        unsafe {
            std::env::remove_var("BARIM_STORE__REPO_NAME");
        }

        assert_eq!(config.expect("should load").store.repo_name, "env-store");
    }

    #[test]
    #[serial]
    #[allow(unsafe_code)]
    fn config_dir_respects_xdg_config_home() {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        // SAFETY: serialised with other env-mutating tests.
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", "/custom/config");
        }

        let dir = config_dir();
        assert_eq!(dir, PathBuf::from("/custom/config/barim"));

        unsafe {
            match original {
                Some(val) => std::env::set_var("XDG_CONFIG_HOME", val),
                None => std::env::remove_var("XDG_CONFIG_HOME"),
            }
        }
    }

    #[test]
    fn config_file_path_ends_with_toml() {
        assert!(config_file_path().ends_with("config.toml"));
    }
}
