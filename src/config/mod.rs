//! Optional defaults for the pick workflow.
//!
//! Settings are layered, later layers win:
//! 1. Built-in defaults (`upstream`, `origin`, `@me`)
//! 2. User config: `<config dir>/pr-cli/config.toml`, where the directory can be
//!    overridden with `PR_CLI_CONFIG_DIR`
//! 3. Repository config: `.pr-cli.toml` at the repository root
//! 4. Command line flags (applied by the caller)
//!
//! # Example
//! ```toml
//! [remotes]
//! pull = "upstream"
//! push = "fork"
//!
//! [pull-request]
//! assignee = "octocat"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_PULL_REMOTE: &str = "upstream";
pub const DEFAULT_PUSH_REMOTE: &str = "origin";
pub const DEFAULT_ASSIGNEE: &str = "@me";

/// File name of the per-repository config
pub const REPO_CONFIG_FILE: &str = ".pr-cli.toml";

/// Environment variable pointing at the directory holding the user config
pub const CONFIG_DIR_ENV: &str = "PR_CLI_CONFIG_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickConfig {
    #[serde(default)]
    pub remotes: RemoteConfig,

    #[serde(rename = "pull-request", default)]
    pub pull_request: PullRequestConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Remote to fetch the upstream branch from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull: Option<String>,

    /// Remote to push the new branch to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestConfig {
    /// Passed to `gh pr create --assignee`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl PickConfig {
    /// Location of the user config, if a config directory can be determined
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        let dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(custom_dir) => PathBuf::from(custom_dir),
            None => dirs::config_dir()?.join("pr-cli"),
        };
        Some(dir.join("config.toml"))
    }

    /// Loads the user config and the repository config and merges them
    ///
    /// # Errors
    /// Returns an error if an existing config file cannot be read.
    /// Invalid TOML is reported as a warning and that file is ignored.
    pub fn load_for_repo(repo_path: &Path) -> Result<Self> {
        let user = match Self::user_config_path() {
            Some(path) => Self::load_file(&path)?,
            None => Self::default(),
        };
        let repo = Self::load_file(&repo_path.join(REPO_CONFIG_FILE))?;
        Ok(user.merged_with(repo))
    }

    /// Loads a single config file; a missing or blank file yields the defaults
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        match toml::from_str::<PickConfig>(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "invalid TOML, ignoring config file: {}",
                    e.message()
                );
                Ok(Self::default())
            }
        }
    }

    /// Field by field merge where values set in `overrides` win
    #[must_use]
    pub fn merged_with(self, overrides: Self) -> Self {
        Self {
            remotes: RemoteConfig {
                pull: overrides.remotes.pull.or(self.remotes.pull),
                push: overrides.remotes.push.or(self.remotes.push),
            },
            pull_request: PullRequestConfig {
                assignee: overrides.pull_request.assignee.or(self.pull_request.assignee),
            },
        }
    }

    #[must_use]
    pub fn pull_remote(&self) -> &str {
        self.remotes.pull.as_deref().unwrap_or(DEFAULT_PULL_REMOTE)
    }

    #[must_use]
    pub fn push_remote(&self) -> &str {
        self.remotes.push.as_deref().unwrap_or(DEFAULT_PUSH_REMOTE)
    }

    #[must_use]
    pub fn assignee(&self) -> &str {
        self.pull_request
            .assignee
            .as_deref()
            .unwrap_or(DEFAULT_ASSIGNEE)
    }
}
