//! The pick workflow once commits and branch name are known.
//!
//! [`PickSettings`] can only be built from a non-empty commit list and a valid
//! branch name; [`summary`] asks for confirmation and [`executor`] runs the
//! git/gh sequence.

pub mod executor;
pub mod summary;

use anyhow::Result;

use crate::branch::validate_branch_name;
use crate::commits::Commit;
use crate::config::{DEFAULT_ASSIGNEE, DEFAULT_PULL_REMOTE, DEFAULT_PUSH_REMOTE};
use crate::error::PickError;

pub use executor::cherry_pick_to_new_branch;
pub use summary::{confirm_settings, format_in_box, render_summary};

/// Everything the executor needs, fixed before anything is changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickSettings {
    do_fetch: bool,
    do_create_pull_request: bool,
    pull_remote: String,
    push_remote: String,
    branch_name: String,
    upstream_branch: String,
    assignee: String,
    commits: Vec<Commit>,
}

impl PickSettings {
    /// Creates settings with default remotes, fetching and pull request creation enabled
    ///
    /// # Errors
    /// Returns an error if `commits` is empty or `branch_name` is too short
    pub fn new(
        upstream_branch: impl Into<String>,
        branch_name: impl Into<String>,
        commits: Vec<Commit>,
    ) -> Result<Self> {
        let branch_name = branch_name.into();
        if commits.is_empty() {
            return Err(PickError::NoCommitsChosen.into());
        }
        validate_branch_name(&branch_name)?;

        Ok(Self {
            do_fetch: true,
            do_create_pull_request: true,
            pull_remote: DEFAULT_PULL_REMOTE.to_string(),
            push_remote: DEFAULT_PUSH_REMOTE.to_string(),
            branch_name,
            upstream_branch: upstream_branch.into(),
            assignee: DEFAULT_ASSIGNEE.to_string(),
            commits,
        })
    }

    #[must_use]
    pub fn with_remotes(mut self, pull: impl Into<String>, push: impl Into<String>) -> Self {
        self.pull_remote = pull.into();
        self.push_remote = push.into();
        self
    }

    #[must_use]
    pub fn with_fetch(mut self, do_fetch: bool) -> Self {
        self.do_fetch = do_fetch;
        self
    }

    #[must_use]
    pub fn with_pull_request(mut self, do_create_pull_request: bool) -> Self {
        self.do_create_pull_request = do_create_pull_request;
        self
    }

    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = assignee.into();
        self
    }

    #[must_use]
    pub fn do_fetch(&self) -> bool {
        self.do_fetch
    }

    #[must_use]
    pub fn do_create_pull_request(&self) -> bool {
        self.do_create_pull_request
    }

    #[must_use]
    pub fn pull_remote(&self) -> &str {
        &self.pull_remote
    }

    #[must_use]
    pub fn push_remote(&self) -> &str {
        &self.push_remote
    }

    #[must_use]
    pub fn branch_name(&self) -> &str {
        &self.branch_name
    }

    #[must_use]
    pub fn upstream_branch(&self) -> &str {
        &self.upstream_branch
    }

    #[must_use]
    pub fn assignee(&self) -> &str {
        &self.assignee
    }

    #[must_use]
    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    /// `<pull_remote>/<upstream_branch>`, the base of the new branch
    #[must_use]
    pub fn upstream_ref(&self) -> String {
        format!("{}/{}", self.pull_remote, self.upstream_branch)
    }

    #[must_use]
    pub fn commit_shas(&self) -> Vec<String> {
        self.commits.iter().map(|c| c.sha().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_require_commits() {
        let err = PickSettings::new("release", "fix-thing", Vec::new()).err();
        assert!(matches!(
            err.as_ref().and_then(|e| e.downcast_ref::<PickError>()),
            Some(PickError::NoCommitsChosen)
        ));
    }

    #[test]
    fn test_settings_require_valid_branch_name() -> Result<()> {
        let commits = vec![Commit::parse_line("abc1234 Fix")?];
        assert!(PickSettings::new("release", "fx", commits).is_err());
        Ok(())
    }

    #[test]
    fn test_settings_defaults_and_overrides() -> Result<()> {
        let commits = vec![
            Commit::parse_line("abc1234 First")?,
            Commit::parse_line("def5678 Second")?,
        ];
        let settings = PickSettings::new("release", "fix-thing", commits)?;
        assert!(settings.do_fetch());
        assert!(settings.do_create_pull_request());
        assert_eq!(settings.upstream_ref(), "upstream/release");
        assert_eq!(settings.push_remote(), "origin");
        assert_eq!(settings.assignee(), "@me");
        assert_eq!(settings.commit_shas(), vec!["abc1234", "def5678"]);

        let settings = settings
            .with_remotes("mainline", "fork")
            .with_fetch(false)
            .with_pull_request(false)
            .with_assignee("octocat");
        assert!(!settings.do_fetch());
        assert!(!settings.do_create_pull_request());
        assert_eq!(settings.upstream_ref(), "mainline/release");
        assert_eq!(settings.push_remote(), "fork");
        assert_eq!(settings.assignee(), "octocat");
        Ok(())
    }
}
