use anyhow::Result;
use git2::Repository;
use std::path::Path;

use crate::error::PickError;

/// Read-only view of the repository the command was started in
///
/// Everything that changes the repository goes through the `git` binary;
/// this is only used to locate the repository and check its remotes upfront.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Opens the git repository containing `path`
    ///
    /// # Errors
    /// Returns [`PickError::NotARepository`] if no repository is found
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).map_err(|e| {
            tracing::debug!(path = %path.display(), "repository discovery failed: {}", e);
            PickError::NotARepository(path.display().to_string())
        })?;
        Ok(Self { repo })
    }

    #[must_use]
    pub fn get_repo_path(&self) -> &Path {
        self.repo.workdir().unwrap_or_else(|| self.repo.path())
    }

    /// Lists the names of all configured remotes
    ///
    /// # Errors
    /// Returns an error if git operations fail
    pub fn list_remotes(&self) -> Result<Vec<String>> {
        let remotes = self.repo.remotes()?;
        Ok(remotes
            .iter()
            .flatten()
            .map(std::string::ToString::to_string)
            .collect())
    }

    /// Fails with a usage error naming the known remotes if `name` isn't one of them
    ///
    /// # Errors
    /// Returns [`PickError::Usage`] if the remote is missing, or an error if git operations fail
    pub fn ensure_remote(&self, name: &str) -> Result<()> {
        let remotes = self.list_remotes()?;
        if remotes.iter().any(|remote| remote == name) {
            return Ok(());
        }

        let known = if remotes.is_empty() {
            "none".to_string()
        } else {
            remotes.join(", ")
        };
        Err(PickError::Usage(format!(
            "Remote '{}' is not configured (known remotes: {})",
            name, known
        ))
        .into())
    }
}
