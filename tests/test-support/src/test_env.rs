#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity

use anyhow::{Context, Result};
use assert_fs::TempDir;
use assert_fs::prelude::*;

use std::path::Path;
use std::process::Command;

/// A working repository wired to two bare remotes, `upstream` and `origin`
///
/// Both remotes start with the initial commit on `main`, and `upstream/main`
/// is already fetched.
pub struct CliTestEnvironment {
    pub repo_dir: assert_fs::fixture::ChildPath,
    pub upstream_dir: assert_fs::fixture::ChildPath,
    pub origin_dir: assert_fs::fixture::ChildPath,
    pub config_dir: assert_fs::fixture::ChildPath,
    _temp_dir: TempDir, // Keep temp_dir private to ensure cleanup, but don't expose it
}

impl CliTestEnvironment {
    /// Creates the repository, both bare remotes and an empty user config directory
    ///
    /// # Errors
    /// Returns an error if:
    /// - Failed to create temporary directory
    /// - Any git setup command fails
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new().context("Failed to create temporary directory")?;
        let repo_dir = temp_dir.child("work");
        let upstream_dir = temp_dir.child("upstream.git");
        let origin_dir = temp_dir.child("origin.git");
        let config_dir = temp_dir.child("config");

        repo_dir.create_dir_all()?;
        upstream_dir.create_dir_all()?;
        origin_dir.create_dir_all()?;
        config_dir.create_dir_all()?;

        run_git(upstream_dir.path(), &["init", "--bare"])?;
        run_git(origin_dir.path(), &["init", "--bare"])?;

        run_git(repo_dir.path(), &["init"])?;
        run_git(repo_dir.path(), &["config", "user.name", "Test User"])?;
        run_git(repo_dir.path(), &["config", "user.email", "test@example.com"])?;
        run_git(repo_dir.path(), &["config", "commit.gpgsign", "false"])?;

        repo_dir.child("README.md").write_str("# Test Repo")?;
        run_git(repo_dir.path(), &["add", "."])?;
        run_git(repo_dir.path(), &["commit", "-m", "Initial commit"])?;

        // Ensure we have a main branch (some git versions default to 'master')
        run_git(repo_dir.path(), &["branch", "-M", "main"])?;

        let upstream_url = upstream_dir.path().to_string_lossy().to_string();
        let origin_url = origin_dir.path().to_string_lossy().to_string();
        run_git(repo_dir.path(), &["remote", "add", "upstream", &upstream_url])?;
        run_git(repo_dir.path(), &["remote", "add", "origin", &origin_url])?;
        run_git(repo_dir.path(), &["push", "upstream", "main"])?;
        run_git(repo_dir.path(), &["push", "origin", "main"])?;
        run_git(repo_dir.path(), &["fetch", "upstream"])?;

        Ok(Self {
            repo_dir,
            upstream_dir,
            origin_dir,
            config_dir,
            _temp_dir: temp_dir,
        })
    }

    /// Run git in the working repository and return its trimmed stdout
    ///
    /// # Errors
    /// Returns an error if git exits non-zero
    pub fn git(&self, args: &[&str]) -> Result<String> {
        run_git(self.repo_dir.path(), args)
    }

    /// Switch the working repository to a new branch
    ///
    /// # Errors
    /// Returns an error if the branch cannot be created
    pub fn checkout_new_branch(&self, branch: &str) -> Result<()> {
        self.git(&["checkout", "-b", branch])?;
        Ok(())
    }

    /// Write a file, commit it and return the full sha of the new commit
    ///
    /// # Errors
    /// Returns an error if the file cannot be written or the commit fails
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> Result<String> {
        self.repo_dir.child(name).write_str(content)?;
        self.git(&["add", name])?;
        self.git(&["commit", "-m", message])?;
        self.git(&["rev-parse", "HEAD"])
    }

    /// Whether a bare remote has `refs/heads/<branch>`
    #[must_use]
    pub fn remote_has_branch(remote_dir: &assert_fs::fixture::ChildPath, branch: &str) -> bool {
        run_git(
            remote_dir.path(),
            &["rev-parse", "--verify", "--quiet", &format!("refs/heads/{}", branch)],
        )
        .is_ok()
    }

    /// Contents of `path` at the tip of `branch` in a bare remote
    ///
    /// # Errors
    /// Returns an error if the branch or file does not exist
    pub fn remote_file(
        remote_dir: &assert_fs::fixture::ChildPath,
        branch: &str,
        path: &str,
    ) -> Result<String> {
        run_git(remote_dir.path(), &["show", &format!("{}:{}", branch, path)])
    }

    /// Whether the working repository has a local branch named `branch`
    #[must_use]
    pub fn has_local_branch(&self, branch: &str) -> bool {
        self.git(&[
            "rev-parse",
            "--verify",
            "--quiet",
            &format!("refs/heads/{}", branch),
        ])
        .is_ok()
    }

    /// Number of worktrees registered, the main one included
    ///
    /// # Errors
    /// Returns an error if git fails
    pub fn worktree_count(&self) -> Result<usize> {
        let listing = self.git(&["worktree", "list", "--porcelain"])?;
        Ok(listing
            .lines()
            .filter(|line| line.starts_with("worktree "))
            .count())
    }

    /// Execute a CLI command from the working repository with an isolated environment
    ///
    /// # Errors
    /// Returns an error if the command setup fails
    pub fn run_command(&self, args: &[&str]) -> Result<assert_cmd::Command> {
        let mut cmd = assert_cmd::Command::cargo_bin("pr-cli")
            .context("Failed to find pr-cli binary")?;

        cmd.current_dir(self.repo_dir.path())
            .env("PR_CLI_CONFIG_DIR", self.config_dir.path())
            .env_remove("PR_CLI_PULL_REMOTE")
            .env_remove("PR_CLI_PUSH_REMOTE")
            .env_remove("RUST_LOG");

        cmd.args(args);
        Ok(cmd)
    }
}

fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .context("Failed to execute git command")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git {} failed: {}", args.join(" "), stderr);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use predicates::prelude::*;

    #[test]
    fn test_cli_test_environment_creation() -> Result<()> {
        let env = CliTestEnvironment::new()?;

        env.repo_dir.child(".git").assert(predicate::path::exists());
        env.repo_dir
            .child("README.md")
            .assert(predicate::str::contains("# Test Repo"));

        assert!(CliTestEnvironment::remote_has_branch(&env.upstream_dir, "main"));
        assert!(CliTestEnvironment::remote_has_branch(&env.origin_dir, "main"));
        assert!(env.git(&["rev-parse", "--verify", "upstream/main"]).is_ok());
        assert_eq!(env.worktree_count()?, 1);

        Ok(())
    }

    #[test]
    fn test_commit_file_returns_sha() -> Result<()> {
        let env = CliTestEnvironment::new()?;
        env.checkout_new_branch("feature")?;
        let sha = env.commit_file("feature.txt", "hello", "Add feature file")?;
        assert_eq!(sha.len(), 40);
        assert!(env.has_local_branch("feature"));
        Ok(())
    }
}
