//! Resolving which commits to pick.
//!
//! Commits come either from explicit identifiers given on the command line,
//! which are verified as a batch, or from an interactive multi-select over
//! the commits in `<remote>/<branch>..`.

use anyhow::Result;
use std::collections::HashSet;
use std::fmt;

use crate::error::PickError;
use crate::prompt::{PromptOutcome, PromptRequest, PromptResponse, Prompter, unexpected_response};
use crate::shell::{ExecContext, ShellCommand};
use crate::traits::CommandRunner;

const COMMIT_LINE_FORMAT: &str = "--pretty=format:%h %s";

/// A commit as shown by `git show --pretty=format:"%h %s"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    sha: String,
    message: String,
}

impl Commit {
    /// Parses a `<short-sha> <subject>` line
    ///
    /// # Errors
    /// Returns an error if the line holds no sha
    pub fn parse_line(line: &str) -> Result<Self> {
        let line = line.trim();
        let (sha, message) = match line.split_once(char::is_whitespace) {
            Some((sha, message)) => (sha, message.trim_start()),
            None => (line, ""),
        };
        if sha.is_empty() {
            anyhow::bail!("Malformed commit line: '{}'", line);
        }
        Ok(Self {
            sha: sha.to_string(),
            message: message.to_string(),
        })
    }

    #[must_use]
    pub fn sha(&self) -> &str {
        &self.sha
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.sha, self.message)
    }
}

/// Commits on the local side that `<remote>/<branch>` doesn't have yet
#[must_use]
pub fn revision_range(remote: &str, branch: &str) -> String {
    format!("{}/{}..", remote, branch)
}

/// Splits `git show` output into commits, treating blank output as none
///
/// # Errors
/// Returns an error if a line cannot be parsed
pub fn parse_commit_lines(output: &str) -> Result<Vec<Commit>> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(Commit::parse_line)
        .collect()
}

/// Lists commits for the given revisions (a range, or individual shas), newest first for ranges
///
/// # Errors
/// Returns an error if `git show` fails or prints something unparseable
pub fn list_commits(
    runner: &dyn CommandRunner,
    ctx: &ExecContext,
    revisions: &[String],
) -> Result<Vec<Commit>> {
    let command = ShellCommand::git()
        .args(["show", "--quiet", COMMIT_LINE_FORMAT])
        .args(revisions.iter().cloned())
        .quiet();
    let output = runner.run(ctx, &command)?;
    parse_commit_lines(&output)
}

/// Resolves every identifier to its full sha, in input order
///
/// # Errors
/// Returns [`PickError::InvalidCommits`] if any identifier does not name a commit
pub fn verify_commits(
    runner: &dyn CommandRunner,
    ctx: &ExecContext,
    identifiers: &[String],
) -> Result<Vec<String>> {
    let mut verified = Vec::with_capacity(identifiers.len());
    for identifier in identifiers {
        let command = ShellCommand::git()
            .args(["rev-parse", "--quiet", "--verify"])
            .arg(format!("{}^{{commit}}", identifier))
            .quiet();
        match runner.run(ctx, &command) {
            Ok(sha) if !sha.is_empty() => verified.push(sha),
            Err(e)
                if !matches!(
                    e.downcast_ref::<PickError>(),
                    Some(PickError::CommandFailed { .. })
                ) =>
            {
                return Err(e);
            }
            _ => {
                tracing::debug!(identifier = %identifier, "commit does not resolve");
                return Err(PickError::InvalidCommits.into());
            }
        }
    }
    Ok(verified)
}

/// Turns explicit identifiers into commits, keeping the caller's order
///
/// An identifier naming a commit already given is dropped.
///
/// # Errors
/// Returns an error if:
/// - No identifiers were given
/// - Any identifier is not a commit (the whole batch is rejected)
/// - `git show` fails
pub fn resolve_explicit(
    runner: &dyn CommandRunner,
    ctx: &ExecContext,
    identifiers: &[String],
) -> Result<Vec<Commit>> {
    if identifiers.is_empty() {
        return Err(PickError::NoCommitsChosen.into());
    }
    let mut shas = verify_commits(runner, ctx, identifiers)?;
    // git show prints a commit once however often it is named
    let mut seen = HashSet::new();
    shas.retain(|sha| seen.insert(sha.clone()));
    let commits = list_commits(runner, ctx, &shas)?;
    if commits.len() != shas.len() {
        anyhow::bail!(
            "Expected {} commits from git show, got {}",
            shas.len(),
            commits.len()
        );
    }
    Ok(commits)
}

/// Offers the commits in `<pull_remote>/<upstream_branch>..` and returns the picked ones
///
/// # Errors
/// Returns an error if:
/// - The range holds no commits ([`PickError::NothingToPick`], nothing is asked)
/// - The user cancels ([`PickError::Cancelled`]) or picks nothing
/// - Git or the prompt fails
pub fn select_interactively(
    runner: &dyn CommandRunner,
    prompter: &dyn Prompter,
    ctx: &ExecContext,
    pull_remote: &str,
    upstream_branch: &str,
) -> Result<Vec<Commit>> {
    let range = revision_range(pull_remote, upstream_branch);
    let candidates = list_commits(runner, ctx, &[range])?;
    if candidates.is_empty() {
        return Err(PickError::NothingToPick.into());
    }

    let request = PromptRequest::MultiSelect {
        message: "Which commits do you want to pick?".to_string(),
        options: candidates.iter().map(ToString::to_string).collect(),
        min_items: 1,
    };
    let picked_lines = match prompter.prompt(&request)? {
        PromptOutcome::Answered(PromptResponse::MultiSelected(lines)) => lines,
        PromptOutcome::Answered(other) => return Err(unexpected_response(&request, &other)),
        PromptOutcome::Cancelled => return Err(PickError::Cancelled.into()),
    };

    let picked: Vec<Commit> = candidates
        .into_iter()
        .filter(|commit| picked_lines.contains(&commit.to_string()))
        .collect();
    if picked.is_empty() {
        return Err(PickError::NoCommitsChosen.into());
    }
    Ok(picked)
}
