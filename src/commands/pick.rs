use anyhow::Result;
use console::style;

use crate::branch::choose_branch_name;
use crate::commits::{resolve_explicit, select_interactively};
use crate::config::PickConfig;
use crate::error::PickError;
use crate::git::GitRepo;
use crate::prompt::{InquirePrompter, Prompter};
use crate::shell::{ExecContext, ProcessRunner};
use crate::traits::CommandRunner;
use crate::workflow::{PickSettings, cherry_pick_to_new_branch, confirm_settings};

/// Command line input for `pick`, before config defaults are applied
#[derive(Debug, Clone, Default)]
pub struct PickArgs {
    pub upstream_branch: Option<String>,
    pub skip_fetch: bool,
    pub no_pr: bool,
    pub branch: Option<String>,
    /// `Some` when `--commits` was given, even if every entry was empty
    pub commits: Option<Vec<String>>,
    pub pull_remote: Option<String>,
    pub push_remote: Option<String>,
    pub yes: bool,
}

impl PickArgs {
    /// The required upstream branch argument
    ///
    /// # Errors
    /// Returns [`PickError::Usage`] naming `pull_remote` if it is missing or blank
    pub fn upstream_branch(&self, pull_remote: &str) -> Result<&str> {
        match self.upstream_branch.as_deref().map(str::trim) {
            Some(branch) if !branch.is_empty() => Ok(branch),
            _ => Err(PickError::Usage(format!("no {} branch provided", pull_remote)).into()),
        }
    }

    /// `--pull-remote`, else the configured one
    #[must_use]
    pub fn pull_remote<'a>(&'a self, config: &'a PickConfig) -> &'a str {
        self.pull_remote
            .as_deref()
            .unwrap_or_else(|| config.pull_remote())
    }

    /// `--push-remote`, else the configured one
    #[must_use]
    pub fn push_remote<'a>(&'a self, config: &'a PickConfig) -> &'a str {
        self.push_remote
            .as_deref()
            .unwrap_or_else(|| config.push_remote())
    }

    /// `--commits` entries, trimmed, with empty entries dropped
    #[must_use]
    pub fn commit_identifiers(&self) -> Option<Vec<String>> {
        self.commits.as_ref().map(|ids| {
            ids.iter()
                .map(|id| id.trim())
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

/// Runs the pick workflow in the repository containing the current directory
///
/// # Errors
/// Returns an error if:
/// - The current directory is not inside a git repository
/// - The upstream branch is missing
/// - A configured remote does not exist
/// - Any stage of the workflow fails or is cancelled
pub fn pick(args: &PickArgs) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let git_repo = GitRepo::open(&current_dir)?;
    let config = PickConfig::load_for_repo(git_repo.get_repo_path())?;

    args.upstream_branch(args.pull_remote(&config))?;

    git_repo.ensure_remote(args.pull_remote(&config))?;
    git_repo.ensure_remote(args.push_remote(&config))?;

    let ctx = ExecContext::new(current_dir);
    pick_with(args, &config, &ProcessRunner, &InquirePrompter, &ctx)
}

/// Runs the pick workflow with the given runner and prompter (for testing)
///
/// Nothing that changes the repository runs before the user has confirmed.
///
/// # Errors
/// Returns an error if:
/// - The upstream branch is missing
/// - Commit resolution, branch naming or confirmation fails or is cancelled
/// - Any external command fails
pub fn pick_with(
    args: &PickArgs,
    config: &PickConfig,
    runner: &dyn CommandRunner,
    prompter: &dyn Prompter,
    ctx: &ExecContext,
) -> Result<()> {
    let pull_remote = args.pull_remote(config);
    let upstream_branch = args.upstream_branch(pull_remote)?;
    let push_remote = args.push_remote(config);

    let commits = match args.commit_identifiers() {
        Some(identifiers) => resolve_explicit(runner, ctx, &identifiers)?,
        None => select_interactively(runner, prompter, ctx, pull_remote, upstream_branch)?,
    };
    if commits.is_empty() {
        return Err(PickError::NoCommitsChosen.into());
    }

    let branch_name = choose_branch_name(args.branch.as_deref(), &commits, prompter)?;

    let settings = PickSettings::new(upstream_branch, branch_name, commits)?
        .with_remotes(pull_remote, push_remote)
        .with_fetch(!args.skip_fetch)
        .with_pull_request(!args.no_pr)
        .with_assignee(config.assignee());

    if !confirm_settings(&settings, prompter, args.yes)? {
        return Err(PickError::Cancelled.into());
    }

    cherry_pick_to_new_branch(runner, ctx, &settings)?;

    println!(
        "{}",
        style(format!(
            "✓ Picked {} commit(s) onto {}/{}",
            settings.commits().len(),
            settings.push_remote(),
            settings.branch_name()
        ))
        .green()
        .bold()
    );
    Ok(())
}
