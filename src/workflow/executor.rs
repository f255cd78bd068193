use anyhow::Result;
use console::style;
use std::fmt::Display;

use crate::shell::{ExecContext, ShellCommand};
use crate::traits::CommandRunner;
use crate::workflow::PickSettings;

fn step(message: impl Display) {
    println!("{}", style(format!("▶ {}", message)).green());
}

/// Cherry-picks the settings' commits onto a new branch in a scratch worktree, pushes it
/// and optionally opens a pull request
///
/// Steps run in order and the first failure stops the run. Nothing already done is
/// undone: a worktree created before a failure stays for manual recovery.
///
/// # Errors
/// Returns an error if:
/// - Any git, gh or mktemp invocation fails
/// - `mktemp -d` prints no path
pub fn cherry_pick_to_new_branch(
    runner: &dyn CommandRunner,
    ctx: &ExecContext,
    settings: &PickSettings,
) -> Result<()> {
    if settings.do_fetch() {
        step(format!("Fetching {}", settings.pull_remote()));
        runner.run(
            ctx,
            &ShellCommand::git().args(["fetch", settings.pull_remote()]),
        )?;
    } else {
        println!("{}", style("- Skipping fetch").white());
    }

    step("Creating temporary directory");
    let tmp_dir = runner.run(ctx, &ShellCommand::new("mktemp").arg("-d"))?;
    if tmp_dir.is_empty() {
        anyhow::bail!("mktemp -d did not print a directory");
    }

    // Runs from the original directory; the scratch dir is only its destination.
    step(format!("Creating temporary worktree in {}", tmp_dir));
    runner.run(
        ctx,
        &ShellCommand::git()
            .args(["worktree", "add", "--no-track", "-b"])
            .args([settings.branch_name(), tmp_dir.as_str()])
            .arg(settings.upstream_ref()),
    )?;

    let worktree_ctx = ctx.with_cwd(&tmp_dir);
    tracing::debug!(cwd = %worktree_ctx.cwd().display(), "switched to worktree");

    step("Cherry picking commits");
    runner.run(
        &worktree_ctx,
        &ShellCommand::git()
            .arg("cherry-pick")
            .args(settings.commit_shas()),
    )?;

    step(format!(
        "Pushing to {}/{}",
        settings.push_remote(),
        settings.branch_name()
    ));
    runner.run(
        &worktree_ctx,
        &ShellCommand::git().args([
            "push",
            "-u",
            settings.push_remote(),
            settings.branch_name(),
        ]),
    )?;

    if settings.do_create_pull_request() {
        step("Creating pull request");
        runner.run(
            &worktree_ctx,
            &ShellCommand::new("gh").args([
                "pr",
                "create",
                "--fill",
                "--assignee",
                settings.assignee(),
                "--base",
                settings.upstream_branch(),
            ]),
        )?;
    }

    step("Cleaning up temporary worktree");
    runner.run(
        &worktree_ctx,
        &ShellCommand::git().args(["worktree", "remove", tmp_dir.as_str()]),
    )?;

    Ok(())
}
