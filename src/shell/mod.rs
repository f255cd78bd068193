//! External process plumbing.
//!
//! Commands never read a shared working directory: every call receives an
//! [`ExecContext`] saying where to run.

use anyhow::Result;
use console::style;
use std::cell::RefCell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::PickError;
use crate::traits::CommandRunner;

/// Where external commands run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecContext {
    cwd: PathBuf,
}

impl ExecContext {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Returns a context that runs commands in `cwd` instead
    #[must_use]
    pub fn with_cwd(&self, cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

/// A program invocation: program name, arguments, and whether to echo it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    program: String,
    arguments: Vec<String>,
    quiet: bool,
}

impl ShellCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            arguments: Vec::new(),
            quiet: false,
        }
    }

    #[must_use]
    pub fn git() -> Self {
        Self::new("git")
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.arguments.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.arguments.extend(args.into_iter().map(Into::into));
        self
    }

    /// Don't echo the command line or its output
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.arguments {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Real implementation backed by `std::process::Command`
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, ctx: &ExecContext, command: &ShellCommand) -> Result<String> {
        let command_line = command.to_string();
        if !command.is_quiet() {
            println!("{}", style(format!("$ {}", command_line)).dim());
        }
        tracing::debug!(command = %command_line, cwd = %ctx.cwd().display(), "running");

        let output = Command::new(command.program())
            .args(command.arguments())
            .current_dir(ctx.cwd())
            .output()
            .map_err(|source| PickError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !command.is_quiet() && !stdout.is_empty() {
            println!("{}", stdout);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr)
                .trim_end()
                .to_string();
            if !stderr.is_empty() {
                eprintln!("{}", stderr);
            }
            tracing::debug!(command = %command_line, status = %output.status, "command failed");
            return Err(PickError::CommandFailed {
                command: command_line,
                status: output.status.to_string(),
                stderr,
            }
            .into());
        }

        Ok(stdout)
    }
}

/// A command seen by [`MockCommandRunner`], with the directory it would have run in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub cwd: PathBuf,
    pub command: ShellCommand,
}

impl Invocation {
    #[must_use]
    pub fn command_line(&self) -> String {
        self.command.to_string()
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Output(String),
    Failure(String),
}

/// Mock implementation for testing that records invocations and replays scripted output
///
/// Replies are matched by command-line prefix, first registration wins.
/// Commands without a matching reply succeed with empty output.
#[derive(Default)]
pub struct MockCommandRunner {
    replies: Vec<(String, Reply)>,
    invocations: RefCell<Vec<Invocation>>,
}

impl MockCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands starting with `prefix` succeed and print `stdout`
    #[must_use]
    pub fn respond(mut self, prefix: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.replies
            .push((prefix.into(), Reply::Output(stdout.into())));
        self
    }

    /// Commands starting with `prefix` exit with status 1 and print `stderr`
    #[must_use]
    pub fn fail(mut self, prefix: impl Into<String>, stderr: impl Into<String>) -> Self {
        self.replies
            .push((prefix.into(), Reply::Failure(stderr.into())));
        self
    }

    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    #[must_use]
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, ctx: &ExecContext, command: &ShellCommand) -> Result<String> {
        let command_line = command.to_string();
        self.invocations.borrow_mut().push(Invocation {
            cwd: ctx.cwd().to_path_buf(),
            command: command.clone(),
        });

        let reply = self
            .replies
            .iter()
            .find(|(prefix, _)| command_line.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Output(stdout)) => Ok(stdout.trim().to_string()),
            Some(Reply::Failure(stderr)) => Err(PickError::CommandFailed {
                command: command_line,
                status: "exit status: 1".to_string(),
                stderr,
            }
            .into()),
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_command_display() {
        let command = ShellCommand::git()
            .args(["worktree", "add", "--no-track"])
            .arg("-b")
            .arg("fix-thing");
        assert_eq!(command.to_string(), "git worktree add --no-track -b fix-thing");
        assert!(!command.is_quiet());
        assert!(command.quiet().is_quiet());
    }

    #[test]
    fn test_with_cwd_leaves_original_untouched() {
        let original = ExecContext::new("/repo");
        let redirected = original.with_cwd("/tmp/scratch");
        assert_eq!(original.cwd(), Path::new("/repo"));
        assert_eq!(redirected.cwd(), Path::new("/tmp/scratch"));
    }

    #[test]
    fn test_mock_runner_records_and_replies() -> Result<()> {
        let runner = MockCommandRunner::new()
            .respond("mktemp -d", "/tmp/tmp.X1\n")
            .fail("git push", "rejected");
        let ctx = ExecContext::new("/repo");

        assert_eq!(runner.run(&ctx, &ShellCommand::new("mktemp").arg("-d"))?, "/tmp/tmp.X1");
        assert_eq!(runner.run(&ctx, &ShellCommand::git().arg("status"))?, "");

        let err = runner
            .run(&ctx, &ShellCommand::git().args(["push", "-u", "origin", "x"]))
            .err();
        assert!(matches!(
            err.as_ref().and_then(|e| e.downcast_ref::<PickError>()),
            Some(PickError::CommandFailed { stderr, .. }) if stderr == "rejected"
        ));

        assert_eq!(
            runner.command_lines(),
            vec!["mktemp -d", "git status", "git push -u origin x"]
        );
        assert!(runner.invocations().iter().all(|i| i.cwd == Path::new("/repo")));
        Ok(())
    }

    #[test]
    fn test_process_runner_captures_trimmed_stdout() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let ctx = ExecContext::new(dir.path());
        let output = ProcessRunner.run(&ctx, &ShellCommand::git().arg("--version").quiet())?;
        assert!(output.starts_with("git version"));
        assert!(!output.ends_with('\n'));
        Ok(())
    }

    #[test]
    fn test_process_runner_reports_failure_with_stderr() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let ctx = ExecContext::new(dir.path());
        let result = ProcessRunner.run(
            &ctx,
            &ShellCommand::git()
                .args(["rev-parse", "--verify", "definitely-not-a-ref"])
                .quiet(),
        );
        let err = result.err();
        assert!(matches!(
            err.as_ref().and_then(|e| e.downcast_ref::<PickError>()),
            Some(PickError::CommandFailed { stderr, .. }) if !stderr.is_empty()
        ));
        Ok(())
    }

    #[test]
    fn test_process_runner_reports_missing_program() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let ctx = ExecContext::new(dir.path());
        let result = ProcessRunner.run(&ctx, &ShellCommand::new("pr-cli-no-such-program").quiet());
        let err = result.err();
        assert!(matches!(
            err.as_ref().and_then(|e| e.downcast_ref::<PickError>()),
            Some(PickError::Spawn { .. })
        ));
        Ok(())
    }
}
