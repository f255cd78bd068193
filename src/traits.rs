use anyhow::Result;

use crate::shell::{ExecContext, ShellCommand};

/// Trait for running external commands to enable mocking in tests
pub trait CommandRunner {
    /// Runs `command` in the working directory of `ctx` and returns its trimmed stdout
    ///
    /// # Errors
    /// Returns [`crate::error::PickError::CommandFailed`] if the process exits
    /// non-zero, or [`crate::error::PickError::Spawn`] if it cannot be started
    fn run(&self, ctx: &ExecContext, command: &ShellCommand) -> Result<String>;
}
